//! Enum types for remote content configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// REMOTE TYPE
// ============================================================================

/// Content type selector offered by the page builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteType {
    Article,
    Event,
    Person,
    Place,
    Product,
    /// Entity type and image field are supplied by separate config values.
    Custom,
}

impl RemoteType {
    pub const ALL: [RemoteType; 6] = [
        RemoteType::Article,
        RemoteType::Event,
        RemoteType::Person,
        RemoteType::Place,
        RemoteType::Product,
        RemoteType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteType::Article => "article",
            RemoteType::Event => "event",
            RemoteType::Person => "person",
            RemoteType::Place => "place",
            RemoteType::Product => "product",
            RemoteType::Custom => "custom",
        }
    }

    /// Image field carried by the built-in content types.
    ///
    /// Returns `None` for [`RemoteType::Custom`], whose field name comes from
    /// configuration.
    pub fn builtin_image_field(&self) -> Option<&'static str> {
        match self {
            RemoteType::Article => Some("field_article_image"),
            RemoteType::Event => Some("field_event_image"),
            RemoteType::Person => Some("field_person_image"),
            RemoteType::Place => Some("field_place_image"),
            RemoteType::Product => Some("field_product_image"),
            RemoteType::Custom => None,
        }
    }

    /// Configuration key holding the repeated taxonomy filter group for this type.
    pub fn taxonomy_repeater_key(&self) -> &'static str {
        match self {
            RemoteType::Article => "repeatertaxonomyarticle",
            RemoteType::Event => "repeatertaxonomyevent",
            RemoteType::Person => "repeatertaxonomyperson",
            RemoteType::Place => "repeatertaxonomyplace",
            RemoteType::Product => "repeatertaxonomyproduct",
            RemoteType::Custom => "repeatertaxonomycustom",
        }
    }
}

impl fmt::Display for RemoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RemoteType {
    type Err = RemoteTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RemoteType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RemoteTypeParseError(s.to_string()))
    }
}

/// Error when parsing an unknown remote type selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTypeParseError(pub String);

impl fmt::Display for RemoteTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid remote type: {}", self.0)
    }
}

impl std::error::Error for RemoteTypeParseError {}

// ============================================================================
// SORTING
// ============================================================================

/// Ordering applied to the content list before limiting.
///
/// Only one ordering exists today; the enum keeps the descriptor explicit
/// about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    TitleAscending,
}
