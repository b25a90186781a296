//! Normalized content query descriptor.

use crate::enums::{RemoteType, SortKey};
use serde::{Deserialize, Serialize};

/// API root segment used when the configuration does not name one.
pub const DEFAULT_API_PATH: &str = "api";

/// Entity type and image field the panel queries.
///
/// Both values must be known before any request is issued, which is why they
/// travel together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTarget {
    pub remote_type: RemoteType,
    /// Entity type segment used in collection and node URLs.
    pub entity_type: String,
    /// Relationship field on each content item that points at its image.
    pub image_field: String,
}

/// One taxonomy filter. Filters are combined with logical AND.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyFilter {
    /// Relationship field on the content item, e.g. `field_tags`.
    pub field: String,
    /// Taxonomy vocabulary, e.g. `tags`.
    pub vocabulary: String,
    /// Human-readable term name, resolved to an id at render time.
    pub term_name: String,
}

/// Everything the panel needs to query and render, built once from the host
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentQueryDescriptor {
    /// Base address without trailing slashes.
    pub base_url: Option<String>,
    pub api_path: String,
    pub target: Option<ContentTarget>,
    pub taxonomy_filters: Vec<TaxonomyFilter>,
    /// Path segment such as `/fr`. Empty prefixes are stored as `None`.
    pub language_prefix: Option<String>,
    pub result_limit: Option<usize>,
    pub sort_key: SortKey,
    pub layout_style_class: String,
    /// Style derivative or embed code name requested for images.
    pub image_style: Option<String>,
    /// Case-insensitive title substring filter.
    pub title_filter: Option<String>,
    pub show_queries: bool,
}

impl Default for ContentQueryDescriptor {
    fn default() -> Self {
        Self {
            base_url: None,
            api_path: DEFAULT_API_PATH.to_string(),
            target: None,
            taxonomy_filters: Vec::new(),
            language_prefix: None,
            result_limit: None,
            sort_key: SortKey::default(),
            layout_style_class: String::new(),
            image_style: None,
            title_filter: None,
            show_queries: false,
        }
    }
}

impl ContentQueryDescriptor {
    /// True when the panel has both a base address and a resolved target.
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.target.is_some()
    }

    pub fn entity_type(&self) -> Option<&str> {
        self.target.as_ref().map(|t| t.entity_type.as_str())
    }

    pub fn image_field(&self) -> Option<&str> {
        self.target.as_ref().map(|t| t.image_field.as_str())
    }
}
