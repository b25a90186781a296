//! Content model and JSON:API document shapes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Relationship type naming a digital-asset embed.
pub const DIGITAL_ASSET_TYPE: &str = "media--acquia_dam_image_asset";

/// Alt text used when a local media entity carries none.
pub const DEFAULT_ALT_TEXT: &str = "Image";

/// Alt text paired with the placeholder image.
pub const PLACEHOLDER_ALT_TEXT: &str = "No Image";

const PLACEHOLDER_SVG: &str = r##"<svg width="100%" height="100%" viewBox="0 0 100 100" xmlns="http://www.w3.org/2000/svg"><rect width="100%" height="100%" fill="#e0e0e0"/><text x="50%" y="50%" alignment-baseline="middle" text-anchor="middle" fill="#888" font-size="16">No Image</text></svg>"##;

/// Inline SVG data URI reading "No Image".
pub fn placeholder_image_url() -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(PLACEHOLDER_SVG))
}

// ============================================================================
// JSON:API DOCUMENTS
// ============================================================================

/// Document whose primary data is a single resource.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDocument {
    pub data: Resource,
}

/// Document whose primary data is a collection. Missing or `null` data reads
/// as an empty collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionDocument {
    #[serde(default)]
    data: Option<Vec<Resource>>,
}

impl CollectionDocument {
    pub fn into_resources(self) -> Vec<Resource> {
        self.data.unwrap_or_default()
    }
}

/// A JSON:API resource object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub relationships: Map<String, Value>,
}

/// Resource identifier object found in relationship data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipRef {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Alt text carried in the identifier's `meta`, when present.
    #[serde(skip)]
    pub alt: Option<String>,
}

impl RelationshipRef {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            alt: None,
        }
    }

    pub fn is_digital_asset(&self) -> bool {
        self.kind == DIGITAL_ASSET_TYPE
    }

    /// Resource path for this identifier: `media--image` becomes `media/image`.
    ///
    /// Identifiers without a type fall back to `default`.
    pub fn resource_type(&self, default: &str) -> String {
        if self.kind.is_empty() {
            default.to_string()
        } else {
            self.kind.replacen("--", "/", 1)
        }
    }
}

impl Resource {
    /// String attribute at a `/`-separated pointer below `attributes`.
    pub fn attribute_str(&self, pointer: &str) -> Option<&str> {
        let mut parts = pointer.trim_start_matches('/').split('/');
        let first = parts.next()?;
        let mut current = self.attributes.get(first)?;
        for part in parts {
            current = current.get(part)?;
        }
        current.as_str()
    }

    /// First resource identifier of a relationship field.
    ///
    /// Multi-valued relationships yield their first entry; `null` data yields
    /// `None`.
    pub fn relationship(&self, field: &str) -> Option<RelationshipRef> {
        let data = self.relationships.get(field)?.get("data")?;
        let identifier = match data {
            Value::Array(items) => items.first()?,
            Value::Object(_) => data,
            _ => return None,
        };
        let id = identifier.get("id")?.as_str()?;
        if id.is_empty() {
            return None;
        }
        let kind = identifier
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let alt = identifier
            .pointer("/meta/alt")
            .and_then(Value::as_str)
            .filter(|a| !a.trim().is_empty())
            .map(str::to_string);
        Some(RelationshipRef {
            id: id.to_string(),
            kind: kind.to_string(),
            alt,
        })
    }
}

// ============================================================================
// CONTENT MODEL
// ============================================================================

/// A content entity returned by the list query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub path_alias: Option<String>,
    pub image: Option<RelationshipRef>,
}

impl ContentItem {
    /// Project a list resource onto the fields the panel renders.
    pub fn from_resource(resource: &Resource, image_field: &str) -> Self {
        Self {
            id: resource.id.clone(),
            title: resource.attribute_str("title").unwrap_or_default().to_string(),
            path_alias: resource
                .attribute_str("path/alias")
                .filter(|alias| !alias.is_empty())
                .map(str::to_string),
            image: resource.relationship(image_field),
        }
    }
}

/// Displayable image for one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedImage {
    /// Empty when resolution found nothing; the renderer substitutes the placeholder.
    pub url: String,
    pub alt_text: String,
}

impl ResolvedImage {
    pub fn new(url: impl Into<String>, alt_text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt_text: alt_text.into(),
        }
    }

    pub fn placeholder() -> Self {
        Self::new(placeholder_image_url(), PLACEHOLDER_ALT_TEXT)
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_empty()
    }
}

/// Taxonomy term matched by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyTermRef {
    pub id: String,
    pub name: String,
}

impl TaxonomyTermRef {
    pub fn from_resource(resource: &Resource) -> Self {
        Self {
            id: resource.id.clone(),
            name: resource.attribute_str("name").unwrap_or_default().to_string(),
        }
    }
}
