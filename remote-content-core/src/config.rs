//! Component configuration resolution.
//!
//! The host page builder serializes the component form into a single JSON
//! attribute. Values arrive loosely typed (numbers as strings, toggles as
//! `"1"`), so every field is read through [`Scalar`] and normalized here.
//! Nothing in this module performs network I/O.

use crate::descriptor::{ContentQueryDescriptor, ContentTarget, TaxonomyFilter, DEFAULT_API_PATH};
use crate::enums::{RemoteType, SortKey};
use crate::error::ConfigError;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Language selector value that defers to `customlanguagecode`.
const CUSTOM_LANGUAGE: &str = "custom";

/// Host page information used when the configuration omits a base address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    /// Origin of the page hosting the component, e.g. `https://www.example.com:8443`.
    pub origin: Option<String>,
}

impl PageContext {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: Some(origin.into()),
        }
    }
}

/// A loosely typed configuration value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    /// Text form with surrounding whitespace removed; `None` when blank.
    pub fn text(&self) -> Option<String> {
        let value = match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.trim().to_string(),
        };
        (!value.is_empty()).then_some(value)
    }

    pub fn flag(&self) -> bool {
        match self {
            Scalar::Bool(b) => *b,
            Scalar::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            Scalar::Text(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            ),
        }
    }

    fn count(&self, field: &'static str) -> Result<Option<usize>, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidValue { field, reason };
        match self {
            Scalar::Number(n) => match n.as_u64() {
                Some(v) => Ok(usize::try_from(v).ok().filter(|v| *v > 0)),
                None => Err(invalid(format!("{n} is not a non-negative integer"))),
            },
            Scalar::Text(s) if s.trim().is_empty() => Ok(None),
            Scalar::Text(s) => s
                .trim()
                .parse::<usize>()
                .map(|v| (v > 0).then_some(v))
                .map_err(|e| invalid(format!("{s:?}: {e}"))),
            Scalar::Bool(_) => Err(invalid("expected a number".to_string())),
        }
    }
}

/// Raw component configuration as emitted by the page builder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawComponentConfig {
    #[serde(default)]
    pub baseurl: Option<Scalar>,
    #[serde(default)]
    pub apipath: Option<Scalar>,
    #[serde(default)]
    pub remotetype: Option<Scalar>,
    #[serde(default)]
    pub customtype: Option<Scalar>,
    #[serde(default)]
    pub customimage: Option<Scalar>,
    #[serde(default)]
    pub language: Option<Scalar>,
    #[serde(default)]
    pub customlanguagecode: Option<Scalar>,
    #[serde(default)]
    pub numberofresults: Option<Scalar>,
    #[serde(default)]
    pub imagestyle: Option<Scalar>,
    #[serde(default)]
    pub layoutstyle: Option<Scalar>,
    #[serde(default)]
    pub showqueries: Option<Scalar>,
    #[serde(default)]
    pub filtername: Option<Scalar>,
    /// Spelling used by the article and place variants.
    #[serde(default)]
    pub filtertitle: Option<Scalar>,
    /// Repeater groups and any keys this component does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawComponentConfig {
    /// Parse the host attribute value.
    pub fn from_attribute(attribute: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(attribute).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        if !value.is_object() {
            return Err(ConfigError::NotAnObject);
        }
        serde_json::from_value(value).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }
}

impl ContentQueryDescriptor {
    /// Build a descriptor from the raw host attribute.
    ///
    /// An unreadable attribute is logged and treated as an empty
    /// configuration, which later renders the missing-configuration notice.
    pub fn from_attribute(attribute: &str, page: &PageContext) -> Self {
        let raw = RawComponentConfig::from_attribute(attribute).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Ignoring unreadable component configuration");
            RawComponentConfig::default()
        });
        resolve_descriptor(&raw, page)
    }
}

/// Normalize a raw configuration into a [`ContentQueryDescriptor`].
pub fn resolve_descriptor(raw: &RawComponentConfig, page: &PageContext) -> ContentQueryDescriptor {
    let target = resolve_target(raw);
    let taxonomy_filters = target
        .as_ref()
        .map(|t| resolve_taxonomy_filters(raw.extra.get(t.remote_type.taxonomy_repeater_key())))
        .unwrap_or_default();

    let result_limit = match raw.numberofresults.as_ref().map(|s| s.count("numberofresults")) {
        Some(Ok(limit)) => limit,
        Some(Err(err)) => {
            tracing::warn!(error = %err, "Ignoring result limit");
            None
        }
        None => None,
    };

    ContentQueryDescriptor {
        base_url: resolve_base_url(raw.baseurl.as_ref(), page),
        api_path: text(&raw.apipath)
            .map(|p| p.trim_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_API_PATH.to_string()),
        target,
        taxonomy_filters,
        language_prefix: resolve_language(&raw.language, &raw.customlanguagecode),
        result_limit,
        sort_key: SortKey::TitleAscending,
        layout_style_class: text(&raw.layoutstyle).unwrap_or_default(),
        image_style: text(&raw.imagestyle),
        title_filter: text(&raw.filtername).or_else(|| text(&raw.filtertitle)),
        show_queries: raw.showqueries.as_ref().is_some_and(Scalar::flag),
    }
}

fn text(value: &Option<Scalar>) -> Option<String> {
    value.as_ref().and_then(Scalar::text)
}

fn resolve_base_url(configured: Option<&Scalar>, page: &PageContext) -> Option<String> {
    configured
        .and_then(Scalar::text)
        .or_else(|| page.origin.clone())
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
}

fn resolve_target(raw: &RawComponentConfig) -> Option<ContentTarget> {
    let selector = text(&raw.remotetype)?;
    let remote_type = match selector.parse::<RemoteType>() {
        Ok(kind) => kind,
        Err(err) => {
            tracing::warn!(error = %err, "Unknown remote type selector");
            return None;
        }
    };

    match remote_type.builtin_image_field() {
        Some(image_field) => Some(ContentTarget {
            remote_type,
            entity_type: remote_type.as_str().to_string(),
            image_field: image_field.to_string(),
        }),
        None => {
            let entity_type = text(&raw.customtype);
            let image_field = text(&raw.customimage);
            match (entity_type, image_field) {
                (Some(entity_type), Some(image_field)) => Some(ContentTarget {
                    remote_type,
                    entity_type,
                    image_field,
                }),
                (entity_type, image_field) => {
                    tracing::warn!(
                        custom_type = ?entity_type,
                        custom_image = ?image_field,
                        "Custom remote type needs both customtype and customimage"
                    );
                    None
                }
            }
        }
    }
}

fn resolve_language(language: &Option<Scalar>, custom_code: &Option<Scalar>) -> Option<String> {
    let language = text(language)?;
    let code = if language == CUSTOM_LANGUAGE {
        match text(custom_code) {
            Some(code) => code,
            None => {
                tracing::warn!("Custom language selected without customlanguagecode");
                return None;
            }
        }
    } else {
        language
    };
    let code = code.trim_matches('/');
    (!code.is_empty()).then(|| format!("/{code}"))
}

/// Read a repeater group. Each entry carries field, vocabulary and term as
/// its first three values, in key order.
fn resolve_taxonomy_filters(group: Option<&Value>) -> Vec<TaxonomyFilter> {
    let entries: Vec<&Value> = match group {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Object(items)) => items.values().collect(),
        Some(Value::Null) | None => return Vec::new(),
        Some(other) => {
            tracing::warn!(value = %other, "Ignoring malformed taxonomy repeater");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| {
            let Value::Object(fields) = entry else {
                tracing::warn!(value = %entry, "Ignoring malformed taxonomy filter entry");
                return None;
            };
            let mut values = fields.values().map(|v| {
                serde_json::from_value::<Scalar>(v.clone())
                    .ok()
                    .and_then(|s| s.text())
            });
            let field = values.next().flatten();
            let vocabulary = values.next().flatten();
            let term_name = values.next().flatten();

            match (field, vocabulary, term_name) {
                (Some(field), Some(vocabulary), Some(term_name)) => Some(TaxonomyFilter {
                    field,
                    vocabulary,
                    term_name,
                }),
                (field, vocabulary, None) => {
                    tracing::warn!(
                        field = ?field,
                        vocabulary = ?vocabulary,
                        "Taxonomy term is empty. Skipping filter."
                    );
                    None
                }
                (field, vocabulary, Some(term)) => {
                    tracing::warn!(
                        field = ?field,
                        vocabulary = ?vocabulary,
                        term = %term,
                        "Incomplete taxonomy filter configuration. Skipping filter."
                    );
                    None
                }
            }
        })
        .collect()
}
