//! Error types for remote content operations

use thiserror::Error;

/// Errors raised while talking to the content repository.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Fetch error: {status} {description}")]
    Status {
        status: u16,
        description: String,
        url: String,
    },

    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("Invalid response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl FetchError {
    pub fn status(status: u16, description: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Status {
            status,
            description: description.into(),
            url: url.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// URL of the request that failed.
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. } | Self::Transport { url, .. } | Self::Decode { url, .. } => {
                url
            }
        }
    }
}

/// Errors raised while reading the component configuration attribute.
///
/// These never abort the component: the resolver logs them and falls back to
/// an empty configuration, which renders as the missing-configuration notice.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to parse component configuration: {reason}")]
    Parse { reason: String },

    #[error("Component configuration must be a JSON object")]
    NotAnObject,

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
