//! Runner settings.
//!
//! All fields are required unless explicitly marked optional. No defaults.

use remote_content_core::PageContext;
use remote_content_fetch::HttpSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub const SETTINGS_ENV: &str = "REMOTE_CONTENT_SETTINGS";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerSettings {
    pub request_timeout_ms: u64,
    pub user_agent: String,
    /// Origin of the hosting page, used when the component has no base address.
    pub page_origin: Option<String>,
    /// Log filter directives used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Missing settings file path (use --settings or REMOTE_CONTENT_SETTINGS)")]
    MissingSettingsPath,
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid settings value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl RunnerSettings {
    /// Load from `--settings <path>` or the settings environment variable.
    pub fn load(args: &[String]) -> Result<Self, SettingsError> {
        let path = flag_value(args, "--settings")
            .or_else(|| std::env::var(SETTINGS_ENV).ok().map(PathBuf::from));
        let path = path.ok_or(SettingsError::MissingSettingsPath)?;
        let settings = Self::from_path(&path)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.request_timeout_ms == 0 {
            return Err(SettingsError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.user_agent.trim().is_empty() {
            return Err(SettingsError::InvalidValue {
                field: "user_agent",
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(origin) = &self.page_origin {
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(SettingsError::InvalidValue {
                    field: "page_origin",
                    reason: "must start with http:// or https://".to_string(),
                });
            }
        }
        if let Some(filter) = &self.log_filter {
            EnvFilter::try_new(filter).map_err(|e| SettingsError::InvalidValue {
                field: "log_filter",
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            user_agent: self.user_agent.clone(),
        }
    }

    pub fn page_context(&self) -> PageContext {
        PageContext {
            origin: self
                .page_origin
                .as_deref()
                .map(|origin| origin.trim_end_matches('/').to_string()),
        }
    }

    /// `RUST_LOG` wins, then `log_filter`, then `info`.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(self.log_filter.as_deref().unwrap_or("info")))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Value following `flag` in the argument list.
pub fn flag_value(args: &[String], flag: &str) -> Option<PathBuf> {
    let mut args = args.iter();
    while let Some(arg) = args.next() {
        if arg == flag {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
