//! Error types for the runner.

use crate::settings::SettingsError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
