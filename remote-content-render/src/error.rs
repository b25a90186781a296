//! Render-pass errors.

use remote_content_core::FetchError;
use thiserror::Error;

/// Why a render pass produced a notice instead of cards.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PanelError {
    /// No base address or no resolvable entity type.
    #[error("Panel is not configured")]
    NotConfigured,

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
