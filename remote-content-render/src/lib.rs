//! Remote Content Render - Panel
//!
//! [`RemoteContentPanel`] drives one render pass against the content
//! repository and turns the result into HTML with maud.

pub mod error;
pub mod panel;
pub mod renderer;

pub use error::PanelError;
pub use panel::{PanelStatus, RemoteContentPanel, RenderedPanel};
pub use renderer::{Card, Renderer, NOT_CONFIGURED_NOTICE, NO_RESULTS_NOTICE};
