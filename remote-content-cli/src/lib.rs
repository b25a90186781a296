//! Remote Content Runner
//!
//! Loads runner settings and a component configuration, renders one panel
//! pass over HTTP and returns the HTML.

pub mod error;
pub mod settings;

pub use error::CliError;
pub use settings::{flag_value, RunnerSettings, SettingsError, SETTINGS_ENV};

use remote_content_fetch::{build_client, HttpFetcher, HttpImageProbe};
use remote_content_render::{RemoteContentPanel, RenderedPanel};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Component configuration from `--component <path>`, or stdin when absent.
pub fn read_component(args: &[String]) -> Result<String, CliError> {
    match flag_value(args, "--component") {
        Some(path) => read_component_file(&path),
        None => {
            let mut attribute = String::new();
            std::io::stdin().read_to_string(&mut attribute)?;
            Ok(attribute)
        }
    }
}

pub fn read_component_file(path: &Path) -> Result<String, CliError> {
    Ok(std::fs::read_to_string(path)?)
}

/// Install the stderr log subscriber. Later calls are no-ops.
pub fn init_tracing(settings: &RunnerSettings) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(settings.env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Render one pass for `attribute` against the live repository.
pub async fn render_component(
    settings: &RunnerSettings,
    attribute: &str,
) -> Result<RenderedPanel, CliError> {
    let client = build_client(&settings.http_settings())?;
    let panel = RemoteContentPanel::from_attribute(
        attribute,
        &settings.page_context(),
        Arc::new(HttpFetcher::new(client.clone())),
        Arc::new(HttpImageProbe::new(client)),
    );
    Ok(panel.render().await)
}
