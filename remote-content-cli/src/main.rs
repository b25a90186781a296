//! Remote content runner entry point.

use remote_content_cli::{init_tracing, read_component, render_component, CliError, RunnerSettings};
use std::io::Write;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = RunnerSettings::load(&args)?;
    init_tracing(&settings);

    let attribute = read_component(&args)?;
    let rendered = render_component(&settings, &attribute).await?;
    tracing::info!(
        status = ?rendered.status,
        requests = rendered.trace.len(),
        "Render pass finished"
    );

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", rendered.html)?;
    Ok(())
}
