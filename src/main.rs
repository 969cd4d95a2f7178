//! # Forum Server
//!
//! Entry point: logging, configuration, then the HTTP server. Any startup
//! failure is logged and the process exits with status 1.

use tracing::{error, info};

use forum_server::config::Settings;
use forum_server::startup::Application;

#[tokio::main]
async fn main() {
    // Initialize tracing subscriber for structured logging
    forum_server::telemetry::init_tracing();

    if let Err(e) = run().await {
        error!(error = ?e, "Forum server failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    info!("Starting Forum Server...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
