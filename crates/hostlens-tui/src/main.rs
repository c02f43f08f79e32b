//! HostLens - terminal dashboard entry point

use anyhow::{Context, Result};
use clap::Parser;
use hostlens_tui::{logging, App, Args};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.load_config().context("Failed to load configuration")?;

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;
    tracing::info!("Starting HostLens against {}", config.api.base_url);

    let mut app = App::new(&config).context("Failed to start the dashboard")?;

    match app.run().await {
        Ok(_) => {
            tracing::info!("HostLens exited gracefully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("HostLens error: {}", e);
            Err(e.into())
        }
    }
}
