mod app;
mod config;
mod dispatch;
mod error;
mod quick_add;
mod swipe;
mod ui;

use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_tracing(&config)?;
    let mut app = app::App::new(&config)?;
    app.run().await?;
    Ok(())
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_tracing(config: &AppConfig) -> Result<()> {
    if let Some(parent) = Path::new(&config.log_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("worthlog_tui=info,storage=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
