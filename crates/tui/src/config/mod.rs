use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/worthlog.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Storage backend: `local`, `rest`, or `memory`.
    pub backend: String,
    /// Base URL of the REST backend.
    pub base_url: String,
    /// JSON data file used by the local backend (and as fallback target).
    pub data_path: String,
    /// Where tracing output goes; the terminal itself stays clean.
    pub log_path: String,
    /// Wrap the REST backend in a chain that falls back to the local store.
    pub fallback_to_local: bool,
    /// Swipe distance threshold in terminal cells.
    pub swipe_threshold: u16,
    /// Swipe time limit in milliseconds.
    pub swipe_time_limit_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: "local".to_string(),
            base_url: "http://127.0.0.1:3000".to_string(),
            data_path: "config/worthlog.json".to_string(),
            log_path: "config/worthlog.log".to_string(),
            fallback_to_local: true,
            swipe_threshold: 12,
            swipe_time_limit_ms: 1000,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "worthlog", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override storage backend (local, rest, memory).
    #[arg(long)]
    backend: Option<String>,
    /// Override REST base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override local data file path.
    #[arg(long)]
    data_path: Option<String>,
    /// Override log file path.
    #[arg(long)]
    log_path: Option<String>,
    /// Override swipe threshold (cells).
    #[arg(long)]
    swipe_threshold: Option<u16>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("WORTHLOG"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(backend) = args.backend {
        settings.backend = backend;
    }
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(data_path) = args.data_path {
        settings.data_path = data_path;
    }
    if let Some(log_path) = args.log_path {
        settings.log_path = log_path;
    }
    if let Some(swipe_threshold) = args.swipe_threshold {
        settings.swipe_threshold = swipe_threshold;
    }

    Ok(settings)
}
