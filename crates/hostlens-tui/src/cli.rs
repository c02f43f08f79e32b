//! Command-line arguments for the `hostlens` binary

use std::path::PathBuf;

use clap::Parser;
use hostlens_config::{AppConfig, ConfigManager, ConfigManagerTrait, Result};

#[derive(Parser, Debug, Default)]
#[command(name = "hostlens")]
#[command(about = "Terminal dashboard for host metrics, anomaly detection and root-cause analysis")]
#[command(version)]
pub struct Args {
    /// Configuration file (default: <config dir>/hostlens/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Backend base URL, e.g. http://localhost:8000
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Hours of history used for anomaly and root-cause analysis
    #[arg(short = 't', long, value_name = "HOURS")]
    pub time_period: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Log file path
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Start with the sidebar collapsed
    #[arg(long)]
    pub no_sidebar: bool,
}

impl Args {
    /// Load configuration and layer the flags on top
    pub fn load_config(&self) -> Result<AppConfig> {
        let manager = match &self.config {
            Some(path) => ConfigManager::with_path(path.clone()),
            None => ConfigManager::new(),
        };
        let mut config = manager.load_unvalidated()?;
        self.apply_overrides(&mut config);
        manager.validate_config(&config)?;
        Ok(config)
    }

    /// Flags win over file and environment values
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(hours) = self.time_period {
            config.api.time_period_hours = hours;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
        if self.no_sidebar {
            config.ui.sidebar_open = false;
        }
    }
}
