//! Core configuration types and data structures

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Backend URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Analysis window sent with anomaly and root-cause requests
pub const DEFAULT_TIME_PERIOD_HOURS: u32 = 24;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Monitoring backend configuration
    pub api: ApiConfig,
    /// UI configuration
    pub ui: UiConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Monitoring backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the monitoring backend
    pub base_url: String,
    /// Hours of history analysed by anomaly and root-cause requests
    pub time_period_hours: u32,
    /// Optional request timeout; unset means wait for the backend
    pub timeout_secs: Option<u64>,
    /// HTTP/HTTPS proxy for backend requests
    pub proxy: Option<String>,
    /// User agent sent to the backend; the HTTP client picks one when unset
    pub user_agent: Option<String>,
}

/// UI-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Interval between tick events in milliseconds
    pub tick_rate_ms: u64,
    /// Whether the sidebar starts open
    pub sidebar_open: bool,
    /// How many ticks a transient status message stays visible
    pub status_ttl_ticks: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level: trace, debug, info, warn or error
    pub level: String,
    /// Log file; defaults to the platform data directory
    pub file: Option<PathBuf>,
    /// Include targets, thread ids and source locations
    pub debug: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            time_period_hours: DEFAULT_TIME_PERIOD_HOURS,
            timeout_secs: None,
            proxy: None,
            user_agent: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            sidebar_open: true,
            status_ttl_ticks: 12,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            debug: false,
        }
    }
}

impl LoggingConfig {
    /// Resolve the log file, falling back to `<data dir>/hostlens/hostlens.log`
    pub fn resolved_file(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("hostlens")
                .join("hostlens.log")
        })
    }
}

/// Configuration manager trait
pub trait ConfigManager {
    /// Load configuration
    fn load_config(&mut self) -> Result<AppConfig, crate::error::ConfigError>;
    /// Save configuration
    fn save_config(&self, config: &AppConfig) -> Result<(), crate::error::ConfigError>;
    /// Validate configuration
    fn validate_config(&self, config: &AppConfig) -> Result<(), crate::error::ConfigError>;
}
