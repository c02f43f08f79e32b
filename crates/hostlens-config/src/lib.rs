//! HostLens Configuration Management
//!
//! Loads the dashboard configuration from a TOML file, `HOSTLENS_*`
//! environment variables and built-in defaults, in that order of precedence
//! (environment wins over file).

pub mod error;
pub mod manager;
pub mod types;

pub use error::{ConfigError, Result};
pub use manager::ConfigManager;
pub use types::{
    ApiConfig, AppConfig, ConfigManager as ConfigManagerTrait, LoggingConfig, UiConfig,
    DEFAULT_BASE_URL, DEFAULT_TIME_PERIOD_HOURS,
};
