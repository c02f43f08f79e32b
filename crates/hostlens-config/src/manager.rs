//! Configuration manager implementation

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use tracing::debug;

use crate::{
    error::{ConfigError, Result},
    types::{AppConfig, ConfigManager as ConfigManagerTrait},
};

/// Shorthand variable for the backend URL, checked after the prefixed ones
pub const API_URL_ENV: &str = "HOSTLENS_API_URL";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration manager
pub struct ConfigManager {
    /// Configuration file path
    config_path: PathBuf,
    /// Environment prefix
    env_prefix: String,
    /// Replaces the process environment when set
    env_source: Option<HashMap<String, String>>,
}

impl ConfigManager {
    /// Create a new configuration manager
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    /// Create with custom config path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            env_prefix: "HOSTLENS".to_string(),
            env_source: None,
        }
    }

    /// Read environment variables from `vars` instead of the process environment
    pub fn with_environment(mut self, vars: HashMap<String, String>) -> Self {
        self.env_source = Some(vars);
        self
    }

    /// Path of the configuration file
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Get default config path
    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hostlens")
            .join("config.toml")
    }

    fn api_url_override(&self) -> Option<String> {
        match &self.env_source {
            Some(vars) => vars.get(API_URL_ENV).cloned(),
            None => std::env::var(API_URL_ENV).ok(),
        }
        .filter(|url| !url.trim().is_empty())
    }

    /// Layer defaults, file and environment without validating the result
    ///
    /// Callers that apply further overrides validate once they are done.
    pub fn load_unvalidated(&self) -> Result<AppConfig> {
        debug!("Loading configuration from {}", self.config_path.display());

        let environment = Environment::with_prefix(&self.env_prefix)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(self.env_source.clone());

        let builder = Config::builder()
            .add_source(
                File::from(self.config_path.clone())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(environment)
            .set_override_option("api.base_url", self.api_url_override())?;

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;
        Ok(app_config)
    }
}

impl ConfigManagerTrait for ConfigManager {
    fn load_config(&mut self) -> Result<AppConfig> {
        let config = self.load_unvalidated()?;
        self.validate_config(&config)?;
        Ok(config)
    }

    fn save_config(&self, config: &AppConfig) -> Result<()> {
        let toml = toml::to_string(config)?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config_path, toml)?;
        Ok(())
    }

    fn validate_config(&self, config: &AppConfig) -> Result<()> {
        let url = url::Url::parse(&config.api.base_url).map_err(|e| {
            ConfigError::Validation(format!(
                "Invalid backend URL '{}': {}",
                config.api.base_url, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "Backend URL must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if let Some(proxy) = &config.api.proxy {
            url::Url::parse(proxy).map_err(|e| {
                ConfigError::Validation(format!("Invalid proxy URL '{}': {}", proxy, e))
            })?;
        }
        if config.api.time_period_hours == 0 {
            return Err(ConfigError::Validation(
                "Time period must be at least one hour".to_string(),
            ));
        }
        if config.ui.tick_rate_ms == 0 {
            return Err(ConfigError::Validation(
                "Tick rate must be greater than 0".to_string(),
            ));
        }
        if !LOG_LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "Unknown log level '{}'",
                config.logging.level
            )));
        }
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
