//! Error types for the HostLens terminal dashboard

use hostlens_api::ApiError;
use hostlens_config::ConfigError;
use hostlens_http::HttpError;
use thiserror::Error;

/// Result type for TUI operations
pub type TuiResult<T> = Result<T, TuiError>;

/// Start-up and terminal failures; backend errors never reach this type
/// once the dashboard is running
#[derive(Error, Debug)]
pub enum TuiError {
    /// IO errors (terminal, log file)
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP client construction errors
    #[error("HTTP client error: {0}")]
    Http(#[from] HttpError),

    /// Backend client construction errors
    #[error("API client error: {0}")]
    Api(#[from] ApiError),

    /// Logging could not be initialized
    #[error("Logging error: {message}")]
    Logging { message: String },
}
