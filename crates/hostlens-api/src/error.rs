//! Error types for the monitoring API client

use hostlens_http::HttpError;
use thiserror::Error;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by [`crate::MonitoringApi`] calls
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ApiError {
    /// Backend unreachable: connection refused, DNS failure, reset
    #[error("Transport error: {0}")]
    Transport(String),

    /// Backend answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Client-side precondition failed; nothing was sent
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ApiError {
    /// Whether the failure happened on the way to or from the backend
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Decode(_))
    }

    /// Short message suitable for a status line
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => "Backend unreachable".to_string(),
            ApiError::Http { status, body } if body.trim().is_empty() => {
                format!("Backend returned HTTP {}", status)
            }
            ApiError::Http { status, body } => {
                format!("Backend returned HTTP {}: {}", status, first_line(body))
            }
            ApiError::Decode(_) => "Backend sent an unexpected response".to_string(),
            ApiError::Validation(msg) => msg.clone(),
        }
    }
}

fn first_line(text: &str) -> &str {
    let line = text.lines().next().unwrap_or_default().trim();
    match line.char_indices().nth(120) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::HttpStatus { status, message } => ApiError::Http {
                status: status.as_u16(),
                body: message,
            },
            HttpError::RequestFailed(e) if e.is_decode() => ApiError::Decode(e.to_string()),
            HttpError::RequestFailed(e) => ApiError::Transport(e.to_string()),
            other => ApiError::Transport(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_to_http_variant() {
        let err: ApiError = HttpError::HttpStatus {
            status: hostlens_http::StatusCode::NOT_FOUND,
            message: "Host not found".to_string(),
        }
        .into();

        assert_eq!(
            err,
            ApiError::Http {
                status: 404,
                body: "Host not found".to_string()
            }
        );
        assert!(!err.is_transport());
        assert_eq!(err.user_message(), "Backend returned HTTP 404: Host not found");
    }

    #[test]
    fn test_invalid_url_counts_as_transport() {
        let err: ApiError = HttpError::InvalidUrl("relative URL without a base".to_string()).into();
        assert!(err.is_transport());
        assert_eq!(err.user_message(), "Backend unreachable");
    }

    #[test]
    fn test_user_message_is_never_empty() {
        let errors = [
            ApiError::Transport(String::new()),
            ApiError::Http { status: 500, body: String::new() },
            ApiError::Decode(String::new()),
            ApiError::Validation("No host selected".to_string()),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "{:?}", err);
        }
    }

    #[test]
    fn test_long_bodies_are_cut_to_one_short_line() {
        let body = format!("{}\ntraceback", "x".repeat(300));
        let err = ApiError::Http { status: 500, body };
        let message = err.user_message();

        assert!(!message.contains("traceback"));
        assert!(message.len() < 160);
    }
}
