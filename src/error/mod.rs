//! Error types for companion.

pub mod category;

pub use category::ErrorCategory;

use thiserror::Error;

/// Primary error type for all companion operations.
#[derive(Error, Debug)]
pub enum CompanionError {
    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Message content must not be empty")]
    EmptyMessage,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompanionError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a settings validation error for `field`.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication(_) => ErrorCategory::Auth,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Auth,
                _ => ErrorCategory::Request,
            },
            Self::Network(_) | Self::Serialization(_) | Self::Stream(_) => {
                ErrorCategory::Request
            }
            Self::Validation { .. } | Self::EmptyMessage => ErrorCategory::Validation,
            Self::Configuration(_) | Self::Io(_) => ErrorCategory::Local,
        }
    }

    /// Whether the session can carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        self.category() != ErrorCategory::Auth
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, CompanionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_api_status_is_auth() {
        let err = CompanionError::api(401, "bad key");
        assert_eq!(err.category(), ErrorCategory::Auth);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn server_error_is_request_and_recoverable() {
        let err = CompanionError::api(503, "overloaded");
        assert_eq!(err.category(), ErrorCategory::Request);
        assert!(err.is_recoverable());
    }

    #[test]
    fn validation_error_names_field() {
        let err = CompanionError::validation("temperature", "3.0 is outside 0.0..=2.0");
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(
            err.to_string(),
            "Invalid temperature: 3.0 is outside 0.0..=2.0"
        );
    }
}
