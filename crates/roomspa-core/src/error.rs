//! Error types for the RoomSpa admin dashboard

use thiserror::Error;

/// Main error type shared by the client and the web layer
#[derive(Debug, Error)]
pub enum Error {
    /// The backend could not be reached or the connection broke mid-request
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success HTTP status and no envelope
    #[error("Backend returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Status reason or response excerpt
        message: String,
    },

    /// The backend answered with `success: false`
    #[error("Request rejected: {message}")]
    Rejected {
        /// Message supplied by the backend, or a generic fallback
        message: String,
    },

    /// The envelope reported success but carried no `data`
    #[error("Response carried no data")]
    MissingData,

    /// The response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Form or parameter validation error
    #[error("Validation error: {field} - {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a rejection from an optional backend message
    #[must_use]
    pub fn rejected(message: Option<String>) -> Self {
        Self::Rejected {
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "The server rejected the request".to_string()),
        }
    }

    /// Message suitable for an inline alert in the dashboard
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message } => message.clone(),
            Self::Validation { message, .. } => message.clone(),
            Self::Transport(_) => "Could not reach the server. Please try again.".to_string(),
            Self::Status { status, .. } if *status == 401 || *status == 403 => {
                "Your session is not authorized for this action.".to_string()
            }
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// Whether the backend refused the credentials attached to the request
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let (field, message) = errors
            .field_errors()
            .into_iter()
            .min_by_key(|(field, _)| field.clone())
            .and_then(|(field, errs)| {
                errs.first().map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map_or_else(|| format!("{field} is invalid"), ToString::to_string);
                    (field.to_string(), message)
                })
            })
            .unwrap_or_else(|| ("form".to_string(), "Invalid input".to_string()));

        Self::Validation { field, message }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::error::Error as StdError;
    use std::io;

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let app_error = Error::from(io_error);

        assert!(matches!(app_error, Error::Io(_)));
        assert!(app_error.to_string().contains("I/O error"));
        assert!(app_error.source().is_some());
    }

    #[test]
    fn test_status_error_display() {
        let error = Error::Status {
            status: 502,
            message: "Bad Gateway".to_string(),
        };
        assert_eq!(error.to_string(), "Backend returned HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_rejected_uses_backend_message() {
        let error = Error::rejected(Some("unavailable".to_string()));
        assert_eq!(error.to_string(), "Request rejected: unavailable");
        assert_eq!(error.user_message(), "unavailable");
    }

    #[test]
    fn test_rejected_falls_back_on_blank_message() {
        let error = Error::rejected(Some("   ".to_string()));
        assert_eq!(error.user_message(), "The server rejected the request");

        let error = Error::rejected(None);
        assert_eq!(error.user_message(), "The server rejected the request");
    }

    #[test]
    fn test_unauthorized_detection() {
        let error = Error::Status {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert!(error.is_unauthorized());
        assert!(!Error::MissingData.is_unauthorized());
    }

    #[test]
    fn test_transport_message_is_generic() {
        let error = Error::Transport("connection refused".to_string());
        assert_eq!(
            error.user_message(),
            "Could not reach the server. Please try again."
        );
    }

    #[test]
    fn test_serialization_error_source() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let app_error = Error::from(json_error);

        assert!(matches!(app_error, Error::Serialization(_)));
        assert!(app_error.source().is_some());
    }

    #[test]
    fn test_validation_errors_conversion() {
        use validator::Validate;

        #[derive(Validate)]
        struct Probe {
            #[validate(length(min = 1, message = "Code is required"))]
            code: String,
        }

        let errors = Probe {
            code: String::new(),
        }
        .validate()
        .unwrap_err();

        match Error::from(errors) {
            Error::Validation { field, message } => {
                assert_eq!(field, "code");
                assert_eq!(message, "Code is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
