//! Core types, configuration and errors for the `RoomSpa` admin dashboard

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod error;
pub mod format;
pub mod lenient;
pub mod types;

/// Simple error context handling for startup paths
pub mod context_error {
    use std::{error::Error as StdError, fmt};

    /// An error message with an optional underlying cause
    #[derive(Debug)]
    pub struct ContextError {
        source: Option<Box<dyn StdError + Send + Sync>>,
        message: String,
    }

    impl ContextError {
        /// Create a new context error from a message
        pub fn new<S: Into<String>>(message: S) -> Self {
            Self {
                source: None,
                message: message.into(),
            }
        }

        /// Wrap an existing error with context
        pub fn with_context<E, S>(error: E, message: S) -> Self
        where
            E: StdError + Send + Sync + 'static,
            S: Into<String>,
        {
            Self {
                source: Some(Box::new(error)),
                message: message.into(),
            }
        }
    }

    impl fmt::Display for ContextError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match &self.source {
                Some(source) => write!(f, "{}: {source}", self.message),
                None => f.write_str(&self.message),
            }
        }
    }

    impl StdError for ContextError {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn StdError + 'static))
        }
    }

    /// Result type alias for context errors
    pub type Result<T> = std::result::Result<T, ContextError>;

    /// Extension trait for adding context to results
    pub trait ResultExt<T> {
        /// Add context to an error
        ///
        /// # Errors
        ///
        /// Returns the original error wrapped with the supplied message.
        fn with_context<F, S>(self, f: F) -> Result<T>
        where
            F: FnOnce() -> S,
            S: Into<String>;
    }

    impl<T, E> ResultExt<T> for std::result::Result<T, E>
    where
        E: StdError + Send + Sync + 'static,
    {
        fn with_context<F, S>(self, f: F) -> Result<T>
        where
            F: FnOnce() -> S,
            S: Into<String>,
        {
            self.map_err(|e| ContextError::with_context(e, f()))
        }
    }

    impl From<crate::Error> for ContextError {
        fn from(err: crate::Error) -> Self {
            Self::with_context(err, "Startup failed")
        }
    }

    impl From<std::io::Error> for ContextError {
        fn from(err: std::io::Error) -> Self {
            Self::with_context(err, "I/O operation failed")
        }
    }
}

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};

/// Initialize the logging system
///
/// `RUST_LOG` wins over the configured level. A `format` of `json` selects
/// structured output; anything else prints human readable lines.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(logging: &config::LoggingConfig) -> context_error::Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let registry = tracing_subscriber::registry().with(filter);

    let result = if logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| context_error::ContextError::new(format!("Failed to initialize logging: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::context_error::{ContextError, ResultExt};
    use std::error::Error as StdError;

    #[test]
    fn test_context_error_keeps_source() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::AddrInUse,
            "port taken",
        ));
        let err = result.with_context(|| "Failed to bind").unwrap_err();

        assert_eq!(err.to_string(), "Failed to bind: port taken");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_context_error_without_source() {
        let err = ContextError::new("no backend configured");
        assert_eq!(err.to_string(), "no backend configured");
        assert!(err.source().is_none());
    }
}
