//! Tracing subscriber setup for native hosts.
//!
//! The layout crates only emit `tracing` events; installing a subscriber is
//! left to the application. [`init`] is the usual choice for binaries and
//! examples.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The default directive could not be parsed.
    #[error("Invalid log filter '{directive}': {message}")]
    InvalidFilter {
        /// The rejected directive.
        directive: String,
        /// Parser message.
        message: String,
    },

    /// A global subscriber is already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Build the filter: `RUST_LOG` when set, `default_directive` otherwise.
pub fn env_filter(default_directive: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(default_directive).map_err(|e| LoggingError::InvalidFilter {
        directive: default_directive.to_string(),
        message: e.to_string(),
    })
}

/// Install a formatting subscriber writing to stderr.
///
/// `default_directive` uses `EnvFilter` syntax, e.g. `"masonry_layout=debug"`.
pub fn init(default_directive: &str) -> Result<(), LoggingError> {
    let filter = env_filter(default_directive)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_accepts_directive() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let filter = env_filter("masonry_layout=debug,warn").unwrap();
        assert!(filter.to_string().contains("masonry_layout=debug"));
    }

    #[test]
    fn test_env_filter_rejects_garbage() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = env_filter("masonry_layout=loudest").unwrap_err();
        assert!(matches!(err, LoggingError::InvalidFilter { .. }));
        assert!(err.to_string().starts_with("Invalid log filter 'masonry_layout=loudest'"));
    }

    #[test]
    fn test_init_twice_fails() {
        let first = init("warn");
        let second = init("warn");
        assert!(first.is_ok() || matches!(first, Err(LoggingError::AlreadyInitialized(_))));
        assert!(matches!(second, Err(LoggingError::AlreadyInitialized(_))));
    }
}
