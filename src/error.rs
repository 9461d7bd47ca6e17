//! Error types for trueno-anomaly operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in trueno-anomaly operations.
///
/// Every variant is a contract violation detected at a boundary (construction,
/// empty-state query, configuration loading, sink output). Classification
/// itself never fails.
#[derive(Error, Debug)]
pub enum Error {
    /// The newest value was requested from a window nothing was pushed into.
    #[error("sliding window is empty: no observation has been pushed")]
    EmptyWindow,

    /// Invalid configuration value, rejected at construction time.
    #[error("invalid configuration value for '{key}': {message}")]
    InvalidConfig {
        /// The configuration key with invalid value.
        key: &'static str,
        /// Why the value is invalid.
        message: String,
    },

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed, 0 if unknown).
        line: usize,
        /// Parser message.
        message: String,
    },

    /// Configuration file not found or unreadable.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// I/O error while writing observations to a sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Shorthand for [`Error::InvalidConfig`].
    pub(crate) fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key,
            message: message.into(),
        }
    }
}
