//! Error types for configuration persistence.

use thiserror::Error;

/// Errors returned by load, store, and dump operations.
///
/// Only resource and format problems surface here. Problems with a single
/// record or secret are logged and skipped instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the document failed.
    #[error("i/o error: {source}")]
    Io {
        /// Source [`std::io::Error`].
        #[from]
        source: std::io::Error,
    },
    /// The document is not well-formed JSON.
    #[error("malformed configuration document: {source}")]
    Parse {
        /// Source [`serde_json::Error`].
        source: serde_json::Error,
    },
    /// The document parsed but has the wrong top-level shape.
    #[error("wrong configuration format: {0}")]
    Format(&'static str),
    /// Persistence options failed validation.
    #[error("invalid configuration options: {0}")]
    InvalidOptions(&'static str),
}

impl ConfigError {
    /// Returns `true` for errors caused by document content rather than by
    /// the environment.
    #[must_use]
    pub const fn is_protocol_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Format(_))
    }
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
