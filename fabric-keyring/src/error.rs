//! Error types for the secret store and PSK codec.

use fabric_primitives::{KeySerial, KeyringId};
use thiserror::Error;

/// Errors emitted by secret store and key codec operations.
#[derive(Debug, Error)]
pub enum KeyringError {
    /// No keyring carries the requested description.
    #[error("keyring `{description}` not found")]
    KeyringNotFound {
        /// Description that was looked up.
        description: String,
    },
    /// The keyring handle does not refer to a live keyring.
    #[error("unknown keyring {0}")]
    UnknownKeyring(KeyringId),
    /// The key serial does not refer to a stored key.
    #[error("key {0} not found")]
    KeyNotFound(KeySerial),
    /// The key exists but has been revoked.
    #[error("key {0} has been revoked")]
    KeyRevoked(KeySerial),
    /// Key material could not be decoded or has the wrong shape.
    #[error("invalid key material: {0}")]
    InvalidKey(&'static str),
    /// The store backend failed.
    #[error("secret store error: {reason}")]
    Backend {
        /// Human-readable reason describing the failure.
        reason: String,
    },
}

impl KeyringError {
    /// Helper to construct backend errors from string-like values.
    #[must_use]
    pub fn backend(reason: impl Into<String>) -> Self {
        Self::Backend {
            reason: reason.into(),
        }
    }
}

/// Result type alias for secret store operations.
pub type KeyringResult<T> = Result<T, KeyringError>;
