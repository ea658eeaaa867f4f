//! Shared error definitions for fabric primitives.

use thiserror::Error;
use uuid::Error as UuidError;

/// Result alias used throughout the fabric workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing fabric primitive types.
#[derive(Debug, Error)]
pub enum Error {
    /// The provided host identifier is not a UUID.
    #[error("invalid host id: {source}")]
    InvalidHostId {
        /// Source parsing error from the UUID library.
        #[from]
        source: UuidError,
    },

    /// NVMe Qualified Name failed validation.
    #[error("invalid nqn `{nqn}`: {reason}")]
    InvalidNqn {
        /// The offending name.
        nqn: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Transport string was empty.
    #[error("transport cannot be empty")]
    EmptyTransport,
}
