//! Error types for topology resolution.

use fabric_primitives::Error as PrimitiveError;
use thiserror::Error;

/// Result alias for topology operations.
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Errors emitted while resolving topology nodes.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// An identity field failed validation.
    #[error("invalid identity: {0}")]
    InvalidIdentity(#[from] PrimitiveError),
}
