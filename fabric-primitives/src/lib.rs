//! Core shared types for NVMe over Fabrics configuration persistence.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod ids;
mod nqn;
mod transport;

/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Host identifiers and secret store handles.
pub use ids::{HostId, KeySerial, KeyringId};
/// NVMe Qualified Names and the well-known discovery NQN.
pub use nqn::{NVME_DISC_SUBSYS_NAME, Nqn};
/// Transport kinds a controller can be reached over.
pub use transport::Transport;
