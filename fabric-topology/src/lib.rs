//! Live topology of an NVMe over Fabrics host.
//!
//! The tree is rooted at [`Root`], which owns [`Host`]s, which own
//! [`Subsystem`]s, which own [`Controller`]s. Nodes are only ever found or
//! created through the `lookup_*` methods; nothing here removes a node.

#![warn(missing_docs, clippy::pedantic)]

mod config;
mod controller;
mod error;
mod host;
mod root;
mod subsystem;

pub use config::{FabricsConfig, NVMF_DEF_CTRL_LOSS_TMO};
pub use controller::{Controller, ControllerKey};
pub use error::{TopologyError, TopologyResult};
pub use host::Host;
pub use root::Root;
pub use subsystem::Subsystem;
