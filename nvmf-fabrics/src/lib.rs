//! NVMe over Fabrics configuration facade.
//!
//! Bundles the fabric crates behind feature flags. With the default features
//! a caller can build a live topology, bridge TLS keys into a secret store,
//! and persist the whole thing as a JSON document.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared identifiers and transport types.
pub use fabric_primitives as primitives;

/// Host, subsystem, and controller tree (enabled by `topology` feature).
#[cfg(feature = "topology")]
pub use fabric_topology as topology;

/// Secret store and PSK interchange format (enabled by `keyring` feature).
#[cfg(feature = "keyring")]
pub use fabric_keyring as keyring;

/// JSON persistence (enabled by `config` feature).
#[cfg(feature = "config")]
pub use fabric_config as config;
