//! Secret material handling for NVMe over Fabrics.
//!
//! Raw key bytes live only inside a [`SecretStore`]; everything else refers
//! to them through [`KeyringId`](fabric_primitives::KeyringId) and
//! [`KeySerial`](fabric_primitives::KeySerial) handles. [`TlsPsk`] converts
//! between raw bytes and the textual PSK interchange format.

#![warn(missing_docs, clippy::pedantic)]

mod crc32;
mod error;
mod memory;
mod psk;
mod store;

pub use crc32::crc32;
pub use error::{KeyringError, KeyringResult};
pub use memory::MemoryKeyring;
pub use psk::{PSK_PREFIX, PskHash, TlsPsk};
pub use store::{DEFAULT_KEYRING, SecretStore};
