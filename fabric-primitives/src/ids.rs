//! Host identifiers and secret store handles.

use std::fmt::{self, Display, Formatter};
use std::num::{NonZeroI32, NonZeroU8};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;

/// Host identifier sent alongside the host NQN when connecting.
///
/// Stored verbatim so that documents written by other tools survive a round
/// trip; [`HostId::uuid`] parses it when a caller needs the UUID form.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostId(String);

impl HostId {
    /// Wraps an existing host identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a random UUID-based host identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the identifier as a UUID.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidHostId`] when the identifier is not a UUID.
    pub fn uuid(&self) -> Result<Uuid> {
        Ok(Uuid::parse_str(&self.0)?)
    }
}

impl Display for HostId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Uuid> for HostId {
    fn from(value: Uuid) -> Self {
        Self(value.to_string())
    }
}

/// Handle of a keyring inside the secret store.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyringId(NonZeroI32);

impl KeyringId {
    /// Creates a handle from a raw serial; zero and negative values mean
    /// "no keyring" and yield `None`.
    #[must_use]
    pub fn new(raw: i32) -> Option<Self> {
        if raw <= 0 {
            return None;
        }
        NonZeroI32::new(raw).map(Self)
    }

    /// Returns the lowest valid handle.
    #[must_use]
    pub fn first() -> Self {
        Self(NonZeroI32::from(NonZeroU8::MIN))
    }

    /// Returns the raw serial.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0.get()
    }
}

impl Display for KeyringId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0.get())
    }
}

/// Serial number of a key held by the secret store.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeySerial(NonZeroI32);

impl KeySerial {
    /// Creates a serial from a raw value; zero and negative values yield `None`.
    #[must_use]
    pub fn new(raw: i32) -> Option<Self> {
        if raw <= 0 {
            return None;
        }
        NonZeroI32::new(raw).map(Self)
    }

    /// Returns the raw serial.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0.get()
    }
}

impl Display for KeySerial {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0.get())
    }
}
