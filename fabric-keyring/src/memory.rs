//! In-process secret store.

use std::sync::RwLock;

use bytes::Bytes;
use fabric_primitives::{KeySerial, KeyringId};
use tracing::debug;

use crate::{DEFAULT_KEYRING, KeyringError, KeyringResult, SecretStore};

#[derive(Debug)]
struct StoredKey {
    serial: KeySerial,
    key_type: String,
    identity: String,
    data: Bytes,
    revoked: bool,
}

#[derive(Debug)]
struct Keyring {
    id: KeyringId,
    description: String,
    keys: Vec<StoredKey>,
}

#[derive(Debug)]
struct KeyringInner {
    keyrings: Vec<Keyring>,
    next_serial: i32,
}

impl KeyringInner {
    fn allocate(&mut self) -> KeyringResult<i32> {
        let serial = self.next_serial;
        self.next_serial = serial
            .checked_add(1)
            .ok_or_else(|| KeyringError::backend("key serial space exhausted"))?;
        Ok(serial)
    }

    fn keyring_mut(&mut self, id: KeyringId) -> KeyringResult<&mut Keyring> {
        self.keyrings
            .iter_mut()
            .find(|k| k.id == id)
            .ok_or(KeyringError::UnknownKeyring(id))
    }
}

/// Secret store kept entirely in process memory.
///
/// Serials are allocated from a single counter shared by keyrings and keys,
/// mirroring how the kernel numbers both from one namespace.
#[derive(Debug)]
pub struct MemoryKeyring {
    inner: RwLock<KeyringInner>,
}

impl MemoryKeyring {
    /// Creates a store containing only the default [`DEFAULT_KEYRING`] keyring.
    #[must_use]
    pub fn new() -> Self {
        Self::with_first_serial(1)
    }

    /// Creates a store whose serials start at `first_serial`; values below
    /// one start at one.
    ///
    /// Two stores started at different serials model two processes that
    /// assign different handles to the same keyring description.
    #[must_use]
    pub fn with_first_serial(first_serial: i32) -> Self {
        let id = KeyringId::new(first_serial).unwrap_or_else(KeyringId::first);
        Self {
            inner: RwLock::new(KeyringInner {
                keyrings: vec![Keyring {
                    id,
                    description: DEFAULT_KEYRING.to_owned(),
                    keys: Vec::new(),
                }],
                next_serial: id.get().saturating_add(1),
            }),
        }
    }

    /// Creates a keyring, or returns the existing one with that description.
    ///
    /// # Errors
    ///
    /// Returns [`KeyringError::Backend`] if the lock is poisoned or the serial
    /// space is exhausted.
    pub fn create_keyring(&self, description: &str) -> KeyringResult<KeyringId> {
        let mut inner = self.write()?;
        if let Some(existing) = inner.keyrings.iter().find(|k| k.description == description) {
            return Ok(existing.id);
        }
        let raw = inner.allocate()?;
        let id = KeyringId::new(raw).ok_or_else(|| KeyringError::backend("invalid serial"))?;
        inner.keyrings.push(Keyring {
            id,
            description: description.to_owned(),
            keys: Vec::new(),
        });
        debug!(keyring = %id, description, "created keyring");
        Ok(id)
    }

    /// Revokes a key; later reads fail with [`KeyringError::KeyRevoked`].
    ///
    /// # Errors
    ///
    /// Returns [`KeyringError::KeyNotFound`] when no key has that serial.
    pub fn revoke_key(&self, key: KeySerial) -> KeyringResult<()> {
        let mut inner = self.write()?;
        let stored = inner
            .keyrings
            .iter_mut()
            .flat_map(|k| k.keys.iter_mut())
            .find(|k| k.serial == key)
            .ok_or(KeyringError::KeyNotFound(key))?;
        stored.revoked = true;
        Ok(())
    }

    /// Finds a key by type and identity across all keyrings.
    ///
    /// # Errors
    ///
    /// Returns [`KeyringError::Backend`] if the lock is poisoned.
    pub fn search_key(&self, key_type: &str, identity: &str) -> KeyringResult<Option<KeySerial>> {
        let inner = self.read()?;
        Ok(inner
            .keyrings
            .iter()
            .flat_map(|k| k.keys.iter())
            .find(|k| !k.revoked && k.key_type == key_type && k.identity == identity)
            .map(|k| k.serial))
    }

    /// Returns the number of live keys across all keyrings.
    ///
    /// # Errors
    ///
    /// Returns [`KeyringError::Backend`] if the lock is poisoned.
    pub fn key_count(&self) -> KeyringResult<usize> {
        let inner = self.read()?;
        Ok(inner
            .keyrings
            .iter()
            .map(|k| k.keys.iter().filter(|key| !key.revoked).count())
            .sum())
    }

    fn read(&self) -> KeyringResult<std::sync::RwLockReadGuard<'_, KeyringInner>> {
        self.inner
            .read()
            .map_err(|_| KeyringError::backend("keyring lock poisoned"))
    }

    fn write(&self) -> KeyringResult<std::sync::RwLockWriteGuard<'_, KeyringInner>> {
        self.inner
            .write()
            .map_err(|_| KeyringError::backend("keyring lock poisoned"))
    }
}

impl Default for MemoryKeyring {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for MemoryKeyring {
    fn lookup_keyring(&self, description: &str) -> KeyringResult<KeyringId> {
        let inner = self.read()?;
        inner
            .keyrings
            .iter()
            .find(|k| k.description == description)
            .map(|k| k.id)
            .ok_or_else(|| KeyringError::KeyringNotFound {
                description: description.to_owned(),
            })
    }

    fn describe_keyring(&self, keyring: KeyringId) -> KeyringResult<String> {
        let inner = self.read()?;
        inner
            .keyrings
            .iter()
            .find(|k| k.id == keyring)
            .map(|k| k.description.clone())
            .ok_or(KeyringError::UnknownKeyring(keyring))
    }

    fn insert_key(
        &self,
        keyring: KeyringId,
        key_type: &str,
        identity: &str,
        data: &[u8],
    ) -> KeyringResult<KeySerial> {
        if data.is_empty() {
            return Err(KeyringError::InvalidKey("key material cannot be empty"));
        }
        let mut inner = self.write()?;
        inner.keyring_mut(keyring)?;
        let raw = inner.allocate()?;
        let serial = KeySerial::new(raw).ok_or_else(|| KeyringError::backend("invalid serial"))?;
        let ring = inner.keyring_mut(keyring)?;
        ring.keys
            .retain(|k| k.key_type != key_type || k.identity != identity);
        ring.keys.push(StoredKey {
            serial,
            key_type: key_type.to_owned(),
            identity: identity.to_owned(),
            data: Bytes::copy_from_slice(data),
            revoked: false,
        });
        debug!(keyring = %keyring, key = %serial, key_type, identity, "inserted key");
        Ok(serial)
    }

    fn read_key(&self, keyring: Option<KeyringId>, key: KeySerial) -> KeyringResult<Bytes> {
        let inner = self.read()?;
        if let Some(id) = keyring {
            if !inner.keyrings.iter().any(|k| k.id == id) {
                return Err(KeyringError::UnknownKeyring(id));
            }
        }
        let stored = inner
            .keyrings
            .iter()
            .filter(|k| keyring.is_none_or(|id| k.id == id))
            .flat_map(|k| k.keys.iter())
            .find(|k| k.serial == key)
            .ok_or(KeyringError::KeyNotFound(key))?;
        if stored.revoked {
            return Err(KeyringError::KeyRevoked(key));
        }
        Ok(stored.data.clone())
    }
}
