//! Secret store interface.

use bytes::Bytes;
use fabric_primitives::{KeySerial, KeyringId};

use crate::KeyringResult;

/// Description of the keyring NVMe keys are placed in unless told otherwise.
pub const DEFAULT_KEYRING: &str = ".nvme";

/// External store holding secret material by numeric handle.
///
/// Every call names its keyring explicitly; implementations must not rely on
/// a "current keyring" carried between calls.
pub trait SecretStore: Send + Sync {
    /// Resolves a keyring description to its handle.
    ///
    /// # Errors
    ///
    /// Returns [`crate::KeyringError::KeyringNotFound`] when no keyring has
    /// that description.
    fn lookup_keyring(&self, description: &str) -> KeyringResult<KeyringId>;

    /// Returns the description of a keyring, which is stable across
    /// processes while the handle is not.
    ///
    /// # Errors
    ///
    /// Returns [`crate::KeyringError::UnknownKeyring`] for a stale handle.
    fn describe_keyring(&self, keyring: KeyringId) -> KeyringResult<String>;

    /// Stores `data` as a key of `key_type` named `identity` in `keyring`,
    /// replacing any key with the same type and identity.
    ///
    /// # Errors
    ///
    /// Returns an error when the keyring does not exist or the backend
    /// rejects the key.
    fn insert_key(
        &self,
        keyring: KeyringId,
        key_type: &str,
        identity: &str,
        data: &[u8],
    ) -> KeyringResult<KeySerial>;

    /// Reads the raw bytes of a key. When `keyring` is given the key must
    /// live in it.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown, revoked, or misplaced keys.
    fn read_key(&self, keyring: Option<KeyringId>, key: KeySerial) -> KeyringResult<Bytes>;
}
