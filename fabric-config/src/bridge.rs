//! Bridge between interchange-format PSKs in the document and key handles
//! in the secret store.
//!
//! Every function takes the keyring it operates on as an argument. Failures
//! are logged and reported as `None` so the caller can carry on with the rest
//! of the record.

use fabric_keyring::{SecretStore, TlsPsk};
use fabric_primitives::{KeySerial, KeyringId, Nqn};
use tracing::{debug, error, warn};

/// Key type TLS pre-shared keys are stored under.
pub const PSK_KEY_TYPE: &str = "psk";

/// Builds the identity a configured PSK is filed under.
#[must_use]
pub fn psk_identity(hash_id: u8, hostnqn: &Nqn, subsysnqn: &Nqn) -> String {
    format!("NVMe0R{hash_id:02} {hostnqn} {subsysnqn}")
}

/// Resolves a keyring description to a handle.
pub fn resolve_keyring(store: &dyn SecretStore, description: &str) -> Option<KeyringId> {
    match store.lookup_keyring(description) {
        Ok(id) => Some(id),
        Err(err) => {
            warn!(keyring = description, error = %err, "cannot resolve keyring");
            None
        }
    }
}

/// Returns the portable description of a keyring handle.
pub fn describe_keyring(store: &dyn SecretStore, keyring: KeyringId) -> Option<String> {
    match store.describe_keyring(keyring) {
        Ok(description) => Some(description),
        Err(err) => {
            warn!(keyring = %keyring, error = %err, "cannot describe keyring");
            None
        }
    }
}

/// Decodes `encoded` and inserts the raw key into `keyring`.
pub fn import_tls_key(
    store: &dyn SecretStore,
    keyring: KeyringId,
    hostnqn: &Nqn,
    subsysnqn: &Nqn,
    encoded: &str,
) -> Option<KeySerial> {
    let psk = match TlsPsk::decode(encoded) {
        Ok(psk) => psk,
        Err(err) => {
            error!(%hostnqn, %subsysnqn, error = %err, "failed to decode TLS key");
            return None;
        }
    };
    let identity = psk_identity(psk.hash().id(), hostnqn, subsysnqn);
    match store.insert_key(keyring, PSK_KEY_TYPE, &identity, psk.key()) {
        Ok(serial) => {
            debug!(%keyring, key = %serial, identity = %identity, "imported TLS key");
            Some(serial)
        }
        Err(err) => {
            error!(%keyring, identity = %identity, error = %err, "failed to insert TLS key");
            None
        }
    }
}

/// Reads a stored key and renders it in interchange format.
pub fn export_tls_key(
    store: &dyn SecretStore,
    keyring: Option<KeyringId>,
    key: KeySerial,
) -> Option<String> {
    let raw = match store.read_key(keyring, key) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(key = %key, error = %err, "cannot read TLS key, omitting it");
            return None;
        }
    };
    match TlsPsk::new(raw) {
        Ok(psk) => Some(psk.encode()),
        Err(err) => {
            warn!(key = %key, error = %err, "stored TLS key cannot be exported");
            None
        }
    }
}
