//! TLS pre-shared key interchange format.
//!
//! A configured PSK is exchanged as
//! `NVMeTLSkey-1:<hh>:<base64(key || crc32(key) as little-endian)>:`
//! where `<hh>` names the hash the key is meant for.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;

use crate::{KeyringError, KeyringResult, crc32};

/// Leading tag of every interchange-format PSK.
pub const PSK_PREFIX: &str = "NVMeTLSkey-1:";

/// Hash function a PSK is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PskHash {
    /// SHA-256, 32-byte keys.
    Sha256,
    /// SHA-384, 48-byte keys.
    Sha384,
}

impl PskHash {
    /// Returns the identifier used in the interchange string and key identity.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Sha256 => 1,
            Self::Sha384 => 2,
        }
    }

    /// Returns the key length mandated for this hash.
    #[must_use]
    pub const fn key_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
        }
    }

    /// Maps an interchange identifier back to a hash.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Sha256),
            2 => Some(Self::Sha384),
            _ => None,
        }
    }

    /// Infers the hash from a raw key length.
    #[must_use]
    pub const fn from_key_len(len: usize) -> Option<Self> {
        match len {
            32 => Some(Self::Sha256),
            48 => Some(Self::Sha384),
            _ => None,
        }
    }
}

/// Raw PSK bytes together with the hash they are bound to.
#[derive(Clone, PartialEq, Eq)]
pub struct TlsPsk {
    hash: PskHash,
    key: Bytes,
}

impl std::fmt::Debug for TlsPsk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsPsk")
            .field("hash", &self.hash)
            .field("key_len", &self.key.len())
            .finish_non_exhaustive()
    }
}

impl TlsPsk {
    /// Wraps raw key bytes, inferring the hash from their length.
    ///
    /// # Errors
    ///
    /// Returns [`KeyringError::InvalidKey`] unless the key is 32 or 48 bytes.
    pub fn new(key: impl Into<Bytes>) -> KeyringResult<Self> {
        let key = key.into();
        let hash = PskHash::from_key_len(key.len())
            .ok_or(KeyringError::InvalidKey("psk must be 32 or 48 bytes"))?;
        Ok(Self { hash, key })
    }

    /// Parses an interchange-format PSK.
    ///
    /// # Errors
    ///
    /// Returns [`KeyringError::InvalidKey`] when the prefix, hash identifier,
    /// base64 body, length, or CRC is wrong.
    pub fn decode(encoded: &str) -> KeyringResult<Self> {
        let rest = encoded
            .strip_prefix(PSK_PREFIX)
            .ok_or(KeyringError::InvalidKey("missing NVMeTLSkey-1 prefix"))?;
        let (hash_field, body) = rest
            .split_once(':')
            .ok_or(KeyringError::InvalidKey("missing hash identifier"))?;
        if hash_field.len() != 2 {
            return Err(KeyringError::InvalidKey("hash identifier must be two hex digits"));
        }
        let hash = u8::from_str_radix(hash_field, 16)
            .ok()
            .and_then(PskHash::from_id)
            .ok_or(KeyringError::InvalidKey("unsupported hash identifier"))?;
        let body = body
            .strip_suffix(':')
            .ok_or(KeyringError::InvalidKey("missing trailing ':'"))?;
        let decoded = STANDARD
            .decode(body)
            .map_err(|_| KeyringError::InvalidKey("key material is not valid base64"))?;
        if decoded.len() != hash.key_len() + 4 {
            return Err(KeyringError::InvalidKey("key length does not match hash"));
        }
        let (key, crc) = decoded.split_at(hash.key_len());
        let expected = u32::from_le_bytes([crc[0], crc[1], crc[2], crc[3]]);
        if crc32(key) != expected {
            return Err(KeyringError::InvalidKey("crc mismatch"));
        }
        Ok(Self {
            hash,
            key: Bytes::copy_from_slice(key),
        })
    }

    /// Renders the key in interchange format.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut raw = Vec::with_capacity(self.key.len() + 4);
        raw.extend_from_slice(&self.key);
        raw.extend_from_slice(&crc32(&self.key).to_le_bytes());
        format!("{PSK_PREFIX}{:02x}:{}:", self.hash.id(), STANDARD.encode(raw))
    }

    /// Returns the hash the key is bound to.
    #[must_use]
    pub const fn hash(&self) -> PskHash {
        self.hash
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub fn key(&self) -> &Bytes {
        &self.key
    }
}
