//! The persisted ciphertext envelope and its base64 codec.
//!
//! The envelope is the only thing ever written to storage: three base64
//! fields `{salt, iv, ciphertext}` serialized as one JSON document. The same
//! shape doubles as the export/import format.

use base64::Engine;

use crate::{cipher::NONCE_LEN, error::VaultError, kdf::SALT_LEN};

/// Encode bytes as standard base64. Total — never fails.
pub fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Decode standard base64 text back to bytes.
///
/// Fails with [`VaultError::Format`] on characters outside the alphabet or
/// invalid padding.
pub fn decode(text: &str) -> Result<Vec<u8>, VaultError> {
    base64::engine::general_purpose::STANDARD
        .decode(text)
        .map_err(|e| VaultError::Format(e.to_string()))
}

/// The persisted unit: salt, nonce, and ciphertext, each base64-encoded.
///
/// Overwritten wholesale on every mutation (fresh `iv`, fresh `ciphertext`,
/// same `salt`). None of the fields is secret.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Envelope {
    /// KDF salt, fixed for the lifetime of the vault.
    pub salt: String,
    /// AEAD nonce, fresh for every encryption.
    pub iv: String,
    /// AEAD output (integrity tag included).
    pub ciphertext: String,
}

impl Envelope {
    /// Build an envelope from raw cryptographic material.
    pub fn new(salt: &[u8], iv: &[u8], ciphertext: &[u8]) -> Self {
        Self {
            salt: encode(salt),
            iv: encode(iv),
            ciphertext: encode(ciphertext),
        }
    }

    /// Serialize to the JSON document stored and exported.
    pub fn to_json(&self) -> Result<String, VaultError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse an envelope document. Fails with [`VaultError::Format`].
    pub fn from_json(text: &str) -> Result<Self, VaultError> {
        serde_json::from_str(text).map_err(|e| VaultError::Format(e.to_string()))
    }

    /// Decode the salt field, enforcing the 16-byte salt length.
    pub fn salt_bytes(&self) -> Result<[u8; SALT_LEN], VaultError> {
        let bytes = decode(&self.salt)?;
        bytes
            .try_into()
            .map_err(|_| VaultError::Format("salt is not 16 bytes".to_string()))
    }

    /// Decode the nonce field, enforcing the 12-byte nonce length.
    pub fn iv_bytes(&self) -> Result<[u8; NONCE_LEN], VaultError> {
        let bytes = decode(&self.iv)?;
        bytes
            .try_into()
            .map_err(|_| VaultError::Format("iv is not 12 bytes".to_string()))
    }

    /// Decode the ciphertext field.
    pub fn ciphertext_bytes(&self) -> Result<Vec<u8>, VaultError> {
        decode(&self.ciphertext)
    }
}
