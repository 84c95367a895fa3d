//! Cipher trait for swappable authenticated encryption backends.

use crate::error::VaultError;

/// AEAD nonce length in bytes. The envelope stores the nonce as its own
/// field, so all backends must agree on this length.
pub const NONCE_LEN: usize = 12;

/// Trait for authenticated encryption of the serialized collection.
///
/// Implementations can be swapped without changing the rest of the vault.
/// Whole-blob operation only — the plaintext is small.
pub trait Cipher: Send + Sync {
    /// Encrypt `plaintext` with `key`, drawing a fresh random nonce
    /// internally. Callers never supply or reuse nonces.
    fn encrypt(
        &self,
        key: &[u8; 32],
        plaintext: &[u8],
    ) -> Result<([u8; NONCE_LEN], Vec<u8>), VaultError>;

    /// Decrypt a ciphertext produced by [`encrypt`](Self::encrypt).
    ///
    /// Fails with [`VaultError::WrongPin`] when the integrity tag does not
    /// verify — wrong key and corrupted ciphertext are indistinguishable.
    fn decrypt(
        &self,
        key: &[u8; 32],
        nonce: &[u8; NONCE_LEN],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, VaultError>;
}
