//! AES-256-GCM implementation of the [`Cipher`] trait.

use {
    aes_gcm::{
        Aes256Gcm, Nonce,
        aead::{Aead, KeyInit},
    },
    rand::RngCore,
};

use crate::{
    cipher::{Cipher, NONCE_LEN},
    error::VaultError,
};

/// AES-256-GCM AEAD cipher. 12-byte nonce, 16-byte tag appended to the
/// ciphertext by the AEAD itself.
pub struct Aes256GcmCipher;

impl Cipher for Aes256GcmCipher {
    fn encrypt(
        &self,
        key: &[u8; 32],
        plaintext: &[u8],
    ) -> Result<([u8; NONCE_LEN], Vec<u8>), VaultError> {
        let cipher = Aes256Gcm::new(key.into());

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| VaultError::Crypto(e.to_string()))?;

        Ok((nonce_bytes, ciphertext))
    }

    fn decrypt(
        &self,
        key: &[u8; 32],
        nonce: &[u8; NONCE_LEN],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, VaultError> {
        let cipher = Aes256Gcm::new(key.into());

        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| VaultError::WrongPin)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let cipher = Aes256GcmCipher;
        let key = [0x42u8; 32];
        let plaintext = b"[{\"url\":\"https://example.com\"}]";

        let (nonce, ciphertext) = cipher.encrypt(&key, plaintext).unwrap();
        let decrypted = cipher.decrypt(&key, &nonce, &ciphertext).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn wrong_key_fails_with_wrong_pin() {
        let cipher = Aes256GcmCipher;
        let key1 = [0x42u8; 32];
        let key2 = [0x43u8; 32];

        let (nonce, ciphertext) = cipher.encrypt(&key1, b"secret").unwrap();
        let result = cipher.decrypt(&key2, &nonce, &ciphertext);
        assert!(matches!(result, Err(VaultError::WrongPin)));
    }

    #[test]
    fn tampered_ciphertext_fails_with_wrong_pin() {
        let cipher = Aes256GcmCipher;
        let key = [0x42u8; 32];

        let (nonce, mut ciphertext) = cipher.encrypt(&key, b"secret").unwrap();
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0x01;
        let result = cipher.decrypt(&key, &nonce, &ciphertext);
        assert!(matches!(result, Err(VaultError::WrongPin)));
    }

    #[test]
    fn fresh_nonce_per_encryption() {
        let cipher = Aes256GcmCipher;
        let key = [0x42u8; 32];

        let (nonce1, ct1) = cipher.encrypt(&key, b"same input").unwrap();
        let (nonce2, ct2) = cipher.encrypt(&key, b"same input").unwrap();
        assert_ne!(nonce1, nonce2);
        assert_ne!(ct1, ct2);
    }

    #[test]
    fn empty_plaintext_round_trip() {
        let cipher = Aes256GcmCipher;
        let key = [0x42u8; 32];

        let (nonce, ciphertext) = cipher.encrypt(&key, b"").unwrap();
        let decrypted = cipher.decrypt(&key, &nonce, &ciphertext).unwrap();
        assert!(decrypted.is_empty());
    }
}
