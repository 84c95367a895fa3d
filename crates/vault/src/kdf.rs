//! PBKDF2-HMAC-SHA256 key derivation for PIN → vault key.
//!
//! The vault never stores a key — only the salt. The key is reconstructed
//! from (PIN, salt) on every unlock, so derivation must be deterministic.
//! 100,000 iterations slows offline brute force against a short PIN while
//! keeping unlock latency in the hundreds-of-milliseconds range.

use {pbkdf2::pbkdf2_hmac, sha2::Sha256, zeroize::Zeroizing};

/// PBKDF2 iteration count. Fixed: changing it would orphan existing vaults.
pub const ITERATIONS: u32 = 100_000;

/// Salt length in bytes. Generated once per vault at first-run setup.
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Derive a 256-bit key from a PIN and salt.
///
/// Deterministic: identical inputs always yield the identical key. Purely
/// CPU-bound — the session layer runs this on a blocking thread.
pub fn derive_key(pin: &[u8], salt: &[u8]) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(pin, salt, ITERATIONS, key.as_mut());
    key
}

/// Generate a random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    use rand::RngCore;

    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
