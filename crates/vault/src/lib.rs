//! Client-side encrypted bookmark vault.
//!
//! All bookmark data is encrypted at rest; a user-chosen PIN is stretched
//! into an AES-256 key via PBKDF2-HMAC-SHA256 and the collection is sealed
//! with AES-256-GCM into a `{salt, iv, ciphertext}` envelope stored as a
//! single row. Trait-based [`Cipher`] design allows swapping the encryption
//! backend.
//!
//! There is no stored key and no recovery path: a lost PIN means the data is
//! gone. Wrong PIN and corrupted ciphertext are intentionally reported as the
//! same error — the AEAD tag is the only correctness signal.

pub mod aes256gcm;
pub mod cipher;
pub mod envelope;
pub mod error;
pub mod kdf;
pub mod model;
pub mod session;

pub use {
    aes256gcm::Aes256GcmCipher,
    cipher::Cipher,
    envelope::Envelope,
    error::VaultError,
    model::Bookmark,
    session::{Vault, VaultStatus},
};

/// Run database migrations for the vault crate.
///
/// Creates the `vault_envelope` table. Call once at application startup
/// before constructing a [`Vault`].
pub async fn run_migrations(pool: &sqlx::SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .set_ignore_missing(true)
        .run(pool)
        .await?;
    Ok(())
}
