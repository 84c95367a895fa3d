//! Vault session state machine: initialize, lock/unlock, mutate, import/export.
//!
//! The session is an explicit handle — one in-memory key/collection pair
//! owned by the caller, never ambient global state. Every state-changing
//! operation holds the write guard for its whole read-derive-encrypt-persist
//! sequence, so concurrent unlocks and mutations are serialized rather than
//! interleaved.

use {sqlx::SqlitePool, tokio::sync::RwLock, zeroize::Zeroizing};

use crate::{
    aes256gcm::Aes256GcmCipher,
    cipher::{Cipher, NONCE_LEN},
    envelope::Envelope,
    error::VaultError,
    kdf::{self, KEY_LEN, SALT_LEN},
    model::{self, Bookmark},
};

/// Vault status exposed to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaultStatus {
    /// No envelope exists yet — first-run setup required.
    Uninitialized,
    /// Envelope exists but no key is in memory.
    Locked,
    /// Key and plaintext collection are held in memory.
    Unlocked,
    /// The stored envelope cannot be parsed. Only `reset` recovers.
    Corrupted,
}

/// In-memory state of an unlocked vault. Dropped (key zeroized) on lock.
struct Session {
    key: Zeroizing<[u8; KEY_LEN]>,
    salt: [u8; SALT_LEN],
    collection: Vec<Bookmark>,
}

/// The encrypted bookmark vault.
///
/// Generic over [`Cipher`] but defaults to [`Aes256GcmCipher`]. `None` behind
/// the lock means locked. A lost PIN means permanent data loss: there is no
/// stored key and no recovery path.
pub struct Vault<C: Cipher = Aes256GcmCipher> {
    pool: SqlitePool,
    cipher: C,
    session: RwLock<Option<Session>>,
}

impl Vault<Aes256GcmCipher> {
    /// Create a vault handle with the default AES-256-GCM cipher.
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_cipher(pool, Aes256GcmCipher)
    }
}

impl<C: Cipher> Vault<C> {
    /// Create a vault handle with a custom cipher.
    pub fn with_cipher(pool: SqlitePool, cipher: C) -> Self {
        Self {
            pool,
            cipher,
            session: RwLock::new(None),
        }
    }

    /// Query the current vault status.
    pub async fn status(&self) -> Result<VaultStatus, VaultError> {
        match self.load_stored().await? {
            None => Ok(VaultStatus::Uninitialized),
            Some(text) => {
                if parse_stored(&text).is_err() {
                    return Ok(VaultStatus::Corrupted);
                }
                let guard = self.session.read().await;
                if guard.is_some() {
                    Ok(VaultStatus::Unlocked)
                } else {
                    Ok(VaultStatus::Locked)
                }
            },
        }
    }

    /// First-run setup: new salt, derived key, encrypted empty collection.
    ///
    /// Valid only when no envelope exists. On persistence failure the error
    /// is [`VaultError::Setup`] and the vault remains uninitialized.
    pub async fn initialize(&self, pin: &str) -> Result<(), VaultError> {
        let mut guard = self.session.write().await;

        if self.load_stored().await?.is_some() {
            return Err(VaultError::AlreadyInitialized);
        }

        let salt = kdf::generate_salt();
        let key = derive_off_thread(pin, &salt).await?;

        let collection = Vec::new();
        let plaintext = model::serialize_collection(&collection)?;
        let (iv, ciphertext) = self.cipher.encrypt(&key, &plaintext)?;
        let envelope = Envelope::new(&salt, &iv, &ciphertext);

        sqlx::query("INSERT INTO vault_envelope (id, envelope) VALUES (1, ?)")
            .bind(envelope.to_json()?)
            .execute(&self.pool)
            .await
            .map_err(|e| VaultError::Setup(e.to_string()))?;

        *guard = Some(Session {
            key,
            salt,
            collection,
        });

        #[cfg(feature = "tracing")]
        tracing::info!("vault initialized");

        Ok(())
    }

    /// Unlock with a PIN: derive the key from (PIN, stored salt) and attempt
    /// authenticated decryption.
    ///
    /// Tag-verification failure surfaces as [`VaultError::WrongPin`] and the
    /// vault stays locked; a stored envelope that cannot even be parsed
    /// surfaces as [`VaultError::CorruptedStore`].
    pub async fn unlock(&self, pin: &str) -> Result<(), VaultError> {
        let mut guard = self.session.write().await;

        let stored = self
            .load_stored()
            .await?
            .ok_or(VaultError::NotInitialized)?;
        let (salt, iv, ciphertext) = parse_stored(&stored)?;

        let key = derive_off_thread(pin, &salt).await?;
        let plaintext = self.cipher.decrypt(&key, &iv, &ciphertext)?;

        // The tag verified, so unparsable plaintext can only mean the store
        // was edited out of band.
        let collection = model::deserialize_collection(&plaintext)
            .map_err(|e| VaultError::CorruptedStore(e.to_string()))?;

        *guard = Some(Session {
            key,
            salt,
            collection,
        });

        #[cfg(feature = "tracing")]
        tracing::info!("vault unlocked");

        Ok(())
    }

    /// Drop the in-memory key and collection. Idempotent.
    pub async fn lock(&self) {
        *self.session.write().await = None;

        #[cfg(feature = "tracing")]
        tracing::info!("vault locked");
    }

    /// Whether a key is currently held in memory.
    pub async fn is_unlocked(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// The in-memory collection. Valid only when unlocked.
    pub async fn collection(&self) -> Result<Vec<Bookmark>, VaultError> {
        let guard = self.session.read().await;
        let session = guard.as_ref().ok_or(VaultError::Locked)?;
        Ok(session.collection.clone())
    }

    /// Replace the collection: re-serialize, re-encrypt with a fresh nonce
    /// under the session key, and overwrite the whole stored envelope.
    ///
    /// Every add/edit/delete/read-toggle/visit-update funnels through here.
    /// There is no partial persistence — the envelope is rewritten atomically
    /// each time.
    pub async fn mutate(&self, collection: Vec<Bookmark>) -> Result<(), VaultError> {
        let mut guard = self.session.write().await;
        let session = guard.as_mut().ok_or(VaultError::Locked)?;

        let plaintext = model::serialize_collection(&collection)?;
        let (iv, ciphertext) = self.cipher.encrypt(&session.key, &plaintext)?;
        let envelope = Envelope::new(&session.salt, &iv, &ciphertext);

        sqlx::query(
            "UPDATE vault_envelope SET envelope = ?, updated_at = datetime('now') WHERE id = 1",
        )
        .bind(envelope.to_json()?)
        .execute(&self.pool)
        .await?;

        session.collection = collection;
        Ok(())
    }

    /// Dump the persisted envelope as its JSON document. Valid only when
    /// unlocked.
    pub async fn export_envelope(&self) -> Result<String, VaultError> {
        let guard = self.session.read().await;
        if guard.is_none() {
            return Err(VaultError::Locked);
        }
        self.load_stored().await?.ok_or(VaultError::NotInitialized)
    }

    /// Restore wholesale from a foreign envelope document and its PIN.
    ///
    /// A special case of unlock against a caller-supplied envelope: on
    /// success both the persisted envelope and the in-memory session are
    /// replaced. No merge. Parse failures are [`VaultError::Format`] (the
    /// document came from the caller, not the store).
    pub async fn import_envelope(&self, document: &str, pin: &str) -> Result<(), VaultError> {
        let mut guard = self.session.write().await;

        let envelope = Envelope::from_json(document)?;
        let salt = envelope.salt_bytes()?;
        let iv = envelope.iv_bytes()?;
        let ciphertext = envelope.ciphertext_bytes()?;

        let key = derive_off_thread(pin, &salt).await?;
        let plaintext = self.cipher.decrypt(&key, &iv, &ciphertext)?;
        let collection = model::deserialize_collection(&plaintext)
            .map_err(|e| VaultError::Format(e.to_string()))?;

        // Persist the normalized form, replacing whatever was stored.
        sqlx::query(
            "INSERT INTO vault_envelope (id, envelope) VALUES (1, ?)
             ON CONFLICT(id) DO UPDATE SET envelope = excluded.envelope,
                                           updated_at = datetime('now')",
        )
        .bind(envelope.to_json()?)
        .execute(&self.pool)
        .await?;

        *guard = Some(Session {
            key,
            salt,
            collection,
        });

        #[cfg(feature = "tracing")]
        tracing::info!("vault restored from imported envelope");

        Ok(())
    }

    /// Destroy the stored envelope and drop the session: back to first-run.
    ///
    /// The only recovery from a corrupted store.
    pub async fn reset(&self) -> Result<(), VaultError> {
        let mut guard = self.session.write().await;

        sqlx::query("DELETE FROM vault_envelope WHERE id = 1")
            .execute(&self.pool)
            .await?;
        *guard = None;

        #[cfg(feature = "tracing")]
        tracing::warn!("vault reset, stored envelope destroyed");

        Ok(())
    }

    /// Load the stored envelope document, if any.
    async fn load_stored(&self) -> Result<Option<String>, VaultError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT envelope FROM vault_envelope WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(envelope,)| envelope))
    }
}

/// Parse the stored envelope document into raw cryptographic material.
///
/// Any failure here is [`VaultError::CorruptedStore`] — the text came from
/// our own store, so it is corruption, not caller input.
fn parse_stored(
    text: &str,
) -> Result<([u8; SALT_LEN], [u8; NONCE_LEN], Vec<u8>), VaultError> {
    let envelope = Envelope::from_json(text).map_err(as_corrupted)?;
    let salt = envelope.salt_bytes().map_err(as_corrupted)?;
    let iv = envelope.iv_bytes().map_err(as_corrupted)?;
    let ciphertext = envelope.ciphertext_bytes().map_err(as_corrupted)?;
    Ok((salt, iv, ciphertext))
}

fn as_corrupted(e: VaultError) -> VaultError {
    VaultError::CorruptedStore(e.to_string())
}

/// Run PBKDF2 on a blocking thread — its cost is deliberate and must not
/// stall the async workers. A join failure is the catastrophic
/// [`VaultError::Derivation`] case.
async fn derive_off_thread(
    pin: &str,
    salt: &[u8; SALT_LEN],
) -> Result<Zeroizing<[u8; KEY_LEN]>, VaultError> {
    let pin = pin.to_owned();
    let salt = *salt;
    tokio::task::spawn_blocking(move || kdf::derive_key(pin.as_bytes(), &salt))
        .await
        .map_err(|e| VaultError::Derivation(e.to_string()))
}
