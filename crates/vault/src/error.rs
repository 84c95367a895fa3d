//! Vault error types.

/// Errors produced by vault operations.
///
/// `WrongPin` deliberately covers both an incorrect PIN and tampered or
/// corrupted ciphertext: the AEAD tag check cannot tell them apart, and no
/// separate corruption oracle is exposed.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// The vault already has a stored envelope — `initialize` is illegal.
    #[error("vault is already initialized")]
    AlreadyInitialized,

    /// No stored envelope exists yet — `unlock` has nothing to open.
    #[error("vault is not initialized")]
    NotInitialized,

    /// The vault is locked — no key in memory.
    #[error("vault is locked")]
    Locked,

    /// Authenticated decryption failed: wrong PIN or corrupted ciphertext.
    #[error("incorrect PIN or corrupted ciphertext")]
    WrongPin,

    /// Malformed envelope text (bad base64, bad JSON) supplied by a caller.
    #[error("malformed envelope: {0}")]
    Format(String),

    /// The *stored* envelope cannot be parsed. Recoverable only by reset.
    #[error("stored envelope is corrupted: {0}")]
    CorruptedStore(String),

    /// Key derivation failed. Non-retryable without changing input.
    #[error("key derivation failed: {0}")]
    Derivation(String),

    /// First-run setup could not persist the initial envelope.
    #[error("vault setup failed: {0}")]
    Setup(String),

    /// Cipher backend failure outside the tag-verification path.
    #[error("cipher failure: {0}")]
    Crypto(String),

    /// Storage read/write failure.
    #[error("failed to persist envelope: {0}")]
    Persist(#[from] sqlx::Error),

    /// Collection (de)serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
