use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in DuressVault.
///
/// The first four variants are the only outcomes an unlock or save can
/// report for credential and record problems. They deliberately never say
/// which password was wrong.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Unlock outcomes ---
    #[error("Unable to unlock vault")]
    AuthenticationFailed,

    #[error("Second credential required to unlock this vault")]
    SecondFactorRequired,

    #[error("Malformed vault record: {0}")]
    MalformedRecord(String),

    #[error("Internal consistency fault: {0}")]
    InternalConsistencyFault(String),

    // --- Crypto errors ---
    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    // --- Vault errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Item '{0}' not found")]
    ItemNotFound(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl VaultError {
    /// Returns `true` only for credential outcomes: a wrong password or a
    /// missing second credential. Damaged records and environment errors
    /// (I/O, config) return `false`.
    pub fn is_unlock_failure(&self) -> bool {
        matches!(
            self,
            VaultError::AuthenticationFailed | VaultError::SecondFactorRequired
        )
    }
}

/// Convenience type alias for DuressVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
