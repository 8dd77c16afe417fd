//! Content-encryption keys (CEKs) and password-wrapped key records.
//!
//! A vault body is encrypted under one random CEK. The CEK itself is
//! stored only as `WrappedKey` records: the CEK encrypted under a key
//! derived from a password with a fresh salt and a fresh nonce.

use rand::rngs::OsRng;
use rand::TryRngCore;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::encryption::{decrypt, encrypt};
use super::kdf::{derive_wrapping_key, generate_salt, DEFAULT_ITERATIONS};
use super::PROTOCOL_AAD;
use crate::errors::{VaultError, Result};
use crate::vault::format::{base64_decode, base64_encode};

/// Length of a CEK in bytes (AES-256).
pub const CEK_LEN: usize = 32;

/// A 32-byte content-encryption key, wiped from memory on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ContentKey {
    bytes: [u8; CEK_LEN],
}

impl ContentKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; CEK_LEN]) -> Self {
        Self { bytes }
    }

    /// Build a key from an unwrapped plaintext. A length mismatch means the
    /// record was not produced by `wrap` and is reported as an auth failure.
    fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != CEK_LEN {
            return Err(VaultError::AuthenticationFailed);
        }
        let mut key = [0u8; CEK_LEN];
        key.copy_from_slice(bytes);
        Ok(Self { bytes: key })
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; CEK_LEN] {
        &self.bytes
    }
}

/// Constant-time comparison.
impl PartialEq for ContentKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for ContentKey {}

impl std::fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ContentKey(<redacted>)")
    }
}

/// A CEK encrypted under a password-derived key.
///
/// Serialized as `{salt, nonce, ct, iterations}` with URL-safe base64
/// binary fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedKey {
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub nonce: Vec<u8>,

    #[serde(
        rename = "ct",
        serialize_with = "base64_encode",
        deserialize_with = "base64_decode"
    )]
    pub ciphertext: Vec<u8>,

    /// PBKDF2 iterations used for this wrap. Records written without the
    /// field used the default.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

/// Generate a fresh random CEK from the OS RNG.
pub fn generate_cek() -> Result<ContentKey> {
    let mut bytes = [0u8; CEK_LEN];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| VaultError::EncryptionFailed(format!("OS RNG unavailable: {e}")))?;
    let key = ContentKey::from_bytes(bytes);
    bytes.zeroize();
    Ok(key)
}

/// Encrypt `cek` under a key derived from `password` with a new salt.
pub fn wrap(cek: &ContentKey, password: &[u8], iterations: u32) -> Result<WrappedKey> {
    let salt = generate_salt()?;
    let kek = derive_wrapping_key(password, &salt, iterations)?;
    let sealed = encrypt(kek.as_slice(), cek.as_bytes(), PROTOCOL_AAD)?;

    Ok(WrappedKey {
        salt: salt.to_vec(),
        nonce: sealed.nonce.to_vec(),
        ciphertext: sealed.ciphertext,
        iterations,
    })
}

/// Recover the CEK from a `WrappedKey` using `password`.
///
/// Every failure, whether a wrong password or a damaged record, collapses
/// into `AuthenticationFailed`.
pub fn unwrap(wrapped: &WrappedKey, password: &[u8]) -> Result<ContentKey> {
    let kek = derive_wrapping_key(password, &wrapped.salt, wrapped.iterations)
        .map_err(|_| VaultError::AuthenticationFailed)?;
    let plaintext = decrypt(
        kek.as_slice(),
        &wrapped.nonce,
        &wrapped.ciphertext,
        PROTOCOL_AAD,
    )?;
    ContentKey::from_slice(&plaintext)
}
