//! AES-256-GCM authenticated encryption with associated data.
//!
//! `encrypt` always draws a fresh random 12-byte nonce and hands it back
//! alongside the ciphertext; callers cannot supply their own nonce, so a
//! nonce is never reused under the same key.
//!
//! Ciphertext layout: `[ ciphertext | 16-byte auth tag ]`, nonce kept apart.

use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use zeroize::Zeroizing;

use crate::errors::{VaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Output of a single `encrypt` call.
#[derive(Debug, Clone)]
pub struct Sealed {
    /// The nonce generated for this call.
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext with the auth tag appended.
    pub ciphertext: Vec<u8>,
}

/// Encrypt `plaintext` under a 32-byte `key`, binding `aad` into the tag.
pub fn encrypt(key: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<Sealed> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| VaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    nonce_bytes.copy_from_slice(&nonce);

    Ok(Sealed {
        nonce: nonce_bytes,
        ciphertext,
    })
}

/// Decrypt and verify `ciphertext` produced by `encrypt`.
///
/// Any problem (wrong key, wrong nonce, wrong `aad`, tampered bytes,
/// malformed lengths) yields the same `AuthenticationFailed`.
pub fn decrypt(
    key: &[u8],
    nonce: &[u8],
    ciphertext: &[u8],
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    if nonce.len() != NONCE_LEN || ciphertext.len() < TAG_LEN {
        return Err(VaultError::AuthenticationFailed);
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| VaultError::AuthenticationFailed)?;

    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| VaultError::AuthenticationFailed)?;

    Ok(Zeroizing::new(plaintext))
}
