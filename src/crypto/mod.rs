//! Cryptographic primitives for DuressVault.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 password-based key derivation (`kdf`)
//! - AES-256-GCM encryption with associated data (`encryption`)
//! - CEK generation and password wrapping/unwrapping (`envelope`)

pub mod encryption;
pub mod envelope;
pub mod kdf;

/// Associated data bound into every ciphertext this format produces.
pub const PROTOCOL_AAD: &[u8; 9] = b"duress-v1";

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{wrap, unwrap, generate_cek, ...};
pub use encryption::{decrypt, encrypt, Sealed};
pub use envelope::{generate_cek, unwrap, wrap, ContentKey, WrappedKey};
pub use kdf::{derive_key, derive_wrapping_key, generate_salt, DEFAULT_ITERATIONS, MAX_ITERATIONS};
