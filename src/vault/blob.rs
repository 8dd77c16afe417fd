//! Sealing and opening the encrypted vault body.
//!
//! The body is the JSON array of `Item`s, encrypted under the vault's CEK
//! with AES-256-GCM and the protocol associated-data tag. The tag is also
//! stored in the blob so foreign blobs are rejected before decryption.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::format::{base64_decode, base64_encode};
use super::item::Item;
use crate::crypto::{decrypt, encrypt, ContentKey, PROTOCOL_AAD};
use crate::errors::{VaultError, Result};

/// Current blob format version.
pub const BLOB_VERSION: u32 = 1;

/// The encrypted, serialized item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultBlob {
    #[serde(rename = "version")]
    pub protocol_version: u32,

    #[serde(
        rename = "aad",
        serialize_with = "base64_encode",
        deserialize_with = "base64_decode"
    )]
    pub associated_data: Vec<u8>,

    #[serde(
        rename = "file_nonce",
        serialize_with = "base64_encode",
        deserialize_with = "base64_decode"
    )]
    pub nonce: Vec<u8>,

    #[serde(
        rename = "file_ct",
        serialize_with = "base64_encode",
        deserialize_with = "base64_decode"
    )]
    pub ciphertext: Vec<u8>,
}

/// Serialize `items` and encrypt them under `cek` with a fresh nonce.
pub fn seal(cek: &ContentKey, items: &[Item]) -> Result<VaultBlob> {
    let body = Zeroizing::new(
        serde_json::to_vec(items)
            .map_err(|e| VaultError::SerializationError(format!("items: {e}")))?,
    );

    let sealed = encrypt(cek.as_bytes(), &body, PROTOCOL_AAD)?;
    tracing::debug!(items = items.len(), "sealed vault body");

    Ok(VaultBlob {
        protocol_version: BLOB_VERSION,
        associated_data: PROTOCOL_AAD.to_vec(),
        nonce: sealed.nonce.to_vec(),
        ciphertext: sealed.ciphertext,
    })
}

/// Decrypt `blob` under `cek` and deserialize the item list.
pub fn open(cek: &ContentKey, blob: &VaultBlob) -> Result<Vec<Item>> {
    if blob.protocol_version != BLOB_VERSION {
        return Err(VaultError::MalformedRecord(format!(
            "unsupported blob version {}, expected {BLOB_VERSION}",
            blob.protocol_version
        )));
    }

    // Foreign or altered tag: reject without touching the ciphertext.
    if blob.associated_data.as_slice() != PROTOCOL_AAD.as_slice() {
        return Err(VaultError::AuthenticationFailed);
    }

    let body = decrypt(cek.as_bytes(), &blob.nonce, &blob.ciphertext, PROTOCOL_AAD)?;

    // Authenticated bytes that fail to parse mean the sealing side is broken.
    serde_json::from_slice(&body)
        .map_err(|e| VaultError::InternalConsistencyFault(format!("vault body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::generate_cek;

    fn sample_items() -> Vec<Item> {
        vec![
            Item::file("a.txt", b"alpha".to_vec()),
            Item::note("n", "note text"),
        ]
    }

    #[test]
    fn seal_open_roundtrip() {
        let cek = generate_cek().unwrap();
        let blob = seal(&cek, &sample_items()).unwrap();
        assert_eq!(blob.associated_data, PROTOCOL_AAD);
        assert_eq!(open(&cek, &blob).unwrap(), sample_items());
    }

    #[test]
    fn empty_list_roundtrip() {
        let cek = generate_cek().unwrap();
        let blob = seal(&cek, &[]).unwrap();
        assert!(open(&cek, &blob).unwrap().is_empty());
    }

    #[test]
    fn wrong_cek_fails() {
        let blob = seal(&generate_cek().unwrap(), &sample_items()).unwrap();
        let other = generate_cek().unwrap();
        assert!(matches!(
            open(&other, &blob),
            Err(VaultError::AuthenticationFailed)
        ));
    }

    #[test]
    fn foreign_aad_is_rejected() {
        let cek = generate_cek().unwrap();
        let mut blob = seal(&cek, &sample_items()).unwrap();
        blob.associated_data = b"other-v01".to_vec();
        assert!(matches!(
            open(&cek, &blob),
            Err(VaultError::AuthenticationFailed)
        ));
    }

    #[test]
    fn unknown_version_is_malformed() {
        let cek = generate_cek().unwrap();
        let mut blob = seal(&cek, &[]).unwrap();
        blob.protocol_version = 2;
        assert!(matches!(
            open(&cek, &blob),
            Err(VaultError::MalformedRecord(_))
        ));
    }

    #[test]
    fn authentic_garbage_is_internal_fault() {
        let cek = generate_cek().unwrap();
        let sealed = encrypt(cek.as_bytes(), b"not json", PROTOCOL_AAD).unwrap();
        let blob = VaultBlob {
            protocol_version: BLOB_VERSION,
            associated_data: PROTOCOL_AAD.to_vec(),
            nonce: sealed.nonce.to_vec(),
            ciphertext: sealed.ciphertext,
        };
        assert!(matches!(
            open(&cek, &blob),
            Err(VaultError::InternalConsistencyFault(_))
        ));
    }

    #[test]
    fn json_field_names() {
        let cek = generate_cek().unwrap();
        let blob = seal(&cek, &[]).unwrap();
        let json = serde_json::to_value(&blob).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["aad"], "ZHVyZXNzLXYx");
        assert!(json.get("file_nonce").is_some());
        assert!(json.get("file_ct").is_some());
    }
}
