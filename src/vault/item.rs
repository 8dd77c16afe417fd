//! Items stored inside a decrypted vault body.
//!
//! Each item serializes as `{"name": ..., "type": "file"|"note", "data": <base64>}`.
//! Names are not unique; lookups by name return the first match.

use serde::{Deserialize, Serialize};

use super::format::{base64_decode, base64_encode};

/// What an item holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    File,
    Note,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::File => f.write_str("file"),
            ItemKind::Note => f.write_str("note"),
        }
    }
}

/// A single named payload inside a vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: ItemKind,

    /// Raw payload bytes, base64 in JSON.
    #[serde(
        rename = "data",
        serialize_with = "base64_encode",
        deserialize_with = "base64_decode"
    )]
    pub payload: Vec<u8>,
}

impl Item {
    /// A file item holding `bytes`.
    pub fn file(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::File,
            payload: bytes.into(),
        }
    }

    /// A note item holding UTF-8 `text`.
    pub fn note(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::Note,
            payload: text.as_bytes().to_vec(),
        }
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

/// Return the first item named `name`, if any.
///
/// Duplicate names are allowed; later items with the same name are
/// unreachable through this lookup.
pub fn find_item<'a>(items: &'a [Item], name: &str) -> Option<&'a Item> {
    items.iter().find(|item| item.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_record_shape() {
        let item = Item::file("a.txt", b"hi".to_vec());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["name"], "a.txt");
        assert_eq!(json["type"], "file");
        assert_eq!(json["data"], "aGk=");
    }

    #[test]
    fn note_kind_roundtrips() {
        let item = Item::note("todo", "buy milk");
        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, ItemKind::Note);
        assert_eq!(back.payload, b"buy milk");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let json = r#"{"name":"x","type":"folder","data":""}"#;
        assert!(serde_json::from_str::<Item>(json).is_err());
    }

    #[test]
    fn find_item_returns_first_match() {
        let items = vec![
            Item::file("dup", b"first".to_vec()),
            Item::file("other", b"x".to_vec()),
            Item::file("dup", b"second".to_vec()),
        ];
        let found = find_item(&items, "dup").unwrap();
        assert_eq!(found.payload, b"first");
        assert!(find_item(&items, "missing").is_none());
    }
}
