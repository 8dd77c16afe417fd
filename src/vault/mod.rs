//! Vault module: the real and decoy vault records.
//!
//! This module provides:
//! - `Item` and `ItemKind`, the contents of a vault (`item`)
//! - Sealing/opening of the encrypted item list (`blob`)
//! - JSON record formats and atomic file writes (`format`)
//! - Harmless decoy content (`decoy`)
//! - High-level `VaultStore` with the unlock/save protocol (`store`)

pub mod blob;
pub mod decoy;
pub mod format;
pub mod item;
pub mod store;

// Re-export the most commonly used items.
pub use blob::VaultBlob;
pub use format::{DecoyRecord, RealRecord, UnlockPolicy, VaultMeta};
pub use item::{find_item, Item, ItemKind};
pub use store::VaultStore;
