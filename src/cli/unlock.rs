//! Interactive unlock flows shared by the item commands.
//!
//! The store itself is stateless, so a command that reads and then writes
//! a vault keeps the passwords (not keys) for the length of that command
//! and passes them to both calls.

use zeroize::Zeroizing;

use crate::cli::{prompt_optional_password, prompt_password};
use crate::cli::{ENV_DECOY_PASSWORD, ENV_L2_PASSWORD, ENV_PASSWORD};
use crate::errors::{VaultError, Result};
use crate::vault::{Item, VaultStore};

/// Passwords that unlocked one of the two vaults.
pub enum Unlocked {
    Real {
        l1: Zeroizing<String>,
        l2: Option<Zeroizing<String>>,
    },
    Decoy {
        password: Zeroizing<String>,
    },
}

impl Unlocked {
    /// Write `items` back to the vault these credentials opened.
    pub fn save(&self, store: &VaultStore, items: &[Item]) -> Result<()> {
        match self {
            Unlocked::Real { l1, l2 } => {
                store.save_real(l1.as_bytes(), l2.as_ref().map(|pw| pw.as_bytes()), items)
            }
            Unlocked::Decoy { password } => store.save_decoy(password.as_bytes(), items),
        }
    }

    /// "real" or "decoy", for user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            Unlocked::Real { .. } => "real",
            Unlocked::Decoy { .. } => "decoy",
        }
    }
}

/// Unlock the vault selected by `--decoy`, prompting as needed.
pub fn unlock(store: &VaultStore, decoy: bool) -> Result<(Vec<Item>, Unlocked)> {
    if decoy {
        unlock_decoy(store)
    } else {
        let l1 = prompt_password("Enter main password (L1)", ENV_PASSWORD)?;
        unlock_real_with(store, l1)
    }
}

/// Unlock the decoy vault with a prompted password.
pub fn unlock_decoy(store: &VaultStore) -> Result<(Vec<Item>, Unlocked)> {
    let password = prompt_password("Enter decoy password", ENV_DECOY_PASSWORD)?;
    let items = store.unlock_decoy(password.as_bytes())?;
    Ok((items, Unlocked::Decoy { password }))
}

/// Finish unlocking the real vault given `l1`.
///
/// The second credential is only asked for after the store reports that
/// `l1` was correct and the vault needs one. Leaving that prompt empty
/// gives up with `SecondFactorRequired`.
pub fn unlock_real_with(store: &VaultStore, l1: Zeroizing<String>) -> Result<(Vec<Item>, Unlocked)> {
    match store.unlock_real(l1.as_bytes(), None) {
        Ok(items) => Ok((items, Unlocked::Real { l1, l2: None })),
        Err(VaultError::SecondFactorRequired) => {
            let l2 = prompt_optional_password("Enter second credential (L2)", ENV_L2_PASSWORD)?
                .ok_or(VaultError::SecondFactorRequired)?;
            let items = store.unlock_real(l1.as_bytes(), Some(l2.as_bytes()))?;
            Ok((items, Unlocked::Real { l1, l2: Some(l2) }))
        }
        Err(e) => Err(e),
    }
}
