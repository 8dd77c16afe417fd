//! `duressvault note`: append a text note to the real or decoy vault.

use dialoguer::Input;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{open_store, unlock, Cli};
use crate::errors::{VaultError, Result};
use crate::vault::Item;

/// Execute the `note` command.
pub fn execute(cli: &Cli, name: &str, text: Option<&str>, decoy: bool) -> Result<()> {
    if name.trim().is_empty() {
        return Err(VaultError::CommandFailed("note name cannot be empty".into()));
    }

    let (_settings, store) = open_store(cli)?;
    let (mut items, unlocked) = unlock::unlock(&store, decoy)?;

    let text = match text {
        Some(t) => Zeroizing::new(t.to_string()),
        None => Zeroizing::new(
            Input::<String>::new()
                .with_prompt("Note text")
                .interact_text()
                .map_err(|e| VaultError::CommandFailed(format!("failed to read input: {e}")))?,
        ),
    };

    items.push(Item::note(name, &text));
    unlocked.save(&store, &items)?;

    output::success(&format!("Added note '{name}' to {} vault.", unlocked.label()));
    Ok(())
}
