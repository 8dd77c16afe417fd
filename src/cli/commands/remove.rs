//! `duressvault remove`: drop the first item with a given name.

use crate::cli::output;
use crate::cli::{confirm, open_store, unlock, Cli};
use crate::errors::{VaultError, Result};

/// Execute the `remove` command.
pub fn execute(cli: &Cli, name: &str, decoy: bool, force: bool) -> Result<()> {
    let (_settings, store) = open_store(cli)?;
    let (mut items, unlocked) = unlock::unlock(&store, decoy)?;

    let index = items
        .iter()
        .position(|item| item.name == name)
        .ok_or_else(|| VaultError::ItemNotFound(name.to_string()))?;

    // Unless --force is set, ask for confirmation before removing.
    if !force && !confirm(&format!("Remove '{name}' from the {} vault?", unlocked.label()))? {
        output::info("Cancelled.");
        return Ok(());
    }

    items.remove(index);
    unlocked.save(&store, &items)?;

    output::success(&format!("Removed '{name}' from {} vault.", unlocked.label()));
    Ok(())
}
