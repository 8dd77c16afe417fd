//! `duressvault add`: append a file to the real or decoy vault.

use std::fs;
use std::path::Path;

use crate::cli::output;
use crate::cli::{open_store, unlock, Cli};
use crate::errors::{VaultError, Result};
use crate::vault::{find_item, Item};

/// Execute the `add` command.
pub fn execute(cli: &Cli, source: &Path, decoy: bool) -> Result<()> {
    // Read the file before asking for passwords so a typo fails fast.
    if !source.is_file() {
        return Err(VaultError::CommandFailed(format!(
            "source file not found: {}",
            source.display()
        )));
    }
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| VaultError::CommandFailed("source has no file name".into()))?;
    let bytes = fs::read(source)?;

    let (_settings, store) = open_store(cli)?;
    let (mut items, unlocked) = unlock::unlock(&store, decoy)?;

    if find_item(&items, &name).is_some() {
        output::warning(&format!(
            "An item named '{name}' already exists; export returns the first one."
        ));
    }

    items.push(Item::file(name.as_str(), bytes));
    unlocked.save(&store, &items)?;

    tracing::debug!(items = items.len(), "item appended");
    output::success(&format!("Added '{name}' to {} vault.", unlocked.label()));
    Ok(())
}
