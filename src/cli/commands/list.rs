//! `duressvault list`: display the items in a vault.

use crate::cli::output;
use crate::cli::{open_store, unlock, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, decoy: bool) -> Result<()> {
    let (_settings, store) = open_store(cli)?;
    let (items, unlocked) = unlock::unlock(&store, decoy)?;

    output::info(&format!(
        "{} vault: {} item(s)",
        unlocked.label(),
        items.len()
    ));
    output::print_items_table(&items);

    Ok(())
}
