//! `duressvault decoy-init`: fill the decoy vault with everyday files.

use crate::cli::output;
use crate::cli::{confirm, open_store, prompt_password, Cli, ENV_DECOY_PASSWORD};
use crate::errors::Result;
use crate::vault::decoy;

/// Execute the `decoy-init` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let (_settings, store) = open_store(cli)?;

    if !force && !confirm("Replace the decoy vault's contents with generated files?")? {
        output::info("Cancelled.");
        return Ok(());
    }

    let password = prompt_password("Enter decoy password", ENV_DECOY_PASSWORD)?;
    let items = decoy::generate_items();
    store.save_decoy(password.as_bytes(), &items)?;

    output::success(&format!("Decoy vault populated with {} files.", items.len()));
    Ok(())
}
