//! `duressvault status`: show what is on disk without unlocking anything.

use crate::cli::output;
use crate::cli::{open_store, Cli};
use crate::errors::Result;

/// Execute the `status` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (_settings, store) = open_store(cli)?;

    if !store.is_initialized() {
        output::info(&format!("No vault at {}", store.root().display()));
        output::tip("Run `duressvault init` to create one.");
        return Ok(());
    }

    let meta = store.load_meta()?;
    output::info(&format!("Vault at {}", store.root().display()));
    if let Some(created) = meta.created_at {
        println!("  Created:     {}", created.format("%Y-%m-%d %H:%M:%S"));
    }
    println!(
        "  Unlock:      {}",
        if meta.real.two_level {
            "main password + second credential"
        } else {
            "main password"
        }
    );
    println!("  KDF cost:    {} iterations (new keys)", store.kdf_iterations());

    Ok(())
}
