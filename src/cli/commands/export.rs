//! `duressvault export`: write one item out to disk.
//!
//! Tries the real vault first, then the decoy, so the same command works
//! whichever password the user has. Either step can be skipped by
//! pressing Enter at its prompt.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::output;
use crate::cli::{open_store, prompt_optional_password, unlock, Cli};
use crate::cli::{ENV_DECOY_PASSWORD, ENV_PASSWORD};
use crate::errors::{VaultError, Result};
use crate::vault::{find_item, Item, VaultStore};

/// Execute the `export` command.
pub fn execute(cli: &Cli, name: &str, out: Option<&Path>) -> Result<()> {
    let (settings, store) = open_store(cli)?;
    let out_dir = match out {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?.join(&settings.export_dir),
    };

    let item = match search_real(&store, name)? {
        Some(item) => Some(item),
        None => search_decoy(&store, name)?,
    };

    // Same message whether the name is absent or nothing unlocked.
    let item = item.ok_or_else(|| VaultError::ItemNotFound(name.to_string()))?;

    let dest = write_item(&out_dir, &item)?;
    output::success(&format!("Exported '{}' -> {}", item.name, dest.display()));
    Ok(())
}

fn search_real(store: &VaultStore, name: &str) -> Result<Option<Item>> {
    let Some(l1) = prompt_optional_password(
        "Enter main password (L1) to try the real vault (or press Enter to skip)",
        ENV_PASSWORD,
    )?
    else {
        return Ok(None);
    };

    match unlock::unlock_real_with(store, l1) {
        Ok((items, _)) => Ok(find_item(&items, name).cloned()),
        Err(e) if e.is_unlock_failure() => Ok(None),
        Err(e) => Err(e),
    }
}

fn search_decoy(store: &VaultStore, name: &str) -> Result<Option<Item>> {
    let Some(password) = prompt_optional_password(
        "Enter decoy password to try the decoy vault (or press Enter to skip)",
        ENV_DECOY_PASSWORD,
    )?
    else {
        return Ok(None);
    };

    match store.unlock_decoy(password.as_bytes()) {
        Ok(items) => Ok(find_item(&items, name).cloned()),
        Err(e) if e.is_unlock_failure() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Write `item` into `out_dir` under its base name and return the path.
fn write_item(out_dir: &Path, item: &Item) -> Result<PathBuf> {
    // Item names come from vault contents; never let them escape out_dir.
    let file_name = Path::new(&item.name)
        .file_name()
        .ok_or_else(|| VaultError::CommandFailed(format!("invalid item name '{}'", item.name)))?;

    fs::create_dir_all(out_dir)?;
    let dest = out_dir.join(file_name);
    fs::write(&dest, &item.payload)?;
    Ok(dest)
}
