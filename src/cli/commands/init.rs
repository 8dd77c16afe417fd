//! `duressvault init`: create the real and decoy vaults.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use console::style;
use rand::rngs::OsRng;
use rand::TryRngCore;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{open_store, prompt_new_password, Cli, SecondFactor};
use crate::cli::{ENV_DECOY_PASSWORD, ENV_L2_PASSWORD, ENV_PASSWORD};
use crate::errors::{VaultError, Result};

/// Random bytes in a generated recovery key.
const RECOVERY_KEY_BYTES: usize = 24;

/// Execute the `init` command.
pub fn execute(cli: &Cli, second_factor: SecondFactor, force: bool) -> Result<()> {
    let (_settings, store) = open_store(cli)?;

    // 1. Refuse to clobber an existing vault unless --force.
    if store.is_initialized() && !force {
        output::tip("Use `duressvault init --force` to replace it (all contents are lost).");
        return Err(VaultError::VaultAlreadyExists(store.root().to_path_buf()));
    }

    output::info("Initializing vault. Choose strong passwords.");

    // 2. Main password.
    let l1 = prompt_new_password("main password (L1)", ENV_PASSWORD)?;

    // 3. Optional second credential.
    let l2 = match second_factor {
        SecondFactor::Password => Some(prompt_new_password(
            "second password (L2)",
            ENV_L2_PASSWORD,
        )?),
        SecondFactor::RecoveryKey => {
            let key = generate_recovery_key()?;
            output::warning("Recovery key (L2). Save it offline; it is shown only once:");
            println!("  {}", style(key.as_str()).bold());
            Some(key)
        }
        SecondFactor::None => {
            output::warning("No second credential: the main password alone opens the vault.");
            None
        }
    };

    // 4. Decoy password; must not open the real vault.
    let decoy = prompt_new_password("decoy password", ENV_DECOY_PASSWORD)?;
    if decoy.as_str() == l1.as_str() || l2.as_ref().is_some_and(|k| k.as_str() == decoy.as_str())
    {
        return Err(VaultError::CommandFailed(
            "decoy password must differ from the real vault's credentials".into(),
        ));
    }

    // 5. Write both vaults.
    let l2_bytes = l2.as_ref().map(|k| k.as_bytes());
    if force {
        store.reinitialize(l1.as_bytes(), l2_bytes, decoy.as_bytes())?;
    } else {
        store.initialize(l1.as_bytes(), l2_bytes, decoy.as_bytes())?;
    }

    output::success(&format!("Vault created at {}", store.root().display()));
    output::tip("Run `duressvault add <FILE>` to add a file to the real vault.");
    output::tip("Run `duressvault list --decoy` to see what the decoy vault shows.");

    Ok(())
}

/// Generate a random recovery key (URL-safe base64 of 24 random bytes).
fn generate_recovery_key() -> Result<Zeroizing<String>> {
    let mut bytes = Zeroizing::new([0u8; RECOVERY_KEY_BYTES]);
    OsRng
        .try_fill_bytes(bytes.as_mut_slice())
        .map_err(|e| VaultError::CommandFailed(format!("OS RNG unavailable: {e}")))?;
    Ok(Zeroizing::new(URL_SAFE.encode(bytes.as_slice())))
}
