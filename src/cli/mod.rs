//! CLI module: Clap argument parser, password prompts, output helpers,
//! and command implementations.

pub mod commands;
pub mod output;
pub mod unlock;

use std::path::PathBuf;

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{VaultError, Result};
use crate::vault::VaultStore;

/// Minimum password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Main (L1) password for non-interactive use.
pub const ENV_PASSWORD: &str = "DURESSVAULT_PASSWORD";

/// Second credential (L2) for non-interactive use.
pub const ENV_L2_PASSWORD: &str = "DURESSVAULT_L2_PASSWORD";

/// Decoy password for non-interactive use.
pub const ENV_DECOY_PASSWORD: &str = "DURESSVAULT_DECOY_PASSWORD";

/// DuressVault CLI: encrypted file vault with a decoy for duress situations.
#[derive(Parser)]
#[command(
    name = "duressvault",
    about = "Encrypted file vault with a decoy vault for duress situations",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: .duressvault, or `vault_dir` from .duressvault.toml)
    #[arg(long, global = true)]
    pub vault_dir: Option<String>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Initialize the real and decoy vaults
    Init {
        /// How the real vault's second credential (L2) is set up
        #[arg(long, value_enum, default_value_t = SecondFactor::RecoveryKey)]
        second_factor: SecondFactor,

        /// Replace an existing vault (its contents become unrecoverable)
        #[arg(long)]
        force: bool,
    },

    /// Add a file to a vault
    Add {
        /// Path to the file to add
        source: PathBuf,
        /// Add to the decoy vault
        #[arg(long)]
        decoy: bool,
    },

    /// Add a text note to a vault
    Note {
        /// Name of the note
        name: String,
        /// Note text (omit for interactive prompt)
        #[arg(long)]
        text: Option<String>,
        /// Add to the decoy vault
        #[arg(long)]
        decoy: bool,
    },

    /// List the items in a vault
    List {
        /// List the decoy vault
        #[arg(long)]
        decoy: bool,
    },

    /// Export an item to a file (tries the real vault, then the decoy)
    Export {
        /// Name of the item in the vault
        name: String,
        /// Output directory (default: `export_dir` from config, or ./exports)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Remove an item from a vault (first item with that name)
    Remove {
        /// Name of the item in the vault
        name: String,
        /// Remove from the decoy vault
        #[arg(long)]
        decoy: bool,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Replace the decoy vault's contents with generated everyday files
    DecoyInit {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show whether a vault exists and how it is unlocked
    Status,

    /// Lock the vault (no keys are kept between commands)
    Lock,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Second-credential modes offered by `init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SecondFactor {
    /// Type a second password now
    Password,
    /// Generate a random recovery key and show it once
    RecoveryKey,
    /// No second credential
    None,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from the current directory and build the vault store.
pub fn open_store(cli: &Cli) -> Result<(Settings, VaultStore)> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    let store = settings.store(&cwd, cli.vault_dir.as_deref());
    Ok((settings, store))
}

/// Read an environment variable holding a password, ignoring empty values.
fn password_from_env(var: &str) -> Option<Zeroizing<String>> {
    match std::env::var(var) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
        _ => None,
    }
}

/// Get a password, trying in order:
/// 1. The given environment variable (scripted use)
/// 2. Interactive prompt (input hidden)
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password(prompt: &str, env_var: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(env_var) {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Like `prompt_password`, but pressing Enter on an empty prompt
/// returns `None` (used to skip a vault or a credential).
pub fn prompt_optional_password(prompt: &str, env_var: &str) -> Result<Option<Zeroizing<String>>> {
    if let Some(pw) = password_from_env(env_var) {
        return Ok(Some(pw));
    }

    let pw = Zeroizing::new(
        dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?,
    );
    if pw.is_empty() {
        return Ok(None);
    }
    Ok(Some(pw))
}

/// Prompt for a new password with confirmation (used during `init`).
///
/// Also respects `env_var` for scripted usage. Enforces a minimum
/// password length.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_new_password(label: &str, env_var: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(env_var) {
        if pw.len() < MIN_PASSWORD_LEN {
            return Err(VaultError::CommandFailed(format!(
                "{label} must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        return Ok(pw);
    }

    loop {
        let password = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt(format!("Choose {label}"))
                .with_confirmation(
                    format!("Confirm {label}"),
                    "Passwords do not match, try again",
                )
                .interact()
                .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?,
        );

        if password.len() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(password);
    }
}

/// Ask a yes/no question, defaulting to "no".
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_init_with_second_factor() {
        let cli = Cli::try_parse_from(["duressvault", "init", "--second-factor", "none"]).unwrap();
        match cli.command {
            Commands::Init {
                second_factor,
                force,
            } => {
                assert_eq!(second_factor, SecondFactor::None);
                assert!(!force);
            }
            _ => panic!("expected init"),
        }
    }

    #[test]
    fn init_defaults_to_recovery_key() {
        let cli = Cli::try_parse_from(["duressvault", "init"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Init {
                second_factor: SecondFactor::RecoveryKey,
                ..
            }
        ));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["duressvault", "list", "--decoy", "--vault-dir", "v", "-v"])
                .unwrap();
        assert_eq!(cli.vault_dir.as_deref(), Some("v"));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::List { decoy: true }));
    }

    #[test]
    fn completions_takes_known_shells_only() {
        let cli = Cli::try_parse_from(["duressvault", "completions", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions {
                shell: clap_complete::Shell::Zsh
            }
        ));
        assert!(Cli::try_parse_from(["duressvault", "completions", "csh"]).is_err());
    }
}
