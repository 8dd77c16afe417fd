use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::MAX_ITERATIONS;
use crate::errors::{VaultError, Result};
use crate::vault::VaultStore;

/// Lowest PBKDF2 iteration count accepted from a config file.
pub const MIN_KDF_ITERATIONS: u32 = 10_000;

/// Project-level configuration, loaded from `.duressvault.toml`.
///
/// Every field has a sensible default so DuressVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to the project root) holding the vault records.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// PBKDF2 iterations used when wrapping new keys (default: 200 000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Where `export` writes files when `--out` is not given.
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".duressvault".to_string()
}

fn default_kdf_iterations() -> u32 {
    crate::crypto::DEFAULT_ITERATIONS
}

fn default_export_dir() -> String {
    "exports".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            kdf_iterations: default_kdf_iterations(),
            export_dir: default_export_dir(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".duressvault.toml";

    /// Load settings from `<project_dir>/.duressvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed or sets a KDF cost outside
    /// `MIN_KDF_ITERATIONS..=MAX_ITERATIONS`, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if !(MIN_KDF_ITERATIONS..=MAX_ITERATIONS).contains(&settings.kdf_iterations) {
            return Err(VaultError::ConfigError(format!(
                "kdf_iterations must be between {MIN_KDF_ITERATIONS} and {MAX_ITERATIONS} (got {})",
                settings.kdf_iterations
            )));
        }

        tracing::debug!(path = %config_path.display(), "loaded settings");
        Ok(settings)
    }

    /// Full path to the vault directory.
    ///
    /// `override_dir` (the `--vault-dir` flag) wins over the config value.
    pub fn vault_root(&self, project_dir: &Path, override_dir: Option<&str>) -> PathBuf {
        project_dir.join(override_dir.unwrap_or(&self.vault_dir))
    }

    /// Build the store for this project.
    pub fn store(&self, project_dir: &Path, override_dir: Option<&str>) -> VaultStore {
        VaultStore::new(self.vault_root(project_dir, override_dir))
            .with_kdf_iterations(self.kdf_iterations)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
