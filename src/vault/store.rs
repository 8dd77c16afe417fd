//! High-level vault operations used by CLI commands.
//!
//! `VaultStore` is built once from a vault directory and handed to each
//! command. It never holds a key: every unlock or save re-derives the CEK
//! from the passwords passed to that call and drops it before returning.

use std::fs;
use std::path::{Path, PathBuf};

use crate::crypto::envelope::{generate_cek, unwrap, wrap, ContentKey};
use crate::crypto::DEFAULT_ITERATIONS;
use crate::errors::{VaultError, Result};

use super::blob;
use super::decoy;
use super::format::{
    self, DecoyRecord, RealRecord, Staged, UnlockPolicy, VaultMeta, CURRENT_VERSION,
    DECOY_FILENAME, META_FILENAME, REAL_FILENAME,
};
use super::item::Item;

/// Handle on one vault directory (`meta.json`, real record, decoy record).
#[derive(Debug, Clone)]
pub struct VaultStore {
    root: PathBuf,
    kdf_iterations: u32,
}

impl VaultStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// A store rooted at `root`, wrapping new keys with the default
    /// PBKDF2 iteration count.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            kdf_iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Use `iterations` for keys wrapped from now on. Existing records
    /// keep the count stored alongside them.
    pub fn with_kdf_iterations(mut self, iterations: u32) -> Self {
        self.kdf_iterations = iterations;
        self
    }

    // ------------------------------------------------------------------
    // Initialization
    // ------------------------------------------------------------------

    /// Create the real and decoy vaults.
    ///
    /// The real vault gets a fresh CEK wrapped under `l1` and, when given,
    /// wrapped again under `l2`; its body is an empty list. The decoy gets
    /// its own independent CEK wrapped under `decoy_password` and the welcome item.
    ///
    /// Fails with `VaultAlreadyExists` if a real record is already present.
    pub fn initialize(&self, l1: &[u8], l2: Option<&[u8]>, decoy_password: &[u8]) -> Result<()> {
        if self.is_initialized() {
            return Err(VaultError::VaultAlreadyExists(self.root.clone()));
        }
        self.write_fresh(l1, l2, decoy_password)
    }

    /// Like `initialize`, but replaces any existing vault. The old CEKs are
    /// discarded, so the previous contents become unrecoverable.
    pub fn reinitialize(&self, l1: &[u8], l2: Option<&[u8]>, decoy_password: &[u8]) -> Result<()> {
        self.write_fresh(l1, l2, decoy_password)
    }

    fn write_fresh(&self, l1: &[u8], l2: Option<&[u8]>, decoy_password: &[u8]) -> Result<()> {
        let l2 = present(l2);
        fs::create_dir_all(&self.root)?;

        // Real vault: one CEK, wrapped once per credential.
        let cek = generate_cek()?;
        let wrapped_l1 = wrap(&cek, l1, self.kdf_iterations)?;
        let wrapped_l2 = l2
            .map(|pw| wrap(&cek, pw, self.kdf_iterations))
            .transpose()?;
        let real = RealRecord {
            version: CURRENT_VERSION,
            policy: UnlockPolicy {
                requires_l2: wrapped_l2.is_some(),
            },
            wrapped_l1,
            wrapped_l2,
            blob: blob::seal(&cek, &[])?,
        };
        drop(cek);

        // Decoy vault: an unrelated CEK.
        let decoy_cek = generate_cek()?;
        let decoy_record = DecoyRecord {
            version: CURRENT_VERSION,
            wrapped: wrap(&decoy_cek, decoy_password, self.kdf_iterations)?,
            blob: blob::seal(&decoy_cek, &decoy::welcome_items())?,
        };
        drop(decoy_cek);

        // Stage every record before replacing any, so a failed write leaves
        // the previous vault intact.
        let staged = stage_all(vec![
            format::stage_json(&self.real_path(), &real),
            format::stage_json(&self.decoy_path(), &decoy_record),
            format::stage_json(&self.meta_path(), &VaultMeta::new(real.policy.requires_l2)),
        ])?;
        for record in staged {
            record.commit()?;
        }

        tracing::info!(
            root = %self.root.display(),
            two_level = real.policy.requires_l2,
            "vault initialized"
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Real vault
    // ------------------------------------------------------------------

    /// Unlock the real vault and return its items.
    ///
    /// A wrong `l1` is `AuthenticationFailed`. When the vault requires a
    /// second credential and `l1` was correct, a missing `l2` is
    /// `SecondFactorRequired`; a wrong `l2`, or an `l2` that unwraps to a
    /// different CEK than `l1`, is `AuthenticationFailed`.
    pub fn unlock_real(&self, l1: &[u8], l2: Option<&[u8]>) -> Result<Vec<Item>> {
        let record = self.load_real()?;
        let cek = recover_real_cek(&record, l1, l2)?;
        let items = blob::open(&cek, &record.blob)?;
        tracing::debug!(items = items.len(), "vault opened");
        Ok(items)
    }

    /// Replace the real vault's items with `items`.
    ///
    /// Goes through the same credential checks as `unlock_real`, reseals
    /// under a fresh nonce, and rewrites only the blob; the wrapped keys
    /// are left as they were.
    pub fn save_real(&self, l1: &[u8], l2: Option<&[u8]>, items: &[Item]) -> Result<()> {
        let mut record = self.load_real()?;
        let cek = recover_real_cek(&record, l1, l2)?;
        record.blob = blob::seal(&cek, items)?;
        drop(cek);

        format::write_json(&self.real_path(), &record)?;
        tracing::debug!(items = items.len(), "vault saved");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Decoy vault
    // ------------------------------------------------------------------

    /// Unlock the decoy vault and return its items.
    pub fn unlock_decoy(&self, password: &[u8]) -> Result<Vec<Item>> {
        let record = self.load_decoy()?;
        let cek = unwrap(&record.wrapped, password)?;
        let items = blob::open(&cek, &record.blob)?;
        tracing::debug!(items = items.len(), "vault opened");
        Ok(items)
    }

    /// Replace the decoy vault's items with `items`.
    pub fn save_decoy(&self, password: &[u8], items: &[Item]) -> Result<()> {
        let mut record = self.load_decoy()?;
        let cek = unwrap(&record.wrapped, password)?;
        record.blob = blob::seal(&cek, items)?;
        drop(cek);

        format::write_json(&self.decoy_path(), &record)?;
        tracing::debug!(items = items.len(), "vault saved");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Records
    // ------------------------------------------------------------------

    fn load_real(&self) -> Result<RealRecord> {
        let record: RealRecord = format::read_json(&self.real_path())?;
        record.validate()?;
        Ok(record)
    }

    fn load_decoy(&self) -> Result<DecoyRecord> {
        let record: DecoyRecord = format::read_json(&self.decoy_path())?;
        record.validate()?;
        Ok(record)
    }

    /// Read `meta.json`.
    pub fn load_meta(&self) -> Result<VaultMeta> {
        format::read_json(&self.meta_path())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns `true` once a real record exists in the vault directory.
    pub fn is_initialized(&self) -> bool {
        self.real_path().exists()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kdf_iterations(&self) -> u32 {
        self.kdf_iterations
    }

    pub fn meta_path(&self) -> PathBuf {
        self.root.join(META_FILENAME)
    }

    pub fn real_path(&self) -> PathBuf {
        self.root.join(REAL_FILENAME)
    }

    pub fn decoy_path(&self) -> PathBuf {
        self.root.join(DECOY_FILENAME)
    }
}

/// Recover the real vault's CEK, enforcing the two-level policy.
fn recover_real_cek(record: &RealRecord, l1: &[u8], l2: Option<&[u8]>) -> Result<ContentKey> {
    let cek = unwrap(&record.wrapped_l1, l1)?;

    if !record.policy.requires_l2 {
        return Ok(cek);
    }

    // L1 is known good here, so asking for more reveals nothing.
    let l2 = present(l2).ok_or(VaultError::SecondFactorRequired)?;
    let wrapped_l2 = record
        .wrapped_l2
        .as_ref()
        .ok_or_else(|| VaultError::MalformedRecord("wrapped_l2 missing".into()))?;
    let cek_l2 = unwrap(wrapped_l2, l2)?;

    // Both wraps must hold the same CEK; a substituted L2 record fails here.
    if cek != cek_l2 {
        return Err(VaultError::AuthenticationFailed);
    }
    Ok(cek)
}

/// Collect staged writes, discarding all of them if any failed.
fn stage_all(results: Vec<Result<Staged>>) -> Result<Vec<Staged>> {
    let mut staged = Vec::with_capacity(results.len());
    let mut first_err = None;
    for result in results {
        match result {
            Ok(record) => staged.push(record),
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }
    }

    match first_err {
        None => Ok(staged),
        Some(e) => {
            for record in staged {
                record.discard();
            }
            Err(e)
        }
    }
}

/// An empty password counts as not supplied.
fn present(password: Option<&[u8]>) -> Option<&[u8]> {
    password.filter(|pw| !pw.is_empty())
}
