//! On-disk record formats for a vault directory.
//!
//! A vault directory holds three JSON files:
//!
//! ```text
//! meta.json     {version, real: {file, two_level}, decoy: {file}, created_at}
//! real.vault    {version, policy: {requires_l2}, wrapped_l1, wrapped_l2 | null, blob}
//! decoy.vault   {version, wrapped, blob}
//! ```
//!
//! Binary fields (salts, nonces, ciphertexts) are URL-safe base64 strings.
//! Nothing in `meta.json` is needed to unlock either vault.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::blob::VaultBlob;
use crate::crypto::{WrappedKey, MAX_ITERATIONS};
use crate::errors::{VaultError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Current record format version.
pub const CURRENT_VERSION: u32 = 1;

pub const META_FILENAME: &str = "meta.json";
pub const REAL_FILENAME: &str = "real.vault";
pub const DECOY_FILENAME: &str = "decoy.vault";

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Unlock policy of the real vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockPolicy {
    pub requires_l2: bool,
}

/// The persisted real vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealRecord {
    pub version: u32,
    pub policy: UnlockPolicy,
    pub wrapped_l1: WrappedKey,
    /// Present if and only if `policy.requires_l2`.
    pub wrapped_l2: Option<WrappedKey>,
    pub blob: VaultBlob,
}

impl RealRecord {
    /// Check the structural invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        check_version(self.version)?;
        check_iterations(&self.wrapped_l1)?;
        if let Some(wrapped_l2) = &self.wrapped_l2 {
            check_iterations(wrapped_l2)?;
        }
        match (self.policy.requires_l2, self.wrapped_l2.is_some()) {
            (true, false) => Err(VaultError::MalformedRecord(
                "policy requires a second credential but no wrapped_l2 is stored".into(),
            )),
            (false, true) => Err(VaultError::MalformedRecord(
                "wrapped_l2 is stored but the policy does not require it".into(),
            )),
            _ => Ok(()),
        }
    }
}

/// The persisted decoy vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoyRecord {
    pub version: u32,
    pub wrapped: WrappedKey,
    pub blob: VaultBlob,
}

impl DecoyRecord {
    pub fn validate(&self) -> Result<()> {
        check_version(self.version)?;
        check_iterations(&self.wrapped)
    }
}

fn check_version(version: u32) -> Result<()> {
    if version != CURRENT_VERSION {
        return Err(VaultError::MalformedRecord(format!(
            "unsupported version {version}, expected {CURRENT_VERSION}"
        )));
    }
    Ok(())
}

/// A stored iteration count is attacker-controlled; cap it before running PBKDF2.
fn check_iterations(wrapped: &WrappedKey) -> Result<()> {
    if wrapped.iterations == 0 || wrapped.iterations > MAX_ITERATIONS {
        return Err(VaultError::MalformedRecord(format!(
            "iteration count {} outside 1..={MAX_ITERATIONS}",
            wrapped.iterations
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Discovery metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealMeta {
    pub file: String,
    pub two_level: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoyMeta {
    pub file: String,
}

/// Contents of `meta.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultMeta {
    pub version: u32,
    pub real: RealMeta,
    pub decoy: DecoyMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl VaultMeta {
    pub fn new(two_level: bool) -> Self {
        Self {
            version: CURRENT_VERSION,
            real: RealMeta {
                file: REAL_FILENAME.to_string(),
                two_level,
            },
            decoy: DecoyMeta {
                file: DECOY_FILENAME.to_string(),
            },
            created_at: Some(Utc::now()),
        }
    }
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

/// Read and parse a JSON record.
///
/// A missing file is `VaultNotFound`; anything that does not parse into
/// `T` is `MalformedRecord`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(VaultError::VaultNotFound(path.to_path_buf()));
    }

    let data = fs::read(path)?;
    serde_json::from_slice(&data).map_err(|e| {
        VaultError::MalformedRecord(format!(
            "{}: {e}",
            path.file_name().unwrap_or_default().to_string_lossy()
        ))
    })
}

/// Write `value` as pretty JSON **atomically**.
///
/// The bytes go to a temp file in the same directory which is then renamed
/// over the target, so readers never see a half-written record.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let staged = stage_json(path, value)?;
    staged.commit()
}

/// A record written to its temp file but not yet renamed into place.
#[derive(Debug)]
pub struct Staged {
    tmp_path: PathBuf,
    path: PathBuf,
}

impl Staged {
    /// Rename the temp file over the target.
    pub fn commit(self) -> Result<()> {
        fs::rename(&self.tmp_path, &self.path)?;
        Ok(())
    }

    /// Remove the temp file without touching the target.
    pub fn discard(self) {
        let _ = fs::remove_file(&self.tmp_path);
    }

    pub fn tmp_path(&self) -> &Path {
        &self.tmp_path
    }
}

/// Serialize `value` into `path`'s temp file, leaving `path` untouched
/// until `Staged::commit`.
pub fn stage_json<T: Serialize>(path: &Path, value: &T) -> Result<Staged> {
    let buf = serde_json::to_vec_pretty(value)
        .map_err(|e| VaultError::SerializationError(format!("{}: {e}", path.display())))?;

    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    // Owner-only from the moment the file exists.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&tmp_path)?;
    // A leftover temp file keeps its old mode; tighten it before writing.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(&buf)?;
    file.sync_all()?;

    Ok(Staged {
        tmp_path,
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::URL_SAFE as BASE64;
use base64::Engine;

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
