//! Choosing which sealed vault is "current".
//!
//! Vault files are named `<uuid-v7>.tgz.enc`.  UUIDv7 starts with a
//! millisecond Unix timestamp and renders as fixed-width lowercase hex,
//! so string order equals creation order.  The current vault is simply
//! the lexicographically greatest candidate name.
//!
//! This only holds while every name comes from `new_vault_name`.  A
//! hand-renamed file that sorts last will be picked even if it is older.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::{GitVaultError, Result};

/// Suffix that marks a file as a sealed vault.
pub const VAULT_SUFFIX: &str = ".tgz.enc";

/// A sealed vault found on disk.
#[derive(Debug, Clone)]
pub struct VaultEntry {
    pub name: String,
    pub path: PathBuf,
    /// Size of the container file in bytes.
    pub size: u64,
    /// Seal time decoded from the UUIDv7 name, if it is one.
    pub sealed_at: Option<DateTime<Utc>>,
}

/// Generate a fresh, time-ordered vault file name.
pub fn new_vault_name() -> String {
    format!("{}{VAULT_SUFFIX}", Uuid::now_v7())
}

/// Returns `true` for names that look like a sealed vault.
pub fn is_vault_name(name: &str) -> bool {
    name.len() > VAULT_SUFFIX.len() && name.ends_with(VAULT_SUFFIX)
}

/// Pick the current vault among `names`: the greatest candidate.
///
/// Names without the vault suffix are ignored.  Returns `None` when no
/// candidate is left.
pub fn select_current<I, S>(names: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter(|n| is_vault_name(n.as_ref()))
        .map(|n| n.as_ref().to_string())
        .max()
}

/// Scan `dir` and return the path of the current vault.
pub fn find_current(dir: &Path) -> Result<PathBuf> {
    let names = vault_names(dir)?;
    select_current(&names)
        .map(|name| dir.join(name))
        .ok_or_else(|| GitVaultError::NoSealedVault(dir.to_path_buf()))
}

/// List every sealed vault in `dir`, oldest first.
pub fn list_vaults(dir: &Path) -> Result<Vec<VaultEntry>> {
    let mut names = vault_names(dir)?;
    names.sort();

    names
        .into_iter()
        .map(|name| {
            let path = dir.join(&name);
            let size = fs::metadata(&path)
                .map_err(|e| GitVaultError::fs(&path, e))?
                .len();
            let sealed_at = sealed_at(&name);
            Ok(VaultEntry {
                name,
                path,
                size,
                sealed_at,
            })
        })
        .collect()
}

/// Decode the seal timestamp embedded in a UUIDv7 vault name.
pub fn sealed_at(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(VAULT_SUFFIX)?;
    let (secs, nanos) = Uuid::parse_str(stem).ok()?.get_timestamp()?.to_unix();
    DateTime::from_timestamp(i64::try_from(secs).ok()?, nanos)
}

/// Names of regular files in `dir` carrying the vault suffix.
fn vault_names(dir: &Path) -> Result<Vec<String>> {
    let read_dir = fs::read_dir(dir).map_err(|e| GitVaultError::fs(dir, e))?;

    let mut names = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| GitVaultError::fs(dir, e))?;
        let is_file = entry
            .file_type()
            .map_err(|e| GitVaultError::fs(entry.path(), e))?
            .is_file();
        if !is_file {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            if is_vault_name(&name) {
                names.push(name);
            }
        }
    }
    Ok(names)
}
