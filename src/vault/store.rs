//! Seal and unseal: the full pipeline.
//!
//! ```text
//! seal:   dir -> tar -> gzip -> Argon2id(password, salt) -> AES-256-GCM -> base64 -> file
//! unseal: file -> base64 -> Argon2id(password, salt) -> AES-256-GCM -> gunzip -> untar -> dir
//! ```
//!
//! Every stage finishes before the next one starts.  A failure anywhere
//! aborts with nothing rolled back; the source directory and the vault
//! file are only removed once everything else has succeeded.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::archive::{self, compress, UnpackSummary};
use crate::crypto::encryption::{decrypt, encrypt, generate_nonce};
use crate::crypto::kdf::{derive_key, generate_salt};
use crate::errors::{GitVaultError, Result};

use super::format::{self, SealedContainer};
use super::selector;

/// Encrypt `plaintext` under `password` with a fresh salt and nonce.
pub fn seal_bytes(plaintext: &[u8], password: &[u8]) -> Result<SealedContainer> {
    let salt = generate_salt();
    let nonce = generate_nonce();

    let key = derive_key(password, &salt)?;
    let ciphertext = encrypt(key.as_bytes(), &nonce, plaintext)?;

    Ok(SealedContainer {
        salt,
        nonce,
        ciphertext,
    })
}

/// Decrypt a container with `password`.
///
/// Fails with `DecryptionFailed` on a wrong password or any tampering.
pub fn open_bytes(container: &SealedContainer, password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let key = derive_key(password, &container.salt)?;
    let plaintext = decrypt(key.as_bytes(), &container.nonce, &container.ciphertext)?;
    Ok(Zeroizing::new(plaintext))
}

/// Seal the directory `source` into a new vault file inside `vault_dir`.
///
/// On success the source directory is removed and the new vault's path
/// is returned.
pub fn seal_dir(
    source: &Path,
    vault_dir: &Path,
    password: &[u8],
    compression_level: u32,
) -> Result<PathBuf> {
    if !source.is_dir() {
        return Err(GitVaultError::OpenDirMissing(source.to_path_buf()));
    }

    let source_abs = archive::absolute_source(source)?;
    let vault_abs = resolve_lenient(vault_dir)?;
    if vault_abs.starts_with(&source_abs) {
        return Err(GitVaultError::VaultInsideSource {
            vault_dir: vault_dir.to_path_buf(),
            source_dir: source.to_path_buf(),
        });
    }

    let encoder = archive::pack_dir(source, compress::encoder(Vec::new(), compression_level))?;
    let tgz = Zeroizing::new(encoder.finish()?);
    debug!(bytes = tgz.len(), "archived and compressed");

    let container = seal_bytes(&tgz, password)?;
    drop(tgz);

    fs::create_dir_all(vault_dir).map_err(|e| GitVaultError::fs(vault_dir, e))?;

    let name = selector::new_vault_name();
    if let Ok(current) = selector::find_current(vault_dir) {
        let current_name = current.file_name().unwrap_or_default().to_string_lossy();
        if current_name.as_ref() >= name.as_str() {
            warn!(
                existing = %current.display(),
                new = %name,
                "an existing vault sorts after the new one and will stay current"
            );
        }
    }

    let vault_path = vault_dir.join(&name);
    format::write_container(&vault_path, &container)?;
    info!(vault = %vault_path.display(), "vault sealed");

    fs::remove_dir_all(source).map_err(|e| GitVaultError::fs(source, e))?;

    Ok(vault_path)
}

/// Unseal `vault_path` and restore its tree under `destination`.
///
/// Nothing is written under `destination` unless decryption succeeds and
/// none of the archive's top-level names already exist there.  On
/// success the vault file is removed.
pub fn unseal_vault(
    vault_path: &Path,
    destination: &Path,
    password: &[u8],
) -> Result<UnpackSummary> {
    let container = format::read_container(vault_path)?;

    let tgz = open_bytes(&container, password)?;
    let tar = Zeroizing::new(compress::decompress(&tgz)?);
    drop(tgz);
    debug!(bytes = tar.len(), "decrypted and decompressed");

    for root in archive::roots(&tar[..])? {
        let target = destination.join(&root);
        if fs::symlink_metadata(&target).is_ok() {
            return Err(GitVaultError::OpenDirExists(target));
        }
    }

    fs::create_dir_all(destination).map_err(|e| GitVaultError::fs(destination, e))?;
    let summary = archive::unpack(&tar[..], destination)?;

    fs::remove_file(vault_path).map_err(|e| GitVaultError::fs(vault_path, e))?;
    info!(vault = %vault_path.display(), files = summary.files, "vault opened");

    Ok(summary)
}

/// Canonicalize the longest existing prefix of `path` and re-attach the
/// components that do not exist yet.
fn resolve_lenient(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    loop {
        match fs::canonicalize(existing) {
            Ok(mut resolved) => {
                resolved.extend(missing.iter().rev());
                return Ok(resolved);
            }
            Err(e) => match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    missing.push(name);
                    existing = parent;
                }
                _ => return Err(GitVaultError::fs(path, e)),
            },
        }
    }
}
