//! Password-based key derivation using Argon2id.
//!
//! The cost parameters are part of the vault format: a vault sealed
//! with one set of parameters can only be opened with the same set.
//! They are therefore fixed constants (`KdfParams::VAULT`) rather than
//! configuration.  `derive_key_with_params` exists so tests can run
//! with cheaper settings.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use zeroize::Zeroize;

use super::keys::{VaultKey, KEY_LEN};
use crate::errors::{GitVaultError, Result};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Parallelism lanes.
    pub parallelism: u32,
}

impl KdfParams {
    /// Parameters baked into the current vault format:
    /// one pass, 64 MiB, four lanes.
    pub const VAULT: Self = Self {
        memory_kib: 64 * 1024,
        iterations: 1,
        parallelism: 4,
    };
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::VAULT
    }
}

/// Derive the 32-byte vault key from a password and salt.
///
/// Same password + salt always yields the same key.
pub fn derive_key(password: &[u8], salt: &[u8; SALT_LEN]) -> Result<VaultKey> {
    derive_key_with_params(password, salt, &KdfParams::VAULT)
}

/// Derive a 32-byte key with explicit Argon2id parameters.
pub fn derive_key_with_params(
    password: &[u8],
    salt: &[u8],
    kdf_params: &KdfParams,
) -> Result<VaultKey> {
    let params = Params::new(
        kdf_params.memory_kib,
        kdf_params.iterations,
        kdf_params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| GitVaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(password, salt, &mut key)
        .map_err(|e| GitVaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    let vault_key = VaultKey::new(key);
    key.zeroize();
    Ok(vault_key)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
