//! AES-256-GCM authenticated encryption.
//!
//! The nonce is passed in explicitly because the vault container stores
//! it in its own fixed-width slot (see `vault::format`).  Callers must
//! use `generate_nonce` for every encryption; a (key, nonce) pair is
//! never reused since every seal also derives a fresh key from a fresh
//! salt.
//!
//! Output layout: `ciphertext || 16-byte auth tag`.  No associated data.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use crate::errors::{GitVaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// Generate a random 12-byte nonce from the OS RNG.
pub fn generate_nonce() -> [u8; NONCE_LEN] {
    Aes256Gcm::generate_nonce(&mut OsRng).into()
}

/// Encrypt `plaintext` with a 32-byte `key` under `nonce`.
///
/// Returns the ciphertext with the auth tag appended.
pub fn encrypt(key: &[u8], nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| GitVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| GitVaultError::EncryptionFailed(format!("encryption error: {e}")))
}

/// Decrypt and authenticate data produced by `encrypt`.
///
/// Every failure, including a bad key length or a truncated input,
/// collapses into `DecryptionFailed` so nothing about the cause leaks.
pub fn decrypt(key: &[u8], nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.len() < TAG_LEN {
        return Err(GitVaultError::DecryptionFailed);
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| GitVaultError::DecryptionFailed)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| GitVaultError::DecryptionFailed)
}
