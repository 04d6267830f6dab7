//! Sealed vault container format.
//!
//! A `.tgz.enc` file is the standard base64 encoding of:
//!
//! ```text
//! [salt: 16 bytes][nonce: 12 bytes][ciphertext + GCM tag: variable]
//! ```
//!
//! - **Salt**: Argon2id salt for this seal.
//! - **Nonce**: AES-256-GCM nonce for this seal.
//! - **Ciphertext**: the encrypted `.tgz` bytes with the 16-byte tag appended.
//!
//! There is no magic, version or length prefix; the KDF parameters are
//! fixed by the format (see `crypto::kdf::KdfParams::VAULT`).

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::crypto::{NONCE_LEN, SALT_LEN};
use crate::errors::{GitVaultError, Result};

/// Fixed-size prefix: 16 (salt) + 12 (nonce).
pub const HEADER_LEN: usize = SALT_LEN + NONCE_LEN;

/// One sealed vault: salt, nonce and ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedContainer {
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext with the auth tag appended.
    pub ciphertext: Vec<u8>,
}

impl SealedContainer {
    /// The raw binary layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + self.ciphertext.len());
        buf.extend_from_slice(&self.salt); // 16 bytes
        buf.extend_from_slice(&self.nonce); // 12 bytes
        buf.extend_from_slice(&self.ciphertext);
        buf
    }

    /// Split a raw binary blob into its three regions.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(GitVaultError::InvalidContainer(format!(
                "{} bytes is too short, need at least {HEADER_LEN}",
                data.len()
            )));
        }

        let (salt, rest) = data.split_at(SALT_LEN);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        Ok(Self {
            salt: salt
                .try_into()
                .map_err(|_| GitVaultError::InvalidContainer("bad salt length".into()))?,
            nonce: nonce
                .try_into()
                .map_err(|_| GitVaultError::InvalidContainer("bad nonce length".into()))?,
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Encode for storage as a flat text file.
    pub fn serialize(&self) -> String {
        BASE64.encode(self.to_bytes())
    }

    /// Decode the textual form written by `serialize`.
    ///
    /// Surrounding whitespace (e.g. a trailing newline added by an
    /// editor or a git filter) is ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let data = BASE64
            .decode(text.trim())
            .map_err(|e| GitVaultError::InvalidContainer(format!("invalid base64: {e}")))?;
        Self::from_bytes(&data)
    }
}

/// Write a container to disk **atomically**.
///
/// The text goes to a hidden temp file in the same directory, which is
/// then renamed over `path`, so readers never see a half-written vault.
pub fn write_container(path: &Path, container: &SealedContainer) -> Result<()> {
    let name = path.file_name().ok_or_else(|| {
        GitVaultError::CommandFailed(format!("{} is not a file path", path.display()))
    })?;
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(".{}.tmp", name.to_string_lossy()));

    fs::write(&tmp_path, container.serialize()).map_err(|e| GitVaultError::fs(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| GitVaultError::fs(path, e))?;

    Ok(())
}

/// Read and parse a container file.
pub fn read_container(path: &Path) -> Result<SealedContainer> {
    let text = fs::read_to_string(path).map_err(|e| GitVaultError::fs(path, e))?;
    SealedContainer::parse(&text)
}
