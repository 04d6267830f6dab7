use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in GitVault.
#[derive(Debug, Error)]
pub enum GitVaultError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Wrong password and a tampered file are deliberately indistinguishable.
    #[error("Decryption failed — wrong password or corrupted vault")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Format errors ---
    #[error("Invalid vault container: {0}")]
    InvalidContainer(String),

    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    // --- Vault errors ---
    #[error("No sealed vault (*.tgz.enc) found in {0}")]
    NoSealedVault(PathBuf),

    #[error("Nothing to seal — {0} does not exist or is not a directory")]
    OpenDirMissing(PathBuf),

    #[error("{0} already exists — seal or remove it before opening another vault")]
    OpenDirExists(PathBuf),

    #[error("{0} is a symbolic link; seal the directory it points to instead")]
    SymlinkedSource(PathBuf),

    #[error("Vault directory {vault_dir} lies inside {source_dir}, which sealing deletes")]
    VaultInsideSource {
        vault_dir: PathBuf,
        source_dir: PathBuf,
    },

    // --- Filesystem errors ---
    #[error("{}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Input errors ---
    #[error("Could not read password: {0}")]
    PasswordInput(String),

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl GitVaultError {
    /// Wrap an I/O error together with the path it happened on.
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Convenience type alias for GitVault results.
pub type Result<T> = std::result::Result<T, GitVaultError>;
