use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::archive::compress;
use crate::errors::{GitVaultError, Result};

/// Project-level configuration, loaded from `.gitvault.toml`.
///
/// Every field has a sensible default so GitVault works out-of-the-box
/// without any config file at all.  The KDF cost is deliberately *not*
/// here: it is fixed by the vault format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Name of the plaintext working directory (relative to project root).
    #[serde(default = "default_open_dir")]
    pub open_dir: String,

    /// Directory (relative to project root) where `*.tgz.enc` files live.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// Gzip level used when sealing, 0-9.
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_open_dir() -> String {
    "open".to_string()
}

fn default_vault_dir() -> String {
    ".".to_string()
}

fn default_compression_level() -> u32 {
    compress::DEFAULT_LEVEL
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            open_dir: default_open_dir(),
            vault_dir: default_vault_dir(),
            compression_level: default_compression_level(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = ".gitvault.toml";

    /// Load settings from `<project_dir>/.gitvault.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed or holds invalid values,
    /// an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .map_err(|e| GitVaultError::fs(&config_path, e))?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            GitVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check values that serde alone cannot.
    ///
    /// `open_dir` must be a single plain name: unsealing restores the
    /// archived top-level directory directly under the project root.
    pub fn validate(&self) -> Result<()> {
        let mut components = Path::new(&self.open_dir).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => {
                return Err(GitVaultError::ConfigError(format!(
                    "open_dir '{}' must be a single directory name",
                    self.open_dir
                )));
            }
        }

        if self.vault_dir.is_empty() {
            return Err(GitVaultError::ConfigError(
                "vault_dir cannot be empty".into(),
            ));
        }

        // Sealing removes open_dir, so vaults must live outside it.
        let vault_top = Path::new(&self.vault_dir)
            .components()
            .find(|c| !matches!(c, Component::CurDir));
        if vault_top == Some(Component::Normal(self.open_dir.as_ref())) {
            return Err(GitVaultError::ConfigError(format!(
                "vault_dir '{}' must not be inside open_dir '{}'",
                self.vault_dir, self.open_dir
            )));
        }

        if self.compression_level > compress::MAX_LEVEL {
            return Err(GitVaultError::ConfigError(format!(
                "compression_level must be between 0 and {} (got {})",
                compress::MAX_LEVEL,
                self.compression_level
            )));
        }

        Ok(())
    }

    /// Full path of the plaintext working directory.
    ///
    /// Example: `project_dir/open`
    pub fn open_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.open_dir)
    }

    /// Full path of the directory holding sealed vaults.
    pub fn vault_dir_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_dir)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
