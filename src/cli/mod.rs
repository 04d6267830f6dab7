//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod gitignore;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{GitVaultError, Result};

/// Minimum password length accepted when sealing.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable checked before prompting for a password.
pub const PASSWORD_ENV: &str = "GITVAULT_PASSWORD";

/// GitVault CLI: seal a working directory into an encrypted vault file.
#[derive(Parser)]
#[command(
    name = "gitvault",
    about = "Seal a directory into a password-encrypted vault file",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root holding the open directory and the vaults (default: .)
    #[arg(short, long, default_value = ".", global = true)]
    pub dir: String,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create the open directory and keep it out of git
    Init,

    /// Seal the open directory into a new vault and remove it
    #[command(alias = "seal")]
    Close,

    /// Restore the most recent vault into the open directory
    #[command(alias = "unseal")]
    Open,

    /// List sealed vaults
    List,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the vault password, trying in order:
/// 1. `GITVAULT_PASSWORD` env var (scripts, CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Vault password")
        .interact()
        .map_err(|e| GitVaultError::PasswordInput(e.to_string()))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for the password that will seal a vault, with confirmation.
///
/// Also respects `GITVAULT_PASSWORD` for scripted usage.
/// Enforces a minimum password length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        if pw.len() < MIN_PASSWORD_LEN {
            return Err(GitVaultError::PasswordTooShort(MIN_PASSWORD_LEN));
        }
        return Ok(pw);
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Vault password")
            .with_confirmation(
                "Confirm vault password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| GitVaultError::PasswordInput(e.to_string()))?;

        if password.len() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Resolve the project root from `--dir`.
pub fn project_root(cli: &Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(&cli.dir))
}

/// Resolve the project root and load its settings.
pub fn load_project(cli: &Cli) -> Result<(PathBuf, Settings)> {
    let root = project_root(cli)?;
    if !root.is_dir() {
        return Err(GitVaultError::CommandFailed(format!(
            "project directory {} does not exist",
            root.display()
        )));
    }
    let settings = Settings::load(&root)?;
    Ok((root, settings))
}
