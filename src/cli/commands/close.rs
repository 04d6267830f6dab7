//! `gitvault close` — seal the open directory into a new vault.
//!
//! Archives, compresses and encrypts `<root>/<open_dir>`, writes
//! `<vault_dir>/<uuid-v7>.tgz.enc`, then removes the open directory.

use crate::cli::output;
use crate::cli::{load_project, prompt_new_password, Cli};
use crate::errors::{GitVaultError, Result};
use crate::vault;

/// Execute the `close` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (root, settings) = load_project(cli)?;
    let open_path = settings.open_path(&root);

    if !open_path.is_dir() {
        output::tip("Run `gitvault open` to restore the latest vault first.");
        return Err(GitVaultError::OpenDirMissing(open_path));
    }

    let password = prompt_new_password()?;

    let vault_path = vault::seal_dir(
        &open_path,
        &settings.vault_dir_path(&root),
        password.as_bytes(),
        settings.compression_level,
    )?;

    output::success(&format!(
        "Sealed '{}' into {}",
        settings.open_dir,
        vault_path.display()
    ));
    output::tip("Commit the .tgz.enc file; run `gitvault open` to work on it again.");

    Ok(())
}
