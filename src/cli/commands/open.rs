//! `gitvault open` — restore the current vault into the open directory.

use std::path::Path;

use crate::cli::output;
use crate::cli::{load_project, prompt_password, Cli};
use crate::errors::{GitVaultError, Result};
use crate::vault;

/// Execute the `open` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (root, settings) = load_project(cli)?;
    let open_path = settings.open_path(&root);

    // 1. Refuse to merge a vault into an existing working tree.
    if open_path.exists() {
        return Err(GitVaultError::OpenDirExists(open_path));
    }

    // 2. Pick the most recent vault.
    let vault_path = vault::find_current(&settings.vault_dir_path(&root))?;
    output::info(&format!("Opening {}", vault_path.display()));

    // 3. Decrypt and restore.
    let password = prompt_password()?;
    let summary = vault::unseal_vault(&vault_path, &root, password.as_bytes())?;

    for skipped in &summary.skipped {
        output::warning(&format!(
            "Skipped unsupported entry {}",
            skipped.display()
        ));
    }

    if !summary.roots.contains(Path::new(&settings.open_dir)) {
        let roots: Vec<String> = summary
            .roots
            .iter()
            .map(|r| r.display().to_string())
            .collect();
        output::warning(&format!(
            "Vault did not contain '{}/' — restored {} instead",
            settings.open_dir,
            roots.join(", ")
        ));
    }

    output::success(&format!(
        "Restored {} files and {} directories into '{}'",
        summary.files, summary.directories, settings.open_dir
    ));
    output::tip("Run `gitvault close` when you are done editing.");

    Ok(())
}
