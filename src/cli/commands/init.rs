//! `gitvault init` — prepare a project for sealing.

use std::fs;

use crate::cli::gitignore::{patch_gitignore, TEMP_VAULT_PATTERN};
use crate::cli::output;
use crate::cli::{load_project, Cli};
use crate::errors::{GitVaultError, Result};

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (root, settings) = load_project(cli)?;
    let open_path = settings.open_path(&root);

    // 1. Create the open directory unless a vault is waiting to be opened.
    if open_path.is_dir() {
        output::info(&format!("{} already exists", open_path.display()));
    } else if crate::vault::find_current(&settings.vault_dir_path(&root)).is_ok() {
        output::info("A sealed vault already exists — not creating an empty open directory.");
        output::tip("Run `gitvault open` to restore it.");
    } else {
        fs::create_dir_all(&open_path).map_err(|e| GitVaultError::fs(&open_path, e))?;
        output::success(&format!("Created {}", open_path.display()));
    }

    // 2. Keep plaintext and temp files out of git. Non-fatal.
    let open_entry = format!("{}/", settings.open_dir);
    match patch_gitignore(&root, &[&open_entry, TEMP_VAULT_PATTERN]) {
        Ok(added) => {
            for entry in added {
                output::info(&format!("Added '{entry}' to .gitignore"));
            }
        }
        Err(e) => output::warning(&format!("Could not update .gitignore: {e}")),
    }

    output::tip(&format!(
        "Put your files in '{}/' and run `gitvault close` to seal them.",
        settings.open_dir
    ));

    Ok(())
}
