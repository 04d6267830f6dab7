//! `gitvault list` — show sealed vaults, oldest first.

use crate::cli::output;
use crate::cli::{load_project, Cli};
use crate::errors::Result;
use crate::vault;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (root, settings) = load_project(cli)?;
    let vault_dir = settings.vault_dir_path(&root);

    let vaults = vault::list_vaults(&vault_dir)?;
    let current = vault::select_current(vaults.iter().map(|v| v.name.as_str()));

    output::print_vaults_table(&vaults, current.as_deref());

    if vaults.len() > 1 {
        output::tip("Only the vault marked * is opened; older ones can be deleted.");
    }

    Ok(())
}
