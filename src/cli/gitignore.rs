//! `.gitignore` patching for `init`.
//!
//! The plaintext open directory and half-written vault temp files must
//! never be committed; the sealed `*.tgz.enc` files are meant to be.

use std::fs;
use std::path::Path;

use crate::errors::{GitVaultError, Result};

/// Pattern matching the temp files `write_container` renames into place.
pub const TEMP_VAULT_PATTERN: &str = ".*.tgz.enc.tmp";

/// Append each of `entries` to `<project_dir>/.gitignore` unless a line
/// with the same text is already there.
///
/// Creates the file if needed.  Returns the entries actually added.
pub fn patch_gitignore(project_dir: &Path, entries: &[&str]) -> Result<Vec<String>> {
    let gitignore_path = project_dir.join(".gitignore");

    let existing = match fs::read_to_string(&gitignore_path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(GitVaultError::fs(&gitignore_path, e)),
    };

    let missing: Vec<String> = entries
        .iter()
        .filter(|entry| !existing.lines().any(|line| line.trim() == **entry))
        .map(|entry| entry.to_string())
        .collect();

    if missing.is_empty() {
        return Ok(missing);
    }

    let mut contents = existing;
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    for entry in &missing {
        contents.push_str(entry);
        contents.push('\n');
    }

    fs::write(&gitignore_path, contents).map_err(|e| GitVaultError::fs(&gitignore_path, e))?;
    Ok(missing)
}
