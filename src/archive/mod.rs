//! Directory tree <-> tar stream.
//!
//! `pack_dir` walks a directory depth-first in file-name order and writes
//! one tar record per entry.  Paths are stored relative to the *parent*
//! of the source, so the top-level directory name travels with the
//! archive (`open/notes.txt`, not `notes.txt`).  A directory's record is
//! always written before any of its children's.
//!
//! `unpack` is the inverse.  It handles directories and regular files
//! only; any other entry type is skipped and reported in the returned
//! `UnpackSummary`.

pub mod compress;

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::errors::{GitVaultError, Result};

/// What `unpack` did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UnpackSummary {
    /// Top-level names created under the destination.
    pub roots: BTreeSet<PathBuf>,
    /// Number of directories created.
    pub directories: usize,
    /// Number of regular files written.
    pub files: usize,
    /// Entries of unsupported types (symlinks, devices, ...) that were skipped.
    pub skipped: Vec<PathBuf>,
}

/// Serialize the directory tree at `source` as a tar stream into `writer`.
///
/// Returns the writer so the caller can finish any wrapping encoder.
pub fn pack_dir<W: Write>(source: &Path, writer: W) -> Result<W> {
    let source = absolute_source(source)?;
    let base = source.parent().ok_or_else(|| {
        GitVaultError::CommandFailed("refusing to archive the filesystem root".into())
    })?;

    let mut builder = tar::Builder::new(writer);
    builder.follow_symlinks(false);

    for entry in WalkDir::new(&source).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(&source).to_path_buf();
            GitVaultError::fs(path, io::Error::from(e))
        })?;
        let path = entry.path();
        let rel = path
            .strip_prefix(base)
            .map_err(|_| GitVaultError::InvalidArchive(format!("{} escapes source", path.display())))?;
        let file_type = entry.file_type();

        let appended = if file_type.is_dir() {
            builder.append_dir(rel, path)
        } else if file_type.is_file() || file_type.is_symlink() {
            builder.append_path_with_name(path, rel)
        } else {
            warn!(path = %path.display(), "skipping unsupported file type");
            continue;
        };
        appended.map_err(|e| GitVaultError::fs(path, e))?;
        debug!(entry = %rel.display(), "archived");
    }

    builder
        .into_inner()
        .map_err(|e| GitVaultError::fs(&source, e))
}

/// Resolve `source` to an absolute path without following its final
/// component, so the archived top-level name is the one the caller gave.
///
/// A symlinked source is refused: archiving it would leave the real tree
/// behind in plaintext once the link is removed.
pub fn absolute_source(source: &Path) -> Result<PathBuf> {
    let meta = fs::symlink_metadata(source).map_err(|e| GitVaultError::fs(source, e))?;
    if meta.file_type().is_symlink() {
        return Err(GitVaultError::SymlinkedSource(source.to_path_buf()));
    }
    if !meta.is_dir() {
        return Err(GitVaultError::OpenDirMissing(source.to_path_buf()));
    }

    match (source.parent(), source.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            let parent = fs::canonicalize(parent).map_err(|e| GitVaultError::fs(parent, e))?;
            Ok(parent.join(name))
        }
        // `.`, `..` and `/` have no name of their own.
        _ => fs::canonicalize(source).map_err(|e| GitVaultError::fs(source, e)),
    }
}

/// Top-level names a tar stream would create, without writing anything.
pub fn roots<R: Read>(reader: R) -> Result<BTreeSet<PathBuf>> {
    let mut archive = tar::Archive::new(reader);
    let mut roots = BTreeSet::new();

    let entries = archive
        .entries()
        .map_err(|e| GitVaultError::InvalidArchive(format!("cannot read entries: {e}")))?;
    for entry in entries {
        let entry =
            entry.map_err(|e| GitVaultError::InvalidArchive(format!("bad entry header: {e}")))?;
        let rel = entry
            .path()
            .map_err(|e| GitVaultError::InvalidArchive(format!("bad entry path: {e}")))?;
        let rel = sanitize(&rel)?;
        if let Some(root) = rel.components().next() {
            roots.insert(PathBuf::from(root.as_os_str()));
        }
    }
    Ok(roots)
}

/// Restore a tar stream produced by `pack_dir` under `destination`.
///
/// Directory permission bits are applied after every entry has been
/// written, so read-only directories can still be populated.
pub fn unpack<R: Read>(reader: R, destination: &Path) -> Result<UnpackSummary> {
    let mut archive = tar::Archive::new(reader);
    let mut summary = UnpackSummary::default();
    let mut dir_modes: Vec<(PathBuf, u32)> = Vec::new();

    let entries = archive
        .entries()
        .map_err(|e| GitVaultError::InvalidArchive(format!("cannot read entries: {e}")))?;

    for entry in entries {
        let mut entry =
            entry.map_err(|e| GitVaultError::InvalidArchive(format!("bad entry header: {e}")))?;
        let rel = entry
            .path()
            .map_err(|e| GitVaultError::InvalidArchive(format!("bad entry path: {e}")))?
            .into_owned();
        let rel = sanitize(&rel)?;
        let Some(root) = rel.components().next().map(|c| PathBuf::from(c.as_os_str())) else {
            continue;
        };
        let target = destination.join(&rel);
        let header = entry.header();
        let entry_type = header.entry_type();
        let mode = header.mode().map_err(|e| {
            GitVaultError::InvalidArchive(format!("bad mode for '{}': {e}", rel.display()))
        })?;

        if entry_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| GitVaultError::fs(&target, e))?;
            dir_modes.push((target, mode));
            summary.directories += 1;
        } else if entry_type.is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| GitVaultError::fs(parent, e))?;
            }
            let mut out = File::create(&target).map_err(|e| GitVaultError::fs(&target, e))?;
            io::copy(&mut entry, &mut out).map_err(|e| GitVaultError::fs(&target, e))?;
            set_mode(&target, mode)?;
            summary.files += 1;
        } else {
            warn!(entry = %rel.display(), "skipping unsupported archive entry");
            summary.skipped.push(rel);
            continue;
        }

        summary.roots.insert(root);
    }

    for (dir, mode) in dir_modes.iter().rev() {
        set_mode(dir, *mode)?;
    }

    debug!(
        files = summary.files,
        directories = summary.directories,
        skipped = summary.skipped.len(),
        "unpacked archive"
    );
    Ok(summary)
}

/// Keep only plain path components; reject anything that could land
/// outside the destination.
fn sanitize(path: &Path) -> Result<PathBuf> {
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(GitVaultError::InvalidArchive(format!(
                    "entry '{}' escapes the destination",
                    path.display()
                )));
            }
        }
    }
    Ok(clean)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
        .map_err(|e| GitVaultError::fs(path, e))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
