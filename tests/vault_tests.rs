//! Integration tests for sealing and unsealing directory trees.

use std::fs;
use std::path::Path;

use gitvault::archive::{self, compress};
use gitvault::errors::GitVaultError;
use gitvault::vault::{self, format, VAULT_SUFFIX};
use tempfile::TempDir;

const PASSWORD: &[u8] = b"correct-password";

/// Helper: build `<root>/open` with `notes.txt` and `sub/a.bin`.
fn sample_tree(root: &Path) -> std::path::PathBuf {
    let open = root.join("open");
    fs::create_dir_all(open.join("sub")).unwrap();
    fs::write(open.join("notes.txt"), "hello").unwrap();
    fs::write(open.join("sub/a.bin"), [0x00, 0xFF]).unwrap();
    open
}

fn vault_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .filter(|n| n.ends_with(VAULT_SUFFIX))
        .collect();
    names.sort();
    names
}

// ---------------------------------------------------------------------------
// End-to-end scenario
// ---------------------------------------------------------------------------

#[test]
fn seal_then_unseal_restores_tree() {
    let root = TempDir::new().unwrap();
    let open = sample_tree(root.path());

    let vault_path = vault::seal_dir(&open, root.path(), PASSWORD, 6).expect("seal");

    // Source removed, exactly one vault written.
    assert!(!open.exists());
    assert!(vault_path.exists());
    assert_eq!(vault_files(root.path()).len(), 1);

    let summary = vault::unseal_vault(&vault_path, root.path(), PASSWORD).expect("unseal");
    assert_eq!(summary.files, 2);

    assert_eq!(fs::read_to_string(open.join("notes.txt")).unwrap(), "hello");
    assert_eq!(fs::read(open.join("sub/a.bin")).unwrap(), vec![0x00, 0xFF]);

    // Vault consumed.
    assert!(!vault_path.exists());
    assert!(vault_files(root.path()).is_empty());
}

#[test]
fn wrong_password_leaves_no_tree_and_keeps_vault() {
    let root = TempDir::new().unwrap();
    let open = sample_tree(root.path());
    let vault_path = vault::seal_dir(&open, root.path(), PASSWORD, 6).unwrap();

    let result = vault::unseal_vault(&vault_path, root.path(), b"wrong-password");

    assert!(matches!(result, Err(GitVaultError::DecryptionFailed)));
    assert!(!open.exists());
    assert!(vault_path.exists());
}

#[test]
fn vault_file_is_base64_of_container() {
    let root = TempDir::new().unwrap();
    let open = sample_tree(root.path());
    let vault_path = vault::seal_dir(&open, root.path(), PASSWORD, 6).unwrap();

    let text = fs::read_to_string(&vault_path).unwrap();
    assert!(text
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'='));

    let container = format::read_container(&vault_path).unwrap();
    let tgz = vault::open_bytes(&container, PASSWORD).unwrap();
    // Plaintext is a gzip stream.
    assert_eq!(&tgz[..2], &[0x1f_u8, 0x8b]);
}

#[test]
fn tampered_vault_is_rejected() {
    let root = TempDir::new().unwrap();
    let open = sample_tree(root.path());
    let vault_path = vault::seal_dir(&open, root.path(), PASSWORD, 6).unwrap();

    let mut container = format::read_container(&vault_path).unwrap();
    let last = container.ciphertext.len() - 1;
    container.ciphertext[last] ^= 0x80;
    format::write_container(&vault_path, &container).unwrap();

    assert!(matches!(
        vault::unseal_vault(&vault_path, root.path(), PASSWORD),
        Err(GitVaultError::DecryptionFailed)
    ));
    assert!(!open.exists());
}

#[test]
fn garbage_vault_is_a_format_error() {
    let root = TempDir::new().unwrap();
    let vault_path = root.path().join("x.tgz.enc");
    fs::write(&vault_path, "%%% not base64 %%%").unwrap();

    assert!(matches!(
        vault::unseal_vault(&vault_path, root.path(), PASSWORD),
        Err(GitVaultError::InvalidContainer(_))
    ));
}

#[test]
fn encrypted_non_gzip_is_an_archive_error() {
    let root = TempDir::new().unwrap();
    let vault_path = root.path().join("x.tgz.enc");
    let container = vault::seal_bytes(b"plain text, not gzip", PASSWORD).unwrap();
    format::write_container(&vault_path, &container).unwrap();

    assert!(matches!(
        vault::unseal_vault(&vault_path, root.path(), PASSWORD),
        Err(GitVaultError::InvalidArchive(_))
    ));
    // Nothing consumed on failure.
    assert!(vault_path.exists());
}

#[test]
fn sealing_a_missing_dir_fails() {
    let root = TempDir::new().unwrap();
    let result = vault::seal_dir(&root.path().join("open"), root.path(), PASSWORD, 6);
    assert!(matches!(result, Err(GitVaultError::OpenDirMissing(_))));
    assert!(vault_files(root.path()).is_empty());
}

#[test]
fn vault_dir_inside_source_is_refused() {
    let root = TempDir::new().unwrap();
    let open = sample_tree(root.path());

    for inner in [open.join("sealed"), open.clone(), open.join("./a/b")] {
        let result = vault::seal_dir(&open, &inner, PASSWORD, 6);
        assert!(
            matches!(result, Err(GitVaultError::VaultInsideSource { .. })),
            "vault dir {} must be refused",
            inner.display()
        );
    }

    assert_eq!(fs::read_to_string(open.join("notes.txt")).unwrap(), "hello");
    assert!(!open.join("sealed").exists());
    assert!(vault_files(&open).is_empty());
}

#[test]
fn vault_dir_beside_source_with_similar_name_is_allowed() {
    let root = TempDir::new().unwrap();
    let open = sample_tree(root.path());
    let beside = root.path().join("open-vaults");

    let vault_path = vault::seal_dir(&open, &beside, PASSWORD, 6).unwrap();
    assert!(vault_path.exists());
    assert!(!open.exists());
}

#[cfg(unix)]
#[test]
fn symlinked_source_is_refused_and_left_alone() {
    let root = TempDir::new().unwrap();
    let real = sample_tree(&root.path().join("elsewhere-parent"));
    let link = root.path().join("open");
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let result = vault::seal_dir(&link, root.path(), PASSWORD, 6);

    assert!(matches!(result, Err(GitVaultError::SymlinkedSource(_))));
    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(fs::read_to_string(real.join("notes.txt")).unwrap(), "hello");
    assert!(vault_files(root.path()).is_empty());
}

#[test]
fn unseal_refuses_to_overwrite_existing_root() {
    let root = TempDir::new().unwrap();
    let open = sample_tree(root.path());
    let vault_path = vault::seal_dir(&open, root.path(), PASSWORD, 6).unwrap();

    fs::create_dir_all(&open).unwrap();
    fs::write(open.join("notes.txt"), "unsaved newer work").unwrap();

    let result = vault::unseal_vault(&vault_path, root.path(), PASSWORD);

    match result {
        Err(GitVaultError::OpenDirExists(path)) => assert_eq!(path, open),
        other => panic!("expected OpenDirExists, got {other:?}"),
    }
    assert_eq!(
        fs::read_to_string(open.join("notes.txt")).unwrap(),
        "unsaved newer work"
    );
    assert!(!open.join("sub").exists());
    assert!(vault_path.exists());
}

#[test]
fn unseal_refuses_when_root_is_a_plain_file() {
    let root = TempDir::new().unwrap();
    let open = sample_tree(root.path());
    let vault_path = vault::seal_dir(&open, root.path(), PASSWORD, 6).unwrap();

    fs::write(&open, "a file named like the tree").unwrap();

    assert!(matches!(
        vault::unseal_vault(&vault_path, root.path(), PASSWORD),
        Err(GitVaultError::OpenDirExists(_))
    ));
    assert!(vault_path.exists());
}

// ---------------------------------------------------------------------------
// Selection across several seals
// ---------------------------------------------------------------------------

#[test]
fn latest_seal_is_current() {
    let root = TempDir::new().unwrap();
    let vaults = root.path().join("vaults");

    let open = sample_tree(root.path());
    let first = vault::seal_dir(&open, &vaults, PASSWORD, 6).unwrap();

    fs::create_dir_all(&open).unwrap();
    fs::write(open.join("notes.txt"), "second version").unwrap();
    let second = vault::seal_dir(&open, &vaults, PASSWORD, 6).unwrap();

    assert_eq!(vault::find_current(&vaults).unwrap(), second);
    assert_eq!(vault::list_vaults(&vaults).unwrap().len(), 2);

    vault::unseal_vault(&second, root.path(), PASSWORD).unwrap();
    assert_eq!(
        fs::read_to_string(open.join("notes.txt")).unwrap(),
        "second version"
    );
    assert_eq!(vault::find_current(&vaults).unwrap(), first);
}

#[test]
fn empty_vault_dir_has_no_current() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("readme.md"), "x").unwrap();
    assert!(matches!(
        vault::find_current(root.path()),
        Err(GitVaultError::NoSealedVault(_))
    ));
}

// ---------------------------------------------------------------------------
// Archive round-trip (no crypto)
// ---------------------------------------------------------------------------

#[test]
fn archive_roundtrip_through_gzip() {
    let src = TempDir::new().unwrap();
    let open = src.path().join("open");
    fs::create_dir_all(open.join("a/b/c")).unwrap();
    fs::create_dir_all(open.join("empty")).unwrap();
    fs::write(open.join("a/one.txt"), "1").unwrap();
    fs::write(open.join("a/b/c/deep.bin"), vec![7u8; 70_000]).unwrap();
    fs::write(open.join("zero.txt"), "").unwrap();

    let tgz = archive::pack_dir(&open, compress::encoder(Vec::new(), 9))
        .unwrap()
        .finish()
        .unwrap();
    let tar = compress::decompress(&tgz).unwrap();

    let dest = TempDir::new().unwrap();
    let summary = archive::unpack(&tar[..], dest.path()).unwrap();
    assert_eq!(summary.files, 3);
    assert_eq!(summary.directories, 5);

    let out = dest.path().join("open");
    assert_eq!(fs::read_to_string(out.join("a/one.txt")).unwrap(), "1");
    assert_eq!(fs::read(out.join("a/b/c/deep.bin")).unwrap(), vec![7u8; 70_000]);
    assert_eq!(fs::read(out.join("zero.txt")).unwrap(), Vec::<u8>::new());
    assert!(out.join("empty").is_dir());
}

#[cfg(unix)]
#[test]
fn permission_bits_survive_seal_and_unseal() {
    use std::os::unix::fs::PermissionsExt;

    let root = TempDir::new().unwrap();
    let open = sample_tree(root.path());
    fs::set_permissions(open.join("notes.txt"), fs::Permissions::from_mode(0o600)).unwrap();
    fs::set_permissions(open.join("sub/a.bin"), fs::Permissions::from_mode(0o751)).unwrap();
    fs::set_permissions(open.join("sub"), fs::Permissions::from_mode(0o700)).unwrap();

    let vault_path = vault::seal_dir(&open, root.path(), PASSWORD, 6).unwrap();
    vault::unseal_vault(&vault_path, root.path(), PASSWORD).unwrap();

    let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode(&open.join("notes.txt")), 0o600);
    assert_eq!(mode(&open.join("sub/a.bin")), 0o751);
    assert_eq!(mode(&open.join("sub")), 0o700);
}
