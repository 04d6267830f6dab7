//! Vault module: sealed vault files and the seal/unseal pipeline.
//!
//! This module provides:
//! - The salt/nonce/ciphertext container and its base64 file form (`format`)
//! - Vault naming and "current vault" selection (`selector`)
//! - The seal and unseal operations (`store`)

pub mod format;
pub mod selector;
pub mod store;

pub use format::SealedContainer;
pub use selector::{find_current, list_vaults, select_current, VaultEntry, VAULT_SUFFIX};
pub use store::{open_bytes, seal_bytes, seal_dir, unseal_vault};
