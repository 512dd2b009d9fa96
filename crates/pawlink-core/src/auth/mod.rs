//! Credential storage for the session token pair.
//!
//! This module provides:
//! - `CredentialStore`: Trait the request pipeline reads tokens through
//! - `KeyringCredentials`: Secure OS-level storage via keyring
//! - `VaultCredentials`: Encrypted-file fallback for keychain-less platforms
//! - `MemoryCredentials`: Ephemeral storage for tests

pub mod credentials;
pub mod vault;

pub use credentials::{CredentialStore, KeyringCredentials, MemoryCredentials};
pub use vault::VaultCredentials;
