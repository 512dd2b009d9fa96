//! Encrypted-file credential store for platforms without a usable keychain.
//!
//! On-disk layout: `salt(16) || nonce(24) || ciphertext`. The cipher key is
//! derived from the app secret with Argon2id using the per-file salt, and
//! the token pair is sealed with XChaCha20-Poly1305. Every save rewrites
//! the whole file through a temp-file rename.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{anyhow, Context, Result};
use argon2::Argon2;
use chacha20poly1305::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Key, XChaCha20Poly1305, XNonce,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::credentials::CredentialStore;

/// Vault file name inside the service data directory.
const VAULT_FILE: &str = "credentials.vault";

/// Argon2id salt length in bytes.
const SALT_LEN: usize = 16;

/// XChaCha20 nonce length in bytes.
const NONCE_LEN: usize = 24;

/// Derived key length in bytes (XChaCha20-Poly1305 key size).
const KEY_LEN: usize = 32;

#[derive(Serialize, Deserialize)]
struct VaultRecord {
    access_token: String,
    refresh_token: String,
}

/// Token storage sealed into an encrypted file.
pub struct VaultCredentials {
    path: PathBuf,
    secret: Vec<u8>,
    guard: Mutex<()>,
}

impl VaultCredentials {
    /// Store under the platform data directory, keyed by `service`.
    pub fn new(service: &str, secret: &[u8]) -> Result<Self> {
        let base = dirs::data_dir().ok_or_else(|| anyhow!("No data directory available"))?;
        let dir = base.join(service);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        Ok(Self::at_path(dir.join(VAULT_FILE), secret))
    }

    /// Store at an explicit path. Used by tests and custom deployments.
    pub fn at_path(path: impl Into<PathBuf>, secret: &[u8]) -> Self {
        Self {
            path: path.into(),
            secret: secret.to_vec(),
            guard: Mutex::new(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.guard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn derive_key(&self, salt: &[u8]) -> Result<[u8; KEY_LEN]> {
        let mut key = [0u8; KEY_LEN];
        Argon2::default()
            .hash_password_into(&self.secret, salt, &mut key)
            .map_err(|error| anyhow!("Key derivation failed: {error}"))?;
        Ok(key)
    }

    fn seal(&self, record: &VaultRecord) -> Result<Vec<u8>> {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let key = self.derive_key(&salt)?;
        let cipher = XChaCha20Poly1305::new(Key::from_slice(&key));
        let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
        let plain = serde_json::to_vec(record).context("Failed to encode vault record")?;
        let sealed = cipher
            .encrypt(&nonce, plain.as_slice())
            .map_err(|error| anyhow!("Encryption failed: {error}"))?;

        let mut out = Vec::with_capacity(SALT_LEN + NONCE_LEN + sealed.len());
        out.extend_from_slice(&salt);
        out.extend_from_slice(nonce.as_slice());
        out.extend_from_slice(&sealed);
        Ok(out)
    }

    fn unseal(&self, raw: &[u8]) -> Result<VaultRecord> {
        if raw.len() < SALT_LEN + NONCE_LEN {
            return Err(anyhow!("Vault file truncated"));
        }
        let (salt, rest) = raw.split_at(SALT_LEN);
        let (nonce, sealed) = rest.split_at(NONCE_LEN);
        let key = self.derive_key(salt)?;
        let cipher = XChaCha20Poly1305::new(Key::from_slice(&key));
        let plain = cipher
            .decrypt(XNonce::from_slice(nonce), sealed)
            .map_err(|error| anyhow!("Decryption failed: {error}"))?;
        serde_json::from_slice(&plain).context("Failed to decode vault record")
    }

    fn read_record(&self) -> Option<VaultRecord> {
        if !self.path.exists() {
            return None;
        }
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(path = %self.path.display(), error = %error, "Vault read failed");
                return None;
            }
        };
        match self.unseal(&raw) {
            Ok(record) => Some(record),
            Err(error) => {
                warn!(path = %self.path.display(), error = %error, "Vault unseal failed");
                None
            }
        }
    }

    fn write_record(&self, record: &VaultRecord) -> Result<()> {
        let sealed = self.seal(record)?;
        let tmp = self.path.with_extension("vault.tmp");
        std::fs::write(&tmp, &sealed)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

impl CredentialStore for VaultCredentials {
    fn save(&self, access_token: &str, refresh_token: &str) {
        let _guard = self.lock();
        let record = VaultRecord {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
        };
        match self.write_record(&record) {
            Ok(()) => debug!("Stored session token pair in vault"),
            Err(error) => warn!(error = %error, "Failed to persist session tokens"),
        }
    }

    fn access_token(&self) -> Option<String> {
        let _guard = self.lock();
        self.read_record().map(|record| record.access_token)
    }

    fn refresh_token(&self) -> Option<String> {
        let _guard = self.lock();
        self.read_record().map(|record| record.refresh_token)
    }

    fn clear(&self) {
        let _guard = self.lock();
        if self.path.exists() {
            if let Err(error) = std::fs::remove_file(&self.path) {
                warn!(path = %self.path.display(), error = %error, "Failed to remove vault file");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_vault(secret: &[u8]) -> (tempfile::TempDir, VaultCredentials) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = VaultCredentials::at_path(dir.path().join("test.vault"), secret);
        (dir, store)
    }

    #[test]
    fn test_vault_round_trip() {
        let (_dir, store) = temp_vault(b"app-secret");
        store.save("A1", "R1");
        assert_eq!(store.access_token().as_deref(), Some("A1"));
        assert_eq!(store.refresh_token().as_deref(), Some("R1"));
    }

    #[test]
    fn test_vault_clear_removes_file() {
        let (_dir, store) = temp_vault(b"app-secret");
        store.save("A1", "R1");
        store.clear();
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
    }

    #[test]
    fn test_vault_file_is_not_plaintext() {
        let (dir, store) = temp_vault(b"app-secret");
        store.save("A1-very-secret", "R1-very-secret");
        let raw = std::fs::read(dir.path().join("test.vault")).expect("vault file");
        let haystack = String::from_utf8_lossy(&raw);
        assert!(!haystack.contains("A1-very-secret"));
        assert!(!haystack.contains("R1-very-secret"));
    }

    #[test]
    fn test_tampered_vault_reads_as_absent() {
        let (dir, store) = temp_vault(b"app-secret");
        store.save("A1", "R1");
        let path = dir.path().join("test.vault");
        let mut raw = std::fs::read(&path).expect("vault file");
        let last = raw.len() - 1;
        raw[last] ^= 0xFF;
        std::fs::write(&path, &raw).expect("rewrite");
        assert!(store.access_token().is_none());
    }

    #[test]
    fn test_wrong_secret_reads_as_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("test.vault");
        let writer = VaultCredentials::at_path(&path, b"right-secret");
        writer.save("A1", "R1");
        let reader = VaultCredentials::at_path(&path, b"wrong-secret");
        assert!(reader.access_token().is_none());
    }
}
