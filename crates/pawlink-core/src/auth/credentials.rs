//! Durable storage for the session token pair.
//!
//! The executor reads the access token on every send and the refresh token
//! during a refresh cycle. Stores absorb their own failures: reads that fail
//! report "absent" and writes that fail are logged at warn level, since the
//! app has no recovery for a broken keychain beyond prompting re-login.

use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use keyring::Entry;
use tracing::{debug, warn};

/// Keyring entry holding the short-lived access token.
const ACCESS_TOKEN_KEY: &str = "access-token";

/// Keyring entry holding the long-lived refresh token.
const REFRESH_TOKEN_KEY: &str = "refresh-token";

/// Storage for the access/refresh token pair.
///
/// Implementations keep the pair consistent: `save` and `clear` commit both
/// tokens under one internal lock, so a reader never sees an old access
/// token next to a new refresh token.
pub trait CredentialStore: Send + Sync {
    /// Overwrite the stored pair. Failures are logged, not surfaced.
    fn save(&self, access_token: &str, refresh_token: &str);

    fn access_token(&self) -> Option<String>;

    fn refresh_token(&self) -> Option<String>;

    /// Remove both tokens. Used on logout and unrecoverable auth failure.
    fn clear(&self);
}

// ===== OS keychain store =====

/// Token storage in the platform keychain via `keyring`.
pub struct KeyringCredentials {
    service: String,
    guard: Mutex<()>,
}

impl KeyringCredentials {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            guard: Mutex::new(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.guard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(&self.service, key).context("Failed to create keyring entry")
    }

    fn read(&self, key: &str) -> Option<String> {
        let entry = match self.entry(key) {
            Ok(entry) => entry,
            Err(error) => {
                warn!(key, error = %error, "Keychain unavailable");
                return None;
            }
        };
        match entry.get_password() {
            Ok(value) => Some(value),
            Err(keyring::Error::NoEntry) => None,
            Err(error) => {
                warn!(key, error = %error, "Keychain read failed");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        let result = self
            .entry(key)
            .and_then(|entry| entry.set_password(value).context("Failed to store token"));
        if let Err(error) = result {
            warn!(key, error = %error, "Keychain write failed");
        }
    }

    fn delete(&self, key: &str) {
        let entry = match self.entry(key) {
            Ok(entry) => entry,
            Err(error) => {
                warn!(key, error = %error, "Keychain unavailable");
                return;
            }
        };
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {}
            Err(error) => warn!(key, error = %error, "Keychain delete failed"),
        }
    }
}

impl CredentialStore for KeyringCredentials {
    fn save(&self, access_token: &str, refresh_token: &str) {
        let _guard = self.lock();
        self.write(ACCESS_TOKEN_KEY, access_token);
        self.write(REFRESH_TOKEN_KEY, refresh_token);
        debug!("Stored session token pair");
    }

    fn access_token(&self) -> Option<String> {
        let _guard = self.lock();
        self.read(ACCESS_TOKEN_KEY)
    }

    fn refresh_token(&self) -> Option<String> {
        let _guard = self.lock();
        self.read(REFRESH_TOKEN_KEY)
    }

    fn clear(&self) {
        let _guard = self.lock();
        self.delete(ACCESS_TOKEN_KEY);
        self.delete(REFRESH_TOKEN_KEY);
        debug!("Cleared session token pair");
    }
}

// ===== In-memory store =====

/// Ephemeral token storage for tests and logged-out preview sessions.
#[derive(Default)]
pub struct MemoryCredentials {
    pair: Mutex<Option<(String, String)>>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<(String, String)>> {
        self.pair.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CredentialStore for MemoryCredentials {
    fn save(&self, access_token: &str, refresh_token: &str) {
        *self.lock() = Some((access_token.to_string(), refresh_token.to_string()));
    }

    fn access_token(&self) -> Option<String> {
        self.lock().as_ref().map(|(access, _)| access.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.lock().as_ref().map(|(_, refresh)| refresh.clone())
    }

    fn clear(&self) {
        *self.lock() = None;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_read_returns_saved_pair() {
        let store = MemoryCredentials::new();
        store.save("A1", "R1");
        assert_eq!(store.access_token().as_deref(), Some("A1"));
        assert_eq!(store.refresh_token().as_deref(), Some("R1"));
    }

    #[test]
    fn test_save_overwrites_whole_pair() {
        let store = MemoryCredentials::new();
        store.save("A1", "R1");
        store.save("A2", "R2");
        assert_eq!(store.access_token().as_deref(), Some("A2"));
        assert_eq!(store.refresh_token().as_deref(), Some("R2"));
    }

    #[test]
    fn test_clear_removes_both_tokens() {
        let store = MemoryCredentials::new();
        store.save("A1", "R1");
        store.clear();
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
    }

    #[test]
    fn test_empty_store_reports_absent() {
        let store = MemoryCredentials::new();
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
    }
}
