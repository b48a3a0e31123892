//! Credential pair persistence
//!
//! The access and refresh tokens live in the shared key/value store under
//! fixed keys. Write failures are logged and swallowed: an unpersisted token
//! only costs the user a fresh login on the next run.

use crate::storage::SharedStore;

/// Store key of the short-lived bearer token
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Store key of the long-lived refresh token
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Access to the stored credential pair
#[derive(Clone)]
pub struct CredentialStore {
    store: SharedStore,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("has_access_token", &self.access_token().is_some())
            .field("has_refresh_token", &self.refresh_token().is_some())
            .finish()
    }
}

impl CredentialStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn access_token(&self) -> Option<String> {
        self.store
            .get_item(ACCESS_TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store
            .get_item(REFRESH_TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }

    /// Whether a login has left credentials behind
    pub fn has_session(&self) -> bool {
        self.access_token().is_some() || self.refresh_token().is_some()
    }

    /// Overwrite both tokens (successful login)
    pub fn store_tokens(&self, access: &str, refresh: &str) {
        self.write(ACCESS_TOKEN_KEY, access);
        self.write(REFRESH_TOKEN_KEY, refresh);
    }

    /// Overwrite the access token only (successful refresh)
    pub fn set_access_token(&self, access: &str) {
        self.write(ACCESS_TOKEN_KEY, access);
    }

    /// Delete both tokens (logout or failed refresh)
    pub fn clear(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(e) = self.store.remove_item(key) {
                log::warn!("Failed to remove {} from storage: {:#}", key, e);
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set_item(key, value) {
            log::warn!("Failed to persist {}: {:#}", key, e);
        }
    }
}
