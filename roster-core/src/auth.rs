//! Session credential handling.
//!
//! The bearer credential lives in one named slot: written on login, read at
//! startup to restore the session, removed on logout. The slot is opaque to
//! the rest of the engine.

use crate::api::ApiClient;
use crate::error::Result;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

/// Narrow get/set/clear seam over wherever the credential actually lives.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, secret: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// File-backed credential slot.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<String> {
        if !self.path.exists() {
            return None;
        }
        match std::fs::read_to_string(&self.path) {
            Ok(secret) => {
                let secret = secret.trim();
                if secret.is_empty() {
                    None
                } else {
                    Some(secret.to_string())
                }
            }
            Err(err) => {
                log::warn!(
                    "[CredentialStore] could not read credential at {:?}: {}",
                    self.path,
                    err
                );
                None
            }
        }
    }

    fn set(&self, secret: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, secret)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&self.path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&self.path, perms)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            log::info!("[CredentialStore] cleared credential slot");
        }
        Ok(())
    }
}

/// In-memory credential slot for tests.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, secret: &str) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(secret.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Ties the API client's bearer token to the durable credential slot.
pub struct AuthSession {
    api: Arc<ApiClient>,
    store: Box<dyn CredentialStore>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("authenticated", &self.store.get().is_some())
            .finish()
    }
}

impl AuthSession {
    pub fn new(api: Arc<ApiClient>, store: Box<dyn CredentialStore>) -> Self {
        Self { api, store }
    }

    /// Re-attach a previously stored credential, if any. Returns whether a
    /// session was restored.
    pub async fn restore(&self) -> bool {
        match self.store.get() {
            Some(token) => {
                self.api.set_token(Some(token)).await;
                log::info!("[AuthSession] restored stored session");
                true
            }
            None => false,
        }
    }

    /// Authenticate and persist the credential. A rejected login leaves the
    /// slot untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let token = self.api.login(email, password).await?;
        self.store.set(&token)?;
        log::info!("[AuthSession] logged in as {email}");
        Ok(())
    }

    /// Drop the session: clears both the client token and the slot.
    pub async fn logout(&self) -> Result<()> {
        self.api.set_token(None).await;
        self.store.clear()
    }

    /// Whether a credential is stored (not a liveness check).
    pub fn has_credentials(&self) -> bool {
        self.store.get().is_some()
    }
}
