//! Durable storage for the local overlay.
//!
//! The overlay slot is a stand-in for a real backing store, so it hides
//! behind a narrow load/save interface and the engine can run against an
//! in-memory fake in tests.

use crate::error::Result;
use roster_model::User;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Narrow persistence seam for the overlay: one named slot holding a JSON
/// array of users.
pub trait OverlayStorage: Send + Sync {
    /// Read the persisted overlay. Absence or malformed content yields an
    /// empty overlay; loading is never fatal.
    fn load(&self) -> Vec<User>;

    /// Replace the persisted overlay wholesale.
    fn save(&self, users: &[User]) -> Result<()>;
}

/// File-backed overlay slot, serialized as a pretty-printed JSON array.
#[derive(Debug)]
pub struct JsonOverlayStorage {
    path: PathBuf,
}

impl JsonOverlayStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl OverlayStorage for JsonOverlayStorage {
    fn load(&self) -> Vec<User> {
        if !self.path.exists() {
            log::debug!("[OverlayStorage] no overlay file at {:?}", self.path);
            return Vec::new();
        }
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) => {
                log::warn!(
                    "[OverlayStorage] could not read overlay at {:?}, starting empty: {}",
                    self.path,
                    err
                );
                return Vec::new();
            }
        };
        match serde_json::from_str(&data) {
            Ok(users) => users,
            Err(err) => {
                log::warn!(
                    "[OverlayStorage] malformed overlay at {:?}, starting empty: {}",
                    self.path,
                    err
                );
                Vec::new()
            }
        }
    }

    fn save(&self, users: &[User]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(users)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }
}

// Shared handles stay usable as storage, so a caller can keep one end for
// inspection while the store owns the other.
impl<S: OverlayStorage + ?Sized> OverlayStorage for std::sync::Arc<S> {
    fn load(&self) -> Vec<User> {
        (**self).load()
    }

    fn save(&self, users: &[User]) -> Result<()> {
        (**self).save(users)
    }
}

/// In-memory overlay slot for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryOverlayStorage {
    slot: Mutex<Vec<User>>,
}

impl MemoryOverlayStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect what the last save wrote.
    pub fn stored(&self) -> Vec<User> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl OverlayStorage for MemoryOverlayStorage {
    fn load(&self) -> Vec<User> {
        self.stored()
    }

    fn save(&self, users: &[User]) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = users.to_vec();
        Ok(())
    }
}
