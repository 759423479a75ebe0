//! The local overlay: user records created or edited on this client.
//!
//! The backing demo API discards writes after responding, so acknowledged
//! mutations are kept here, most-recently-touched-first, and written through
//! to the durable slot on every change. Memory and the persisted
//! representation move in lock-step: a mutation only commits once its save
//! has completed.

use crate::error::Result;
use crate::storage::OverlayStorage;
use roster_model::{User, UserId};

/// Ordered collection of locally authoritative user records.
pub struct OverlayStore {
    entries: Vec<User>,
    storage: Box<dyn OverlayStorage>,
}

impl std::fmt::Debug for OverlayStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayStore")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl OverlayStore {
    /// Open the store, reloading whatever the slot holds. A missing or
    /// malformed slot starts the overlay empty.
    pub fn open(storage: Box<dyn OverlayStorage>) -> Self {
        let entries = storage.load();
        if !entries.is_empty() {
            log::info!("[OverlayStore] loaded {} local record(s)", entries.len());
        }
        Self { entries, storage }
    }

    pub fn entries(&self) -> &[User] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &UserId) -> bool {
        self.entries.iter().any(|user| user.id == *id)
    }

    /// Insert at the front. Pure append: duplicate ids are permitted here,
    /// deduplication is the projector's job.
    pub fn add_local(&mut self, user: User) -> Result<()> {
        let mut next = Vec::with_capacity(self.entries.len() + 1);
        next.push(user);
        next.extend(self.entries.iter().cloned());
        self.commit(next)
    }

    /// Replace the first entry with a matching id, preserving its position.
    /// Returns `false` (and persists nothing) when no entry matches.
    pub fn update_local(&mut self, user: User) -> Result<bool> {
        let Some(position) = self.entries.iter().position(|entry| entry.id == user.id) else {
            return Ok(false);
        };
        let mut next = self.entries.clone();
        next[position] = user;
        self.commit(next)?;
        Ok(true)
    }

    /// Delete every entry matching `id`. Returns whether anything changed.
    pub fn remove_local(&mut self, id: &UserId) -> Result<bool> {
        let next: Vec<User> = self
            .entries
            .iter()
            .filter(|entry| entry.id != *id)
            .cloned()
            .collect();
        if next.len() == self.entries.len() {
            return Ok(false);
        }
        self.commit(next)?;
        Ok(true)
    }

    // Persist first, then swap in the new state; a failed save leaves the
    // overlay exactly as it was.
    fn commit(&mut self, next: Vec<User>) -> Result<()> {
        self.storage.save(&next)?;
        self.entries = next;
        Ok(())
    }
}
