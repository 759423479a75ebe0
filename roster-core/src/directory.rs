//! The user directory state container.
//!
//! One explicit container, owned by the composition root and handed its
//! collaborators, holds everything the list screen derives from: the durable
//! overlay, the latest remote page snapshot, the pagination cursor, and the
//! search query. Actions mutate remote-first: the overlay only changes after
//! the service has acknowledged the matching write.

use crate::error::Result;
use crate::gateway::UserGateway;
use crate::overlay::OverlayStore;
use crate::projector::{ProjectedView, project};
use chrono::{DateTime, Utc};
use roster_model::{NewUser, PageSnapshot, UserId};
use std::sync::Arc;

/// Client-side state for the paginated, searchable user list.
pub struct UserDirectory {
    gateway: Arc<dyn UserGateway>,
    overlay: OverlayStore,
    snapshot: Option<PageSnapshot>,
    fetched_at: Option<DateTime<Utc>>,
    page: u32,
    per_page: u32,
    query: String,
    last_error: Option<String>,
    fetch_seq: u64,
}

impl std::fmt::Debug for UserDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDirectory")
            .field("page", &self.page)
            .field("per_page", &self.per_page)
            .field("query", &self.query)
            .field("snapshot", &self.snapshot.is_some())
            .field("overlay_len", &self.overlay.len())
            .finish()
    }
}

impl UserDirectory {
    pub fn new(gateway: Arc<dyn UserGateway>, overlay: OverlayStore, per_page: u32) -> Self {
        Self {
            gateway,
            overlay,
            snapshot: None,
            fetched_at: None,
            page: 1,
            per_page: per_page.max(1),
            query: String::new(),
            last_error: None,
            fetch_seq: 0,
        }
    }

    /// Recompute the merged, filtered, paginated view from current state.
    pub fn view(&self) -> ProjectedView {
        project(
            self.overlay.entries(),
            self.snapshot.as_ref(),
            self.page,
            self.per_page,
            &self.query,
        )
    }

    /// Move the pagination cursor without touching the snapshot.
    pub fn set_page(&mut self, page: u32) -> ProjectedView {
        self.page = page.max(1);
        self.view()
    }

    /// Replace the free-text search query.
    pub fn set_query(&mut self, query: impl Into<String>) -> ProjectedView {
        self.query = query.into();
        self.view()
    }

    /// Stamp a new fetch transaction and move the cursor to `page`. The
    /// returned ticket must be handed back to [`Self::complete_fetch`].
    ///
    /// Tickets are monotonic: beginning a newer fetch invalidates every
    /// outstanding older ticket, so a presentation layer that lets requests
    /// race can never have a stale response overwrite newer display state.
    pub fn begin_fetch(&mut self, page: u32) -> u64 {
        self.page = page.max(1);
        self.fetch_seq += 1;
        log::debug!(
            "[UserDirectory] fetch page {} (ticket {})",
            self.page,
            self.fetch_seq
        );
        self.fetch_seq
    }

    /// Apply the outcome of the fetch transaction `ticket` opened.
    ///
    /// A stale ticket (one superseded by a newer `begin_fetch`) is discarded
    /// wholesale, success or failure, and the current view is returned
    /// unchanged. A current failure clears the snapshot (the overlay-only
    /// view remains) and records the message before handing the error back.
    pub fn complete_fetch(
        &mut self,
        ticket: u64,
        outcome: Result<PageSnapshot>,
    ) -> Result<ProjectedView> {
        if ticket != self.fetch_seq {
            log::debug!(
                "[UserDirectory] discarding stale fetch completion (ticket {ticket}, newest {})",
                self.fetch_seq
            );
            return Ok(self.view());
        }

        match outcome {
            Ok(snapshot) => {
                log::debug!(
                    "[UserDirectory] applied page {} ({} item(s), total {})",
                    snapshot.page,
                    snapshot.items.len(),
                    snapshot.total
                );
                self.snapshot = Some(snapshot);
                self.fetched_at = Some(Utc::now());
                self.last_error = None;
                Ok(self.view())
            }
            Err(err) => {
                log::warn!("[UserDirectory] fetch failed: {err}");
                self.snapshot = None;
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Fetch `page` from the service and apply it. On failure the snapshot
    /// is cleared and the overlay-only view remains available via
    /// [`Self::view`].
    pub async fn fetch_page(&mut self, page: u32) -> Result<ProjectedView> {
        let ticket = self.begin_fetch(page);
        let outcome = self
            .gateway
            .fetch_page(self.page, self.per_page)
            .await;
        self.complete_fetch(ticket, outcome)
    }

    /// Create a user: remote first, then the overlay (front insert).
    pub async fn add_user(&mut self, draft: NewUser) -> Result<ProjectedView> {
        let created = self.gateway.create_user(&draft).await?;
        log::info!("[UserDirectory] created {} locally", created.id);
        self.overlay.add_local(created)?;
        Ok(self.view())
    }

    /// Update a user: remote first; the overlay entry is replaced in place,
    /// or created when the edited record originated remotely.
    pub async fn update_user(&mut self, id: UserId, draft: NewUser) -> Result<ProjectedView> {
        let updated = self.gateway.update_user(&id, &draft).await?;
        if self.overlay.update_local(updated.clone())? {
            log::info!("[UserDirectory] updated {id} in place");
        } else {
            log::info!("[UserDirectory] {id} edited for the first time, joining overlay");
            self.overlay.add_local(updated)?;
        }
        Ok(self.view())
    }

    /// Delete a user: remote first, then the overlay; the id is also masked
    /// out of the current snapshot so the remote copy stays gone until a
    /// later fetch reintroduces it.
    pub async fn remove_user(&mut self, id: &UserId) -> Result<ProjectedView> {
        self.gateway.delete_user(id).await?;
        self.overlay.remove_local(id)?;
        if let Some(snapshot) = self.snapshot.as_mut() {
            if snapshot.mask_out(id) {
                log::debug!("[UserDirectory] masked {id} out of the current snapshot");
            }
        }
        Ok(self.view())
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn snapshot(&self) -> Option<&PageSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn overlay(&self) -> &OverlayStore {
        &self.overlay
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
