//! Boundary to the remote directory service.

use crate::error::Result;
use async_trait::async_trait;
use roster_model::{NewUser, PageSnapshot, User, UserId};

/// Remote CRUD operations the engine depends on.
///
/// Implementations must return full replacement pages (never increments) and
/// surface failures as errors with a human-readable message; `fetch_page` is
/// expected to be idempotent. The engine never mutates the overlay for a
/// create/update/delete until the matching call here has acknowledged.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserGateway: Send + Sync {
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<PageSnapshot>;

    async fn create_user(&self, draft: &NewUser) -> Result<User>;

    async fn update_user(&self, id: &UserId, draft: &NewUser) -> Result<User>;

    async fn delete_user(&self, id: &UserId) -> Result<()>;
}
