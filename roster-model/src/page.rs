use crate::ids::UserId;
use crate::user::User;
use serde::{Deserialize, Serialize};

/// One fetched batch of remote records plus its pagination metadata.
///
/// Ephemeral: replaced wholesale on every successful fetch and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub items: Vec<User>,
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
}

impl PageSnapshot {
    pub fn contains(&self, id: &UserId) -> bool {
        self.items.iter().any(|user| user.id == *id)
    }

    /// Drop every item matching `id` from the snapshot and shrink `total`
    /// accordingly. Used after a confirmed delete so the remote copy stays
    /// out of view until a later fetch reintroduces it. Returns whether
    /// anything was removed.
    pub fn mask_out(&mut self, id: &UserId) -> bool {
        let before = self.items.len();
        self.items.retain(|user| user.id != *id);
        let removed = before - self.items.len();
        if removed == 0 {
            return false;
        }
        self.total = self.total.saturating_sub(removed as u32);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64) -> User {
        User {
            id: UserId::Num(id),
            email: format!("u{id}@x.com"),
            first_name: format!("U{id}"),
            last_name: "Test".to_string(),
            avatar: String::new(),
        }
    }

    #[test]
    fn mask_out_removes_and_shrinks_total() {
        let mut snapshot = PageSnapshot {
            items: vec![user(1), user(2)],
            page: 1,
            per_page: 6,
            total: 12,
        };
        assert!(snapshot.mask_out(&UserId::Num(2)));
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.total, 11);
        assert!(!snapshot.contains(&UserId::Num(2)));
    }

    #[test]
    fn mask_out_of_absent_id_is_a_noop() {
        let mut snapshot = PageSnapshot {
            items: vec![user(1)],
            page: 1,
            per_page: 6,
            total: 12,
        };
        assert!(!snapshot.mask_out(&UserId::Num(9)));
        assert_eq!(snapshot.total, 12);
    }
}
