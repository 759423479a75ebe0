//! Merge & view projection.
//!
//! Assembles the list the presentation layer renders from two sources of
//! truth: the durable local overlay and the latest (volatile) remote page
//! snapshot. Overlay entries always precede remote entries and win every id
//! collision; the merged sequence is then search-filtered and sliced to the
//! active page.

use roster_model::{PageSnapshot, User, UserId};
use std::collections::HashSet;

/// The deduplicated, filtered, paginated list actually rendered, plus the
/// total the pagination controls should advertise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedView {
    pub items: Vec<User>,
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
}

impl ProjectedView {
    /// Number of pages the advertised total spans.
    pub fn page_count(&self) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        (self.total as u32).div_ceil(self.per_page)
    }
}

/// Project the visible slice.
///
/// 1. merged = overlay entries, then remote items whose id the overlay does
///    not claim; first occurrence wins, so the overlay shadows the snapshot
///    and duplicate overlay ids collapse to the most recent entry.
/// 2. `total` = remote `total` plus overlay entries the snapshot does not
///    contain (overlay length alone when no snapshot is loaded). The search
///    filter does not change `total`.
/// 3. the display slice is `(page-1)*per_page .. page*per_page` over the
///    post-filter sequence, clamped to its length.
pub fn project(
    overlay: &[User],
    snapshot: Option<&PageSnapshot>,
    page: u32,
    per_page: u32,
    query: &str,
) -> ProjectedView {
    let page = page.max(1);

    let mut seen: HashSet<&UserId> = HashSet::new();
    let mut merged: Vec<&User> = Vec::new();
    for user in overlay {
        if seen.insert(&user.id) {
            merged.push(user);
        }
    }
    let overlay_unique = merged.len();
    if let Some(snapshot) = snapshot {
        for user in &snapshot.items {
            if seen.insert(&user.id) {
                merged.push(user);
            }
        }
    }

    let total = match snapshot {
        Some(snapshot) => {
            let overlay_only = merged[..overlay_unique]
                .iter()
                .filter(|user| !snapshot.contains(&user.id))
                .count();
            snapshot.total as usize + overlay_only
        }
        None => overlay_unique,
    };

    if !query.trim().is_empty() {
        merged.retain(|user| user.matches_query(query));
    }

    let start = (page as usize - 1).saturating_mul(per_page as usize);
    let items: Vec<User> = merged
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .cloned()
        .collect();

    ProjectedView {
        items,
        total,
        page,
        per_page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: UserId, first: &str, last: &str, email: &str) -> User {
        User {
            id,
            email: email.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            avatar: String::new(),
        }
    }

    fn remote(id: u64) -> User {
        user(
            UserId::Num(id),
            &format!("Remote{id}"),
            "Person",
            &format!("remote{id}@x.com"),
        )
    }

    fn snapshot(items: Vec<User>, total: u32) -> PageSnapshot {
        PageSnapshot {
            items,
            page: 1,
            per_page: 6,
            total,
        }
    }

    #[test]
    fn no_id_appears_twice() {
        let overlay = vec![
            user(UserId::Num(2), "Edited", "Twice", "twice@x.com"),
            user(UserId::Num(2), "Edited", "Once", "once@x.com"),
        ];
        let snap = snapshot(vec![remote(1), remote(2)], 2);
        let view = project(&overlay, Some(&snap), 1, 10, "");

        let mut ids: Vec<&UserId> = view.items.iter().map(|u| &u.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), view.items.len());
    }

    #[test]
    fn overlay_wins_id_collisions() {
        let overlay = vec![user(UserId::Num(2), "Local", "Copy", "local@x.com")];
        let snap = snapshot(vec![remote(2)], 1);
        let view = project(&overlay, Some(&snap), 1, 10, "");

        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].email, "local@x.com");
    }

    #[test]
    fn overlay_precedes_remote_items() {
        let overlay = vec![user(UserId::from("local-1"), "Ann", "Lee", "ann@x.com")];
        let snap = snapshot(vec![remote(2)], 12);
        let view = project(&overlay, Some(&snap), 1, 6, "");

        assert_eq!(view.items[0].id, UserId::from("local-1"));
        assert_eq!(view.items[1].id, UserId::Num(2));
        assert_eq!(view.total, 13);
    }

    #[test]
    fn total_ignores_overlay_entries_already_in_the_snapshot() {
        let overlay = vec![user(UserId::Num(2), "Local", "Copy", "local@x.com")];
        let snap = snapshot(vec![remote(2), remote(3)], 12);
        let view = project(&overlay, Some(&snap), 1, 6, "");
        assert_eq!(view.total, 12);
    }

    #[test]
    fn missing_snapshot_degrades_to_overlay_only() {
        let overlay = vec![
            user(UserId::from("local-1"), "Ann", "Lee", "ann@x.com"),
            user(UserId::from("local-2"), "Bob", "Ray", "bob@x.com"),
        ];
        let view = project(&overlay, None, 1, 6, "");
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.total, 2);
    }

    #[test]
    fn pages_slice_the_merged_sequence_and_clamp() {
        let remotes: Vec<User> = (1..=5).map(remote).collect();
        let snap = snapshot(remotes, 5);

        let first = project(&[], Some(&snap), 1, 2, "");
        assert_eq!(
            first.items.iter().map(|u| &u.id).collect::<Vec<_>>(),
            vec![&UserId::Num(1), &UserId::Num(2)]
        );

        let last = project(&[], Some(&snap), 3, 2, "");
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].id, UserId::Num(5));

        let beyond = project(&[], Some(&snap), 9, 2, "");
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 5);
    }

    #[test]
    fn page_zero_is_clamped_to_one() {
        let snap = snapshot(vec![remote(1)], 1);
        let view = project(&[], Some(&snap), 0, 6, "");
        assert_eq!(view.page, 1);
        assert_eq!(view.items.len(), 1);
    }

    #[test]
    fn search_matches_name_or_email_case_insensitively() {
        let overlay = vec![user(UserId::from("local-1"), "Ann", "Lee", "ann@x.com")];
        let snap = snapshot(vec![remote(2), remote(3)], 12);

        let by_name = project(&overlay, Some(&snap), 1, 10, "ann le");
        assert_eq!(by_name.items.len(), 1);
        assert_eq!(by_name.items[0].id, UserId::from("local-1"));

        let by_email = project(&overlay, Some(&snap), 1, 10, "REMOTE2@");
        assert_eq!(by_email.items.len(), 1);
        assert_eq!(by_email.items[0].id, UserId::Num(2));

        let nothing = project(&overlay, Some(&snap), 1, 10, "zzz");
        assert!(nothing.items.is_empty());
        // Search narrows the slice, not the advertised total.
        assert_eq!(nothing.total, 13);
    }

    #[test]
    fn page_count_rounds_up() {
        let view = ProjectedView {
            items: Vec::new(),
            total: 13,
            page: 1,
            per_page: 6,
        };
        assert_eq!(view.page_count(), 3);
    }
}
