//! Deduplication of crawl results

use std::collections::HashSet;

use centcom_core::Ban;

/// Drop repeated bans, keeping the first occurrence of each
///
/// Bans with a stable id are compared by `(source, ban_id)`; bans without one
/// fall back to structural equality.
pub fn dedup_bans(bans: Vec<Ban>) -> Vec<Ban> {
    let mut seen_keys = HashSet::new();
    let mut seen_values = HashSet::new();

    bans.into_iter()
        .filter(|ban| match ban.dedup_key() {
            Some(key) => seen_keys.insert(key),
            None => seen_values.insert(ban.clone()),
        })
        .collect()
}
