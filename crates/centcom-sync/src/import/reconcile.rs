//! Diff between stored and freshly fetched bans

use std::collections::HashMap;

use centcom_core::{Ban, DedupKey, StoredBan};

/// Writes needed to make storage match a complete fetch
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Fetched bans with no stored counterpart, in fetch order
    pub insert: Vec<Ban>,
    /// Stored rows whose content changed, carrying the fetched content
    pub update: Vec<StoredBan>,
    /// Stored row ids the source no longer reports
    pub remove: Vec<i64>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.insert.is_empty() && self.update.is_empty() && self.remove.is_empty()
    }
}

/// Compute the plan that turns `stored` into `fetched`
///
/// Bans with a `ban_id` are matched by `(source, ban_id)` and updated in place
/// when any field differs. Bans without one can only be matched by full
/// equality, so a changed unkeyed ban shows up as one removal plus one insert.
pub fn reconcile(stored: Vec<StoredBan>, fetched: Vec<Ban>) -> ReconcilePlan {
    let mut keyed: HashMap<DedupKey, StoredBan> = HashMap::new();
    let mut unkeyed: HashMap<Ban, Vec<i64>> = HashMap::new();
    let mut plan = ReconcilePlan::default();

    for row in stored {
        match row.ban.dedup_key() {
            Some(key) => {
                // Storage enforces one row per key; a second one is stale
                if let Some(previous) = keyed.insert(key, row) {
                    plan.remove.push(previous.id);
                }
            }
            None => unkeyed.entry(row.ban).or_default().push(row.id),
        }
    }

    for ban in fetched {
        match ban.dedup_key() {
            Some(key) => match keyed.remove(&key) {
                Some(row) if row.ban == ban => {}
                Some(row) => plan.update.push(StoredBan { id: row.id, ban }),
                None => plan.insert.push(ban),
            },
            None => match unkeyed.get_mut(&ban).and_then(Vec::pop) {
                Some(_) => {}
                None => plan.insert.push(ban),
            },
        }
    }

    plan.remove.extend(keyed.into_values().map(|row| row.id));
    plan.remove.extend(unkeyed.into_values().flatten());
    plan.remove.sort_unstable();
    plan
}
