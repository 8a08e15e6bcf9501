//! Stable partitioning of items by a derived key.

use std::collections::HashMap;
use std::hash::Hash;

use crate::schedule::ScheduleEntry;

/// Partition `items` into groups keyed by `key_fn`.
///
/// Every item lands in exactly one group and items keep their relative input order within a
/// group. An empty input yields an empty map.
pub fn group_by<T, K, F>(items: impl IntoIterator<Item = T>, mut key_fn: F) -> HashMap<K, Vec<T>>
where
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut groups: HashMap<K, Vec<T>> = HashMap::new();

    for item in items {
        groups.entry(key_fn(&item)).or_default().push(item);
    }

    groups
}

/// Group entries by the id of the person on shift.
pub fn group_by_person(
    entries: impl IntoIterator<Item = ScheduleEntry>,
) -> HashMap<String, Vec<ScheduleEntry>> {
    group_by(entries, |entry| entry.person.id.clone())
}
