//! Detect people who are on shift in two places at once.
//!
//! Each person's entries are sorted by start time and swept once; the scan for a given entry
//! stops at the first later entry that starts at or after it ends. Adjacent shifts (where one
//! ends exactly when another starts) are NOT conflicts.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::warn;

use crate::group::group_by_person;
use crate::schedule::ScheduleEntry;

/// Two entries for the same person where `right` starts before `left` ends.
///
/// `left.start <= right.start` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub left: ScheduleEntry,
    pub right: ScheduleEntry,
}

impl Conflict {
    pub fn person_id(&self) -> &str {
        &self.left.person.id
    }

    pub fn overlap_start(&self) -> DateTime<Utc> {
        self.right.start
    }

    pub fn overlap_end(&self) -> DateTime<Utc> {
        self.left.end.min(self.right.end)
    }

    pub fn overlap_minutes(&self) -> i64 {
        (self.overlap_end() - self.overlap_start()).num_minutes()
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is in both {:?} and {:?} from {} to {}",
            self.left.person.summary,
            self.left.schedule,
            self.right.schedule,
            self.overlap_start().to_rfc3339(),
            self.overlap_end().to_rfc3339(),
        )
    }
}

/// Receives every conflict as it is discovered.
///
/// Called from the detector's worker threads, once per conflict.
pub trait ConflictSink: Sync {
    fn conflict_found(&self, person_id: &str, conflict: &Conflict);
}

impl<F> ConflictSink for F
where
    F: Fn(&str, &Conflict) + Sync,
{
    fn conflict_found(&self, person_id: &str, conflict: &Conflict) {
        self(person_id, conflict)
    }
}

/// Logs each conflict at `warn` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ConflictSink for LogSink {
    fn conflict_found(&self, person_id: &str, conflict: &Conflict) {
        warn!(
            person_id,
            overlap_minutes = conflict.overlap_minutes(),
            "CONFLICT: {conflict}"
        );
    }
}

/// Discards every conflict.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ConflictSink for NoopSink {
    fn conflict_found(&self, _person_id: &str, _conflict: &Conflict) {}
}

/// Find every overlapping pair among one person's entries.
///
/// Entries are stably sorted by start time, so entries sharing a start keep their input
/// order and the result is deterministic for a given input. Every pair is reported: three
/// mutually overlapping entries yield three conflicts.
pub fn detect_person_conflicts(mut entries: Vec<ScheduleEntry>) -> Vec<Conflict> {
    // Must stay a stable sort.
    entries.sort_by_key(|entry| entry.start);

    let mut conflicts = Vec::new();

    for (i, left) in entries.iter().enumerate() {
        for right in &entries[i + 1..] {
            // Sorted by start: nothing after `right` can overlap `left` either.
            if right.start >= left.end {
                break;
            }

            conflicts.push(Conflict {
                left: left.clone(),
                right: right.clone(),
            });
        }
    }

    conflicts
}

/// Find conflicts for every person, one parallel task per person.
///
/// Every person in the input appears in the result, with an empty list if they have no
/// conflicts. `sink` sees each conflict once; the order across people is unspecified.
pub fn find_conflicts<S>(
    entries_by_person: HashMap<String, Vec<ScheduleEntry>>,
    sink: &S,
) -> HashMap<String, Vec<Conflict>>
where
    S: ConflictSink + ?Sized,
{
    entries_by_person
        .into_par_iter()
        .map(|(person_id, entries)| {
            let conflicts = detect_person_conflicts(entries);
            for conflict in &conflicts {
                sink.conflict_found(&person_id, conflict);
            }
            (person_id, conflicts)
        })
        .collect()
}

/// Group a flat list of entries by person, then find conflicts.
pub fn find_conflicts_by_person<S>(
    entries: impl IntoIterator<Item = ScheduleEntry>,
    sink: &S,
) -> HashMap<String, Vec<Conflict>>
where
    S: ConflictSink + ?Sized,
{
    find_conflicts(group_by_person(entries), sink)
}
