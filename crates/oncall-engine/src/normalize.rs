//! Normalization -- converts raw schedule payloads into typed [`ScheduleEntry`] values.
//!
//! Timestamps are parsed as RFC 3339 and converted to UTC. Normalization of a schedule is
//! all-or-nothing: one bad entry fails the whole schedule, so malformed data can never hide a
//! conflict by silently dropping out.

use chrono::{DateTime, Utc};

use crate::error::{EngineError, Result, TimeField};
use crate::schedule::{RawEntry, ScheduleData, ScheduleEntry};

/// Normalize every entry of one schedule.
///
/// Each entry is labelled with the schedule's display name, or an empty string when the
/// schedule has no name. A schedule with no entries normalizes to an empty list.
///
/// # Errors
/// Returns `EngineError::Parse` naming the field and raw value of the first timestamp that fails
/// to parse, or `EngineError::InvalidInterval` for the first entry that does not end after it
/// starts.
pub fn normalize(raw: &ScheduleData) -> Result<Vec<ScheduleEntry>> {
    let label = raw.name.as_deref().unwrap_or_default();

    raw.entries
        .iter()
        .map(|entry| normalize_entry(label, entry))
        .collect()
}

/// Normalize a single raw entry, attaching `schedule_label`.
pub fn normalize_entry(schedule_label: &str, entry: &RawEntry) -> Result<ScheduleEntry> {
    let start = parse_timestamp(TimeField::Start, &entry.start)?;
    let end = parse_timestamp(TimeField::End, &entry.end)?;

    if start >= end {
        return Err(EngineError::InvalidInterval {
            person: entry.user.id.clone(),
            start,
            end,
        });
    }

    Ok(ScheduleEntry {
        start,
        end,
        person: entry.user.clone(),
        schedule: schedule_label.to_string(),
    })
}

/// Normalize several schedules independently.
///
/// One result per input schedule, in input order, so the caller decides whether a failed
/// schedule is skipped or aborts the run.
pub fn normalize_all(schedules: &[ScheduleData]) -> Vec<(&str, Result<Vec<ScheduleEntry>>)> {
    schedules
        .iter()
        .map(|schedule| (schedule.id.as_str(), normalize(schedule)))
        .collect()
}

fn parse_timestamp(field: TimeField, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| EngineError::Parse {
            field,
            value: value.to_string(),
            source,
        })
}
