//! Schedule payloads as retrieved, and the normalized entries derived from them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A reference to the person assigned to a shift.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonRef {
    pub id: String,
    #[serde(default)]
    pub summary: String,
}

impl PersonRef {
    pub fn new(id: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
        }
    }
}

/// One rendered shift exactly as the scheduling service returned it.
///
/// Timestamps are still RFC 3339 strings; see [`crate::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub start: String,
    pub end: String,
    pub user: PersonRef,
}

/// A schedule as retrieved for one identifier and time window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleData {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub entries: Vec<RawEntry>,
}

/// One contiguous assignment of a person to a schedule.
///
/// Always satisfies `start < end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub person: PersonRef,
    /// Display name of the schedule this entry was rendered from.
    pub schedule: String,
}

/// The `[since, until)` range schedules are rendered over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    since: DateTime<Utc>,
    until: DateTime<Utc>,
}

impl TimeWindow {
    /// # Errors
    /// Returns `EngineError::InvalidWindow` unless `since < until`.
    pub fn new(since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Self> {
        if since >= until {
            return Err(EngineError::InvalidWindow { since, until });
        }
        Ok(Self { since, until })
    }

    /// Build a window from signed offsets around `now`, e.g. `-1h` to `+14d`.
    ///
    /// # Errors
    /// Returns `EngineError::WindowOutOfRange` if either offset lands outside the range of
    /// representable dates, and `EngineError::InvalidWindow` unless `since < until`.
    pub fn relative_to(now: DateTime<Utc>, since: Duration, until: Duration) -> Result<Self> {
        let offset = |delta: Duration| {
            now.checked_add_signed(delta)
                .ok_or(EngineError::WindowOutOfRange { offset: delta })
        };
        Self::new(offset(since)?, offset(until)?)
    }

    pub fn since(&self) -> DateTime<Utc> {
        self.since
    }

    pub fn until(&self) -> DateTime<Utc> {
        self.until
    }
}
