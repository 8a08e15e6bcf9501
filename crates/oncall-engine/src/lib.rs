//! # oncall-engine
//!
//! Finds people who are on call for two schedules at the same time.
//!
//! Schedules are fetched concurrently from a [`ScheduleSource`], normalized into
//! [`ScheduleEntry`] values with absolute UTC timestamps, grouped by person, and
//! swept for overlapping intervals one person at a time in parallel.
//!
//! ## Modules
//!
//! - [`schedule`] — Raw schedule payloads, normalized entries, and time windows
//! - [`normalize`] — Raw schedule → list of typed entries
//! - [`group`] — Stable partitioning of entries by a derived key
//! - [`fetch`] — Concurrent fan-out retrieval with partial-failure aggregation
//! - [`conflict`] — Per-person overlap detection and conflict sinks
//! - [`error`] — Error types

pub mod conflict;
pub mod error;
pub mod fetch;
pub mod group;
pub mod normalize;
pub mod schedule;

pub use conflict::{
    detect_person_conflicts, find_conflicts, find_conflicts_by_person, Conflict, ConflictSink,
    LogSink, NoopSink,
};
pub use error::{EngineError, TimeField};
pub use fetch::{fetch_all, fetch_all_strict, FetchOutcome, RetrievalFailure, ScheduleSource};
pub use group::{group_by, group_by_person};
pub use normalize::{normalize, normalize_all, normalize_entry};
pub use schedule::{PersonRef, RawEntry, ScheduleData, ScheduleEntry, TimeWindow};
