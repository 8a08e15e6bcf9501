//! Rendering of a finished run to stdout.

use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};

use anyhow::Result;
use oncall_engine::{Conflict, RetrievalFailure, ScheduleEntry};
use serde::Serialize;

/// A schedule that was retrieved but could not be normalized.
#[derive(Debug, Serialize)]
pub struct SkippedSchedule {
    pub schedule_id: String,
    pub error: String,
}

/// The normalized entries of one schedule, shown with `--show-entries`.
#[derive(Debug, Serialize)]
pub struct ScheduleEntries {
    pub schedule_id: String,
    pub entries: Vec<ScheduleEntry>,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub schedules: usize,
    pub entries: usize,
    pub failures: Vec<RetrievalFailure>,
    pub skipped: Vec<SkippedSchedule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_entries: Option<Vec<ScheduleEntries>>,
    /// Only people with at least one conflict, ordered by person id, then by overlap.
    pub conflicts: BTreeMap<String, Vec<Conflict>>,
}

impl Report {
    pub fn new(
        schedules: usize,
        entries: usize,
        failures: Vec<RetrievalFailure>,
        skipped: Vec<SkippedSchedule>,
        conflicts: HashMap<String, Vec<Conflict>>,
    ) -> Self {
        let conflicts = conflicts
            .into_iter()
            .filter(|(_, conflicts)| !conflicts.is_empty())
            .map(|(person_id, mut conflicts)| {
                conflicts.sort_by_key(|c| (c.overlap_start(), c.overlap_end()));
                (person_id, conflicts)
            })
            .collect();

        Self {
            schedules,
            entries,
            failures,
            skipped,
            schedule_entries: None,
            conflicts,
        }
    }

    /// Include every schedule's normalized entries in the output.
    pub fn with_schedule_entries(mut self, schedule_entries: Vec<ScheduleEntries>) -> Self {
        self.schedule_entries = Some(schedule_entries);
        self
    }

    pub fn conflict_count(&self) -> usize {
        self.conflicts.values().map(Vec::len).sum()
    }

    pub fn write_text(&self, out: &mut impl Write) -> io::Result<()> {
        for schedule in self.schedule_entries.iter().flatten() {
            writeln!(
                out,
                "{}: {}",
                schedule.schedule_id,
                serde_json::to_string(&schedule.entries)?
            )?;
        }

        for conflicts in self.conflicts.values() {
            for conflict in conflicts {
                writeln!(out, "CONFLICT: {}", conflict)?;
            }
        }

        if self.conflicts.is_empty() {
            writeln!(
                out,
                "No conflicts found across {} schedules ({} entries).",
                self.schedules, self.entries
            )?;
        } else {
            writeln!(
                out,
                "{} conflicts for {} people across {} schedules ({} entries).",
                self.conflict_count(),
                self.conflicts.len(),
                self.schedules,
                self.entries
            )?;
        }

        Ok(())
    }

    pub fn write_json(&self, out: &mut impl Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)?;
        Ok(())
    }
}
