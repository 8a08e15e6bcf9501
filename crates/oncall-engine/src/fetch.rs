//! Concurrent retrieval of many schedules with partial-failure aggregation.
//!
//! Every identifier gets its own retrieval future and all of them are driven together; a
//! failing fetch never cancels its siblings. Outcomes are gathered once every fetch has
//! finished, so no collection is shared between in-flight fetches.

use std::fmt;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::schedule::{ScheduleData, TimeWindow};

/// Something that can retrieve a rendered schedule for a time window.
///
/// Timeouts and retries, if any, belong to the implementation; [`fetch_all`] calls each
/// identifier exactly once.
#[allow(async_fn_in_trait)]
pub trait ScheduleSource {
    type Error: fmt::Display;

    async fn fetch_schedule(
        &self,
        id: &str,
        window: &TimeWindow,
    ) -> std::result::Result<ScheduleData, Self::Error>;
}

/// A single failed retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetrievalFailure {
    pub schedule_id: String,
    pub message: String,
}

impl fmt::Display for RetrievalFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.schedule_id, self.message)
    }
}

/// Schedules that were retrieved, alongside the identifiers that were not.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub schedules: Vec<ScheduleData>,
    pub failures: Vec<RetrievalFailure>,
}

impl FetchOutcome {
    /// True when some, but not all, retrievals failed.
    ///
    /// [`fetch_all`] never returns an outcome where everything failed, but a hand-built one
    /// with no schedules is not partial either.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty() && !self.schedules.is_empty()
    }
}

/// Fetch every schedule in `ids` concurrently.
///
/// Duplicate identifiers are fetched independently. Results keep the order of `ids`.
///
/// When only some fetches fail, both the retrieved schedules and the failures are returned so
/// the caller can decide what to do with them.
///
/// # Errors
/// Returns `EngineError::FetchFailed` carrying every failure when all requested fetches fail.
/// An empty `ids` is not an error.
pub async fn fetch_all<S, I>(source: &S, ids: &[I], window: &TimeWindow) -> Result<FetchOutcome>
where
    S: ScheduleSource,
    I: AsRef<str>,
{
    let fetches = ids.iter().map(|id| {
        let id: &str = id.as_ref();
        async move {
            debug!(schedule_id = id, "fetching schedule");
            match source.fetch_schedule(id, window).await {
                Ok(schedule) => {
                    debug!(schedule_id = id, entries = schedule.entries.len(), "fetched schedule");
                    Ok(schedule)
                }
                Err(err) => {
                    warn!(schedule_id = id, error = %err, "schedule retrieval failed");
                    Err(RetrievalFailure {
                        schedule_id: id.to_string(),
                        message: err.to_string(),
                    })
                }
            }
        }
    });

    let mut outcome = FetchOutcome {
        schedules: Vec::with_capacity(ids.len()),
        failures: Vec::new(),
    };

    for result in join_all(fetches).await {
        match result {
            Ok(schedule) => outcome.schedules.push(schedule),
            Err(failure) => outcome.failures.push(failure),
        }
    }

    if !ids.is_empty() && outcome.failures.len() == ids.len() {
        return Err(EngineError::FetchFailed {
            failures: outcome.failures,
        });
    }

    Ok(outcome)
}

/// Fetch every schedule in `ids`, refusing partial results.
///
/// # Errors
/// Returns `EngineError::FetchFailed` if any single fetch fails.
pub async fn fetch_all_strict<S, I>(
    source: &S,
    ids: &[I],
    window: &TimeWindow,
) -> Result<Vec<ScheduleData>>
where
    S: ScheduleSource,
    I: AsRef<str>,
{
    let outcome = fetch_all(source, ids, window).await?;

    if !outcome.failures.is_empty() {
        return Err(EngineError::FetchFailed {
            failures: outcome.failures,
        });
    }

    Ok(outcome.schedules)
}
