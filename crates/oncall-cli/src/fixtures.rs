//! Offline schedule source backed by recorded PagerDuty responses on disk.

use std::io;
use std::path::PathBuf;

use oncall_engine::{ScheduleData, ScheduleSource, TimeWindow};
use thiserror::Error;

use crate::pagerduty::parse_schedule_response;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("could not decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads `<dir>/<schedule id>.json`, each holding a `GET /schedules/{id}` response body.
///
/// Recorded schedules are returned as-is; the window is not applied.
pub struct FixtureSource {
    dir: PathBuf,
}

impl FixtureSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ScheduleSource for FixtureSource {
    type Error = FixtureError;

    async fn fetch_schedule(
        &self,
        id: &str,
        _window: &TimeWindow,
    ) -> Result<ScheduleData, FixtureError> {
        let path = self.dir.join(format!("{id}.json"));

        let body = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FixtureError::Io {
                path: path.display().to_string(),
                source,
            })?;

        parse_schedule_response(&body).map_err(|source| FixtureError::Decode {
            path: path.display().to_string(),
            source,
        })
    }
}
