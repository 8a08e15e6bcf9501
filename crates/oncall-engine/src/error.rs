//! Error types for oncall-engine operations.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::fetch::RetrievalFailure;

/// Which timestamp of a raw entry failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Start,
    End,
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeField::Start => f.write_str("start"),
            TimeField::End => f.write_str("end"),
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("could not parse {field} time {value:?}: {source}")]
    Parse {
        field: TimeField,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("entry for {person} ends at {end} but starts at {start}")]
    InvalidInterval {
        person: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("window end ({until}) must be after window start ({since})")]
    InvalidWindow {
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    },

    #[error("window offset {offset} is outside the range of representable dates")]
    WindowOutOfRange { offset: Duration },

    #[error("{}", join_failures(.failures))]
    FetchFailed { failures: Vec<RetrievalFailure> },
}

fn join_failures(failures: &[RetrievalFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, EngineError>;
