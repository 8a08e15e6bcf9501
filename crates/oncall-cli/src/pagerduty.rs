//! PagerDuty REST API source for rendered on-call schedules.
//!
//! Uses `GET /schedules/{id}` with `since`/`until` so PagerDuty renders the final schedule
//! (overrides applied) over the requested window.

use std::time::Duration;

use chrono::SecondsFormat;
use oncall_engine::{RawEntry, ScheduleData, ScheduleSource, TimeWindow};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.pagerduty.com";

const ACCEPT_V2: &str = "application/vnd.pagerduty+json;version=2";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("PagerDuty returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode schedule: {0}")]
    Decode(#[from] serde_json::Error),
}

// ─────────────────────────────────────────────────────────────────────────────
// Response shape
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ScheduleResponse {
    schedule: Schedule,
}

#[derive(Deserialize)]
struct Schedule {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    final_schedule: Option<FinalSchedule>,
}

#[derive(Deserialize)]
struct FinalSchedule {
    #[serde(default)]
    rendered_schedule_entries: Vec<RawEntry>,
}

impl From<Schedule> for ScheduleData {
    fn from(schedule: Schedule) -> Self {
        ScheduleData {
            id: schedule.id,
            name: schedule.name,
            entries: schedule
                .final_schedule
                .map(|f| f.rendered_schedule_entries)
                .unwrap_or_default(),
        }
    }
}

/// Decode a `GET /schedules/{id}` response body.
pub fn parse_schedule_response(body: &str) -> Result<ScheduleData, serde_json::Error> {
    let response: ScheduleResponse = serde_json::from_str(body)?;
    Ok(response.schedule.into())
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

pub struct PagerDutyClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl PagerDutyClient {
    /// Build a client. `timeout` bounds each individual schedule request.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("oncall-conflicts/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }
}

impl ScheduleSource for PagerDutyClient {
    type Error = ClientError;

    async fn fetch_schedule(
        &self,
        id: &str,
        window: &TimeWindow,
    ) -> Result<ScheduleData, ClientError> {
        let url = format!("{}/schedules/{}", self.base_url, id);

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Token token={}", self.token))
            .header(ACCEPT, ACCEPT_V2)
            .query(&[
                ("since", window.since().to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("until", window.until().to_rfc3339_opts(SecondsFormat::Secs, true)),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(parse_schedule_response(&body)?)
    }
}
