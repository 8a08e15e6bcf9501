//! `oncall-conflicts` CLI — report people who are on call for two schedules at once.
//!
//! ## Usage
//!
//! ```sh
//! # Check the next two weeks of three schedules
//! oncall-conflicts --auth-token $TOKEN -s PABC123 -s PDEF456,PGHI789
//!
//! # Look back one hour and forward one week, as JSON
//! PAGERDUTY_TOKEN=... oncall-conflicts -s PABC123,PDEF456 --since=-1h --until 1w --format json
//!
//! # Also print each schedule's normalized entries
//! oncall-conflicts --auth-token $TOKEN -s PABC123 --show-entries
//!
//! # Run against recorded responses (<dir>/<schedule id>.json)
//! oncall-conflicts --fixtures ./recorded -s PABC123,PDEF456
//! ```
//!
//! Exits non-zero only when every schedule fails to load (or, with `--strict`, when any
//! schedule fails to load or parse).

mod fixtures;
mod offset;
mod pagerduty;
mod report;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{ArgGroup, Parser, ValueEnum};
use oncall_engine::{
    fetch_all, fetch_all_strict, find_conflicts_by_person, normalize_all, ConflictSink, LogSink,
    NoopSink, RetrievalFailure, ScheduleData, ScheduleSource, TimeWindow,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::fixtures::FixtureSource;
use crate::offset::Offset;
use crate::pagerduty::{PagerDutyClient, DEFAULT_BASE_URL};
use crate::report::{Report, ScheduleEntries, SkippedSchedule};

#[derive(Parser)]
#[command(
    name = "oncall-conflicts",
    version,
    about = "Find people scheduled on two PagerDuty on-call schedules at the same time"
)]
#[command(group(ArgGroup::new("source").required(true).args(["auth_token", "fixtures"])))]
struct Cli {
    /// Schedule IDs to cross-reference (repeatable or comma-separated)
    #[arg(short, long = "schedule", required = true, value_delimiter = ',')]
    schedules: Vec<String>,

    /// PagerDuty API token
    #[arg(long, env = "PAGERDUTY_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    /// PagerDuty API base URL
    #[arg(long, env = "PAGERDUTY_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Read recorded schedule responses from this directory instead of PagerDuty
    #[arg(long)]
    fixtures: Option<PathBuf>,

    /// Offset from now where the window starts; e.g. to go into the past specify '-1h'
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    since: Offset,

    /// Offset from now where the window ends. Must be larger than --since
    #[arg(long, default_value = "14d", allow_hyphen_values = true)]
    until: Offset,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Fail on any retrieval or parse error instead of skipping the schedule
    #[arg(long)]
    strict: bool,

    /// Also print every schedule's normalized entries
    #[arg(long)]
    show_entries: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable debug logging and log each conflict as it is found
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if cli.until.duration() <= cli.since.duration() {
        anyhow::bail!(
            "--until ({}) must be larger than --since ({})",
            cli.until,
            cli.since
        );
    }

    let window = TimeWindow::relative_to(Utc::now(), cli.since.duration(), cli.until.duration())?;

    let report = match (&cli.fixtures, &cli.auth_token) {
        (Some(dir), _) => run(&FixtureSource::new(dir), &cli, &window).await?,
        (None, Some(token)) => {
            let client = PagerDutyClient::new(
                &cli.base_url,
                token,
                Duration::from_secs(cli.timeout_secs),
            )
            .context("Failed to build PagerDuty client")?;
            run(&client, &cli, &window).await?
        }
        (None, None) => unreachable!("clap requires --auth-token or --fixtures"),
    };

    let mut stdout = io::stdout().lock();
    match cli.format {
        OutputFormat::Text => report
            .write_text(&mut stdout)
            .context("Failed to write report")?,
        OutputFormat::Json => report
            .write_json(&mut stdout)
            .context("Failed to write report")?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

/// Fetch, normalize, group and sweep every requested schedule.
async fn run<S: ScheduleSource>(source: &S, cli: &Cli, window: &TimeWindow) -> Result<Report> {
    let (schedules, failures) = retrieve(source, cli, window).await?;

    let mut entries = Vec::new();
    let mut skipped = Vec::new();
    let mut shown = Vec::new();

    for (schedule_id, result) in normalize_all(&schedules) {
        match result {
            Ok(normalized) => {
                if cli.show_entries {
                    shown.push(ScheduleEntries {
                        schedule_id: schedule_id.to_string(),
                        entries: normalized.clone(),
                    });
                }
                entries.extend(normalized);
            }
            Err(err) if cli.strict => {
                return Err(err).with_context(|| format!("Failed to parse schedule {schedule_id}"));
            }
            Err(err) => {
                error!(schedule_id, error = %err, "skipping schedule");
                skipped.push(SkippedSchedule {
                    schedule_id: schedule_id.to_string(),
                    error: err.to_string(),
                });
            }
        }
    }

    info!(
        schedules = schedules.len(),
        entries = entries.len(),
        "checking for conflicts"
    );

    let entry_count = entries.len();
    let sink: &dyn ConflictSink = if cli.verbose { &LogSink } else { &NoopSink };
    let conflicts = find_conflicts_by_person(entries, sink);

    let report = Report::new(schedules.len(), entry_count, failures, skipped, conflicts);

    Ok(if cli.show_entries {
        report.with_schedule_entries(shown)
    } else {
        report
    })
}

async fn retrieve<S: ScheduleSource>(
    source: &S,
    cli: &Cli,
    window: &TimeWindow,
) -> Result<(Vec<ScheduleData>, Vec<RetrievalFailure>)> {
    if cli.strict {
        let schedules = fetch_all_strict(source, &cli.schedules, window)
            .await
            .context("Failed to retrieve schedules")?;
        return Ok((schedules, Vec::new()));
    }

    let outcome = fetch_all(source, &cli.schedules, window)
        .await
        .context("Failed to retrieve any schedule")?;

    Ok((outcome.schedules, outcome.failures))
}
