use std::io::{self, Write};

use anyhow::{Context, Result};
use broadcast_calendar::{air_status, BroadcastCalendar, QuarterKey, WeekRecord};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

mod config;

use config::Config;

#[derive(Parser)]
#[command(
    name = "bcal",
    version,
    about = "Resolve instants to broadcast weeks (fiscal quarters anchored to a weekly cutover)"
)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the {year, quarter, week} record of an instant (default: now)
    Week {
        /// RFC 3339, YYYY-MM-DDTHH:MM[:SS] or YYYY-MM-DD (local to --tz)
        instant: Option<String>,
    },
    /// Print the anchor (start instant) of a fiscal quarter
    Anchor {
        /// Fiscal quarter, e.g. 2025Q1
        quarter: QuarterKey,
    },
    /// Print a fiscal quarter's span and all of its broadcast weeks
    Weeks {
        /// Fiscal quarter, e.g. 2025Q1
        quarter: QuarterKey,
    },
    /// Tell whether a scheduled instant is in a past, the current or a future week
    Status {
        /// When the item is scheduled
        scheduled: String,
        /// Reference instant (default: now)
        #[arg(long)]
        now: Option<String>,
    },
    /// Move a number of broadcast weeks forward or back
    Shift {
        /// Week record, e.g. 2025Q1W3
        record: WeekRecord,
        /// Weeks to move; negative moves back
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let calendar = cli.config.calendar()?;

    let output = match cli.command {
        Command::Week { instant } => week(&calendar, instant.as_deref())?,
        Command::Anchor { quarter } => anchor(&calendar, quarter)?,
        Command::Weeks { quarter } => weeks(&calendar, quarter)?,
        Command::Status { scheduled, now } => status(&calendar, &scheduled, now.as_deref())?,
        Command::Shift { record, delta } => shift(&calendar, record, delta)?,
    };

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output).context("failed to write output")?;
    writeln!(stdout)?;
    Ok(())
}

/// Parse an instant argument, or read the clock when it is absent.
fn instant_or_now(calendar: &BroadcastCalendar, instant: Option<&str>) -> Result<DateTime<Tz>> {
    match instant {
        Some(s) => calendar
            .parse_instant(s)
            .with_context(|| format!("failed to parse instant '{s}'")),
        None => {
            let now = Utc::now();
            debug!(%now, "no instant given, using the system clock");
            Ok(now.with_timezone(&calendar.timezone()))
        }
    }
}

fn week(calendar: &BroadcastCalendar, instant: Option<&str>) -> Result<Value> {
    let t = instant_or_now(calendar, instant)?;
    let record = calendar.week_record(&t)?;
    let span = calendar.week_span(record)?;
    Ok(json!({
        "instant": t.to_rfc3339(),
        "yearValue": record.year,
        "quarterValue": record.quarter,
        "weekValue": record.week,
        "label": record.to_string(),
        "weekStart": span.start.to_rfc3339(),
        "weekEnd": span.end.to_rfc3339(),
    }))
}

fn anchor(calendar: &BroadcastCalendar, quarter: QuarterKey) -> Result<Value> {
    let anchor = calendar.anchor_for_quarter(quarter)?;
    Ok(json!({
        "quarter": quarter.to_string(),
        "anchor": anchor.to_rfc3339(),
        "local": anchor.naive_local().to_string(),
        "weekday": anchor.format("%A").to_string(),
    }))
}

fn weeks(calendar: &BroadcastCalendar, quarter: QuarterKey) -> Result<Value> {
    let span = calendar.quarter_span(quarter)?;
    let table: Vec<Value> = calendar
        .week_table(quarter)?
        .into_iter()
        .map(|week| {
            json!({
                "label": week.record.to_string(),
                "weekValue": week.record.week,
                "start": week.start.to_rfc3339(),
                "end": week.end.to_rfc3339(),
            })
        })
        .collect();
    Ok(json!({
        "quarter": quarter.to_string(),
        "start": span.start.to_rfc3339(),
        "end": span.end.to_rfc3339(),
        "weeks": span.weeks,
        "table": table,
    }))
}

fn status(calendar: &BroadcastCalendar, scheduled: &str, now: Option<&str>) -> Result<Value> {
    let scheduled_at = instant_or_now(calendar, Some(scheduled))?;
    let now = instant_or_now(calendar, now)?;
    let scheduled_week = calendar.week_record(&scheduled_at)?;
    let current_week = calendar.week_record(&now)?;
    Ok(json!({
        "scheduled": scheduled_week,
        "current": current_week,
        "status": air_status(scheduled_week, current_week),
    }))
}

fn shift(calendar: &BroadcastCalendar, record: WeekRecord, delta: i64) -> Result<Value> {
    let shifted = calendar
        .shift_week(record, delta)
        .with_context(|| format!("failed to shift {record} by {delta} weeks"))?;
    Ok(json!({
        "from": record.to_string(),
        "delta": delta,
        "label": shifted.to_string(),
        "record": shifted,
    }))
}
