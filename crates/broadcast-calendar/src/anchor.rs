//! Fiscal quarter anchors.
//!
//! Every fiscal quarter starts at an *anchor*: the first weekly cutover
//! (Friday 19:00 by default) on or after the first day of the matching
//! Gregorian quarter. When the Gregorian quarter opens on the day right after
//! the cutover weekday (a Saturday, by default), the anchor is the cutover of
//! the previous day instead of the one six days later.
//!
//! Fiscal quarters are the half-open intervals between consecutive anchors.
//! All values here are local wall-clock values; see [`crate::zone`] for the
//! mapping from real instants.
//!
//! # Functions
//!
//! - [`anchor_for_quarter`]: The anchor of a given `(year, quarter)`
//! - [`resolve_anchor`]: Which fiscal quarter an instant falls in

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::Serialize;

use crate::error::{CalendarError, Result};
use crate::quarter::QuarterKey;

// ── Cutover rule ────────────────────────────────────────────────────────────

/// The weekly cutover that starts a broadcast week.
///
/// The default is Friday 19:00, the evening broadcast weeks conventionally
/// start on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CutoverRule {
    /// Weekday the broadcast week starts on.
    pub weekday: Weekday,
    /// Local wall-clock time the broadcast week starts at.
    pub time: NaiveTime,
}

impl Default for CutoverRule {
    fn default() -> Self {
        Self {
            weekday: Weekday::Fri,
            time: NaiveTime::MIN + Duration::hours(19),
        }
    }
}

impl fmt::Display for CutoverRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = if self.time.second() == 0 { "%H:%M" } else { "%H:%M:%S" };
        write!(f, "{}@{}", self.weekday, self.time.format(format))
    }
}

impl FromStr for CutoverRule {
    type Err = CalendarError;

    /// Parse `<weekday>@<HH:MM[:SS]>`, e.g. `fri@19:00` or `Saturday@06:30`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (day, time) = s
            .split_once('@')
            .ok_or_else(|| CalendarError::InvalidCutover(format!("'{s}': expected weekday@HH:MM")))?;
        let weekday = day
            .trim()
            .parse::<Weekday>()
            .map_err(|_| CalendarError::InvalidCutover(format!("'{s}': unknown weekday")))?;
        let time = time.trim();
        let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
            .map_err(|e| CalendarError::InvalidCutover(format!("'{s}': {e}")))?;
        Ok(Self { weekday, time })
    }
}

// ── anchor_for_quarter ──────────────────────────────────────────────────────

/// Compute the anchor of a fiscal quarter using the default cutover rule.
///
/// # Examples
///
/// ```
/// use broadcast_calendar::anchor::anchor_for_quarter;
/// use broadcast_calendar::quarter::QuarterKey;
///
/// // January 1, 2025 is a Wednesday: the anchor is Friday January 3 at 19:00.
/// let anchor = anchor_for_quarter(QuarterKey::new(2025, 1).unwrap()).unwrap();
/// assert_eq!(anchor.to_string(), "2025-01-03 19:00:00");
/// ```
pub fn anchor_for_quarter(key: QuarterKey) -> Result<NaiveDateTime> {
    anchor_for_quarter_with_rule(key, &CutoverRule::default())
}

/// Compute the anchor of a fiscal quarter for a given cutover rule.
///
/// # Errors
///
/// Returns [`CalendarError::OutOfRange`] only at the edges of chrono's
/// representable dates.
pub fn anchor_for_quarter_with_rule(key: QuarterKey, rule: &CutoverRule) -> Result<NaiveDateTime> {
    let first = key.first_day()?;

    let date = if first.weekday() == rule.weekday.succ() {
        first.pred_opt()
    } else {
        let dow = first.weekday().num_days_from_sunday() as i64;
        let cutover = rule.weekday.num_days_from_sunday() as i64;
        first.checked_add_signed(Duration::days((cutover - dow + 7) % 7))
    }
    .ok_or_else(|| CalendarError::OutOfRange(format!("anchor of {key} is not representable")))?;

    Ok(date.and_time(rule.time))
}

// ── resolve_anchor ──────────────────────────────────────────────────────────

/// The fiscal quarter an instant was resolved to, with its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedQuarter {
    /// The fiscal quarter.
    pub key: QuarterKey,
    /// The quarter's anchor (local wall-clock).
    pub anchor: NaiveDateTime,
}

/// Resolve the fiscal quarter of a wall-clock instant using the default cutover rule.
pub fn resolve_anchor(t: NaiveDateTime) -> Result<ResolvedQuarter> {
    resolve_anchor_with_rule(t, &CutoverRule::default())
}

/// Resolve the fiscal quarter of a wall-clock instant.
///
/// Only three candidates are considered: the Gregorian quarter of `t` and its
/// two neighbours. An anchor lies at most one day before and six days after
/// the first day of its Gregorian quarter, so nothing further away can contain
/// `t`.
///
/// Each fiscal quarter includes its own anchor and excludes the next one.
pub fn resolve_anchor_with_rule(t: NaiveDateTime, rule: &CutoverRule) -> Result<ResolvedQuarter> {
    let curr = QuarterKey::containing(t.date());
    let curr_anchor = anchor_for_quarter_with_rule(curr, rule)?;

    let next = curr.next();
    let next_anchor = anchor_for_quarter_with_rule(next, rule)?;

    if t >= next_anchor {
        return Ok(ResolvedQuarter {
            key: next,
            anchor: next_anchor,
        });
    }

    if t < curr_anchor {
        let prev = curr.prev();
        return Ok(ResolvedQuarter {
            key: prev,
            anchor: anchor_for_quarter_with_rule(prev, rule)?,
        });
    }

    Ok(ResolvedQuarter {
        key: curr,
        anchor: curr_anchor,
    })
}
