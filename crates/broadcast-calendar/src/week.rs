//! Broadcast weeks and the `{year, quarter, week}` record.
//!
//! Weeks are 7-day buckets counted from the fiscal quarter's anchor, starting
//! at 1. Two instants are in the same broadcast week exactly when their
//! [`WeekRecord`]s are equal, and records order chronologically.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::anchor::{resolve_anchor_with_rule, CutoverRule};
use crate::error::{CalendarError, Result};
use crate::quarter::QuarterKey;

/// A `{year, quarter, week}` record.
///
/// Field order gives the derived ordering: year, then quarter, then week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekRecord {
    /// Gregorian year of the first day of the resolved fiscal quarter.
    #[serde(rename = "yearValue")]
    pub year: i32,
    /// Fiscal quarter, 1..=4.
    #[serde(rename = "quarterValue")]
    pub quarter: u32,
    /// 1-based week within the fiscal quarter.
    #[serde(rename = "weekValue")]
    pub week: u32,
}

impl WeekRecord {
    /// The fiscal quarter this record belongs to.
    pub fn quarter_key(&self) -> Result<QuarterKey> {
        QuarterKey::new(self.year, self.quarter)
    }
}

impl fmt::Display for WeekRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}W{}", self.year, self.quarter, self.week)
    }
}

impl FromStr for WeekRecord {
    type Err = CalendarError;

    /// Parse `2025Q1W3` (case-insensitive). The week must be at least 1;
    /// whether it exists in that quarter is checked by [`crate::schedule`].
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (quarter_part, week_part) = trimmed
            .rsplit_once(['W', 'w'])
            .ok_or_else(|| CalendarError::InvalidRecord(format!("'{trimmed}': expected YYYYQnWn")))?;
        let key: QuarterKey = quarter_part
            .parse()
            .map_err(|e| CalendarError::InvalidRecord(format!("'{trimmed}': {e}")))?;
        let week: u32 = week_part
            .parse()
            .map_err(|_| CalendarError::InvalidRecord(format!("'{trimmed}': invalid week")))?;
        if week == 0 {
            return Err(CalendarError::InvalidRecord(format!(
                "'{trimmed}': weeks start at 1"
            )));
        }
        Ok(Self {
            year: key.year(),
            quarter: key.quarter(),
            week,
        })
    }
}

/// 1-based index of the 7-day bucket containing `t`, counted from `anchor`.
///
/// Whole days are floored before dividing by seven, so the time of day of `t`
/// only matters relative to the cutover time. An instant before `anchor` is
/// not part of the quarter and clamps to week 1.
pub fn week_of_quarter(t: NaiveDateTime, anchor: NaiveDateTime) -> u32 {
    let seconds = (t - anchor).num_seconds().max(0);
    let days = seconds / 86_400;
    (days / 7 + 1) as u32
}

/// Resolve a wall-clock instant to its record using the default cutover rule.
///
/// # Examples
///
/// ```
/// use broadcast_calendar::week::this_week_record;
/// use chrono::NaiveDate;
///
/// let t = NaiveDate::from_ymd_opt(2025, 1, 10)
///     .unwrap()
///     .and_hms_opt(19, 0, 0)
///     .unwrap();
/// let record = this_week_record(t).unwrap();
/// assert_eq!((record.year, record.quarter, record.week), (2025, 1, 2));
/// ```
pub fn this_week_record(t: NaiveDateTime) -> Result<WeekRecord> {
    this_week_record_with_rule(t, &CutoverRule::default())
}

/// Resolve a wall-clock instant to its record.
///
/// # Errors
///
/// Returns [`CalendarError::OutOfRange`] only at the edges of chrono's
/// representable dates.
pub fn this_week_record_with_rule(t: NaiveDateTime, rule: &CutoverRule) -> Result<WeekRecord> {
    let resolved = resolve_anchor_with_rule(t, rule)?;
    let week = week_of_quarter(t, resolved.anchor);
    Ok(WeekRecord {
        year: resolved.key.first_day()?.year(),
        quarter: resolved.key.quarter(),
        week,
    })
}
