//! Schedule views built on top of the resolver.
//!
//! These are the questions the consuming UI asks of the calendar: how long a
//! fiscal quarter is, when a given broadcast week starts and ends, which week
//! is `n` weeks away (chart navigation), and whether an episode has aired.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::Serialize;

use crate::anchor::anchor_for_quarter_with_rule;
use crate::error::{CalendarError, Result};
use crate::quarter::QuarterKey;
use crate::week::{this_week_record_with_rule, WeekRecord};
use crate::zone::BroadcastCalendar;

/// A fiscal quarter as a half-open interval `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarterSpan {
    /// The fiscal quarter.
    pub key: QuarterKey,
    /// The quarter's anchor (inclusive).
    pub start: DateTime<Tz>,
    /// The next quarter's anchor (exclusive).
    pub end: DateTime<Tz>,
    /// Number of broadcast weeks in the quarter (12, 13 or 14).
    pub weeks: u32,
}

/// A broadcast week as a half-open interval `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekSpan {
    pub record: WeekRecord,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

/// Where a scheduled item sits relative to the current broadcast week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AirStatus {
    /// Scheduled in an earlier broadcast week.
    Past,
    /// Scheduled in the current broadcast week.
    Current,
    /// Scheduled in a later broadcast week.
    Future,
}

impl AirStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AirStatus::Past => "past",
            AirStatus::Current => "current",
            AirStatus::Future => "future",
        }
    }
}

impl fmt::Display for AirStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare a scheduled week with the current one.
pub fn air_status(scheduled: WeekRecord, now: WeekRecord) -> AirStatus {
    match scheduled.cmp(&now) {
        std::cmp::Ordering::Less => AirStatus::Past,
        std::cmp::Ordering::Equal => AirStatus::Current,
        std::cmp::Ordering::Greater => AirStatus::Future,
    }
}

impl BroadcastCalendar {
    /// Wall-clock anchors of `key` and of the following quarter.
    fn quarter_bounds(&self, key: QuarterKey) -> Result<(NaiveDateTime, NaiveDateTime, u32)> {
        let start = anchor_for_quarter_with_rule(key, self.cutover())?;
        let end = anchor_for_quarter_with_rule(key.next(), self.cutover())?;
        // Both anchors share weekday and time, so the gap is whole weeks.
        let weeks = ((end - start).num_days() / 7) as u32;
        Ok((start, end, weeks))
    }

    /// Wall-clock start of the week a record names.
    fn week_start(&self, record: WeekRecord) -> Result<NaiveDateTime> {
        let key = record
            .quarter_key()
            .map_err(|e| CalendarError::InvalidRecord(format!("{record}: {e}")))?;
        let (start, _, weeks) = self.quarter_bounds(key)?;
        if record.week == 0 || record.week > weeks {
            return Err(CalendarError::InvalidRecord(format!(
                "{record}: {key} has weeks 1..={weeks}"
            )));
        }
        start
            .checked_add_signed(Duration::days(i64::from(record.week - 1) * 7))
            .ok_or_else(|| CalendarError::OutOfRange(format!("{record}")))
    }

    /// The instant bounds and week count of a fiscal quarter.
    ///
    /// Consecutive spans tile time: each `end` is the next span's `start`.
    pub fn quarter_span(&self, key: QuarterKey) -> Result<QuarterSpan> {
        let (start, end, weeks) = self.quarter_bounds(key)?;
        Ok(QuarterSpan {
            key,
            start: self.localize(start)?,
            end: self.localize(end)?,
            weeks,
        })
    }

    /// The instant bounds of one broadcast week.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidRecord`] if the week does not exist in
    /// that quarter.
    pub fn week_span(&self, record: WeekRecord) -> Result<WeekSpan> {
        let start = self.week_start(record)?;
        let end = start
            .checked_add_signed(Duration::days(7))
            .ok_or_else(|| CalendarError::OutOfRange(format!("{record}")))?;
        Ok(WeekSpan {
            record,
            start: self.localize(start)?,
            end: self.localize(end)?,
        })
    }

    /// Every broadcast week of a fiscal quarter, in order.
    pub fn week_table(&self, key: QuarterKey) -> Result<Vec<WeekSpan>> {
        let (_, _, weeks) = self.quarter_bounds(key)?;
        (1..=weeks)
            .map(|week| {
                self.week_span(WeekRecord {
                    year: key.year(),
                    quarter: key.quarter(),
                    week,
                })
            })
            .collect()
    }

    /// The record `delta` broadcast weeks away from `record`, crossing
    /// quarter and year boundaries as needed.
    ///
    /// # Examples
    ///
    /// ```
    /// use broadcast_calendar::{BroadcastCalendar, WeekRecord};
    ///
    /// let calendar = BroadcastCalendar::new(chrono_tz::UTC);
    /// let last: WeekRecord = "2024Q4W13".parse().unwrap();
    /// assert_eq!(calendar.shift_week(last, 1).unwrap().to_string(), "2025Q1W1");
    /// ```
    pub fn shift_week(&self, record: WeekRecord, delta: i64) -> Result<WeekRecord> {
        let start = self.week_start(record)?;
        let shifted = delta
            .checked_mul(7)
            .and_then(Duration::try_days)
            .and_then(|offset| start.checked_add_signed(offset))
            .ok_or_else(|| CalendarError::OutOfRange(format!("{record} shifted by {delta} weeks")))?;
        this_week_record_with_rule(shifted, self.cutover())
    }

    /// Whether `scheduled` airs before, during or after the broadcast week of `now`.
    pub fn air_status<A: TimeZone, B: TimeZone>(
        &self,
        scheduled: &DateTime<A>,
        now: &DateTime<B>,
    ) -> Result<AirStatus> {
        Ok(air_status(self.week_record(scheduled)?, self.week_record(now)?))
    }
}
