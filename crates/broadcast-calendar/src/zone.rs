//! The resolver bound to an explicit timezone.
//!
//! The core in [`crate::anchor`] and [`crate::week`] works on local wall-clock
//! values. [`BroadcastCalendar`] pins down *whose* wall clock: an IANA zone
//! chosen by the caller, never the machine's local zone. Instants are mapped
//! into that zone's wall clock before resolution, so every week boundary sits
//! at the cutover time in local time regardless of DST.
//!
//! Mapping a wall-clock value back to an instant (anchors, week spans) uses a
//! fixed policy:
//!
//! - ambiguous local times (DST fall-back) take the earliest instant;
//! - nonexistent local times (DST spring-forward gap) move forward by the
//!   length of the gap.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use tracing::{debug, trace};

use crate::anchor::{anchor_for_quarter_with_rule, resolve_anchor_with_rule, CutoverRule, ResolvedQuarter};
use crate::error::{CalendarError, Result};
use crate::quarter::QuarterKey;
use crate::week::{this_week_record_with_rule, WeekRecord};

/// Local formats accepted by [`BroadcastCalendar::parse_instant`], tried in order.
const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| CalendarError::InvalidTimezone(format!("'{s}'")))
}

/// Broadcast calendar for one timezone and cutover rule.
///
/// Cheap to copy and holds no mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BroadcastCalendar {
    tz: Tz,
    rule: CutoverRule,
}

impl BroadcastCalendar {
    /// A calendar in `tz` with the default Friday 19:00 cutover.
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            rule: CutoverRule::default(),
        }
    }

    /// A calendar for an IANA timezone name (e.g. `"Asia/Tokyo"`).
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidTimezone`] if the name is not a valid
    /// IANA timezone.
    pub fn from_timezone_name(name: &str) -> Result<Self> {
        Ok(Self::new(parse_timezone(name)?))
    }

    /// Replace the cutover rule.
    pub fn with_cutover(mut self, rule: CutoverRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn cutover(&self) -> &CutoverRule {
        &self.rule
    }

    // ── Instant construction ────────────────────────────────────────────

    /// Parse an instant at the boundary where it enters the calendar.
    ///
    /// Accepts RFC 3339 (`2025-01-10T19:00:00Z`, any offset), local wall-clock
    /// `YYYY-MM-DDTHH:MM[:SS[.fff]]` (a space may replace the `T`) and
    /// `YYYY-MM-DD` (local midnight). Local values are read in this calendar's
    /// timezone.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDatetime`] if none of the formats match.
    pub fn parse_instant(&self, s: &str) -> Result<DateTime<Tz>> {
        let s = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&self.tz));
        }

        for format in LOCAL_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return self.localize(naive);
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return self.localize(date.and_time(NaiveTime::MIN));
        }

        Err(CalendarError::InvalidDatetime(format!(
            "'{s}': expected RFC 3339, YYYY-MM-DDTHH:MM[:SS] or YYYY-MM-DD"
        )))
    }

    /// Build an instant from Unix epoch milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDatetime`] if `millis` is outside
    /// chrono's representable range.
    pub fn from_epoch_millis(&self, millis: i64) -> Result<DateTime<Tz>> {
        DateTime::<Utc>::from_timestamp_millis(millis)
            .map(|dt| dt.with_timezone(&self.tz))
            .ok_or_else(|| {
                CalendarError::InvalidDatetime(format!("epoch millis {millis} out of range"))
            })
    }

    /// The wall-clock reading of `t` in this calendar's timezone.
    pub fn wall_clock<T: TimeZone>(&self, t: &DateTime<T>) -> NaiveDateTime {
        t.with_timezone(&self.tz).naive_local()
    }

    /// Map a wall-clock value in this calendar's timezone back to an instant.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::OutOfRange`] only at the edges of chrono's
    /// representable dates.
    pub fn localize(&self, naive: NaiveDateTime) -> Result<DateTime<Tz>> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Ok(dt),
            LocalResult::Ambiguous(earliest, latest) => {
                trace!(%naive, %earliest, %latest, tz = %self.tz, "ambiguous local time, taking earliest");
                Ok(earliest)
            }
            LocalResult::None => {
                // Read the value with the offset in force before the gap.
                let out_of_range =
                    || CalendarError::OutOfRange(format!("'{naive}' in {} is not representable", self.tz));
                let probe = naive
                    .checked_sub_signed(Duration::days(2))
                    .ok_or_else(out_of_range)?;
                let before = self.tz.offset_from_utc_datetime(&probe).fix();
                let utc = naive
                    .checked_sub_signed(Duration::seconds(i64::from(before.local_minus_utc())))
                    .ok_or_else(out_of_range)?;
                let shifted = self.tz.from_utc_datetime(&utc);
                debug!(%naive, %shifted, tz = %self.tz, "nonexistent local time, moved past the gap");
                Ok(shifted)
            }
        }
    }

    // ── Resolution ──────────────────────────────────────────────────────

    /// The anchor of a fiscal quarter as an instant in this timezone.
    pub fn anchor_for_quarter(&self, key: QuarterKey) -> Result<DateTime<Tz>> {
        self.localize(anchor_for_quarter_with_rule(key, &self.rule)?)
    }

    /// The fiscal quarter `t` falls in, with its wall-clock anchor.
    pub fn resolve_anchor<T: TimeZone>(&self, t: &DateTime<T>) -> Result<ResolvedQuarter> {
        resolve_anchor_with_rule(self.wall_clock(t), &self.rule)
    }

    /// The `{year, quarter, week}` record of `t`.
    ///
    /// # Examples
    ///
    /// ```
    /// use broadcast_calendar::BroadcastCalendar;
    ///
    /// let calendar = BroadcastCalendar::from_timezone_name("Asia/Tokyo").unwrap();
    /// let t = calendar.parse_instant("2025-01-10T19:00:00").unwrap();
    /// let record = calendar.week_record(&t).unwrap();
    /// assert_eq!(record.to_string(), "2025Q1W2");
    /// ```
    pub fn week_record<T: TimeZone>(&self, t: &DateTime<T>) -> Result<WeekRecord> {
        this_week_record_with_rule(self.wall_clock(t), &self.rule)
    }
}
