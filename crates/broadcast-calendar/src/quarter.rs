//! Gregorian quarter arithmetic.
//!
//! A [`QuarterKey`] names a Gregorian `(year, quarter)` pair. Fiscal quarters
//! are identified by the same key: the fiscal quarter `2025Q1` is the one whose
//! anchor is derived from January 1, 2025 (see [`crate::anchor`]).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{CalendarError, Result};

/// Map a 1-based month (1..=12) to its 1-based Gregorian quarter (1..=4).
///
/// Months outside 1..=12 are a contract violation of the caller.
pub fn calendar_quarter(month: u32) -> u32 {
    debug_assert!((1..=12).contains(&month), "month out of range: {month}");
    (month - 1) / 3 + 1
}

/// First calendar day of a Gregorian quarter (January 1, April 1, July 1 or
/// October 1).
///
/// # Errors
///
/// Returns [`CalendarError::InvalidQuarter`] if `quarter` is not in 1..=4, or
/// [`CalendarError::OutOfRange`] if the year cannot be represented.
pub fn first_day_of_quarter(year: i32, quarter: u32) -> Result<NaiveDate> {
    QuarterKey::new(year, quarter)?.first_day()
}

/// A Gregorian `(year, quarter)` pair.
///
/// Ordering is chronological: by year, then quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct QuarterKey {
    year: i32,
    quarter: u32,
}

impl QuarterKey {
    /// Build a key, validating the quarter number and the year's range.
    pub fn new(year: i32, quarter: u32) -> Result<Self> {
        if !(1..=4).contains(&quarter) {
            return Err(CalendarError::InvalidQuarter(format!(
                "quarter must be 1..=4, got {quarter}"
            )));
        }
        let key = Self { year, quarter };
        key.first_day()?;
        Ok(key)
    }

    /// The naive Gregorian quarter a date falls in.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: calendar_quarter(date.month()),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn quarter(&self) -> u32 {
        self.quarter
    }

    /// First month of the quarter (1, 4, 7 or 10).
    pub fn first_month(&self) -> u32 {
        (self.quarter - 1) * 3 + 1
    }

    /// First calendar day of the quarter.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::OutOfRange`] at the edges of chrono's
    /// representable years (reachable through [`QuarterKey::next`] and
    /// [`QuarterKey::prev`]).
    pub fn first_day(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.first_month(), 1).ok_or_else(|| {
            CalendarError::OutOfRange(format!("first day of {self} is not representable"))
        })
    }

    /// The chronologically following quarter.
    pub fn next(&self) -> Self {
        if self.quarter == 4 {
            Self {
                year: self.year + 1,
                quarter: 1,
            }
        } else {
            Self {
                year: self.year,
                quarter: self.quarter + 1,
            }
        }
    }

    /// The chronologically preceding quarter.
    pub fn prev(&self) -> Self {
        if self.quarter == 1 {
            Self {
                year: self.year - 1,
                quarter: 4,
            }
        } else {
            Self {
                year: self.year,
                quarter: self.quarter - 1,
            }
        }
    }
}

impl fmt::Display for QuarterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.quarter)
    }
}

impl FromStr for QuarterKey {
    type Err = CalendarError;

    /// Parse `2025Q1`, `2025-Q1` or `2025q1`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (year_part, quarter_part) = s
            .rsplit_once(['Q', 'q'])
            .ok_or_else(|| CalendarError::InvalidQuarter(format!("'{s}': expected YYYYQn")))?;
        let year_part = year_part.strip_suffix('-').unwrap_or(year_part);
        let year: i32 = year_part
            .parse()
            .map_err(|_| CalendarError::InvalidQuarter(format!("'{s}': invalid year")))?;
        let quarter: u32 = quarter_part
            .parse()
            .map_err(|_| CalendarError::InvalidQuarter(format!("'{s}': invalid quarter")))?;
        Self::new(year, quarter)
    }
}
