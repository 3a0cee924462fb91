//! # broadcast-calendar
//!
//! Deterministic broadcast-week calendar.
//!
//! Content is scheduled against broadcast weeks that start on a weekly cutover
//! (Friday 19:00 local time by default). Fiscal quarters start at the first
//! cutover of the matching Gregorian quarter, and weeks are counted from there.
//! Any instant maps to exactly one `{year, quarter, week}` record, and a
//! backend applying the same rule gets the same record.
//!
//! ## Modules
//!
//! - [`quarter`]: Gregorian `(year, quarter)` keys and first days
//! - [`anchor`]: Cutover rule, quarter anchors, three-candidate quarter resolution
//! - [`week`]: Week indexing and the [`WeekRecord`]
//! - [`zone`]: The resolver bound to an explicit IANA timezone ([`BroadcastCalendar`])
//! - [`schedule`]: Quarter/week spans, week navigation, air status
//! - [`error`]: Error types

pub mod anchor;
pub mod error;
pub mod quarter;
pub mod schedule;
pub mod week;
pub mod zone;

pub use anchor::{
    anchor_for_quarter, anchor_for_quarter_with_rule, resolve_anchor, resolve_anchor_with_rule,
    CutoverRule, ResolvedQuarter,
};
pub use error::CalendarError;
pub use quarter::{calendar_quarter, first_day_of_quarter, QuarterKey};
pub use schedule::{air_status, AirStatus, QuarterSpan, WeekSpan};
pub use week::{this_week_record, this_week_record_with_rule, week_of_quarter, WeekRecord};
pub use zone::{parse_timezone, BroadcastCalendar};
