//! WASM bindings for the broadcast-week resolver.
//!
//! Instants cross the boundary as Unix epoch milliseconds (`Date.getTime()`),
//! and every call names the IANA timezone whose wall clock defines the week.

use broadcast_calendar::{air_status, BroadcastCalendar, CalendarError, QuarterKey, WeekRecord};
use wasm_bindgen::prelude::*;

/// `{yearValue, quarterValue, weekValue}` as seen from JavaScript.
#[wasm_bindgen]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsWeekRecord {
    record: WeekRecord,
}

#[wasm_bindgen]
impl JsWeekRecord {
    #[wasm_bindgen(getter = yearValue)]
    pub fn year_value(&self) -> i32 {
        self.record.year
    }

    #[wasm_bindgen(getter = quarterValue)]
    pub fn quarter_value(&self) -> u32 {
        self.record.quarter
    }

    #[wasm_bindgen(getter = weekValue)]
    pub fn week_value(&self) -> u32 {
        self.record.week
    }

    /// `2025Q1W2`
    #[wasm_bindgen(js_name = toString)]
    pub fn to_label(&self) -> String {
        self.record.to_string()
    }
}

fn epoch_millis(value: f64) -> Result<i64, CalendarError> {
    if !value.is_finite() {
        return Err(CalendarError::InvalidDatetime(format!(
            "epoch millis must be finite, got {value}"
        )));
    }
    Ok(value.floor() as i64)
}

fn record_at(millis: f64, timezone: &str) -> Result<WeekRecord, CalendarError> {
    let calendar = BroadcastCalendar::from_timezone_name(timezone)?;
    let t = calendar.from_epoch_millis(epoch_millis(millis)?)?;
    calendar.week_record(&t)
}

fn anchor_millis(year: i32, quarter: u32, timezone: &str) -> Result<i64, CalendarError> {
    let calendar = BroadcastCalendar::from_timezone_name(timezone)?;
    let anchor = calendar.anchor_for_quarter(QuarterKey::new(year, quarter)?)?;
    Ok(anchor.timestamp_millis())
}

fn status_at(scheduled: f64, now: f64, timezone: &str) -> Result<&'static str, CalendarError> {
    let scheduled = record_at(scheduled, timezone)?;
    let now = record_at(now, timezone)?;
    Ok(air_status(scheduled, now).as_str())
}

/// The broadcast week of an instant.
#[wasm_bindgen(js_name = thisWeekRecord)]
pub fn this_week_record(millis: f64, timezone: &str) -> Result<JsWeekRecord, JsError> {
    Ok(JsWeekRecord {
        record: record_at(millis, timezone)?,
    })
}

/// The anchor of a fiscal quarter, in epoch milliseconds.
#[wasm_bindgen(js_name = anchorForQuarter)]
pub fn anchor_for_quarter(year: i32, quarter: u32, timezone: &str) -> Result<f64, JsError> {
    Ok(anchor_millis(year, quarter, timezone)? as f64)
}

/// `"past"`, `"current"` or `"future"`, comparing broadcast weeks.
#[wasm_bindgen(js_name = airStatus)]
pub fn air_status_at(
    scheduled_millis: f64,
    now_millis: f64,
    timezone: &str,
) -> Result<String, JsError> {
    Ok(status_at(scheduled_millis, now_millis, timezone)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-01-10T10:00:00Z = 19:00 in Tokyo
    const JAN_10_TOKYO_CUTOVER: f64 = 1_736_503_200_000.0;

    #[test]
    fn test_record_at_cutover() {
        let record = record_at(JAN_10_TOKYO_CUTOVER, "Asia/Tokyo").unwrap();
        assert_eq!(record.to_string(), "2025Q1W2");
        let js = JsWeekRecord { record };
        assert_eq!((js.year_value(), js.quarter_value(), js.week_value()), (2025, 1, 2));
        assert_eq!(js.to_label(), "2025Q1W2");
    }

    #[test]
    fn test_record_one_ms_before_cutover() {
        let record = record_at(JAN_10_TOKYO_CUTOVER - 1.0, "Asia/Tokyo").unwrap();
        assert_eq!(record.to_string(), "2025Q1W1");
    }

    #[test]
    fn test_record_rejects_nan_and_bad_zone() {
        assert!(record_at(f64::NAN, "Asia/Tokyo").is_err());
        assert!(record_at(f64::INFINITY, "Asia/Tokyo").is_err());
        assert!(record_at(0.0, "Nowhere/Zone").is_err());
    }

    #[test]
    fn test_anchor_millis() {
        // 2025-01-03T19:00:00Z
        assert_eq!(anchor_millis(2025, 1, "UTC").unwrap(), 1_735_930_800_000);
        assert!(anchor_millis(2025, 5, "UTC").is_err());
    }

    #[test]
    fn test_status_at() {
        let week = 7.0 * 86_400_000.0;
        let now = JAN_10_TOKYO_CUTOVER;
        assert_eq!(status_at(now - 1.0, now, "Asia/Tokyo").unwrap(), "past");
        assert_eq!(status_at(now + 1.0, now, "Asia/Tokyo").unwrap(), "current");
        assert_eq!(status_at(now + week, now, "Asia/Tokyo").unwrap(), "future");
    }
}
