//! Schedule time handling.
//!
//! Published ferry schedules list sailings as "HH:MM" strings for a single
//! service day. This module turns those strings into full timestamps on an
//! anchor date and formats durations for human-readable reports.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// A schedule entry that is not a valid "HH:MM" time of day.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Parse a time of day from "HH:MM" format.
///
/// # Examples
///
/// ```
/// use take_me_home::domain::parse_hhmm;
///
/// assert!(parse_hhmm("00:00").is_ok());
/// assert!(parse_hhmm("15:40").is_ok());
///
/// assert!(parse_hhmm("1540").is_err());
/// assert!(parse_hhmm("15:4").is_err());
/// assert!(parse_hhmm("24:00").is_err());
/// ```
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, TimeError> {
    let (hour, minute) = s
        .split_once(':')
        .ok_or_else(|| TimeError::new("expected HH:MM format"))?;
    let hour = two_digit_field(hour).ok_or_else(|| TimeError::new("hour must be two digits"))?;
    let minute =
        two_digit_field(minute).ok_or_else(|| TimeError::new("minute must be two digits"))?;

    match (hour, minute) {
        (24.., _) => Err(TimeError::new("hour must be 0-23")),
        (_, 60..) => Err(TimeError::new("minute must be 0-59")),
        _ => NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| TimeError::new("time of day out of range")),
    }
}

fn two_digit_field(field: &str) -> Option<u32> {
    if field.len() != 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Build timestamps on `anchor` for a list of "HH:MM" entries.
///
/// Entries keep their input order; callers that need chronological order
/// sort afterwards.
///
/// # Examples
///
/// ```
/// use take_me_home::domain::schedule;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let sailings = schedule(day, &["15:10", "15:40"]).unwrap();
/// assert_eq!(sailings[1].to_string(), "2025-06-01 15:40:00");
/// ```
pub fn schedule(anchor: NaiveDate, times: &[&str]) -> Result<Vec<NaiveDateTime>, TimeError> {
    times
        .iter()
        .map(|t| parse_hhmm(t).map(|time| anchor.and_time(time)))
        .collect()
}

/// Format a duration for reports, e.g. `47m` or `2h 13m`.
///
/// Seconds are truncated. Negative durations keep their sign.
///
/// # Examples
///
/// ```
/// use take_me_home::domain::format_duration;
/// use chrono::Duration;
///
/// assert_eq!(format_duration(Duration::minutes(18)), "18m");
/// assert_eq!(format_duration(Duration::minutes(133)), "2h 13m");
/// assert_eq!(format_duration(Duration::minutes(-2)), "-2m");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_minutes();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    let (hours, minutes) = (total / 60, total % 60);

    if hours == 0 {
        format!("{sign}{minutes}m")
    } else {
        format!("{sign}{hours}h {minutes:02}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn parse_valid_times() {
        let t = parse_hhmm("00:00").unwrap();
        assert_eq!(t, NaiveTime::from_hms_opt(0, 0, 0).unwrap());

        let t = parse_hhmm("23:59").unwrap();
        assert_eq!(t, NaiveTime::from_hms_opt(23, 59, 0).unwrap());

        let t = parse_hhmm("15:10").unwrap();
        assert_eq!(t, NaiveTime::from_hms_opt(15, 10, 0).unwrap());
    }

    #[test]
    fn malformed_entries() {
        for text in ["1510", "15:1", "15:100", "15-10", "ab:cd", "1a:10", "+1:10", "", ":"] {
            assert!(parse_hhmm(text).is_err(), "{text:?} should not parse");
        }
    }

    #[test]
    fn out_of_range_fields() {
        assert_eq!(
            parse_hhmm("24:00").unwrap_err().to_string(),
            "invalid time: hour must be 0-23"
        );
        assert_eq!(
            parse_hhmm("12:60").unwrap_err().to_string(),
            "invalid time: minute must be 0-59"
        );
    }

    #[test]
    fn error_display() {
        let err = parse_hhmm("25:00").unwrap_err();
        assert_eq!(err.to_string(), "invalid time: hour must be 0-23");
    }

    #[test]
    fn schedule_keeps_input_order() {
        let times = schedule(day(), &["16:10", "15:10"]).unwrap();
        assert_eq!(times.len(), 2);
        assert_eq!(times[0], day().and_hms_opt(16, 10, 0).unwrap());
        assert_eq!(times[1], day().and_hms_opt(15, 10, 0).unwrap());
    }

    #[test]
    fn schedule_rejects_bad_entry() {
        assert!(schedule(day(), &["15:10", "nope!"]).is_err());
    }

    #[test]
    fn schedule_empty() {
        assert!(schedule(day(), &[]).unwrap().is_empty());
    }

    #[test]
    fn format_durations() {
        assert_eq!(format_duration(Duration::zero()), "0m");
        assert_eq!(format_duration(Duration::minutes(59)), "59m");
        assert_eq!(format_duration(Duration::minutes(60)), "1h 00m");
        assert_eq!(format_duration(Duration::minutes(107)), "1h 47m");
        assert_eq!(format_duration(Duration::minutes(-75)), "-1h 15m");
        assert_eq!(format_duration(Duration::seconds(90)), "1m");
    }
}
