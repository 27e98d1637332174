//! Timestamp parsing
//!
//! Source exports encode dates as text in a handful of layouts and clock times either as numbers
//! (`1430`, `915`) or as text (`"14:30"`, `"9:15"`, `"1430"`). Parsing is permissive: a clock
//! time that cannot be read yields `None` and callers treat it as midnight, provided the date
//! itself parses.
use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::table::Value;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

// Offsets beyond this are garbage rather than clock times.
const MAX_OFFSET_MINUTES: i64 = 1_000_000_000;

/// Parse a date (or date-time) cell
///
/// Only text cells carry dates. Fractional seconds are accepted in the ISO layouts.
pub fn parse_date(value: &Value) -> Option<NaiveDateTime> {
    let text = value.as_text()?.trim();
    if text.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    let date_part = text.split('.').next().unwrap_or(text);
    if let Ok(dt) = NaiveDateTime::parse_from_str(date_part, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parse a clock-time cell into an offset from midnight
///
/// Numbers are read as `HHMM`/`HMM` (`1430` is 14:30, `915` is 09:15). Text is read as `H:MM` or
/// `HH:MM`, and bare strings of up to four digits are read like numbers. Anything else gives
/// `None`.
pub fn parse_time_of_day(value: &Value) -> Option<Duration> {
    match value {
        Value::Int(hhmm) => hhmm_offset(*hhmm),
        Value::Float(x) if x.is_finite() => hhmm_offset(x.trunc() as i64),
        Value::Text(s) => {
            let s = s.trim();
            if s.contains(':') {
                let mut parts = s.split(':');
                let hours = parts.next()?.trim().parse::<i64>().ok()?;
                let minutes = match parts.next() {
                    Some(mm) => mm.trim().parse::<i64>().ok()?,
                    None => 0,
                };
                offset(hours, minutes)
            } else if !s.is_empty() && s.len() <= 4 && s.chars().all(|c| c.is_ascii_digit()) {
                hhmm_offset(s.parse::<i64>().ok()?)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Offset for a fractional hour-of-day cell such as `13.5`
pub fn parse_hour_offset(value: &Value) -> Option<Duration> {
    let hours = value.number().ok()??;
    if !hours.is_finite() || hours.abs() * 60.0 > MAX_OFFSET_MINUTES as f64 {
        return None;
    }
    Some(Duration::milliseconds((hours * 3_600_000.0).round() as i64))
}

/// Date plus an optional offset, a missing offset counts as midnight.
pub fn combine(date: NaiveDateTime, offset: Option<Duration>) -> Option<NaiveDateTime> {
    date.checked_add_signed(offset.unwrap_or_else(Duration::zero))
}

fn hhmm_offset(hhmm: i64) -> Option<Duration> {
    offset(hhmm.div_euclid(100), hhmm.rem_euclid(100))
}

fn offset(hours: i64, minutes: i64) -> Option<Duration> {
    let total = hours.checked_mul(60)?.checked_add(minutes)?;
    if total.abs() > MAX_OFFSET_MINUTES {
        return None;
    }
    Some(Duration::minutes(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn minutes(value: Value) -> Option<i64> {
        parse_time_of_day(&value).map(|d| d.num_minutes())
    }

    #[test]
    fn numeric_clock_times() {
        assert_eq!(minutes(Value::Int(1430)), Some(14 * 60 + 30));
        assert_eq!(minutes(Value::Int(915)), Some(9 * 60 + 15));
        assert_eq!(minutes(Value::Int(5)), Some(5));
        assert_eq!(minutes(Value::Float(2359.0)), Some(23 * 60 + 59));
    }

    #[test]
    fn text_clock_times() {
        assert_eq!(minutes("14:30".into()), Some(14 * 60 + 30));
        assert_eq!(minutes("9:05".into()), Some(9 * 60 + 5));
        assert_eq!(minutes("7:".into()), None);
        assert_eq!(minutes("1430".into()), Some(14 * 60 + 30));
        assert_eq!(minutes("0915".into()), Some(9 * 60 + 15));
    }

    #[test]
    fn unreadable_clock_times() {
        assert_eq!(minutes("noon".into()), None);
        assert_eq!(minutes("143000".into()), None);
        assert_eq!(minutes(Value::Missing), None);
        assert_eq!(minutes(Value::Float(f64::NAN)), None);
    }

    #[test]
    fn date_layouts() {
        let iso = parse_date(&"2020-03-01".into()).unwrap();
        assert_eq!((iso.year(), iso.month(), iso.day()), (2020, 3, 1));
        assert_eq!(iso.hour(), 0);

        let la = parse_date(&"03/01/2020 12:00:00 AM".into()).unwrap();
        assert_eq!(la, iso);

        let with_time = parse_date(&"2020-03-01 17:45:00".into()).unwrap();
        assert_eq!((with_time.hour(), with_time.minute()), (17, 45));

        let fractional = parse_date(&"2020-03-01T17:45:00.250".into()).unwrap();
        assert_eq!(fractional.hour(), 17);

        assert_eq!(parse_date(&"yesterday".into()), None);
        assert_eq!(parse_date(&Value::Int(20200301)), None);
    }

    #[test]
    fn combine_rolls_over_midnight() {
        let date = parse_date(&"2020-03-01".into()).unwrap();
        let dt = combine(date, parse_time_of_day(&Value::Int(2500))).unwrap();
        assert_eq!((dt.day(), dt.hour()), (2, 1));
        assert_eq!(combine(date, None), Some(date));
    }

    #[test]
    fn fractional_hours() {
        let offset = parse_hour_offset(&Value::Float(13.5)).unwrap();
        assert_eq!(offset.num_minutes(), 13 * 60 + 30);
        assert_eq!(parse_hour_offset(&Value::Missing), None);
        assert_eq!(parse_hour_offset(&"late".into()), None);
    }
}
