use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde_json::Value;

// Values above this are epoch milliseconds; anything smaller (epoch seconds,
// stray small integers) is not a usable due date.
const MILLIS_THRESHOLD: f64 = 10_000_000_000.0;

/// Normalize a client-supplied due date into a calendar date.
///
/// Accepts a millisecond epoch timestamp or an ISO-8601 date/datetime string
/// (a trailing `Z` is read as UTC). Anything else, including unparseable
/// input, maps to `None` without error.
pub fn parse_due_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Number(n) => {
            let millis = n.as_f64()?;
            if millis <= MILLIS_THRESHOLD {
                return None;
            }
            Local
                .timestamp_millis_opt(millis as i64)
                .single()
                .map(|dt| dt.date_naive())
        }
        Value::String(s) => parse_iso(s),
        _ => None,
    }
}

// Date portion of an ISO-8601 string, wall-clock in the string's own offset.
fn parse_iso(s: &str) -> Option<NaiveDate> {
    let s = s.replace('Z', "+00:00");
    if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_and_non_date_types_are_absent() {
        assert_eq!(parse_due_date(&Value::Null), None);
        assert_eq!(parse_due_date(&json!(true)), None);
        assert_eq!(parse_due_date(&json!([1700000000000i64])), None);
        assert_eq!(parse_due_date(&json!({ "ms": 1700000000000i64 })), None);
    }

    #[test]
    fn millisecond_timestamps_convert_to_local_date() {
        let ms = 1700000000000i64;
        let expected = Local
            .timestamp_millis_opt(ms)
            .single()
            .unwrap()
            .date_naive();
        assert_eq!(parse_due_date(&json!(ms)), Some(expected));
    }

    #[test]
    fn numbers_at_or_below_threshold_are_absent() {
        // Epoch seconds and small integers fall below the cutoff.
        assert_eq!(parse_due_date(&json!(1700000000)), None);
        assert_eq!(parse_due_date(&json!(10_000_000_000i64)), None);
        assert_eq!(parse_due_date(&json!(42)), None);
        assert_eq!(parse_due_date(&json!(0)), None);
    }

    #[test]
    fn out_of_range_milliseconds_are_absent() {
        assert_eq!(parse_due_date(&json!(300_000_000_000_000_000i64)), None);
    }

    #[test]
    fn iso_date_strings_parse() {
        assert_eq!(
            parse_due_date(&json!("2024-03-05")),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
    }

    #[test]
    fn iso_datetime_strings_keep_their_wall_clock_date() {
        assert_eq!(
            parse_due_date(&json!("2024-03-05T10:30:00Z")),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        // 23:30 in +09:00 is still March 5th in that offset.
        assert_eq!(
            parse_due_date(&json!("2024-03-05T23:30:00+09:00")),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(
            parse_due_date(&json!("2024-03-05T08:15:30.250")),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
    }

    #[test]
    fn unparseable_strings_are_absent() {
        assert_eq!(parse_due_date(&json!("next tuesday")), None);
        assert_eq!(parse_due_date(&json!("2024-13-40")), None);
        assert_eq!(parse_due_date(&json!("")), None);
    }

    #[test]
    fn same_instant_agrees_between_millis_and_iso_input() {
        // 2024-03-05 12:00:00 UTC expressed both ways.
        let ms = 1709640000000i64;
        let from_millis = parse_due_date(&json!(ms));
        let iso = Local
            .timestamp_millis_opt(ms)
            .single()
            .unwrap()
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string();
        assert_eq!(parse_due_date(&json!(iso)), from_millis);
    }
}
