//! Wire time format helpers.
//!
//! The API exchanges timestamps as `YYYY-MM-DD HH:MM:SS`, or with
//! millisecond precision (`YYYY-MM-DD HH:MM:SS.mmm`) when the
//! `X-Lognex-Format-Millisecond` header is sent.

use chrono::NaiveDateTime;

use crate::error::ConfigError;

/// Second-precision wire format.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Millisecond-precision wire format.
pub const MS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Formats a timestamp in the API's wire format.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use moysklad_api::time::format_time;
///
/// let time = NaiveDate::from_ymd_opt(2024, 3, 1)
///     .unwrap()
///     .and_hms_milli_opt(12, 30, 5, 42)
///     .unwrap();
///
/// assert_eq!(format_time(&time, false), "2024-03-01 12:30:05");
/// assert_eq!(format_time(&time, true), "2024-03-01 12:30:05.042");
/// ```
#[must_use]
pub fn format_time(time: &NaiveDateTime, include_ms: bool) -> String {
    let format = if include_ms { MS_TIME_FORMAT } else { TIME_FORMAT };
    time.format(format).to_string()
}

/// Parses a timestamp in either wire format.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidTimestamp`] if the string matches neither
/// format.
pub fn parse_time(value: &str) -> Result<NaiveDateTime, ConfigError> {
    let trimmed = value.trim();
    let format = if has_millis(trimmed) {
        MS_TIME_FORMAT
    } else {
        TIME_FORMAT
    };

    NaiveDateTime::parse_from_str(trimmed, format).map_err(|_| ConfigError::InvalidTimestamp {
        value: value.to_string(),
    })
}

fn has_millis(value: &str) -> bool {
    value.rsplit_once('.').is_some_and(|(_, fraction)| {
        fraction.len() == 3 && fraction.chars().all(|c| c.is_ascii_digit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn sample() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 12, 31)
            .unwrap()
            .and_hms_milli_opt(23, 59, 58, 7)
            .unwrap()
    }

    #[test]
    fn test_format_time_without_millis_truncates() {
        assert_eq!(format_time(&sample(), false), "2023-12-31 23:59:58");
    }

    #[test]
    fn test_format_time_with_millis_pads_to_three_digits() {
        assert_eq!(format_time(&sample(), true), "2023-12-31 23:59:58.007");
    }

    #[test]
    fn test_parse_time_accepts_both_formats() {
        let parsed = parse_time("2023-12-31 23:59:58.007").unwrap();
        assert_eq!(parsed, sample());

        let parsed = parse_time("2023-12-31 23:59:58").unwrap();
        assert_eq!(parsed, sample().with_nanosecond(0).unwrap());
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        assert!(matches!(
            parse_time("31.12.2023"),
            Err(ConfigError::InvalidTimestamp { value }) if value == "31.12.2023"
        ));
        assert!(parse_time("").is_err());
    }
}
