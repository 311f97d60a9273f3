use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::error::DataError;

/// Datetime layouts accepted in CF `since` clauses and JSON time arrays.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601-ish timestamp; a bare date means midnight.
/// A trailing `Z` or ` UTC` is accepted and ignored.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    let text = text
        .strip_suffix('Z')
        .or_else(|| text.strip_suffix(" UTC"))
        .unwrap_or(text)
        .trim();

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Decoded CF time units, e.g. `hours since 1900-01-01 00:00:00.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeUnits {
    /// Length of one step in milliseconds.
    pub step_ms: f64,
    pub epoch: NaiveDateTime,
}

impl TimeUnits {
    pub fn parse(units: &str) -> Result<Self, DataError> {
        let unsupported = || DataError::UnsupportedTimeUnits(units.to_string());

        let (step, epoch) = units.split_once(" since ").ok_or_else(unsupported)?;
        let step_ms = match step.trim().to_ascii_lowercase().as_str() {
            "milliseconds" | "millisecond" => 1.0,
            "seconds" | "second" | "secs" | "s" => 1_000.0,
            "minutes" | "minute" | "mins" => 60_000.0,
            "hours" | "hour" | "hrs" | "h" => 3_600_000.0,
            "days" | "day" | "d" => 86_400_000.0,
            _ => return Err(unsupported()),
        };
        let epoch = parse_datetime(epoch).ok_or_else(unsupported)?;
        Ok(Self { step_ms, epoch })
    }

    /// Timestamp `offset` steps after the epoch. Non-finite offsets and
    /// offsets beyond chrono's range are errors.
    pub fn decode(&self, offset: f64) -> Result<NaiveDateTime, DataError> {
        let ms = (offset * self.step_ms).round();
        if !ms.is_finite() || ms.abs() >= i64::MAX as f64 {
            return Err(DataError::TimeOutOfRange(offset));
        }
        Duration::try_milliseconds(ms as i64)
            .and_then(|d| self.epoch.checked_add_signed(d))
            .ok_or(DataError::TimeOutOfRange(offset))
    }
}

/// Convert raw offsets into timestamps using a CF units string.
pub fn decode_times(offsets: &[f64], units: &str) -> Result<Vec<NaiveDateTime>, DataError> {
    let units = TimeUnits::parse(units)?;
    offsets.iter().map(|&o| units.decode(o)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|d| d.and_hms_opt(h, 0, 0))
            .unwrap()
    }

    #[test]
    fn legacy_era5_hours_since_1900() {
        // 2010-01-01T00:00 is 964 248 hours after 1900-01-01.
        let times = decode_times(&[964_248.0, 964_254.0], "hours since 1900-01-01 00:00:00.0").unwrap();
        assert_eq!(times, vec![dt(2010, 1, 1, 0), dt(2010, 1, 1, 6)]);
    }

    #[test]
    fn current_cds_seconds_since_epoch() {
        let times = decode_times(&[1_262_304_000.0], "seconds since 1970-01-01").unwrap();
        assert_eq!(times, vec![dt(2010, 1, 1, 0)]);
    }

    #[test]
    fn fractional_days() {
        let times = decode_times(&[0.5], "days since 2012-12-31T00:00:00Z").unwrap();
        assert_eq!(times, vec![dt(2012, 12, 31, 12)]);
    }

    #[test]
    fn rejects_unknown_units() {
        assert_eq!(
            decode_times(&[1.0], "fortnights since 2000-01-01").unwrap_err(),
            DataError::UnsupportedTimeUnits("fortnights since 2000-01-01".into())
        );
        assert!(TimeUnits::parse("hours").is_err());
        assert!(TimeUnits::parse("hours since yesterday").is_err());
    }

    #[test]
    fn fill_value_offset_is_an_error_not_a_panic() {
        let fill = 9.969_209_968_386_869e36;
        assert_eq!(
            decode_times(&[0.0, fill], "seconds since 1970-01-01").unwrap_err(),
            DataError::TimeOutOfRange(fill)
        );
    }

    #[test]
    fn nan_offset_is_rejected() {
        let err = decode_times(&[f64::NAN], "hours since 1900-01-01").unwrap_err();
        assert!(matches!(err, DataError::TimeOutOfRange(v) if v.is_nan()));
    }

    #[test]
    fn offset_just_past_chrono_range_is_rejected() {
        // ~300 000 years of days overflows NaiveDateTime but not i64 milliseconds.
        let units = TimeUnits::parse("days since 2000-01-01").unwrap();
        assert!(units.decode(1.0e8).is_err());
        assert_eq!(units.decode(1.0).unwrap(), dt(2000, 1, 2, 0));
    }

    #[test]
    fn parses_json_timestamps() {
        assert_eq!(parse_datetime("2011-06-01"), Some(dt(2011, 6, 1, 0)));
        assert_eq!(parse_datetime("2011-06-01T18:00:00"), Some(dt(2011, 6, 1, 18)));
        assert_eq!(parse_datetime("2011-06-01 18:00"), Some(dt(2011, 6, 1, 18)));
        assert_eq!(parse_datetime("June 1st"), None);
    }
}
