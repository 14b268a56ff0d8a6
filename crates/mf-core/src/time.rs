//! Calendar timestamps and the archive's hourly time axis.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{CoreError, CoreResult};

pub const SECONDS_PER_HOUR: i64 = 3600;

const UNITS_MARKER: &str = "hours since";

const DATE_TIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 style timestamp.
///
/// Accepts `T` or space between date and time, minute or second precision,
/// fractional seconds, and a bare date (interpreted as midnight).
pub fn parse_timestamp(value: &str) -> CoreResult<NaiveDateTime> {
    let trimmed = value.trim();
    for format in DATE_TIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(t);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| CoreError::InvalidTimestamp {
            value: value.to_string(),
        })
}

/// Whole hours from `from` to `to`, rounded toward negative infinity.
pub fn floor_hours_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to - from).num_seconds().div_euclid(SECONDS_PER_HOUR)
}

/// Hourly time axis declared by an archive's `units` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAxis {
    origin: NaiveDateTime,
}

impl TimeAxis {
    pub fn new(origin: NaiveDateTime) -> Self {
        Self { origin }
    }

    /// Parse a units string of the form `"hours since <timestamp>"`.
    ///
    /// Any other base unit (seconds, days, ...) is rejected with
    /// [`CoreError::UnsupportedUnits`]; an unreadable origin after the
    /// marker is [`CoreError::InvalidTimestamp`].
    pub fn parse(units: &str) -> CoreResult<Self> {
        let (_, rest) = units
            .split_once(UNITS_MARKER)
            .ok_or_else(|| CoreError::UnsupportedUnits {
                units: units.to_string(),
            })?;
        let rest = rest.trim();
        let stamp = rest
            .strip_suffix("UTC")
            .or_else(|| rest.strip_suffix('Z'))
            .unwrap_or(rest);

        let origin = parse_timestamp(stamp)?;
        Ok(Self { origin })
    }

    pub fn origin(&self) -> NaiveDateTime {
        self.origin
    }

    /// Row offset of `t` on this axis (may be negative if `t` precedes the origin).
    pub fn hour_offset(&self, t: NaiveDateTime) -> i64 {
        floor_hours_between(self.origin, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn parses_t_and_space_separators() {
        assert_eq!(ts("2007-01-01T05:00:00"), ts("2007-01-01 05:00:00"));
    }

    #[test]
    fn bare_date_is_midnight() {
        assert_eq!(ts("2007-01-01"), ts("2007-01-01T00:00:00"));
    }

    #[test]
    fn garbage_timestamp_fails() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert!(matches!(err, CoreError::InvalidTimestamp { .. }));
    }

    #[test]
    fn axis_parses_hours_since() {
        let axis = TimeAxis::parse("hours since 2007-01-01T00:00:00").unwrap();
        assert_eq!(axis.origin(), ts("2007-01-01T00:00:00"));
        assert_eq!(axis.hour_offset(ts("2007-01-01T05:00:00")), 5);
        assert_eq!(axis.hour_offset(ts("2007-01-10T05:00:00")), 221);
    }

    #[test]
    fn axis_accepts_utc_suffix() {
        let axis = TimeAxis::parse("hours since 2007-01-01 00:00:00 UTC").unwrap();
        assert_eq!(axis.origin(), ts("2007-01-01T00:00:00"));
    }

    #[test]
    fn minute_precision_and_fractional_seconds() {
        assert_eq!(ts("2007-01-01 05:00"), ts("2007-01-01T05:00:00"));
        assert_eq!(ts("2007-01-01T05:00"), ts("2007-01-01T05:00:00"));
        assert_eq!(ts("2007-01-01 05:00:00.0"), ts("2007-01-01T05:00:00"));
        assert_eq!(
            ts("2007-01-01T05:00:00.5"),
            ts("2007-01-01T05:00:00") + chrono::Duration::milliseconds(500)
        );
    }

    #[test]
    fn axis_accepts_cf_style_origins() {
        for units in [
            "hours since 2007-01-01 00:00:00.0",
            "hours since 2007-01-01 00:00",
            "hours since 2007-01-01T00:00Z",
        ] {
            let axis = TimeAxis::parse(units).unwrap();
            assert_eq!(axis.origin(), ts("2007-01-01T00:00:00"), "{units}");
        }
    }

    #[test]
    fn unreadable_origin_is_invalid_timestamp() {
        let err = TimeAxis::parse("hours since the beginning").unwrap_err();
        assert!(matches!(err, CoreError::InvalidTimestamp { .. }));
    }

    #[test]
    fn axis_rejects_other_units() {
        for units in ["seconds since 2007-01-01T00:00:00", "days since 2007-01-01", "hours"] {
            let err = TimeAxis::parse(units).unwrap_err();
            assert!(matches!(err, CoreError::UnsupportedUnits { .. }), "{units}");
        }
    }

    #[test]
    fn partial_hours_round_down() {
        let axis = TimeAxis::new(ts("2007-01-01T00:00:00"));
        assert_eq!(axis.hour_offset(ts("2007-01-01T05:59:59")), 5);
        // Before the origin, floor moves away from zero.
        assert_eq!(axis.hour_offset(ts("2006-12-31T23:30:00")), -1);
    }
}
