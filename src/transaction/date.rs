//! Parsing, storing and formatting transaction dates.
//!
//! Dates are stored as milliseconds since the Unix epoch so that range
//! queries compare integers.

use serde::Serializer;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::Error;

/// Which end of the day a bare `yyyy-mm-dd` date is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBound {
    /// 00:00:00.000 UTC.
    Start,
    /// 23:59:59.999 UTC.
    End,
}

/// Parse a date given either as a bare calendar date or a full timestamp.
///
/// Bare dates (`yyyy-mm-dd`) are anchored in UTC according to `bound`,
/// timestamps (RFC 3339) are used as given. The result is truncated to
/// millisecond precision.
///
/// # Errors
/// Returns [Error::InvalidDate] if `raw` matches neither format.
pub fn parse_date_input(raw: &str, bound: DayBound) -> Result<OffsetDateTime, Error> {
    let raw = raw.trim();
    let calendar_date = format_description!("[year]-[month]-[day]");

    let instant = if let Ok(date) = Date::parse(raw, &calendar_date) {
        anchor_date(date, bound)
    } else {
        OffsetDateTime::parse(raw, &Rfc3339).map_err(|_| Error::InvalidDate(raw.to_owned()))?
    };

    from_unix_millis(to_unix_millis(instant)).ok_or_else(|| Error::InvalidDate(raw.to_owned()))
}

/// The current instant at millisecond precision.
pub fn now() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();

    from_unix_millis(to_unix_millis(now)).unwrap_or(now)
}

fn anchor_date(date: Date, bound: DayBound) -> OffsetDateTime {
    let time = match bound {
        DayBound::Start => Time::MIDNIGHT,
        DayBound::End => time::macros::time!(23:59:59.999),
    };

    PrimitiveDateTime::new(date, time).assume_utc()
}

/// Milliseconds since the Unix epoch, rounded towards negative infinity.
pub fn to_unix_millis(instant: OffsetDateTime) -> i64 {
    instant.unix_timestamp_nanos().div_euclid(1_000_000) as i64
}

/// The UTC instant `millis` milliseconds after the Unix epoch.
///
/// Returns `None` if the instant is outside of the range supported by [time].
pub fn from_unix_millis(millis: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
}

/// Format an instant the way it is sent to clients, e.g. `2024-03-15T00:00:00.000Z`.
pub fn format_timestamp(instant: OffsetDateTime) -> String {
    let format = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    );

    instant
        .to_offset(time::UtcOffset::UTC)
        .format(&format)
        .unwrap_or_else(|_| instant.to_string())
}

/// Serialize an instant with [format_timestamp].
pub fn serialize_timestamp<S: Serializer>(
    instant: &OffsetDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(*instant))
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::Error;

    use super::{DayBound, format_timestamp, from_unix_millis, parse_date_input, to_unix_millis};

    #[test]
    fn bare_date_anchors_to_start_of_day() {
        let got = parse_date_input("2024-03-15", DayBound::Start);

        assert_eq!(got, Ok(datetime!(2024-03-15 00:00 UTC)));
    }

    #[test]
    fn bare_date_anchors_to_end_of_day() {
        let got = parse_date_input("2024-03-15", DayBound::End);

        assert_eq!(got, Ok(datetime!(2024-03-15 23:59:59.999 UTC)));
    }

    #[test]
    fn timestamp_is_used_verbatim() {
        let got = parse_date_input("2024-03-15T10:30:00+13:00", DayBound::End);

        assert_eq!(got, Ok(datetime!(2024-03-14 21:30 UTC)));
    }

    #[test]
    fn timestamp_is_truncated_to_milliseconds() {
        let got = parse_date_input("2024-03-15T10:30:00.123456789Z", DayBound::Start);

        assert_eq!(got, Ok(datetime!(2024-03-15 10:30:00.123 UTC)));
    }

    #[test]
    fn rejects_malformed_dates() {
        for raw in ["15/03/2024", "2024-13-01", "2024-02-30", "yesterday", ""] {
            assert_eq!(
                parse_date_input(raw, DayBound::Start),
                Err(Error::InvalidDate(raw.to_owned())),
                "want {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn millis_conversion_handles_dates_before_epoch() {
        let instant = datetime!(1969-12-31 23:59:59.999 UTC);

        let millis = to_unix_millis(instant);

        assert_eq!(millis, -1);
        assert_eq!(from_unix_millis(millis), Some(instant));
    }

    #[test]
    fn formats_as_utc_with_milliseconds() {
        let formatted = format_timestamp(datetime!(2024-03-15 12:00 +12:00));

        assert_eq!(formatted, "2024-03-15T00:00:00.000Z");
    }
}
