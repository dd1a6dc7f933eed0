//! Conversions between instants and the configured local calendar.

use std::fmt::Debug;

use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};
use time_tz::{Offset, TimeZone, Tz, timezones};

use crate::Error;

/// A canonical IANA time zone, e.g. "Pacific/Auckland".
///
/// Report windows and buckets are computed on the calendar of this zone.
#[derive(Clone)]
pub struct LocalTimezone {
    name: String,
    /// `None` is UTC.
    tz: Option<&'static Tz>,
}

impl LocalTimezone {
    /// Look up a time zone by its canonical name.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if `canonical_timezone` is not a known time zone.
    pub fn new(canonical_timezone: &str) -> Result<Self, Error> {
        let tz = timezones::get_by_name(canonical_timezone)
            .ok_or_else(|| Error::InvalidTimezone(canonical_timezone.to_owned()))?;

        Ok(Self {
            name: canonical_timezone.to_owned(),
            tz: Some(tz),
        })
    }

    /// Coordinated Universal Time.
    pub fn utc() -> Self {
        Self {
            name: "Etc/UTC".to_owned(),
            tz: None,
        }
    }

    /// The canonical name of the time zone.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The UTC offset in effect at `instant`.
    pub fn offset_at(&self, instant: OffsetDateTime) -> UtcOffset {
        match self.tz {
            Some(tz) => tz.get_offset_utc(&instant).to_utc(),
            None => UtcOffset::UTC,
        }
    }

    /// Express `instant` in local time.
    pub fn to_local(&self, instant: OffsetDateTime) -> OffsetDateTime {
        instant.to_offset(self.offset_at(instant))
    }

    /// The first instant of `date` on the local calendar.
    pub fn start_of_day(&self, date: Date) -> OffsetDateTime {
        let midnight = PrimitiveDateTime::new(date, Time::MIDNIGHT);
        // The offset can change between UTC midnight and local midnight, so
        // look it up again at the first guess.
        let first_guess = midnight.assume_offset(self.offset_at(midnight.assume_utc()));

        midnight.assume_offset(self.offset_at(first_guess))
    }

    /// Today's date on the local calendar.
    pub fn today(&self) -> Date {
        self.to_local(OffsetDateTime::now_utc()).date()
    }
}

impl Debug for LocalTimezone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LocalTimezone").field(&self.name).finish()
    }
}
