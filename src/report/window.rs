//! Calendar windows that restrict which transactions a report covers.

use time::{Date, Month, OffsetDateTime};

use crate::{Error, LocalTimezone};

/// A half-open interval of time `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// The first instant in the window.
    pub start: OffsetDateTime,
    /// The first instant after the window.
    pub end: OffsetDateTime,
}

/// Convert a month number (1 = January) into a [Month].
///
/// # Errors
/// Returns [Error::InvalidMonth] if `month` is outside 1-12.
pub fn parse_month(month: u8) -> Result<Month, Error> {
    Month::try_from(month).map_err(|_| Error::InvalidMonth(month))
}

/// The first day of `month` in `year`.
///
/// # Errors
/// Returns [Error::InvalidYear] if `year` cannot be represented.
fn first_day(year: i32, month: Month) -> Result<Date, Error> {
    Date::from_calendar_date(year, month, 1).map_err(|_| Error::InvalidYear(year))
}

fn next_year(year: i32) -> Result<i32, Error> {
    year.checked_add(1).ok_or(Error::InvalidYear(year))
}

/// The window from local midnight on the first of the month up to local
/// midnight on the first of the following month.
///
/// # Errors
/// Returns [Error::InvalidMonth] or [Error::InvalidYear] if the month cannot
/// be represented.
pub fn month_window(year: i32, month: u8, timezone: &LocalTimezone) -> Result<TimeWindow, Error> {
    let month = parse_month(month)?;
    let start = first_day(year, month)?;
    let end = match month {
        Month::December => first_day(next_year(year)?, Month::January),
        _ => first_day(year, month.next()),
    }
    .map_err(|_| Error::InvalidYear(year))?;

    Ok(TimeWindow {
        start: timezone.start_of_day(start),
        end: timezone.start_of_day(end),
    })
}

/// The window covering the whole of `year` on the local calendar.
///
/// # Errors
/// Returns [Error::InvalidYear] if the year cannot be represented.
pub fn year_window(year: i32, timezone: &LocalTimezone) -> Result<TimeWindow, Error> {
    let start = first_day(year, Month::January)?;
    let end = first_day(next_year(year)?, Month::January).map_err(|_| Error::InvalidYear(year))?;

    Ok(TimeWindow {
        start: timezone.start_of_day(start),
        end: timezone.start_of_day(end),
    })
}

/// The window for reports where the year and month are optional.
///
/// The result is restricted to a month only when both the year and month are
/// given, otherwise it covers all time and `None` is returned. A month or
/// year given on its own is still checked.
///
/// # Errors
/// Returns [Error::InvalidMonth] or [Error::InvalidYear] if a given value is
/// out of range.
pub fn optional_month_window(
    year: Option<i32>,
    month: Option<u8>,
    timezone: &LocalTimezone,
) -> Result<Option<TimeWindow>, Error> {
    match (year, month) {
        (Some(year), Some(month)) => month_window(year, month, timezone).map(Some),
        (Some(year), None) => first_day(year, Month::January).map(|_| None),
        (None, Some(month)) => parse_month(month).map(|_| None),
        (None, None) => Ok(None),
    }
}

/// The number of days in `month` of `year`, e.g. 29 for February 2024.
pub fn days_in_month(year: i32, month: Month) -> u8 {
    month.length(year)
}
