//! Date grid and day-count helpers.
//!
//! The engine consumes any strictly increasing sequence of dates; it never builds
//! its own time axis. [`daily_grid`] produces the one most callers want: one entry
//! per calendar day for a number of 365-day years. Day differences use Rata Die
//! numbering so no `jiff::Span` is created in the hot loop.

use jiff::civil::Date;
use jiff::{Span, ToSpan};

use crate::error::RunError;

/// Length of a grid "year" in days. Leap days are not added back.
pub const DAYS_PER_YEAR: i64 = 365;

/// Every calendar day from `start` through `start + years * 365` days, inclusive.
///
/// Fails when the end date falls outside the supported calendar range.
pub fn daily_grid(start: Date, years: usize) -> Result<Vec<Date>, RunError> {
    let end = i64::try_from(years)
        .ok()
        .and_then(|years| years.checked_mul(DAYS_PER_YEAR))
        .and_then(|days| Span::new().try_days(days).ok())
        .and_then(|span| start.checked_add(span).ok())
        .ok_or(RunError::HorizonOutOfRange { start, years })?;
    Ok(date_range(start, end))
}

/// Every calendar day in `[start, end]`. Empty when `end < start`.
pub fn date_range(start: Date, end: Date) -> Vec<Date> {
    if end < start {
        return Vec::new();
    }
    start.series(1.day()).take_while(|d| *d <= end).collect()
}

/// Returns the first pair `(previous, next)` that breaks strict ordering, if any.
pub fn first_non_ascending(dates: &[Date]) -> Option<(Date, Date)> {
    dates
        .windows(2)
        .find(|pair| pair[0] >= pair[1])
        .map(|pair| (pair[0], pair[1]))
}

/// Convert a civil date to a Rata Die day number (days since 0001-01-01).
#[inline]
fn rata_die(d: Date) -> i32 {
    let y = d.year() as i32;
    let m = d.month() as i32;
    let day = d.day() as i32;

    // March-based year so February's length never matters mid-formula
    let a = (14 - m) / 12;
    let y2 = y - a;
    let m2 = m + 12 * a - 3;

    day + (153 * m2 + 2) / 5 + 365 * y2 + y2 / 4 - y2 / 100 + y2 / 400 - 306
}

/// Number of days from `d1` to `d2` (negative when `d2 < d1`).
#[inline]
pub fn days_between(d1: Date, d2: Date) -> i32 {
    rata_die(d2) - rata_die(d1)
}
