//! Weeks and hours available before a deadline.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Lower bound on `weeks_available`, applied however close or past the
/// deadline is.
pub const MIN_WEEKS: u32 = 4;

/// Upper bound on `weeks_available`; the value is stored as a Postgres
/// `INTEGER`.
pub const MAX_WEEKS: u32 = i32::MAX as u32;

const MILLIS_PER_WEEK: i64 = 7 * 24 * 60 * 60 * 1000;

/// The time budget derived from a deadline and a weekly commitment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Availability {
    pub weeks: u32,
    pub achievable_hours: f64,
}

impl Availability {
    /// Compute `weeks = max(floor((target - now) / 7 days), 4)` and
    /// `achievable_hours = weeks * hours_per_week`.
    pub fn compute(target: DateTime<Utc>, hours_per_week: f64, now: DateTime<Utc>) -> Self {
        let weeks = weeks_until(target, now);
        Self {
            weeks,
            achievable_hours: f64::from(weeks) * hours_per_week,
        }
    }
}

/// Whole weeks from `now` until `target`, within [`MIN_WEEKS`]..=[`MAX_WEEKS`].
pub fn weeks_until(target: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let millis = (target - now).num_milliseconds();
    let whole = millis
        .div_euclid(MILLIS_PER_WEEK)
        .clamp(i64::from(MIN_WEEKS), i64::from(MAX_WEEKS));
    u32::try_from(whole).unwrap_or(MAX_WEEKS)
}

/// The `index`-th sequential weekly window starting at `now`, as
/// `(start_date, target_date)`.
pub fn week_window(now: DateTime<Utc>, index: usize) -> (NaiveDate, NaiveDate) {
    let index = i64::try_from(index).unwrap_or(i64::MAX / 2);
    let start = now + Duration::weeks(index);
    let end = now + Duration::weeks(index + 1);
    (start.date_naive(), end.date_naive())
}
