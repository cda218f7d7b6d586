//! Julian day conversions for handing instants to the ephemeris.

use chrono::{DateTime, TimeZone, Utc};

/// Julian day of the Unix epoch.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Convert UTC datetime to Julian Day
pub fn julian_day(dt: DateTime<Utc>) -> f64 {
    dt.timestamp_millis() as f64 / MILLIS_PER_DAY + UNIX_EPOCH_JD
}

/// Convert Julian Day to UTC datetime, at millisecond resolution.
pub fn datetime_from_julian_day(jd: f64) -> Option<DateTime<Utc>> {
    if !jd.is_finite() {
        return None;
    }
    let millis = ((jd - UNIX_EPOCH_JD) * MILLIS_PER_DAY).round() as i64;
    Utc.timestamp_millis_opt(millis).single()
}
