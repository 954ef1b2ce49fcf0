//! UTC to Julian Date and Greenwich Mean Sidereal Time conversion.
//!
//! Uses the standard Gregorian-to-Julian day number formula and the IAU
//! GMST polynomial. Both functions are total: every valid calendar instant
//! produces a finite result, with no error paths.

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Days per Julian century.
const DAYS_PER_CENTURY: f64 = 36525.0;

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00 TT, close enough to
/// UTC for this approximation).
pub const J2000: f64 = 2451545.0;

/// Ratio of sidereal to solar time.
const SIDEREAL_RATE: f64 = 1.002737909;

/// Convert a UTC instant to Julian Date (fractional days).
///
/// `JD = 367Y - floor(7(Y + floor((M+9)/12))/4) + floor(275M/9) + D
///       + 1721013.5 + day_fraction`
pub fn julian_date(instant: DateTime<Utc>) -> f64 {
    let year = instant.year() as f64;
    let month = instant.month() as f64;
    let day = instant.day() as f64;

    367.0 * year - (7.0 * (year + ((month + 9.0) / 12.0).floor()) / 4.0).floor()
        + (275.0 * month / 9.0).floor()
        + day
        + 1721013.5
        + ut_hours(instant) / 24.0
}

/// Greenwich Mean Sidereal Time in degrees, normalized to [0, 360).
///
/// Evaluated from the GMST-at-0h polynomial in Julian centuries since
/// J2000.0, plus the sidereal-rate-corrected UT contribution.
pub fn gmst_degrees(instant: DateTime<Utc>) -> f64 {
    let jd = julian_date(instant);
    // Julian date at the preceding 0h UTC
    let jd0 = (jd - 0.5).floor() + 0.5;
    let t = (jd0 - J2000) / DAYS_PER_CENTURY;

    let gmst0 =
        100.46061837 + 36000.770053608 * t + 0.000387933 * t * t - (t * t * t) / 38710000.0;
    let gmst = gmst0 + 15.0 * ut_hours(instant) * SIDEREAL_RATE;

    super::normalize_degrees(gmst)
}

/// Fractional UT hours since the preceding UTC midnight.
fn ut_hours(instant: DateTime<Utc>) -> f64 {
    instant.hour() as f64
        + instant.minute() as f64 / 60.0
        + instant.second() as f64 / 3600.0
        + instant.nanosecond() as f64 / 3.6e12
}
