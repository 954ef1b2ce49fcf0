//! Low-order solar position: declination, right ascension, hour angle, and
//! the subsolar point.
//!
//! This is the NOAA-style low-order approximation (good to a few hundredths
//! of a degree over decades around J2000), which is far below one terminal
//! cell of error on any viewport. The formulas are continuous across
//! solstices and equinoxes; no instant needs special-casing here.

use chrono::{DateTime, Utc};

use super::julian::{J2000, gmst_degrees, julian_date};
use super::{normalize_degrees, normalize_longitude};

/// A geographic coordinate in degrees.
///
/// Latitude in [-90, 90], longitude in (-180, 180].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng: normalize_longitude(lng),
        }
    }
}

/// The sun's position for one instant, all angles in degrees.
#[derive(Debug, Clone, Copy)]
pub struct SolarPosition {
    /// Angular distance north/south of the celestial equator.
    pub declination: f64,
    /// Right ascension measured along the celestial equator.
    pub right_ascension: f64,
    /// GMST minus right ascension; equivalently the subsolar longitude
    /// before normalization.
    pub hour_angle: f64,
    /// Point on Earth where the sun is at zenith.
    pub subsolar_point: GeoPoint,
}

impl SolarPosition {
    /// Compute the solar position for a UTC instant.
    pub fn at(instant: DateTime<Utc>) -> Self {
        let n = julian_date(instant) - J2000;

        // Mean longitude and mean anomaly of the sun
        let mean_longitude = normalize_degrees(280.460 + 0.9856474 * n);
        let mean_anomaly = normalize_degrees(357.528 + 0.9856003 * n);

        // Ecliptic longitude with the two largest periodic corrections
        let g = mean_anomaly.to_radians();
        let ecliptic_longitude =
            normalize_degrees(mean_longitude + 1.915 * g.sin() + 0.020 * (2.0 * g).sin());

        // Obliquity of the ecliptic, slowly decreasing
        let obliquity = 23.439 - 0.0000004 * n;

        let eps = obliquity.to_radians();
        let lambda = ecliptic_longitude.to_radians();

        let declination = (eps.sin() * lambda.sin()).asin().to_degrees();
        let right_ascension = (eps.cos() * lambda.sin()).atan2(lambda.cos()).to_degrees();

        let hour_angle = gmst_degrees(instant) - right_ascension;

        Self {
            declination,
            right_ascension,
            hour_angle,
            subsolar_point: GeoPoint::new(declination, hour_angle),
        }
    }

    /// The point diametrically opposite the subsolar point; center of the
    /// night hemisphere.
    pub fn antisolar_point(&self) -> GeoPoint {
        GeoPoint::new(-self.declination, self.subsolar_point.lng + 180.0)
    }
}
