//! Day/night terminator curve generation.
//!
//! Two interchangeable strategies produce the boundary of the night
//! hemisphere:
//!
//! - **Great-circle construction** (canonical): the terminator is exactly
//!   the geodesic circle of angular radius 90° around the antisolar point.
//!   Mathematically exact everywhere, including the equinoxes.
//! - **Parametric sampling**: one latitude per sampled longitude from
//!   `lat = atan(-cos(H_local) / tan(δ))`, closed into a hemisphere-covering
//!   polygon with the four map corners. Useful for surfaces that can only
//!   fill y-per-x paths; degenerate at `tan δ = 0` and guarded accordingly.
//!
//! Either way the result is a closed curve with no non-finite coordinates,
//! regenerated on each update cycle and never mutated in place.

use chrono::{DateTime, Timelike, Utc};

use super::solar::{GeoPoint, SolarPosition};
use super::normalize_longitude;
use crate::constants::{EQUINOX_DECLINATION_EPSILON, TERMINATOR_SAMPLES};

/// Which construction to use for the terminator curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminatorStrategy {
    /// Geodesic circle around the antisolar point (exact).
    #[default]
    GreatCircle,
    /// Per-longitude latitude sampling with corner closure.
    Parametric,
}

/// A closed curve bounding the night hemisphere, plus its center.
#[derive(Debug, Clone)]
pub struct TerminatorCurve {
    /// Ordered boundary points; the last point equals the first.
    pub points: Vec<GeoPoint>,
    /// The antisolar point, center of the night hemisphere.
    pub center: GeoPoint,
}

impl TerminatorCurve {
    /// Generate the terminator for a UTC instant using the given strategy.
    pub fn compute(instant: DateTime<Utc>, strategy: TerminatorStrategy) -> Self {
        let sun = SolarPosition::at(instant);
        Self::from_solar_position(instant, &sun, strategy)
    }

    /// Generate the terminator from an already-computed solar position.
    pub fn from_solar_position(
        instant: DateTime<Utc>,
        sun: &SolarPosition,
        strategy: TerminatorStrategy,
    ) -> Self {
        let points = match strategy {
            TerminatorStrategy::GreatCircle => great_circle_points(sun),
            TerminatorStrategy::Parametric => parametric_points(instant, sun),
        };

        Self {
            points,
            center: sun.antisolar_point(),
        }
    }

    /// True when the curve closes back onto its starting point.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }
}

/// True when the sun is below the horizon at `point`.
///
/// Hemisphere test against the subsolar point: the cosine of the angular
/// distance is negative exactly on the night side, zero on the terminator.
pub fn is_night(point: GeoPoint, sun: &SolarPosition) -> bool {
    let lat = point.lat.to_radians();
    let sub = &sun.subsolar_point;
    let sub_lat = sub.lat.to_radians();
    let dlng = (point.lng - sub.lng).to_radians();

    let cos_distance = lat.sin() * sub_lat.sin() + lat.cos() * sub_lat.cos() * dlng.cos();
    cos_distance < 0.0
}

/// Geodesic circle of angular radius 90° around the antisolar point.
///
/// Specialization of the spherical destination-point formula for distance
/// 90° (sin d = 1, cos d = 0), swept over all bearings at one sample per
/// degree and closed by repeating the first point.
fn great_circle_points(sun: &SolarPosition) -> Vec<GeoPoint> {
    let center = sun.antisolar_point();
    let center_lat = center.lat.to_radians();

    let mut points = Vec::with_capacity(TERMINATOR_SAMPLES);
    for step in 0..TERMINATOR_SAMPLES {
        let bearing = (step as f64).to_radians();

        let lat = (center_lat.cos() * bearing.cos()).asin();
        let lng_offset = (bearing.sin() * center_lat.cos()).atan2(-center_lat.sin() * lat.sin());

        points.push(GeoPoint::new(
            lat.to_degrees(),
            center.lng + lng_offset.to_degrees(),
        ));
    }

    // One sample per degree over 0..=360 already repeats the start bearing,
    // but floating point can leave the endpoints a hair apart; snap closed.
    if let Some(&first) = points.first() {
        if let Some(last) = points.last_mut() {
            *last = first;
        }
    }

    points
}

/// Per-longitude terminator latitude, closed with the four map corners.
///
/// For each sampled longitude, `lat = atan(-cos(H_local) / tan(δ))` where
/// `H_local = ((UTC_hours - 12) * 15 + longitude)`. The open curve plus the
/// corner points covers exactly one hemisphere when filled with a nonzero
/// winding rule.
fn parametric_points(instant: DateTime<Utc>, sun: &SolarPosition) -> Vec<GeoPoint> {
    let utc_hours = instant.hour() as f64
        + instant.minute() as f64 / 60.0
        + instant.second() as f64 / 3600.0;
    let delta = sun.declination.to_radians();
    let tan_delta = delta.tan();

    let mut points = Vec::with_capacity(TERMINATOR_SAMPLES + 5);
    for step in 0..TERMINATOR_SAMPLES {
        let longitude = step as f64 - 180.0;
        let h_local = ((utc_hours - 12.0) * 15.0 + longitude).to_radians();

        let lat = if sun.declination.abs() < EQUINOX_DECLINATION_EPSILON {
            // Equinox: the division blows up, but the limit is known. The
            // terminator degenerates to the meridian great circle; each
            // sampled longitude snaps to the nearer pole's state.
            if h_local.cos() >= 0.0 { -90.0 } else { 90.0 }
        } else {
            (-h_local.cos() / tan_delta).atan().to_degrees()
        };

        points.push(GeoPoint {
            lat: lat.clamp(-90.0, 90.0),
            lng: normalize_longitude(longitude),
        });
    }

    // Close into a hemisphere-covering polygon via the viewport corners
    let start = points[0];
    points.push(GeoPoint { lat: 90.0, lng: 180.0 });
    points.push(GeoPoint { lat: -90.0, lng: 180.0 });
    points.push(GeoPoint { lat: -90.0, lng: -180.0 });
    points.push(GeoPoint { lat: 90.0, lng: -180.0 });
    points.push(start);

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_source::parse_datetime;

    fn curve_at(s: &str, strategy: TerminatorStrategy) -> TerminatorCurve {
        TerminatorCurve::compute(parse_datetime(s).unwrap(), strategy)
    }

    fn assert_all_finite(curve: &TerminatorCurve) {
        for p in &curve.points {
            assert!(p.lat.is_finite() && p.lng.is_finite(), "non-finite {p:?}");
            assert!((-90.0..=90.0).contains(&p.lat), "latitude {p:?} out of range");
        }
    }

    #[test]
    fn great_circle_curve_closes_and_stays_finite() {
        for instant in [
            "2024-06-21 12:00:00",
            "2024-12-21 12:00:00",
            "2024-03-20 03:06:00", // equinox
            "2024-09-22 12:44:00", // equinox
        ] {
            let curve = curve_at(instant, TerminatorStrategy::GreatCircle);
            assert!(curve.is_closed(), "curve not closed at {instant}");
            assert_all_finite(&curve);
        }
    }

    #[test]
    fn parametric_curve_closes_and_stays_finite_at_equinox() {
        let curve = curve_at("2024-03-20 03:06:00", TerminatorStrategy::Parametric);
        assert!(curve.is_closed());
        assert_all_finite(&curve);
    }

    #[test]
    fn great_circle_points_are_90_degrees_from_center() {
        let curve = curve_at("2024-06-21 12:00:00", TerminatorStrategy::GreatCircle);
        let center_lat = curve.center.lat.to_radians();

        for p in &curve.points {
            let lat = p.lat.to_radians();
            let dlng = (p.lng - curve.center.lng).to_radians();
            let cos_distance =
                lat.sin() * center_lat.sin() + lat.cos() * center_lat.cos() * dlng.cos();
            assert!(
                cos_distance.abs() < 1e-6,
                "point {p:?} is not 90° from the antisolar center"
            );
        }
    }

    #[test]
    fn night_test_agrees_with_subsolar_point() {
        let instant = parse_datetime("2024-06-21 12:00:00").unwrap();
        let sun = SolarPosition::at(instant);

        // The subsolar point itself is in daylight, its antipode is not
        assert!(!is_night(sun.subsolar_point, &sun));
        assert!(is_night(sun.antisolar_point(), &sun));
    }

    #[test]
    fn june_solstice_polar_day_and_night() {
        let instant = parse_datetime("2024-06-21 12:00:00").unwrap();
        let sun = SolarPosition::at(instant);

        // Midnight sun at the north pole, polar night at the south pole
        assert!(!is_night(GeoPoint::new(89.9, 0.0), &sun));
        assert!(is_night(GeoPoint::new(-89.9, 0.0), &sun));
    }

    #[test]
    fn strategies_agree_away_from_the_poles() {
        // Sample the great-circle curve and check each mid-latitude point
        // lands within a degree of the parametric latitude for the same
        // longitude.
        let instant = parse_datetime("2024-06-21 12:00:00").unwrap();
        let sun = SolarPosition::at(instant);
        let gc = TerminatorCurve::from_solar_position(
            instant,
            &sun,
            TerminatorStrategy::GreatCircle,
        );

        let utc_hours = 12.0;
        let delta = sun.declination.to_radians();
        for p in gc.points.iter().filter(|p| p.lat.abs() < 60.0) {
            let h_local = ((utc_hours - 12.0) * 15.0 + p.lng).to_radians();
            let parametric_lat = (-h_local.cos() / delta.tan()).atan().to_degrees();
            assert!(
                (p.lat - parametric_lat).abs() < 1.0,
                "strategies diverge at lng {}: {} vs {}",
                p.lng,
                p.lat,
                parametric_lat
            );
        }
    }
}
