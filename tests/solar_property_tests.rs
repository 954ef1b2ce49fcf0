use chrono::{DateTime, Utc};
use proptest::prelude::*;
use terminatr::astro::solar::SolarPosition;
use terminatr::astro::terminator::{TerminatorCurve, TerminatorStrategy, is_night};
use terminatr::astro::{GeoPoint, julian};
use terminatr::map::projection::{Projection, ProjectionKind};

/// Generate valid latitude values
fn latitude_strategy() -> impl Strategy<Value = f64> {
    -90.0..=90.0
}

/// Generate valid longitude values
fn longitude_strategy() -> impl Strategy<Value = f64> {
    -180.0..=180.0
}

/// Generate instants across several decades (2000-01-01 to ~2050)
fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800i64..2_524_608_000i64).prop_map(|secs| {
        DateTime::from_timestamp(secs, 0).expect("timestamp range is valid")
    })
}

/// Angular distance between two points on the unit sphere, in degrees.
fn great_circle_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lng1) = (a.lat.to_radians(), a.lng.to_radians());
    let (lat2, lng2) = (b.lat.to_radians(), b.lng.to_radians());
    let cos_d =
        lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lng1 - lng2).cos();
    cos_d.clamp(-1.0, 1.0).acos().to_degrees()
}

mod solar_position_properties {
    use super::*;

    proptest! {
        /// Solar declination never leaves the obliquity band.
        #[test]
        fn declination_stays_within_obliquity(instant in instant_strategy()) {
            let sun = SolarPosition::at(instant);
            prop_assert!(sun.declination.abs() <= 23.5,
                "declination {} out of range at {instant}", sun.declination);
        }

        /// The subsolar point is always a valid coordinate.
        #[test]
        fn subsolar_point_is_valid(instant in instant_strategy()) {
            let sun = SolarPosition::at(instant);
            let p = sun.subsolar_point;
            prop_assert!(p.lat.is_finite() && p.lng.is_finite());
            prop_assert!(p.lat.abs() <= 90.0);
            prop_assert!(p.lng > -180.0 && p.lng <= 180.0);
        }

        /// Antisolar and subsolar points are antipodal.
        #[test]
        fn antisolar_point_is_antipodal(instant in instant_strategy()) {
            let sun = SolarPosition::at(instant);
            let distance = great_circle_distance(sun.subsolar_point, sun.antisolar_point());
            prop_assert!((distance - 180.0).abs() < 1e-6,
                "antipodal distance was {distance}");
        }

        /// GMST is always a normalized angle.
        #[test]
        fn gmst_is_normalized(instant in instant_strategy()) {
            let gmst = julian::gmst_degrees(instant);
            prop_assert!((0.0..360.0).contains(&gmst), "GMST {gmst} not normalized");
        }
    }
}

mod terminator_properties {
    use super::*;

    proptest! {
        /// Every great-circle terminator point sits 90 degrees from the
        /// antisolar center.
        #[test]
        fn terminator_points_are_ninety_degrees_from_center(instant in instant_strategy()) {
            let sun = SolarPosition::at(instant);
            let curve = TerminatorCurve::from_solar_position(
                instant, &sun, TerminatorStrategy::GreatCircle);

            for point in &curve.points {
                let distance = great_circle_distance(*point, curve.center);
                prop_assert!((distance - 90.0).abs() < 1e-6,
                    "point {point:?} is {distance} degrees from center");
            }
        }

        /// Both strategies yield closed, finite curves for any instant.
        #[test]
        fn curves_are_closed_and_finite(instant in instant_strategy()) {
            for strategy in [TerminatorStrategy::GreatCircle, TerminatorStrategy::Parametric] {
                let sun = SolarPosition::at(instant);
                let curve = TerminatorCurve::from_solar_position(instant, &sun, strategy);
                prop_assert!(curve.is_closed());
                for point in &curve.points {
                    prop_assert!(point.lat.is_finite() && point.lng.is_finite());
                    prop_assert!(point.lat.abs() <= 90.0);
                }
            }
        }

        /// The subsolar point is day, the antisolar point is night; the two
        /// hemispheres partition every coordinate.
        #[test]
        fn hemispheres_partition_the_globe(
            instant in instant_strategy(),
            lat in latitude_strategy(),
            lng in longitude_strategy()
        ) {
            let sun = SolarPosition::at(instant);
            prop_assert!(!is_night(sun.subsolar_point, &sun));
            prop_assert!(is_night(sun.antisolar_point(), &sun));

            let point = GeoPoint::new(lat, lng);
            let antipode = GeoPoint::new(-lat, lng + 180.0);
            let distance = great_circle_distance(point, sun.subsolar_point);
            // Away from the boundary, a point and its antipode disagree
            if (distance - 90.0).abs() > 0.5 {
                prop_assert_ne!(is_night(point, &sun), is_night(antipode, &sun));
            }
        }
    }
}

mod projection_properties {
    use super::*;

    proptest! {
        /// Equirectangular projection is total and lands inside the padded
        /// viewport for any valid coordinate.
        #[test]
        fn equirectangular_is_total(
            lat in latitude_strategy(),
            lng in longitude_strategy(),
            width in 40.0..4000.0f64
        ) {
            let projection = Projection::new(ProjectionKind::Equirectangular, width, width / 2.0);
            let (x, y) = projection.project(GeoPoint::new(lat, lng))
                .expect("equirectangular must be total over valid coordinates");
            prop_assert!(x.is_finite() && y.is_finite());
            prop_assert!((-1.0..=width + 1.0).contains(&x));
        }

        /// Mercator never produces a non-finite coordinate: it returns None
        /// instead.
        #[test]
        fn mercator_never_emits_non_finite(
            lat in latitude_strategy(),
            lng in longitude_strategy()
        ) {
            let projection = Projection::new(ProjectionKind::Mercator, 800.0, 400.0);
            if let Some((x, y)) = projection.project(GeoPoint::new(lat, lng)) {
                prop_assert!(x.is_finite() && y.is_finite());
            }
        }

        /// Projection is deterministic under reconfigure to the same size.
        #[test]
        fn reconfigure_is_stable(
            lat in latitude_strategy(),
            lng in longitude_strategy()
        ) {
            let mut projection = Projection::new(ProjectionKind::Equirectangular, 200.0, 100.0);
            let before = projection.project(GeoPoint::new(lat, lng));
            projection.reconfigure(200.0, 100.0);
            prop_assert_eq!(before, projection.project(GeoPoint::new(lat, lng)));
        }
    }
}
