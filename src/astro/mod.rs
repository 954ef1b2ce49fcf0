//! Astronomical calculations: Julian dates, solar position, and the
//! day/night terminator.
//!
//! Everything in this module is pure arithmetic over a UTC instant. The
//! pipeline runs one direction: instant → Julian Date/GMST → solar position
//! → terminator curve. Projection and rendering live elsewhere and consume
//! these values without feeding anything back.

pub mod julian;
pub mod solar;
pub mod terminator;

pub use solar::{GeoPoint, SolarPosition};
pub use terminator::TerminatorCurve;

/// Normalize an angle in degrees to [0, 360).
pub(crate) fn normalize_degrees(angle: f64) -> f64 {
    let a = angle % 360.0;
    if a < 0.0 { a + 360.0 } else { a }
}

/// Normalize a longitude in degrees to (-180, 180].
pub(crate) fn normalize_longitude(lng: f64) -> f64 {
    let a = normalize_degrees(lng);
    if a > 180.0 { a - 360.0 } else { a }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrees_normalize_into_range() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
    }

    #[test]
    fn longitude_normalizes_to_half_open_range() {
        assert_eq!(normalize_longitude(180.0), 180.0);
        assert_eq!(normalize_longitude(-180.0), 180.0);
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-350.0), 10.0);
    }
}
