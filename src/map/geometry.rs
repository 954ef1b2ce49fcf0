//! World boundary geometry: GeoJSON loading with an embedded fallback.
//!
//! The boundary dataset is an external collaborator; this module treats it
//! as opaque polylines to be projected and stroked. A `--geometry` GeoJSON
//! file is parsed when given; a malformed or missing file is logged and the
//! coarse built-in coastline outlines take over, so the terminator and
//! markers keep working regardless (boundary rendering is never load-bearing).

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::astro::GeoPoint;

/// World boundaries as a set of closed outlines in geographic coordinates.
#[derive(Debug, Clone)]
pub struct WorldGeometry {
    pub outlines: Vec<Vec<GeoPoint>>,
}

impl WorldGeometry {
    /// Load boundaries from a GeoJSON file, or fall back to the embedded
    /// outlines when no path is given or the file cannot be used.
    pub fn load(path: Option<&Path>) -> Self {
        match path {
            Some(path) => match load_geojson(path) {
                Ok(geometry) => {
                    log_decorated!(
                        "Loaded {} boundary outlines from {}",
                        geometry.outlines.len(),
                        path.display()
                    );
                    geometry
                }
                Err(e) => {
                    log_pipe!();
                    log_warning!("Could not load boundary geometry: {e:#}");
                    log_indented!("Falling back to built-in coastline outlines");
                    Self::builtin()
                }
            },
            None => Self::builtin(),
        }
    }

    /// The embedded coarse continent outlines.
    pub fn builtin() -> Self {
        Self {
            outlines: CONTINENT_OUTLINES
                .iter()
                .map(|outline| {
                    outline
                        .iter()
                        .map(|&(lat, lng)| GeoPoint::new(lat, lng))
                        .collect()
                })
                .collect(),
        }
    }
}

/// Parse a GeoJSON FeatureCollection (or bare geometry) into outlines.
///
/// Only exterior rings of Polygon/MultiPolygon geometries are kept; holes
/// and other geometry types are skipped. The format is a collaborator's
/// concern, so unknown structure is an error, not a panic.
fn load_geojson(path: &Path) -> Result<WorldGeometry> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let json: Value = serde_json::from_str(&raw).context("geometry file is not valid JSON")?;

    let mut outlines = Vec::new();
    collect_geometries(&json, &mut outlines)?;

    if outlines.is_empty() {
        bail!("geometry file contains no polygon features");
    }
    Ok(WorldGeometry { outlines })
}

fn collect_geometries(value: &Value, outlines: &mut Vec<Vec<GeoPoint>>) -> Result<()> {
    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            let features = value
                .get("features")
                .and_then(Value::as_array)
                .context("FeatureCollection has no features array")?;
            for feature in features {
                if let Some(geometry) = feature.get("geometry") {
                    // One bad feature must not take out the rest
                    if collect_geometries(geometry, outlines).is_err() {
                        continue;
                    }
                }
            }
            Ok(())
        }
        Some("Feature") => match value.get("geometry") {
            Some(geometry) => collect_geometries(geometry, outlines),
            None => Ok(()),
        },
        Some("Polygon") => {
            if let Some(rings) = value.get("coordinates").and_then(Value::as_array) {
                if let Some(exterior) = rings.first() {
                    outlines.push(parse_ring(exterior)?);
                }
            }
            Ok(())
        }
        Some("MultiPolygon") => {
            if let Some(polygons) = value.get("coordinates").and_then(Value::as_array) {
                for rings in polygons {
                    if let Some(exterior) = rings.as_array().and_then(|r| r.first()) {
                        outlines.push(parse_ring(exterior)?);
                    }
                }
            }
            Ok(())
        }
        Some(other) => bail!("unsupported geometry type: {other}"),
        None => bail!("geometry object has no type field"),
    }
}

fn parse_ring(ring: &Value) -> Result<Vec<GeoPoint>> {
    let positions = ring.as_array().context("ring is not an array")?;
    let mut points = Vec::with_capacity(positions.len());

    for position in positions {
        let pair = position.as_array().context("position is not an array")?;
        // GeoJSON positions are [lng, lat]
        let lng = pair.first().and_then(Value::as_f64).context("missing longitude")?;
        let lat = pair.get(1).and_then(Value::as_f64).context("missing latitude")?;
        if !lat.is_finite() || !lng.is_finite() || lat.abs() > 90.0 {
            bail!("position out of range: [{lng}, {lat}]");
        }
        points.push(GeoPoint::new(lat, lng));
    }
    Ok(points)
}

/// Coarse continent outlines as (lat, lng) pairs, each closed on its first
/// point. Enough to orient the eye on an 80-column map; real boundary data
/// comes from `--geometry`.
const CONTINENT_OUTLINES: &[&[(f64, f64)]] = &[
    // North America
    &[
        (71.0, -156.0), (69.0, -129.0), (72.0, -96.0), (66.0, -82.0), (62.0, -78.0),
        (58.0, -94.0), (52.0, -80.0), (60.0, -64.0), (52.0, -56.0), (47.0, -65.0),
        (44.0, -68.0), (35.0, -76.0), (25.5, -80.0), (29.5, -84.0), (29.0, -95.0),
        (21.0, -97.0), (16.0, -95.0), (9.5, -84.0), (8.0, -77.0), (9.0, -81.5),
        (17.0, -101.0), (23.0, -110.0), (32.5, -117.0), (40.0, -124.0), (48.5, -125.0),
        (59.0, -139.0), (61.0, -150.0), (55.0, -162.0), (65.0, -168.0), (71.0, -156.0),
    ],
    // South America
    &[
        (11.0, -74.5), (10.5, -62.0), (5.0, -52.0), (-2.0, -44.0), (-7.0, -35.0),
        (-13.0, -38.5), (-23.0, -42.0), (-28.5, -48.5), (-34.5, -54.0), (-39.0, -62.0),
        (-46.0, -67.0), (-54.0, -68.5), (-53.0, -73.0), (-46.5, -75.5), (-37.0, -73.5),
        (-23.0, -70.5), (-14.0, -76.0), (-5.0, -81.0), (1.0, -79.0), (9.0, -77.0),
        (11.0, -74.5),
    ],
    // Europe
    &[
        (71.0, 27.0), (68.0, 14.0), (62.0, 5.0), (58.0, 7.0), (55.0, 8.5),
        (53.5, 5.0), (48.5, -4.5), (43.5, -2.0), (43.5, -9.0), (37.0, -9.0),
        (36.0, -5.5), (38.5, 0.0), (42.5, 3.0), (43.5, 10.0), (40.5, 18.5),
        (38.0, 16.0), (45.5, 13.5), (42.5, 27.5), (41.0, 29.0), (46.5, 30.5),
        (44.5, 34.0), (47.0, 39.0), (43.0, 48.0), (48.5, 44.5), (60.0, 30.0),
        (66.0, 34.0), (69.5, 33.0), (71.0, 27.0),
    ],
    // Africa
    &[
        (37.0, 10.0), (33.0, 22.0), (31.5, 32.0), (11.5, 43.5), (12.0, 51.0),
        (0.0, 42.5), (-10.0, 40.5), (-20.0, 35.0), (-26.0, 32.5), (-34.5, 20.0),
        (-33.0, 17.5), (-22.5, 14.5), (-12.0, 13.5), (-6.0, 12.0), (4.0, 9.5),
        (6.0, 3.0), (4.5, -7.5), (7.5, -13.0), (14.5, -17.0), (21.0, -17.0),
        (28.0, -11.5), (33.0, -8.5), (36.0, -6.0), (35.5, -1.0), (37.0, 10.0),
    ],
    // Asia
    &[
        (69.5, 33.0), (66.0, 34.0), (60.0, 30.0), (48.5, 44.5), (43.0, 48.0),
        (40.0, 52.5), (37.0, 44.0), (36.5, 36.0), (30.0, 32.5), (12.5, 43.5),
        (16.0, 53.0), (22.5, 59.5), (25.0, 57.0), (30.0, 49.0), (24.0, 67.0),
        (21.0, 72.5), (8.0, 77.5), (13.5, 80.5), (22.0, 89.0), (16.0, 94.5),
        (1.5, 103.5), (10.5, 107.0), (21.5, 108.0), (30.5, 122.0), (39.0, 118.0),
        (38.5, 125.0), (34.5, 126.5), (43.0, 132.0), (53.5, 141.0), (51.0, 156.5),
        (60.0, 163.0), (64.5, 179.0), (70.0, 170.0), (76.0, 113.0), (72.5, 75.0),
        (67.5, 72.5), (70.0, 58.0), (68.5, 44.0), (69.5, 33.0),
    ],
    // Australia
    &[
        (-11.0, 142.5), (-18.0, 146.0), (-25.0, 153.0), (-33.0, 152.0), (-37.5, 150.0),
        (-39.0, 146.5), (-35.0, 138.5), (-32.0, 133.5), (-33.5, 124.0), (-35.0, 117.0),
        (-31.0, 115.0), (-22.0, 114.0), (-17.0, 122.5), (-14.5, 127.0), (-12.0, 131.0),
        (-14.5, 135.5), (-11.0, 142.5),
    ],
    // Greenland
    &[
        (83.5, -35.0), (78.0, -20.0), (70.0, -22.0), (65.0, -40.0), (60.0, -44.0),
        (65.0, -52.5), (72.0, -56.0), (77.5, -70.0), (82.5, -55.0), (83.5, -35.0),
    ],
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_outlines_are_closed_and_in_range() {
        let geometry = WorldGeometry::builtin();
        assert!(!geometry.outlines.is_empty());
        for outline in &geometry.outlines {
            assert!(outline.len() >= 4);
            assert_eq!(outline.first(), outline.last());
            for p in outline {
                assert!((-90.0..=90.0).contains(&p.lat));
                assert!(p.lng > -180.0 && p.lng <= 180.0);
            }
        }
    }

    #[test]
    fn geojson_polygon_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"type":"FeatureCollection","features":[{{"type":"Feature","geometry":
            {{"type":"Polygon","coordinates":[[[0.0,0.0],[10.0,0.0],[10.0,10.0],[0.0,0.0]]]}}}}]}}"#
        )
        .unwrap();

        let geometry = load_geojson(file.path()).unwrap();
        assert_eq!(geometry.outlines.len(), 1);
        assert_eq!(geometry.outlines[0].len(), 4);
        // GeoJSON order is [lng, lat]
        assert_eq!(geometry.outlines[0][1], GeoPoint::new(0.0, 10.0));
    }

    #[test]
    fn malformed_geojson_is_an_error_not_a_panic() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(load_geojson(file.path()).is_err());

        let mut empty = tempfile::NamedTempFile::new().unwrap();
        write!(empty, r#"{{"type":"FeatureCollection","features":[]}}"#).unwrap();
        assert!(load_geojson(empty.path()).is_err());
    }

    #[test]
    fn missing_file_falls_back_to_builtin() {
        let geometry = WorldGeometry::load(Some(Path::new("/nonexistent/world.json")));
        assert_eq!(
            geometry.outlines.len(),
            WorldGeometry::builtin().outlines.len()
        );
    }
}
