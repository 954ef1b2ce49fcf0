//! User-selected city markers and their on-surface placement.
//!
//! The marker set is keyed by unique city name: adding a duplicate is
//! idempotent and removing an unknown name is a no-op, so UI callers never
//! need to pre-check membership. Insertion order is preserved because label
//! collision-avoidance nudges later labels around earlier ones; identity is
//! the name alone.
//!
//! Pin placements are derived data: (x, y) positions recomputed from the
//! current projection on demand and never persisted.

use chrono_tz::Tz;

use crate::astro::GeoPoint;
use crate::cities::{self, City};
use crate::constants::{LABEL_HEIGHT, LABEL_NUDGE, LABEL_NUDGE_TRIES, LABEL_WIDTH};
use crate::map::projection::Projection;

/// A user-selected city shown as a pin on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct CityMarker {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone_id: String,
}

impl CityMarker {
    pub fn from_city(city: &City) -> Self {
        Self {
            name: city.name.to_string(),
            country: city.country.to_string(),
            latitude: city.lat,
            longitude: city.lng,
            timezone_id: city.timezone.to_string(),
        }
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// The marker's timezone, repaired if the stored id is stale.
    ///
    /// An id that no longer parses resolves through the timezone boundary
    /// data for the marker's coordinates; if even that fails the clock runs
    /// on UTC rather than taking the render down.
    pub fn timezone(&self) -> Tz {
        self.timezone_id
            .parse::<Tz>()
            .unwrap_or_else(|_| cities::timezone_for_coordinates(self.latitude, self.longitude))
    }
}

/// A computed pin position on the display surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PinPlacement {
    pub name: String,
    /// Dot position.
    pub x: f64,
    pub y: f64,
    /// Label anchor, nudged clear of earlier labels.
    pub label_x: f64,
    pub label_y: f64,
}

/// Ordered set of city markers, keyed by unique name.
#[derive(Debug, Default)]
pub struct MarkerSet {
    markers: Vec<CityMarker>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a marker. Adding a name that is already present is idempotent:
    /// the set is unchanged and no duplicate pin will be created.
    ///
    /// Returns true when the marker was actually inserted.
    pub fn add(&mut self, marker: CityMarker) -> bool {
        if self.contains(&marker.name) {
            return false;
        }
        self.markers.push(marker);
        true
    }

    /// Remove a marker by name. Removing a name that is not present is a
    /// no-op. Returns true when something was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.markers.len();
        self.markers.retain(|marker| marker.name != name);
        self.markers.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.markers.iter().any(|marker| marker.name == name)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CityMarker> {
        self.markers.iter()
    }

    /// The marker names in insertion order, for persistence.
    pub fn names(&self) -> Vec<String> {
        self.markers.iter().map(|marker| marker.name.clone()).collect()
    }

    /// Project all markers into pin placements under the given projection.
    ///
    /// Markers outside the projection's domain are skipped (they come back
    /// when the projection changes). Labels start just right of the dot and
    /// are nudged apart when their boxes overlap an earlier label: the new
    /// label moves down and the blocking one moves up, a bounded number of
    /// tries, after which the overlap is accepted.
    pub fn placements(&self, projection: &Projection) -> Vec<PinPlacement> {
        let mut placements: Vec<PinPlacement> = Vec::with_capacity(self.markers.len());

        for marker in &self.markers {
            let Some((x, y)) = projection.project(marker.position()) else {
                continue;
            };

            let mut label_x = x + 2.0;
            let mut label_y = y - 1.0;

            let mut tries = 0;
            while tries < LABEL_NUDGE_TRIES {
                let overlapping = placements.iter_mut().find(|existing| {
                    (label_x - existing.label_x).abs() < LABEL_WIDTH
                        && (label_y - existing.label_y).abs() < LABEL_HEIGHT
                });
                let Some(existing) = overlapping else { break };

                // Move both apart: new label down, blocking label up
                existing.label_y -= LABEL_NUDGE;
                label_y += LABEL_NUDGE;
                tries += 1;
            }

            placements.push(PinPlacement {
                name: marker.name.clone(),
                x,
                y,
                label_x,
                label_y,
            });
        }

        placements
    }
}
