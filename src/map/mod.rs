//! Map state and frame composition.
//!
//! `MapView` is the owned replacement for what would otherwise be ambient
//! globals: it holds the projection configuration, the current viewport, the
//! boundary geometry, the marker set, and the cached terminator curve. The
//! render driver updates it; nothing else touches projection state.
//!
//! Data flows one direction through `MapView`: a UTC instant produces a
//! solar position and terminator curve (on the slow cadence), and the
//! projection turns geometry + curve + markers into a cell frame for the
//! display surface. Viewport changes re-run only the projection step; the
//! cached solar geometry is reused untouched.

pub mod geometry;
pub mod markers;
pub mod projection;

use chrono::{DateTime, Utc};

use crate::astro::solar::SolarPosition;
use crate::astro::terminator::{self, TerminatorCurve, TerminatorStrategy};
use crate::astro::GeoPoint;
use geometry::WorldGeometry;
use markers::{MarkerSet, PinPlacement};
use projection::{Projection, ProjectionKind};

/// What occupies one cell of the composed frame, before theming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellKind {
    #[default]
    Ocean,
    Land,
    NightOcean,
    NightLand,
    Terminator,
}

/// One composed frame of map cells, row-major.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<CellKind>,
}

impl Frame {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![CellKind::default(); width as usize * height as usize],
        }
    }

    pub fn get(&self, x: u16, y: u16) -> CellKind {
        self.cells[y as usize * self.width as usize + x as usize]
    }

    fn set(&mut self, x: f64, y: f64, kind: CellKind) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width as usize && y < self.height as usize {
            self.cells[y * self.width as usize + x] = kind;
        }
    }

    fn mark_night(&mut self, x: f64, y: f64) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width as usize && y < self.height as usize {
            let index = y * self.width as usize + x;
            self.cells[index] = match self.cells[index] {
                CellKind::Ocean | CellKind::NightOcean => CellKind::NightOcean,
                CellKind::Land | CellKind::NightLand => CellKind::NightLand,
                CellKind::Terminator => CellKind::Terminator,
            };
        }
    }
}

/// Owned map state: projection, geometry, markers, cached solar geometry.
pub struct MapView {
    projection: Projection,
    geometry: WorldGeometry,
    pub markers: MarkerSet,
    strategy: TerminatorStrategy,
    sun: Option<SolarPosition>,
    curve: Option<TerminatorCurve>,
}

impl MapView {
    pub fn new(kind: ProjectionKind, geometry: WorldGeometry, width: f64, height: f64) -> Self {
        Self {
            projection: Projection::new(kind, width, height),
            geometry,
            markers: MarkerSet::new(),
            strategy: TerminatorStrategy::default(),
            sun: None,
            curve: None,
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Refit the projection to a new viewport. Idempotent for equal
    /// dimensions; must complete before any subsequent coordinate lookup.
    pub fn reconfigure(&mut self, width: f64, height: f64) {
        self.projection.reconfigure(width, height);
    }

    /// Recompute solar position and terminator curve for an instant.
    ///
    /// This is the slow-cadence step; resize and marker updates reuse the
    /// cached result.
    pub fn refresh_terminator(&mut self, instant: DateTime<Utc>) {
        let sun = SolarPosition::at(instant);
        self.curve = Some(TerminatorCurve::from_solar_position(
            instant,
            &sun,
            self.strategy,
        ));
        self.sun = Some(sun);
    }

    /// The cached terminator curve, if one has been computed.
    pub fn terminator(&self) -> Option<&TerminatorCurve> {
        self.curve.as_ref()
    }

    /// Current pin placements under the active projection.
    pub fn placements(&self) -> Vec<PinPlacement> {
        self.markers.placements(&self.projection)
    }

    /// Compose the map into a cell frame: ocean base, night shading, land
    /// outlines, then the terminator line on top.
    ///
    /// Everything is forward-projected; cells are touched by sampling the
    /// globe at sub-cell resolution rather than inverting the projection.
    pub fn compose(&self) -> Frame {
        let (width, height) = self.projection.viewport();
        let mut frame = Frame::new(width as u16, height as u16);

        if let Some(sun) = &self.sun {
            self.shade_night(&mut frame, sun);
        }
        self.stroke_outlines(&mut frame);
        if let Some(curve) = &self.curve {
            self.stroke_terminator(&mut frame, curve);
        }

        frame
    }

    /// Mark every cell whose geographic sample is on the night side.
    fn shade_night(&self, frame: &mut Frame, sun: &SolarPosition) {
        // Two samples per cell in each axis keeps gaps out of the shading
        let lng_steps = frame.width as usize * 2;
        let lat_steps = frame.height as usize * 2;
        if lng_steps == 0 || lat_steps == 0 {
            return;
        }

        for lat_step in 0..=lat_steps {
            let lat = 90.0 - 180.0 * lat_step as f64 / lat_steps as f64;
            for lng_step in 0..=lng_steps {
                let lng = -180.0 + 360.0 * lng_step as f64 / lng_steps as f64;
                let point = GeoPoint::new(lat, lng);
                if !terminator::is_night(point, sun) {
                    continue;
                }
                if let Some((x, y)) = self.projection.project(point) {
                    frame.mark_night(x, y);
                }
            }
        }
    }

    /// Stroke boundary outlines, interpolating between vertices so coarse
    /// outlines still read as connected lines.
    fn stroke_outlines(&self, frame: &mut Frame) {
        for outline in &self.geometry.outlines {
            for pair in outline.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                // Skip segments that wrap the antimeridian; drawing them
                // would smear a line across the whole map
                if (a.lng - b.lng).abs() > 180.0 {
                    continue;
                }
                let steps = segment_steps(a, b);
                for step in 0..=steps {
                    let t = step as f64 / steps as f64;
                    let point = GeoPoint::new(
                        a.lat + (b.lat - a.lat) * t,
                        a.lng + (b.lng - a.lng) * t,
                    );
                    let night = self
                        .sun
                        .as_ref()
                        .map(|sun| terminator::is_night(point, sun))
                        .unwrap_or(false);
                    if let Some((x, y)) = self.projection.project(point) {
                        frame.set(x, y, if night { CellKind::NightLand } else { CellKind::Land });
                    }
                }
            }
        }
    }

    fn stroke_terminator(&self, frame: &mut Frame, curve: &TerminatorCurve) {
        for point in &curve.points {
            if let Some((x, y)) = self.projection.project(*point) {
                frame.set(x, y, CellKind::Terminator);
            }
        }
    }
}

/// Interpolation steps for one outline segment, proportional to its
/// geographic extent.
fn segment_steps(a: GeoPoint, b: GeoPoint) -> usize {
    let extent = (a.lat - b.lat).abs().max((a.lng - b.lng).abs());
    (extent.ceil() as usize).max(1)
}
