//! Forward map projection: geographic coordinates to 2D surface cells.
//!
//! Two projections are supported. Equirectangular is linear in both axes and
//! total over the globe; Mercator stretches `y ∝ ln(tan(π/4 + lat/2))` and
//! has no finite image for the poles, so projection returns `None` outside
//! its domain rather than handing non-finite coordinates to the renderer.
//!
//! Markers are placed forward-only from known coordinates; there is no
//! inverse projection.

use std::f64::consts::PI;

use crate::astro::GeoPoint;
use crate::constants::{
    EQUIRECTANGULAR_REF_SCALE, EQUIRECTANGULAR_REF_WIDTH, MERCATOR_MAX_LATITUDE, MERCATOR_PADDING,
};

/// Projection family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionKind {
    #[default]
    Equirectangular,
    Mercator,
}

impl ProjectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectionKind::Equirectangular => "equirectangular",
            ProjectionKind::Mercator => "mercator",
        }
    }
}

/// Projection configuration plus the viewport it is currently fitted to.
///
/// Owned by `MapView`; a single writer updates it on resize before any
/// coordinate lookup, so every `project` call sees the latest completed
/// reconfigure.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub kind: ProjectionKind,
    scale: f64,
    translate: (f64, f64),
    viewport: (f64, f64),
}

impl Projection {
    /// Create a projection fitted to the given viewport.
    pub fn new(kind: ProjectionKind, width: f64, height: f64) -> Self {
        let mut projection = Self {
            kind,
            scale: 0.0,
            translate: (0.0, 0.0),
            viewport: (0.0, 0.0),
        };
        projection.reconfigure(width, height);
        projection
    }

    /// Recompute scale and translate from viewport dimensions.
    ///
    /// Deterministic and idempotent: the same dimensions always produce the
    /// same scale/translate, so redundant resize events are harmless.
    pub fn reconfigure(&mut self, width: f64, height: f64) {
        self.viewport = (width, height);
        self.translate = (width / 2.0, height / 2.0);
        self.scale = match self.kind {
            ProjectionKind::Equirectangular => {
                (width / EQUIRECTANGULAR_REF_WIDTH) * EQUIRECTANGULAR_REF_SCALE
            }
            ProjectionKind::Mercator => (width - MERCATOR_PADDING) / (2.0 * PI),
        };
    }

    /// Current viewport dimensions.
    pub fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    /// Forward-project a geographic point to surface coordinates.
    ///
    /// Returns `None` outside the projection's valid domain (Mercator near
    /// the poles) instead of producing infinite or NaN coordinates.
    pub fn project(&self, point: GeoPoint) -> Option<(f64, f64)> {
        if !point.lat.is_finite() || !point.lng.is_finite() || point.lat.abs() > 90.0 {
            return None;
        }

        let (tx, ty) = self.translate;
        match self.kind {
            ProjectionKind::Equirectangular => {
                // Linear in both axes; d3's geoEquirectangular uses
                // scale * radians with y flipped.
                let x = tx + self.scale * point.lng.to_radians();
                let y = ty - self.scale * point.lat.to_radians();
                Some((x, y))
            }
            ProjectionKind::Mercator => {
                if point.lat.abs() > MERCATOR_MAX_LATITUDE {
                    return None;
                }
                let x = tx + self.scale * point.lng.to_radians();
                let lat = point.lat.to_radians();
                let y = ty - self.scale * (PI / 4.0 + lat / 2.0).tan().ln();
                if y.is_finite() { Some((x, y)) } else { None }
            }
        }
    }
}
