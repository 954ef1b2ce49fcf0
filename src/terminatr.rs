//! Application coordinator: wires collaborators together and hands off to
//! the render loop.
//!
//! Construction is builder-style so `main` can translate CLI flags one at a
//! time; `run` owns the startup sequence: banner, geometry, settings store,
//! terminal surface, then the core loop until quit.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::{Core, CoreParams};
use crate::map::geometry::WorldGeometry;
use crate::map::projection::ProjectionKind;
use crate::settings::store;
use crate::surface::TerminalSurface;

pub struct Terminatr {
    geometry_path: Option<PathBuf>,
    config_dir: Option<PathBuf>,
    projection: ProjectionKind,
    debug_enabled: bool,
}

impl Default for Terminatr {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminatr {
    pub fn new() -> Self {
        Self {
            geometry_path: None,
            config_dir: None,
            projection: ProjectionKind::default(),
            debug_enabled: false,
        }
    }

    /// Use a GeoJSON boundary file instead of the built-in outlines.
    pub fn with_geometry(mut self, path: PathBuf) -> Self {
        self.geometry_path = Some(path);
        self
    }

    /// Override the platform config directory.
    pub fn with_config_dir(mut self, dir: PathBuf) -> Self {
        self.config_dir = Some(dir);
        self
    }

    pub fn with_projection(mut self, projection: ProjectionKind) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_enabled = enabled;
        self
    }

    /// Run until the user quits. The terminal is restored by the surface's
    /// drop guard on every exit path, including errors.
    pub fn run(self) -> Result<()> {
        log_version!();
        if self.debug_enabled {
            log_debug!("Debug output enabled");
        }
        log_block_start!("Loading world geometry");
        let geometry = WorldGeometry::load(self.geometry_path.as_deref());
        log_indented!("{} outlines, projection: {}", geometry.outlines.len(), self.projection.as_str());

        let store = store::select_store(self.config_dir);
        let surface = Box::new(TerminalSurface::new()?);

        let core = Core::new(CoreParams {
            surface,
            store,
            geometry,
            projection: self.projection,
        })?;
        core.run()?;

        // The surface has been dropped by now, so the terminal and the
        // logger are back in our hands
        log_block_start!("Shutting down");
        log_end!();
        Ok(())
    }
}
