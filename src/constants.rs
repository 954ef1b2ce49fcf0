//! Application-wide constants for refresh cadences, projection geometry,
//! and settings defaults.

use std::time::Duration;

// === Update cadences ===

/// Digital clock labels tick every second.
pub const CLOCK_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// City marker time labels refresh every minute.
pub const MARKER_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// The terminator moves about a quarter degree of longitude per minute, so
/// recomputing every 15 minutes is well within one terminal cell of accuracy.
pub const TERMINATOR_REFRESH_INTERVAL: Duration = Duration::from_secs(900);

/// Resize bursts within this window coalesce into one projection recompute.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(200);

/// Event-poll granularity of the cooperative main loop.
pub const LOOP_POLL_INTERVAL: Duration = Duration::from_millis(100);

// === Viewport validation ===

/// Delay before retrying when the terminal reports zero-sized dimensions.
pub const VIEWPORT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Give up waiting for a usable viewport after this many retries.
pub const VIEWPORT_RETRY_LIMIT: u32 = 50;

// === Projection ===

/// Reference width for the equirectangular scale: scale = (width / 640) * 100.
pub const EQUIRECTANGULAR_REF_WIDTH: f64 = 640.0;

/// Scale multiplier applied at the reference width.
pub const EQUIRECTANGULAR_REF_SCALE: f64 = 100.0;

/// Horizontal padding subtracted before fitting a full Mercator world:
/// scale = (width - MERCATOR_PADDING) / 2π.
pub const MERCATOR_PADDING: f64 = 3.0;

/// Mercator is cut off beyond this latitude; poles are outside its domain.
pub const MERCATOR_MAX_LATITUDE: f64 = 85.0511;

// === Terminator ===

/// One sample per degree of longitude, inclusive of both ends.
pub const TERMINATOR_SAMPLES: usize = 361;

/// Below this |declination| (degrees) the parametric formula divides by a
/// near-zero tan δ; the curve is treated as the degenerate meridian circle.
pub const EQUINOX_DECLINATION_EPSILON: f64 = 1e-4;

// === Markers ===

/// Assumed pin label extent for overlap tests, in surface cells.
pub const LABEL_WIDTH: f64 = 16.0;
pub const LABEL_HEIGHT: f64 = 2.0;

/// Vertical nudge applied per collision-avoidance step.
pub const LABEL_NUDGE: f64 = 2.0;

/// Maximum nudge attempts before accepting the overlap.
pub const LABEL_NUDGE_TRIES: u32 = 5;

// === City search ===

/// Queries shorter than this return nothing.
pub const SEARCH_MIN_QUERY_LEN: usize = 2;

/// Search results are capped at this many matches.
pub const SEARCH_MAX_RESULTS: usize = 10;

// === Settings ===

/// Settings file name inside the config directory.
pub const SETTINGS_FILE: &str = "terminatr.toml";
