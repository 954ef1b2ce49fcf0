//! Time source abstraction for supporting both real-time and simulated time.
//!
//! This module provides a trait-based abstraction that allows the application
//! to use either real system time or a simulated clock. The simulated mode is
//! used by the `--at` flag and by tests that need to render the map for a
//! specific instant (solstices, equinoxes) without waiting for the sky to
//! cooperate.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

/// Global time source instance, defaults to RealTimeSource
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Get the current UTC time
    fn now(&self) -> DateTime<Utc>;

    /// Sleep for the specified duration (or simulate it)
    fn sleep(&self, duration: StdDuration);

    /// Check if this is a simulated time source
    fn is_simulated(&self) -> bool;
}

/// Real-time implementation that uses actual system time
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Simulated time source pinned to a chosen start instant.
///
/// Time flows from `start_time` at `multiplier` times real speed (1.0 gives
/// a frozen-offset clock that still ticks normally, which is what `--at`
/// wants: render the chosen instant and let seconds advance from there).
pub struct SimulatedTimeSource {
    start_time: DateTime<Utc>,
    anchored_at: Instant,
    multiplier: f64,
}

impl SimulatedTimeSource {
    /// Create a simulated source anchored at `start_time`, advancing at
    /// `multiplier` times real speed. Non-positive multipliers are treated
    /// as 1.0.
    pub fn new(start_time: DateTime<Utc>, multiplier: f64) -> Self {
        Self {
            start_time,
            anchored_at: Instant::now(),
            multiplier: if multiplier <= 0.0 { 1.0 } else { multiplier },
        }
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        let real_elapsed = self.anchored_at.elapsed().as_secs_f64();
        let simulated = real_elapsed * self.multiplier;
        self.start_time
            + ChronoDuration::seconds(simulated as i64)
            + ChronoDuration::nanoseconds((simulated.fract() * 1_000_000_000.0) as i64)
    }

    fn sleep(&self, duration: StdDuration) {
        // Scale the real sleep so simulated cadences hold their shape
        let real_secs = duration.as_secs_f64() / self.multiplier;
        if real_secs > 0.0 {
            std::thread::sleep(StdDuration::from_secs_f64(real_secs));
        }
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Initialize the global time source (call once at startup)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Check if the time source has been initialized
pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

/// Get the current UTC time from the global time source
pub fn now() -> DateTime<Utc> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).now()
}

/// Sleep for the specified duration using the global time source
pub fn sleep(duration: StdDuration) {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .sleep(duration)
}

/// Check if we're running against a simulated clock
pub fn is_simulated() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_simulated()
}

/// Parse a UTC datetime string in the format "YYYY-MM-DD HH:MM:SS"
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    use chrono::NaiveDateTime;

    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("Invalid datetime format: {e}. Use YYYY-MM-DD HH:MM:SS"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parse_datetime_accepts_iso_like_input() {
        let dt = parse_datetime("2024-06-21 12:00:00").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 6, 21));
        assert_eq!(dt.hour(), 12);
    }

    #[test]
    fn parse_datetime_rejects_garbage() {
        assert!(parse_datetime("next tuesday").is_err());
        assert!(parse_datetime("2024-13-99 25:61:61").is_err());
    }

    #[test]
    fn simulated_source_starts_at_anchor() {
        let anchor = parse_datetime("2024-12-21 12:00:00").unwrap();
        let source = SimulatedTimeSource::new(anchor, 1.0);
        let drift = (source.now() - anchor).num_milliseconds().abs();
        assert!(drift < 500, "simulated clock drifted {drift}ms at creation");
    }
}
