//! General time utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::time::Instant;

use chrono;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Measures the wall-clock time elapsed between successive control cycles.
///
/// The first call to [`DeltaTime::update`] returns `None` since there is no
/// previous cycle to difference against.
pub struct DeltaTime {
    prev: Option<Instant>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DeltaTime {
    /// Create a new delta time measurer with no previous cycle recorded.
    pub fn new() -> Self {
        Self { prev: None }
    }

    /// Get the time in seconds since the last call to `update`, or `None` on
    /// the first call.
    pub fn update(&mut self) -> Option<f64> {
        let now = Instant::now();

        let dt_s = self.prev.map(|p| (now - p).as_secs_f64());

        self.prev = Some(now);

        dt_s
    }

    /// Forget the previous cycle, so the next `update` returns `None` again.
    pub fn reset(&mut self) {
        self.prev = None;
    }
}

impl Default for DeltaTime {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    if let Some(ns) = duration.num_nanoseconds() {
        Some(ns as f64 / NANOS_PER_SECOND as f64)
    }
    else {
        None
    }
}
