//! # Vision measurement filter
//!
//! Smooths the scalar target measurements pushed in by the vision
//! coprocessor. Single frames can jump well off the true value, so each
//! stream is kept in a short evicting buffer and median filtered before
//! anything downstream (dynamic trajectory end poses, controller targets)
//! consumes it.
//!
//! An empty buffer means "no valid measurement": every accessor returns
//! `Option` and callers decide how to wait, so stale data can never be
//! mistaken for a fix. The handler that owns the serial link calls
//! [`VisionFilter::mark_unplugged`] when the camera drops off, which makes
//! the staleness observable immediately.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use util::ring_buffer::RingBuffer;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of frames each measurement stream is filtered over.
const FILTER_DEPTH: usize = 5;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Median-filtered view of the vision target measurements.
pub struct VisionFilter {
    /// Lateral offsets to the target
    target_xs_m: RingBuffer,

    /// Forward distances to the target
    target_zs_m: RingBuffer,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VisionFilter {
    pub fn new() -> Self {
        Self {
            target_xs_m: RingBuffer::new(FILTER_DEPTH),
            target_zs_m: RingBuffer::new(FILTER_DEPTH),
        }
    }

    /// Push one frame's target measurement.
    ///
    /// Units: meters
    pub fn push_target(&mut self, x_m: f64, z_m: f64) {
        self.target_xs_m.add(x_m);
        self.target_zs_m.add(z_m);
    }

    /// Median-filtered lateral offset to the target, or `None` with no
    /// valid measurement.
    ///
    /// Units: meters
    pub fn target_x_m(&self) -> Option<f64> {
        self.target_xs_m.median()
    }

    /// Median-filtered forward distance to the target, or `None` with no
    /// valid measurement.
    ///
    /// Units: meters
    pub fn target_z_m(&self) -> Option<f64> {
        self.target_zs_m.median()
    }

    /// Straight-line range to the target, or `None` with no valid
    /// measurement.
    ///
    /// Units: meters
    pub fn target_range_m(&self) -> Option<f64> {
        let x_m = self.target_x_m()?;
        let z_m = self.target_z_m()?;

        Some(x_m.hypot(z_m))
    }

    /// Discard all measurements, e.g. when the camera link drops.
    pub fn mark_unplugged(&mut self) {
        self.target_xs_m.clear();
        self.target_zs_m.clear();
    }
}

impl Default for VisionFilter {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
