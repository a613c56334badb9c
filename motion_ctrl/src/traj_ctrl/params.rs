//! Trajectory tracking parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for trajectory tracking.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Aggressiveness gain of the tracking law. Larger values converge onto
    /// the path harder. Must be positive.
    ///
    /// Units: 1/meters^2
    pub b: f64,

    /// Damping ratio of the tracking law, in (0, 1).
    pub zeta: f64,
}

impl Default for Params {
    fn default() -> Self {
        // Tuned on the 2019 drivetrain
        Self { b: 3.3, zeta: 0.99 }
    }
}
