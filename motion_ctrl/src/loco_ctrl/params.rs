//! Parameters structure for LocoCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for locomotion control.
///
/// The defaults are the 2019 drivetrain's characterisation values: the track
/// width was determined empirically by spinning in a circle, the feedforward
/// constants come from the characterisation toolchain. kS is in fractions of
/// bus voltage, kA in fraction-seconds^2 per meter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Distance between the left and right wheel contact centrelines.
    ///
    /// Units: meters
    pub track_width_m: f64,

    /// Static friction feedforward, left side.
    pub left_ks: f64,

    /// Static friction feedforward, right side.
    pub right_ks: f64,

    /// Acceleration feedforward, left side.
    pub left_ka: f64,

    /// Acceleration feedforward, right side.
    pub right_ka: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            // 3.9 ft
            track_width_m: 1.18872,
            left_ks: 0.091,
            right_ks: 0.089,
            left_ka: 0.02,
            right_ka: 0.027,
        }
    }
}
