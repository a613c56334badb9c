//! # Locomotion control module
//!
//! Locomotion control converts a chassis-frame velocity command into
//! per-wheel velocity demands and empirical feedforward terms for the motor
//! controllers. Inverse kinematics splits the linear and angular demand over
//! the drivetrain track width; the feedforward covers static friction (kS)
//! and acceleration (kA), with the velocity term (kV) deliberately left to
//! the motor controllers' own velocity loops.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use cmd::*;
pub use params::Params;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during LocoCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum LocoCtrlError {
    /// The measured cycle time is unusable.
    #[error("Invalid cycle time step: {0} s")]
    InvalidTimeStep(f64),
}
