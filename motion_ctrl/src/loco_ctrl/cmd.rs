//! Locomotion command types

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A chassis-frame velocity command.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct ChassisState {
    /// Linear velocity along the robot's forward axis.
    ///
    /// Positive is forwards, negative backwards.
    ///
    /// Units: meters/second
    pub linear_ms: f64,

    /// Angular velocity about the robot's Z+ (upwards) axis.
    ///
    /// Follows the right hand rule, so positive rates turn the robot to the
    /// left.
    ///
    /// Units: radians/second
    pub angular_radps: f64,
}

/// Per-wheel demands that the motor control layer must execute.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct WheelCommands {
    /// Left wheel velocity demand.
    ///
    /// Units: meters/second
    pub left_vel_ms: f64,

    /// Right wheel velocity demand.
    ///
    /// Units: meters/second
    pub right_vel_ms: f64,

    /// Left feedforward as a fraction of bus voltage, in [-1, 1].
    pub left_ff: f64,

    /// Right feedforward as a fraction of bus voltage, in [-1, 1].
    pub right_ff: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ChassisState {
    /// A full-stop command.
    pub fn stop() -> Self {
        Self::default()
    }
}
