//! Pointwise timing constraints for trajectory generation

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::geom::{PoseWithCurvature, Rect2d};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A constraint evaluated pointwise along the sampled path.
///
/// Each variant provides a velocity ceiling and an allowed acceleration
/// interval at a sampled state; the generator reduces over the constraint
/// list with `min`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TimingConstraint {
    /// Bounds velocity so that `v^2 * |curvature|` never exceeds the given
    /// lateral acceleration, slowing the robot through tight turns.
    CentripetalAcceleration {
        /// Units: meters/second^2
        max_accel_mss: f64,
    },

    /// Caps velocity while the sampled pose lies inside a field region,
    /// leaving it unconstrained elsewhere.
    VelocityLimitRegion {
        region: Rect2d,

        /// Units: meters/second
        max_vel_ms: f64,
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TimingConstraint {
    /// The velocity ceiling this constraint imposes at the given state.
    ///
    /// Units: meters/second, `f64::INFINITY` where unconstrained.
    pub fn max_velocity(&self, state: &PoseWithCurvature) -> f64 {
        match self {
            TimingConstraint::CentripetalAcceleration { max_accel_mss } => {
                let curv = state.curvature_radpm.abs();
                if curv <= f64::EPSILON {
                    f64::INFINITY
                }
                else {
                    (max_accel_mss / curv).sqrt()
                }
            }
            TimingConstraint::VelocityLimitRegion { region, max_vel_ms } => {
                if region.contains(&state.pose.position_m) {
                    *max_vel_ms
                }
                else {
                    f64::INFINITY
                }
            }
        }
    }

    /// The allowed acceleration interval at the given state and velocity.
    ///
    /// Both current variants shape the velocity ceiling only, so they leave
    /// acceleration unconstrained; the generator still reduces over this
    /// interval so that acceleration-shaping constraints slot in without
    /// touching the passes.
    ///
    /// Units: meters/second^2
    pub fn min_max_acceleration(
        &self,
        _state: &PoseWithCurvature,
        _velocity_ms: f64,
    ) -> (f64, f64) {
        match self {
            TimingConstraint::CentripetalAcceleration { .. } => {
                (f64::NEG_INFINITY, f64::INFINITY)
            }
            TimingConstraint::VelocityLimitRegion { .. } => {
                (f64::NEG_INFINITY, f64::INFINITY)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
