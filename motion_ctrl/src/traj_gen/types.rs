//! Timed trajectory types

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::geom::PoseWithCurvature;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One sample of a timed trajectory.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct TimedState {
    /// The sampled pose and path curvature.
    pub state: PoseWithCurvature,

    /// Elapsed time from the start of the trajectory.
    ///
    /// Units: seconds
    pub time_s: f64,

    /// Signed velocity along the path at this sample.
    ///
    /// Units: meters/second
    pub velocity_ms: f64,

    /// Signed acceleration over the segment starting at this sample.
    ///
    /// Units: meters/second^2
    pub acceleration_mss: f64,
}

/// An immutable time-parameterised trajectory.
///
/// Built once by the trajectory generator and consumed read-only through
/// [`TimedTrajectory::sample`]. The geometry is always forward-sampled; when
/// `reversed` is set the velocities and accelerations are negated at
/// consumption so the path is driven backwards while the curvature
/// bookkeeping stays forward-consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedTrajectory {
    states: Vec<TimedState>,

    reversed: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TimedTrajectory {
    /// Build a trajectory from a generated state sequence.
    ///
    /// The sequence invariants (at least two states, strictly nondecreasing
    /// time) are the generator's responsibility.
    pub(super) fn new(states: Vec<TimedState>, reversed: bool) -> Self {
        Self { states, reversed }
    }

    /// Total duration of the trajectory.
    ///
    /// Units: seconds
    pub fn duration_s(&self) -> f64 {
        match self.states.last() {
            Some(s) => s.time_s,
            None => 0.0,
        }
    }

    /// True if the trajectory is to be driven backwards.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// The generated state sequence, in forward-sampled (unsigned) form.
    pub fn states(&self) -> &[TimedState] {
        &self.states
    }

    /// The first state, with consumption-signed velocity.
    pub fn first_state(&self) -> TimedState {
        self.consume(self.states[0])
    }

    /// The last state, with consumption-signed velocity.
    pub fn last_state(&self) -> TimedState {
        self.consume(self.states[self.states.len() - 1])
    }

    /// Sample the trajectory at the given elapsed time.
    ///
    /// Times outside the trajectory are clamped to the first/last state.
    /// Between stored samples the velocity follows the stored segment
    /// acceleration and the pose is interpolated by distance travelled along
    /// the segment.
    pub fn sample(&self, time_s: f64) -> TimedState {
        if time_s <= self.states[0].time_s {
            return self.first_state();
        }
        if time_s >= self.duration_s() {
            return self.last_state();
        }

        // Index of the first state at or after the requested time. The
        // clamping above guarantees 0 < index < len.
        let index = self
            .states
            .partition_point(|s| s.time_s < time_s);

        let s0 = &self.states[index - 1];
        let s1 = &self.states[index];

        let dt_s = time_s - s0.time_s;
        let seg_dt_s = s1.time_s - s0.time_s;

        if seg_dt_s <= f64::EPSILON {
            return self.consume(*s1);
        }

        // Velocity and distance along the segment under constant acceleration
        let vel_ms = s0.velocity_ms + s0.acceleration_mss * dt_s;
        let dist_m = s0.velocity_ms * dt_s + 0.5 * s0.acceleration_mss * dt_s * dt_s;

        let seg_len_m = s0.state.pose.distance_to(&s1.state.pose);
        let frac = if seg_len_m > f64::EPSILON {
            (dist_m / seg_len_m).max(0.0).min(1.0)
        }
        else {
            dt_s / seg_dt_s
        };

        self.consume(TimedState {
            state: s0.state.interpolate(&s1.state, frac),
            time_s,
            velocity_ms: vel_ms,
            acceleration_mss: s0.acceleration_mss,
        })
    }

    /// Apply the reversed flag to a forward-sampled state.
    fn consume(&self, state: TimedState) -> TimedState {
        if self.reversed {
            TimedState {
                velocity_ms: -state.velocity_ms,
                acceleration_mss: -state.acceleration_mss,
                ..state
            }
        }
        else {
            state
        }
    }
}
