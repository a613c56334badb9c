//! # Trajectory tracking module
//!
//! Trajectory control keeps the robot on a generated timed trajectory. Each
//! cycle it samples the trajectory at the tracked elapsed time, expresses the
//! pose error in the reference frame and applies the Ramsete nonlinear
//! feedback law to produce a chassis velocity command.
//!
//! The law is asymptotically stable for any feasible trajectory and
//! tolerates nonzero initial pose error, which is why it is used here over
//! pure pursuit or a pose PID. Two scalars tune it: `b` trades tracking
//! aggressiveness and `zeta` damps the response.
//!
//! Rectangular marker regions can be attached to a run; the first time the
//! tracked reference pose enters a region its callback fires, letting
//! mechanism actions trigger at a point of path progress without coupling
//! mechanism code to the controller.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::Params;
pub use state::*;
