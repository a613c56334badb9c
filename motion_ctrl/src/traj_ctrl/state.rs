//! Trajectory tracking module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::Serialize;

// Internal
use super::Params;
use crate::geom::{Pose2d, Rect2d};
use crate::loco_ctrl::ChassisState;
use crate::traj_gen::{TimedState, TimedTrajectory};
use util::maths::sinc;
use util::params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Trajectory tracking module state.
pub struct TrajCtrl {
    params: Params,

    /// Executing mode
    mode: TrajCtrlMode,

    /// The trajectory being followed
    trajectory: Option<TimedTrajectory>,

    /// Time into the trajectory, advanced by the measured cycle time
    elapsed_s: f64,

    /// Latched once the tracked time reaches the trajectory duration
    finished: bool,

    /// The reference state tracked on the last cycle
    reference: Option<TimedState>,

    /// Marker regions attached to the current run
    markers: Vec<Marker>,

    report: StatusReport,
}

/// Input data for one tracking cycle.
pub struct InputData {
    /// The current pose estimate.
    pub pose: Pose2d,

    /// Measured time since the previous cycle.
    ///
    /// Units: seconds
    pub dt_s: f64,
}

/// The status report containing monitoring quantities for this cycle.
#[derive(Debug, Default, Copy, Clone, Serialize)]
pub struct StatusReport {
    /// Error to the reference, along the reference heading.
    pub along_track_error_m: f64,

    /// Error to the reference, across the reference heading.
    pub cross_track_error_m: f64,

    /// Heading error to the reference.
    pub heading_error_rad: f64,

    /// True once the tracked time has reached the trajectory duration.
    pub finished: bool,
}

/// A region of the field paired with a callback to fire when the tracked
/// reference first enters it.
struct Marker {
    region: Rect2d,
    callback: Box<dyn FnMut() + Send>,
    visited: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that can occur during processing of the module.
#[derive(Debug, thiserror::Error)]
pub enum TrajCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(params::LoadError),

    /// The tuning parameters are outside their stable ranges.
    #[error("Invalid tuning: b = {b} must be > 0 and zeta = {zeta} must be in (0, 1)")]
    InvalidTuning { b: f64, zeta: f64 },

    /// A trajectory is already being followed. To replace it the current run
    /// must be aborted first.
    #[error("Attempted to load a trajectory while one is being followed")]
    TrajectoryAlreadyLoaded,

    /// Processing was attempted with no trajectory loaded.
    #[error("No trajectory has been loaded")]
    NoTrajectory,

    /// The measured cycle time is unusable.
    #[error("Invalid cycle time step: {0} s")]
    InvalidTimeStep(f64),
}

/// The possible modes of execution of TrajCtrl.
#[derive(Debug, Copy, Clone)]
enum TrajCtrlMode {
    Off,
    FollowTraj,
    Finished,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajCtrl {
    /// Initialise the TrajCtrl module from a parameter file.
    pub fn init(params_path: &str) -> Result<Self, TrajCtrlError> {
        let params = match params::load(params_path) {
            Ok(p) => p,
            Err(e) => return Err(TrajCtrlError::ParamLoadError(e)),
        };

        Self::from_params(params)
    }

    /// Initialise the TrajCtrl module from explicit parameters.
    pub fn from_params(params: Params) -> Result<Self, TrajCtrlError> {
        if !(params.b > 0.0) || !(params.zeta > 0.0 && params.zeta < 1.0) {
            return Err(TrajCtrlError::InvalidTuning {
                b: params.b,
                zeta: params.zeta,
            });
        }

        Ok(Self {
            params,
            mode: TrajCtrlMode::Off,
            trajectory: None,
            elapsed_s: 0.0,
            finished: false,
            reference: None,
            markers: Vec::new(),
            report: StatusReport::default(),
        })
    }

    /// Begin following a trajectory.
    ///
    /// Tracking starts from the trajectory's first state on the next call to
    /// `proc`. Marker regions registered before this call are re-armed for
    /// the new run. Loading a trajectory while one is being followed is an
    /// error; use `abort` to stop the current run first.
    pub fn begin_trajectory(
        &mut self,
        trajectory: TimedTrajectory,
    ) -> Result<(), TrajCtrlError> {
        if let TrajCtrlMode::FollowTraj = self.mode {
            return Err(TrajCtrlError::TrajectoryAlreadyLoaded);
        }

        debug!(
            "Beginning trajectory: {:.3} s, reversed: {}",
            trajectory.duration_s(),
            trajectory.is_reversed()
        );

        self.trajectory = Some(trajectory);
        self.elapsed_s = 0.0;
        self.finished = false;
        self.reference = None;

        for marker in self.markers.iter_mut() {
            marker.visited = false;
        }

        self.mode = TrajCtrlMode::FollowTraj;

        Ok(())
    }

    /// Register a marker callback on a field region.
    ///
    /// The callback fires the first time the tracked reference pose enters
    /// the region, once per run.
    pub fn add_marker<F>(&mut self, region: Rect2d, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.markers.push(Marker {
            region,
            callback: Box::new(callback),
            visited: false,
        });
    }

    /// Abort the current run.
    ///
    /// The next call to `proc` will issue a stop command and clear the
    /// trajectory.
    pub fn abort(&mut self) {
        if self.trajectory.is_some() {
            self.mode = TrajCtrlMode::Finished;
        }
    }

    /// True once the tracked time has reached the trajectory duration.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The reference pose tracked on the last cycle, for telemetry.
    pub fn reference_pose(&self) -> Option<Pose2d> {
        self.reference.map(|r| r.state.pose)
    }

    /// Process one tracking cycle.
    pub fn proc(
        &mut self,
        input: &InputData,
    ) -> Result<(ChassisState, StatusReport), TrajCtrlError> {
        if !input.dt_s.is_finite() || input.dt_s < 0.0 {
            return Err(TrajCtrlError::InvalidTimeStep(input.dt_s));
        }

        self.report = StatusReport {
            finished: self.finished,
            ..StatusReport::default()
        };

        let cmd = match self.mode {
            TrajCtrlMode::Off => return Err(TrajCtrlError::NoTrajectory),
            TrajCtrlMode::FollowTraj => self.mode_follow_traj(input)?,
            TrajCtrlMode::Finished => self.mode_finished(),
        };

        Ok((cmd, self.report))
    }

    /// Mode following trajectory: sample the reference and apply the
    /// tracking law.
    fn mode_follow_traj(&mut self, input: &InputData) -> Result<ChassisState, TrajCtrlError> {
        let (reference, duration_s) = match self.trajectory {
            Some(ref t) => (t.sample(self.elapsed_s), t.duration_s()),
            None => return Err(TrajCtrlError::NoTrajectory),
        };

        let desired = reference.state.pose;
        let vel_dem_ms = reference.velocity_ms;
        let ang_dem_radps = vel_dem_ms * reference.state.curvature_radpm;

        // Pose error expressed in the robot frame: X along-track, Y
        // cross-track, heading the error angle
        let error = desired.relative_to(&input.pose);
        let e_x = error.position_m[0];
        let e_y = error.position_m[1];
        let e_th = error.heading_rad;

        self.report.along_track_error_m = e_x;
        self.report.cross_track_error_m = e_y;
        self.report.heading_error_rad = e_th;

        // Time-varying gain of the law
        let k1 = 2.0
            * self.params.zeta
            * (ang_dem_radps * ang_dem_radps + self.params.b * vel_dem_ms * vel_dem_ms)
                .sqrt();

        let cmd = ChassisState {
            linear_ms: vel_dem_ms * e_th.cos() + k1 * e_x,
            angular_radps: ang_dem_radps
                + self.params.b * vel_dem_ms * sinc(e_th) * e_y
                + k1 * e_th,
        };

        // Fire any markers the reference has newly entered
        for marker in self.markers.iter_mut() {
            if !marker.visited && marker.region.contains(&desired.position_m) {
                marker.visited = true;
                debug!(
                    "Marker entered at reference ({:.2}, {:.2})",
                    desired.position_m[0], desired.position_m[1]
                );
                (marker.callback)();
            }
        }

        self.reference = Some(reference);

        // Advance the tracked time and latch completion
        self.elapsed_s += input.dt_s;
        if self.elapsed_s >= duration_s {
            self.finished = true;
            self.report.finished = true;
            self.mode = TrajCtrlMode::Finished;
        }

        Ok(cmd)
    }

    /// Mode finished: issue a stop and clear the run so the drivetrain is
    /// left in a commanded-stop state.
    fn mode_finished(&mut self) -> ChassisState {
        self.trajectory = None;
        self.elapsed_s = 0.0;
        self.report.finished = true;

        self.mode = TrajCtrlMode::Off;

        ChassisState::stop()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
