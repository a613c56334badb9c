//! Implementations for the LocoCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;

// Internal
use super::{ChassisState, LocoCtrlError, Params, WheelCommands};
use util::{module::State, params};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Locomotion control module state.
#[derive(Default)]
pub struct LocoCtrl {
    params: Params,

    /// Wheel velocities commanded on the previous cycle, used to
    /// finite-difference the acceleration feedforward. `None` on the first
    /// cycle after a reset.
    prev_wheel_vels_ms: Option<(f64, f64)>,

    report: StatusReport,
}

/// Input data to Locomotion Control.
pub struct InputData {
    /// The chassis velocity command to be executed this cycle.
    pub cmd: ChassisState,

    /// Measured time since the previous cycle.
    ///
    /// Units: seconds
    pub dt_s: f64,
}

/// Status report for LocoCtrl processing.
#[derive(Debug, Default, Copy, Clone, Serialize)]
pub struct StatusReport {
    /// True when the acceleration feedforward term was applied. It is
    /// omitted on the first cycle after a reset, when no previous wheel
    /// state exists to differentiate.
    pub accel_ff_applied: bool,

    /// Estimated left wheel acceleration.
    ///
    /// Units: meters/second^2
    pub left_accel_mss: f64,

    /// Estimated right wheel acceleration.
    ///
    /// Units: meters/second^2
    pub right_accel_mss: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for LocoCtrl {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = WheelCommands;
    type StatusReport = StatusReport;
    type ProcError = LocoCtrlError;

    /// Initialise the LocoCtrl module.
    ///
    /// Expected init data is the path to the parameter file.
    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        self.params = params::load(init_data)?;

        Ok(())
    }

    /// Perform cyclic processing of Locomotion Control.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        if !input_data.dt_s.is_finite() || input_data.dt_s < 0.0 {
            return Err(LocoCtrlError::InvalidTimeStep(input_data.dt_s));
        }

        // Clear the status report
        self.report = StatusReport::default();

        let (left_vel_ms, right_vel_ms) = self.inverse_kinematics(&input_data.cmd);

        // Static friction term opposes the direction each wheel is demanded
        // to move
        let mut left_ff = self.params.left_ks * sign_or_zero(left_vel_ms);
        let mut right_ff = self.params.right_ks * sign_or_zero(right_vel_ms);

        // The acceleration term needs a previous wheel state to difference
        // against
        if let Some((prev_left_ms, prev_right_ms)) = self.prev_wheel_vels_ms {
            if input_data.dt_s > 0.0 {
                let left_accel_mss = (left_vel_ms - prev_left_ms) / input_data.dt_s;
                let right_accel_mss = (right_vel_ms - prev_right_ms) / input_data.dt_s;

                left_ff += self.params.left_ka * left_accel_mss;
                right_ff += self.params.right_ka * right_accel_mss;

                self.report.accel_ff_applied = true;
                self.report.left_accel_mss = left_accel_mss;
                self.report.right_accel_mss = right_accel_mss;
            }
        }

        self.prev_wheel_vels_ms = Some((left_vel_ms, right_vel_ms));

        let output = WheelCommands {
            left_vel_ms,
            right_vel_ms,
            left_ff,
            right_ff,
        };

        trace!(
            "LocoCtrl output: left {:.3} m/s (ff {:.3}), right {:.3} m/s (ff {:.3})",
            output.left_vel_ms,
            output.left_ff,
            output.right_vel_ms,
            output.right_ff
        );

        Ok((output, self.report))
    }
}

impl LocoCtrl {
    /// Create the module from explicit parameters.
    pub fn from_params(params: Params) -> Self {
        Self {
            params,
            prev_wheel_vels_ms: None,
            report: StatusReport::default(),
        }
    }

    /// Forget the previous wheel state, so the next cycle's feedforward
    /// omits the acceleration term.
    pub fn reset(&mut self) {
        self.prev_wheel_vels_ms = None;
    }

    /// Split a chassis command over the two wheels.
    fn inverse_kinematics(&self, cmd: &ChassisState) -> (f64, f64) {
        let track_m = self.params.track_width_m;

        let left_ms = (2.0 * cmd.linear_ms - cmd.angular_radps * track_m) / 2.0;
        let right_ms = (2.0 * cmd.linear_ms + cmd.angular_radps * track_m) / 2.0;

        (left_ms, right_ms)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// The sign of the value, or zero when it is zero.
///
/// `f64::signum` maps +0.0 to 1.0, which would apply static feedforward to a
/// stationary wheel.
fn sign_or_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    }
    else {
        value.signum()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
