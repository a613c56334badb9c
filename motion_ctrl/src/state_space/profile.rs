//! Trapezoidal motion profile
//!
//! A one degree-of-freedom reference trajectory: constant-acceleration ramp,
//! constant-velocity cruise, constant-deceleration ramp. Sampled by elapsed
//! time to drive a state-space controller's reference, giving smooth
//! position moves instead of step inputs.

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One sample of a motion profile.
#[derive(Debug, Copy, Clone)]
pub struct ProfileState {
    /// Signed distance from the start of the move.
    ///
    /// Units: meters
    pub position_m: f64,

    /// Signed velocity.
    ///
    /// Units: meters/second
    pub velocity_ms: f64,
}

/// A trapezoidal velocity profile covering a signed target distance.
///
/// If the distance is too short to reach the cruise velocity the profile
/// degenerates to a triangle.
#[derive(Debug, Clone, Copy)]
pub struct TrapezoidalProfile {
    /// Direction of the move, -1 or +1
    sign: f64,

    /// Unsigned target distance.
    ///
    /// Units: meters
    dist_m: f64,

    /// Velocity actually reached, at most the cruise velocity.
    ///
    /// Units: meters/second
    peak_vel_ms: f64,

    /// Units: meters/second^2
    accel_mss: f64,

    /// Duration of each ramp.
    ///
    /// Units: seconds
    t_ramp_s: f64,

    /// Duration of the cruise phase, zero for triangular profiles.
    ///
    /// Units: seconds
    t_cruise_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrapezoidalProfile {
    /// Plan a profile covering `target_m` with the given cruise velocity and
    /// acceleration.
    ///
    /// # Panics
    /// - Panics if the cruise velocity or acceleration are not positive.
    pub fn new(target_m: f64, cruise_vel_ms: f64, accel_mss: f64) -> Self {
        assert!(
            cruise_vel_ms > 0.0 && accel_mss > 0.0,
            "profile cruise velocity and acceleration must be positive"
        );

        let sign = if target_m < 0.0 { -1.0 } else { 1.0 };
        let dist_m = target_m.abs();

        // Peak velocity is limited either by the cruise setting or by the
        // distance available to accelerate and brake in
        let peak_vel_ms = cruise_vel_ms.min((accel_mss * dist_m).sqrt());

        let t_ramp_s = peak_vel_ms / accel_mss;
        let ramp_dist_m = 0.5 * peak_vel_ms * t_ramp_s;
        let t_cruise_s = if peak_vel_ms > 0.0 {
            (dist_m - 2.0 * ramp_dist_m) / peak_vel_ms
        }
        else {
            0.0
        };

        Self {
            sign,
            dist_m,
            peak_vel_ms,
            accel_mss,
            t_ramp_s,
            t_cruise_s,
        }
    }

    /// Total duration of the move.
    ///
    /// Units: seconds
    pub fn duration_s(&self) -> f64 {
        2.0 * self.t_ramp_s + self.t_cruise_s
    }

    /// True once the given elapsed time covers the whole move.
    pub fn is_finished(&self, elapsed_s: f64) -> bool {
        elapsed_s >= self.duration_s()
    }

    /// Sample the profile at the given elapsed time.
    ///
    /// Times before the start clamp to rest at the origin, times past the
    /// end clamp to rest at the target.
    pub fn sample(&self, elapsed_s: f64) -> ProfileState {
        let t = elapsed_s.max(0.0);

        let (position_m, velocity_ms) = if t < self.t_ramp_s {
            // Accelerating ramp
            (
                0.5 * self.accel_mss * t * t,
                self.accel_mss * t,
            )
        }
        else if t < self.t_ramp_s + self.t_cruise_s {
            // Cruise
            let ramp_dist_m = 0.5 * self.peak_vel_ms * self.t_ramp_s;
            (
                ramp_dist_m + self.peak_vel_ms * (t - self.t_ramp_s),
                self.peak_vel_ms,
            )
        }
        else if t < self.duration_s() {
            // Braking ramp, symmetric with the accelerating one
            let remaining_s = self.duration_s() - t;
            (
                self.dist_m - 0.5 * self.accel_mss * remaining_s * remaining_s,
                self.accel_mss * remaining_s,
            )
        }
        else {
            (self.dist_m, 0.0)
        };

        ProfileState {
            position_m: self.sign * position_m,
            velocity_ms: self.sign * velocity_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
