//! # Trajectory generation module
//!
//! The generator converts an ordered list of field waypoints plus a set of
//! timing constraints into a time-stamped, velocity/acceleration-annotated
//! trajectory that the tracking controller can follow.
//!
//! The path geometry is sampled at a fixed arc-length step, every constraint
//! is evaluated pointwise to build a velocity ceiling, and a forward then a
//! backward pass propagate the feasible velocity under the acceleration
//! bound. Integrating the resulting profile over arc length assigns each
//! sample its timestamp. The two-pass minimum guarantees a constraint biting
//! at one sample never forces an infeasible acceleration at its neighbours.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod constraints;
mod path;
mod types;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};
use serde::{Deserialize, Serialize};

// Internal
pub use constraints::*;
pub use types::*;

use crate::geom::{Pose2d, PoseWithCurvature};
use util::maths::ang_dist;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Configuration for one trajectory generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajGenConfig {
    /// Velocity at the first sample.
    ///
    /// Units: meters/second
    pub start_vel_ms: f64,

    /// Velocity to arrive at the last sample with.
    ///
    /// Units: meters/second
    pub end_vel_ms: f64,

    /// Global velocity ceiling.
    ///
    /// Units: meters/second
    pub max_vel_ms: f64,

    /// Acceleration bound used by both propagation passes.
    ///
    /// Units: meters/second^2
    pub max_acc_mss: f64,

    /// Drive the path backwards. The geometry stays forward-sampled; state
    /// velocities are negated when the trajectory is consumed.
    pub reversed: bool,

    /// Arc-length separation of path samples.
    ///
    /// Units: meters
    pub point_sep_m: f64,
}

impl Default for TrajGenConfig {
    fn default() -> Self {
        Self {
            start_vel_ms: 0.0,
            end_vel_ms: 0.0,
            // Conservative defaults from drivetrain characterisation, 2 ft/s
            // and 2 ft/s^2
            max_vel_ms: 0.6096,
            max_acc_mss: 0.6096,
            reversed: false,
            point_sep_m: 0.0508,
        }
    }
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors during trajectory generation.
#[derive(Debug, thiserror::Error)]
pub enum TrajGenError {
    #[error("At least two waypoints are needed to define a path, got {0}")]
    NotEnoughWaypoints(usize),

    #[error("Waypoints {0} and {1} are duplicates")]
    DuplicateWaypoint(usize, usize),

    #[error("Point separation must be positive, got {0}")]
    InvalidPointSep(f64),

    #[error("Maximum velocity and acceleration must be positive")]
    InvalidLimits,

    #[error(
        "The velocity profile collapsed to zero at sample {0}, check that no \
         constraint caps velocity to zero over a region of the path"
    )]
    UnreachableProfile(usize),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Generate a timed trajectory through the given waypoints.
pub fn generate_trajectory(
    waypoints: &[Pose2d],
    constraints: &[TimingConstraint],
    config: &TrajGenConfig,
) -> Result<TimedTrajectory, TrajGenError> {
    if !(config.max_vel_ms > 0.0) || !(config.max_acc_mss > 0.0) {
        return Err(TrajGenError::InvalidLimits);
    }

    let samples = path::sample_path(waypoints, config.point_sep_m)?;
    let num_samples = samples.len();

    // Pointwise velocity ceiling: the minimum over all constraints and the
    // global limit
    let ceiling_ms: Vec<f64> = samples
        .iter()
        .map(|s| {
            constraints
                .iter()
                .map(|c| c.max_velocity(s))
                .fold(config.max_vel_ms, f64::min)
                .max(0.0)
        })
        .collect();

    let start_vel_ms = config.start_vel_ms.abs();
    let end_vel_ms = config.end_vel_ms.abs();

    if start_vel_ms > ceiling_ms[0] {
        warn!(
            "Start velocity {:.3} m/s exceeds the initial ceiling {:.3} m/s, clamping",
            start_vel_ms, ceiling_ms[0]
        );
    }

    // Forward pass: accelerate from the start velocity, never exceeding the
    // ceiling
    let mut vel_ms = vec![0f64; num_samples];
    vel_ms[0] = start_vel_ms.min(ceiling_ms[0]);

    for i in 1..num_samples {
        let ds_m = samples[i - 1].pose.distance_to(&samples[i].pose);
        let acc = allowed_accel(constraints, &samples[i - 1], vel_ms[i - 1], config.max_acc_mss);

        let reachable = (vel_ms[i - 1] * vel_ms[i - 1] + 2.0 * acc * ds_m).sqrt();
        vel_ms[i] = reachable.min(ceiling_ms[i]);
    }

    // Backward pass: propagate braking feasibility back from the requested
    // end velocity, taking the pointwise minimum with the forward result
    vel_ms[num_samples - 1] = vel_ms[num_samples - 1].min(end_vel_ms);

    for i in (0..num_samples - 1).rev() {
        let ds_m = samples[i].pose.distance_to(&samples[i + 1].pose);
        let acc = allowed_accel(constraints, &samples[i + 1], vel_ms[i + 1], config.max_acc_mss);

        let brakeable = (vel_ms[i + 1] * vel_ms[i + 1] + 2.0 * acc * ds_m).sqrt();
        vel_ms[i] = vel_ms[i].min(brakeable);
    }

    // Integrate the profile over arc length to assign timestamps
    let mut states = Vec::with_capacity(num_samples);
    let mut time_s = 0.0;

    for i in 0..num_samples - 1 {
        let ds_m = samples[i].pose.distance_to(&samples[i + 1].pose);
        let avg_vel_ms = 0.5 * (vel_ms[i] + vel_ms[i + 1]);

        if avg_vel_ms <= f64::EPSILON && ds_m > f64::EPSILON {
            return Err(TrajGenError::UnreachableProfile(i));
        }

        let dt_s = if ds_m > f64::EPSILON { ds_m / avg_vel_ms } else { 0.0 };
        let acc_mss = if dt_s > 0.0 {
            (vel_ms[i + 1] - vel_ms[i]) / dt_s
        }
        else {
            0.0
        };

        states.push(TimedState {
            state: samples[i],
            time_s,
            velocity_ms: vel_ms[i],
            acceleration_mss: acc_mss,
        });

        time_s += dt_s;
    }

    states.push(TimedState {
        state: samples[num_samples - 1],
        time_s,
        velocity_ms: vel_ms[num_samples - 1],
        acceleration_mss: 0.0,
    });

    debug!(
        "Generated trajectory: {} states, {:.3} s, reversed: {}",
        states.len(),
        time_s,
        config.reversed
    );

    Ok(TimedTrajectory::new(states, config.reversed))
}

/// Generate a trajectory from a field pose to an end pose given relative to
/// it, optionally shaped by robot-relative midpoints.
///
/// Used to build paths on the fly towards vision-derived targets, where only
/// the robot-relative offset of the goal is known.
pub fn trajectory_to_relative_pose(
    start: &Pose2d,
    relative_end: &Pose2d,
    midpoints: &[Pose2d],
    constraints: &[TimingConstraint],
    config: &TrajGenConfig,
) -> Result<TimedTrajectory, TrajGenError> {
    let mut waypoints = Vec::with_capacity(midpoints.len() + 2);

    waypoints.push(*start);
    waypoints.extend(midpoints.iter().map(|m| start.compose(m)));
    waypoints.push(start.compose(relative_end));

    generate_trajectory(&waypoints, constraints, config)
}

/// Generate a straight trapezoidal-profile trajectory covering the given
/// distance ahead of the start pose.
///
/// If `end_heading_rad` is given the path ends at that field heading,
/// otherwise the start heading is kept.
pub fn trapezoidal_to_distance(
    start: &Pose2d,
    dist_m: f64,
    end_heading_rad: Option<f64>,
    constraints: &[TimingConstraint],
    config: &TrajGenConfig,
) -> Result<TimedTrajectory, TrajGenError> {
    let relative_heading_rad = match end_heading_rad {
        Some(h) => ang_dist(start.heading_rad, h),
        None => 0.0,
    };

    let relative_end = Pose2d::new(dist_m, 0.0, relative_heading_rad);

    trajectory_to_relative_pose(start, &relative_end, &[], constraints, config)
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// The acceleration magnitude allowed at a state, reducing the constraint
/// intervals against the global bound.
fn allowed_accel(
    constraints: &[TimingConstraint],
    state: &PoseWithCurvature,
    velocity_ms: f64,
    max_acc_mss: f64,
) -> f64 {
    constraints
        .iter()
        .map(|c| c.min_max_acceleration(state, velocity_ms).1)
        .fold(max_acc_mss, f64::min)
        .max(0.0)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Vector2;
    use crate::geom::Rect2d;

    /// Feet to meters
    const FT_M: f64 = 0.3048;

    fn straight_10ft_config() -> TrajGenConfig {
        TrajGenConfig {
            max_vel_ms: 5.0 * FT_M,
            max_acc_mss: 4.0 * FT_M,
            ..Default::default()
        }
    }

    fn straight_10ft_waypoints() -> [Pose2d; 2] {
        [Pose2d::new(0.0, 0.0, 0.0), Pose2d::new(10.0 * FT_M, 0.0, 0.0)]
    }

    fn s_curve_waypoints() -> [Pose2d; 3] {
        [
            Pose2d::new(0.0, 0.0, 0.0),
            Pose2d::new(2.0, 1.0, 45f64.to_radians()),
            Pose2d::new(4.0, 2.0, 0.0),
        ]
    }

    #[test]
    fn test_straight_trapezoid_closed_form() {
        // 10 ft straight at 5 ft/s max and 4 ft/s^2: accelerate for 1.25 s
        // over 3.125 ft, cruise 3.75 ft for 0.75 s, brake for 1.25 s.
        // Total 3.25 s with a 5 ft/s peak.
        let traj =
            generate_trajectory(&straight_10ft_waypoints(), &[], &straight_10ft_config())
                .unwrap();

        assert!(
            (traj.duration_s() - 3.25).abs() < 0.05,
            "duration {} != 3.25",
            traj.duration_s()
        );

        let peak = traj
            .states()
            .iter()
            .map(|s| s.velocity_ms)
            .fold(0.0, f64::max);
        assert!(peak <= 5.0 * FT_M + 1e-9);
        assert!((peak - 5.0 * FT_M).abs() < 1e-6, "peak {} never reached", peak);
    }

    #[test]
    fn test_start_and_end_velocities() {
        let config = TrajGenConfig {
            start_vel_ms: 0.3,
            end_vel_ms: 0.2,
            ..straight_10ft_config()
        };

        let traj =
            generate_trajectory(&straight_10ft_waypoints(), &[], &config).unwrap();

        assert!((traj.first_state().velocity_ms - 0.3).abs() < 1e-9);
        assert!((traj.last_state().velocity_ms - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_acceleration_bound_respected() {
        let config = straight_10ft_config();
        let traj =
            generate_trajectory(&s_curve_waypoints(), &[], &config).unwrap();

        for pair in traj.states().windows(2) {
            let dt_s = pair[1].time_s - pair[0].time_s;
            if dt_s <= f64::EPSILON {
                continue;
            }

            let acc = (pair[1].velocity_ms - pair[0].velocity_ms) / dt_s;
            assert!(
                acc.abs() <= config.max_acc_mss * 1.001 + 1e-9,
                "acceleration {} exceeds bound {}",
                acc,
                config.max_acc_mss
            );
        }
    }

    #[test]
    fn test_time_strictly_nondecreasing() {
        let traj = generate_trajectory(
            &s_curve_waypoints(),
            &[],
            &straight_10ft_config(),
        )
        .unwrap();

        for pair in traj.states().windows(2) {
            assert!(pair[1].time_s >= pair[0].time_s);
        }
    }

    #[test]
    fn test_centripetal_constraint_bound() {
        let max_centripetal_mss = 0.5;
        let constraints = [TimingConstraint::CentripetalAcceleration {
            max_accel_mss: max_centripetal_mss,
        }];

        let config = TrajGenConfig {
            max_vel_ms: 2.0,
            max_acc_mss: 1.5,
            ..Default::default()
        };

        let traj =
            generate_trajectory(&s_curve_waypoints(), &constraints, &config).unwrap();

        for s in traj.states() {
            let lateral = s.velocity_ms * s.velocity_ms * s.state.curvature_radpm.abs();
            assert!(
                lateral <= max_centripetal_mss * 1.001 + 1e-9,
                "lateral acceleration {} exceeds {}",
                lateral,
                max_centripetal_mss
            );
        }
    }

    #[test]
    fn test_velocity_limit_region() {
        let cap_ms = 0.25;
        let region = Rect2d::new(
            Vector2::new(1.0 * FT_M, -1.0),
            Vector2::new(6.0 * FT_M, 1.0),
        );
        let constraints = [TimingConstraint::VelocityLimitRegion {
            region,
            max_vel_ms: cap_ms,
        }];

        let traj = generate_trajectory(
            &straight_10ft_waypoints(),
            &constraints,
            &straight_10ft_config(),
        )
        .unwrap();

        for s in traj.states() {
            if region.contains(&s.state.pose.position_m) {
                assert!(
                    s.velocity_ms <= cap_ms + 1e-9,
                    "velocity {} exceeds region cap at x = {}",
                    s.velocity_ms,
                    s.state.pose.position_m[0]
                );
            }
        }
    }

    #[test]
    fn test_reversed_negates_at_consumption() {
        let config = TrajGenConfig {
            reversed: true,
            ..straight_10ft_config()
        };

        let traj =
            generate_trajectory(&straight_10ft_waypoints(), &[], &config).unwrap();

        // Forward-sampled states hold the unsigned profile
        let mid_forward = traj.states()[traj.states().len() / 2];
        assert!(mid_forward.velocity_ms > 0.0);

        // Consumption flips the sign, geometry is untouched
        let mid = traj.sample(traj.duration_s() / 2.0);
        assert!(mid.velocity_ms < 0.0);
        assert!((mid.velocity_ms + mid_forward.velocity_ms).abs() < 0.05);
    }

    #[test]
    fn test_sample_interpolates_time() {
        let traj = generate_trajectory(
            &straight_10ft_waypoints(),
            &[],
            &straight_10ft_config(),
        )
        .unwrap();

        // During the initial ramp v = a t
        let s = traj.sample(0.5);
        assert!((s.velocity_ms - 0.5 * 4.0 * FT_M).abs() < 0.01);

        // Clamped outside the trajectory
        assert!((traj.sample(-1.0).velocity_ms).abs() < 1e-9);
        assert!((traj.sample(100.0).velocity_ms).abs() < 1e-9);
        assert!(
            traj.sample(100.0)
                .state
                .pose
                .distance_to(&straight_10ft_waypoints()[1])
                < 1e-6
        );
    }

    #[test]
    fn test_relative_pose_builder() {
        // Start facing +Y, so a relative +X end pose extends along field +Y
        let start = Pose2d::new(1.0, 1.0, std::f64::consts::FRAC_PI_2);

        let traj = trajectory_to_relative_pose(
            &start,
            &Pose2d::new(2.0, 0.0, 0.0),
            &[],
            &[],
            &TrajGenConfig::default(),
        )
        .unwrap();

        let end = traj.last_state().state.pose;
        assert!(end.distance_to(&Pose2d::new(1.0, 3.0, 0.0)) < 1e-6);
    }

    #[test]
    fn test_invalid_inputs() {
        let config = TrajGenConfig::default();

        assert!(matches!(
            generate_trajectory(&[], &[], &config),
            Err(TrajGenError::NotEnoughWaypoints(0))
        ));

        assert!(matches!(
            generate_trajectory(&[Pose2d::default()], &[], &config),
            Err(TrajGenError::NotEnoughWaypoints(1))
        ));

        let dup = [
            Pose2d::new(0.0, 0.0, 0.0),
            Pose2d::new(0.0, 0.0, 0.0),
        ];
        assert!(matches!(
            generate_trajectory(&dup, &[], &config),
            Err(TrajGenError::DuplicateWaypoint(0, 1))
        ));

        let bad_limits = TrajGenConfig {
            max_vel_ms: 0.0,
            ..TrajGenConfig::default()
        };
        assert!(matches!(
            generate_trajectory(&straight_10ft_waypoints(), &[], &bad_limits),
            Err(TrajGenError::InvalidLimits)
        ));
    }

    #[test]
    fn test_zero_capped_region_is_unreachable() {
        let constraints = [TimingConstraint::VelocityLimitRegion {
            region: Rect2d::new(
                Vector2::new(3.0 * FT_M, -1.0),
                Vector2::new(5.0 * FT_M, 1.0),
            ),
            max_vel_ms: 0.0,
        }];

        let res = generate_trajectory(
            &straight_10ft_waypoints(),
            &constraints,
            &straight_10ft_config(),
        );

        assert!(matches!(res, Err(TrajGenError::UnreachableProfile(_))));
    }
}
