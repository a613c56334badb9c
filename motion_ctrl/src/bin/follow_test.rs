//! # Path Following Test
//!
//! This binary runs the full drivetrain control stack against an idealised
//! kinematic simulation, without any robot hardware. A trajectory is
//! generated, tracked by the Ramsete law, converted to wheel commands and
//! integrated back into simulated sensor readings for localisation. It is
//! the quickest way to sanity-check tuning or generator changes.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use color_eyre::{eyre::WrapErr, Result};
use log::{debug, info};
use nalgebra::Vector2;

use motion_ctrl::{
    geom::{Pose2d, Rect2d},
    loc::{Loc, SensorReadings},
    loco_ctrl::{self, LocoCtrl},
    traj_ctrl::{self, TrajCtrl},
    traj_gen::{generate_trajectory, TimingConstraint, TrajGenConfig},
};
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.02;

/// Drivetrain track width used by the simulated encoders. Must match the
/// loco_ctrl parameters.
const TRACK_WIDTH_M: f64 = 1.18872;

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    // ---- EARLY INITIALISATION ----

    color_eyre::install()?;

    // Initialise session
    let session =
        Session::new("follow_test", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    info!("Path Following Test\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- MODULE INIT ----

    let mut traj_ctrl =
        TrajCtrl::init("params/traj_ctrl.toml").wrap_err("Failed to initialise TrajCtrl")?;

    let mut loco_ctrl = LocoCtrl::default();
    loco_ctrl
        .init("params/loco_ctrl.toml")
        .wrap_err("Failed to initialise LocoCtrl")?;

    // ---- TRAJECTORY GENERATION ----

    let waypoints = [
        Pose2d::new(0.0, 0.0, 0.0),
        Pose2d::new(2.5, 1.0, 45f64.to_radians()),
        Pose2d::new(5.0, 2.0, 0.0),
    ];

    let constraints = [TimingConstraint::CentripetalAcceleration { max_accel_mss: 1.2 }];

    let config = TrajGenConfig {
        max_vel_ms: 1.5,
        max_acc_mss: 1.2,
        ..Default::default()
    };

    let trajectory = generate_trajectory(&waypoints, &constraints, &config)
        .wrap_err("Failed to generate the trajectory")?;

    info!(
        "Generated trajectory: {} states over {:.2} s",
        trajectory.states().len(),
        trajectory.duration_s()
    );

    // Dump the trajectory into the session directory for plotting
    let traj_json = serde_json::to_string_pretty(&trajectory)
        .wrap_err("Failed to serialise the trajectory")?;
    std::fs::write(session.session_root.join("trajectory.json"), traj_json)
        .wrap_err("Failed to write the trajectory dump")?;

    // ---- SIMULATED RUN ----

    // True pose of the simulated robot, and the accumulating encoder and
    // gyro readings derived from it
    let mut true_pose = trajectory.first_state().state.pose;
    let mut left_dist_m = 0.0;
    let mut right_dist_m = 0.0;

    let mut loc = Loc::new(true_pose);

    // Arm a marker over the end of the path so the marker plumbing gets
    // exercised
    traj_ctrl.add_marker(
        Rect2d::new(Vector2::new(4.5, 1.5), Vector2::new(5.5, 2.5)),
        || info!("Marker region entered"),
    );

    traj_ctrl
        .begin_trajectory(trajectory)
        .wrap_err("Failed to begin the trajectory")?;

    let mut max_cross_track_m = 0f64;
    let mut cycles = 0u32;

    while !traj_ctrl.is_finished() {
        // Sensor readings from the simulated drivetrain
        let readings = SensorReadings {
            gyro_heading_rad: true_pose.heading_rad,
            left_dist_m,
            right_dist_m,
        };
        let pose_estimate = loc.update(&readings);

        // Track the trajectory from the estimated pose
        let (chassis_cmd, report) = traj_ctrl
            .proc(&traj_ctrl::InputData {
                pose: pose_estimate,
                dt_s: CYCLE_PERIOD_S,
            })
            .wrap_err("TrajCtrl processing failed")?;

        max_cross_track_m = max_cross_track_m.max(report.cross_track_error_m.abs());

        // Convert to wheel commands
        let (wheel_cmds, _) = loco_ctrl
            .proc(&loco_ctrl::InputData {
                cmd: chassis_cmd,
                dt_s: CYCLE_PERIOD_S,
            })
            .wrap_err("LocoCtrl processing failed")?;

        // The idealised drivetrain executes the wheel commands perfectly;
        // integrate them into the true pose and the sensor readings
        left_dist_m += wheel_cmds.left_vel_ms * CYCLE_PERIOD_S;
        right_dist_m += wheel_cmds.right_vel_ms * CYCLE_PERIOD_S;

        let ang_radps =
            (wheel_cmds.right_vel_ms - wheel_cmds.left_vel_ms) / TRACK_WIDTH_M;
        let mid_heading_rad = true_pose.heading_rad + 0.5 * ang_radps * CYCLE_PERIOD_S;

        true_pose = Pose2d::from_position(
            true_pose.position_m
                + Vector2::new(mid_heading_rad.cos(), mid_heading_rad.sin())
                    * chassis_cmd.linear_ms
                    * CYCLE_PERIOD_S,
            true_pose.heading_rad + ang_radps * CYCLE_PERIOD_S,
        );

        cycles += 1;
        if cycles % 50 == 0 {
            debug!(
                "t = {:5.2} s: pose ({:.2}, {:.2}, {:.1} deg), cross-track {:.4} m",
                cycles as f64 * CYCLE_PERIOD_S,
                pose_estimate.position_m[0],
                pose_estimate.position_m[1],
                pose_estimate.heading_rad.to_degrees(),
                report.cross_track_error_m
            );
        }
    }

    // One more cycle to collect the commanded stop
    let (stop_cmd, _) = traj_ctrl
        .proc(&traj_ctrl::InputData {
            pose: loc.pose(),
            dt_s: CYCLE_PERIOD_S,
        })
        .wrap_err("TrajCtrl stop cycle failed")?;

    info!(
        "Run complete after {} cycles ({:.2} s simulated)",
        cycles,
        cycles as f64 * CYCLE_PERIOD_S
    );
    info!("Final commanded velocities: ({}, {})", stop_cmd.linear_ms, stop_cmd.angular_radps);
    info!("Maximum cross-track error: {:.4} m", max_cross_track_m);
    info!(
        "Final pose: ({:.3}, {:.3}, {:.1} deg)",
        true_pose.position_m[0],
        true_pose.position_m[1],
        true_pose.heading_rad.to_degrees()
    );

    Ok(())
}
