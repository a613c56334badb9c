//! # Localisation module
//!
//! Dead-reckoning localisation for the drivetrain. Each cycle the change in
//! average wheel distance is combined with the gyro heading to produce a
//! local-frame displacement, which is composed onto the field-relative pose
//! estimate.
//!
//! Heading comes authoritatively from the gyro, never from differential
//! wheel distances: wheel slip corrupts rotation estimates far more than
//! translation estimates. The module owns the single mutable pose estimate;
//! everything else reads it through [`Loc::pose`] and resets happen only
//! through [`Loc::reset`].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use crate::geom::Pose2d;
use util::maths::ang_dist;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Raw sensor readings consumed by localisation.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct SensorReadings {
    /// Absolute gyro heading.
    ///
    /// Units: radians
    pub gyro_heading_rad: f64,

    /// Accumulated left wheel distance.
    ///
    /// Units: meters
    pub left_dist_m: f64,

    /// Accumulated right wheel distance.
    ///
    /// Units: meters
    pub right_dist_m: f64,
}

/// Dead-reckoning localisation state.
pub struct Loc {
    /// The owned field-relative pose estimate
    pose: Pose2d,

    /// Offset from the gyro heading to the field heading, captured on the
    /// first cycle after a reset
    heading_offset_rad: f64,

    /// Readings from the previous cycle, `None` immediately after a reset
    prev: Option<SensorReadings>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Loc {
    /// Create the module with the given initial pose estimate.
    pub fn new(initial_pose: Pose2d) -> Self {
        Self {
            pose: initial_pose,
            heading_offset_rad: 0.0,
            prev: None,
        }
    }

    /// The current pose estimate.
    pub fn pose(&self) -> Pose2d {
        self.pose
    }

    /// Overwrite the pose estimate.
    ///
    /// The previous sensor readings are dropped, so the next `update` only
    /// re-seeds and leaves the estimate untouched. Typically called when a
    /// trajectory run starts from a known field pose.
    pub fn reset(&mut self, pose: Pose2d) {
        self.pose = pose;
        self.prev = None;
    }

    /// Integrate one cycle of sensor readings into the pose estimate.
    ///
    /// Returns the updated estimate.
    pub fn update(&mut self, readings: &SensorReadings) -> Pose2d {
        match self.prev {
            None => {
                // First cycle after a reset: capture the gyro-to-field
                // offset, nothing to integrate yet
                self.heading_offset_rad =
                    ang_dist(readings.gyro_heading_rad, self.pose.heading_rad);
            }
            Some(prev) => {
                let delta_dist_m = ((readings.left_dist_m - prev.left_dist_m)
                    + (readings.right_dist_m - prev.right_dist_m))
                    / 2.0;

                let new_heading_rad =
                    readings.gyro_heading_rad + self.heading_offset_rad;

                // Straight-line displacement along the midpoint heading of
                // the cycle
                let delta_heading_rad = ang_dist(self.pose.heading_rad, new_heading_rad);
                let mid_heading_rad = self.pose.heading_rad + 0.5 * delta_heading_rad;

                self.pose = Pose2d::from_position(
                    self.pose.position_m
                        + Vector2::new(mid_heading_rad.cos(), mid_heading_rad.sin())
                            * delta_dist_m,
                    new_heading_rad,
                );
            }
        }

        self.prev = Some(*readings);

        self.pose
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
