//! Field-relative pose and pose-with-curvature types

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use util::maths::{ang_dist, wrap_angle_pi};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A field-relative planar pose.
///
/// The heading is the angle to the positive field X axis, kept in the
/// canonical range (-pi, pi]. All operations wrap through the shortest arc so
/// that composition and interpolation stay continuous across the wrap.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct Pose2d {
    /// The position in the field frame.
    ///
    /// Units: meters
    pub position_m: Vector2<f64>,

    /// The heading in the field frame.
    ///
    /// Units: radians, in (-pi, pi]
    pub heading_rad: f64,
}

/// A pose annotated with the signed curvature of the path passing through it.
///
/// Produced by sampling path geometry at a fixed arc-length step. Positive
/// curvature follows the right hand rule about the field Z+ axis (a turn to
/// the left).
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct PoseWithCurvature {
    pub pose: Pose2d,

    /// Signed curvature (inverse turning radius).
    ///
    /// Units: 1/meters
    pub curvature_radpm: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose2d {
    /// Create a new pose, wrapping the heading into the canonical range.
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            heading_rad: wrap_angle_pi(heading_rad),
        }
    }

    /// Create a new pose from a position vector and heading.
    pub fn from_position(position_m: Vector2<f64>, heading_rad: f64) -> Self {
        Self {
            position_m,
            heading_rad: wrap_angle_pi(heading_rad),
        }
    }

    /// Unit vector pointing along the pose's heading.
    pub fn forward(&self) -> Vector2<f64> {
        Vector2::new(self.heading_rad.cos(), self.heading_rad.sin())
    }

    /// Rotate a vector from this pose's frame into the field frame.
    pub fn rotate(&self, vec_m: Vector2<f64>) -> Vector2<f64> {
        let (sin, cos) = self.heading_rad.sin_cos();
        Vector2::new(
            cos * vec_m[0] - sin * vec_m[1],
            sin * vec_m[0] + cos * vec_m[1],
        )
    }

    /// Standard rigid-transform composition `self ∘ other`.
    ///
    /// `other` is interpreted in this pose's frame; the result is in the
    /// field frame. Composing a robot pose with a robot-relative displacement
    /// yields the displaced field pose.
    pub fn compose(&self, other: &Pose2d) -> Pose2d {
        Pose2d::from_position(
            self.position_m + self.rotate(other.position_m),
            self.heading_rad + other.heading_rad,
        )
    }

    /// The inverse transform, such that `pose.inverse().compose(&pose)` is
    /// the identity.
    pub fn inverse(&self) -> Pose2d {
        let inv_heading = -self.heading_rad;
        let (sin, cos) = inv_heading.sin_cos();
        Pose2d::from_position(
            Vector2::new(
                -(cos * self.position_m[0] - sin * self.position_m[1]),
                -(sin * self.position_m[0] + cos * self.position_m[1]),
            ),
            inv_heading,
        )
    }

    /// Express this pose in the frame of `base`, i.e. `base⁻¹ ∘ self`.
    ///
    /// Used to form the tracking error: the desired pose relative to the
    /// current one has the along-track error in X, the cross-track error in Y
    /// and the heading error as its heading.
    pub fn relative_to(&self, base: &Pose2d) -> Pose2d {
        base.inverse().compose(self)
    }

    /// Linear interpolation towards `other` by `t` in [0, 1].
    ///
    /// The translation is lerped and the heading follows the shortest arc,
    /// so interpolation is continuous across the wrap.
    pub fn interpolate(&self, other: &Pose2d, t: f64) -> Pose2d {
        let t = t.max(0.0).min(1.0);

        Pose2d::from_position(
            self.position_m + (other.position_m - self.position_m) * t,
            self.heading_rad + ang_dist(self.heading_rad, other.heading_rad) * t,
        )
    }

    /// Euclidean distance between the two poses' positions.
    pub fn distance_to(&self, other: &Pose2d) -> f64 {
        (other.position_m - self.position_m).norm()
    }
}

impl PoseWithCurvature {
    /// Interpolate both the pose and the curvature towards `other`.
    pub fn interpolate(&self, other: &PoseWithCurvature, t: f64) -> PoseWithCurvature {
        let t = t.max(0.0).min(1.0);

        PoseWithCurvature {
            pose: self.pose.interpolate(&other.pose, t),
            curvature_radpm: self.curvature_radpm
                + (other.curvature_radpm - self.curvature_radpm) * t,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
