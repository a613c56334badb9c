//! Path geometry sampling
//!
//! Waypoint poses are joined by quintic Hermite segments and sampled at a
//! fixed arc-length step into poses with curvature. Any geometry source that
//! produces such samples would satisfy the generator; this one is kept
//! internal so trajectories can be built from waypoints alone.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;

// Internal
use super::TrajGenError;
use crate::geom::{Pose2d, PoseWithCurvature};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Parameter steps used to march each segment when measuring arc length.
const PARAM_STEPS: usize = 2000;

/// Two waypoints closer than this are considered duplicates.
const DUPLICATE_TOLERANCE_M: f64 = 1e-9;

/// Scale applied to the segment chord length to get the heading-tangent
/// magnitude at each end of a quintic Hermite segment.
const TANGENT_SCALE: f64 = 1.2;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A quintic Hermite polynomial segment between two waypoint poses.
///
/// The segment matches the waypoint positions and headings at its ends, with
/// zero second derivative so curvature starts and ends gently.
struct QuinticSegment {
    /// X polynomial coefficients, constant term first
    x: [f64; 6],

    /// Y polynomial coefficients, constant term first
    y: [f64; 6],
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl QuinticSegment {
    fn new(start: &Pose2d, end: &Pose2d) -> Self {
        let scale = TANGENT_SCALE * start.distance_to(end);

        let d0 = start.forward() * scale;
        let d1 = end.forward() * scale;

        Self {
            x: hermite_coeffs(start.position_m[0], end.position_m[0], d0[0], d1[0]),
            y: hermite_coeffs(start.position_m[1], end.position_m[1], d0[1], d1[1]),
        }
    }

    fn point(&self, t: f64) -> Vector2<f64> {
        Vector2::new(poly(&self.x, t), poly(&self.y, t))
    }

    /// Sample the pose and signed curvature at parameter `t` in [0, 1].
    fn state(&self, t: f64) -> PoseWithCurvature {
        let dx = poly_deriv(&self.x, t);
        let dy = poly_deriv(&self.y, t);
        let ddx = poly_second_deriv(&self.x, t);
        let ddy = poly_second_deriv(&self.y, t);

        let speed_sq = dx * dx + dy * dy;

        PoseWithCurvature {
            pose: Pose2d::from_position(self.point(t), dy.atan2(dx)),
            curvature_radpm: (dx * ddy - dy * ddx) / (speed_sq * speed_sq.sqrt()),
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Sample the path defined by the waypoints at a fixed arc-length step.
///
/// The returned sequence starts at the first waypoint and ends at the last,
/// with interior samples spaced `point_sep_m` apart along the path.
pub(super) fn sample_path(
    waypoints: &[Pose2d],
    point_sep_m: f64,
) -> Result<Vec<PoseWithCurvature>, TrajGenError> {
    if waypoints.len() < 2 {
        return Err(TrajGenError::NotEnoughWaypoints(waypoints.len()));
    }

    if !(point_sep_m > 0.0) {
        return Err(TrajGenError::InvalidPointSep(point_sep_m));
    }

    for i in 1..waypoints.len() {
        if waypoints[i - 1].distance_to(&waypoints[i]) < DUPLICATE_TOLERANCE_M {
            return Err(TrajGenError::DuplicateWaypoint(i - 1, i));
        }
    }

    let mut samples = Vec::new();

    // Distance walked along the path since the last emitted sample
    let mut dist_since_last_m = 0.0;

    for (i, pair) in waypoints.windows(2).enumerate() {
        let segment = QuinticSegment::new(&pair[0], &pair[1]);

        if i == 0 {
            samples.push(segment.state(0.0));
        }

        // March the parameter, accumulating chord length, and emit a sample
        // every time a full separation has been covered
        let mut prev_point = segment.point(0.0);
        for step in 1..=PARAM_STEPS {
            let t = step as f64 / PARAM_STEPS as f64;
            let point = segment.point(t);

            dist_since_last_m += (point - prev_point).norm();
            prev_point = point;

            if dist_since_last_m >= point_sep_m {
                samples.push(segment.state(t));
                dist_since_last_m = 0.0;
            }
        }

        // Pin the segment end so waypoints always appear in the sampling,
        // replacing a sample emitted within half a separation of it
        let end_state = segment.state(1.0);
        if let Some(last) = samples.last() {
            if last.pose.distance_to(&end_state.pose) < 0.5 * point_sep_m {
                samples.pop();
            }
        }
        samples.push(end_state);
        dist_since_last_m = 0.0;
    }

    Ok(samples)
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Quintic Hermite basis coefficients (constant term first) for one axis,
/// with zero second derivative at both ends.
fn hermite_coeffs(p0: f64, p1: f64, d0: f64, d1: f64) -> [f64; 6] {
    [
        p0,
        d0,
        0.0,
        -10.0 * p0 - 6.0 * d0 - 4.0 * d1 + 10.0 * p1,
        15.0 * p0 + 8.0 * d0 + 7.0 * d1 - 15.0 * p1,
        -6.0 * p0 - 3.0 * d0 - 3.0 * d1 + 6.0 * p1,
    ]
}

fn poly(c: &[f64; 6], t: f64) -> f64 {
    ((((c[5] * t + c[4]) * t + c[3]) * t + c[2]) * t + c[1]) * t + c[0]
}

fn poly_deriv(c: &[f64; 6], t: f64) -> f64 {
    (((5.0 * c[5] * t + 4.0 * c[4]) * t + 3.0 * c[3]) * t + 2.0 * c[2]) * t + c[1]
}

fn poly_second_deriv(c: &[f64; 6], t: f64) -> f64 {
    ((20.0 * c[5] * t + 12.0 * c[4]) * t + 6.0 * c[3]) * t + 2.0 * c[2]
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_straight_line_sampling() {
        let waypoints = [Pose2d::new(0.0, 0.0, 0.0), Pose2d::new(1.0, 0.0, 0.0)];

        let samples = sample_path(&waypoints, 0.05).unwrap();

        // Start and end are pinned
        assert!(samples[0].pose.distance_to(&waypoints[0]) < 1e-9);
        assert!(
            samples.last().unwrap().pose.distance_to(&waypoints[1]) < 1e-9
        );

        for s in &samples {
            // A straight path stays on the X axis, points along it, and has
            // no curvature
            assert!(s.pose.position_m[1].abs() < 1e-6);
            assert!(s.pose.heading_rad.abs() < 1e-6);
            assert!(s.curvature_radpm.abs() < 1e-6);
        }

        // Samples are spaced by roughly the requested separation
        for pair in samples.windows(2) {
            let sep = pair[0].pose.distance_to(&pair[1].pose);
            assert!(sep > 0.02 && sep < 0.08, "separation {} out of range", sep);
        }
    }

    #[test]
    fn test_endpoint_headings_matched() {
        let waypoints = [
            Pose2d::new(0.0, 0.0, 0.0),
            Pose2d::new(2.0, 1.0, 45f64.to_radians()),
        ];

        let samples = sample_path(&waypoints, 0.05).unwrap();

        assert!(samples[0].pose.heading_rad.abs() < 1e-6);
        assert!(
            (samples.last().unwrap().pose.heading_rad - 45f64.to_radians()).abs() < 1e-6
        );
    }

    #[test]
    fn test_not_enough_waypoints() {
        let res = sample_path(&[Pose2d::default()], 0.05);
        assert!(matches!(res, Err(TrajGenError::NotEnoughWaypoints(1))));
    }

    #[test]
    fn test_duplicate_waypoints() {
        let waypoints = [
            Pose2d::new(0.0, 0.0, 0.0),
            Pose2d::new(0.0, 0.0, 1.0),
            Pose2d::new(1.0, 0.0, 0.0),
        ];

        let res = sample_path(&waypoints, 0.05);
        assert!(matches!(res, Err(TrajGenError::DuplicateWaypoint(0, 1))));
    }
}
