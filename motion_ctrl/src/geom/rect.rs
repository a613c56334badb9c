//! Axis-aligned field rectangles

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An axis-aligned rectangle in the field frame.
///
/// Used to mark regions of the field in which the trajectory generator caps
/// velocity, and regions of a path at which the tracking controller fires
/// marker callbacks.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Rect2d {
    /// The corner with the smallest coordinates.
    ///
    /// Units: meters
    pub min_m: Vector2<f64>,

    /// The corner with the largest coordinates.
    ///
    /// Units: meters
    pub max_m: Vector2<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Rect2d {
    /// Create a rectangle from two opposite corners, in any order.
    pub fn new(corner_a_m: Vector2<f64>, corner_b_m: Vector2<f64>) -> Self {
        Self {
            min_m: Vector2::new(
                corner_a_m[0].min(corner_b_m[0]),
                corner_a_m[1].min(corner_b_m[1]),
            ),
            max_m: Vector2::new(
                corner_a_m[0].max(corner_b_m[0]),
                corner_a_m[1].max(corner_b_m[1]),
            ),
        }
    }

    /// True if the point lies inside the rectangle (edges inclusive).
    pub fn contains(&self, point_m: &Vector2<f64>) -> bool {
        point_m[0] >= self.min_m[0]
            && point_m[0] <= self.max_m[0]
            && point_m[1] >= self.min_m[1]
            && point_m[1] <= self.max_m[1]
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_corner_order_normalised() {
        let rect = Rect2d::new(Vector2::new(4.0, 5.0), Vector2::new(1.0, 2.0));

        assert_eq!(rect.min_m, Vector2::new(1.0, 2.0));
        assert_eq!(rect.max_m, Vector2::new(4.0, 5.0));
    }

    #[test]
    fn test_contains() {
        let rect = Rect2d::new(Vector2::new(0.0, 0.0), Vector2::new(2.0, 1.0));

        assert!(rect.contains(&Vector2::new(1.0, 0.5)));
        assert!(rect.contains(&Vector2::new(0.0, 0.0)));
        assert!(rect.contains(&Vector2::new(2.0, 1.0)));
        assert!(!rect.contains(&Vector2::new(2.1, 0.5)));
        assert!(!rect.contains(&Vector2::new(1.0, -0.1)));
    }
}
