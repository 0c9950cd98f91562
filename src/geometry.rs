//! Planar geometry for joint angle measurement.
//!
//! All angles are measured in the image plane using normalized landmark
//! coordinates (origin top-left, y pointing down).

use nalgebra::Vector2;

/// A point in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2D {
    /// Horizontal position, typically in [0, 1]
    pub x: f64,
    /// Vertical position, typically in [0, 1], increasing downward
    pub y: f64,
}

impl Point2D {
    /// Create a new point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite numbers
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Same point shifted horizontally by `dx`
    #[must_use]
    pub fn offset_x(self, dx: f64) -> Self {
        Self::new(self.x + dx, self.y)
    }

    fn vector_to(self, other: Self) -> Vector2<f64> {
        Vector2::new(other.x - self.x, other.y - self.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Interior angle at vertex `b` formed by the outer points `a` and `c`, in degrees.
///
/// The absolute difference of the two arm directions is reflected into
/// `[0, 180]` when it exceeds a half turn. If either arm has zero length
/// (`a == b` or `c == b`) the direction is undefined and the angle is `0.0`.
#[must_use]
pub fn joint_angle(a: Point2D, b: Point2D, c: Point2D) -> f64 {
    let to_a = b.vector_to(a);
    let to_c = b.vector_to(c);

    if is_zero(&to_a) || is_zero(&to_c) {
        return 0.0;
    }

    let radians = to_c.y.atan2(to_c.x) - to_a.y.atan2(to_a.x);
    let angle = radians.abs().to_degrees();

    let interior = if angle > 180.0 { 360.0 - angle } else { angle };

    // Rounding in to_degrees can push a full turn a hair past 360
    interior.clamp(0.0, 180.0)
}

fn is_zero(v: &Vector2<f64>) -> bool {
    v.x == 0.0 && v.y == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_right_angle() {
        let angle = joint_angle(Point2D::new(1.0, 0.0), Point2D::new(0.0, 0.0), Point2D::new(0.0, 1.0));
        assert!((angle - 90.0).abs() < TOLERANCE, "got {angle}");
    }

    #[test]
    fn test_straight_line() {
        let angle = joint_angle(Point2D::new(1.0, 0.0), Point2D::new(0.0, 0.0), Point2D::new(-1.0, 0.0));
        assert!((angle - 180.0).abs() < TOLERANCE, "got {angle}");
    }

    #[test]
    fn test_reflex_difference_is_reflected() {
        // Directions at -135° and +135° differ by 270° before reflection
        let angle = joint_angle(Point2D::new(-1.0, -1.0), Point2D::new(0.0, 0.0), Point2D::new(-1.0, 1.0));
        assert!((angle - 90.0).abs() < TOLERANCE, "got {angle}");
    }

    #[test]
    fn test_coincident_points() {
        let vertex = Point2D::new(0.3, 0.4);
        assert_eq!(joint_angle(vertex, vertex, Point2D::new(1.0, 1.0)), 0.0);
        assert_eq!(joint_angle(Point2D::new(1.0, 1.0), vertex, vertex), 0.0);
        assert_eq!(joint_angle(vertex, vertex, vertex), 0.0);
    }

    #[test]
    fn test_same_direction_is_zero() {
        let angle = joint_angle(Point2D::new(2.0, 2.0), Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0));
        assert!(angle.abs() < TOLERANCE);
    }

    #[test]
    fn test_offset_x() {
        let p = Point2D::new(0.25, 0.75).offset_x(-1.0);
        assert_eq!(p, Point2D::new(-0.75, 0.75));
    }

    fn coordinate() -> impl Strategy<Value = f64> {
        -10.0..10.0f64
    }

    proptest! {
        #[test]
        fn prop_angle_within_range(
            ax in coordinate(), ay in coordinate(),
            bx in coordinate(), by in coordinate(),
            cx in coordinate(), cy in coordinate(),
        ) {
            let angle = joint_angle(Point2D::new(ax, ay), Point2D::new(bx, by), Point2D::new(cx, cy));
            prop_assert!((0.0..=180.0).contains(&angle), "angle {} out of range", angle);
        }

        #[test]
        fn prop_outer_points_commute(
            ax in coordinate(), ay in coordinate(),
            bx in coordinate(), by in coordinate(),
            cx in coordinate(), cy in coordinate(),
        ) {
            let a = Point2D::new(ax, ay);
            let b = Point2D::new(bx, by);
            let c = Point2D::new(cx, cy);
            prop_assert_eq!(joint_angle(a, b, c), joint_angle(c, b, a));
        }
    }
}
