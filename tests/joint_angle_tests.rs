//! Joint angle calculation tests


use handstand_trainer::geometry::{joint_angle, Point2D};
use test_helpers::assert_angle_eq;

fn p(x: f64, y: f64) -> Point2D {
    Point2D::new(x, y)
}

#[test]
fn test_right_angle() {
    assert_angle_eq(joint_angle(p(1.0, 0.0), p(0.0, 0.0), p(0.0, 1.0)), 90.0);
}

#[test]
fn test_straight_line() {
    assert_angle_eq(joint_angle(p(1.0, 0.0), p(0.0, 0.0), p(-1.0, 0.0)), 180.0);
}

#[test]
fn test_reflection_of_reflex_difference() {
    // atan2 directions of -135° and 135° differ by 270°
    assert_angle_eq(joint_angle(p(-1.0, -1.0), p(0.0, 0.0), p(-1.0, 1.0)), 90.0);
    assert_angle_eq(joint_angle(p(-1.0, 1.0), p(0.0, 0.0), p(-1.0, -1.0)), 90.0);
}

#[test]
fn test_translation_invariance() {
    let base = joint_angle(p(0.2, 0.1), p(0.5, 0.5), p(0.9, 0.4));
    let shifted = joint_angle(p(10.2, -4.9), p(10.5, -4.5), p(10.9, -4.6));
    assert_angle_eq(shifted, base);
}

#[test]
fn test_common_angles() {
    let cases = [
        (p(1.0, 0.0), p(0.0, 0.0), p(1.0, 1.0), 45.0),
        (p(1.0, 0.0), p(0.0, 0.0), p(-1.0, 1.0), 135.0),
        (p(0.0, -1.0), p(0.0, 0.0), p(3.0_f64.sqrt(), -1.0), 60.0),
        (p(2.0, 0.0), p(0.0, 0.0), p(5.0, 0.0), 0.0),
    ];

    for (a, b, c, expected) in cases {
        assert_angle_eq(joint_angle(a, b, c), expected);
        assert_angle_eq(joint_angle(c, b, a), expected);
    }
}

#[test]
fn test_zero_length_arm_is_zero() {
    let b = p(0.4, 0.6);
    assert_eq!(joint_angle(b, b, p(0.9, 0.1)), 0.0);
    assert_eq!(joint_angle(p(0.9, 0.1), b, b), 0.0);
}

#[test]
fn test_normalized_coordinate_range() {
    // Typical arm in image coordinates: shoulder above, wrist below the elbow
    let angle = joint_angle(p(0.40, 0.30), p(0.42, 0.45), p(0.40, 0.60));
    assert!(angle > 160.0 && angle < 180.0, "got {angle}");
}
