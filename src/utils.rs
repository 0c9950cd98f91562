//! Coordinate conversions between normalized landmarks and image pixels.

use crate::geometry::Point2D;
use opencv::core::Point;

/// Clamp and convert f64 to i32 for pixel coordinates
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
pub fn f64_to_i32_clamp(value: f64, min: i32, max: i32) -> i32 {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };

    if !value.is_finite() {
        return min;
    }

    let clamped = value.clamp(f64::from(min), f64::from(max));
    (clamped as i32).clamp(min, max)
}

/// Map a normalized landmark to a pixel position inside a `width` x `height` image.
///
/// Positions outside the frame are clamped to its border, non-finite ones to the origin.
#[must_use]
pub fn normalized_to_pixel(point: Point2D, width: i32, height: i32) -> Point {
    let max_x = (width - 1).max(0);
    let max_y = (height - 1).max(0);
    Point::new(
        f64_to_i32_clamp(point.x * f64::from(width), 0, max_x),
        f64_to_i32_clamp(point.y * f64::from(height), 0, max_y),
    )
}
