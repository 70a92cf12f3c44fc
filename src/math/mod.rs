pub mod bounding_box;
pub mod circle;
pub mod matrix;
pub mod point;
pub mod polygon_2d;
pub mod segment;
pub mod vector;

pub use bounding_box::BoundingBox;
pub use circle::Circle;
pub use matrix::Matrix2x2;
pub use point::{Point2D, PointMap};
pub use segment::LineSegment2D;
pub use vector::Vector;

/// nalgebra 2D point, used at the boundary with linear-algebra code.
pub type Point2 = nalgebra::Point2<f64>;

/// nalgebra 2D vector.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
///
/// Every primitive classifies "on" versus "strictly inside/outside" with this
/// one value.
pub const EPSILON: f64 = 1e-9;

/// Returns `true` if `a` and `b` differ by less than [`EPSILON`].
#[must_use]
pub fn are_close(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_values() {
        assert!(are_close(1.0, 1.0 + EPSILON / 2.0));
        assert!(!are_close(1.0, 1.0 + EPSILON * 2.0));
        assert!(are_close(0.0, -0.0));
    }
}
