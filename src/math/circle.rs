use super::{Matrix2x2, Point2D, Vector2};

/// A circle given by center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point2D,
    pub radius: f64,
}

impl Circle {
    /// The circle through three points, or `None` if they are (near-)collinear.
    ///
    /// The center solves the two perpendicular-bisector equations
    /// `2 (b - a) . c = |b|^2 - |a|^2` and `2 (c - a) . c = |c|^2 - |a|^2`.
    #[must_use]
    pub fn through(a: &Point2D, b: &Point2D, c: &Point2D) -> Option<Self> {
        let system = Matrix2x2::new(
            2.0 * (b.x - a.x),
            2.0 * (b.y - a.y),
            2.0 * (c.x - a.x),
            2.0 * (c.y - a.y),
        );
        let norm_a = a.x * a.x + a.y * a.y;
        let rhs = Vector2::new(
            b.x * b.x + b.y * b.y - norm_a,
            c.x * c.x + c.y * c.y - norm_a,
        );
        let (x, y) = system.solve(&rhs)?;
        let center = Point2D::new(x, y);
        Some(Self {
            center,
            radius: center.distance_to(a),
        })
    }

    /// Highest point of the circle.
    #[must_use]
    pub fn top(&self) -> Point2D {
        Point2D::new(self.center.x, self.center.y + self.radius)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn circle_through_three_points() {
        let c = Circle::through(
            &Point2D::new(1.0, 0.0),
            &Point2D::new(0.0, 1.0),
            &Point2D::new(-1.0, 0.0),
        )
        .unwrap();
        assert_eq!(c.center, Point2D::new(0.0, 0.0));
        assert_relative_eq!(c.radius, 1.0);
        assert_eq!(c.top(), Point2D::new(0.0, 1.0));
    }

    #[test]
    fn collinear_points_have_no_circle() {
        assert!(Circle::through(
            &Point2D::new(0.0, 0.0),
            &Point2D::new(1.0, 1.0),
            &Point2D::new(2.0, 2.0),
        )
        .is_none());
    }
}
