use std::fmt;

use super::{Matrix2x2, Point2D, Vector2, EPSILON};

/// A directed line segment.
///
/// Equality is endpoint-wise with [`Point2D`] tolerance; a segment is not
/// equal to its reverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment2D {
    start: Point2D,
    end: Point2D,
}

impl LineSegment2D {
    #[must_use]
    pub const fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn start(&self) -> Point2D {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> Point2D {
        self.end
    }

    /// The same segment traversed the other way.
    #[must_use]
    pub const fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Direction angle of `end - start` in `(-pi, pi]`.
    #[must_use]
    pub fn angle(&self) -> f64 {
        (self.end.y - self.start.y).atan2(self.end.x - self.start.x)
    }

    /// Returns `true` if both endpoints coincide.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Parametric intersection with `other`.
    ///
    /// Solves `start + t * (end - start) = other.start + u * (other.end - other.start)`
    /// and accepts the solution only when both `t` and `u` lie in `[0, 1]`.
    /// Parallel and collinear segments yield `None`.
    #[must_use]
    pub fn intersection_with(&self, other: &Self) -> Option<Point2D> {
        let (d1x, d1y) = (self.end.x - self.start.x, self.end.y - self.start.y);
        let (d2x, d2y) = (other.end.x - other.start.x, other.end.y - other.start.y);
        let system = Matrix2x2::new(d1x, -d2x, d1y, -d2y);
        let rhs = Vector2::new(other.start.x - self.start.x, other.start.y - self.start.y);
        let (t, u) = system.solve(&rhs)?;
        if !in_unit_range(t) || !in_unit_range(u) {
            return None;
        }
        let t = t.clamp(0.0, 1.0);
        Some(Point2D::new(self.start.x + t * d1x, self.start.y + t * d1y))
    }

    /// Returns `true` if the segments touch anywhere, endpoints and collinear
    /// overlaps included.
    #[must_use]
    pub fn intersects_with(&self, other: &Self) -> bool {
        self.intersection_with(other).is_some()
            || self.is_point_on(&other.start)
            || self.is_point_on(&other.end)
            || other.is_point_on(&self.start)
            || other.is_point_on(&self.end)
    }

    /// Intersection with the horizontal line `y = y`.
    ///
    /// Horizontal segments have no single intersection and yield `None`.
    #[must_use]
    pub fn intersects_horizontal(&self, y: f64) -> Option<Point2D> {
        let dy = self.end.y - self.start.y;
        if dy.abs() < EPSILON {
            return None;
        }
        let t = (y - self.start.y) / dy;
        if !in_unit_range(t) {
            return None;
        }
        let t = t.clamp(0.0, 1.0);
        Some(Point2D::new(self.start.x + t * (self.end.x - self.start.x), y))
    }

    /// Returns `true` if `p` lies on the segment, endpoints included.
    #[must_use]
    pub fn is_point_on(&self, p: &Point2D) -> bool {
        let (dx, dy) = (self.end.x - self.start.x, self.end.y - self.start.y);
        let len_sq = dx * dx + dy * dy;
        if len_sq < EPSILON * EPSILON {
            return self.start == *p;
        }
        let (px, py) = (p.x - self.start.x, p.y - self.start.y);
        let cross = dx * py - dy * px;
        if cross.abs() / len_sq.sqrt() >= EPSILON {
            return false;
        }
        let t = (dx * px + dy * py) / len_sq;
        in_unit_range(t) || self.start == *p || self.end == *p
    }

    /// Returns `true` if `p` lies on the segment but is neither endpoint.
    #[must_use]
    pub fn is_point_inside(&self, p: &Point2D) -> bool {
        self.is_point_on(p) && self.start != *p && self.end != *p
    }

    /// Returns `true` if the segment crosses the horizontal ray that leaves
    /// `p` towards negative x.
    ///
    /// Uses the half-open rule: an endpoint counts only when the other
    /// endpoint lies strictly below the ray, so a ray through a shared vertex
    /// is counted once and horizontal segments never count.
    #[must_use]
    pub fn intersects_with_left_ray_from(&self, p: &Point2D) -> bool {
        let (a, b) = (self.start, self.end);
        if (a.y > p.y) == (b.y > p.y) {
            return false;
        }
        let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
        x < p.x
    }

    /// Returns `true` if the segments share at least one endpoint.
    #[must_use]
    pub fn shares_endpoint(&self, other: &Self) -> bool {
        self.start == other.start
            || self.start == other.end
            || self.end == other.start
            || self.end == other.end
    }

    /// Point on the supporting line at abscissa `x`; `None` for vertical
    /// segments.
    #[must_use]
    pub fn evaluate(&self, x: f64) -> Option<Point2D> {
        let dx = self.end.x - self.start.x;
        if dx.abs() < EPSILON {
            return None;
        }
        let slope = (self.end.y - self.start.y) / dx;
        Some(Point2D::new(x, self.start.y + slope * (x - self.start.x)))
    }

    /// Projection parameter of `p` onto the supporting line
    /// (`0` at `start`, `1` at `end`).
    #[must_use]
    pub fn parameter_of(&self, p: &Point2D) -> f64 {
        let (dx, dy) = (self.end.x - self.start.x, self.end.y - self.start.y);
        let len_sq = dx * dx + dy * dy;
        if len_sq < EPSILON * EPSILON {
            return 0.0;
        }
        ((p.x - self.start.x) * dx + (p.y - self.start.y) * dy) / len_sq
    }
}

impl fmt::Display for LineSegment2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)
    }
}

fn in_unit_range(t: f64) -> bool {
    (-EPSILON..=1.0 + EPSILON).contains(&t)
}
