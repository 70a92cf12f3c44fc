use tracing::warn;

use super::Site;
use crate::math::{BoundingBox, LineSegment2D, Point2D};

/// Perpendicular bisector between two sites, traced by the sweep.
///
/// Each Voronoi vertex found on the bisector is stored with the third site
/// of the circle event that produced it. The remaining ray of a half-bounded
/// bisector points away from that site.
#[derive(Debug, Clone)]
pub struct Bisector {
    left: Site,
    right: Site,
    ends: Vec<(Point2D, Site)>,
}

impl Bisector {
    #[must_use]
    pub fn new(left: Site, right: Site) -> Self {
        Self {
            left,
            right,
            ends: Vec::with_capacity(2),
        }
    }

    /// The pair of sites, ordered by id.
    #[must_use]
    pub fn sites(&self) -> (Site, Site) {
        if self.left.id <= self.right.id {
            (self.left, self.right)
        } else {
            (self.right, self.left)
        }
    }

    /// Connects the bisector to a Voronoi vertex.
    ///
    /// A bisector has at most two. Cocircular sites connect both ends to the
    /// same vertex, which leaves a degenerate bisector.
    pub fn connect(&mut self, vertex: Point2D, opposite: Site) {
        if self.ends.len() == 2 {
            warn!(%vertex, left = %self.left, right = %self.right, "bisector already bounded");
            return;
        }
        self.ends.push((vertex, opposite));
    }

    /// Connected Voronoi vertices.
    pub fn ends(&self) -> impl Iterator<Item = Point2D> + '_ {
        self.ends.iter().map(|(p, _)| *p)
    }

    /// `true` once both ends are connected.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.ends.len() == 2
    }

    /// `true` if both ends are the same vertex.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        matches!(self.ends.as_slice(), [(a, _), (b, _)] if a == b)
    }

    /// Direction of the bisector line, perpendicular to `right - left`.
    fn direction(&self) -> (f64, f64) {
        let (a, b) = (self.left.point, self.right.point);
        (a.y - b.y, b.x - a.x)
    }

    /// The part of the bisector inside `bounds`.
    ///
    /// Returns `None` when the bisector misses the rectangle.
    #[must_use]
    pub fn clip(&self, bounds: &BoundingBox) -> Option<LineSegment2D> {
        let direction = self.direction();
        let clipped = match self.ends.as_slice() {
            [(a, _), (b, _)] => bounds.clip_line(a, (b.x - a.x, b.y - a.y), 0.0, 1.0),
            [(vertex, opposite)] => {
                let (dx, dy) = direction;
                let to_opposite = (
                    opposite.point.x - self.left.point.x,
                    opposite.point.y - self.left.point.y,
                );
                let sign = if dx * to_opposite.0 + dy * to_opposite.1 < 0.0 {
                    1.0
                } else {
                    -1.0
                };
                bounds.clip_line(vertex, (sign * dx, sign * dy), 0.0, f64::INFINITY)
            }
            _ => {
                let midpoint = self.left.point.midpoint(&self.right.point);
                bounds.clip_line(&midpoint, direction, f64::NEG_INFINITY, f64::INFINITY)
            }
        };
        clipped.map(|(a, b)| LineSegment2D::new(a, b))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn bounds() -> BoundingBox {
        BoundingBox::from_corners(Point2D::new(0.0, 10.0), Point2D::new(10.0, 0.0)).unwrap()
    }

    fn same_segment(actual: &LineSegment2D, a: Point2D, b: Point2D) -> bool {
        (actual.start() == a && actual.end() == b) || (actual.start() == b && actual.end() == a)
    }

    #[test]
    fn unconnected_bisector_is_a_full_line() {
        let left = Site::new(0, Point2D::new(2.0, 5.0));
        let right = Site::new(1, Point2D::new(6.0, 5.0));
        let bisector = Bisector::new(left, right);
        assert!(!bisector.is_bounded());
        let segment = bisector.clip(&bounds()).unwrap();
        assert!(same_segment(
            &segment,
            Point2D::new(4.0, 0.0),
            Point2D::new(4.0, 10.0)
        ));
    }

    #[test]
    fn half_bounded_bisector_points_away_from_opposite_site() {
        let left = Site::new(0, Point2D::new(2.0, 2.0));
        let right = Site::new(1, Point2D::new(6.0, 2.0));
        let opposite = Site::new(2, Point2D::new(4.0, 8.0));
        let mut bisector = Bisector::new(left, right);
        bisector.connect(Point2D::new(4.0, 5.0), opposite);
        let segment = bisector.clip(&bounds()).unwrap();
        assert_eq!(segment.start(), Point2D::new(4.0, 5.0));
        assert_eq!(segment.end(), Point2D::new(4.0, 0.0));

        // Swapping the sites flips the line direction but not the ray.
        let mut swapped = Bisector::new(right, left);
        swapped.connect(Point2D::new(4.0, 5.0), opposite);
        assert_eq!(swapped.clip(&bounds()).unwrap().end(), Point2D::new(4.0, 0.0));
    }

    #[test]
    fn bounded_bisector_is_clipped_segment() {
        let left = Site::new(0, Point2D::new(2.0, 5.0));
        let right = Site::new(1, Point2D::new(6.0, 5.0));
        let mut bisector = Bisector::new(left, right);
        bisector.connect(Point2D::new(4.0, 2.0), Site::new(2, Point2D::new(4.0, -1.0)));
        assert!(!bisector.is_bounded());
        bisector.connect(Point2D::new(4.0, 14.0), Site::new(3, Point2D::new(4.0, 20.0)));
        bisector.connect(Point2D::new(4.0, 30.0), Site::new(4, Point2D::new(4.0, 40.0)));
        assert!(bisector.is_bounded());
        assert!(!bisector.is_degenerate());
        assert_eq!(bisector.ends().count(), 2);

        let segment = bisector.clip(&bounds()).unwrap();
        assert!(same_segment(
            &segment,
            Point2D::new(4.0, 2.0),
            Point2D::new(4.0, 10.0)
        ));
    }

    #[test]
    fn bisector_closed_at_one_vertex_is_degenerate() {
        let left = Site::new(0, Point2D::new(2.0, 2.0));
        let right = Site::new(1, Point2D::new(8.0, 8.0));
        let mut bisector = Bisector::new(left, right);
        bisector.connect(Point2D::new(5.0, 5.0), Site::new(2, Point2D::new(2.0, 8.0)));
        bisector.connect(Point2D::new(5.0, 5.0), Site::new(3, Point2D::new(8.0, 2.0)));
        assert!(bisector.is_degenerate());
        assert!(bisector.clip(&bounds()).is_none());
    }

    #[test]
    fn bisector_outside_bounds_is_dropped() {
        let left = Site::new(0, Point2D::new(20.0, 0.0));
        let right = Site::new(1, Point2D::new(30.0, 0.0));
        let mut bisector = Bisector::new(left, right);
        bisector.connect(Point2D::new(25.0, 3.0), Site::new(2, Point2D::new(25.0, 10.0)));
        assert!(bisector.clip(&bounds()).is_none());
    }
}
