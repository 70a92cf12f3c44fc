use super::{LineSegment2D, Point2D, EPSILON};
use crate::error::{GeometryError, Result};

/// Axis-aligned rectangle in a y-up frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point2D,
    pub max: Point2D,
}

impl BoundingBox {
    /// Builds the box from its upper-left and lower-right corners.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidBounds` unless `upper_left` lies strictly
    /// left of and above `lower_right`.
    pub fn from_corners(upper_left: Point2D, lower_right: Point2D) -> Result<Self> {
        if upper_left.x >= lower_right.x - EPSILON || upper_left.y <= lower_right.y + EPSILON {
            return Err(GeometryError::InvalidBounds {
                upper_left,
                lower_right,
            }
            .into());
        }
        Ok(Self {
            min: Point2D::new(upper_left.x, lower_right.y),
            max: Point2D::new(lower_right.x, upper_left.y),
        })
    }

    /// Smallest box enclosing `points`, or `None` for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Point2D]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = Self {
            min: *first,
            max: *first,
        };
        for p in &points[1..] {
            bbox.min.x = bbox.min.x.min(p.x);
            bbox.min.y = bbox.min.y.min(p.y);
            bbox.max.x = bbox.max.x.max(p.x);
            bbox.max.y = bbox.max.y.max(p.y);
        }
        Some(bbox)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[must_use]
    pub fn center(&self) -> Point2D {
        self.min.midpoint(&self.max)
    }

    /// Corners clockwise from the upper left: upper left, upper right, lower
    /// right, lower left.
    #[must_use]
    pub fn corners(&self) -> [Point2D; 4] {
        [
            Point2D::new(self.min.x, self.max.y),
            self.max,
            Point2D::new(self.max.x, self.min.y),
            self.min,
        ]
    }

    /// The four sides, following [`Self::corners`].
    #[must_use]
    pub fn edges(&self) -> [LineSegment2D; 4] {
        let c = self.corners();
        [
            LineSegment2D::new(c[0], c[1]),
            LineSegment2D::new(c[1], c[2]),
            LineSegment2D::new(c[2], c[3]),
            LineSegment2D::new(c[3], c[0]),
        ]
    }

    /// Returns `true` if `p` lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, p: &Point2D) -> bool {
        p.x >= self.min.x - EPSILON
            && p.x <= self.max.x + EPSILON
            && p.y >= self.min.y - EPSILON
            && p.y <= self.max.y + EPSILON
    }

    /// Returns `true` if `p` lies on one of the four sides.
    #[must_use]
    pub fn on_boundary(&self, p: &Point2D) -> bool {
        self.contains(p)
            && ((p.x - self.min.x).abs() < EPSILON
                || (p.x - self.max.x).abs() < EPSILON
                || (p.y - self.min.y).abs() < EPSILON
                || (p.y - self.max.y).abs() < EPSILON)
    }

    /// Clips the parametric line `origin + t * direction`, `t` in
    /// `[t_min, t_max]`, to the box (Liang-Barsky).
    ///
    /// Infinite parameter limits describe rays and full lines. Returns the
    /// clipped endpoints in parameter order, or `None` when nothing of
    /// positive length remains inside.
    #[must_use]
    pub fn clip_line(
        &self,
        origin: &Point2D,
        direction: (f64, f64),
        t_min: f64,
        t_max: f64,
    ) -> Option<(Point2D, Point2D)> {
        let (dx, dy) = direction;
        let (mut lo, mut hi) = (t_min, t_max);
        let checks = [
            (-dx, origin.x - self.min.x),
            (dx, self.max.x - origin.x),
            (-dy, origin.y - self.min.y),
            (dy, self.max.y - origin.y),
        ];
        for (p, q) in checks {
            if p.abs() < EPSILON {
                if q < -EPSILON {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                lo = lo.max(r);
            } else {
                hi = hi.min(r);
            }
        }
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return None;
        }
        let a = Point2D::new(origin.x + lo * dx, origin.y + lo * dy);
        let b = Point2D::new(origin.x + hi * dx, origin.y + hi * dy);
        if a == b {
            return None;
        }
        Some((a, b))
    }

    /// Clips a segment to the box.
    #[must_use]
    pub fn clip_segment(&self, segment: &LineSegment2D) -> Option<LineSegment2D> {
        let (s, e) = (segment.start(), segment.end());
        self.clip_line(&s, (e.x - s.x, e.y - s.y), 0.0, 1.0)
            .map(|(a, b)| LineSegment2D::new(a, b))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn unit_box() -> BoundingBox {
        BoundingBox::from_corners(Point2D::new(0.0, 10.0), Point2D::new(10.0, 0.0)).unwrap()
    }

    #[test]
    fn rejects_inverted_corners() {
        assert!(BoundingBox::from_corners(Point2D::new(10.0, 0.0), Point2D::new(0.0, 10.0)).is_err());
        assert!(BoundingBox::from_corners(Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0)).is_err());
    }

    #[test]
    fn corners_are_clockwise_from_upper_left() {
        let c = unit_box().corners();
        assert_eq!(c[0], Point2D::new(0.0, 10.0));
        assert_eq!(c[1], Point2D::new(10.0, 10.0));
        assert_eq!(c[2], Point2D::new(10.0, 0.0));
        assert_eq!(c[3], Point2D::new(0.0, 0.0));
    }

    #[test]
    fn extent_and_center() {
        let b = BoundingBox::from_points(&[Point2D::new(2.0, 1.0), Point2D::new(-2.0, 5.0)]).unwrap();
        assert_eq!(b.width(), 4.0);
        assert_eq!(b.height(), 4.0);
        assert_eq!(b.center(), Point2D::new(0.0, 3.0));
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn containment_and_boundary() {
        let b = unit_box();
        assert!(b.contains(&Point2D::new(5.0, 5.0)));
        assert!(b.contains(&Point2D::new(10.0, 5.0)));
        assert!(!b.contains(&Point2D::new(10.5, 5.0)));
        assert!(b.on_boundary(&Point2D::new(10.0, 5.0)));
        assert!(!b.on_boundary(&Point2D::new(5.0, 5.0)));
    }

    #[test]
    fn clip_full_line() {
        let (a, b) = unit_box()
            .clip_line(
                &Point2D::new(5.0, 5.0),
                (1.0, 0.0),
                f64::NEG_INFINITY,
                f64::INFINITY,
            )
            .unwrap();
        assert_eq!(a, Point2D::new(0.0, 5.0));
        assert_eq!(b, Point2D::new(10.0, 5.0));
    }

    #[test]
    fn clip_ray_from_inside() {
        let (a, b) = unit_box()
            .clip_line(&Point2D::new(5.0, 5.0), (1.0, 1.0), 0.0, f64::INFINITY)
            .unwrap();
        assert_eq!(a, Point2D::new(5.0, 5.0));
        assert_eq!(b, Point2D::new(10.0, 10.0));
    }

    #[test]
    fn clip_ray_from_outside_entering() {
        let (a, b) = unit_box()
            .clip_line(&Point2D::new(-5.0, 5.0), (1.0, 0.0), 0.0, f64::INFINITY)
            .unwrap();
        assert_eq!(a, Point2D::new(0.0, 5.0));
        assert_eq!(b, Point2D::new(10.0, 5.0));
    }

    #[test]
    fn clip_misses() {
        let b = unit_box();
        assert!(b
            .clip_line(&Point2D::new(-5.0, 5.0), (-1.0, 0.0), 0.0, f64::INFINITY)
            .is_none());
        assert!(b
            .clip_line(&Point2D::new(-5.0, 20.0), (1.0, 0.0), f64::NEG_INFINITY, f64::INFINITY)
            .is_none());
    }

    #[test]
    fn clip_segment_partially_inside() {
        let s = LineSegment2D::new(Point2D::new(5.0, 5.0), Point2D::new(15.0, 5.0));
        let clipped = unit_box().clip_segment(&s).unwrap();
        assert_eq!(clipped.end(), Point2D::new(10.0, 5.0));
    }
}
