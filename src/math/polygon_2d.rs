use super::{Point2D, EPSILON};

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(points: &[Point2D]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Area centroid of a closed polygon.
///
/// Returns `None` for polygons whose area is below [`EPSILON`].
#[must_use]
pub fn polygon_centroid(points: &[Point2D]) -> Option<Point2D> {
    let area = signed_area(points);
    if area.abs() < EPSILON {
        return None;
    }
    let n = points.len();
    let (mut cx, mut cy) = (0.0, 0.0);
    for i in 0..n {
        let (p, q) = (points[i], points[(i + 1) % n]);
        let cross = p.x * q.y - q.x * p.y;
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
    }
    let factor = 1.0 / (6.0 * area);
    Some(Point2D::new(cx * factor, cy * factor))
}

/// Counter-clockwise angle of `to - from`, normalized to `[0, 2 pi)`.
#[must_use]
pub fn direction_angle(from: &Point2D, to: &Point2D) -> f64 {
    let a = (to.y - from.y).atan2(to.x - from.x);
    if a < 0.0 {
        a + std::f64::consts::TAU
    } else {
        a
    }
}
