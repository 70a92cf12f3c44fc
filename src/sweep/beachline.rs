use std::fmt;

use super::Site;
use crate::math::{are_close, Point2D};

/// Height of the parabola with `focus` and directrix `y = sweep_y` at `x`.
fn parabola_y(focus: &Point2D, x: f64, sweep_y: f64) -> f64 {
    let dx = x - focus.x;
    (dx * dx + focus.y * focus.y - sweep_y * sweep_y) / (2.0 * (focus.y - sweep_y))
}

/// Breakpoint between the arc of `p1` (on the left) and the arc of `p2` (on
/// the right) for a sweep line at `sweep_y`.
///
/// The breakpoint is equidistant from both sites and the sweep line. The two
/// parabolas meet twice; the arc of the site further from the sweep line is
/// the wider one, so when `p1` is lower the left intersection separates the
/// arcs and otherwise the right one does. Sites at equal height meet at the
/// midpoint x. A site lying on the sweep line has a degenerate, vertical arc
/// at its own x; if both do, the breakpoint is reported at the sweep line.
#[must_use]
pub fn compute_breakpoint(p1: &Point2D, p2: &Point2D, sweep_y: f64) -> Point2D {
    let p1_on_sweep = are_close(p1.y, sweep_y);
    let p2_on_sweep = are_close(p2.y, sweep_y);
    match (p1_on_sweep, p2_on_sweep) {
        (true, true) => return Point2D::new((p1.x + p2.x) / 2.0, sweep_y),
        (true, false) => return Point2D::new(p1.x, parabola_y(p2, p1.x, sweep_y)),
        (false, true) => return Point2D::new(p2.x, parabola_y(p1, p2.x, sweep_y)),
        (false, false) => {}
    }

    if are_close(p1.y, p2.y) {
        let x = (p1.x + p2.x) / 2.0;
        return Point2D::new(x, parabola_y(p1, x, sweep_y));
    }

    // Equate both parabolas: a x^2 + b x + c = 0.
    let d1 = 2.0 * (p1.y - sweep_y);
    let d2 = 2.0 * (p2.y - sweep_y);
    let k1 = p1.x * p1.x + p1.y * p1.y - sweep_y * sweep_y;
    let k2 = p2.x * p2.x + p2.y * p2.y - sweep_y * sweep_y;
    let a = d2 - d1;
    let b = 2.0 * (p2.x * d1 - p1.x * d2);
    let c = k1 * d2 - k2 * d1;

    let root = (b * b - 4.0 * a * c).max(0.0).sqrt();
    let r1 = (-b - root) / (2.0 * a);
    let r2 = (-b + root) / (2.0 * a);
    let x = if p1.y < p2.y { r1.min(r2) } else { r1.max(r2) };
    Point2D::new(x, parabola_y(p1, x, sweep_y))
}

/// An arc of the beachline: its site and its current position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeachLineEntry {
    pub index: usize,
    pub site: Site,
}

impl BeachLineEntry {
    #[must_use]
    pub const fn new(index: usize, site: Site) -> Self {
        Self { index, site }
    }
}

impl fmt::Display for BeachLineEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} at index {})", self.site, self.index)
    }
}

/// Ordered sequence of arcs, left to right.
///
/// A site may own several arcs. Breakpoints are implicit between neighbours
/// and are recomputed for the sweep height at hand.
#[derive(Debug, Clone)]
pub struct Beachline {
    arcs: Vec<Site>,
}

impl Beachline {
    /// Creates a beachline holding the arc of the first site.
    #[must_use]
    pub fn new(first: Site) -> Self {
        Self { arcs: vec![first] }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Site> {
        self.arcs.get(index).copied()
    }

    /// The arc directly above `point` when the sweep line is at `sweep_y`.
    ///
    /// Binary search on the breakpoints to either side of the probed arc.
    /// A point exactly on a breakpoint resolves to one of the two arcs it
    /// separates.
    #[must_use]
    pub fn search(&self, sweep_y: f64, point: &Point2D) -> BeachLineEntry {
        let (mut lo, mut hi) = (0, self.arcs.len().saturating_sub(1));
        loop {
            if lo >= hi {
                return BeachLineEntry::new(lo, self.arcs[lo]);
            }
            let mid = (lo + hi) / 2;
            let arc = self.arcs[mid];
            let left = if mid > 0 {
                compute_breakpoint(&self.arcs[mid - 1].point, &arc.point, sweep_y).x
            } else {
                f64::NEG_INFINITY
            };
            let right = if mid + 1 < self.arcs.len() {
                compute_breakpoint(&arc.point, &self.arcs[mid + 1].point, sweep_y).x
            } else {
                f64::INFINITY
            };

            if point.x < left {
                hi = mid.saturating_sub(1).max(lo);
            } else if point.x > right {
                lo = mid + 1;
            } else {
                return BeachLineEntry::new(mid, arc);
            }
        }
    }

    /// Splits `existing` into `[existing, site, existing]` and returns the
    /// entry of the new arc.
    pub fn insert_and_split(&mut self, existing: &BeachLineEntry, site: Site) -> BeachLineEntry {
        let index = existing.index + 1;
        self.arcs.insert(index, site);
        self.arcs.insert(index + 1, existing.site);
        BeachLineEntry::new(index, site)
    }

    /// Inserts the arc of `site` next to `existing` without splitting it.
    ///
    /// Used while the arc above the new site is still a vertical ray, i.e.
    /// both sites lie on the sweep line.
    pub fn insert_beside(&mut self, existing: &BeachLineEntry, site: Site) -> BeachLineEntry {
        let index = if site.point.x > existing.site.point.x {
            existing.index + 1
        } else {
            existing.index
        };
        self.arcs.insert(index, site);
        BeachLineEntry::new(index, site)
    }

    /// Removes the arc at `entry.index` if it still belongs to `entry.site`.
    pub fn delete(&mut self, entry: &BeachLineEntry) -> Option<Site> {
        if self.arcs.get(entry.index) != Some(&entry.site) {
            return None;
        }
        Some(self.arcs.remove(entry.index))
    }

    /// The middle arc of the consecutive triple `(left, center, right)`.
    ///
    /// A triple occurs at most once on the beachline.
    #[must_use]
    pub fn find_arc_in_middle(&self, triple: &[Site; 3]) -> Option<BeachLineEntry> {
        self.arcs
            .windows(3)
            .position(|w| *w == triple[..])
            .map(|i| BeachLineEntry::new(i + 1, self.arcs[i + 1]))
    }

    /// The consecutive triple whose left arc is at `start`.
    #[must_use]
    pub fn triple_at(&self, start: usize) -> Option<[Site; 3]> {
        match self.arcs.get(start..start + 3) {
            Some(&[a, b, c]) => Some([a, b, c]),
            _ => None,
        }
    }

    /// Every consecutive triple, left to right.
    pub fn triples(&self) -> impl Iterator<Item = [Site; 3]> + '_ {
        self.arcs.windows(3).map(|w| [w[0], w[1], w[2]])
    }
}

impl fmt::Display for Beachline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.arcs.iter().map(ToString::to_string).collect();
        write!(f, "<{}>", parts.join(", "))
    }
}
