use std::collections::HashMap;
use std::fmt;

use super::{are_close, Point2, EPSILON};

/// A point in the plane.
///
/// Equality is tolerant: two points are equal when both coordinates differ by
/// less than [`EPSILON`]. Because tolerant equality is not transitive the type
/// does not implement `Hash`; use [`PointMap`] to key data by location.
#[derive(Debug, Clone, Copy, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the point halfway between `self` and `other`.
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl PartialEq for Point2D {
    fn eq(&self, other: &Self) -> bool {
        are_close(self.x, other.x) && are_close(self.y, other.y)
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<Point2> for Point2D {
    fn from(p: Point2) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Point2D> for Point2 {
    fn from(p: Point2D) -> Self {
        Point2::new(p.x, p.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

type CellKey = (i64, i64);

/// A map keyed by location with the same tolerance as [`Point2D`] equality.
///
/// Points are bucketed on a grid whose cells are [`EPSILON`] wide. Two points
/// that compare equal are never more than one cell apart, so a lookup probes
/// the 3x3 block of cells around the query and compares candidates exactly
/// the way `Point2D::eq` does.
#[derive(Debug, Clone)]
pub struct PointMap<V> {
    cells: HashMap<CellKey, Vec<(Point2D, V)>>,
    len: usize,
}

impl<V> Default for PointMap<V> {
    fn default() -> Self {
        Self {
            cells: HashMap::new(),
            len: 0,
        }
    }
}

impl<V> PointMap<V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the value stored for a point equal to `p`.
    #[must_use]
    pub fn get(&self, p: &Point2D) -> Option<&V> {
        let (key, i) = self.locate(p)?;
        self.cells.get(&key).map(|bucket| &bucket[i].1)
    }

    /// Returns the stored key point equal to `p`, as originally inserted.
    #[must_use]
    pub fn get_key(&self, p: &Point2D) -> Option<Point2D> {
        let (key, i) = self.locate(p)?;
        self.cells.get(&key).map(|bucket| bucket[i].0)
    }

    /// Returns a mutable reference to the value stored for `p`.
    pub fn get_mut(&mut self, p: &Point2D) -> Option<&mut V> {
        let (key, i) = self.locate(p)?;
        self.cells.get_mut(&key).map(|bucket| &mut bucket[i].1)
    }

    /// Returns `true` if a point equal to `p` is present.
    #[must_use]
    pub fn contains_key(&self, p: &Point2D) -> bool {
        self.locate(p).is_some()
    }

    /// Inserts `value` at `p`.
    ///
    /// If an equal point is already present its value is replaced (the stored
    /// key keeps its original coordinates) and the old value is returned.
    pub fn insert(&mut self, p: Point2D, value: V) -> Option<V> {
        if let Some((key, i)) = self.locate(&p) {
            if let Some(bucket) = self.cells.get_mut(&key) {
                return Some(std::mem::replace(&mut bucket[i].1, value));
            }
        }
        self.cells.entry(cell_of(&p)).or_default().push((p, value));
        self.len += 1;
        None
    }

    /// Removes the entry equal to `p`, returning its value.
    pub fn remove(&mut self, p: &Point2D) -> Option<V> {
        let (key, i) = self.locate(p)?;
        let bucket = self.cells.get_mut(&key)?;
        let (_, value) = bucket.swap_remove(i);
        if bucket.is_empty() {
            self.cells.remove(&key);
        }
        self.len -= 1;
        Some(value)
    }

    /// Iterates over all entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&Point2D, &V)> {
        self.cells
            .values()
            .flat_map(|bucket| bucket.iter().map(|(p, v)| (p, v)))
    }

    /// Iterates over all values in unspecified order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    fn locate(&self, p: &Point2D) -> Option<(CellKey, usize)> {
        let (cx, cy) = cell_of(p);
        for dx in -1..=1_i64 {
            for dy in -1..=1_i64 {
                let key = (cx.saturating_add(dx), cy.saturating_add(dy));
                if let Some(bucket) = self.cells.get(&key) {
                    if let Some(i) = bucket.iter().position(|(q, _)| q == p) {
                        return Some((key, i));
                    }
                }
            }
        }
        None
    }
}

#[allow(clippy::cast_possible_truncation)]
fn cell_of(p: &Point2D) -> CellKey {
    // Saturating float-to-int casts: far-away points share edge cells,
    // which only costs lookup time.
    ((p.x / EPSILON).floor() as i64, (p.y / EPSILON).floor() as i64)
}
