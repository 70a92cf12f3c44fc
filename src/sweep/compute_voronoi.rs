use std::collections::{BTreeMap, HashMap};

use tracing::{debug, trace, warn};

use super::{BeachLineEntry, Beachline, Bisector, Event, EventId, EventQueue, Site};
use crate::dcel::Dcel;
use crate::error::{Result, SweepError};
use crate::math::{
    are_close, BoundingBox, Circle, LineSegment2D, Point2D, PointMap, Vector, EPSILON,
};

/// Computes the Voronoi diagram of a set of sites inside a rectangle.
///
/// Sites closer than [`EPSILON`] to an earlier site are ignored. The result
/// has one interior face per distinct site.
pub struct ComputeVoronoi {
    upper_left: Point2D,
    lower_right: Point2D,
    sites: Vec<Point2D>,
}

impl ComputeVoronoi {
    /// Creates a new `ComputeVoronoi` operation.
    #[must_use]
    pub fn new(upper_left: Point2D, lower_right: Point2D, sites: &[Point2D]) -> Self {
        Self {
            upper_left,
            lower_right,
            sites: sites.to_vec(),
        }
    }

    /// Runs the sweep and builds the subdivision.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidBounds` for inverted corners,
    /// `SweepError::NoSites` for an empty site list and
    /// `SweepError::SiteOutOfBounds` for a site outside the rectangle.
    pub fn execute(&self) -> Result<Dcel> {
        let segments = self.segments()?;
        Dcel::from_segments(self.upper_left, self.lower_right, &segments)
    }

    /// Runs the sweep and returns the Voronoi edges clipped to the rectangle.
    ///
    /// # Errors
    ///
    /// Same as [`ComputeVoronoi::execute`].
    pub fn segments(&self) -> Result<Vec<LineSegment2D>> {
        let bounds = BoundingBox::from_corners(self.upper_left, self.lower_right)?;
        let sites = self.distinct_sites(&bounds)?;

        let mut queue = EventQueue::new();
        for site in &sites {
            queue.push(Event::Site(*site));
        }
        let Some((_, Event::Site(first))) = queue.pop() else {
            return Err(SweepError::NoSites.into());
        };

        let mut sweep = Sweep::new(first, queue);
        sweep.run()?;
        debug!(
            sites = sites.len(),
            bisectors = sweep.bisectors.len(),
            "sweep finished"
        );

        let mut segments = Vec::with_capacity(sweep.bisectors.len());
        for bisector in sweep.bisectors.values() {
            let (a, b) = bisector.sites();
            match bisector.clip(&bounds) {
                Some(segment) => segments.push(segment),
                None if bisector.is_degenerate() => {
                    trace!(%a, %b, "bisector collapsed to a vertex");
                }
                None => warn!(%a, %b, "bisector lies outside the bounds, dropped"),
            }
        }
        Ok(segments)
    }

    fn distinct_sites(&self, bounds: &BoundingBox) -> Result<Vec<Site>> {
        if self.sites.is_empty() {
            return Err(SweepError::NoSites.into());
        }
        let mut seen = PointMap::new();
        let mut sites = Vec::with_capacity(self.sites.len());
        for &point in &self.sites {
            if !bounds.contains(&point) {
                return Err(SweepError::SiteOutOfBounds(point).into());
            }
            if seen.contains_key(&point) {
                debug!(%point, "duplicate site ignored");
                continue;
            }
            seen.insert(point, sites.len());
            sites.push(Site::new(sites.len(), point));
        }
        Ok(sites)
    }
}

/// Computes the Voronoi diagram of `sites` inside the rectangle spanned by
/// `upper_left` and `lower_right`.
///
/// # Errors
///
/// See [`ComputeVoronoi::execute`].
pub fn compute_voronoi(
    upper_left: Point2D,
    lower_right: Point2D,
    sites: &[Point2D],
) -> Result<Dcel> {
    ComputeVoronoi::new(upper_left, lower_right, sites).execute()
}

type TripleKey = [usize; 3];

fn triple_key(triple: &[Site; 3]) -> TripleKey {
    [triple[0].id, triple[1].id, triple[2].id]
}

fn bisector_key(a: Site, b: Site) -> (usize, usize) {
    (a.id.min(b.id), a.id.max(b.id))
}

/// Transient state of one sweep.
struct Sweep {
    beachline: Beachline,
    queue: EventQueue,
    pending: HashMap<TripleKey, EventId>,
    bisectors: BTreeMap<(usize, usize), Bisector>,
}

impl Sweep {
    fn new(first: Site, queue: EventQueue) -> Self {
        Self {
            beachline: Beachline::new(first),
            queue,
            pending: HashMap::new(),
            bisectors: BTreeMap::new(),
        }
    }

    fn run(&mut self) -> Result<()> {
        while let Some((_, event)) = self.queue.pop() {
            let sweep_y = event.location().y;
            debug!(sweep_y, "sweep line advanced");
            match event {
                Event::Site(site) => self.handle_site(site)?,
                Event::Circle { triple, circle } => self.handle_circle(triple, &circle)?,
            }
        }
        Ok(())
    }

    fn handle_site(&mut self, site: Site) -> Result<()> {
        let sweep_y = site.point.y;
        let above = self.beachline.search(sweep_y, &site.point);

        // Triples broken up by the new arc.
        if let Some(start) = above.index.checked_sub(1) {
            self.forget(start);
        }
        let beside = are_close(above.site.point.y, sweep_y);
        if beside {
            if site.point.x > above.site.point.x {
                self.forget(above.index);
            } else if let Some(start) = above.index.checked_sub(2) {
                self.forget(start);
            }
        }

        let entry = if beside {
            self.beachline.insert_beside(&above, site)
        } else {
            self.beachline.insert_and_split(&above, site)
        };
        trace!(beachline = %self.beachline, "site inserted");
        if beside {
            self.open_beside(&entry);
        } else {
            self.bisector(above.site, site);
        }

        for start in entry.index.saturating_sub(2)..=entry.index {
            self.schedule(start, sweep_y)?;
        }
        Ok(())
    }

    fn handle_circle(&mut self, triple: [Site; 3], circle: &Circle) -> Result<()> {
        self.pending.remove(&triple_key(&triple));
        let Some(middle) = self.beachline.find_arc_in_middle(&triple) else {
            warn!(
                left = %triple[0],
                middle = %triple[1],
                right = %triple[2],
                "circle event for a triple no longer on the beachline"
            );
            return Ok(());
        };

        for start in middle.index.saturating_sub(2)..=middle.index {
            self.forget(start);
        }
        self.beachline.delete(&middle);

        let [left, center, right] = triple;
        let vertex = circle.center;
        trace!(%vertex, "voronoi vertex");
        self.bisector(left, center).connect(vertex, right);
        self.bisector(center, right).connect(vertex, left);
        self.bisector(left, right).connect(vertex, center);

        // `left` now sits at `middle.index - 1` and `right` at `middle.index`.
        let sweep_y = circle.top().y;
        if let Some(start) = middle.index.checked_sub(2) {
            self.schedule(start, sweep_y)?;
        }
        if let Some(start) = middle.index.checked_sub(1) {
            self.schedule(start, sweep_y)?;
        }
        Ok(())
    }

    /// Opens the bisectors of an arc inserted without a split.
    ///
    /// When the arc lands between two level arcs their bisector never got a
    /// vertex and is replaced by one on each side of the new arc.
    fn open_beside(&mut self, entry: &BeachLineEntry) {
        let left = entry
            .index
            .checked_sub(1)
            .and_then(|i| self.beachline.get(i));
        let right = self.beachline.get(entry.index + 1);
        if let (Some(l), Some(r)) = (left, right) {
            let key = bisector_key(l, r);
            if self.bisectors.get(&key).is_some_and(|b| b.ends().next().is_none()) {
                self.bisectors.remove(&key);
                trace!(left = %l, right = %r, "level bisector replaced");
            }
        }
        for neighbour in [left, right].into_iter().flatten() {
            self.bisector(neighbour, entry.site);
        }
    }

    /// Queues a circle event for the triple starting at `start` if its arcs
    /// converge at or above the sweep line.
    fn schedule(&mut self, start: usize, sweep_y: f64) -> Result<()> {
        let Some(triple) = self.beachline.triple_at(start) else {
            return Ok(());
        };
        let [a, b, c] = triple;
        let key = triple_key(&triple);
        if a == c || self.pending.contains_key(&key) {
            return Ok(());
        }
        let Some(circle) = Circle::through(&a.point, &b.point, &c.point) else {
            trace!(%a, %b, %c, "collinear triple, no circle event");
            return Ok(());
        };

        let turn = Vector::from_points(&a.point, &b.point)
            .cross_2d(&Vector::from_points(&b.point, &c.point))?;
        if turn.get(2).unwrap_or(0.0) <= 0.0 {
            return Ok(());
        }
        let top = circle.top();
        if top.y < sweep_y - EPSILON {
            return Ok(());
        }

        let id = self.queue.push(Event::Circle { triple, circle });
        self.pending.insert(key, id);
        trace!(%a, %b, %c, %top, "circle event queued");
        Ok(())
    }

    /// Drops the pending circle event of the triple starting at `start`.
    fn forget(&mut self, start: usize) {
        let Some(triple) = self.beachline.triple_at(start) else {
            return;
        };
        if let Some(id) = self.pending.remove(&triple_key(&triple)) {
            self.queue.invalidate(id);
            trace!(
                left = %triple[0],
                middle = %triple[1],
                right = %triple[2],
                "circle event invalidated"
            );
        }
    }

    fn bisector(&mut self, a: Site, b: Site) -> &mut Bisector {
        self.bisectors
            .entry(bisector_key(a, b))
            .or_insert_with(|| Bisector::new(a, b))
    }
}
