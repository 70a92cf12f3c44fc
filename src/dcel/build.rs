use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, trace};

use super::{Dcel, HalfEdgeId, VertexId};
use crate::error::{DcelError, Result};
use crate::math::polygon_2d::direction_angle;
use crate::math::{are_close, BoundingBox, LineSegment2D, Point2D};

impl Dcel {
    /// Builds the single-face rectangle spanned by two corners.
    ///
    /// The interior face runs clockwise `upper_left -> upper_right ->
    /// lower_right -> lower_left`; the twins form the exterior.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidBounds` if `upper_left` is not above
    /// and to the left of `lower_right`.
    pub fn rectangle(upper_left: Point2D, lower_right: Point2D) -> Result<Self> {
        Self::from_segments(upper_left, lower_right, &[])
    }

    /// Builds the subdivision of the rectangle induced by `segments`.
    ///
    /// Segments are clipped to the rectangle and split wherever they cross
    /// or touch one another, so the resulting graph is planar. At each
    /// vertex the outgoing edges are ordered by angle; the edge following an
    /// incoming half edge is the next outgoing edge counter-clockwise from
    /// its twin, which makes every interior face a clockwise cycle.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidBounds` for inverted corners and
    /// `DcelError::Corrupted` if linking fails.
    pub fn from_segments(
        upper_left: Point2D,
        lower_right: Point2D,
        segments: &[LineSegment2D],
    ) -> Result<Self> {
        let bounds = BoundingBox::from_corners(upper_left, lower_right)?;
        let mut pieces: Vec<LineSegment2D> = bounds.edges().to_vec();
        for segment in segments {
            match bounds.clip_segment(segment) {
                Some(clipped) if !clipped.is_degenerate() => pieces.push(clipped),
                _ => debug!(%segment, "segment outside the bounds, skipped"),
            }
        }

        let mut dcel = Self::empty(bounds);
        for corner in bounds.corners() {
            dcel.insert_vertex(corner);
        }
        for piece in split_at_junctions(&pieces) {
            let a = dcel.insert_vertex(piece.start());
            let b = dcel.insert_vertex(piece.end());
            if a == b || dcel.edge_index.contains_key(&(a, b)) {
                continue;
            }
            dcel.insert_edge_pair(a, b);
        }
        dcel.link_radially()?;
        dcel.discover_faces()?;
        debug!(
            vertices = dcel.vertex_count(),
            half_edges = dcel.half_edge_count(),
            faces = dcel.face_count(),
            "built dcel"
        );
        Ok(dcel)
    }

    /// Wires `next`/`previous` from the angular order at every vertex.
    fn link_radially(&mut self) -> Result<()> {
        let mut outgoing: HashMap<VertexId, Vec<(f64, HalfEdgeId)>> = HashMap::new();
        let ids: Vec<HalfEdgeId> = self.half_edges.keys().collect();
        for h in ids {
            let source = self.source_of(h)?;
            let target = self.target_of(h)?;
            let angle = direction_angle(&self.point_of(source)?, &self.point_of(target)?);
            outgoing.entry(source).or_default().push((angle, h));
        }
        for (vertex, mut fan) in outgoing {
            fan.sort_by(|a, b| a.0.total_cmp(&b.0));
            for (k, &(_, out)) in fan.iter().enumerate() {
                let incoming = self.twin_of(out)?;
                let (_, next) = fan[(k + 1) % fan.len()];
                self.link(incoming, next)?;
            }
            let first = self.twin_of(fan[0].1)?;
            self.vx_mut(vertex)?.incident_edge = Some(first);
        }
        Ok(())
    }

    /// Breadth-first walk over face cycles, starting on the top side of the
    /// rectangle so the first face found is anchored at the upper-left
    /// corner.
    fn discover_faces(&mut self) -> Result<()> {
        let upper_left = self.bounds.corners()[0];
        let corner = self.require_vertex(&upper_left)?;
        let mut start = None;
        for (&(s, t), &h) in &self.edge_index {
            if s == corner && are_close(self.point_of(t)?.y, upper_left.y) {
                start = Some(h);
                break;
            }
        }
        let start = start.ok_or_else(|| {
            DcelError::Corrupted("upper-left corner has no edge along the top side".into())
        })?;

        let all: Vec<HalfEdgeId> = self.half_edges.keys().collect();
        let mut remaining = all.into_iter();
        let mut visited: HashSet<HalfEdgeId> = HashSet::new();
        let mut queue = VecDeque::from([start]);
        loop {
            let h = match queue.pop_front() {
                Some(h) => h,
                None => match remaining.find(|h| !visited.contains(h)) {
                    Some(h) => {
                        debug!("disconnected edge component found");
                        h
                    }
                    None => break,
                },
            };
            if visited.contains(&h) {
                continue;
            }
            let cycle = self.cycle(h)?;
            visited.extend(cycle.iter().copied());
            let face = self.assign_face(h)?;
            trace!(edges = cycle.len(), interior = face.is_some(), "face cycle");
            for e in cycle {
                let twin = self.twin_of(e)?;
                if !visited.contains(&twin) {
                    queue.push_back(twin);
                }
            }
        }
        Ok(())
    }
}

/// Splits every segment at the points where other segments cross or end on
/// it.
fn split_at_junctions(segments: &[LineSegment2D]) -> Vec<LineSegment2D> {
    let mut out = Vec::new();
    for (i, segment) in segments.iter().enumerate() {
        let mut cuts = vec![segment.start(), segment.end()];
        for (j, other) in segments.iter().enumerate() {
            if i == j {
                continue;
            }
            // Segments meeting at an endpoint can only touch there.
            if !segment.shares_endpoint(other) {
                if let Some(p) = segment.intersection_with(other) {
                    cuts.push(p);
                }
            }
            for p in [other.start(), other.end()] {
                if segment.is_point_inside(&p) {
                    cuts.push(p);
                }
            }
        }
        cuts.sort_by(|a, b| segment.parameter_of(a).total_cmp(&segment.parameter_of(b)));
        cuts.dedup();
        out.extend(cuts.windows(2).map(|w| LineSegment2D::new(w[0], w[1])));
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::dcel::FaceId;

    pub(crate) const UL: Point2D = Point2D::new(0.0, 100.0);
    pub(crate) const UR: Point2D = Point2D::new(100.0, 100.0);
    pub(crate) const LR: Point2D = Point2D::new(100.0, 0.0);
    pub(crate) const LL: Point2D = Point2D::new(0.0, 0.0);

    /// Asserts that `actual` is a cyclic rotation of `expected`.
    pub(crate) fn assert_cycle(actual: &[Point2D], expected: &[Point2D]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        let n = actual.len();
        let rotated = (0..n).any(|shift| (0..n).all(|m| actual[(shift + m) % n] == expected[m]));
        assert!(rotated, "{actual:?} is not a rotation of {expected:?}");
    }

    /// Targets of the boundary edges of `face`, in cycle order.
    pub(crate) fn targets(dcel: &Dcel, face: FaceId) -> Vec<Point2D> {
        dcel.face(face)
            .unwrap()
            .edges()
            .unwrap()
            .iter()
            .map(|e| e.target().unwrap())
            .collect()
    }

    #[test]
    fn rectangle_interior_and_exterior_cycles() {
        let dcel = Dcel::rectangle(UL, LR).unwrap();
        let top = dcel.edge(&UL, &UR).unwrap();
        let interior: Vec<Point2D> = dcel
            .cycle(top.id())
            .unwrap()
            .into_iter()
            .map(|h| dcel.half_edge_view(h).unwrap().target().unwrap())
            .collect();
        let exterior: Vec<Point2D> = dcel
            .cycle(top.twin().unwrap().id())
            .unwrap()
            .into_iter()
            .map(|h| dcel.half_edge_view(h).unwrap().target().unwrap())
            .collect();
        assert_cycle(&interior, &[UL, UR, LR, LL]);
        assert_cycle(&exterior, &[UL, LL, LR, UR]);
    }

    #[test]
    fn rectangle_has_one_clockwise_face() {
        let dcel = Dcel::rectangle(UL, LR).unwrap();
        let faces = dcel.faces();
        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0].points().unwrap(), vec![UL, UR, LR, LL]);
        dcel.validate().unwrap();
    }

    #[test]
    fn face_with_edge_on_rectangle() {
        let dcel = Dcel::rectangle(UL, LR).unwrap();
        let face = dcel.face_with_edge(&UL, &UR).unwrap();
        assert_eq!(dcel.face_with_edge(&UR, &LR).unwrap(), face);
        assert_eq!(dcel.face_with_edge(&LR, &LL).unwrap(), face);
        assert_eq!(dcel.face_with_edge(&LL, &UL).unwrap(), face);
        assert!(dcel.face_with_edge(&UR, &UL).is_none());
        assert!(dcel.face_with_edge(&LR, &UR).is_none());
        assert_cycle(&targets(&dcel, face.id()), &[UL, UR, LR, LL]);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        assert!(Dcel::rectangle(LR, UL).is_err());
    }

    #[test]
    fn cross_splits_rectangle_into_four() {
        let segments = [
            LineSegment2D::new(Point2D::new(50.0, 0.0), Point2D::new(50.0, 100.0)),
            LineSegment2D::new(Point2D::new(0.0, 50.0), Point2D::new(100.0, 50.0)),
        ];
        let dcel = Dcel::from_segments(UL, LR, &segments).unwrap();
        assert_eq!(dcel.face_count(), 4);
        assert_eq!(dcel.vertex_count(), 9);
        for face in dcel.faces() {
            assert!((face.area().unwrap() - 2500.0).abs() < 1e-6);
            assert_eq!(face.edges().unwrap().len(), 4);
        }
        let center = dcel.vertex(&Point2D::new(50.0, 50.0)).unwrap();
        assert_eq!(center.degree().unwrap(), 4);
        dcel.validate().unwrap();
    }

    #[test]
    fn segments_are_clipped_and_dangling_ends_stay_in_their_face() {
        let segments = [
            // Pokes out of the right side.
            LineSegment2D::new(Point2D::new(50.0, 50.0), Point2D::new(150.0, 50.0)),
            // Entirely outside.
            LineSegment2D::new(Point2D::new(200.0, 200.0), Point2D::new(300.0, 300.0)),
        ];
        let dcel = Dcel::from_segments(UL, LR, &segments).unwrap();
        assert_eq!(dcel.face_count(), 1);
        let face = &dcel.faces()[0];
        // Rectangle corners, the split point on the right side, and the
        // dangling end visited twice.
        assert_eq!(face.edges().unwrap().len(), 7);
        assert!((face.area().unwrap() - 10_000.0).abs() < 1e-6);
        dcel.validate().unwrap();
    }

    #[test]
    fn overlapping_and_duplicate_segments_collapse() {
        let segments = [
            LineSegment2D::new(Point2D::new(0.0, 50.0), Point2D::new(100.0, 50.0)),
            LineSegment2D::new(Point2D::new(100.0, 50.0), Point2D::new(0.0, 50.0)),
            LineSegment2D::new(Point2D::new(20.0, 50.0), Point2D::new(60.0, 50.0)),
            // Lies on the top side.
            LineSegment2D::new(Point2D::new(10.0, 100.0), Point2D::new(30.0, 100.0)),
        ];
        let dcel = Dcel::from_segments(UL, LR, &segments).unwrap();
        assert_eq!(dcel.face_count(), 2);
        dcel.validate().unwrap();
    }

    #[test]
    fn split_at_junctions_handles_t_junctions() {
        let pieces = split_at_junctions(&[
            LineSegment2D::new(Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0)),
            LineSegment2D::new(Point2D::new(5.0, 0.0), Point2D::new(5.0, 5.0)),
        ]);
        assert_eq!(pieces.len(), 3);
        assert!(pieces.contains(&LineSegment2D::new(
            Point2D::new(0.0, 0.0),
            Point2D::new(5.0, 0.0)
        )));
    }
}
