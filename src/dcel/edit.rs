use std::f64::consts::TAU;

use tracing::debug;

use super::{Dcel, FaceId, HalfEdgeId, VertexId};
use crate::error::{DcelError, Result};
use crate::math::polygon_2d::direction_angle;
use crate::math::{LineSegment2D, Point2D, EPSILON};

fn invalid<T>(message: String) -> Result<T> {
    debug!(%message, "dcel edit rejected");
    Err(DcelError::InvalidOperation(message).into())
}

/// Counter-clockwise turn from angle `from` to angle `to`, in `[0, 2 pi)`.
fn ccw_gap(from: f64, to: f64) -> f64 {
    (to - from).rem_euclid(TAU)
}

/// Returns `true` if `candidate` touches `edge` anywhere other than at a
/// shared endpoint.
fn crosses(candidate: &LineSegment2D, edge: &LineSegment2D) -> bool {
    if !candidate.shares_endpoint(edge) {
        return candidate.intersects_with(edge);
    }
    candidate.is_point_inside(&edge.start())
        || candidate.is_point_inside(&edge.end())
        || edge.is_point_inside(&candidate.start())
        || edge.is_point_inside(&candidate.end())
}

impl Dcel {
    /// Connects a new vertex at `point` to the existing vertex at `existing`.
    ///
    /// The new edge is spliced into the face around `existing` that contains
    /// `point`; both of its half edges bound that face.
    ///
    /// # Errors
    ///
    /// Returns `DcelError::VertexNotFound` if `existing` is not a vertex and
    /// `DcelError::InvalidOperation` if `point` is already a vertex or no
    /// face at `existing` can take the edge without crossing its boundary.
    pub fn add_vertex(&mut self, point: Point2D, existing: Point2D) -> Result<()> {
        let anchor = self.require_vertex(&existing)?;
        if self.vertex_index.contains_key(&point) {
            return invalid(format!("vertex {point} already exists"));
        }
        let anchor_point = self.point_of(anchor)?;
        let angle = direction_angle(&anchor_point, &point);
        let mut chosen = None;
        for h in self.incoming(anchor)? {
            let Some(face) = self.he(h)?.face else {
                continue;
            };
            if self.in_corner(h, angle)? && self.face(face)?.contains_point(&point)? {
                chosen = Some((h, face));
                break;
            }
        }
        let Some((incoming, face)) = chosen else {
            return invalid(format!("no face at {existing} contains {point}"));
        };
        let spoke = LineSegment2D::new(anchor_point, point);
        if self.blocked(incoming, &spoke, &[])? {
            return invalid(format!("edge {spoke} crosses the face boundary"));
        }

        let after = self.next_of(incoming)?;
        let vertex = self.insert_vertex(point);
        let (out, back) = self.insert_edge_pair(anchor, vertex);
        self.link(incoming, out)?;
        self.link(out, back)?;
        self.link(back, after)?;
        self.he_mut(out)?.face = Some(face);
        self.he_mut(back)?.face = Some(face);
        Ok(())
    }

    /// Inserts a vertex at `point` on the edge `source -> target`.
    ///
    /// The original half edge now ends at `point` and a new pair continues
    /// to `target`; both adjacent faces keep their assignment.
    ///
    /// # Errors
    ///
    /// Returns `DcelError::HalfEdgeNotFound` if there is no such edge,
    /// `DcelError::PointNotOnHalfEdge` if `point` is not strictly between
    /// its endpoints and `DcelError::InvalidOperation` if `point` is already
    /// a vertex.
    pub fn split_edge(&mut self, point: Point2D, source: Point2D, target: Point2D) -> Result<()> {
        let h = self.require_edge(&source, &target)?;
        let twin = self.twin_of(h)?;
        let end = self.target_of(h)?;
        let segment = LineSegment2D::new(self.point_of(self.source_of(h)?)?, self.point_of(end)?);
        if !segment.is_point_inside(&point) {
            debug!(%point, %segment, "split point is not on the edge");
            return Err(DcelError::PointNotOnHalfEdge {
                point,
                from: source,
                to: target,
            }
            .into());
        }
        if self.vertex_index.contains_key(&point) {
            return invalid(format!("vertex {point} already exists"));
        }

        let after = self.next_of(h)?;
        let before_twin = self.prev_of(twin)?;
        let vertex = self.insert_vertex(point);
        self.retarget(h, vertex)?;
        let (tail, tail_twin) = self.insert_edge_pair(vertex, end);
        self.link(h, tail)?;
        if after == twin {
            // `target` was a dead end.
            self.link(tail, tail_twin)?;
        } else {
            self.link(tail, after)?;
            self.link(before_twin, tail_twin)?;
        }
        self.link(tail_twin, twin)?;
        let (face, twin_face) = (self.he(h)?.face, self.he(twin)?.face);
        self.he_mut(tail)?.face = face;
        self.he_mut(tail_twin)?.face = twin_face;
        if self.vx(end)?.incident_edge == Some(h) {
            self.vx_mut(end)?.incident_edge = Some(tail);
        }
        Ok(())
    }

    /// Splits the face shared by the vertices `v` and `u` along the segment
    /// between them, returning the two new faces.
    ///
    /// The face first containing the new half edge `v -> u` is returned
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `DcelError::VertexNotFound` for unknown vertices and
    /// `DcelError::InvalidOperation` if the vertices are equal, already
    /// adjacent, share no face or the segment leaves the face.
    pub fn split_face(&mut self, v: Point2D, u: Point2D) -> Result<(FaceId, FaceId)> {
        let vid = self.require_vertex(&v)?;
        let uid = self.require_vertex(&u)?;
        if vid == uid {
            return invalid(format!("cannot split a face from {v} to itself"));
        }
        if self.edge_index.contains_key(&(vid, uid)) {
            return invalid(format!("{v} and {u} are already connected"));
        }
        let (vp, up) = (self.point_of(vid)?, self.point_of(uid)?);
        let chord = LineSegment2D::new(vp, up);
        let (forward, backward) = (direction_angle(&vp, &up), direction_angle(&up, &vp));

        let mut found = None;
        'search: for hv in self.incoming(vid)? {
            let Some(face) = self.he(hv)?.face else {
                continue;
            };
            if !self.in_corner(hv, forward)? {
                continue;
            }
            for hu in self.cycle(hv)? {
                if self.target_of(hu)? == uid && self.in_corner(hu, backward)? {
                    found = Some((hv, hu, face));
                    break 'search;
                }
            }
        }
        let Some((hv, hu, face)) = found else {
            return invalid(format!("{v} and {u} do not share a face"));
        };
        let midpoint = vp.midpoint(&up);
        if self.blocked(hv, &chord, &[])? || !self.face(face)?.contains_point(&midpoint)? {
            return invalid(format!("segment {chord} leaves the face"));
        }

        let (hv_next, hu_next) = (self.next_of(hv)?, self.next_of(hu)?);
        let (e1, e2) = self.insert_edge_pair(vid, uid);
        self.link(hv, e1)?;
        self.link(e1, hu_next)?;
        self.link(hu, e2)?;
        self.link(e2, hv_next)?;
        self.faces.remove(face);
        match (self.assign_face(e1)?, self.assign_face(e2)?) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(DcelError::Corrupted("face split produced a degenerate face".into()).into()),
        }
    }

    /// Removes the edge between `source` and `target`.
    ///
    /// When the edge separates two interior faces they merge into one new
    /// face. A dead-end edge inside a face is removed together with its
    /// free vertex and the face is kept. Either way the surviving face is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns `DcelError::HalfEdgeNotFound` if there is no such edge and
    /// `DcelError::InvalidOperation` for edges on the exterior boundary and
    /// bridges whose removal would disconnect the mesh.
    pub fn delete_edge(&mut self, source: Point2D, target: Point2D) -> Result<FaceId> {
        let h = self.require_edge(&source, &target)?;
        let twin = self.twin_of(h)?;
        let (Some(left), Some(right)) = (self.he(h)?.face, self.he(twin)?.face) else {
            return invalid(format!("edge {source} -> {target} borders the exterior"));
        };
        let (s, t) = (self.source_of(h)?, self.target_of(h)?);
        let (h_prev, h_next) = (self.prev_of(h)?, self.next_of(h)?);
        let (t_prev, t_next) = (self.prev_of(twin)?, self.next_of(twin)?);

        if left == right {
            let (free, keep_vertex, bridge_from, bridge_to) = if h_next == twin {
                (t, s, h_prev, t_next)
            } else if t_next == h {
                (s, t, t_prev, h_next)
            } else {
                return invalid(format!("edge {source} -> {target} is a bridge"));
            };
            self.link(bridge_from, bridge_to)?;
            if let Some(face) = self.faces.get_mut(left) {
                if face.edge == h || face.edge == twin {
                    face.edge = bridge_from;
                }
            }
            self.remove_edge_pair(h)?;
            self.refresh_incident(keep_vertex, bridge_from)?;
            self.remove_vertex_record(free)?;
            return Ok(left);
        }

        self.link(h_prev, t_next)?;
        self.link(t_prev, h_next)?;
        self.remove_edge_pair(h)?;
        self.refresh_incident(s, h_prev)?;
        self.refresh_incident(t, t_prev)?;
        self.faces.remove(left);
        self.faces.remove(right);
        self.assign_face(h_prev)?
            .ok_or_else(|| DcelError::Corrupted("merged face is degenerate".into()).into())
    }

    /// Removes the vertex at `point`.
    ///
    /// A vertex with one edge is removed with that edge. A vertex with two
    /// edges is removed by joining its neighbours with a single edge.
    ///
    /// # Errors
    ///
    /// Returns `DcelError::VertexNotFound` for an unknown point and
    /// `DcelError::InvalidOperation` for rectangle corners, vertices of
    /// degree three or more, and joins that would duplicate an edge or
    /// cross the boundary of an adjacent face.
    pub fn delete_vertex(&mut self, point: Point2D) -> Result<()> {
        let v = self.require_vertex(&point)?;
        if self.bounds.corners().contains(&point) {
            return invalid(format!("{point} is a corner of the bounding rectangle"));
        }
        match self.incoming(v)?.as_slice() {
            &[h] => {
                let neighbour = self.point_of(self.source_of(h)?)?;
                let stored = self.point_of(v)?;
                self.delete_edge(neighbour, stored).map(|_| ())
            }
            &[h, other] => self.join_edges(v, h, other),
            edges => invalid(format!("vertex {point} has degree {}", edges.len())),
        }
    }

    /// Replaces `a -> v -> b` by a single edge `a -> b`.
    fn join_edges(&mut self, v: VertexId, h: HalfEdgeId, other: HalfEdgeId) -> Result<()> {
        let h_twin = self.twin_of(h)?;
        let (tail, tail_twin) = (self.twin_of(other)?, other);
        let (a, b) = (self.source_of(h)?, self.source_of(tail_twin)?);
        let (ap, bp) = (self.point_of(a)?, self.point_of(b)?);
        if self.edge_index.contains_key(&(a, b)) {
            return invalid(format!("{ap} and {bp} are already connected"));
        }
        let joined = LineSegment2D::new(ap, bp);
        let merged = [h, h_twin, tail, tail_twin];
        if self.blocked(h, &joined, &merged)? || self.blocked(h_twin, &joined, &merged)? {
            return invalid(format!("edge {joined} crosses an adjacent face"));
        }

        let tail_next = self.next_of(tail)?;
        let before_tail_twin = self.prev_of(tail_twin)?;
        self.remove_edge_pair(tail)?;
        self.retarget(h, b)?;
        if tail_next == tail_twin {
            // `b` was a dead end.
            self.link(h, h_twin)?;
        } else {
            self.link(h, tail_next)?;
            self.link(before_tail_twin, h_twin)?;
        }
        for face in self.faces.values_mut() {
            if face.edge == tail {
                face.edge = h;
            } else if face.edge == tail_twin {
                face.edge = h_twin;
            }
        }
        self.refresh_incident(b, h)?;
        self.remove_vertex_record(v)?;
        Ok(())
    }

    /// Direction of a half edge, counter-clockwise from the x axis.
    fn edge_angle(&self, h: HalfEdgeId) -> Result<f64> {
        let from = self.point_of(self.source_of(h)?)?;
        let to = self.point_of(self.target_of(h)?)?;
        Ok(direction_angle(&from, &to))
    }

    /// Returns `true` if a new edge leaving the target of `incoming` at
    /// `angle` lies in the face corner between `incoming` and its `next`.
    fn in_corner(&self, incoming: HalfEdgeId, angle: f64) -> Result<bool> {
        let back = self.edge_angle(self.twin_of(incoming)?)?;
        let forward = self.edge_angle(self.next_of(incoming)?)?;
        let mut span = ccw_gap(back, forward);
        if span < EPSILON {
            span = TAU;
        }
        let gap = ccw_gap(back, angle);
        Ok(gap > EPSILON && gap < span - EPSILON)
    }

    /// Returns `true` if `candidate` crosses the cycle through `start`,
    /// ignoring the half edges in `skip`.
    fn blocked(&self, start: HalfEdgeId, candidate: &LineSegment2D, skip: &[HalfEdgeId]) -> Result<bool> {
        for h in self.cycle(start)? {
            if skip.contains(&h) {
                continue;
            }
            let edge = LineSegment2D::new(
                self.point_of(self.source_of(h)?)?,
                self.point_of(self.target_of(h)?)?,
            );
            if crosses(candidate, &edge) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn refresh_incident(&mut self, vertex: VertexId, incoming: HalfEdgeId) -> Result<()> {
        let data = self.vx_mut(vertex)?;
        if data.incident_edge.is_none() {
            data.incident_edge = Some(incoming);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dcel::build::tests::{assert_cycle, targets, LL, LR, UL, UR};
    use crate::error::VoronoiDcelError;

    fn square() -> Dcel {
        Dcel::rectangle(UL, LR).unwrap()
    }

    fn only_face(dcel: &Dcel) -> FaceId {
        let faces = dcel.faces();
        assert_eq!(faces.len(), 1);
        faces[0].id()
    }

    #[test]
    fn add_vertex_creates_spoke_inside_face() {
        let mut dcel = square();
        let inner = Point2D::new(50.0, 50.0);
        dcel.add_vertex(inner, UR).unwrap();
        let face = only_face(&dcel);
        assert_cycle(&targets(&dcel, face), &[UL, UR, inner, UR, LR, LL]);
        assert_eq!(dcel.vertex(&inner).unwrap().degree().unwrap(), 1);
        dcel.validate().unwrap();
    }

    #[test]
    fn add_vertex_rejects_bad_input() {
        let mut dcel = square();
        let err = dcel
            .add_vertex(Point2D::new(10.0, 10.0), Point2D::new(5.0, 5.0))
            .unwrap_err();
        assert!(matches!(err, VoronoiDcelError::Dcel(DcelError::VertexNotFound(_))));
        let err = dcel.add_vertex(LL, UR).unwrap_err();
        assert!(matches!(err, VoronoiDcelError::Dcel(DcelError::InvalidOperation(_))));
        let err = dcel.add_vertex(Point2D::new(150.0, 50.0), UR).unwrap_err();
        assert!(matches!(err, VoronoiDcelError::Dcel(DcelError::InvalidOperation(_))));
        dcel.validate().unwrap();
    }

    #[test]
    fn split_edge_on_both_sides_of_the_boundary() {
        let mut dcel = square();
        let top = Point2D::new(50.0, 100.0);
        dcel.split_edge(top, UL, UR).unwrap();
        let face = only_face(&dcel);
        assert_cycle(&targets(&dcel, face), &[UL, top, UR, LR, LL]);
        dcel.validate().unwrap();

        // `LL -> LR` is the exterior side of the bottom edge.
        let bottom = Point2D::new(50.0, 0.0);
        dcel.split_edge(bottom, LL, LR).unwrap();
        let face = only_face(&dcel);
        assert_cycle(&targets(&dcel, face), &[UL, top, UR, LR, bottom, LL]);
        assert!(dcel.edge(&UL, &UR).is_none());
        assert!(dcel.edge(&top, &UR).is_some());
        assert!(dcel.edge(&UR, &top).is_some());
        dcel.validate().unwrap();
    }

    #[test]
    fn split_edge_at_dead_end() {
        let mut dcel = square();
        let inner = Point2D::new(50.0, 50.0);
        dcel.add_vertex(inner, UR).unwrap();
        let mid = Point2D::new(75.0, 75.0);
        dcel.split_edge(mid, UR, inner).unwrap();
        let face = only_face(&dcel);
        assert_cycle(&targets(&dcel, face), &[UL, UR, mid, inner, mid, UR, LR, LL]);
        dcel.validate().unwrap();
    }

    #[test]
    fn split_edge_rejects_bad_input() {
        let mut dcel = square();
        let err = dcel.split_edge(Point2D::new(50.0, 50.0), UL, LR).unwrap_err();
        assert!(matches!(err, VoronoiDcelError::Dcel(DcelError::HalfEdgeNotFound { .. })));
        let err = dcel.split_edge(Point2D::new(50.0, 90.0), UL, UR).unwrap_err();
        assert!(matches!(err, VoronoiDcelError::Dcel(DcelError::PointNotOnHalfEdge { .. })));
        let err = dcel.split_edge(UR, UL, UR).unwrap_err();
        assert!(matches!(err, VoronoiDcelError::Dcel(DcelError::PointNotOnHalfEdge { .. })));
    }

    #[test]
    fn split_face_along_diagonal() {
        let mut dcel = square();
        let (a, b) = dcel.split_face(UL, LR).unwrap();
        assert_eq!(dcel.face_count(), 2);
        let lower = dcel.face_with_edge(&LR, &LL).unwrap().id();
        let upper = dcel.face_with_edge(&UL, &UR).unwrap().id();
        let mut returned = [a, b];
        let mut expected = [lower, upper];
        returned.sort();
        expected.sort();
        assert_eq!(returned, expected);
        assert_cycle(&targets(&dcel, lower), &[LL, UL, LR]);
        assert_cycle(&targets(&dcel, upper), &[UL, UR, LR]);
        dcel.validate().unwrap();
    }

    #[test]
    fn split_face_rejects_adjacent_and_outside() {
        let mut dcel = square();
        let err = dcel.split_face(UL, UR).unwrap_err();
        assert!(matches!(err, VoronoiDcelError::Dcel(DcelError::InvalidOperation(_))));
        let err = dcel.split_face(UL, UL).unwrap_err();
        assert!(matches!(err, VoronoiDcelError::Dcel(DcelError::InvalidOperation(_))));
        // A chord through another vertex leaves no valid split.
        let center = Point2D::new(50.0, 50.0);
        dcel.add_vertex(center, UR).unwrap();
        let err = dcel.split_face(UL, LR);
        assert!(err.is_err());
        dcel.validate().unwrap();
    }

    #[test]
    fn delete_edge_merges_faces() {
        let mut dcel = square();
        dcel.split_face(UL, LR).unwrap();
        let merged = dcel.delete_edge(LR, UL).unwrap();
        assert_eq!(dcel.face_count(), 1);
        assert_cycle(&targets(&dcel, merged), &[UL, UR, LR, LL]);
        assert!(dcel.edge(&UL, &LR).is_none());
        dcel.validate().unwrap();
    }

    #[test]
    fn delete_edge_removes_dead_end() {
        let mut dcel = square();
        let inner = Point2D::new(50.0, 50.0);
        dcel.add_vertex(inner, UR).unwrap();
        let face = dcel.delete_edge(inner, UR).unwrap();
        assert!(dcel.vertex(&inner).is_none());
        assert_cycle(&targets(&dcel, face), &[UL, UR, LR, LL]);
        assert_eq!(dcel.vertex_count(), 4);
        dcel.validate().unwrap();
    }

    #[test]
    fn delete_edge_refuses_boundary() {
        let mut dcel = square();
        let err = dcel.delete_edge(UL, UR).unwrap_err();
        assert!(matches!(err, VoronoiDcelError::Dcel(DcelError::InvalidOperation(_))));
        let err = dcel.delete_edge(UL, LR).unwrap_err();
        assert!(matches!(err, VoronoiDcelError::Dcel(DcelError::HalfEdgeNotFound { .. })));
    }

    #[test]
    fn delete_vertex_undoes_add_and_split() {
        let mut dcel = square();
        let inner = Point2D::new(50.0, 50.0);
        dcel.add_vertex(inner, UR).unwrap();
        dcel.delete_vertex(inner).unwrap();
        assert_eq!(dcel.vertex_count(), 4);
        dcel.validate().unwrap();

        let top = Point2D::new(50.0, 100.0);
        dcel.split_edge(top, UL, UR).unwrap();
        dcel.delete_vertex(top).unwrap();
        let face = only_face(&dcel);
        assert_cycle(&targets(&dcel, face), &[UL, UR, LR, LL]);
        assert!(dcel.edge(&UL, &UR).is_some());
        dcel.validate().unwrap();
    }

    #[test]
    fn delete_vertex_refuses_corners_and_junctions() {
        let mut dcel = square();
        let top = Point2D::new(50.0, 100.0);
        let bottom = Point2D::new(50.0, 0.0);
        dcel.split_edge(top, UL, UR).unwrap();
        dcel.split_edge(bottom, LR, LL).unwrap();
        dcel.split_face(top, bottom).unwrap();
        assert_eq!(dcel.face_count(), 2);

        let err = dcel.delete_vertex(UL).unwrap_err();
        assert!(matches!(err, VoronoiDcelError::Dcel(DcelError::InvalidOperation(_))));
        let err = dcel.delete_vertex(top).unwrap_err();
        assert!(matches!(err, VoronoiDcelError::Dcel(DcelError::InvalidOperation(_))));

        dcel.delete_edge(top, bottom).unwrap();
        assert_eq!(dcel.face_count(), 1);
        dcel.delete_vertex(top).unwrap();
        dcel.delete_vertex(bottom).unwrap();
        assert_eq!(dcel.vertex_count(), 4);
        dcel.validate().unwrap();
    }

    #[test]
    fn delete_vertex_refuses_crossing_join() {
        // Straightening the dip a -> bend -> c would cut the spoke hanging
        // from the top side.
        let mut dcel = square();
        let a = Point2D::new(20.0, 50.0);
        let bend = Point2D::new(50.0, 20.0);
        let c = Point2D::new(80.0, 50.0);
        let top = Point2D::new(50.0, 100.0);
        dcel.add_vertex(a, UL).unwrap();
        dcel.add_vertex(bend, a).unwrap();
        dcel.add_vertex(c, bend).unwrap();
        dcel.split_edge(top, UL, UR).unwrap();
        dcel.add_vertex(Point2D::new(50.0, 40.0), top).unwrap();
        let err = dcel.delete_vertex(bend).unwrap_err();
        assert!(matches!(err, VoronoiDcelError::Dcel(DcelError::InvalidOperation(_))));
        dcel.validate().unwrap();
    }
}
