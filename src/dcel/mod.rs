//! Doubly-connected edge list over a rectangular domain.
//!
//! All records live in arenas owned by [`Dcel`] and refer to each other by
//! typed ids, so relinking never leaves dangling references. Callers only see
//! borrowed views ([`Face`], [`HalfEdge`], [`Vertex`]) and mutate through the
//! operations on [`Dcel`].

pub mod build;
pub mod edit;
pub mod face;
pub mod half_edge;
pub mod validate;
pub mod vertex;

pub use face::{Face, FaceData, FaceId};
pub use half_edge::{HalfEdge, HalfEdgeData, HalfEdgeId};
pub use vertex::{Vertex, VertexData, VertexId};

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::error::{DcelError, Result};
use crate::math::polygon_2d::signed_area;
use crate::math::{BoundingBox, Point2D, PointMap, EPSILON};

/// A planar subdivision of a rectangle into faces.
///
/// Coincident points share one vertex (see [`PointMap`]) and every directed
/// pair of vertices has at most one half edge.
#[derive(Debug, Clone)]
pub struct Dcel {
    bounds: BoundingBox,
    vertices: SlotMap<VertexId, VertexData>,
    half_edges: SlotMap<HalfEdgeId, HalfEdgeData>,
    faces: SlotMap<FaceId, FaceData>,
    vertex_index: PointMap<VertexId>,
    edge_index: HashMap<(VertexId, VertexId), HalfEdgeId>,
}

impl Dcel {
    pub(crate) fn empty(bounds: BoundingBox) -> Self {
        Self {
            bounds,
            vertices: SlotMap::with_key(),
            half_edges: SlotMap::with_key(),
            faces: SlotMap::with_key(),
            vertex_index: PointMap::new(),
            edge_index: HashMap::new(),
        }
    }

    /// The bounding rectangle.
    #[must_use]
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    /// Number of interior faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// All interior faces.
    #[must_use]
    pub fn faces(&self) -> Vec<Face<'_>> {
        self.faces
            .iter()
            .map(|(id, data)| Face {
                dcel: self,
                id,
                data,
            })
            .collect()
    }

    /// Looks up a face by id.
    ///
    /// # Errors
    ///
    /// Returns `DcelError::FaceNotFound` if the face was removed by an edit.
    pub fn face(&self, id: FaceId) -> Result<Face<'_>> {
        let data = self.faces.get(id).ok_or(DcelError::FaceNotFound)?;
        Ok(Face {
            dcel: self,
            id,
            data,
        })
    }

    /// Iterates over all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = Vertex<'_>> {
        self.vertices.iter().map(|(id, data)| Vertex {
            dcel: self,
            id,
            data,
        })
    }

    /// Iterates over all half edges, interior and exterior.
    pub fn half_edges(&self) -> impl Iterator<Item = HalfEdge<'_>> {
        self.half_edges.iter().map(|(id, data)| HalfEdge {
            dcel: self,
            id,
            data,
        })
    }

    /// The vertex at `point`, if any.
    #[must_use]
    pub fn vertex(&self, point: &Point2D) -> Option<Vertex<'_>> {
        self.vertex_index
            .get(point)
            .and_then(|&id| self.vertex_view(id))
    }

    /// The half edge running from `source` to `target`, if any.
    #[must_use]
    pub fn edge(&self, source: &Point2D, target: &Point2D) -> Option<HalfEdge<'_>> {
        self.find_edge(source, target)
            .and_then(|id| self.half_edge_view(id))
    }

    /// The interior face on the right of the half edge `source -> target`.
    #[must_use]
    pub fn face_with_edge(&self, source: &Point2D, target: &Point2D) -> Option<Face<'_>> {
        self.edge(source, target).and_then(|e| e.face())
    }

    /// The first interior face containing `point` (boundary inclusive).
    ///
    /// # Errors
    ///
    /// Returns `DcelError::Corrupted` if a face boundary does not close.
    pub fn face_containing(&self, point: &Point2D) -> Result<Option<Face<'_>>> {
        for face in self.faces() {
            if face.contains_point(point)? {
                return Ok(Some(face));
            }
        }
        Ok(None)
    }

    // --- Views ---

    pub(crate) fn vertex_view(&self, id: VertexId) -> Option<Vertex<'_>> {
        self.vertices.get(id).map(|data| Vertex {
            dcel: self,
            id,
            data,
        })
    }

    pub(crate) fn half_edge_view(&self, id: HalfEdgeId) -> Option<HalfEdge<'_>> {
        self.half_edges.get(id).map(|data| HalfEdge {
            dcel: self,
            id,
            data,
        })
    }

    // --- Record access ---

    pub(crate) fn he(&self, id: HalfEdgeId) -> Result<&HalfEdgeData> {
        self.half_edges
            .get(id)
            .ok_or_else(|| DcelError::Corrupted("reference to a removed half edge".into()).into())
    }

    pub(crate) fn he_mut(&mut self, id: HalfEdgeId) -> Result<&mut HalfEdgeData> {
        self.half_edges
            .get_mut(id)
            .ok_or_else(|| DcelError::Corrupted("reference to a removed half edge".into()).into())
    }

    pub(crate) fn vx(&self, id: VertexId) -> Result<&VertexData> {
        self.vertices
            .get(id)
            .ok_or_else(|| DcelError::Corrupted("reference to a removed vertex".into()).into())
    }

    pub(crate) fn vx_mut(&mut self, id: VertexId) -> Result<&mut VertexData> {
        self.vertices
            .get_mut(id)
            .ok_or_else(|| DcelError::Corrupted("reference to a removed vertex".into()).into())
    }

    pub(crate) fn twin_of(&self, id: HalfEdgeId) -> Result<HalfEdgeId> {
        Ok(self.he(id)?.twin)
    }

    pub(crate) fn next_of(&self, id: HalfEdgeId) -> Result<HalfEdgeId> {
        self.he(id)?
            .next
            .ok_or_else(|| DcelError::Corrupted("half edge without next".into()).into())
    }

    pub(crate) fn prev_of(&self, id: HalfEdgeId) -> Result<HalfEdgeId> {
        self.he(id)?
            .previous
            .ok_or_else(|| DcelError::Corrupted("half edge without previous".into()).into())
    }

    pub(crate) fn target_of(&self, id: HalfEdgeId) -> Result<VertexId> {
        Ok(self.he(id)?.target)
    }

    pub(crate) fn source_of(&self, id: HalfEdgeId) -> Result<VertexId> {
        self.target_of(self.twin_of(id)?)
    }

    pub(crate) fn point_of(&self, id: VertexId) -> Result<Point2D> {
        Ok(self.vx(id)?.point)
    }

    pub(crate) fn find_edge(&self, source: &Point2D, target: &Point2D) -> Option<HalfEdgeId> {
        let s = *self.vertex_index.get(source)?;
        let t = *self.vertex_index.get(target)?;
        self.edge_index.get(&(s, t)).copied()
    }

    pub(crate) fn require_vertex(&self, point: &Point2D) -> Result<VertexId> {
        self.vertex_index
            .get(point)
            .copied()
            .ok_or_else(|| DcelError::VertexNotFound(*point).into())
    }

    pub(crate) fn require_edge(&self, source: &Point2D, target: &Point2D) -> Result<HalfEdgeId> {
        self.find_edge(source, target).ok_or_else(|| {
            DcelError::HalfEdgeNotFound {
                from: *source,
                to: *target,
            }
            .into()
        })
    }

    // --- Structural edits ---

    /// Returns the vertex at `point`, creating it if needed.
    pub(crate) fn insert_vertex(&mut self, point: Point2D) -> VertexId {
        if let Some(&id) = self.vertex_index.get(&point) {
            return id;
        }
        let id = self.vertices.insert(VertexData::new(point));
        self.vertex_index.insert(point, id);
        id
    }

    pub(crate) fn remove_vertex_record(&mut self, id: VertexId) -> Result<()> {
        let data = self
            .vertices
            .remove(id)
            .ok_or_else(|| DcelError::Corrupted("removing a missing vertex".into()))?;
        self.vertex_index.remove(&data.point);
        Ok(())
    }

    /// Creates the unlinked pair `a -> b`, `b -> a` and indexes both.
    pub(crate) fn insert_edge_pair(&mut self, a: VertexId, b: VertexId) -> (HalfEdgeId, HalfEdgeId) {
        let forward = self
            .half_edges
            .insert(HalfEdgeData::new(b, HalfEdgeId::default()));
        let backward = self.half_edges.insert(HalfEdgeData::new(a, forward));
        if let Some(data) = self.half_edges.get_mut(forward) {
            data.twin = backward;
        }
        self.edge_index.insert((a, b), forward);
        self.edge_index.insert((b, a), backward);
        for (vertex, incoming) in [(b, forward), (a, backward)] {
            if let Some(v) = self.vertices.get_mut(vertex) {
                if v.incident_edge.is_none() {
                    v.incident_edge = Some(incoming);
                }
            }
        }
        (forward, backward)
    }

    /// Removes a half edge and its twin from the arena and the index.
    ///
    /// Links from neighbouring edges are left untouched; callers relink
    /// before or after.
    pub(crate) fn remove_edge_pair(&mut self, id: HalfEdgeId) -> Result<()> {
        let twin = self.twin_of(id)?;
        let (a, b) = (self.source_of(id)?, self.target_of(id)?);
        self.edge_index.remove(&(a, b));
        self.edge_index.remove(&(b, a));
        self.half_edges.remove(id);
        self.half_edges.remove(twin);
        for v in [a, b] {
            if let Some(data) = self.vertices.get_mut(v) {
                if data.incident_edge == Some(id) || data.incident_edge == Some(twin) {
                    data.incident_edge = None;
                }
            }
        }
        Ok(())
    }

    /// Sets `a.next = b` and `b.previous = a`.
    pub(crate) fn link(&mut self, a: HalfEdgeId, b: HalfEdgeId) -> Result<()> {
        self.he_mut(a)?.next = Some(b);
        self.he_mut(b)?.previous = Some(a);
        Ok(())
    }

    /// Changes the target of `id`, keeping the adjacency index of the edge
    /// and its twin consistent.
    pub(crate) fn retarget(&mut self, id: HalfEdgeId, target: VertexId) -> Result<()> {
        let twin = self.twin_of(id)?;
        let (source, old) = (self.source_of(id)?, self.target_of(id)?);
        self.edge_index.remove(&(source, old));
        self.edge_index.remove(&(old, source));
        self.he_mut(id)?.target = target;
        self.edge_index.insert((source, target), id);
        self.edge_index.insert((target, source), twin);
        Ok(())
    }

    // --- Traversal ---

    /// The `next` cycle starting at `start`.
    pub(crate) fn cycle(&self, start: HalfEdgeId) -> Result<Vec<HalfEdgeId>> {
        let mut out = vec![start];
        let mut current = self.next_of(start)?;
        while current != start {
            if out.len() > self.half_edges.len() {
                return Err(DcelError::Corrupted("face cycle does not close".into()).into());
            }
            out.push(current);
            current = self.next_of(current)?;
        }
        Ok(out)
    }

    /// Half edges ending at `vertex`, rotating through `twin(next(h))`.
    pub(crate) fn incoming(&self, vertex: VertexId) -> Result<Vec<HalfEdgeId>> {
        let Some(start) = self.vx(vertex)?.incident_edge else {
            return Ok(Vec::new());
        };
        let mut out = vec![start];
        let mut current = self.twin_of(self.next_of(start)?)?;
        while current != start {
            if out.len() > self.half_edges.len() {
                return Err(DcelError::Corrupted("vertex rotation does not close".into()).into());
            }
            out.push(current);
            current = self.twin_of(self.next_of(current)?)?;
        }
        Ok(out)
    }

    /// Source points along a cycle.
    pub(crate) fn cycle_points(&self, cycle: &[HalfEdgeId]) -> Result<Vec<Point2D>> {
        cycle
            .iter()
            .map(|&h| self.point_of(self.source_of(h)?))
            .collect()
    }

    /// Classifies the cycle through `start`: clockwise cycles become a new
    /// interior face, anything else is exterior.
    pub(crate) fn assign_face(&mut self, start: HalfEdgeId) -> Result<Option<FaceId>> {
        let cycle = self.cycle(start)?;
        let area = signed_area(&self.cycle_points(&cycle)?);
        let face = if area < -EPSILON {
            Some(self.faces.insert(FaceData::new(start)))
        } else {
            None
        };
        for h in cycle {
            self.he_mut(h)?.face = face;
        }
        Ok(face)
    }
}
