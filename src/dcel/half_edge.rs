use std::fmt;

use super::{Dcel, Face, FaceId, Vertex, VertexId};
use crate::error::Result;
use crate::math::{LineSegment2D, Point2D};

slotmap::new_key_type! {
    /// Unique identifier for a half edge in a [`Dcel`].
    pub struct HalfEdgeId;
}

/// Data associated with a directed half edge.
///
/// The source vertex is not stored; it is the target of the twin.
#[derive(Debug, Clone)]
pub struct HalfEdgeData {
    pub target: VertexId,
    pub twin: HalfEdgeId,
    pub next: Option<HalfEdgeId>,
    pub previous: Option<HalfEdgeId>,
    /// Interior face on the right of this edge; `None` on the exterior.
    pub face: Option<FaceId>,
}

impl HalfEdgeData {
    #[must_use]
    pub fn new(target: VertexId, twin: HalfEdgeId) -> Self {
        Self {
            target,
            twin,
            next: None,
            previous: None,
            face: None,
        }
    }
}

/// Borrowed view of a half edge.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<'a> {
    pub(super) dcel: &'a Dcel,
    pub(super) id: HalfEdgeId,
    pub(super) data: &'a HalfEdgeData,
}

impl<'a> HalfEdge<'a> {
    #[must_use]
    pub fn id(&self) -> HalfEdgeId {
        self.id
    }

    #[must_use]
    pub fn target_vertex(&self) -> Option<Vertex<'a>> {
        self.dcel.vertex_view(self.data.target)
    }

    #[must_use]
    pub fn source_vertex(&self) -> Option<Vertex<'a>> {
        self.twin()
            .map(|t| t.data.target)
            .and_then(|v| self.dcel.vertex_view(v))
    }

    /// Target point.
    ///
    /// # Errors
    ///
    /// Returns `DcelError::Corrupted` if the target vertex was removed.
    pub fn target(&self) -> Result<Point2D> {
        self.dcel.point_of(self.data.target)
    }

    /// Source point, i.e. the target of the twin.
    ///
    /// # Errors
    ///
    /// Returns `DcelError::Corrupted` if the twin or its target was removed.
    pub fn source(&self) -> Result<Point2D> {
        self.dcel.point_of(self.dcel.source_of(self.id)?)
    }

    #[must_use]
    pub fn twin(&self) -> Option<HalfEdge<'a>> {
        self.dcel.half_edge_view(self.data.twin)
    }

    #[must_use]
    pub fn next(&self) -> Option<HalfEdge<'a>> {
        self.data.next.and_then(|id| self.dcel.half_edge_view(id))
    }

    #[must_use]
    pub fn previous(&self) -> Option<HalfEdge<'a>> {
        self.data.previous.and_then(|id| self.dcel.half_edge_view(id))
    }

    /// The interior face this edge bounds, or `None` on the exterior.
    #[must_use]
    pub fn face(&self) -> Option<Face<'a>> {
        self.data.face.and_then(|id| self.dcel.face(id).ok())
    }

    /// The edge as a segment from source to target.
    ///
    /// # Errors
    ///
    /// Same as [`HalfEdge::source`].
    pub fn segment(&self) -> Result<LineSegment2D> {
        Ok(LineSegment2D::new(self.source()?, self.target()?))
    }
}

impl PartialEq for HalfEdge<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for HalfEdge<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.segment() {
            Ok(segment) => write!(f, "{segment}"),
            Err(_) => write!(f, "<dangling half edge>"),
        }
    }
}
