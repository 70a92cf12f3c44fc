use std::fmt;

use super::{Dcel, HalfEdge, HalfEdgeId};
use crate::error::{DcelError, Result};
use crate::math::Point2D;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in a [`Dcel`].
    pub struct VertexId;
}

/// Data associated with a mesh vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// Location of the vertex.
    pub point: Point2D,
    /// One half edge whose target is this vertex.
    pub incident_edge: Option<HalfEdgeId>,
}

impl VertexData {
    /// Creates a vertex at the given point with no incident edge yet.
    #[must_use]
    pub fn new(point: Point2D) -> Self {
        Self {
            point,
            incident_edge: None,
        }
    }
}

/// Borrowed view of a vertex.
#[derive(Debug, Clone, Copy)]
pub struct Vertex<'a> {
    pub(super) dcel: &'a Dcel,
    pub(super) id: VertexId,
    pub(super) data: &'a VertexData,
}

impl<'a> Vertex<'a> {
    #[must_use]
    pub fn id(&self) -> VertexId {
        self.id
    }

    #[must_use]
    pub fn point(&self) -> Point2D {
        self.data.point
    }

    /// The stored half edge ending at this vertex.
    #[must_use]
    pub fn incident_edge(&self) -> Option<HalfEdge<'a>> {
        self.data
            .incident_edge
            .and_then(|id| self.dcel.half_edge_view(id))
    }

    /// All half edges ending at this vertex, in rotational order.
    ///
    /// # Errors
    ///
    /// Returns `DcelError::Corrupted` if the rotation around the vertex is
    /// broken.
    pub fn incoming_edges(&self) -> Result<Vec<HalfEdge<'a>>> {
        let mut edges = Vec::new();
        for id in self.dcel.incoming(self.id)? {
            let edge = self.dcel.half_edge_view(id).ok_or_else(|| {
                DcelError::Corrupted(format!("vertex {} lists a missing edge", self.data.point))
            })?;
            edges.push(edge);
        }
        Ok(edges)
    }

    /// Number of edges meeting at this vertex.
    ///
    /// # Errors
    ///
    /// Returns `DcelError::Corrupted` if the rotation around the vertex is
    /// broken.
    pub fn degree(&self) -> Result<usize> {
        Ok(self.dcel.incoming(self.id)?.len())
    }
}

impl PartialEq for Vertex<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for Vertex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data.point)
    }
}
