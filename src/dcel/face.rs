use std::fmt;

use super::{Dcel, HalfEdge, HalfEdgeId};
use crate::error::{DcelError, GeometryError, Result};
use crate::math::polygon_2d::{polygon_centroid, signed_area};
use crate::math::{BoundingBox, LineSegment2D, Point2D};

slotmap::new_key_type! {
    /// Unique identifier for a face in a [`Dcel`].
    pub struct FaceId;
}

/// Data associated with an interior face.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// One half edge on the boundary; the cycle starts here.
    pub edge: HalfEdgeId,
}

impl FaceData {
    #[must_use]
    pub fn new(edge: HalfEdgeId) -> Self {
        Self { edge }
    }
}

/// Borrowed view of an interior face.
///
/// Interior faces are bounded by a clockwise cycle of half edges.
#[derive(Debug, Clone, Copy)]
pub struct Face<'a> {
    pub(super) dcel: &'a Dcel,
    pub(super) id: FaceId,
    pub(super) data: &'a FaceData,
}

impl<'a> Face<'a> {
    #[must_use]
    pub fn id(&self) -> FaceId {
        self.id
    }

    /// The boundary cycle, starting at the face's stored edge.
    ///
    /// # Errors
    ///
    /// Returns `DcelError::Corrupted` if following `next` does not return to
    /// the starting edge.
    pub fn edges(&self) -> Result<Vec<HalfEdge<'a>>> {
        let mut edges = Vec::new();
        for id in self.dcel.cycle(self.data.edge)? {
            let edge = self
                .dcel
                .half_edge_view(id)
                .ok_or_else(|| DcelError::Corrupted("face cycle visits a missing edge".into()))?;
            edges.push(edge);
        }
        Ok(edges)
    }

    /// Source points of the boundary cycle, in clockwise order.
    ///
    /// # Errors
    ///
    /// Returns `DcelError::Corrupted` if the boundary does not close.
    pub fn points(&self) -> Result<Vec<Point2D>> {
        self.edges()?.iter().map(HalfEdge::source).collect()
    }

    /// Unsigned area enclosed by the boundary.
    ///
    /// # Errors
    ///
    /// Returns `DcelError::Corrupted` if the boundary does not close.
    pub fn area(&self) -> Result<f64> {
        Ok(signed_area(&self.points()?).abs())
    }

    /// Area centroid of the face (shoelace formula).
    ///
    /// # Errors
    ///
    /// Returns `DcelError::Corrupted` if the boundary does not close and
    /// `GeometryError::Degenerate` if the face has no area.
    pub fn centroid(&self) -> Result<Point2D> {
        let points = self.points()?;
        polygon_centroid(&points)
            .ok_or_else(|| GeometryError::Degenerate("face has zero area".into()).into())
    }

    /// Returns `true` if `p` lies inside the face or on its boundary.
    ///
    /// Points on a boundary edge are inside; otherwise the parity of
    /// crossings with a ray towards negative x decides.
    ///
    /// # Errors
    ///
    /// Returns `DcelError::Corrupted` if the boundary does not close.
    pub fn contains_point(&self, p: &Point2D) -> Result<bool> {
        let segments: Vec<LineSegment2D> = self.edges()?.iter().map(HalfEdge::segment).collect::<Result<_>>()?;
        if segments.iter().any(|s| s.is_point_on(p)) {
            return Ok(true);
        }
        let crossings = segments
            .iter()
            .filter(|s| s.intersects_with_left_ray_from(p))
            .count();
        Ok(crossings % 2 == 1)
    }

    /// Axis-aligned bounds of the boundary.
    ///
    /// # Errors
    ///
    /// Returns `DcelError::Corrupted` if the boundary does not close.
    pub fn bounding_box(&self) -> Result<BoundingBox> {
        BoundingBox::from_points(&self.points()?)
            .ok_or_else(|| DcelError::Corrupted("face without edges".into()).into())
    }

    /// Interior faces sharing an edge with this one, in boundary order.
    ///
    /// # Errors
    ///
    /// Returns `DcelError::Corrupted` if the boundary does not close.
    pub fn neighbours(&self) -> Result<Vec<Face<'a>>> {
        let mut out: Vec<Face<'a>> = Vec::new();
        for edge in self.edges()? {
            let Some(other) = edge.twin().and_then(|t| t.face()) else {
                continue;
            };
            if other.id != self.id && !out.iter().any(|f| f.id == other.id) {
                out.push(other);
            }
        }
        Ok(out)
    }
}

impl PartialEq for Face<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for Face<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.points() {
            Ok(points) => {
                let parts: Vec<String> = points.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Err(_) => write!(f, "[corrupted face]"),
        }
    }
}
