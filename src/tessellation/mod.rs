//! Triangulation of faces for renderers.

mod tessellate_face;

pub use tessellate_face::TessellateFace;

use crate::math::polygon_2d::signed_area;
use crate::math::Point2D;

/// A planar triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh2D {
    /// Vertex positions.
    pub vertices: Vec<Point2D>,
    /// Triangle indices into `vertices`, counter-clockwise.
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh2D {
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Corner positions of each triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [Point2D; 3]> + '_ {
        self.indices.iter().map(|tri| {
            tri.map(|i| {
                self.vertices
                    .get(i as usize)
                    .copied()
                    .unwrap_or_default()
            })
        })
    }

    /// Total area covered by the triangles.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.triangles().map(|t| signed_area(&t).abs()).sum()
    }
}
