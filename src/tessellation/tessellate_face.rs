use std::collections::HashMap;

use spade::handles::FixedVertexHandle;
use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation,
};

use crate::dcel::{Dcel, FaceId};
use crate::error::{Result, TessellationError};
use crate::math::{Point2D, PointMap};

use super::TriangleMesh2D;

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Tessellates a face into a triangle mesh.
///
/// The boundary cycle becomes a constraint loop of a constrained Delaunay
/// triangulation; triangles whose centroid lies in the face are kept. Faces
/// with dangling edges are covered on both sides of the edge.
pub struct TessellateFace {
    face: FaceId,
}

impl TessellateFace {
    /// Creates a new `TessellateFace` operation.
    #[must_use]
    pub fn new(face: FaceId) -> Self {
        Self { face }
    }

    /// Executes the tessellation, returning a triangle mesh.
    ///
    /// # Errors
    ///
    /// Returns `DcelError::FaceNotFound` if the face is not in `dcel` and
    /// `TessellationError::Failed` if the boundary cannot be triangulated.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self, dcel: &Dcel) -> Result<TriangleMesh2D> {
        let face = dcel.face(self.face)?;
        let boundary = face.points()?;

        let mut cdt = Cdt::new();
        insert_constraint_loop(&mut cdt, &boundary)?;

        let mut mesh = TriangleMesh2D::default();
        let mut vertex_map: HashMap<usize, u32> = HashMap::new();

        for triangle in cdt.inner_faces() {
            let corners = triangle.vertices().map(|v| {
                let p = v.position();
                Point2D::new(p.x, p.y)
            });
            let centroid = Point2D::new(
                (corners[0].x + corners[1].x + corners[2].x) / 3.0,
                (corners[0].y + corners[1].y + corners[2].y) / 3.0,
            );
            if !face.contains_point(&centroid)? {
                continue;
            }

            let mut indices = [0u32; 3];
            for (slot, vertex) in indices.iter_mut().zip(triangle.vertices()) {
                let key = vertex.fix().index();
                *slot = *vertex_map.entry(key).or_insert_with(|| {
                    let p = vertex.position();
                    mesh.vertices.push(Point2D::new(p.x, p.y));
                    (mesh.vertices.len() - 1) as u32
                });
            }
            mesh.indices.push(indices);
        }

        Ok(mesh)
    }
}

/// Inserts a closed boundary as constraint edges into the CDT.
///
/// Repeated points (the two sides of a dangling edge) map to one vertex.
fn insert_constraint_loop(cdt: &mut Cdt, points: &[Point2D]) -> Result<()> {
    let mut handles: PointMap<FixedVertexHandle> = PointMap::new();
    let mut ring = Vec::with_capacity(points.len());
    for p in points {
        let handle = match handles.get(p) {
            Some(&h) => h,
            None => {
                let h = cdt.insert(SpadePoint2::new(p.x, p.y)).map_err(|e: InsertionError| {
                    TessellationError::Failed(format!("CDT insert: {e}"))
                })?;
                handles.insert(*p, h);
                h
            }
        };
        ring.push(handle);
    }
    if handles.len() < 3 {
        return Err(
            TessellationError::Failed("constraint loop needs at least 3 points".into()).into(),
        );
    }

    for (i, &from) in ring.iter().enumerate() {
        let to = ring[(i + 1) % ring.len()];
        if from == to || cdt.exists_constraint(from, to) {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            return Err(TessellationError::Failed("boundary crosses itself".into()).into());
        }
        cdt.add_constraint(from, to);
    }

    Ok(())
}
