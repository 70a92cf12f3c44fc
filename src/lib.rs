pub mod dcel;
pub mod error;
pub mod math;
pub mod sampling;
pub mod sweep;
pub mod tessellation;

pub use dcel::{Dcel, Face, FaceId, HalfEdge, HalfEdgeId, Vertex, VertexId};
pub use error::{Result, VoronoiDcelError};
pub use math::{LineSegment2D, Point2D};
pub use sweep::{compute_voronoi, ComputeVoronoi};
