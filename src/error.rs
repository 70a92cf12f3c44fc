use thiserror::Error;

use crate::math::Point2D;

/// Top-level error type for the Voronoi/DCEL engine.
#[derive(Debug, Error)]
pub enum VoronoiDcelError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Dcel(#[from] DcelError),

    #[error(transparent)]
    Sweep(#[from] SweepError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("zero-length vector")]
    ZeroVector,

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("invalid bounds: upper left {upper_left} must be above and left of lower right {lower_right}")]
    InvalidBounds {
        upper_left: Point2D,
        lower_right: Point2D,
    },
}

/// Errors raised by construction and mutation of a [`crate::dcel::Dcel`].
#[derive(Debug, Error)]
pub enum DcelError {
    #[error("vertex {0} not found in the mesh")]
    VertexNotFound(Point2D),

    #[error("half edge {from} -> {to} not found in the mesh")]
    HalfEdgeNotFound { from: Point2D, to: Point2D },

    #[error("face not found in the mesh")]
    FaceNotFound,

    #[error("corrupted mesh: {0}")]
    Corrupted(String),

    #[error("point {point} does not lie on half edge {from} -> {to}")]
    PointNotOnHalfEdge {
        point: Point2D,
        from: Point2D,
        to: Point2D,
    },

    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

/// Errors related to the sweep-line input.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("at least one site is required")]
    NoSites,

    #[error("site {0} lies outside the bounding rectangle")]
    SiteOutOfBounds(Point2D),
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("tessellation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`VoronoiDcelError`].
pub type Result<T> = std::result::Result<T, VoronoiDcelError>;
