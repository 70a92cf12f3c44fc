//! Fortune's sweep-line construction of a bounded Voronoi diagram.
//!
//! The sweep line moves upward (increasing y). Arcs on the beachline are
//! parabolas opening downward with their site as focus and the sweep line as
//! directrix. Finished bisectors are clipped to the bounding rectangle and
//! handed to [`crate::dcel::Dcel::from_segments`].

mod beachline;
mod bisector;
mod compute_voronoi;
mod event;

pub use beachline::{compute_breakpoint, BeachLineEntry, Beachline};
pub use bisector::Bisector;
pub use compute_voronoi::{compute_voronoi, ComputeVoronoi};
pub use event::{Event, EventId, EventQueue};

use std::fmt;

use crate::math::Point2D;

/// An input site together with its position in the de-duplicated input.
///
/// Sites are compared by `id`; the point is carried along so that geometry
/// never needs a lookup.
#[derive(Debug, Clone, Copy)]
pub struct Site {
    pub id: usize,
    pub point: Point2D,
}

impl Site {
    #[must_use]
    pub const fn new(id: usize, point: Point2D) -> Self {
        Self { id, point }
    }
}

impl PartialEq for Site {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Site {}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.point)
    }
}
