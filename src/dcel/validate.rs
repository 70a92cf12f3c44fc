use super::{Dcel, HalfEdgeId};
use crate::error::{DcelError, Result};
use crate::math::polygon_2d::signed_area;

fn corrupted<T>(message: String) -> Result<T> {
    Err(DcelError::Corrupted(message).into())
}

impl Dcel {
    /// Checks every structural invariant of the mesh.
    ///
    /// - `twin(twin(h)) == h` and `target(twin(h)) == source(h)`
    /// - `previous(next(h)) == h`, `next(previous(h)) == h`
    /// - `next(h)` leaves the target of `h` and bounds the same face
    /// - each face cycle closes, is clockwise and is assigned to the face
    /// - the adjacency index maps each `(source, target)` to its half edge
    /// - every vertex is indexed once and its incident edge ends there
    ///
    /// # Errors
    ///
    /// Returns `DcelError::Corrupted` describing the first violation.
    pub fn validate(&self) -> Result<()> {
        for (h, data) in &self.half_edges {
            let twin = self.he(data.twin)?;
            if twin.twin != h {
                return corrupted(format!("twin of twin differs for {}", self.describe(h)));
            }
            if twin.target == data.target {
                return corrupted(format!("half edge {} is a loop", self.describe(h)));
            }
            let next = self.next_of(h)?;
            if self.prev_of(next)? != h {
                return corrupted(format!("previous(next) differs for {}", self.describe(h)));
            }
            if self.next_of(self.prev_of(h)?)? != h {
                return corrupted(format!("next(previous) differs for {}", self.describe(h)));
            }
            if self.source_of(next)? != data.target {
                return corrupted(format!("next does not continue {}", self.describe(h)));
            }
            if self.he(next)?.face != data.face {
                return corrupted(format!("face changes after {}", self.describe(h)));
            }
            let key = (twin.target, data.target);
            if self.edge_index.get(&key) != Some(&h) {
                return corrupted(format!("adjacency index is stale for {}", self.describe(h)));
            }
        }
        if self.edge_index.len() != self.half_edges.len() {
            return corrupted("adjacency index has extra entries".into());
        }

        for (f, data) in &self.faces {
            let cycle = self.cycle(data.edge)?;
            if cycle.iter().any(|&h| self.half_edges.get(h).and_then(|d| d.face) != Some(f)) {
                return corrupted("face cycle contains an edge of another face".into());
            }
            if signed_area(&self.cycle_points(&cycle)?) >= 0.0 {
                return corrupted("interior face is not clockwise".into());
            }
        }

        if self.vertex_index.len() != self.vertices.len() {
            return corrupted("vertex index out of sync".into());
        }
        for (v, data) in &self.vertices {
            if self.vertex_index.get(&data.point) != Some(&v) {
                return corrupted(format!("vertex {} is not indexed", data.point));
            }
            if let Some(h) = data.incident_edge {
                if self.target_of(h)? != v {
                    return corrupted(format!("incident edge of {} ends elsewhere", data.point));
                }
            }
        }
        Ok(())
    }

    fn describe(&self, h: HalfEdgeId) -> String {
        self.half_edge_view(h)
            .map_or_else(|| "<missing>".to_string(), |e| e.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dcel::build::tests::{LR, UL, UR};

    #[test]
    fn fresh_rectangle_is_valid() {
        Dcel::rectangle(UL, LR).unwrap().validate().unwrap();
    }

    #[test]
    fn broken_link_is_reported() {
        let mut dcel = Dcel::rectangle(UL, LR).unwrap();
        let top = dcel.find_edge(&UL, &UR).unwrap();
        dcel.he_mut(top).unwrap().next = Some(top);
        assert!(dcel.validate().is_err());
    }

    #[test]
    fn stale_index_is_reported() {
        let mut dcel = Dcel::rectangle(UL, LR).unwrap();
        let top = dcel.find_edge(&UL, &UR).unwrap();
        let ul = dcel.require_vertex(&UL).unwrap();
        let ur = dcel.require_vertex(&UR).unwrap();
        dcel.edge_index.remove(&(ul, ur));
        assert!(dcel.validate().is_err());
        dcel.edge_index.insert((ul, ur), top);
        dcel.validate().unwrap();
    }
}
