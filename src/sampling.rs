//! Uniform point sampling inside a face.

use rand::Rng;

use crate::dcel::{Dcel, FaceId};
use crate::error::{GeometryError, Result};
use crate::math::{Point2D, EPSILON};

/// Draws points uniformly from a face by rejection sampling.
///
/// Candidates are drawn uniformly from the face's bounding box and kept when
/// the face contains them, boundary included.
pub struct SampleFace {
    face: FaceId,
    count: usize,
    max_attempts: Option<usize>,
}

impl SampleFace {
    /// Creates a new `SampleFace` operation drawing `count` points.
    ///
    /// By default at most `100 * count` candidates are drawn.
    #[must_use]
    pub fn new(face: FaceId, count: usize) -> Self {
        Self {
            face,
            count,
            max_attempts: None,
        }
    }

    /// Caps the number of candidates drawn.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Executes the sampling.
    ///
    /// # Errors
    ///
    /// Returns `DcelError::FaceNotFound` if the face is not in `dcel`, and
    /// `GeometryError::Degenerate` if the face has no area or the attempt
    /// budget runs out before `count` points are found.
    pub fn execute<R: Rng>(&self, dcel: &Dcel, rng: &mut R) -> Result<Vec<Point2D>> {
        let face = dcel.face(self.face)?;
        if face.area()? < EPSILON {
            return Err(
                GeometryError::Degenerate("cannot sample a face without area".into()).into(),
            );
        }
        let bounds = face.bounding_box()?;
        let max_attempts = self
            .max_attempts
            .unwrap_or_else(|| self.count.saturating_mul(100));

        let mut points = Vec::with_capacity(self.count);
        let mut attempts = 0;
        while points.len() < self.count {
            if attempts == max_attempts {
                return Err(GeometryError::Degenerate(format!(
                    "found {} of {} points in {max_attempts} attempts",
                    points.len(),
                    self.count
                ))
                .into());
            }
            attempts += 1;
            let candidate = Point2D::new(
                rng.random_range(bounds.min.x..=bounds.max.x),
                rng.random_range(bounds.min.y..=bounds.max.y),
            );
            if face.contains_point(&candidate)? {
                points.push(candidate);
            }
        }
        Ok(points)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::VoronoiDcelError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn triangle() -> (Dcel, FaceId) {
        let mut dcel = Dcel::rectangle(Point2D::new(0.0, 10.0), Point2D::new(10.0, 0.0)).unwrap();
        let (half, _) = dcel
            .split_face(Point2D::new(0.0, 10.0), Point2D::new(10.0, 0.0))
            .unwrap();
        (dcel, half)
    }

    #[test]
    fn samples_lie_in_the_face() {
        let (dcel, half) = triangle();
        let mut rng = StdRng::seed_from_u64(7);
        let points = SampleFace::new(half, 200).execute(&dcel, &mut rng).unwrap();
        assert_eq!(points.len(), 200);
        let face = dcel.face(half).unwrap();
        for p in &points {
            assert!(face.contains_point(p).unwrap());
        }
    }

    #[test]
    fn same_seed_same_samples() {
        let (dcel, half) = triangle();
        let a = SampleFace::new(half, 10)
            .execute(&dcel, &mut StdRng::seed_from_u64(42))
            .unwrap();
        let b = SampleFace::new(half, 10)
            .execute(&dcel, &mut StdRng::seed_from_u64(42))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn attempt_budget_is_enforced() {
        let (dcel, half) = triangle();
        let err = SampleFace::new(half, 10)
            .with_max_attempts(0)
            .execute(&dcel, &mut StdRng::seed_from_u64(1))
            .unwrap_err();
        assert!(matches!(
            err,
            VoronoiDcelError::Geometry(GeometryError::Degenerate(_))
        ));
    }

    #[test]
    fn zero_points_need_no_attempts() {
        let (dcel, half) = triangle();
        let points = SampleFace::new(half, 0)
            .with_max_attempts(0)
            .execute(&dcel, &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert!(points.is_empty());
    }
}
