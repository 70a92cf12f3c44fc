use nalgebra::Matrix2;

use super::{Vector2, EPSILON};

/// A 2x2 matrix `[[a, b], [c, d]]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix2x2 {
    inner: Matrix2<f64>,
}

#[allow(clippy::should_implement_trait)]
impl Matrix2x2 {
    /// Creates the matrix `[[a, b], [c, d]]` (row-major).
    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            inner: Matrix2::new(a, b, c, d),
        }
    }

    /// Entry at `(row, col)`, or `None` outside the matrix.
    #[must_use]
    pub fn at(&self, row: usize, col: usize) -> Option<f64> {
        self.inner.get((row, col)).copied()
    }

    #[must_use]
    pub fn det(&self) -> f64 {
        self.inner.determinant()
    }

    /// The adjugate `[[d, -b], [-c, a]]`.
    #[must_use]
    pub fn adjoint(&self) -> Self {
        let m = &self.inner;
        Self::new(m[(1, 1)], -m[(0, 1)], -m[(1, 0)], m[(0, 0)])
    }

    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self {
            inner: self.inner + other.inner,
        }
    }

    /// Adds `s` to every entry.
    #[must_use]
    pub fn add_scalar(&self, s: f64) -> Self {
        Self {
            inner: self.inner.add_scalar(s),
        }
    }

    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        Self {
            inner: self.inner * other.inner,
        }
    }

    #[must_use]
    pub fn scale(&self, s: f64) -> Self {
        Self {
            inner: self.inner * s,
        }
    }

    #[must_use]
    pub fn mul_vector(&self, v: &Vector2) -> Vector2 {
        self.inner * v
    }

    /// Inverse via the adjugate, or `None` when `|det| < EPSILON`.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        let det = self.det();
        if det.abs() < EPSILON {
            return None;
        }
        Some(self.adjoint().scale(1.0 / det))
    }

    /// Solves `M * (x, y) = b`, or `None` for a singular system.
    #[must_use]
    pub fn solve(&self, b: &Vector2) -> Option<(f64, f64)> {
        let v = self.inverse()?.mul_vector(b);
        Some((v.x, v.y))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn determinant_and_adjoint() {
        let m = Matrix2x2::new(1.0, 2.0, 3.0, 4.0);
        assert_relative_eq!(m.det(), -2.0);
        assert_eq!(m.adjoint(), Matrix2x2::new(4.0, -2.0, -3.0, 1.0));
    }

    #[test]
    fn inverse_round_trips_to_identity() {
        let m = Matrix2x2::new(2.0, 1.0, 1.0, 3.0);
        let id = m.mul(&m.inverse().unwrap());
        assert_relative_eq!(id.at(0, 0).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(id.at(0, 1).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(id.at(1, 0).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(id.at(1, 1).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn entries_outside_the_matrix_are_none() {
        let m = Matrix2x2::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(m.at(0, 1), Some(2.0));
        assert_eq!(m.at(1, 0), Some(3.0));
        assert_eq!(m.at(2, 0), None);
        assert_eq!(m.at(0, 2), None);
    }

    #[test]
    fn singular_has_no_inverse() {
        let m = Matrix2x2::new(1.0, 2.0, 2.0, 4.0);
        assert!(m.inverse().is_none());
        assert!(m.solve(&Vector2::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn solve_linear_system() {
        // x + y = 3, x - y = 1
        let m = Matrix2x2::new(1.0, 1.0, 1.0, -1.0);
        let (x, y) = m.solve(&Vector2::new(3.0, 1.0)).unwrap();
        assert_relative_eq!(x, 2.0);
        assert_relative_eq!(y, 1.0);
    }

    #[test]
    fn elementwise_ops() {
        let m = Matrix2x2::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(m.add_scalar(1.0), Matrix2x2::new(2.0, 3.0, 4.0, 5.0));
        assert_eq!(m.add(&m), m.scale(2.0));
    }
}
