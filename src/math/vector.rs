use nalgebra::DVector;

use super::{Point2D, EPSILON};
use crate::error::{GeometryError, Result};

/// A vector of arbitrary dimension.
///
/// Binary operations require both operands to have the same dimension and
/// report [`GeometryError::DimensionMismatch`] otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    components: DVector<f64>,
}

impl Vector {
    /// Creates a vector from its components.
    #[must_use]
    pub fn new(components: &[f64]) -> Self {
        Self {
            components: DVector::from_column_slice(components),
        }
    }

    /// Creates the 2D vector pointing from `from` to `to`.
    #[must_use]
    pub fn from_points(from: &Point2D, to: &Point2D) -> Self {
        Self::new(&[to.x - from.x, to.y - from.y])
    }

    /// Number of components.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.components.len()
    }

    /// Component `i`, if present.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<f64> {
        self.components.get(i).copied()
    }

    /// Component-wise sum.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::DimensionMismatch` if the dimensions differ.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_dim(other)?;
        Ok(Self {
            components: &self.components + &other.components,
        })
    }

    /// Component-wise difference.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::DimensionMismatch` if the dimensions differ.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.check_dim(other)?;
        Ok(Self {
            components: &self.components - &other.components,
        })
    }

    /// Dot product.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::DimensionMismatch` if the dimensions differ.
    pub fn dot(&self, other: &Self) -> Result<f64> {
        self.check_dim(other)?;
        Ok(self.components.dot(&other.components))
    }

    /// Cross product of two 2D vectors, embedded in 3D.
    ///
    /// The result is `(0, 0, z)`; the sign of `z` is positive when `other`
    /// lies counter-clockwise of `self`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::DimensionMismatch` unless both vectors are 2D.
    pub fn cross_2d(&self, other: &Self) -> Result<Self> {
        if self.dim() != 2 || other.dim() != 2 {
            return Err(GeometryError::DimensionMismatch {
                left: self.dim(),
                right: other.dim(),
            }
            .into());
        }
        let (a, b) = (&self.components, &other.components);
        Ok(Self::new(&[0.0, 0.0, a[0] * b[1] - a[1] * b[0]]))
    }

    /// Euclidean length.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.components.norm()
    }

    /// Returns `true` if the length is below [`EPSILON`].
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.magnitude() < EPSILON
    }

    /// Unit vector with the same direction.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroVector` for a zero-length vector.
    pub fn normalize(&self) -> Result<Self> {
        let len = self.magnitude();
        if len < EPSILON {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            components: &self.components / len,
        })
    }

    fn check_dim(&self, other: &Self) -> Result<()> {
        if self.dim() == other.dim() {
            Ok(())
        } else {
            Err(GeometryError::DimensionMismatch {
                left: self.dim(),
                right: other.dim(),
            }
            .into())
        }
    }
}
