//! Error types for tang-geom.

use core::fmt;

/// Failures surfaced by the kernel. Everything else is a total function that
/// lets IEEE special values propagate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GeomError {
    /// Element, row, column or plane index outside `[0, dim)`.
    OutOfBounds { index: usize, dim: usize },
    /// Matrix inversion with a (numerically) zero determinant.
    Singular { det: f64 },
    /// Flat array interop with the wrong element count or shape.
    ShapeMismatch { expected: usize, got: usize },
}

impl GeomError {
    pub(crate) fn out_of_bounds(index: usize, dim: usize) -> Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(index, dim, "index out of bounds");
        Self::OutOfBounds { index, dim }
    }

    pub(crate) fn singular(det: f64) -> Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(det, "singular matrix");
        Self::Singular { det }
    }

    pub(crate) fn shape_mismatch(expected: usize, got: usize) -> Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(expected, got, "array shape mismatch");
        Self::ShapeMismatch { expected, got }
    }
}

impl fmt::Display for GeomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { index, dim } => {
                write!(f, "index {index} out of bounds for dimension {dim}")
            }
            Self::Singular { det } => write!(f, "matrix is singular (determinant {det})"),
            Self::ShapeMismatch { expected, got } => {
                write!(f, "array shape mismatch: expected {expected} elements, got {got}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GeomError {}

pub type Result<T> = core::result::Result<T, GeomError>;

/// Checks `index < dim`.
#[inline]
pub(crate) fn check_index(index: usize, dim: usize) -> Result<()> {
    if index < dim {
        Ok(())
    } else {
        Err(GeomError::out_of_bounds(index, dim))
    }
}
