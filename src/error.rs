use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub type RotationResult<T> = Result<T, RotationError>;

/// The ways a rotation operation can fail.
///
/// Degenerate-but-defined inputs (such as a quaternion with a zero rotation angle, which has no
/// unique axis) are _not_ errors; see the individual conversions for the sentinel they produce.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RotationError {
    /// The value does not denote a rotation: a quaternion that is not unit-norm, a matrix whose
    /// determinant is not one, or an axis-angle whose axis or angle is zero.
    #[error("value does not represent a rotation")]
    NotARotation,

    /// The matrix determinant is zero, so the matrix has no inverse.
    #[error("matrix is singular")]
    Singular,

    /// The conversion would divide by (or take the inverse sine of) a value too close to a
    /// singularity to give a meaningful result.
    #[error("conversion is numerically unstable for this input")]
    NumericallyUnstable,
}

/// A [`Tolerance`](crate::Tolerance) epsilon that is not finite and strictly positive.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
#[error("tolerance must be finite and positive, got {0}")]
pub struct InvalidTolerance(pub f64);
