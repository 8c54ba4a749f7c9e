//! Applying and chaining rotations, regardless of how they are represented.
//!
//! The representations in this crate ([`Quaternion`], [`RotationMatrix`], and [`AxisAngle`]) each
//! know how to rotate a vector on their own. This module provides the representation-agnostic
//! interface on top: the [`Rotate`] trait for applying a rotation to a vector, the [`Compose`]
//! trait (and [`compose`]) for chaining two rotations into one, and [`rotate_points`] for applying
//! a rotation to an entire point cloud.
//!
//! Applying a rotation is _partial_: it fails with [`RotationError::NotARotation`] when the value
//! does not actually denote a rotation. Composition, on the other hand, is total, since both the
//! Hamilton product and matrix multiplication are always defined. Whether the composite is a
//! rotation is only checked once it is applied.
//!
//! Whichever representation is used, the results agree:
//!
//! ```rust
//! use approx::assert_relative_eq;
//! use uom::si::{f64::Angle, angle::degree};
//! use versor::{AxisAngle, Vector3};
//! use versor::math::compose;
//!
//! let first = AxisAngle::new(Vector3::x(), Angle::new::<degree>(15.));
//! let then = AxisAngle::new(Vector3::x(), Angle::new::<degree>(20.));
//! let v = Vector3::new(0., 1., 0.);
//!
//! let step_by_step = then.rotate_vector(first.rotate_vector(v)?)?;
//!
//! let as_matrix = compose(&then.to_matrix()?, &first.to_matrix()?);
//! assert_relative_eq!(as_matrix.rotate_vector(v)?, step_by_step, epsilon = 1e-9);
//!
//! let as_quaternion = compose(&then.to_quaternion()?, &first.to_quaternion()?);
//! assert_relative_eq!(as_quaternion.rotate_vector(v)?, step_by_step, epsilon = 1e-9);
//! # Ok::<(), versor::RotationError>(())
//! ```

use crate::error::RotationResult;
use crate::util::Tolerance;
use crate::{AxisAngle, Quaternion, RotationMatrix, Vector3};

#[cfg(doc)]
use crate::RotationError;

/// A representation of a rotation that can be applied to vectors.
pub trait Rotate {
    /// Rotates `v`, checking validity with the given [`Tolerance`].
    ///
    /// Fails with [`RotationError::NotARotation`] if `self` does not denote a rotation.
    fn rotate_vector_within(&self, v: Vector3, tolerance: Tolerance) -> RotationResult<Vector3>;

    /// Rotates `v`, checking validity with the default [`Tolerance`].
    ///
    /// Fails with [`RotationError::NotARotation`] if `self` does not denote a rotation.
    #[doc(alias = "apply")]
    fn rotate_vector(&self, v: Vector3) -> RotationResult<Vector3> {
        self.rotate_vector_within(v, Tolerance::default())
    }
}

impl Rotate for Quaternion {
    fn rotate_vector_within(&self, v: Vector3, tolerance: Tolerance) -> RotationResult<Vector3> {
        Quaternion::rotate_vector_within(self, v, tolerance)
    }
}

impl Rotate for RotationMatrix {
    fn rotate_vector_within(&self, v: Vector3, tolerance: Tolerance) -> RotationResult<Vector3> {
        RotationMatrix::rotate_vector_within(self, v, tolerance)
    }
}

impl Rotate for AxisAngle {
    fn rotate_vector_within(&self, v: Vector3, tolerance: Tolerance) -> RotationResult<Vector3> {
        AxisAngle::rotate_vector_within(self, v, tolerance)
    }
}

impl<R> Rotate for &R
where
    R: Rotate + ?Sized,
{
    fn rotate_vector_within(&self, v: Vector3, tolerance: Tolerance) -> RotationResult<Vector3> {
        (**self).rotate_vector_within(v, tolerance)
    }
}

/// A representation of rotations in which two rotations can be chained into one.
pub trait Compose: Sized {
    /// Returns the rotation that applies `first` and then `self`.
    #[must_use]
    fn after(&self, first: &Self) -> Self;
}

// (q2 * q1) (0, v) (q2 * q1)⁻¹ = q2 (q1 (0, v) q1⁻¹) q2⁻¹
impl Compose for Quaternion {
    fn after(&self, first: &Self) -> Self {
        self.multiply(first)
    }
}

// (M2 · M1) v = M2 (M1 v)
impl Compose for RotationMatrix {
    fn after(&self, first: &Self) -> Self {
        self.multiply(first)
    }
}

/// Returns the rotation that applies `first` and then `second`.
///
/// Note the argument order, which matches how the composite is written mathematically
/// (`second · first`) rather than the order in which the rotations are applied.
///
/// This is total: it never checks whether the operands are rotations. For matrices,
/// `det(compose(a, b)) = det(a) · det(b)`, so the composite of two rotations is again a rotation.
#[must_use]
pub fn compose<R>(second: &R, first: &R) -> R
where
    R: Compose,
{
    second.after(first)
}

/// Rotates every point in `points` by `rotation`, checking validity with the default
/// [`Tolerance`].
///
/// See [`rotate_points_within`].
pub fn rotate_points<I, R>(points: I, rotation: &R) -> Vec<Vector3>
where
    I: IntoIterator,
    I::Item: Into<Vector3>,
    R: Rotate + ?Sized,
{
    rotate_points_within(points, rotation, Tolerance::default())
}

/// Rotates every point in `points` by `rotation`.
///
/// Points for which the rotation fails are dropped from the output; the remaining points keep
/// their relative order. Since validity only depends on `rotation`, this in practice means that
/// either all points are rotated or none are.
///
/// ```rust
/// use versor::{Quaternion, Vector3};
/// use versor::math::rotate_points;
///
/// let cloud = [[1., 0., 0.], [0., 1., 0.], [0., 0., 1.]];
///
/// let cycled = rotate_points(cloud, &Quaternion::new(0.5, 0.5, 0.5, 0.5));
/// assert_eq!(cycled.len(), 3);
///
/// let not_a_rotation = Quaternion::new(1., 2., 3., 4.);
/// assert!(rotate_points(cloud, &not_a_rotation).is_empty());
/// ```
pub fn rotate_points_within<I, R>(points: I, rotation: &R, tolerance: Tolerance) -> Vec<Vector3>
where
    I: IntoIterator,
    I::Item: Into<Vector3>,
    R: Rotate + ?Sized,
{
    points
        .into_iter()
        .filter_map(|point| {
            let point = point.into();
            match rotation.rotate_vector_within(point, tolerance) {
                Ok(rotated) => Some(rotated),
                Err(e) => {
                    log::trace!("dropping point {point:?}: {e}");
                    None
                }
            }
        })
        .collect()
}
