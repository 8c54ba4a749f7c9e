//! This library represents 3D rotations in three interchangeable forms and converts between them:
//!
//! - [`AxisAngle`]: a rotation by some angle about an axis;
//! - [`Quaternion`]: a [unit quaternion] (aka versor);
//! - [`RotationMatrix`]: a 3×3 matrix with determinant one.
//!
//! Not every value of these types actually denotes a rotation (think a quaternion of norm 2, or a
//! zero axis). Each type therefore has an `is_rotation` check, and every operation that only
//! makes sense for rotations returns a [`RotationResult`] that fails with
//! [`RotationError::NotARotation`] rather than silently producing garbage. Conversions that
//! would divide by (almost) zero fail with [`RotationError::NumericallyUnstable`] instead of
//! producing NaN or infinity.
//!
//! All of these checks use the same epsilon, which defaults to `1e-6` and can be chosen
//! explicitly through a [`Tolerance`] passed to the `*_within` variants of each operation.
//!
//! To apply or chain rotations independently of their representation, see the [`math`]
//! submodule.
//!
//! # Examples
//!
//! A rotation of 90° about the z axis takes the x axis to the y axis, however it is represented:
//!
//! ```
//! use approx::assert_relative_eq;
//! use uom::si::{f64::Angle, angle::degree};
//! use versor::{AxisAngle, Vector3};
//!
//! let quarter_turn = AxisAngle::new(Vector3::z(), Angle::new::<degree>(90.));
//!
//! let as_quaternion = quarter_turn.to_quaternion()?;
//! let as_matrix = quarter_turn.to_matrix()?;
//!
//! assert_relative_eq!(as_quaternion.rotate_vector(Vector3::x())?, Vector3::y(), epsilon = 1e-12);
//! assert_relative_eq!(as_matrix.rotate_vector(Vector3::x())?, Vector3::y(), epsilon = 1e-12);
//! assert_relative_eq!(as_quaternion.to_matrix(), as_matrix, epsilon = 1e-12);
//! # Ok::<(), versor::RotationError>(())
//! ```
//!
//! Values that are not rotations are rejected:
//!
//! ```
//! use versor::{RotationError, RotationMatrix, Vector3};
//!
//! let m = RotationMatrix::from_rows([[1., 2., 3.], [4., 5., 6.], [7., 8., 9.]]);
//!
//! assert_eq!(m.determinant(), 0.);
//! assert!(!m.is_rotation());
//! assert_eq!(m.to_quaternion(), Err(RotationError::NotARotation));
//! assert_eq!(m.rotate_vector(Vector3::x()), Err(RotationError::NotARotation));
//! ```
//!
//! [unit quaternion]: https://en.wikipedia.org/wiki/Versor

mod axis_angle;
mod error;
mod matrix;
mod quaternion;
mod util;

pub mod math;

/// A vector in 3D space, as rotated by the types in this crate.
pub type Vector3 = nalgebra::Vector3<f64>;

pub use axis_angle::AxisAngle;
pub use error::{InvalidTolerance, RotationError, RotationResult};
pub use matrix::RotationMatrix;
pub use quaternion::Quaternion;
pub use util::Tolerance;
