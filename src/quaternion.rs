use crate::error::{RotationError, RotationResult};
use crate::util::Tolerance;
use crate::{AxisAngle, RotationMatrix, Vector3};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Div, Mul, Neg, Sub};
use uom::si::angle::radian;
use uom::si::f64::Angle;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A quaternion `w + xi + yj + zk` with scalar part `w` and vector part `(x, y, z)`.
///
/// Any quaternion can be constructed and computed with, but only a [unit quaternion] denotes a
/// rotation. Operations that only make sense for rotations (like [`Quaternion::rotate_vector`])
/// check [`Quaternion::is_rotation`] first and fail with [`RotationError::NotARotation`]
/// otherwise.
///
/// Quaternions compose by the (non-commutative) [Hamilton product], available both as `*` and as
/// [`Quaternion::multiply`]. Rotating by `a * b` is the same as rotating by `b` first and then by
/// `a`.
///
/// [unit quaternion]: https://en.wikipedia.org/wiki/Versor
/// [Hamilton product]: https://en.wikipedia.org/wiki/Quaternion#Hamilton_product
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// no need for the "inner": indirection
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Quaternion {
    pub(crate) inner: nalgebra::Quaternion<f64>,
}

impl Quaternion {
    /// Constructs the quaternion `w + xi + yj + zk`.
    #[must_use]
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self {
            inner: nalgebra::Quaternion::new(w, x, y, z),
        }
    }

    /// Constructs a quaternion from its scalar part and its vector part.
    #[must_use]
    pub fn from_parts(w: f64, vector: Vector3) -> Self {
        Self::new(w, vector.x, vector.y, vector.z)
    }

    /// Constructs the pure quaternion `(0, v)`.
    #[must_use]
    pub fn from_vector(v: Vector3) -> Self {
        Self::from_parts(0., v)
    }

    /// The quaternion `(1, 0, 0, 0)`, which rotates nothing.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(1., 0., 0., 0.)
    }

    #[must_use]
    pub fn w(&self) -> f64 {
        self.inner.w
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.inner.i
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.inner.j
    }

    #[must_use]
    pub fn z(&self) -> f64 {
        self.inner.k
    }

    /// Returns the vector (imaginary) part `(x, y, z)`.
    #[must_use]
    pub fn vector_part(&self) -> Vector3 {
        self.inner.imag()
    }

    /// Returns the components in `[w, x, y, z]` order.
    #[must_use]
    pub fn to_array(&self) -> [f64; 4] {
        [self.w(), self.x(), self.y(), self.z()]
    }

    /// Returns the Euclidean norm `sqrt(w² + x² + y² + z²)`.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.inner.norm()
    }

    /// Returns the conjugate `(w, -x, -y, -z)`.
    ///
    /// This is only the true multiplicative inverse when `self` is a unit quaternion, which is
    /// the only case where it matters for rotations.
    #[doc(alias = "conjugate")]
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            inner: self.inner.conjugate(),
        }
    }

    /// Returns the Hamilton product `self * rhs`.
    #[must_use]
    pub fn multiply(&self, rhs: &Self) -> Self {
        *self * *rhs
    }

    /// Scales this quaternion to unit norm.
    ///
    /// Fails with [`RotationError::NumericallyUnstable`] if the norm is within the default
    /// [`Tolerance`] of zero.
    pub fn normalize(&self) -> RotationResult<Self> {
        self.normalize_within(Tolerance::default())
    }

    /// Like [`Quaternion::normalize`], but with an explicit [`Tolerance`].
    pub fn normalize_within(&self, tolerance: Tolerance) -> RotationResult<Self> {
        let norm = self.norm();
        if tolerance.is_zero(norm) {
            log::debug!("refusing to normalize near-zero quaternion {self}");
            return Err(RotationError::NumericallyUnstable);
        }
        Ok(*self / norm)
    }

    /// Returns true if this is a unit quaternion, ie, `|‖q‖ - 1|` is below the default
    /// [`Tolerance`].
    #[must_use]
    pub fn is_rotation(&self) -> bool {
        self.is_rotation_within(Tolerance::default())
    }

    /// Like [`Quaternion::is_rotation`], but with an explicit [`Tolerance`].
    #[must_use]
    pub fn is_rotation_within(&self, tolerance: Tolerance) -> bool {
        tolerance.is_close(self.norm(), 1.)
    }

    /// Returns the matrix equivalent of this quaternion.
    ///
    /// This is defined for _any_ quaternion, but the result is only a rotation matrix if `self`
    /// is a unit quaternion. Check [`Quaternion::is_rotation`] first if that matters.
    #[must_use]
    pub fn to_matrix(&self) -> RotationMatrix {
        let (w, x, y, z) = (self.w(), self.x(), self.y(), self.z());
        RotationMatrix::from_rows([
            [
                2. * (x * x + w * w) - 1.,
                2. * (x * y - z * w),
                2. * (x * z + y * w),
            ],
            [
                2. * (x * y + z * w),
                2. * (y * y + w * w) - 1.,
                2. * (y * z - x * w),
            ],
            [
                2. * (x * z - y * w),
                2. * (x * w + y * z),
                2. * (z * z + w * w) - 1.,
            ],
        ])
    }

    /// Returns the axis and angle of the rotation this quaternion represents.
    ///
    /// The returned angle is in [0°, 360°]. If it is (close to) zero or a full turn, the rotation
    /// has no unique axis, and the returned axis is the zero vector. Such an [`AxisAngle`] is
    /// _not_ itself a rotation according to [`AxisAngle::is_rotation`].
    ///
    /// Fails with [`RotationError::NotARotation`] if this is not a unit quaternion.
    pub fn to_axis_angle(&self) -> RotationResult<AxisAngle> {
        self.to_axis_angle_within(Tolerance::default())
    }

    /// Like [`Quaternion::to_axis_angle`], but with an explicit [`Tolerance`].
    pub fn to_axis_angle_within(&self, tolerance: Tolerance) -> RotationResult<AxisAngle> {
        if !self.is_rotation_within(tolerance) {
            return Err(RotationError::NotARotation);
        }

        let vector = self.vector_part();
        let angle = 2. * vector.norm().atan2(self.w());
        let half_sin = (angle / 2.).sin();

        // sin(angle / 2) is never negative here since angle / 2 is in [0, π]
        let axis = if half_sin < tolerance.epsilon() {
            Vector3::zeros()
        } else {
            vector / half_sin
        };

        Ok(AxisAngle::new(axis, Angle::new::<radian>(angle)))
    }

    /// Rotates `v` by this quaternion using the sandwich product `q (0, v) q⁻¹`.
    ///
    /// Fails with [`RotationError::NotARotation`] if this is not a unit quaternion.
    pub fn rotate_vector(&self, v: Vector3) -> RotationResult<Vector3> {
        self.rotate_vector_within(v, Tolerance::default())
    }

    /// Like [`Quaternion::rotate_vector`], but with an explicit [`Tolerance`].
    pub fn rotate_vector_within(&self, v: Vector3, tolerance: Tolerance) -> RotationResult<Vector3> {
        if !self.is_rotation_within(tolerance) {
            return Err(RotationError::NotARotation);
        }
        Ok((*self * Self::from_vector(v) * self.inverse()).vector_part())
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[f64; 4]> for Quaternion {
    /// Interprets the array as `[w, x, y, z]`.
    fn from([w, x, y, z]: [f64; 4]) -> Self {
        Self::new(w, x, y, z)
    }
}

impl Display for Quaternion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quaternion: w = {}, [x = {}, y = {}, z = {}]",
            self.w(),
            self.x(),
            self.y(),
            self.z()
        )
    }
}

impl Add for Quaternion {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            inner: self.inner + rhs.inner,
        }
    }
}

impl Sub for Quaternion {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            inner: self.inner - rhs.inner,
        }
    }
}

impl Neg for Quaternion {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self { inner: -self.inner }
    }
}

impl Mul<f64> for Quaternion {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            inner: self.inner * rhs,
        }
    }
}

impl Mul<Quaternion> for f64 {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Self::Output {
        rhs * self
    }
}

impl Div<f64> for Quaternion {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self {
            inner: self.inner / rhs,
        }
    }
}

// Hamilton product
impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            inner: self.inner * rhs.inner,
        }
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for Quaternion {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        nalgebra::Quaternion::<f64>::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.inner.abs_diff_eq(&other.inner, epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for Quaternion {
    fn default_max_relative() -> Self::Epsilon {
        nalgebra::Quaternion::<f64>::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.inner.relative_eq(&other.inner, epsilon, max_relative)
    }
}
