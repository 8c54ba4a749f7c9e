use crate::error::{RotationError, RotationResult};
use crate::util::Tolerance;
use crate::{Quaternion, RotationMatrix, Vector3};
use std::fmt::{Display, Formatter};
use uom::si::angle::{degree, radian};
use uom::si::f64::Angle;

#[cfg(any(feature = "approx", test))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rotation by [`AxisAngle::angle`] about [`AxisAngle::axis`].
///
/// The direction of rotation follows the [right-hand rule for rotations][rhrot]: curl your
/// fingers and stick your thumb out along the axis. The direction your fingers curl is the
/// direction of (positive) rotation.
///
/// The axis does not need to be a unit vector; it is normalized when converting into the other
/// representations. It does need to be non-zero, and the angle needs to be non-zero, for the
/// value to denote a rotation (see [`AxisAngle::is_rotation`]). The zero axis is also what
/// [`Quaternion::to_axis_angle`] returns for rotations that have no unique axis.
///
/// ```rust
/// use approx::assert_relative_eq;
/// use uom::si::{f64::Angle, angle::degree};
/// use versor::{AxisAngle, Vector3};
///
/// let quarter_turn = AxisAngle::new(Vector3::z(), Angle::new::<degree>(90.));
/// let matrix = quarter_turn.to_matrix().expect("axis and angle are non-zero");
///
/// assert_relative_eq!(
///     matrix.rotate_vector(Vector3::x()).unwrap(),
///     Vector3::y(),
///     epsilon = 1e-12
/// );
/// ```
///
/// [rhrot]: https://en.wikipedia.org/wiki/Right-hand_rule#Rotations
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisAngle {
    axis: Vector3,
    angle: Angle,
}

impl AxisAngle {
    /// Constructs a rotation by `angle` about `axis`.
    #[must_use]
    pub fn new(axis: Vector3, angle: impl Into<Angle>) -> Self {
        Self {
            axis,
            angle: angle.into(),
        }
    }

    /// Returns the axis exactly as it was given (ie, not normalized).
    #[must_use]
    pub fn axis(&self) -> Vector3 {
        self.axis
    }

    #[must_use]
    pub fn angle(&self) -> Angle {
        self.angle
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.axis.x
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.axis.y
    }

    #[must_use]
    pub fn z(&self) -> f64 {
        self.axis.z
    }

    /// Returns true if both the axis and the angle are non-zero under the default
    /// [`Tolerance`].
    #[must_use]
    pub fn is_rotation(&self) -> bool {
        self.is_rotation_within(Tolerance::default())
    }

    /// Like [`AxisAngle::is_rotation`], but with an explicit [`Tolerance`].
    #[must_use]
    pub fn is_rotation_within(&self, tolerance: Tolerance) -> bool {
        !tolerance.is_zero(self.axis.norm()) && !tolerance.is_zero(self.angle.get::<radian>())
    }

    /// Returns the unit axis, provided this is a rotation.
    fn unit_axis(&self, tolerance: Tolerance) -> RotationResult<Vector3> {
        if !self.is_rotation_within(tolerance) {
            return Err(RotationError::NotARotation);
        }
        Ok(self.axis.normalize())
    }

    /// Returns the rotation matrix for this rotation using [Rodrigues' formula].
    ///
    /// Fails with [`RotationError::NotARotation`] if the axis or the angle is zero.
    ///
    /// [Rodrigues' formula]: https://en.wikipedia.org/wiki/Rodrigues%27_rotation_formula
    pub fn to_matrix(&self) -> RotationResult<RotationMatrix> {
        self.to_matrix_within(Tolerance::default())
    }

    /// Like [`AxisAngle::to_matrix`], but with an explicit [`Tolerance`].
    pub fn to_matrix_within(&self, tolerance: Tolerance) -> RotationResult<RotationMatrix> {
        let axis = self.unit_axis(tolerance)?;
        let (x, y, z) = (axis.x, axis.y, axis.z);
        let theta = self.angle.get::<radian>();
        let (s, c) = theta.sin_cos();
        let t = 1. - c;

        // I·cosθ + (1 - cosθ)·aaᵗ + sinθ·[a]×
        Ok(RotationMatrix::from_rows([
            [x * x * t + c, x * y * t - z * s, x * z * t + y * s],
            [y * x * t + z * s, y * y * t + c, y * z * t - x * s],
            [z * x * t - y * s, z * y * t + x * s, z * z * t + c],
        ]))
    }

    /// Returns the unit quaternion for this rotation, `(cos(θ/2), axis·sin(θ/2))`.
    ///
    /// Fails with [`RotationError::NotARotation`] if the axis or the angle is zero.
    pub fn to_quaternion(&self) -> RotationResult<Quaternion> {
        self.to_quaternion_within(Tolerance::default())
    }

    /// Like [`AxisAngle::to_quaternion`], but with an explicit [`Tolerance`].
    pub fn to_quaternion_within(&self, tolerance: Tolerance) -> RotationResult<Quaternion> {
        let axis = self.unit_axis(tolerance)?;
        let (s, c) = (self.angle.get::<radian>() / 2.).sin_cos();
        Ok(Quaternion::from_parts(c, axis * s))
    }

    /// Rotates `v` by this rotation.
    ///
    /// Fails with [`RotationError::NotARotation`] if the axis or the angle is zero.
    pub fn rotate_vector(&self, v: Vector3) -> RotationResult<Vector3> {
        self.rotate_vector_within(v, Tolerance::default())
    }

    /// Like [`AxisAngle::rotate_vector`], but with an explicit [`Tolerance`].
    pub fn rotate_vector_within(&self, v: Vector3, tolerance: Tolerance) -> RotationResult<Vector3> {
        self.to_quaternion_within(tolerance)?
            .rotate_vector_within(v, tolerance)
    }
}

impl Display for AxisAngle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?}° about [{:?}, {:?}, {:?}]",
            self.angle.get::<degree>(),
            self.axis.x,
            self.axis.y,
            self.axis.z,
        )
    }
}

#[cfg(any(feature = "approx", test))]
impl AbsDiffEq<Self> for AxisAngle {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        Vector3::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.axis.abs_diff_eq(&other.axis, epsilon)
            && self
                .angle
                .get::<radian>()
                .abs_diff_eq(&other.angle.get::<radian>(), epsilon)
    }
}

#[cfg(any(feature = "approx", test))]
impl RelativeEq for AxisAngle {
    fn default_max_relative() -> Self::Epsilon {
        Vector3::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.axis.relative_eq(&other.axis, epsilon, max_relative)
            && self.angle.get::<radian>().relative_eq(
                &other.angle.get::<radian>(),
                epsilon,
                max_relative,
            )
    }
}
