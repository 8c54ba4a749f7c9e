use crate::error::{RotationError, RotationResult};
use crate::util::Tolerance;
use crate::{AxisAngle, Quaternion, Vector3};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::{Index, Mul};
use uom::si::angle::radian;
use uom::si::f64::Angle;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 3×3 matrix that is meant to be a [rotation matrix].
///
/// Entries are addressed and constructed in row-major order, so `m[(row, col)]`.
///
/// <div class="warning">
///
/// [`RotationMatrix::is_rotation`] only checks that the determinant is (close to) one. It does
/// _not_ check that the matrix is orthonormal, so a shear or scale with unit determinant is
/// (incorrectly) accepted as a rotation, and the conversions out of it will produce values that
/// are not rotations either.
///
/// </div>
///
/// Matrix multiplication is defined for any pair of matrices and available as `*` and as
/// [`RotationMatrix::multiply`]. Applying `a * b` to a vector is the same as applying `b` first
/// and then `a`.
///
/// [rotation matrix]: https://en.wikipedia.org/wiki/Rotation_matrix
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// no need for the "inner": indirection
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RotationMatrix {
    pub(crate) inner: nalgebra::Matrix3<f64>,
}

impl RotationMatrix {
    /// Constructs a matrix from its rows.
    #[must_use]
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        let [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]] = rows;
        Self {
            inner: nalgebra::Matrix3::new(m00, m01, m02, m10, m11, m12, m20, m21, m22),
        }
    }

    /// Constructs a matrix from its nine entries in row-major order.
    #[must_use]
    pub fn from_row_slice(entries: [f64; 9]) -> Self {
        Self {
            inner: nalgebra::Matrix3::from_row_slice(&entries),
        }
    }

    /// The identity matrix.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            inner: nalgebra::Matrix3::identity(),
        }
    }

    /// Returns the entry at `row` and `col`.
    ///
    /// Returns `None` if either index is not in `0..3`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.inner.get((row, col)).copied()
    }

    /// Returns the rows of this matrix.
    #[must_use]
    pub fn rows(&self) -> [[f64; 3]; 3] {
        let m = &self.inner;
        [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ]
    }

    /// Returns the nine entries of this matrix in row-major order.
    #[must_use]
    pub fn to_row_major(&self) -> [f64; 9] {
        let [r0, r1, r2] = self.rows();
        [
            r0[0], r0[1], r0[2], r1[0], r1[1], r1[2], r2[0], r2[1], r2[2],
        ]
    }

    /// Returns the determinant by cofactor expansion along the first row.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        let m = &self.inner;
        m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(2, 1)] * m[(1, 2)])
            - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
            + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
    }

    /// Returns true if the determinant is within the default [`Tolerance`] of one.
    ///
    /// Orthonormality is not checked; see the [type docs](RotationMatrix).
    #[must_use]
    pub fn is_rotation(&self) -> bool {
        self.is_rotation_within(Tolerance::default())
    }

    /// Like [`RotationMatrix::is_rotation`], but with an explicit [`Tolerance`].
    #[must_use]
    pub fn is_rotation_within(&self, tolerance: Tolerance) -> bool {
        tolerance.is_close(self.determinant(), 1.)
    }

    /// Returns the transpose, which for a true rotation matrix is also its inverse.
    #[must_use]
    pub fn transpose(&self) -> Self {
        Self {
            inner: self.inner.transpose(),
        }
    }

    /// Returns the matrix product `self * rhs`.
    ///
    /// This is defined for any pair of matrices. If both are rotations, so is the product, since
    /// `det(self * rhs) = det(self) * det(rhs)`.
    #[doc(alias = "compose")]
    #[must_use]
    pub fn multiply(&self, rhs: &Self) -> Self {
        *self * *rhs
    }

    /// Returns the inverse of this matrix, computed from its adjugate.
    ///
    /// Fails with [`RotationError::Singular`] if the determinant is within the default
    /// [`Tolerance`] of zero.
    pub fn invert(&self) -> RotationResult<Self> {
        self.invert_within(Tolerance::default())
    }

    /// Like [`RotationMatrix::invert`], but with an explicit [`Tolerance`].
    pub fn invert_within(&self, tolerance: Tolerance) -> RotationResult<Self> {
        if tolerance.is_zero(self.determinant()) {
            log::debug!("refusing to invert singular matrix {self}");
            return Err(RotationError::Singular);
        }
        // nalgebra inverts 3×3 matrices through the cofactors directly
        let inner = self.inner.try_inverse().ok_or(RotationError::Singular)?;
        Ok(Self { inner })
    }

    /// Returns the quaternion equivalent of this rotation matrix.
    ///
    /// The quaternion is recovered through its `x` component, so this fails with
    /// [`RotationError::NumericallyUnstable`] for rotations whose axis is (close to)
    /// perpendicular to the x axis, including the identity.
    ///
    /// Fails with [`RotationError::NotARotation`] if this is not a rotation matrix.
    pub fn to_quaternion(&self) -> RotationResult<Quaternion> {
        self.to_quaternion_within(Tolerance::default())
    }

    /// Like [`RotationMatrix::to_quaternion`], but with an explicit [`Tolerance`].
    pub fn to_quaternion_within(&self, tolerance: Tolerance) -> RotationResult<Quaternion> {
        if !self.is_rotation_within(tolerance) {
            return Err(RotationError::NotARotation);
        }

        let m = &self.inner;
        // clamp so that rounding cannot push us into sqrt of a negative number
        let x = 0.5 * (1. + m[(0, 0)] - m[(1, 1)] - m[(2, 2)]).max(0.).sqrt();
        if tolerance.is_zero(x) {
            log::debug!("quaternion x component of {self} is too close to zero to divide by");
            return Err(RotationError::NumericallyUnstable);
        }

        let y = (m[(0, 1)] + m[(1, 0)]) / (4. * x);
        let z = (m[(0, 2)] + m[(2, 0)]) / (4. * x);
        let w = (m[(2, 1)] - m[(1, 2)]) / (4. * x);
        Ok(Quaternion::new(w, x, y, z))
    }

    /// Returns the axis and angle of the rotation this matrix represents.
    ///
    /// The axis is recovered from the skew-symmetric part of the matrix, whose magnitude is
    /// `2·sin(angle)`. The returned angle is in (0°, 180°) and the axis is a unit vector.
    ///
    /// Fails with [`RotationError::NumericallyUnstable`] if the skew-symmetric part vanishes,
    /// which is the case for the identity and for half-turns, since neither has an axis that can
    /// be determined this way.
    ///
    /// Fails with [`RotationError::NotARotation`] if this is not a rotation matrix.
    pub fn to_axis_angle(&self) -> RotationResult<AxisAngle> {
        self.to_axis_angle_within(Tolerance::default())
    }

    /// Like [`RotationMatrix::to_axis_angle`], but with an explicit [`Tolerance`].
    pub fn to_axis_angle_within(&self, tolerance: Tolerance) -> RotationResult<AxisAngle> {
        if !self.is_rotation_within(tolerance) {
            return Err(RotationError::NotARotation);
        }

        let m = &self.inner;
        let skew = Vector3::new(
            m[(2, 1)] - m[(1, 2)],
            m[(0, 2)] - m[(2, 0)],
            m[(1, 0)] - m[(0, 1)],
        );
        // the length of the skew-symmetric part is 2·sin(angle)
        let s2 = skew.norm();
        if s2 < tolerance.epsilon() {
            log::debug!("rotation axis of {self} cannot be determined");
            return Err(RotationError::NumericallyUnstable);
        }

        // the trace is 1 + 2·cos(angle); pairing it with the sine keeps the angle meaningful
        // past 90°, where asin alone would fold it back
        let cos = (m.trace() - 1.) / 2.;
        let angle = (s2 / 2.).atan2(cos);

        Ok(AxisAngle::new(skew / s2, Angle::new::<radian>(angle)))
    }

    /// Applies this matrix to `v`.
    ///
    /// Fails with [`RotationError::NotARotation`] if this is not a rotation matrix.
    pub fn rotate_vector(&self, v: Vector3) -> RotationResult<Vector3> {
        self.rotate_vector_within(v, Tolerance::default())
    }

    /// Like [`RotationMatrix::rotate_vector`], but with an explicit [`Tolerance`].
    pub fn rotate_vector_within(&self, v: Vector3, tolerance: Tolerance) -> RotationResult<Vector3> {
        if !self.is_rotation_within(tolerance) {
            return Err(RotationError::NotARotation);
        }
        Ok(self.inner * v)
    }
}

impl Default for RotationMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[[f64; 3]; 3]> for RotationMatrix {
    fn from(rows: [[f64; 3]; 3]) -> Self {
        Self::from_rows(rows)
    }
}

impl Index<(usize, usize)> for RotationMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.inner[(row, col)]
    }
}

impl Display for RotationMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let [r0, r1, r2] = self.rows();
        write!(f, "Matrix: [{r0:?}, {r1:?}, {r2:?}]")
    }
}

impl Mul for RotationMatrix {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            inner: self.inner * rhs.inner,
        }
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for RotationMatrix {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        nalgebra::Matrix3::<f64>::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.inner.abs_diff_eq(&other.inner, epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for RotationMatrix {
    fn default_max_relative() -> Self::Epsilon {
        nalgebra::Matrix3::<f64>::default_max_relative()
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

#[cfg(test)]
mod tests {
    use crate::error::RotationError;
    use crate::matrix::RotationMatrix;
    use crate::util::Tolerance;
    use crate::{AxisAngle, Quaternion, Vector3};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use quickcheck::{quickcheck, Arbitrary};
    use rstest::rstest;
    use uom::si::angle::{degree, radian};
    use uom::si::f64::Angle;

    fn d(degrees: f64) -> Angle {
        Angle::new::<degree>(degrees)
    }

    fn counting() -> RotationMatrix {
        RotationMatrix::from_rows([[1., 2., 3.], [4., 5., 6.], [7., 8., 9.]])
    }

    // rotation by 30 radians (not degrees!) about the x axis
    fn thirty_rad_about_x() -> RotationMatrix {
        RotationMatrix::from_rows([
            [1., 0., 0.],
            [0., 0.1542515, 0.9880316],
            [0., -0.9880316, 0.1542515],
        ])
    }

    #[test]
    fn row_major_construction() {
        let m = counting();
        assert_eq!(m.to_row_major(), [1., 2., 3., 4., 5., 6., 7., 8., 9.]);
        assert_eq!(
            RotationMatrix::from_row_slice([1., 2., 3., 4., 5., 6., 7., 8., 9.]),
            m
        );
        assert_eq!(m[(0, 1)], 2.);
        assert_eq!(m[(1, 0)], 4.);
        assert_eq!(m[(2, 1)], 8.);
        assert_eq!(m.get(1, 2), Some(6.));
        assert_eq!(m.get(3, 0), None);
        assert_eq!(m.rows(), [[1., 2., 3.], [4., 5., 6.], [7., 8., 9.]]);
    }

    #[test]
    fn non_rotation_is_rejected() {
        let m = counting();
        assert_eq!(m.determinant(), 0.);
        assert!(!m.is_rotation());
        assert_eq!(m.to_quaternion(), Err(RotationError::NotARotation));
        assert_eq!(m.to_axis_angle(), Err(RotationError::NotARotation));
        assert_eq!(
            m.rotate_vector(Vector3::new(0., 1., 0.)),
            Err(RotationError::NotARotation)
        );
    }

    #[test]
    fn singular_matrix_cannot_be_inverted() {
        assert_eq!(counting().invert(), Err(RotationError::Singular));
    }

    #[test]
    fn invert() {
        let m = RotationMatrix::from_rows([[2., 0., 1.], [1., 3., 0.], [0., 1., 4.]]);
        let inverse = m.invert().unwrap();
        assert_relative_eq!(m * inverse, RotationMatrix::identity(), epsilon = 1e-12);
        assert_relative_eq!(inverse * m, RotationMatrix::identity(), epsilon = 1e-12);
    }

    #[test]
    fn inverse_of_rotation_is_transpose() {
        let m = thirty_rad_about_x();
        assert_relative_eq!(m.invert().unwrap(), m.transpose(), epsilon = 1e-6);
    }

    #[test]
    fn multiply() {
        let a = counting();
        let b = RotationMatrix::from_rows([[2., 4., 1.], [4., 5., 9.2], [1., 1., 1.]]);
        let expected =
            RotationMatrix::from_rows([[13., 17., 22.4], [34., 47., 56.], [55., 77., 89.6]]);
        assert_relative_eq!(a * b, expected, epsilon = 1e-12);
        assert_relative_eq!(a.multiply(&b), expected, epsilon = 1e-12);
    }

    #[test]
    fn identity_is_rotation() {
        let m = RotationMatrix::identity();
        assert_eq!(m, RotationMatrix::default());
        assert_eq!(m.determinant(), 1.);
        assert!(m.is_rotation());
    }

    #[test]
    fn determinant_only_check_accepts_shear() {
        // unit determinant but not orthonormal; accepted all the same
        let shear = RotationMatrix::from_rows([[1., 1., 0.], [0., 1., 0.], [0., 0., 1.]]);
        assert!(shear.is_rotation());
    }

    #[test]
    fn is_rotation_respects_tolerance() {
        let m = RotationMatrix::from_rows([[1. + 1e-5, 0., 0.], [0., 1., 0.], [0., 0., 1.]]);
        assert!(!m.is_rotation());
        assert!(m.is_rotation_within(Tolerance::new(1e-4).unwrap()));
    }

    #[test]
    fn to_quaternion() {
        let q = thirty_rad_about_x().to_quaternion().unwrap();
        assert_abs_diff_eq!(
            q,
            Quaternion::new(-0.7596879, 0.6502878, 0., 0.),
            epsilon = 1e-6
        );
    }

    #[rstest]
    #[case(RotationMatrix::identity())]
    // half turn about z
    #[case(RotationMatrix::from_rows([[-1., 0., 0.], [0., -1., 0.], [0., 0., 1.]]))]
    fn to_quaternion_guards_division_by_zero(#[case] m: RotationMatrix) {
        assert!(m.is_rotation());
        assert_eq!(m.to_quaternion(), Err(RotationError::NumericallyUnstable));
    }

    #[test]
    fn to_axis_angle() {
        let aa = thirty_rad_about_x().to_axis_angle().unwrap();
        // 30 rad is -1.4159 rad about x, which we report as +1.4159 rad about -x
        assert_abs_diff_eq!(aa.axis(), Vector3::new(-1., 0., 0.), epsilon = 1e-6);
        assert_abs_diff_eq!(
            aa.angle().get::<radian>(),
            std::f64::consts::TAU - 30f64.rem_euclid(std::f64::consts::TAU),
            epsilon = 1e-6
        );
    }

    #[rstest]
    #[case(RotationMatrix::identity())]
    #[case(RotationMatrix::from_rows([[1., 0., 0.], [0., -1., 0.], [0., 0., -1.]]))]
    fn to_axis_angle_guards_missing_axis(#[case] m: RotationMatrix) {
        assert_eq!(m.to_axis_angle(), Err(RotationError::NumericallyUnstable));
    }

    #[rstest]
    #[case([1., 0., 0.], 30.)]
    #[case([0., 1., 0.], 89.)]
    #[case([0., 0., 1.], 90.)]
    #[case([0., 0., -1.], 135.)]
    #[case([0.6, 0., 0.8], 179.)]
    fn to_axis_angle_roundtrip_past_ninety_degrees(#[case] axis: [f64; 3], #[case] degrees: f64) {
        let aa = AxisAngle::new(Vector3::from(axis), d(degrees));
        let back = aa.to_matrix().unwrap().to_axis_angle().unwrap();
        assert_relative_eq!(back.axis(), Vector3::from(axis), epsilon = 1e-6);
        assert_relative_eq!(back.angle().get::<degree>(), degrees, epsilon = 1e-6);
    }

    #[test]
    fn rotate_vector() {
        let rotated = thirty_rad_about_x()
            .rotate_vector(Vector3::new(0., 1., 0.))
            .unwrap();
        assert_abs_diff_eq!(
            rotated,
            Vector3::new(0., 30f64.cos(), 30f64.sin()),
            epsilon = 1e-6
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            RotationMatrix::identity().to_string(),
            "Matrix: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]"
        );
    }

    #[test]
    #[cfg(feature = "serde")]
    fn matrix_serde() {
        let m = thirty_rad_about_x();
        let ser = serde_yaml::to_string(&m).unwrap();
        let de = serde_yaml::from_str::<RotationMatrix>(&ser).unwrap();
        assert_eq!(m, de);
    }

    /// A matrix with entries in [-10, 10].
    #[derive(Clone, Debug)]
    struct Bounded(RotationMatrix);

    impl Arbitrary for Bounded {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let mut entries = [0.; 9];
            for entry in &mut entries {
                *entry = f64::from(i8::arbitrary(g)) / 12.8;
            }
            Self(RotationMatrix::from_row_slice(entries))
        }
    }

    quickcheck! {
        fn determinant_is_multiplicative(a: Bounded, b: Bounded) -> () {
            let (Bounded(a), Bounded(b)) = (a, b);
            assert_relative_eq!(
                (a * b).determinant(),
                a.determinant() * b.determinant(),
                epsilon = 1e-6,
                max_relative = 1e-9
            );
        }

        fn rotation_is_isometry(yaw: i16, pitch: i16, x: i16, y: i16, z: i16) -> () {
            let about_z = AxisAngle::new(Vector3::z(), d(f64::from(yaw) / 10.));
            let about_y = AxisAngle::new(Vector3::y(), d(f64::from(pitch) / 10.));
            let (Ok(about_z), Ok(about_y)) = (about_z.to_matrix(), about_y.to_matrix()) else {
                // zero angle; not a rotation
                return;
            };
            let m = about_z * about_y;
            let v = Vector3::new(f64::from(x), f64::from(y), f64::from(z));
            let rotated = m.rotate_vector(v).expect("product of rotations is a rotation");
            assert_relative_eq!(rotated.norm(), v.norm(), epsilon = 1e-6, max_relative = 1e-9);
        }
    }
}
