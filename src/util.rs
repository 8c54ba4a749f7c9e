use crate::error::InvalidTolerance;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The epsilon used by every rotation-validity check and singularity guard in this crate.
///
/// There is exactly one tolerance per call: the same value decides whether a quaternion is unit,
/// whether a matrix determinant is close enough to one, whether an axis-angle is non-degenerate,
/// and whether a denominator is too close to zero to divide by. Operations that take no explicit
/// tolerance use [`Tolerance::default`], which is `1e-6`.
///
/// With the `serde` feature, a `Tolerance` (de)serializes as a bare number so that it can be
/// embedded directly in a caller's configuration. Deserialization validates the number the same
/// way [`Tolerance::new`] does.
///
/// ```rust
/// use versor::{Quaternion, Tolerance};
///
/// let tight = Tolerance::new(1e-12).expect("tolerance is positive");
/// let almost_unit = Quaternion::new(1.0 + 1e-9, 0., 0., 0.);
///
/// assert!(almost_unit.is_rotation());
/// assert!(!almost_unit.is_rotation_within(tight));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct Tolerance {
    epsilon: f64,
}

impl Tolerance {
    /// The tolerance used when none is given explicitly.
    pub const DEFAULT: Self = Self { epsilon: 1e-6 };

    /// Constructs a tolerance of `epsilon`.
    ///
    /// `epsilon` must be finite and strictly positive. If it is not, this function returns `None`.
    #[must_use]
    pub fn new(epsilon: f64) -> Option<Self> {
        if epsilon.is_finite() && epsilon > 0. {
            Some(Self { epsilon })
        } else {
            None
        }
    }

    /// Returns the raw epsilon.
    #[must_use]
    pub fn epsilon(self) -> f64 {
        self.epsilon
    }

    /// Returns true if `|value| < epsilon`.
    pub(crate) fn is_zero(self, value: f64) -> bool {
        value.abs() < self.epsilon
    }

    /// Returns true if `|a - b| < epsilon`.
    pub(crate) fn is_close(self, a: f64, b: f64) -> bool {
        self.is_zero(a - b)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Tolerance {
    type Error = InvalidTolerance;

    fn try_from(epsilon: f64) -> Result<Self, Self::Error> {
        Self::new(epsilon).ok_or(InvalidTolerance(epsilon))
    }
}

impl From<Tolerance> for f64 {
    fn from(tolerance: Tolerance) -> Self {
        tolerance.epsilon
    }
}
