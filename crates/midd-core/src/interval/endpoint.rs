//! EndPoint - a single interval bound

use std::fmt;

/// A bound of an interval: a finite value or one of the two infinities.
///
/// The derived ordering follows declaration order, so
/// `NegativeInfinity < Finite(_) < PositiveInfinity`, and two finite
/// values compare by `T`'s own order.
///
/// # Examples
///
/// ```
/// use midd_core::EndPoint;
///
/// assert!(EndPoint::NegativeInfinity < EndPoint::Finite(i64::MIN));
/// assert!(EndPoint::Finite(3) < EndPoint::Finite(4));
/// assert!(EndPoint::Finite(i64::MAX) < EndPoint::PositiveInfinity);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EndPoint<T> {
    NegativeInfinity,
    Finite(T),
    PositiveInfinity,
}

impl<T> EndPoint<T> {
    /// Creates a finite end point.
    #[inline]
    pub const fn of(value: T) -> Self {
        EndPoint::Finite(value)
    }

    /// Returns true for either infinity.
    #[inline]
    pub const fn is_infinite(&self) -> bool {
        !matches!(self, EndPoint::Finite(_))
    }

    #[inline]
    pub const fn is_negative_infinity(&self) -> bool {
        matches!(self, EndPoint::NegativeInfinity)
    }

    #[inline]
    pub const fn is_positive_infinity(&self) -> bool {
        matches!(self, EndPoint::PositiveInfinity)
    }

    /// Returns the finite value, if any.
    #[inline]
    pub fn value(&self) -> Option<&T> {
        match self {
            EndPoint::Finite(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<T> for EndPoint<T> {
    fn from(value: T) -> Self {
        EndPoint::Finite(value)
    }
}

impl<T: fmt::Display> fmt::Display for EndPoint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndPoint::NegativeInfinity => write!(f, "-inf"),
            EndPoint::Finite(v) => write!(f, "{}", v),
            EndPoint::PositiveInfinity => write!(f, "+inf"),
        }
    }
}
