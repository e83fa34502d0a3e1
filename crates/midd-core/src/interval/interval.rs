//! Interval - the atomic constraint on one variable

use std::cmp::Ordering;
use std::fmt;

use smallvec::SmallVec;

use super::endpoint::EndPoint;
use crate::error::{MiddError, Result};

/// A contiguous set of values between two end points, each bound
/// independently open or closed.
///
/// Intervals are immutable values. Every method that "changes" an interval
/// returns a fresh one.
///
/// An interval may be constructed empty (for example `(5, 5)`); such an
/// interval fails [`validate`](Interval::validate) and is never used as a
/// diagram edge label.
///
/// # Examples
///
/// ```
/// use midd_core::Interval;
///
/// let a = Interval::closed(0, 10).unwrap();
/// assert!(a.has_value(Some(&0)));
/// assert!(a.has_value(Some(&10)));
/// assert!(!a.has_value(None));
///
/// let b = Interval::less_than(10);
/// assert!(b.has_value(None));
/// assert_eq!(b.to_string(), "(-inf, 10)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval<T> {
    lower: EndPoint<T>,
    upper: EndPoint<T>,
    lower_closed: bool,
    upper_closed: bool,
}

impl<T: Ord + Clone> Interval<T> {
    /// Creates an interval from explicit bounds.
    ///
    /// # Errors
    ///
    /// Returns [`MiddError::InvalidInterval`] if `lower > upper` or a
    /// closed flag is set on an infinite bound.
    pub fn new(
        lower: EndPoint<T>,
        upper: EndPoint<T>,
        lower_closed: bool,
        upper_closed: bool,
    ) -> Result<Self> {
        if lower_closed && lower.is_infinite() {
            return Err(MiddError::InvalidInterval(
                "lower bound is infinite and cannot be closed".to_string(),
            ));
        }
        if upper_closed && upper.is_infinite() {
            return Err(MiddError::InvalidInterval(
                "upper bound is infinite and cannot be closed".to_string(),
            ));
        }
        if lower > upper {
            return Err(MiddError::InvalidInterval(
                "lower bound is greater than upper bound".to_string(),
            ));
        }
        Ok(Self::from_parts(lower, upper, lower_closed, upper_closed))
    }

    /// `[value, value]`
    pub fn point(value: T) -> Self {
        Self::from_parts(
            EndPoint::Finite(value.clone()),
            EndPoint::Finite(value),
            true,
            true,
        )
    }

    /// `[lower, upper]`
    pub fn closed(lower: T, upper: T) -> Result<Self> {
        Self::new(EndPoint::Finite(lower), EndPoint::Finite(upper), true, true)
    }

    /// `(lower, upper)`
    pub fn open(lower: T, upper: T) -> Result<Self> {
        Self::new(EndPoint::Finite(lower), EndPoint::Finite(upper), false, false)
    }

    /// `[lower, upper)`
    pub fn closed_open(lower: T, upper: T) -> Result<Self> {
        Self::new(EndPoint::Finite(lower), EndPoint::Finite(upper), true, false)
    }

    /// `(lower, upper]`
    pub fn open_closed(lower: T, upper: T) -> Result<Self> {
        Self::new(EndPoint::Finite(lower), EndPoint::Finite(upper), false, true)
    }

    /// `(-inf, value)`
    pub fn less_than(value: T) -> Self {
        Self::from_parts(EndPoint::NegativeInfinity, EndPoint::Finite(value), false, false)
    }

    /// `(-inf, value]`
    pub fn at_most(value: T) -> Self {
        Self::from_parts(EndPoint::NegativeInfinity, EndPoint::Finite(value), false, true)
    }

    /// `(value, +inf)`
    pub fn greater_than(value: T) -> Self {
        Self::from_parts(EndPoint::Finite(value), EndPoint::PositiveInfinity, false, false)
    }

    /// `[value, +inf)`
    pub fn at_least(value: T) -> Self {
        Self::from_parts(EndPoint::Finite(value), EndPoint::PositiveInfinity, true, false)
    }

    /// `(-inf, +inf)`
    pub fn unbounded() -> Self {
        Self::from_parts(EndPoint::NegativeInfinity, EndPoint::PositiveInfinity, false, false)
    }

    // Callers guarantee no closed flag sits on an infinite bound.
    pub(crate) fn from_parts(
        lower: EndPoint<T>,
        upper: EndPoint<T>,
        lower_closed: bool,
        upper_closed: bool,
    ) -> Self {
        Self {
            lower,
            upper,
            lower_closed,
            upper_closed,
        }
    }

    /// Returns true iff the interval is non-empty.
    ///
    /// ```
    /// use midd_core::Interval;
    ///
    /// assert!(Interval::closed(5, 5).unwrap().validate());
    /// assert!(!Interval::open(5, 5).unwrap().validate());
    /// ```
    pub fn validate(&self) -> bool {
        match self.lower.cmp(&self.upper) {
            Ordering::Less => true,
            Ordering::Equal => self.lower_closed && self.upper_closed,
            Ordering::Greater => false,
        }
    }

    /// Checks if a variable value falls inside the interval.
    ///
    /// A missing value (`None`) matches iff the interval is unbounded on at
    /// least one side.
    pub fn has_value(&self, value: Option<&T>) -> bool {
        let Some(value) = value else {
            return self.is_lower_infinite() || self.is_upper_infinite();
        };

        let above_lower = match &self.lower {
            EndPoint::NegativeInfinity => true,
            EndPoint::PositiveInfinity => false,
            EndPoint::Finite(l) => match l.cmp(value) {
                Ordering::Less => true,
                Ordering::Equal => self.lower_closed,
                Ordering::Greater => false,
            },
        };

        above_lower && !self.is_below(value)
    }

    /// Returns true if every value of the interval lies strictly below
    /// `value`.
    pub fn is_below(&self, value: &T) -> bool {
        match &self.upper {
            EndPoint::NegativeInfinity => true,
            EndPoint::PositiveInfinity => false,
            EndPoint::Finite(u) => match u.cmp(value) {
                Ordering::Less => true,
                Ordering::Equal => !self.upper_closed,
                Ordering::Greater => false,
            },
        }
    }

    /// Returns true unless the two intervals are disjoint.
    ///
    /// Intervals touching at a shared bound intersect only when both are
    /// closed there.
    pub fn intersects(&self, other: &Self) -> bool {
        match self.upper.cmp(&other.lower) {
            Ordering::Less => return false,
            Ordering::Equal => return self.upper_closed && other.lower_closed,
            Ordering::Greater => {}
        }
        match self.lower.cmp(&other.upper) {
            Ordering::Greater => false,
            Ordering::Equal => self.lower_closed && other.upper_closed,
            Ordering::Less => true,
        }
    }

    /// Returns true if `other` is a subset of this interval.
    pub fn contains(&self, other: &Self) -> bool {
        let upper_ok = match self.upper.cmp(&other.upper) {
            Ordering::Greater => true,
            Ordering::Equal => self.upper_closed || !other.upper_closed,
            Ordering::Less => false,
        };
        match self.lower.cmp(&other.lower) {
            Ordering::Less => upper_ok,
            Ordering::Equal => (self.lower_closed || !other.lower_closed) && upper_ok,
            Ordering::Greater => false,
        }
    }

    /// Computes `self \ other` as zero, one or two intervals.
    ///
    /// ```
    /// use midd_core::Interval;
    ///
    /// let a = Interval::closed(0, 10).unwrap();
    /// let b = Interval::open(3, 5).unwrap();
    /// let rest = a.complement(&b);
    /// assert_eq!(rest[0], Interval::closed(0, 3).unwrap());
    /// assert_eq!(rest[1], Interval::closed(5, 10).unwrap());
    ///
    /// assert!(a.complement(&a).is_empty());
    /// ```
    pub fn complement(&self, other: &Self) -> SmallVec<[Self; 2]> {
        let mut pieces = SmallVec::new();

        let disjoint = self.lower >= other.upper || self.upper <= other.lower;
        if disjoint {
            // Drop a shared bound that `other` already claims.
            let lower_closed = if self.lower == other.upper {
                self.lower_closed && !other.upper_closed
            } else {
                self.lower_closed
            };
            let upper_closed = if self.upper == other.lower {
                self.upper_closed && !other.lower_closed
            } else {
                self.upper_closed
            };
            let piece = Self::from_parts(
                self.lower.clone(),
                self.upper.clone(),
                lower_closed,
                upper_closed,
            );
            if piece.validate() {
                pieces.push(piece);
            }
            return pieces;
        }

        let left = Self::from_parts(
            self.lower.clone(),
            other.lower.clone(),
            !self.lower.is_infinite() && self.lower_closed,
            !other.lower.is_infinite() && !other.lower_closed,
        );
        let right = Self::from_parts(
            other.upper.clone(),
            self.upper.clone(),
            !other.upper.is_infinite() && !other.upper_closed,
            !self.upper.is_infinite() && self.upper_closed,
        );
        if left.validate() {
            pieces.push(left);
        }
        if right.validate() {
            pieces.push(right);
        }
        pieces
    }

    /// Returns the common part of two intervals, if non-empty.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let (lower, lower_closed) = match self.lower.cmp(&other.lower) {
            Ordering::Less => (&other.lower, other.lower_closed),
            Ordering::Greater => (&self.lower, self.lower_closed),
            Ordering::Equal => (&self.lower, self.lower_closed && other.lower_closed),
        };
        let (upper, upper_closed) = match self.upper.cmp(&other.upper) {
            Ordering::Less => (&self.upper, self.upper_closed),
            Ordering::Greater => (&other.upper, other.upper_closed),
            Ordering::Equal => (&self.upper, self.upper_closed && other.upper_closed),
        };
        let piece = Self::from_parts(lower.clone(), upper.clone(), lower_closed, upper_closed);
        piece.validate().then_some(piece)
    }

    /// Merges a single-point interval with an adjacent range sharing that
    /// point, producing one interval closed at the shared value.
    ///
    /// Either side may be the point.
    ///
    /// # Errors
    ///
    /// [`MiddError::InvalidMerge`] unless exactly one side is a single point
    /// and it sits on one of the other side's bounds.
    ///
    /// ```
    /// use midd_core::Interval;
    ///
    /// let range = Interval::open(0, 5).unwrap();
    /// let merged = range.include_bound(&Interval::point(5)).unwrap();
    /// assert_eq!(merged, Interval::open_closed(0, 5).unwrap());
    ///
    /// let two_ranges = Interval::open(5, 9).unwrap();
    /// assert!(range.include_bound(&two_ranges).is_err());
    /// ```
    pub fn include_bound(&self, target: &Self) -> Result<Self> {
        let self_point = self.lower == self.upper;
        let target_point = target.lower == target.upper;

        match (self_point, target_point) {
            (false, true) => {
                if self.upper == target.upper {
                    Ok(Self::from_parts(
                        self.lower.clone(),
                        self.upper.clone(),
                        self.lower_closed,
                        true,
                    ))
                } else if self.lower == target.upper {
                    Ok(Self::from_parts(
                        self.lower.clone(),
                        self.upper.clone(),
                        true,
                        self.upper_closed,
                    ))
                } else {
                    Err(MiddError::InvalidMerge(
                        "cannot combine two separated intervals".to_string(),
                    ))
                }
            }
            (true, false) => {
                if target.lower == self.lower {
                    Ok(Self::from_parts(
                        target.lower.clone(),
                        target.upper.clone(),
                        true,
                        target.upper_closed,
                    ))
                } else if target.upper == self.lower {
                    Ok(Self::from_parts(
                        target.lower.clone(),
                        target.upper.clone(),
                        target.lower_closed,
                        true,
                    ))
                } else {
                    Err(MiddError::InvalidMerge(
                        "cannot combine two separated intervals".to_string(),
                    ))
                }
            }
            _ => Err(MiddError::InvalidMerge(
                "only a single-value interval can be combined with a range".to_string(),
            )),
        }
    }

    /// True if `next` starts exactly where this interval ends, with no gap
    /// and no overlap.
    pub fn is_adjacent_to(&self, next: &Self) -> bool {
        self.upper == next.lower && self.upper_closed != next.lower_closed
    }

    /// Joins this interval with `next`, which must start exactly where this
    /// one ends, with no gap and no overlap.
    ///
    /// A single-point side goes through [`include_bound`](Self::include_bound);
    /// two ranges are joined into their hull.
    pub fn coalesce(&self, next: &Self) -> Result<Self> {
        if !self.is_adjacent_to(next) {
            return Err(MiddError::InvalidMerge(
                "intervals are not adjacent".to_string(),
            ));
        }
        if self.is_single_point() || next.is_single_point() {
            return self.include_bound(next);
        }
        Ok(Self::from_parts(
            self.lower.clone(),
            next.upper.clone(),
            self.lower_closed,
            next.upper_closed,
        ))
    }

    /// Returns a copy with the lower bound opened or closed.
    pub fn close_left(&self, closed: bool) -> Result<Self> {
        if closed && self.lower.is_infinite() {
            return Err(MiddError::InvalidInterval(
                "cannot close an infinite lower bound".to_string(),
            ));
        }
        let mut copy = self.clone();
        copy.lower_closed = closed;
        Ok(copy)
    }

    /// Returns a copy with the upper bound opened or closed.
    pub fn close_right(&self, closed: bool) -> Result<Self> {
        if closed && self.upper.is_infinite() {
            return Err(MiddError::InvalidInterval(
                "cannot close an infinite upper bound".to_string(),
            ));
        }
        let mut copy = self.clone();
        copy.upper_closed = closed;
        Ok(copy)
    }

    /// Returns a copy collapsed to `[value, value]`.
    pub fn with_single_value(&self, value: EndPoint<T>) -> Result<Self> {
        match value {
            EndPoint::Finite(v) => Ok(Self::point(v)),
            _ => Err(MiddError::InvalidInterval(
                "a single-value interval needs a finite value".to_string(),
            )),
        }
    }

    /// Returns a copy whose upper bound is `+inf` (open).
    pub fn with_upper_infinite(&self) -> Self {
        Self::from_parts(self.lower.clone(), EndPoint::PositiveInfinity, self.lower_closed, false)
    }

    /// The remainder of this interval after `head`, where `head` starts at
    /// the same bound and ends strictly earlier.
    pub(crate) fn after(&self, head: &Self) -> Self {
        Self::from_parts(
            head.upper.clone(),
            self.upper.clone(),
            !head.upper_closed && !head.upper.is_infinite(),
            self.upper_closed,
        )
    }

    /// Orders two intervals by where they end: by value, then an open end
    /// before a closed one.
    pub(crate) fn cmp_upper(&self, other: &Self) -> Ordering {
        self.upper
            .cmp(&other.upper)
            .then(self.upper_closed.cmp(&other.upper_closed))
    }

    /// The first finite bound, from which a value type can be read.
    ///
    /// # Errors
    ///
    /// [`MiddError::MissingType`] for `(-inf, +inf)`.
    pub fn bound_value(&self) -> Result<&T> {
        self.lower
            .value()
            .or_else(|| self.upper.value())
            .ok_or(MiddError::MissingType)
    }
}

impl<T> Interval<T> {
    #[inline]
    pub fn lower(&self) -> &EndPoint<T> {
        &self.lower
    }

    #[inline]
    pub fn upper(&self) -> &EndPoint<T> {
        &self.upper
    }

    #[inline]
    pub fn is_lower_closed(&self) -> bool {
        self.lower_closed
    }

    #[inline]
    pub fn is_upper_closed(&self) -> bool {
        self.upper_closed
    }

    #[inline]
    pub fn is_lower_infinite(&self) -> bool {
        self.lower.is_infinite()
    }

    #[inline]
    pub fn is_upper_infinite(&self) -> bool {
        self.upper.is_infinite()
    }

    /// True if the interval contains exactly one value.
    pub fn is_single_point(&self) -> bool
    where
        T: PartialEq,
    {
        self.lower_closed && self.upper_closed && self.lower == self.upper
    }
}

impl<T: fmt::Display + PartialEq> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_point() {
            return write!(f, "[{}]", self.lower);
        }
        let open = if self.lower_closed && !self.lower.is_infinite() {
            "["
        } else {
            "("
        };
        let close = if self.upper_closed && !self.upper.is_infinite() {
            "]"
        } else {
            ")"
        };
        write!(f, "{}{}, {}{}", open, self.lower, self.upper, close)
    }
}
