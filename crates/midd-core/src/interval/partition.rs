//! Partition refinement over the whole value line.
//!
//! A diagram node's partition is a sorted list of disjoint intervals that
//! need not cover every value. [`cover`] fills the gaps so the list spans
//! `(-inf, +inf)`; [`overlay`] walks two such covers in lock step and
//! yields the coarsest set of pieces on which both are constant.

use std::cmp::Ordering;

use super::interval::Interval;

/// One piece of a full cover. `payload` is `None` on a gap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<T, C> {
    pub interval: Interval<T>,
    pub payload: Option<C>,
}

/// One piece of an overlay of two covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece<T, A, B> {
    pub interval: Interval<T>,
    pub left: Option<A>,
    pub right: Option<B>,
}

/// Extends a sorted, disjoint partition into a cover of the whole line.
///
/// # Examples
///
/// ```
/// use midd_core::interval::{cover, Interval};
///
/// let edges = [(Interval::closed(0, 10).unwrap(), 'a')];
/// let segments = cover(edges.iter().map(|(i, c)| (i, *c)));
///
/// assert_eq!(segments.len(), 3);
/// assert_eq!(segments[0].interval, Interval::less_than(0));
/// assert_eq!(segments[1].payload, Some('a'));
/// assert_eq!(segments[2].interval, Interval::greater_than(10));
/// ```
pub fn cover<'a, T, C, I>(edges: I) -> Vec<Segment<T, C>>
where
    T: Ord + Clone + 'a,
    I: IntoIterator<Item = (&'a Interval<T>, C)>,
{
    let mut segments = Vec::new();

    // Start of the not-yet-covered region.
    let mut cursor = Interval::unbounded();

    for (interval, payload) in edges {
        let gap = Interval::from_parts(
            cursor.lower().clone(),
            interval.lower().clone(),
            cursor.is_lower_closed(),
            !interval.is_lower_closed() && !interval.is_lower_infinite(),
        );
        if gap.validate() {
            segments.push(Segment {
                interval: gap,
                payload: None,
            });
        }
        segments.push(Segment {
            interval: interval.clone(),
            payload: Some(payload),
        });
        cursor = Interval::unbounded().after(interval);
    }

    if cursor.validate() {
        segments.push(Segment {
            interval: cursor,
            payload: None,
        });
    }
    segments
}

/// Refines two covers against each other.
///
/// Both inputs must come from [`cover`]. Every returned piece lies inside
/// exactly one segment of each input and carries both payloads.
pub fn overlay<T, A, B>(left: &[Segment<T, A>], right: &[Segment<T, B>]) -> Vec<Piece<T, A, B>>
where
    T: Ord + Clone,
    A: Clone,
    B: Clone,
{
    let mut pieces = Vec::with_capacity(left.len() + right.len());
    let mut lefts = left.iter();
    let mut rights = right.iter();
    let mut cur_left = lefts.next().cloned();
    let mut cur_right = rights.next().cloned();

    // Both cursors always start at the same bound.
    while let (Some(l), Some(r)) = (&cur_left, &cur_right) {
        match l.interval.cmp_upper(&r.interval) {
            Ordering::Equal => {
                pieces.push(Piece {
                    interval: l.interval.clone(),
                    left: l.payload.clone(),
                    right: r.payload.clone(),
                });
                cur_left = lefts.next().cloned();
                cur_right = rights.next().cloned();
            }
            Ordering::Less => {
                pieces.push(Piece {
                    interval: l.interval.clone(),
                    left: l.payload.clone(),
                    right: r.payload.clone(),
                });
                cur_right = Some(Segment {
                    interval: r.interval.after(&l.interval),
                    payload: r.payload.clone(),
                });
                cur_left = lefts.next().cloned();
            }
            Ordering::Greater => {
                pieces.push(Piece {
                    interval: r.interval.clone(),
                    left: l.payload.clone(),
                    right: r.payload.clone(),
                });
                cur_left = Some(Segment {
                    interval: l.interval.after(&r.interval),
                    payload: l.payload.clone(),
                });
                cur_right = rights.next().cloned();
            }
        }
    }
    pieces
}

/// Checks that a partition is sorted, disjoint and made of valid intervals.
pub fn is_partition<'a, T, I>(intervals: I) -> bool
where
    T: Ord + Clone + 'a,
    I: IntoIterator<Item = &'a Interval<T>>,
{
    let mut prev: Option<&Interval<T>> = None;
    for interval in intervals {
        if !interval.validate() {
            return false;
        }
        if let Some(p) = prev {
            if p.lower() > interval.lower() || p.intersects(interval) {
                return false;
            }
        }
        prev = Some(interval);
    }
    true
}
