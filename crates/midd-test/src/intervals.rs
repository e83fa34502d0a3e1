//! Interval shorthands.
//!
//! All helpers panic on invalid bounds; they are meant for literals in
//! tests.

use midd_core::Interval;

/// `[lo, hi]`
pub fn closed(lo: i64, hi: i64) -> Interval<i64> {
    Interval::closed(lo, hi).expect("valid closed interval")
}

/// `(lo, hi]`
pub fn open_closed(lo: i64, hi: i64) -> Interval<i64> {
    Interval::open_closed(lo, hi).expect("valid open-closed interval")
}

/// `[lo, hi)`
pub fn closed_open(lo: i64, hi: i64) -> Interval<i64> {
    Interval::closed_open(lo, hi).expect("valid closed-open interval")
}

/// Integer values around the bounds the engine tests use.
pub fn grid() -> impl Iterator<Item = i64> + Clone {
    -3..=23
}
