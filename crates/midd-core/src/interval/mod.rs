//! Interval algebra
//!
//! End points, intervals over any totally ordered value type, and the
//! partition refinement used to overlay two diagram nodes.

mod endpoint;
#[allow(clippy::module_inception)]
mod interval;
mod partition;

#[cfg(test)]
mod tests;

pub use endpoint::EndPoint;
pub use interval::Interval;
pub use partition::{cover, is_partition, overlay, Piece, Segment};
