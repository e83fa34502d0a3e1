//! MIDD Engine - building, combining and evaluating decision diagrams
//!
//! All construction goes through a shared [`NodeStore`](midd_core::NodeStore):
//! - [`condition`], [`and`], [`or`] and [`with_leaf`] build diagrams
//! - [`combine`] and [`combine_all`] merge diagrams under a
//!   [`CombiningAlgorithm`]
//! - [`eval`] and [`eval_batch`] read a decision out of a diagram
//!
//! Construction and combination run on a single thread. A frozen
//! [`Diagram`](midd_core::Diagram) is immutable and may be evaluated from
//! any number of threads.

mod apply;
pub mod builder;
pub mod combine;
pub mod eval;


pub use apply::apply;
pub use builder::{and, and_all, condition, ensure_applicable, or, terminal, with_leaf};
pub use combine::{combine, combine_all, CombiningAlgorithm};
pub use eval::{eval, eval_batch, eval_diagram};
