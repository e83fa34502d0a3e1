//! Multi-valued interval decision diagrams.
//!
//! Construction happens in a [`NodeStore`], which hash-conses nodes so
//! that equal subtrees share one handle. A finished diagram is frozen into
//! an immutable [`Diagram`] for evaluation.

mod frozen;
mod node;
mod print;
mod store;


pub use frozen::Diagram;
pub use node::{Edge, Edges, ExternalNode, InternalNode, Node, NodeId, Nodes};
pub use print::TreeDisplay;
pub use store::NodeStore;
