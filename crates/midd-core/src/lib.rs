//! MIDD Core - interval algebra and decision diagram types
//!
//! This crate provides the building blocks of a multi-valued interval
//! decision diagram:
//! - Interval endpoints and intervals over any totally ordered type
//! - Terminal values (decisions) carried by external nodes
//! - A hash-consing node store and immutable, shareable diagrams
//! - Variable assignments used at evaluation time

pub mod diagram;
pub mod error;
pub mod interval;
pub mod terminal;
pub mod variable;

pub use diagram::{
    Diagram, Edge, Edges, ExternalNode, InternalNode, Node, NodeId, NodeStore, Nodes, TreeDisplay,
};
pub use error::{MiddError, Result};
pub use interval::{EndPoint, Interval};
pub use terminal::{Decided, Decision, Leaf, Terminal};
pub use variable::{assignment, Assignment, Variable, VariableId};
