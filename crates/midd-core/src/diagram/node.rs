//! Diagram nodes.

use std::fmt;

use smallvec::SmallVec;

use crate::interval::Interval;
use crate::variable::VariableId;

/// Handle of a node inside a [`NodeStore`](super::NodeStore) or a frozen
/// [`Diagram`](super::Diagram).
///
/// The handle is the node's identity: it is assigned when the node is
/// interned and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One partition entry: values in `interval` continue at `child`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge<T> {
    pub interval: Interval<T>,
    pub child: NodeId,
}

impl<T> Edge<T> {
    pub fn new(interval: Interval<T>, child: NodeId) -> Self {
        Self { interval, child }
    }
}

/// Partition entries of one internal node; most nodes have only a few.
pub type Edges<T> = SmallVec<[Edge<T>; 4]>;

/// A test on one variable.
///
/// Edges are sorted by lower bound and pairwise disjoint. Values not
/// covered by any edge are not applicable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InternalNode<T> {
    pub(crate) variable: VariableId,
    pub(crate) edges: Edges<T>,
}

impl<T> InternalNode<T> {
    #[inline]
    pub fn variable(&self) -> VariableId {
        self.variable
    }

    #[inline]
    pub fn edges(&self) -> &[Edge<T>] {
        &self.edges
    }
}

/// A terminal carrying a decision value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalNode<D> {
    pub(crate) value: D,
}

impl<D> ExternalNode<D> {
    #[inline]
    pub fn value(&self) -> &D {
        &self.value
    }
}

/// A diagram node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node<T, D> {
    Internal(InternalNode<T>),
    External(ExternalNode<D>),
}

impl<T, D> Node<T, D> {
    /// The tested variable, for internal nodes.
    pub fn variable(&self) -> Option<VariableId> {
        match self {
            Node::Internal(n) => Some(n.variable),
            Node::External(_) => None,
        }
    }

    /// The terminal value, for external nodes.
    pub fn value(&self) -> Option<&D> {
        match self {
            Node::Internal(_) => None,
            Node::External(n) => Some(&n.value),
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Node::External(_))
    }
}

/// Read access to nodes by handle.
///
/// Implemented by the mutable [`NodeStore`](super::NodeStore) used during
/// construction and by the frozen [`Diagram`](super::Diagram), so the same
/// traversal code serves both.
pub trait Nodes<T, D> {
    fn node(&self, id: NodeId) -> Option<&Node<T, D>>;
}
