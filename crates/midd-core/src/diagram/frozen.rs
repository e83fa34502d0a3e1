//! Immutable, shareable diagrams.

use std::sync::Arc;

use super::node::{Node, NodeId, Nodes};

/// A finished diagram.
///
/// Produced by [`NodeStore::freeze`](super::NodeStore::freeze). Nodes are
/// behind an `Arc`, so clones are cheap and the diagram can be evaluated
/// from many threads at once.
#[derive(Debug, Clone)]
pub struct Diagram<T, D> {
    nodes: Arc<[Node<T, D>]>,
    root: NodeId,
}

impl<T, D> Diagram<T, D> {
    pub(crate) fn from_nodes(nodes: Vec<Node<T, D>>, root: NodeId) -> Self {
        Self {
            nodes: nodes.into(),
            root,
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// All nodes, children before parents.
    pub fn nodes(&self) -> &[Node<T, D>] {
        &self.nodes
    }

    /// Number of distinct nodes, terminals included.
    pub fn count_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the longest root-to-terminal path, counted in internal nodes.
    pub fn depth(&self) -> usize {
        // Children precede parents, so one forward pass suffices.
        let mut depths = vec![0usize; self.nodes.len()];
        for (i, node) in self.nodes.iter().enumerate() {
            if let Node::Internal(n) = node {
                depths[i] = 1 + n
                    .edges
                    .iter()
                    .map(|e| depths[e.child.index()])
                    .max()
                    .unwrap_or(0);
            }
        }
        depths.get(self.root.index()).copied().unwrap_or(0)
    }
}

impl<T, D> Nodes<T, D> for Diagram<T, D> {
    #[inline]
    fn node(&self, id: NodeId) -> Option<&Node<T, D>> {
        self.nodes.get(id.index())
    }
}
