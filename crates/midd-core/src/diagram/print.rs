//! Human-readable diagram dumps.
//!
//! ```text
//! x0 in [0, 10] -> #3
//!   x1 in [5] -> Permit
//! x0 in (10, 20] -> Deny
//! ```
//!
//! Every internal child is labelled with its handle. A node reached a
//! second time prints as `#id` only.

use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

use super::frozen::Diagram;
use super::node::{Node, NodeId, Nodes};

/// Borrowing printer for any node container.
pub struct TreeDisplay<'a, N, T, D> {
    nodes: &'a N,
    root: NodeId,
    _marker: PhantomData<fn() -> (T, D)>,
}

impl<'a, N, T, D> TreeDisplay<'a, N, T, D>
where
    N: Nodes<T, D>,
{
    pub fn new(nodes: &'a N, root: NodeId) -> Self {
        Self {
            nodes,
            root,
            _marker: PhantomData,
        }
    }
}

impl<N, T, D> fmt::Display for TreeDisplay<'_, N, T, D>
where
    N: Nodes<T, D>,
    T: fmt::Display + PartialEq,
    D: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printed = HashSet::new();
        write_node(f, self.nodes, self.root, 0, &mut printed)
    }
}

fn write_node<N, T, D>(
    f: &mut fmt::Formatter<'_>,
    nodes: &N,
    id: NodeId,
    depth: usize,
    printed: &mut HashSet<NodeId>,
) -> fmt::Result
where
    N: Nodes<T, D>,
    T: fmt::Display + PartialEq,
    D: fmt::Display,
{
    match nodes.node(id) {
        None => writeln!(f, "{:indent$}<unknown {}>", "", id, indent = depth * 2),
        Some(Node::External(n)) => writeln!(f, "{:indent$}{}", "", n.value(), indent = depth * 2),
        Some(Node::Internal(n)) => {
            printed.insert(id);
            for edge in n.edges() {
                write!(
                    f,
                    "{:indent$}x{} in {} -> ",
                    "",
                    n.variable(),
                    edge.interval,
                    indent = depth * 2
                )?;
                match nodes.node(edge.child) {
                    Some(Node::External(leaf)) => writeln!(f, "{}", leaf.value())?,
                    Some(Node::Internal(_)) if printed.contains(&edge.child) => {
                        writeln!(f, "{}", edge.child)?
                    }
                    Some(Node::Internal(_)) => {
                        writeln!(f, "{}", edge.child)?;
                        write_node(f, nodes, edge.child, depth + 1, printed)?;
                    }
                    None => writeln!(f, "<unknown {}>", edge.child)?,
                }
            }
            Ok(())
        }
    }
}

impl<T, D> fmt::Display for Diagram<T, D>
where
    T: fmt::Display + PartialEq,
    D: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TreeDisplay::new(self, self.root()).fmt(f)
    }
}
