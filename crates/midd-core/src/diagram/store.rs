//! Arena of hash-consed diagram nodes.
//!
//! Nodes are interned: building a node structurally equal to an existing
//! one returns the existing handle. Two subtrees are therefore equal iff
//! their handles are equal, which makes reduction a handle comparison.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::frozen::Diagram;
use super::node::{Edge, Edges, ExternalNode, InternalNode, Node, NodeId, Nodes};
use crate::error::{MiddError, Result};
use crate::interval::{is_partition, Interval};
use crate::terminal::Terminal;
use crate::variable::VariableId;

/// Construction-time node arena.
///
/// All diagrams that will be combined with each other must live in the
/// same store. Once construction is done, [`freeze`](Self::freeze) copies
/// the reachable part of a diagram into an immutable, shareable
/// [`Diagram`].
///
/// # Examples
///
/// ```
/// use midd_core::{Decision, Edge, Interval, NodeStore};
///
/// let mut store = NodeStore::<i64, Decision>::new();
/// let permit = store.terminal(Decision::Permit);
/// let root = store
///     .internal(0, vec![Edge::new(Interval::closed(0, 10).unwrap(), permit)])
///     .unwrap();
///
/// assert_eq!(store.count_nodes(root), 2);
/// ```
#[derive(Debug, Clone)]
pub struct NodeStore<T, D> {
    nodes: Vec<Node<T, D>>,
    unique: HashMap<Node<T, D>, NodeId>,
}

impl<T, D> Default for NodeStore<T, D>
where
    T: Ord + Clone + Hash,
    D: Terminal,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, D> NodeStore<T, D>
where
    T: Ord + Clone + Hash,
    D: Terminal,
{
    /// Creates a store holding only the not-applicable terminal.
    pub fn new() -> Self {
        let mut store = Self {
            nodes: Vec::new(),
            unique: HashMap::new(),
        };
        store.terminal(D::not_applicable());
        store
    }

    /// Interns an external node.
    pub fn terminal(&mut self, value: D) -> NodeId {
        self.intern(Node::External(ExternalNode { value }))
    }

    /// Handle of the not-applicable terminal.
    pub fn not_applicable(&self) -> NodeId {
        NodeId(0)
    }

    /// Builds a reduced internal node testing `variable`.
    ///
    /// Edges to the not-applicable terminal are dropped, adjacent edges to
    /// the same child are coalesced, and a node left without edges becomes
    /// the not-applicable terminal. A node with a single edge over the
    /// whole line is replaced by its child.
    ///
    /// # Errors
    ///
    /// - [`MiddError::InvalidInterval`] if the edges are not a sorted,
    ///   disjoint list of non-empty intervals.
    /// - [`MiddError::VariableOrder`] if a child tests a variable that does
    ///   not come after `variable`.
    /// - [`MiddError::UnknownNode`] if a child is not in this store.
    pub fn internal(
        &mut self,
        variable: VariableId,
        edges: impl IntoIterator<Item = Edge<T>>,
    ) -> Result<NodeId> {
        let edges: Vec<Edge<T>> = edges.into_iter().collect();
        if !is_partition(edges.iter().map(|e| &e.interval)) {
            return Err(MiddError::InvalidInterval(format!(
                "partition of x{} must be sorted, disjoint and non-empty",
                variable
            )));
        }
        for edge in &edges {
            if let Node::Internal(child) = self.get(edge.child)? {
                if child.variable <= variable {
                    return Err(MiddError::VariableOrder {
                        parent: variable,
                        child: child.variable,
                    });
                }
            }
        }
        self.reduce(variable, edges)
    }

    fn reduce(&mut self, variable: VariableId, edges: Vec<Edge<T>>) -> Result<NodeId> {
        let na = self.not_applicable();
        let mut reduced: Edges<T> = Edges::new();

        for edge in edges {
            if edge.child == na {
                continue;
            }
            if let Some(last) = reduced.last_mut() {
                if last.child == edge.child && last.interval.is_adjacent_to(&edge.interval) {
                    last.interval = last.interval.coalesce(&edge.interval)?;
                    continue;
                }
            }
            reduced.push(edge);
        }

        match reduced.as_slice() {
            [] => return Ok(na),
            [only] if only.interval == Interval::unbounded() => return Ok(only.child),
            _ => {}
        }

        Ok(self.intern(Node::Internal(InternalNode {
            variable,
            edges: reduced,
        })))
    }

    fn intern(&mut self, node: Node<T, D>) -> NodeId {
        if let Some(&id) = self.unique.get(&node) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node.clone());
        self.unique.insert(node, id);
        id
    }

    /// Looks up a node.
    pub fn get(&self, id: NodeId) -> Result<&Node<T, D>> {
        self.nodes.get(id.index()).ok_or(MiddError::UnknownNode(id.0))
    }

    /// Number of nodes ever interned.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of distinct nodes reachable from `root`, terminals included.
    pub fn count_nodes(&self, root: NodeId) -> usize {
        let mut seen = HashSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(Node::Internal(n)) = self.nodes.get(id.index()) {
                stack.extend(n.edges.iter().map(|e| e.child));
            }
        }
        seen.len()
    }

    /// Copies the part reachable from `root` into an immutable diagram.
    ///
    /// Handles are renumbered densely; the frozen root always has the
    /// highest handle since children are copied first.
    pub fn freeze(&self, root: NodeId) -> Result<Diagram<T, D>> {
        let mut remap = HashMap::new();
        let mut nodes = Vec::new();
        let root = self.copy_into(root, &mut remap, &mut nodes)?;
        Ok(Diagram::from_nodes(nodes, root))
    }

    fn copy_into(
        &self,
        id: NodeId,
        remap: &mut HashMap<NodeId, NodeId>,
        out: &mut Vec<Node<T, D>>,
    ) -> Result<NodeId> {
        if let Some(&mapped) = remap.get(&id) {
            return Ok(mapped);
        }
        let copy = match self.get(id)? {
            Node::External(n) => Node::External(n.clone()),
            Node::Internal(n) => {
                let mut edges = Edges::with_capacity(n.edges.len());
                for edge in &n.edges {
                    let child = self.copy_into(edge.child, remap, out)?;
                    edges.push(Edge::new(edge.interval.clone(), child));
                }
                Node::Internal(InternalNode {
                    variable: n.variable,
                    edges,
                })
            }
        };
        let mapped = NodeId(out.len() as u32);
        out.push(copy);
        remap.insert(id, mapped);
        Ok(mapped)
    }
}

impl<T, D> Nodes<T, D> for NodeStore<T, D> {
    #[inline]
    fn node(&self, id: NodeId) -> Option<&Node<T, D>> {
        self.nodes.get(id.index())
    }
}
