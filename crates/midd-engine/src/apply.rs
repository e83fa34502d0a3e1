//! The apply skeleton shared by conjunction, disjunction and combination.
//!
//! Two diagrams are walked in variable order. Where both test the same
//! variable their partitions are overlaid; where only one does, its
//! partition is distributed over the whole of the other diagram. Terminal
//! pairs are handed to the merge function. A value not covered by a
//! partition is treated as reaching the not-applicable terminal.

use std::collections::HashMap;
use std::hash::Hash;

use midd_core::interval::{cover, overlay, Segment};
use midd_core::{Edge, Interval, Node, NodeId, NodeStore, Result, Terminal, VariableId};
use smallvec::SmallVec;

/// Merges two diagrams of `store` with `merge` applied at terminal pairs.
///
/// The result is reduced and interned in the same store.
pub fn apply<T, D, F>(
    store: &mut NodeStore<T, D>,
    left: NodeId,
    right: NodeId,
    merge: F,
) -> Result<NodeId>
where
    T: Ord + Clone + Hash,
    D: Terminal,
    F: Fn(&D, &D) -> D,
{
    Apply {
        store,
        merge,
        memo: HashMap::new(),
    }
    .run(left, right)
}

struct Apply<'s, T, D, F> {
    store: &'s mut NodeStore<T, D>,
    merge: F,
    memo: HashMap<(NodeId, NodeId), NodeId>,
}

impl<T, D, F> Apply<'_, T, D, F>
where
    T: Ord + Clone + Hash,
    D: Terminal,
    F: Fn(&D, &D) -> D,
{
    fn run(&mut self, left: NodeId, right: NodeId) -> Result<NodeId> {
        if let Some(&done) = self.memo.get(&(left, right)) {
            return Ok(done);
        }

        let l = self.store.get(left)?.clone();
        let r = self.store.get(right)?.clone();

        let result = match (&l, &r) {
            (Node::External(a), Node::External(b)) => {
                let merged = (self.merge)(a.value(), b.value());
                self.store.terminal(merged)
            }
            (Node::Internal(a), Node::External(_)) => {
                self.split(a.variable(), (&l, left), (&r, right))?
            }
            (Node::External(_), Node::Internal(b)) => {
                self.split(b.variable(), (&l, left), (&r, right))?
            }
            (Node::Internal(a), Node::Internal(b)) => {
                let variable = a.variable().min(b.variable());
                self.split(variable, (&l, left), (&r, right))?
            }
        };

        self.memo.insert((left, right), result);
        Ok(result)
    }

    /// Builds the node on `variable` whose pieces are the overlay of both
    /// sides' partitions.
    fn split(
        &mut self,
        variable: VariableId,
        (l, left): (&Node<T, D>, NodeId),
        (r, right): (&Node<T, D>, NodeId),
    ) -> Result<NodeId> {
        let lhs = segments(l, left, variable);
        let rhs = segments(r, right, variable);
        let na = self.store.not_applicable();

        let mut edges: SmallVec<[Edge<T>; 8]> = SmallVec::new();
        for piece in overlay(&lhs, &rhs) {
            let child = self.run(piece.left.unwrap_or(na), piece.right.unwrap_or(na))?;
            edges.push(Edge::new(piece.interval, child));
        }
        self.store.internal(variable, edges)
    }
}

/// The node's partition as a full cover when it tests `variable`,
/// otherwise one segment over the whole line leading to the node itself.
fn segments<T, D>(node: &Node<T, D>, id: NodeId, variable: VariableId) -> Vec<Segment<T, NodeId>>
where
    T: Ord + Clone,
{
    match node {
        Node::Internal(n) if n.variable() == variable => {
            cover(n.edges().iter().map(|e| (&e.interval, e.child)))
        }
        _ => vec![Segment {
            interval: Interval::unbounded(),
            payload: Some(id),
        }],
    }
}
