//! Diagram construction: conditions, conjunction and disjunction.

use std::collections::HashMap;
use std::hash::Hash;

use midd_core::{Edge, Interval, MiddError, Node, NodeId, NodeStore, Result, Terminal, VariableId};

use crate::apply::apply;

/// Interns a terminal diagram.
pub fn terminal<T, D>(store: &mut NodeStore<T, D>, value: D) -> NodeId
where
    T: Ord + Clone + Hash,
    D: Terminal,
{
    store.terminal(value)
}

/// Builds a one-variable diagram in which every value inside one of
/// `intervals` reaches `value`.
///
/// Intervals may be given in any order. They must be valid and pairwise
/// disjoint; adjacent ones are coalesced.
///
/// # Examples
///
/// ```
/// use midd_core::{assignment, Decision, Interval, NodeStore, Variable};
/// use midd_engine::{condition, eval};
///
/// let mut store = NodeStore::<i64, Decision>::new();
/// let root = condition(
///     &mut store,
///     0,
///     [Interval::closed(20, 30).unwrap(), Interval::closed(0, 10).unwrap()],
///     Decision::Permit,
/// )
/// .unwrap();
///
/// let request = assignment([Variable::new(0, 25)]);
/// assert_eq!(eval(&store, root, &request), Decision::Permit);
/// ```
pub fn condition<T, D>(
    store: &mut NodeStore<T, D>,
    variable: VariableId,
    intervals: impl IntoIterator<Item = Interval<T>>,
    value: D,
) -> Result<NodeId>
where
    T: Ord + Clone + Hash,
    D: Terminal,
{
    let mut intervals: Vec<Interval<T>> = intervals.into_iter().collect();
    intervals.sort_by(|a, b| {
        a.lower()
            .cmp(b.lower())
            .then(b.is_lower_closed().cmp(&a.is_lower_closed()))
    });
    let leaf = store.terminal(value);
    store.internal(
        variable,
        intervals.into_iter().map(|interval| Edge::new(interval, leaf)),
    )
}

/// Conjunction: a value reaches a terminal only if it does so in both
/// diagrams, and then it reaches the right-hand terminal.
///
/// Used to gate a body (right) behind a target (left).
pub fn and<T, D>(store: &mut NodeStore<T, D>, left: NodeId, right: NodeId) -> Result<NodeId>
where
    T: Ord + Clone + Hash,
    D: Terminal,
{
    let na = store.not_applicable();
    if left == na || right == na {
        return Ok(na);
    }
    if left == right {
        return Ok(left);
    }
    apply(store, left, right, |l, r| {
        if l.is_not_applicable() {
            l.clone()
        } else {
            r.clone()
        }
    })
}

/// Disjunction: a value reaches a terminal if it does so in either
/// diagram. Where both apply, the right-hand terminal wins.
pub fn or<T, D>(store: &mut NodeStore<T, D>, left: NodeId, right: NodeId) -> Result<NodeId>
where
    T: Ord + Clone + Hash,
    D: Terminal,
{
    let na = store.not_applicable();
    if left == na || left == right {
        return Ok(right);
    }
    if right == na {
        return Ok(left);
    }
    apply(store, left, right, |l, r| {
        if r.is_not_applicable() {
            l.clone()
        } else {
            r.clone()
        }
    })
}

/// Folds `and` over `nodes`.
///
/// An empty sequence is the neutral element, the terminal `neutral`.
pub fn and_all<T, D>(
    store: &mut NodeStore<T, D>,
    nodes: impl IntoIterator<Item = NodeId>,
    neutral: D,
) -> Result<NodeId>
where
    T: Ord + Clone + Hash,
    D: Terminal,
{
    let mut nodes = nodes.into_iter();
    let Some(first) = nodes.next() else {
        return Ok(store.terminal(neutral));
    };
    nodes.try_fold(first, |acc, next| and(store, acc, next))
}

/// Replaces every applicable terminal reachable from `root` with `value`.
///
/// Not-applicable terminals are left alone, so the accepted-value set of
/// the diagram is unchanged.
pub fn with_leaf<T, D>(store: &mut NodeStore<T, D>, root: NodeId, value: D) -> Result<NodeId>
where
    T: Ord + Clone + Hash,
    D: Terminal,
{
    let leaf = store.terminal(value);
    let mut memo = HashMap::new();
    relabel(store, root, leaf, &mut memo)
}

fn relabel<T, D>(
    store: &mut NodeStore<T, D>,
    id: NodeId,
    leaf: NodeId,
    memo: &mut HashMap<NodeId, NodeId>,
) -> Result<NodeId>
where
    T: Ord + Clone + Hash,
    D: Terminal,
{
    if let Some(&done) = memo.get(&id) {
        return Ok(done);
    }
    let result = match store.get(id)?.clone() {
        Node::External(n) if n.value().is_not_applicable() => id,
        Node::External(_) => leaf,
        Node::Internal(n) => {
            let mut edges = Vec::with_capacity(n.edges().len());
            for edge in n.edges() {
                let child = relabel(store, edge.child, leaf, memo)?;
                edges.push(Edge::new(edge.interval.clone(), child));
            }
            store.internal(n.variable(), edges)?
        }
    };
    memo.insert(id, result);
    Ok(result)
}

/// Fails with [`MiddError::NonTransformable`] if `root` is the
/// not-applicable terminal.
pub fn ensure_applicable<T, D>(
    store: &NodeStore<T, D>,
    root: NodeId,
    element: &str,
) -> Result<NodeId>
where
    T: Ord + Clone + Hash,
    D: Terminal,
{
    if root == store.not_applicable() {
        return Err(MiddError::NonTransformable(element.to_string()));
    }
    Ok(root)
}
