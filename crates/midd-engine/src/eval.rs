//! Evaluation of a diagram against a variable assignment.

use midd_core::{Assignment, Diagram, Edge, Node, NodeId, Nodes, Terminal};
use rayon::prelude::*;
use tracing::trace;

/// Walks from `root` to a terminal and returns its value.
///
/// At each internal node the variable's value selects the partition entry
/// containing it. A variable with no entry in `variables`, or with no
/// value, matches the first entry unbounded on a side. When nothing
/// matches, the result is the not-applicable terminal. Evaluation never
/// fails.
pub fn eval<T, D, N>(nodes: &N, root: NodeId, variables: &Assignment<T>) -> D
where
    T: Ord + Clone,
    D: Terminal,
    N: Nodes<T, D>,
{
    let mut current = root;
    loop {
        let next = match nodes.node(current) {
            Some(Node::External(n)) => return n.value().clone(),
            Some(Node::Internal(n)) => {
                let value = variables.get(&n.variable()).and_then(|v| v.value.as_ref());
                select(n.edges(), value)
            }
            None => None,
        };
        match next {
            Some(child) => current = child,
            None => {
                trace!(event = "eval_unmatched", node = %current);
                return D::not_applicable();
            }
        }
    }
}

fn select<T: Ord + Clone>(edges: &[Edge<T>], value: Option<&T>) -> Option<NodeId> {
    match value {
        Some(v) => {
            // Edges are sorted and disjoint: skip those entirely below v.
            let i = edges.partition_point(|e| e.interval.is_below(v));
            edges
                .get(i)
                .filter(|e| e.interval.has_value(Some(v)))
                .map(|e| e.child)
        }
        None => edges
            .iter()
            .find(|e| e.interval.has_value(None))
            .map(|e| e.child),
    }
}

/// Evaluates a frozen diagram from its root.
pub fn eval_diagram<T, D>(diagram: &Diagram<T, D>, variables: &Assignment<T>) -> D
where
    T: Ord + Clone,
    D: Terminal,
{
    eval(diagram, diagram.root(), variables)
}

/// Evaluates many assignments against one diagram.
///
/// Batches of at least `parallel_threshold` requests are spread over the
/// rayon pool; results keep the input order.
pub fn eval_batch<T, D>(
    diagram: &Diagram<T, D>,
    requests: &[Assignment<T>],
    parallel_threshold: usize,
) -> Vec<D>
where
    T: Ord + Clone + Send + Sync,
    D: Terminal,
{
    if requests.len() >= parallel_threshold {
        requests
            .par_iter()
            .map(|vars| eval_diagram(diagram, vars))
            .collect()
    } else {
        requests.iter().map(|vars| eval_diagram(diagram, vars)).collect()
    }
}
