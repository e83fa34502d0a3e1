//! Hand-built diagrams with known decisions.

use midd_core::{Decision, Edge, Interval, NodeId, NodeStore};

use crate::intervals::{closed, open_closed};

/// A store together with the root of the fixture diagram in it.
pub struct Fixture {
    pub store: NodeStore<i64, Decision>,
    pub root: NodeId,
}

/// On x0: `[0, 10] -> Permit`, `(10, 20] -> Deny`, anything else is
/// not applicable.
pub fn single_variable() -> Fixture {
    let mut store = NodeStore::new();
    let permit = store.terminal(Decision::Permit);
    let deny = store.terminal(Decision::Deny);
    let root = store
        .internal(
            0,
            [
                Edge::new(closed(0, 10), permit),
                Edge::new(open_closed(10, 20), deny),
            ],
        )
        .expect("valid fixture");
    Fixture { store, root }
}

/// On x0 then x1:
///
/// - x0 below 0: Deny, whatever x1 is.
/// - x0 in `[0, 100]`: Permit when x1 is at least 18, otherwise not
///   applicable.
pub fn two_variable() -> Fixture {
    let mut store = NodeStore::new();
    let permit = store.terminal(Decision::Permit);
    let deny = store.terminal(Decision::Deny);
    let adult = store
        .internal(1, [Edge::new(Interval::at_least(18), permit)])
        .expect("valid fixture");
    let root = store
        .internal(
            0,
            [
                Edge::new(Interval::less_than(0), deny),
                Edge::new(closed(0, 100), adult),
            ],
        )
        .expect("valid fixture");
    Fixture { store, root }
}
