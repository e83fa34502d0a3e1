//! Combining algorithms and diagram combination.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use midd_core::{Decided, Decision, MiddError, NodeId, NodeStore, Result};
use tracing::debug;

use crate::apply::apply;

/// Rule for merging the two decisions reached along overlapping paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum CombiningAlgorithm {
    /// Deny, then Permit, then NotApplicable, then Indeterminate.
    #[default]
    DenyOverrides,
    /// Permit, then Deny, then NotApplicable, then Indeterminate.
    PermitOverrides,
    /// The left decision unless it is NotApplicable.
    FirstApplicable,
    /// Indeterminate when both sides apply.
    OnlyOneApplicable,
}

/// Which side of a merge supplies the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pick {
    Left,
    Right,
    Indeterminate,
}

impl CombiningAlgorithm {
    pub const ALL: [CombiningAlgorithm; 4] = [
        CombiningAlgorithm::DenyOverrides,
        CombiningAlgorithm::PermitOverrides,
        CombiningAlgorithm::FirstApplicable,
        CombiningAlgorithm::OnlyOneApplicable,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CombiningAlgorithm::DenyOverrides => "deny-overrides",
            CombiningAlgorithm::PermitOverrides => "permit-overrides",
            CombiningAlgorithm::FirstApplicable => "first-applicable",
            CombiningAlgorithm::OnlyOneApplicable => "only-one-applicable",
        }
    }

    /// Merges two decisions.
    pub fn merge(self, left: Decision, right: Decision) -> Decision {
        match self.pick(left, right) {
            Pick::Left => left,
            Pick::Right => right,
            Pick::Indeterminate => Decision::Indeterminate,
        }
    }

    /// Merges two terminals, keeping the winning side's value as is.
    pub fn merge_terminals<D: Decided>(self, left: &D, right: &D) -> D {
        match self.pick(left.decision(), right.decision()) {
            Pick::Left => left.clone(),
            Pick::Right => right.clone(),
            Pick::Indeterminate => D::from_decision(Decision::Indeterminate),
        }
    }

    fn pick(self, left: Decision, right: Decision) -> Pick {
        match self {
            CombiningAlgorithm::DenyOverrides => by_rank(left, right, |d| match d {
                Decision::Deny => 3,
                Decision::Permit => 2,
                Decision::NotApplicable => 1,
                Decision::Indeterminate => 0,
            }),
            CombiningAlgorithm::PermitOverrides => by_rank(left, right, |d| match d {
                Decision::Permit => 3,
                Decision::Deny => 2,
                Decision::NotApplicable => 1,
                Decision::Indeterminate => 0,
            }),
            CombiningAlgorithm::FirstApplicable => {
                if left.is_applicable() {
                    Pick::Left
                } else {
                    Pick::Right
                }
            }
            CombiningAlgorithm::OnlyOneApplicable => {
                match (left.is_applicable(), right.is_applicable()) {
                    (true, true) => Pick::Indeterminate,
                    (true, false) => Pick::Left,
                    _ => Pick::Right,
                }
            }
        }
    }
}

fn by_rank(left: Decision, right: Decision, rank: impl Fn(Decision) -> u8) -> Pick {
    if rank(left) >= rank(right) {
        Pick::Left
    } else {
        Pick::Right
    }
}

const URN_PREFIXES: [&str; 6] = [
    "urn:oasis:names:tc:xacml:1.0:rule-combining-algorithm:",
    "urn:oasis:names:tc:xacml:1.0:policy-combining-algorithm:",
    "urn:oasis:names:tc:xacml:1.1:rule-combining-algorithm:",
    "urn:oasis:names:tc:xacml:1.1:policy-combining-algorithm:",
    "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:",
    "urn:oasis:names:tc:xacml:3.0:policy-combining-algorithm:",
];

impl FromStr for CombiningAlgorithm {
    type Err = MiddError;

    /// Parses a short name or an XACML combining-algorithm URN.
    ///
    /// Ordered variants map to their plain counterparts since combination
    /// always follows declared order.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let short = URN_PREFIXES
            .iter()
            .find_map(|prefix| trimmed.strip_prefix(*prefix))
            .unwrap_or(trimmed);

        let normalized = short.to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "deny-overrides" | "ordered-deny-overrides" => Ok(CombiningAlgorithm::DenyOverrides),
            "permit-overrides" | "ordered-permit-overrides" => {
                Ok(CombiningAlgorithm::PermitOverrides)
            }
            "first-applicable" => Ok(CombiningAlgorithm::FirstApplicable),
            "only-one-applicable" => Ok(CombiningAlgorithm::OnlyOneApplicable),
            _ => Err(MiddError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl TryFrom<String> for CombiningAlgorithm {
    type Error = MiddError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CombiningAlgorithm> for String {
    fn from(algorithm: CombiningAlgorithm) -> Self {
        algorithm.name().to_string()
    }
}

impl fmt::Display for CombiningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Combines two diagrams under `algorithm`.
///
/// `left` is the earlier child in declared order.
pub fn combine<T, D>(
    store: &mut NodeStore<T, D>,
    left: NodeId,
    right: NodeId,
    algorithm: CombiningAlgorithm,
) -> Result<NodeId>
where
    T: Ord + Clone + Hash,
    D: Decided,
{
    let combined = apply(store, left, right, |l, r| algorithm.merge_terminals(l, r))?;
    debug!(
        event = "combine",
        algorithm = %algorithm,
        left_nodes = store.count_nodes(left),
        right_nodes = store.count_nodes(right),
        combined_nodes = store.count_nodes(combined),
    );
    Ok(combined)
}

/// Combines `children` in order, left to right.
///
/// # Errors
///
/// [`MiddError::NonTransformable`] for an empty list.
pub fn combine_all<T, D>(
    store: &mut NodeStore<T, D>,
    children: impl IntoIterator<Item = NodeId>,
    algorithm: CombiningAlgorithm,
) -> Result<NodeId>
where
    T: Ord + Clone + Hash,
    D: Decided,
{
    let mut children = children.into_iter();
    let Some(first) = children.next() else {
        return Err(MiddError::NonTransformable("nothing to combine".to_string()));
    };
    children.try_fold(first, |acc, next| combine(store, acc, next, algorithm))
}
