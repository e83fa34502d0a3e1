//! Terminal values carried by external nodes.

use std::fmt;
use std::hash::Hash;

/// A value that can label a terminal node.
///
/// Every terminal type has a distinguished "not applicable" value. It is
/// what the evaluator returns when no partition entry matches, and it
/// absorbs conjunction.
pub trait Terminal: Clone + Eq + Hash + fmt::Debug + Send + Sync {
    fn not_applicable() -> Self;

    fn is_not_applicable(&self) -> bool {
        *self == Self::not_applicable()
    }
}

/// Final outcome of evaluating a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Decision {
    Permit,
    Deny,
    NotApplicable,
    Indeterminate,
}

impl Decision {
    /// True for everything except `NotApplicable`.
    #[inline]
    pub fn is_applicable(self) -> bool {
        self != Decision::NotApplicable
    }
}

impl Terminal for Decision {
    fn not_applicable() -> Self {
        Decision::NotApplicable
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Permit => write!(f, "Permit"),
            Decision::Deny => write!(f, "Deny"),
            Decision::NotApplicable => write!(f, "NotApplicable"),
            Decision::Indeterminate => write!(f, "Indeterminate"),
        }
    }
}

/// Terminal of a diagram under construction.
///
/// Target and condition diagrams end in `Match` until an effect is
/// attached; compiled rules and policies end in `Decision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Leaf {
    Match,
    Decision(Decision),
}

impl Leaf {
    /// Reads the leaf as a final decision.
    ///
    /// A bare `Match` carries no effect and cannot justify Permit or Deny,
    /// so it reads as `Indeterminate`.
    pub fn decision(self) -> Decision {
        match self {
            Leaf::Match => Decision::Indeterminate,
            Leaf::Decision(d) => d,
        }
    }
}

impl From<Decision> for Leaf {
    fn from(decision: Decision) -> Self {
        Leaf::Decision(decision)
    }
}

impl Terminal for Leaf {
    fn not_applicable() -> Self {
        Leaf::Decision(Decision::NotApplicable)
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leaf::Match => write!(f, "Match"),
            Leaf::Decision(d) => write!(f, "{}", d),
        }
    }
}

/// Terminals that can be read as and built from a [`Decision`].
///
/// Combining algorithms are defined on decisions; this lifts them to any
/// terminal type that embeds one.
pub trait Decided: Terminal {
    fn decision(&self) -> Decision;

    fn from_decision(decision: Decision) -> Self;
}

impl Decided for Decision {
    fn decision(&self) -> Decision {
        *self
    }

    fn from_decision(decision: Decision) -> Self {
        decision
    }
}

impl Decided for Leaf {
    fn decision(&self) -> Decision {
        Leaf::decision(*self)
    }

    fn from_decision(decision: Decision) -> Self {
        Leaf::Decision(decision)
    }
}
