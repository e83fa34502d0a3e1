//! Policy documents.
//!
//! The shapes follow XACML: a policy set holds policies and nested sets,
//! a policy holds rules, and every element may carry a target. Documents
//! are plain serde data and load from TOML or YAML.
//!
//! ```yaml
//! attributes:
//!   - id: subject.age
//!     data_type: integer
//! root:
//!   policy:
//!     id: adults
//!     combining: first-applicable
//!     rules:
//!       - id: allow-adults
//!         effect: permit
//!         condition:
//!           match: { attribute: subject.age, lower: 18 }
//!       - id: deny-rest
//!         effect: deny
//! ```

use std::path::Path;

use midd_core::Decision;
use midd_engine::CombiningAlgorithm;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::finder::InMemoryPolicyFinder;
use crate::mapper::AttributeMapper;
use crate::value::{DataType, Scalar};

/// A complete policy document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PolicyDocument {
    /// Attribute declarations, in the order diagrams test them.
    #[serde(default)]
    pub attributes: Vec<AttributeDeclaration>,

    /// The element evaluated for every request.
    pub root: PolicyChild,

    /// Elements reachable only by reference.
    #[serde(default)]
    pub library: Vec<PolicyChild>,
}

impl PolicyDocument {
    /// Loads a document, reading `.yaml` and `.yml` files as YAML and
    /// anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if is_yaml(path) {
            Self::from_yaml_file(path)
        } else {
            Self::from_toml_file(path)
        }
    }

    /// Loads a document from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses a document from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Loads a document from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses a document from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// A mapper pre-loaded with the declared attributes.
    pub fn mapper(&self) -> Result<AttributeMapper> {
        AttributeMapper::with_declarations(
            self.attributes
                .iter()
                .map(|a| (a.id.as_str(), a.data_type)),
        )
    }

    /// A finder over the library.
    pub fn finder(&self) -> InMemoryPolicyFinder {
        self.library.iter().cloned().collect()
    }
}

pub(crate) fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

/// Declared data type of one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttributeDeclaration {
    pub id: String,
    pub data_type: DataType,
}

/// An element of a policy set.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyChild {
    PolicySet(PolicySet),
    Policy(Policy),
    /// Id of an element resolved through a policy finder.
    Reference(String),
}

impl PolicyChild {
    pub fn id(&self) -> &str {
        match self {
            PolicyChild::PolicySet(s) => &s.id,
            PolicyChild::Policy(p) => &p.id,
            PolicyChild::Reference(id) => id,
        }
    }
}

impl From<PolicySet> for PolicyChild {
    fn from(set: PolicySet) -> Self {
        PolicyChild::PolicySet(set)
    }
}

impl From<Policy> for PolicyChild {
    fn from(policy: Policy) -> Self {
        PolicyChild::Policy(policy)
    }
}

/// A container of policies and nested policy sets.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PolicySet {
    pub id: String,

    #[serde(default)]
    pub target: Target,

    /// Falls back to the configured default when absent.
    #[serde(default)]
    pub combining: Option<CombiningAlgorithm>,

    #[serde(default)]
    pub children: Vec<PolicyChild>,
}

/// A container of rules.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Policy {
    pub id: String,

    #[serde(default)]
    pub target: Target,

    /// Falls back to the configured default when absent.
    #[serde(default)]
    pub combining: Option<CombiningAlgorithm>,

    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// A rule: when its target and condition hold, it yields its effect.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Rule {
    pub id: String,

    pub effect: Effect,

    #[serde(default)]
    pub target: Target,

    #[serde(default)]
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    Permit,
    Deny,
}

impl From<Effect> for Decision {
    fn from(effect: Effect) -> Self {
        match effect {
            Effect::Permit => Decision::Permit,
            Effect::Deny => Decision::Deny,
        }
    }
}

/// Conjunction of `AnyOf` entries. An empty target always holds.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Target {
    #[serde(default)]
    pub any_of: Vec<AnyOf>,
}

/// Disjunction of `AllOf` entries.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AnyOf {
    #[serde(default)]
    pub all_of: Vec<AllOf>,
}

/// Conjunction of matches.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AllOf {
    #[serde(default)]
    pub matches: Vec<Match>,
}

/// A boolean combination of matches.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Match(Match),
}

/// Constrains one attribute to an interval.
///
/// Either `equals` or the `lower`/`upper` pair is used; a missing bound is
/// infinite. Bounds are inclusive unless stated otherwise.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Match {
    pub attribute: String,

    /// Overrides the attribute's declared type and the bounds' own kind.
    #[serde(default)]
    pub data_type: Option<DataType>,

    #[serde(default)]
    pub equals: Option<Scalar>,

    #[serde(default)]
    pub lower: Option<Scalar>,

    #[serde(default)]
    pub upper: Option<Scalar>,

    #[serde(default = "inclusive")]
    pub lower_inclusive: bool,

    #[serde(default = "inclusive")]
    pub upper_inclusive: bool,
}

fn inclusive() -> bool {
    true
}

impl Match {
    /// `attribute == value`
    pub fn equals(attribute: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            equals: Some(value.into()),
            ..Self::any(attribute)
        }
    }

    /// `lower <= attribute <= upper`
    pub fn between(
        attribute: impl Into<String>,
        lower: impl Into<Scalar>,
        upper: impl Into<Scalar>,
    ) -> Self {
        Self {
            lower: Some(lower.into()),
            upper: Some(upper.into()),
            ..Self::any(attribute)
        }
    }

    /// `attribute >= lower`
    pub fn at_least(attribute: impl Into<String>, lower: impl Into<Scalar>) -> Self {
        Self {
            lower: Some(lower.into()),
            ..Self::any(attribute)
        }
    }

    /// `attribute <= upper`
    pub fn at_most(attribute: impl Into<String>, upper: impl Into<Scalar>) -> Self {
        Self {
            upper: Some(upper.into()),
            ..Self::any(attribute)
        }
    }

    /// Any value at all, including a missing one.
    pub fn any(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            data_type: None,
            equals: None,
            lower: None,
            upper: None,
            lower_inclusive: true,
            upper_inclusive: true,
        }
    }

    pub fn exclusive_lower(mut self) -> Self {
        self.lower_inclusive = false;
        self
    }

    pub fn exclusive_upper(mut self) -> Self {
        self.upper_inclusive = false;
        self
    }

    pub fn with_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }
}

impl Target {
    /// A target holding when all of `matches` hold.
    pub fn all(matches: impl IntoIterator<Item = Match>) -> Self {
        Self {
            any_of: vec![AnyOf {
                all_of: vec![AllOf {
                    matches: matches.into_iter().collect(),
                }],
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.any_of.is_empty()
    }
}
