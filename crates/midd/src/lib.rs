//! MIDD - XACML policy evaluation on interval decision diagrams
//!
//! Load a policy document, compile it once, answer requests from any
//! number of threads.
//!
//! # Example
//!
//! ```rust
//! use midd::prelude::*;
//!
//! let adults = Policy {
//!     id: "adults".to_string(),
//!     target: Target::default(),
//!     combining: Some(CombiningAlgorithm::FirstApplicable),
//!     rules: vec![Rule {
//!         id: "allow-adults".to_string(),
//!         effect: Effect::Permit,
//!         target: Target::all([Match::at_least("subject.age", 18)]),
//!         condition: None,
//!     }],
//! };
//!
//! let pdp = Pdp::new(&adults.into(), None, EngineConfig::default()).unwrap();
//! let response = pdp.evaluate(&Request::new().with("subject.age", 42));
//! assert_eq!(response.decision, Decision::Permit);
//! ```

// Diagram layer
pub use midd_core::{
    Assignment, Decision, Diagram, EndPoint, Interval, Leaf, MiddError, NodeId, NodeStore,
    Terminal, TreeDisplay, Variable, VariableId,
};
pub use midd_engine::{combine, combine_all, eval, eval_batch, CombiningAlgorithm};

// Configuration
pub use midd_config::{CompileConfig, ConfigError, EngineConfig, EvaluationConfig, LoggingConfig};

// Policy layer
pub use midd_policy::{
    AllOf, AnyOf, AttributeMapper, AttributeValue, Condition, DataType, Effect,
    InMemoryPolicyFinder, Match, Pdp, Policy, PolicyChild, PolicyDocument, PolicyError,
    PolicyFinder, PolicySet, Request, Response, Rule, Scalar, Status, Target,
};

/// Diagram construction primitives.
pub mod builder {
    pub use midd_engine::builder::*;
}

mod open;
pub use open::{open, CONFIG_FILE};

pub mod prelude {
    pub use super::{
        CombiningAlgorithm, Condition, Decision, Effect, EngineConfig, Match, Pdp, Policy,
        PolicyDocument, PolicySet, Request, Response, Rule, Target,
    };
}
