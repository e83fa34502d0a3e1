//! Policy documents and the decision point built on MIDD diagrams.
//!
//! This crate turns XACML-shaped policies into one decision diagram:
//! - [`PolicyDocument`] and friends describe policies as serde data
//! - [`AttributeMapper`] assigns each attribute a diagram variable
//! - [`PolicyCompiler`] compiles targets, conditions and rules, resolving
//!   references through a [`PolicyFinder`]
//! - [`Pdp`] freezes the result and answers [`Request`]s
//!
//! # Example
//!
//! ```
//! use midd_policy::{EngineConfig, Pdp, PolicyDocument, Request};
//! use midd_policy::Decision;
//!
//! let document = PolicyDocument::from_yaml_str(r#"
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
//! "#).unwrap();
//!
//! let pdp = Pdp::from_document(&document, EngineConfig::default()).unwrap();
//! let adult = Request::new().with("subject.age", 30);
//! let child = Request::new().with("subject.age", 12);
//!
//! assert_eq!(pdp.evaluate(&adult).decision, Decision::Permit);
//! assert_eq!(pdp.evaluate(&child).decision, Decision::Deny);
//! ```

pub mod compile;
pub mod error;
pub mod finder;
pub mod mapper;
pub mod model;
pub mod pdp;
pub mod request;
pub mod value;

#[cfg(test)]
mod tests;

pub use compile::{PolicyCompiler, PolicyStore};
pub use error::{PolicyError, Result};
pub use finder::{InMemoryPolicyFinder, PolicyFinder};
pub use mapper::AttributeMapper;
pub use model::{
    AllOf, AnyOf, AttributeDeclaration, Condition, Effect, Match, Policy, PolicyChild,
    PolicyDocument, PolicySet, Rule, Target,
};
pub use pdp::Pdp;
pub use request::{Request, RequestAttribute, Response, Status};
pub use value::{AttributeValue, DataType, Scalar};

pub use midd_config::EngineConfig;
pub use midd_core::Decision;
pub use midd_engine::CombiningAlgorithm;
