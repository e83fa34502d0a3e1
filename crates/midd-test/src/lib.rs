//! Shared test fixtures for MIDD crates.
//!
//! This crate depends on `midd-core` only, so every other crate can take
//! it as a dev-dependency without a cycle.
//!
//! - [`intervals`] - interval shorthands and a value grid
//! - [`diagrams`] - small hand-built diagrams with known decisions
//! - [`requests`] - assignment builders
//! - [`policies`] - policy documents as YAML and TOML text
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! midd-test = { workspace = true }
//! ```

pub mod diagrams;
pub mod intervals;
pub mod policies;
pub mod requests;

pub use diagrams::{single_variable, two_variable, Fixture};
pub use intervals::{closed, closed_open, grid, open_closed};
pub use requests::{request, request_with_missing};
