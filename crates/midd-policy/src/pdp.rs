//! The policy decision point.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use midd_config::EngineConfig;
use midd_core::{Assignment, Decision, Diagram, Leaf};
use midd_engine::eval_diagram;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::compile::PolicyCompiler;
use crate::error::Result;
use crate::finder::PolicyFinder;
use crate::mapper::AttributeMapper;
use crate::model::{is_yaml, PolicyChild, PolicyDocument};
use crate::request::{Request, Response};
use crate::value::AttributeValue;

/// A compiled policy ready to answer requests.
///
/// Compilation happens once, in the constructor. The frozen diagram is
/// shared and read-only afterwards, so one `Pdp` serves any number of
/// threads.
#[derive(Debug, Clone)]
pub struct Pdp {
    diagram: Diagram<AttributeValue, Leaf>,
    mapper: AttributeMapper,
    config: EngineConfig,
}

impl Pdp {
    /// Compiles `root`, resolving references through `finder`.
    pub fn new(
        root: &PolicyChild,
        finder: Option<&dyn PolicyFinder>,
        config: EngineConfig,
    ) -> Result<Self> {
        Self::with_mapper(root, finder, AttributeMapper::new(), config)
    }

    /// Compiles `root` with attributes already declared in `mapper`.
    pub fn with_mapper(
        root: &PolicyChild,
        finder: Option<&dyn PolicyFinder>,
        mut mapper: AttributeMapper,
        config: EngineConfig,
    ) -> Result<Self> {
        let start = Instant::now();
        info!(event = "compile_start", root = %root.id());

        let mut compiler = PolicyCompiler::new(&mut mapper, finder, &config.compile);
        let compiled = compiler.compile(root)?;
        let store = compiler.into_store();
        let diagram = store.freeze(compiled)?;

        info!(
            event = "compile_end",
            root = %root.id(),
            nodes = diagram.count_nodes(),
            depth = diagram.depth(),
            variables = mapper.len(),
            store_nodes = store.len(),
            duration_ms = start.elapsed().as_millis() as u64,
        );

        Ok(Self {
            diagram,
            mapper,
            config,
        })
    }

    /// Compiles a whole document: its declarations, root and library.
    pub fn from_document(document: &PolicyDocument, config: EngineConfig) -> Result<Self> {
        let finder = document.finder();
        Self::with_mapper(&document.root, Some(&finder), document.mapper()?, config)
    }

    /// Loads a policy document and, optionally, an engine configuration.
    ///
    /// Files ending in `.yaml` or `.yml` are read as YAML, anything else as
    /// TOML, for both paths.
    pub fn load(policy_path: impl AsRef<Path>, config_path: Option<&Path>) -> Result<Self> {
        let document = PolicyDocument::load(policy_path)?;
        let config = match config_path {
            Some(path) if is_yaml(path) => EngineConfig::from_yaml_file(path)?,
            Some(path) => EngineConfig::from_toml_file(path)?,
            None => EngineConfig::default(),
        };
        Self::from_document(&document, config)
    }

    /// Evaluates one request.
    ///
    /// Conversion failures are reported in the response; they never
    /// escape as errors.
    pub fn evaluate(&self, request: &Request) -> Response {
        match self.assignment(request) {
            Ok(variables) => Response::ok(self.evaluate_variables(&variables)),
            Err(e) => {
                debug!(event = "request_rejected", reason = %e);
                Response::processing_error(e.to_string())
            }
        }
    }

    /// Evaluates an already converted assignment.
    pub fn evaluate_variables(&self, variables: &Assignment<AttributeValue>) -> Decision {
        eval_diagram(&self.diagram, variables).decision()
    }

    /// Evaluates many requests, in parallel once the batch reaches the
    /// configured threshold. Responses keep request order.
    pub fn evaluate_batch(&self, requests: &[Request]) -> Vec<Response> {
        if requests.len() >= self.config.evaluation.parallel_threshold {
            requests.par_iter().map(|r| self.evaluate(r)).collect()
        } else {
            requests.iter().map(|r| self.evaluate(r)).collect()
        }
    }

    /// Converts request attributes into a variable assignment.
    ///
    /// # Errors
    ///
    /// [`PolicyError::UnknownAttribute`](crate::PolicyError::UnknownAttribute) or
    /// [`PolicyError::TypeMismatch`](crate::PolicyError::TypeMismatch).
    pub fn assignment(&self, request: &Request) -> Result<Assignment<AttributeValue>> {
        let mut variables = Assignment::with_capacity(request.attributes.len());
        for attribute in &request.attributes {
            let variable = self
                .mapper
                .convert(&attribute.id, attribute.value.as_ref())?;
            variables.insert(variable.id, variable);
        }
        Ok(variables)
    }

    pub fn diagram(&self) -> &Diagram<AttributeValue, Leaf> {
        &self.diagram
    }

    pub fn mapper(&self) -> &AttributeMapper {
        &self.mapper
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn count_nodes(&self) -> usize {
        self.diagram.count_nodes()
    }
}

impl fmt::Display for Pdp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (variable, attribute, data_type) in self.mapper.iter() {
            writeln!(f, "x{} = {} ({})", variable, attribute, data_type)?;
        }
        write!(f, "{}", self.diagram)
    }
}
