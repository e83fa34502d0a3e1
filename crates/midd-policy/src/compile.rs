//! Compilation of policy documents into one decision diagram.
//!
//! Every element is compiled under a precondition: the conjunction of the
//! targets of its enclosing containers. A rule becomes
//! `precondition ∧ policy target ∧ rule target ∧ rule condition -> effect`;
//! containers combine their compiled children in declared order.

use midd_config::CompileConfig;
use midd_core::{Interval, Leaf, MiddError, NodeId, NodeStore};
use midd_engine::{
    and, and_all, combine_all, condition, ensure_applicable, or, CombiningAlgorithm,
};
use tracing::{debug, warn};

use crate::error::{PolicyError, Result};
use crate::finder::PolicyFinder;
use crate::mapper::AttributeMapper;
use crate::model::{Condition, Match, Policy, PolicyChild, PolicySet, Rule, Target};
use crate::value::{AttributeValue, DataType, Scalar};

/// Store type every policy diagram lives in.
pub type PolicyStore = NodeStore<AttributeValue, Leaf>;

/// Compiles policy elements into a shared [`PolicyStore`].
pub struct PolicyCompiler<'a> {
    store: PolicyStore,
    mapper: &'a mut AttributeMapper,
    finder: Option<&'a dyn PolicyFinder>,
    config: &'a CompileConfig,
    // Ids of referenced elements currently being compiled.
    resolving: Vec<String>,
}

impl<'a> PolicyCompiler<'a> {
    pub fn new(
        mapper: &'a mut AttributeMapper,
        finder: Option<&'a dyn PolicyFinder>,
        config: &'a CompileConfig,
    ) -> Self {
        Self {
            store: PolicyStore::new(),
            mapper,
            finder,
            config,
            resolving: Vec::new(),
        }
    }

    pub fn store(&self) -> &PolicyStore {
        &self.store
    }

    pub fn into_store(self) -> PolicyStore {
        self.store
    }

    /// Compiles `root` with no precondition.
    ///
    /// # Errors
    ///
    /// [`MiddError::NonTransformable`] (wrapped) if the element never
    /// applies, plus any construction or document error.
    pub fn compile(&mut self, root: &PolicyChild) -> Result<NodeId> {
        let always = self.store.terminal(Leaf::Match);
        self.compile_child(root, always)
    }

    fn compile_child(&mut self, child: &PolicyChild, pre: NodeId) -> Result<NodeId> {
        match child {
            PolicyChild::PolicySet(set) => self.compile_policy_set(set, pre),
            PolicyChild::Policy(policy) => self.compile_policy(policy, pre),
            PolicyChild::Reference(id) => self.compile_reference(id, pre),
        }
    }

    fn compile_reference(&mut self, id: &str, pre: NodeId) -> Result<NodeId> {
        let Some(finder) = self.finder else {
            warn!(event = "skip_reference", reference = %id, reason = "no policy finder");
            return Err(non_transformable(format!("reference {}", id)));
        };
        let Some(element) = finder.lookup(id) else {
            warn!(event = "skip_reference", reference = %id, reason = "not found");
            return Err(non_transformable(format!("reference {}", id)));
        };
        if self.resolving.iter().any(|r| r == id) {
            return Err(PolicyError::Parse(format!(
                "policy reference cycle through '{}'",
                id
            )));
        }
        self.resolving.push(id.to_string());
        let compiled = self.compile_child(&element, pre);
        self.resolving.pop();
        compiled
    }

    fn compile_policy_set(&mut self, set: &PolicySet, pre: NodeId) -> Result<NodeId> {
        if set.children.is_empty() {
            return Err(PolicyError::EmptyPolicySet(set.id.clone()));
        }
        let target = self.compile_target(&set.target)?;
        let scope = and(&mut self.store, pre, target)?;
        let element = format!("target of policy set {}", set.id);
        let scope = ensure_applicable(&self.store, scope, &element)?;

        let mut compiled = Vec::with_capacity(set.children.len());
        for child in &set.children {
            match self.compile_child(child, scope) {
                Ok(id) => compiled.push(id),
                Err(e) if e.is_non_transformable() && self.config.skip_non_transformable => {
                    warn!(
                        event = "skip_child",
                        container = %set.id,
                        child = %child.id(),
                        reason = %e,
                    );
                }
                Err(e) => return Err(e),
            }
        }

        let algorithm = self.algorithm(set.combining);
        self.combine(&set.id, compiled, algorithm)
    }

    fn compile_policy(&mut self, policy: &Policy, pre: NodeId) -> Result<NodeId> {
        let target = self.compile_target(&policy.target)?;
        let scope = and(&mut self.store, pre, target)?;
        let element = format!("target of policy {}", policy.id);
        let scope = ensure_applicable(&self.store, scope, &element)?;

        let mut compiled = Vec::with_capacity(policy.rules.len());
        for rule in &policy.rules {
            match self.compile_rule(rule, scope) {
                Ok(id) => compiled.push(id),
                Err(e) if e.is_non_transformable() && self.config.skip_non_transformable => {
                    warn!(
                        event = "skip_rule",
                        container = %policy.id,
                        rule = %rule.id,
                        reason = %e,
                    );
                }
                Err(e) => return Err(e),
            }
        }

        let algorithm = self.algorithm(policy.combining);
        self.combine(&policy.id, compiled, algorithm)
    }

    fn compile_rule(&mut self, rule: &Rule, scope: NodeId) -> Result<NodeId> {
        let target = self.compile_target(&rule.target)?;
        let condition = match &rule.condition {
            Some(c) => self.compile_condition(c)?,
            None => self.store.terminal(Leaf::Match),
        };
        let guard = and_all(&mut self.store, [scope, target, condition], Leaf::Match)?;
        let effect = self.store.terminal(Leaf::Decision(rule.effect.into()));
        let compiled = and(&mut self.store, guard, effect)?;
        Ok(ensure_applicable(&self.store, compiled, &format!("rule {}", rule.id))?)
    }

    fn combine(
        &mut self,
        container: &str,
        children: Vec<NodeId>,
        algorithm: CombiningAlgorithm,
    ) -> Result<NodeId> {
        if children.is_empty() {
            return Err(non_transformable(format!(
                "{} has no applicable children",
                container
            )));
        }
        debug!(
            event = "combine_children",
            container = %container,
            children = children.len(),
            algorithm = %algorithm,
        );
        Ok(combine_all(&mut self.store, children, algorithm)?)
    }

    fn algorithm(&self, declared: Option<CombiningAlgorithm>) -> CombiningAlgorithm {
        declared.unwrap_or(self.config.default_policy_combining)
    }

    /// Compiles a target to a diagram ending in `Leaf::Match` where it holds.
    pub fn compile_target(&mut self, target: &Target) -> Result<NodeId> {
        let mut any_ofs = Vec::with_capacity(target.any_of.len());
        for any_of in &target.any_of {
            let mut alternatives = self.store.not_applicable();
            for all_of in &any_of.all_of {
                let mut matches = Vec::with_capacity(all_of.matches.len());
                for m in &all_of.matches {
                    matches.push(self.compile_match(m)?);
                }
                let conjunction = and_all(&mut self.store, matches, Leaf::Match)?;
                alternatives = or(&mut self.store, alternatives, conjunction)?;
            }
            any_ofs.push(alternatives);
        }
        Ok(and_all(&mut self.store, any_ofs, Leaf::Match)?)
    }

    /// Compiles a condition to a diagram ending in `Leaf::Match` where it
    /// holds.
    pub fn compile_condition(&mut self, condition: &Condition) -> Result<NodeId> {
        match condition {
            Condition::Match(m) => self.compile_match(m),
            Condition::All(parts) => {
                let mut compiled = Vec::with_capacity(parts.len());
                for part in parts {
                    compiled.push(self.compile_condition(part)?);
                }
                Ok(and_all(&mut self.store, compiled, Leaf::Match)?)
            }
            Condition::Any(parts) => {
                let mut acc = self.store.not_applicable();
                for part in parts {
                    let compiled = self.compile_condition(part)?;
                    acc = or(&mut self.store, acc, compiled)?;
                }
                Ok(acc)
            }
        }
    }

    fn compile_match(&mut self, m: &Match) -> Result<NodeId> {
        let declared = m.data_type.or_else(|| self.mapper.data_type(&m.attribute));
        let interval = match_interval(m, declared)?;
        let data_type = match declared {
            Some(ty) => ty,
            None => interval.bound_value()?.data_type(),
        };
        let variable = self.mapper.declare(&m.attribute, data_type)?;
        Ok(condition(&mut self.store, variable, [interval], Leaf::Match)?)
    }
}

/// Builds the interval a match accepts.
///
/// Bounds are read as `declared` when known, otherwise as their own kind;
/// both bounds must then agree.
fn match_interval(
    m: &Match,
    declared: Option<DataType>,
) -> Result<Interval<AttributeValue>> {
    let read = |scalar: &Scalar| match declared {
        Some(ty) => scalar.typed(&m.attribute, ty),
        None => scalar.natural(&m.attribute),
    };

    if let Some(value) = &m.equals {
        return Ok(Interval::point(read(value)?));
    }

    let lower = m.lower.as_ref().map(read).transpose()?;
    let upper = m.upper.as_ref().map(read).transpose()?;
    if let (Some(l), Some(u)) = (&lower, &upper) {
        if l.data_type() != u.data_type() {
            return Err(PolicyError::TypeMismatch {
                attribute: m.attribute.clone(),
                expected: l.data_type(),
                found: u.data_type(),
            });
        }
    }

    let interval = match (lower, upper) {
        (None, None) => Interval::unbounded(),
        (Some(l), None) if m.lower_inclusive => Interval::at_least(l),
        (Some(l), None) => Interval::greater_than(l),
        (None, Some(u)) if m.upper_inclusive => Interval::at_most(u),
        (None, Some(u)) => Interval::less_than(u),
        (Some(l), Some(u)) => match (m.lower_inclusive, m.upper_inclusive) {
            (true, true) => Interval::closed(l, u)?,
            (false, false) => Interval::open(l, u)?,
            (true, false) => Interval::closed_open(l, u)?,
            (false, true) => Interval::open_closed(l, u)?,
        },
    };
    Ok(interval)
}

fn non_transformable(element: String) -> PolicyError {
    PolicyError::Midd(MiddError::NonTransformable(element))
}
