//! Resolution of policy references.

use std::collections::HashMap;

use crate::model::PolicyChild;

/// Resolves `PolicyChild::Reference` ids.
pub trait PolicyFinder: Send + Sync {
    fn lookup(&self, id: &str) -> Option<PolicyChild>;
}

/// A finder over elements held in memory, keyed by their id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPolicyFinder {
    elements: HashMap<String, PolicyChild>,
}

impl InMemoryPolicyFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an element, replacing any earlier one with the same id.
    pub fn insert(&mut self, element: impl Into<PolicyChild>) {
        let element = element.into();
        self.elements.insert(element.id().to_string(), element);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl PolicyFinder for InMemoryPolicyFinder {
    fn lookup(&self, id: &str) -> Option<PolicyChild> {
        self.elements.get(id).cloned()
    }
}

impl FromIterator<PolicyChild> for InMemoryPolicyFinder {
    fn from_iter<I: IntoIterator<Item = PolicyChild>>(iter: I) -> Self {
        let mut finder = Self::new();
        for element in iter {
            finder.insert(element);
        }
        finder
    }
}
