//! Runtime values bound to diagram test axes.

use std::collections::HashMap;

/// Identifier of a diagram test axis.
///
/// Internal nodes test variables in ascending id order.
pub type VariableId = u32;

/// A request value for one variable.
///
/// `value` is `None` when the attribute is known but carries no value;
/// an attribute that was not supplied at all simply has no entry in the
/// [`Assignment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable<T> {
    pub id: VariableId,
    pub value: Option<T>,
}

impl<T> Variable<T> {
    pub fn new(id: VariableId, value: T) -> Self {
        Self {
            id,
            value: Some(value),
        }
    }

    pub fn missing(id: VariableId) -> Self {
        Self { id, value: None }
    }
}

/// Variable values of one request, keyed by variable id.
pub type Assignment<T> = HashMap<VariableId, Variable<T>>;

/// Collects variables into an [`Assignment`].
///
/// ```
/// use midd_core::{assignment, Variable};
///
/// let vars = assignment([Variable::new(0, 7_i64), Variable::missing(2)]);
/// assert_eq!(vars[&0].value, Some(7));
/// assert!(vars.contains_key(&2));
/// assert!(!vars.contains_key(&1));
/// ```
pub fn assignment<T>(variables: impl IntoIterator<Item = Variable<T>>) -> Assignment<T> {
    variables.into_iter().map(|v| (v.id, v)).collect()
}
