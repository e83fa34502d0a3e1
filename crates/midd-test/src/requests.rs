//! Assignment builders.

use midd_core::{assignment, Assignment, Variable, VariableId};

/// An assignment with a value for each listed variable.
pub fn request(values: &[(VariableId, i64)]) -> Assignment<i64> {
    assignment(values.iter().map(|&(id, v)| Variable::new(id, v)))
}

/// Like [`request`], plus variables that are present without a value.
pub fn request_with_missing(
    values: &[(VariableId, i64)],
    missing: &[VariableId],
) -> Assignment<i64> {
    let mut vars = request(values);
    for &id in missing {
        vars.insert(id, Variable::missing(id));
    }
    vars
}
