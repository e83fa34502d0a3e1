//! Attribute identifiers to diagram variables.

use std::collections::HashMap;

use midd_core::{Variable, VariableId};

use crate::error::{PolicyError, Result};
use crate::value::{AttributeValue, DataType, Scalar};

/// Assigns dense variable ids to attribute ids.
///
/// Ids are handed out in first-seen order, which is also the order in
/// which diagrams test the attributes. Each attribute keeps the data type
/// it was first declared with.
///
/// ```
/// use midd_policy::{AttributeMapper, DataType};
///
/// let mut mapper = AttributeMapper::new();
/// let age = mapper.declare("subject.age", DataType::Integer).unwrap();
/// let role = mapper.declare("subject.role", DataType::String).unwrap();
///
/// assert_eq!((age, role), (0, 1));
/// assert_eq!(mapper.declare("subject.age", DataType::Integer).unwrap(), 0);
/// assert!(mapper.declare("subject.age", DataType::String).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AttributeMapper {
    ids: HashMap<String, VariableId>,
    attributes: Vec<(String, DataType)>,
}

impl AttributeMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-declares attributes, fixing their variable order.
    pub fn with_declarations<'a>(
        declarations: impl IntoIterator<Item = (&'a str, DataType)>,
    ) -> Result<Self> {
        let mut mapper = Self::new();
        for (attribute, data_type) in declarations {
            mapper.declare(attribute, data_type)?;
        }
        Ok(mapper)
    }

    /// Returns the variable of `attribute`, registering it if new.
    ///
    /// # Errors
    ///
    /// [`PolicyError::TypeMismatch`] if the attribute is already known
    /// with another data type.
    pub fn declare(&mut self, attribute: &str, data_type: DataType) -> Result<VariableId> {
        if let Some(&id) = self.ids.get(attribute) {
            let declared = self.attributes[id as usize].1;
            if declared != data_type {
                return Err(PolicyError::TypeMismatch {
                    attribute: attribute.to_string(),
                    expected: declared,
                    found: data_type,
                });
            }
            return Ok(id);
        }
        let id = self.attributes.len() as VariableId;
        self.ids.insert(attribute.to_string(), id);
        self.attributes.push((attribute.to_string(), data_type));
        Ok(id)
    }

    pub fn variable(&self, attribute: &str) -> Option<VariableId> {
        self.ids.get(attribute).copied()
    }

    /// Declared data type of a known attribute.
    pub fn data_type(&self, attribute: &str) -> Option<DataType> {
        self.variable(attribute)
            .map(|id| self.attributes[id as usize].1)
    }

    /// Attribute id behind a variable.
    pub fn attribute(&self, variable: VariableId) -> Option<&str> {
        self.attributes
            .get(variable as usize)
            .map(|(name, _)| name.as_str())
    }

    /// Known attributes in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (VariableId, &str, DataType)> {
        self.attributes
            .iter()
            .enumerate()
            .map(|(i, (name, ty))| (i as VariableId, name.as_str(), *ty))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Converts one request attribute into a diagram variable.
    ///
    /// # Errors
    ///
    /// - [`PolicyError::UnknownAttribute`] if no policy tests `attribute`.
    /// - [`PolicyError::TypeMismatch`] if `value` cannot be read as the
    ///   attribute's data type.
    pub fn convert(
        &self,
        attribute: &str,
        value: Option<&Scalar>,
    ) -> Result<Variable<AttributeValue>> {
        let id = self
            .variable(attribute)
            .ok_or_else(|| PolicyError::UnknownAttribute(attribute.to_string()))?;
        let data_type = self.attributes[id as usize].1;
        match value {
            Some(v) => Ok(Variable::new(id, v.typed(attribute, data_type)?)),
            None => Ok(Variable::missing(id)),
        }
    }
}
