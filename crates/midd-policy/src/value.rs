//! Attribute values and their data types.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, Result};

/// Declared type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Boolean,
    Integer,
    Decimal,
    String,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Boolean => write!(f, "boolean"),
            DataType::Integer => write!(f, "integer"),
            DataType::Decimal => write!(f, "decimal"),
            DataType::String => write!(f, "string"),
        }
    }
}

/// A typed attribute value.
///
/// Values of one kind are totally ordered. Values of different kinds
/// never meet on the same variable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeValue {
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    String(String),
}

impl AttributeValue {
    pub fn data_type(&self) -> DataType {
        match self {
            AttributeValue::Boolean(_) => DataType::Boolean,
            AttributeValue::Integer(_) => DataType::Integer,
            AttributeValue::Decimal(_) => DataType::Decimal,
            AttributeValue::String(_) => DataType::String,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Boolean(b) => write!(f, "{}", b),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Decimal(d) => write!(f, "{}", d),
            AttributeValue::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Boolean(b)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Integer(i)
    }
}

impl From<Decimal> for AttributeValue {
    fn from(d: Decimal) -> Self {
        AttributeValue::Decimal(d)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

/// An untyped value as written in a document or request.
///
/// Decimals are usually written as strings to keep their precision.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// The data type a value of this shape has when nothing else is known.
    pub fn natural_type(&self) -> DataType {
        match self {
            Scalar::Boolean(_) => DataType::Boolean,
            Scalar::Integer(_) => DataType::Integer,
            Scalar::Float(_) => DataType::Decimal,
            Scalar::Text(_) => DataType::String,
        }
    }

    /// Reads the scalar as a value of `data_type`.
    ///
    /// Text is parsed into booleans, integers and decimals; integers and
    /// floats widen to decimals.
    ///
    /// # Errors
    ///
    /// [`PolicyError::TypeMismatch`] when the scalar cannot be read as
    /// `data_type`.
    pub fn typed(&self, attribute: &str, data_type: DataType) -> Result<AttributeValue> {
        let value = match (data_type, self) {
            (DataType::Boolean, Scalar::Boolean(b)) => Some(AttributeValue::Boolean(*b)),
            (DataType::Boolean, Scalar::Text(s)) => s.parse().ok().map(AttributeValue::Boolean),
            (DataType::Integer, Scalar::Integer(i)) => Some(AttributeValue::Integer(*i)),
            (DataType::Integer, Scalar::Text(s)) => s.parse().ok().map(AttributeValue::Integer),
            (DataType::Decimal, Scalar::Integer(i)) => {
                Some(AttributeValue::Decimal(Decimal::from(*i)))
            }
            (DataType::Decimal, Scalar::Float(f)) => {
                Decimal::try_from(*f).ok().map(AttributeValue::Decimal)
            }
            (DataType::Decimal, Scalar::Text(s)) => {
                Decimal::from_str(s.trim()).ok().map(AttributeValue::Decimal)
            }
            (DataType::String, Scalar::Text(s)) => Some(AttributeValue::String(s.clone())),
            _ => None,
        };
        value.ok_or_else(|| PolicyError::TypeMismatch {
            attribute: attribute.to_string(),
            expected: data_type,
            found: self.natural_type(),
        })
    }

    /// Reads the scalar as its natural type.
    pub fn natural(&self, attribute: &str) -> Result<AttributeValue> {
        self.typed(attribute, self.natural_type())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Boolean(b)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Integer(i)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}
