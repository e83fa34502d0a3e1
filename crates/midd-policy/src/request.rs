//! Requests and responses exchanged with the decision point.

use std::fmt;

use midd_core::Decision;
use serde::{Deserialize, Serialize};

use crate::value::Scalar;

/// One attribute supplied with a request.
///
/// A `None` value marks the attribute as present but empty; it is treated
/// like an attribute the request does not carry at all.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RequestAttribute {
    pub id: String,

    #[serde(default)]
    pub value: Option<Scalar>,
}

/// An access request: a flat list of attribute values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Request {
    #[serde(default)]
    pub attributes: Vec<RequestAttribute>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attribute value.
    pub fn with(mut self, id: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.attributes.push(RequestAttribute {
            id: id.into(),
            value: Some(value.into()),
        });
        self
    }

    /// Adds an attribute with no value.
    pub fn with_missing(mut self, id: impl Into<String>) -> Self {
        self.attributes.push(RequestAttribute {
            id: id.into(),
            value: None,
        });
        self
    }

    pub fn from_yaml_str(s: &str) -> crate::error::Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }
}

/// Outcome of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub decision: Decision,
    pub status: Status,
}

impl Response {
    pub fn ok(decision: Decision) -> Self {
        Self {
            decision,
            status: Status::Ok,
        }
    }

    /// An Indeterminate response carrying the reason the request could not
    /// be evaluated.
    pub fn processing_error(message: impl Into<String>) -> Self {
        Self {
            decision: Decision::Indeterminate,
            status: Status::ProcessingError(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            Status::Ok => write!(f, "{}", self.decision),
            Status::ProcessingError(message) => {
                write!(f, "{} (processing error: {})", self.decision, message)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    ProcessingError(String),
}
