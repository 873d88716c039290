//! Binary payload validation.
//!
//! Decoded JSON cannot carry raw bytes, so [`BytesSchema`] accepts
//! standard-alphabet base64 strings and produces the decoded `Vec<u8>`.
//! Length constraints apply to the decoded bytes, not the encoded text.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use crate::error::{ErrorNode, Invalid, JsonKind, PredicateErr};
use crate::validated::Validated;

use super::predicate::Predicate;

/// A constraint applied to decoded byte payloads.
#[derive(Clone)]
enum BytesConstraint {
    MinLength { min: usize, message: Option<String> },
    MaxLength { max: usize, message: Option<String> },
}

impl BytesConstraint {
    fn check(&self, bytes: &[u8]) -> bool {
        match self {
            BytesConstraint::MinLength { min, .. } => bytes.len() >= *min,
            BytesConstraint::MaxLength { max, .. } => bytes.len() <= *max,
        }
    }

    fn detail(&self) -> PredicateErr {
        match self {
            BytesConstraint::MinLength { min, message } => PredicateErr::new(
                "min_length",
                message
                    .clone()
                    .unwrap_or_else(|| format!("minimum allowed size is {} bytes", min)),
            ),
            BytesConstraint::MaxLength { max, message } => PredicateErr::new(
                "max_length",
                message
                    .clone()
                    .unwrap_or_else(|| format!("maximum allowed size is {} bytes", max)),
            ),
        }
    }

    fn set_message(&mut self, msg: String) {
        match self {
            BytesConstraint::MinLength { message, .. }
            | BytesConstraint::MaxLength { message, .. } => *message = Some(msg),
        }
    }
}

/// A schema for validating base64-encoded binary payloads.
#[derive(Clone, Default)]
pub struct BytesSchema {
    constraints: Vec<BytesConstraint>,
    predicates: Vec<Predicate<[u8]>>,
}

impl BytesSchema {
    /// Creates a new bytes schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires at least `min` decoded bytes.
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints
            .push(BytesConstraint::MinLength { min, message: None });
        self
    }

    /// Requires at most `max` decoded bytes.
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints
            .push(BytesConstraint::MaxLength { max, message: None });
        self
    }

    /// Adds a custom predicate over the decoded bytes.
    pub fn predicate(
        mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        test: impl Fn(&[u8]) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicates.push(Predicate::new(code, message, test));
        self
    }

    /// Overrides the failure message of the most recently added constraint.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            last.set_message(message.into());
        }
        self
    }

    /// The details of every declared check, in declaration order.
    pub fn declared_predicates(&self) -> Vec<PredicateErr> {
        self.constraints
            .iter()
            .map(|c| c.detail())
            .chain(self.predicates.iter().map(|p| p.detail()))
            .collect()
    }

    /// Validates a value against this schema.
    pub fn validate(&self, value: &Value) -> Validated<Vec<u8>> {
        let decoded = value.as_str().and_then(|s| STANDARD.decode(s).ok());
        let bytes = match decoded {
            Some(b) => b,
            None => {
                return Validated::Invalid(Invalid::new(
                    ErrorNode::Coercion {
                        compatible: vec![JsonKind::String],
                        dest: "bytes",
                    },
                    value.clone(),
                    "bytes",
                ))
            }
        };
        let mut failing: Vec<PredicateErr> = self
            .constraints
            .iter()
            .filter(|c| !c.check(&bytes))
            .map(|c| c.detail())
            .collect();
        for pred in &self.predicates {
            if !pred.check(&bytes) {
                failing.push(pred.detail());
            }
        }
        if failing.is_empty() {
            Validated::Valid(bytes)
        } else {
            Validated::Invalid(Invalid::new(
                ErrorNode::Predicates(failing),
                value.clone(),
                "bytes",
            ))
        }
    }
}

#[async_trait::async_trait]
impl super::traits::SchemaLike for BytesSchema {
    type Output = Vec<u8>;

    fn validate(&self, value: &Value) -> Validated<Vec<u8>> {
        BytesSchema::validate(self, value)
    }

    fn validate_to_value(&self, value: &Value) -> Validated<Value> {
        BytesSchema::validate(self, value).map(|b| Value::String(STANDARD.encode(b)))
    }
}
