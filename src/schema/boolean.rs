//! Boolean schema validation.

use serde_json::Value;

use crate::error::{ErrorNode, Invalid, JsonKind, PredicateErr};
use crate::validated::Validated;

use super::predicate::Predicate;

/// A schema for validating boolean values.
///
/// The check is exact: numbers are never accepted as booleans.
#[derive(Clone, Default)]
pub struct BooleanSchema {
    predicates: Vec<Predicate<bool>>,
}

impl BooleanSchema {
    /// Creates a new boolean schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom predicate with the given code and failure message.
    pub fn predicate(
        mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        test: impl Fn(&bool) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicates.push(Predicate::new(code, message, test));
        self
    }

    /// The details of every declared check, in declaration order.
    pub fn declared_predicates(&self) -> Vec<PredicateErr> {
        self.predicates.iter().map(|p| p.detail()).collect()
    }

    /// Validates a value against this schema.
    pub fn validate(&self, value: &Value) -> Validated<bool> {
        let b = match value.as_bool() {
            Some(b) => b,
            None => {
                return Validated::Invalid(Invalid::new(
                    ErrorNode::Type {
                        expected: JsonKind::Boolean,
                    },
                    value.clone(),
                    "boolean",
                ))
            }
        };
        let failing: Vec<PredicateErr> = self
            .predicates
            .iter()
            .filter(|p| !p.check(&b))
            .map(|p| p.detail())
            .collect();
        if failing.is_empty() {
            Validated::Valid(b)
        } else {
            Validated::Invalid(Invalid::new(
                ErrorNode::Predicates(failing),
                value.clone(),
                "boolean",
            ))
        }
    }
}

#[async_trait::async_trait]
impl super::traits::SchemaLike for BooleanSchema {
    type Output = bool;

    fn validate(&self, value: &Value) -> Validated<bool> {
        BooleanSchema::validate(self, value)
    }

    fn validate_to_value(&self, value: &Value) -> Validated<Value> {
        BooleanSchema::validate(self, value).map(Value::Bool)
    }
}
