//! UUID validation.

use serde_json::Value;
use uuid::Uuid;

use crate::error::{ErrorNode, Invalid, JsonKind, PredicateErr};
use crate::validated::Validated;

use super::predicate::Predicate;

/// A schema for validating UUID strings.
///
/// Accepts the canonical hyphenated form (and the other encodings
/// `uuid::Uuid::parse_str` understands); anything else is a coercion
/// failure.
#[derive(Clone, Default)]
pub struct UuidSchema {
    predicates: Vec<Predicate<Uuid>>,
}

impl UuidSchema {
    /// Creates a new UUID schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom predicate with the given code and failure message.
    pub fn predicate(
        mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        test: impl Fn(&Uuid) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicates.push(Predicate::new(code, message, test));
        self
    }

    /// The details of every declared check, in declaration order.
    pub fn declared_predicates(&self) -> Vec<PredicateErr> {
        self.predicates.iter().map(|p| p.detail()).collect()
    }

    /// Validates a value against this schema.
    pub fn validate(&self, value: &Value) -> Validated<Uuid> {
        let parsed = value.as_str().and_then(|s| Uuid::parse_str(s).ok());
        let id = match parsed {
            Some(id) => id,
            None => {
                return Validated::Invalid(Invalid::new(
                    ErrorNode::Coercion {
                        compatible: vec![JsonKind::String],
                        dest: "uuid",
                    },
                    value.clone(),
                    "uuid",
                ))
            }
        };
        let failing: Vec<PredicateErr> = self
            .predicates
            .iter()
            .filter(|p| !p.check(&id))
            .map(|p| p.detail())
            .collect();
        if failing.is_empty() {
            Validated::Valid(id)
        } else {
            Validated::Invalid(Invalid::new(
                ErrorNode::Predicates(failing),
                value.clone(),
                "uuid",
            ))
        }
    }
}

#[async_trait::async_trait]
impl super::traits::SchemaLike for UuidSchema {
    type Output = Uuid;

    fn validate(&self, value: &Value) -> Validated<Uuid> {
        UuidSchema::validate(self, value)
    }

    fn validate_to_value(&self, value: &Value) -> Validated<Value> {
        UuidSchema::validate(self, value).map(|id| Value::String(id.to_string()))
    }
}
