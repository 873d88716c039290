//! Arbitrary-precision decimal validation.
//!
//! JSON has no decimal kind, so [`DecimalSchema`] is coercion-based: it
//! accepts decimal-formatted strings and integers, converting them to
//! [`rust_decimal::Decimal`]. Floats are deliberately not accepted; their
//! binary representation would silently change the value.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::{ErrorNode, Invalid, JsonKind, PredicateErr};
use crate::validated::Validated;

use super::predicate::{reject_sync_entry, AsyncPredicate, Predicate};

/// A constraint applied to decimal values.
#[derive(Clone)]
enum DecimalConstraint {
    Min {
        value: Decimal,
        message: Option<String>,
    },
    Max {
        value: Decimal,
        message: Option<String>,
    },
}

impl DecimalConstraint {
    fn check(&self, d: &Decimal) -> bool {
        match self {
            DecimalConstraint::Min { value, .. } => d >= value,
            DecimalConstraint::Max { value, .. } => d <= value,
        }
    }

    fn detail(&self) -> PredicateErr {
        match self {
            DecimalConstraint::Min { value, message } => PredicateErr::new(
                "min_value",
                message
                    .clone()
                    .unwrap_or_else(|| format!("minimum allowed value is {}", value)),
            ),
            DecimalConstraint::Max { value, message } => PredicateErr::new(
                "max_value",
                message
                    .clone()
                    .unwrap_or_else(|| format!("maximum allowed value is {}", value)),
            ),
        }
    }

    fn set_message(&mut self, msg: String) {
        match self {
            DecimalConstraint::Min { message, .. } | DecimalConstraint::Max { message, .. } => {
                *message = Some(msg)
            }
        }
    }
}

/// A schema for validating decimal values from strings or integers.
///
/// # Example
///
/// ```rust
/// use inquest::{Decimal, Schema, Validated};
/// use serde_json::json;
///
/// let schema = Schema::decimal().min(Decimal::ZERO);
///
/// assert_eq!(
///     schema.validate(&json!("19.99")),
///     Validated::Valid("19.99".parse::<Decimal>().unwrap())
/// );
/// assert!(schema.validate(&json!("-1.50")).is_invalid());
/// assert!(schema.validate(&json!(1.5)).is_invalid());
/// ```
#[derive(Clone, Default)]
pub struct DecimalSchema {
    constraints: Vec<DecimalConstraint>,
    predicates: Vec<Predicate<Decimal>>,
    predicates_async: Vec<Arc<dyn AsyncPredicate<Decimal>>>,
}

impl DecimalSchema {
    /// Creates a new decimal schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the decimal to be at least `value` (inclusive).
    pub fn min(mut self, value: impl Into<Decimal>) -> Self {
        self.constraints.push(DecimalConstraint::Min {
            value: value.into(),
            message: None,
        });
        self
    }

    /// Requires the decimal to be at most `value` (inclusive).
    pub fn max(mut self, value: impl Into<Decimal>) -> Self {
        self.constraints.push(DecimalConstraint::Max {
            value: value.into(),
            message: None,
        });
        self
    }

    /// Adds a custom predicate with the given code and failure message.
    pub fn predicate(
        mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        test: impl Fn(&Decimal) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicates.push(Predicate::new(code, message, test));
        self
    }

    /// Adds an async predicate. A schema holding one can only be driven
    /// through [`validate_async`](DecimalSchema::validate_async).
    pub fn predicate_async(mut self, pred: impl AsyncPredicate<Decimal> + 'static) -> Self {
        self.predicates_async.push(Arc::new(pred));
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
            .chain(self.predicates_async.iter().map(|p| p.detail()))
            .collect()
    }

    fn coercion_failure(&self, value: &Value) -> Invalid {
        Invalid::new(
            ErrorNode::Coercion {
                compatible: vec![JsonKind::String, JsonKind::Integer],
                dest: "decimal",
            },
            value.clone(),
            "decimal",
        )
    }

    fn typed(&self, value: &Value) -> Result<Decimal, Invalid> {
        match value {
            Value::String(s) => {
                Decimal::from_str(s.trim()).map_err(|_| self.coercion_failure(value))
            }
            Value::Number(n) if !n.is_f64() => match n.as_i64() {
                Some(i) => Ok(Decimal::from(i)),
                None => Err(self.coercion_failure(value)),
            },
            _ => Err(self.coercion_failure(value)),
        }
    }

    fn failing_predicates(&self, d: &Decimal) -> Vec<PredicateErr> {
        let mut failing: Vec<PredicateErr> = self
            .constraints
            .iter()
            .filter(|c| !c.check(d))
            .map(|c| c.detail())
            .collect();
        for pred in &self.predicates {
            if !pred.check(d) {
                failing.push(pred.detail());
            }
        }
        failing
    }

    fn finish(&self, d: Decimal, failing: Vec<PredicateErr>, raw: &Value) -> Validated<Decimal> {
        if failing.is_empty() {
            Validated::Valid(d)
        } else {
            Validated::Invalid(Invalid::new(
                ErrorNode::Predicates(failing),
                raw.clone(),
                "decimal",
            ))
        }
    }

    /// Validates a value against this schema.
    ///
    /// # Panics
    ///
    /// Panics if the schema holds async predicates; use
    /// [`validate_async`](DecimalSchema::validate_async) for those.
    pub fn validate(&self, value: &Value) -> Validated<Decimal> {
        if !self.predicates_async.is_empty() {
            reject_sync_entry("decimal");
        }
        let d = match self.typed(value) {
            Ok(d) => d,
            Err(invalid) => return Validated::Invalid(invalid),
        };
        let failing = self.failing_predicates(&d);
        self.finish(d, failing, value)
    }

    /// Async counterpart of [`validate`](DecimalSchema::validate).
    pub async fn validate_async(&self, value: &Value) -> Validated<Decimal> {
        let d = match self.typed(value) {
            Ok(d) => d,
            Err(invalid) => return Validated::Invalid(invalid),
        };
        let mut failing = self.failing_predicates(&d);
        for pred in &self.predicates_async {
            if !pred.check(&d).await {
                failing.push(pred.detail());
            }
        }
        self.finish(d, failing, value)
    }
}

#[async_trait::async_trait]
impl super::traits::SchemaLike for DecimalSchema {
    type Output = Decimal;

    fn validate(&self, value: &Value) -> Validated<Decimal> {
        DecimalSchema::validate(self, value)
    }

    async fn validate_async(&self, value: &Value) -> Validated<Decimal> {
        DecimalSchema::validate_async(self, value).await
    }

    fn validate_to_value(&self, value: &Value) -> Validated<Value> {
        DecimalSchema::validate(self, value).map(|d| Value::String(d.to_string()))
    }

    async fn validate_to_value_async(&self, value: &Value) -> Validated<Value> {
        DecimalSchema::validate_async(self, value)
            .await
            .map(|d| Value::String(d.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerces_from_string_and_integer() {
        let schema = DecimalSchema::new();
        assert_eq!(
            schema.validate(&json!("3.14")),
            Validated::Valid(Decimal::from_str("3.14").unwrap())
        );
        assert_eq!(
            schema.validate(&json!(42)),
            Validated::Valid(Decimal::from(42))
        );
    }

    #[test]
    fn test_rejects_floats_and_garbage() {
        let schema = DecimalSchema::new();
        for value in [json!(1.5), json!("not a number"), json!(null), json!(true)] {
            let invalid = schema.validate(&value).into_result().unwrap_err();
            assert_eq!(
                invalid.error,
                ErrorNode::Coercion {
                    compatible: vec![JsonKind::String, JsonKind::Integer],
                    dest: "decimal",
                }
            );
        }
    }

    #[test]
    fn test_bounds() {
        let schema = DecimalSchema::new().min(Decimal::ZERO).max(Decimal::from(100));
        assert!(schema.validate(&json!("50.5")).is_valid());
        assert!(schema.validate(&json!("-0.01")).is_invalid());
        assert!(schema.validate(&json!("100.01")).is_invalid());
    }

    #[test]
    fn test_precision_preserved() {
        let schema = DecimalSchema::new();
        let d = schema.validate(&json!("0.1")).valid().unwrap();
        assert_eq!(d.to_string(), "0.1");
    }
}
