//! Date and datetime validation.
//!
//! Both schemas are coercion-based: the input is an ISO-formatted string
//! that is parsed into the corresponding `chrono` type. Anything else,
//! including a malformed string, is a coercion failure.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde_json::Value;

use crate::error::{ErrorNode, Invalid, JsonKind, PredicateErr};
use crate::validated::Validated;

use super::predicate::Predicate;

/// A schema for validating `YYYY-MM-DD` date strings.
///
/// # Example
///
/// ```rust
/// use inquest::Schema;
/// use serde_json::json;
///
/// let schema = Schema::date();
///
/// assert!(schema.validate(&json!("2024-02-29")).is_valid());
/// assert!(schema.validate(&json!("2023-02-29")).is_invalid());
/// assert!(schema.validate(&json!("today")).is_invalid());
/// ```
#[derive(Clone, Default)]
pub struct DateSchema {
    predicates: Vec<Predicate<NaiveDate>>,
}

impl DateSchema {
    /// Creates a new date schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom predicate with the given code and failure message.
    pub fn predicate(
        mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        test: impl Fn(&NaiveDate) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicates.push(Predicate::new(code, message, test));
        self
    }

    /// The details of every declared check, in declaration order.
    pub fn declared_predicates(&self) -> Vec<PredicateErr> {
        self.predicates.iter().map(|p| p.detail()).collect()
    }

    /// Validates a value against this schema.
    pub fn validate(&self, value: &Value) -> Validated<NaiveDate> {
        let parsed = value
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
        let d = match parsed {
            Some(d) => d,
            None => {
                return Validated::Invalid(Invalid::new(
                    ErrorNode::Coercion {
                        compatible: vec![JsonKind::String],
                        dest: "date",
                    },
                    value.clone(),
                    "date",
                ))
            }
        };
        let failing: Vec<PredicateErr> = self
            .predicates
            .iter()
            .filter(|p| !p.check(&d))
            .map(|p| p.detail())
            .collect();
        if failing.is_empty() {
            Validated::Valid(d)
        } else {
            Validated::Invalid(Invalid::new(
                ErrorNode::Predicates(failing),
                value.clone(),
                "date",
            ))
        }
    }
}

#[async_trait::async_trait]
impl super::traits::SchemaLike for DateSchema {
    type Output = NaiveDate;

    fn validate(&self, value: &Value) -> Validated<NaiveDate> {
        DateSchema::validate(self, value)
    }

    fn validate_to_value(&self, value: &Value) -> Validated<Value> {
        DateSchema::validate(self, value).map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
    }
}

/// A schema for validating RFC 3339 datetime strings.
#[derive(Clone, Default)]
pub struct DateTimeSchema {
    predicates: Vec<Predicate<DateTime<FixedOffset>>>,
}

impl DateTimeSchema {
    /// Creates a new datetime schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom predicate with the given code and failure message.
    pub fn predicate(
        mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        test: impl Fn(&DateTime<FixedOffset>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicates.push(Predicate::new(code, message, test));
        self
    }

    /// The details of every declared check, in declaration order.
    pub fn declared_predicates(&self) -> Vec<PredicateErr> {
        self.predicates.iter().map(|p| p.detail()).collect()
    }

    /// Validates a value against this schema.
    pub fn validate(&self, value: &Value) -> Validated<DateTime<FixedOffset>> {
        let parsed = value
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok());
        let dt = match parsed {
            Some(dt) => dt,
            None => {
                return Validated::Invalid(Invalid::new(
                    ErrorNode::Coercion {
                        compatible: vec![JsonKind::String],
                        dest: "datetime",
                    },
                    value.clone(),
                    "datetime",
                ))
            }
        };
        let failing: Vec<PredicateErr> = self
            .predicates
            .iter()
            .filter(|p| !p.check(&dt))
            .map(|p| p.detail())
            .collect();
        if failing.is_empty() {
            Validated::Valid(dt)
        } else {
            Validated::Invalid(Invalid::new(
                ErrorNode::Predicates(failing),
                value.clone(),
                "datetime",
            ))
        }
    }
}

#[async_trait::async_trait]
impl super::traits::SchemaLike for DateTimeSchema {
    type Output = DateTime<FixedOffset>;

    fn validate(&self, value: &Value) -> Validated<DateTime<FixedOffset>> {
        DateTimeSchema::validate(self, value)
    }

    fn validate_to_value(&self, value: &Value) -> Validated<Value> {
        DateTimeSchema::validate(self, value).map(|dt| Value::String(dt.to_rfc3339()))
    }
}
