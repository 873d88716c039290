//! Numeric schema validation.
//!
//! [`IntegerSchema`] and [`FloatSchema`] require an exact numeric kind:
//! an integer schema rejects `1.5` and a float schema rejects `1`. With
//! coercion enabled, numeric strings (and, for floats, integers) are
//! converted before constraints run.

use std::ops::RangeInclusive;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{ErrorNode, Invalid, JsonKind, PredicateErr};
use crate::validated::Validated;

use super::predicate::{reject_sync_entry, AsyncPredicate, Predicate};

/// A constraint applied to integer values.
#[derive(Clone)]
enum IntegerConstraint {
    Min { value: i64, message: Option<String> },
    Max { value: i64, message: Option<String> },
    Positive { message: Option<String> },
    NonNegative { message: Option<String> },
    Negative { message: Option<String> },
    MultipleOf { factor: i64, message: Option<String> },
}

impl IntegerConstraint {
    fn check(&self, n: i64) -> bool {
        match self {
            IntegerConstraint::Min { value, .. } => n >= *value,
            IntegerConstraint::Max { value, .. } => n <= *value,
            IntegerConstraint::Positive { .. } => n > 0,
            IntegerConstraint::NonNegative { .. } => n >= 0,
            IntegerConstraint::Negative { .. } => n < 0,
            IntegerConstraint::MultipleOf { factor, .. } => {
                if *factor == 0 {
                    n == 0
                } else {
                    n % factor == 0
                }
            }
        }
    }

    fn detail(&self) -> PredicateErr {
        match self {
            IntegerConstraint::Min { value, message } => PredicateErr::new(
                "min_value",
                message
                    .clone()
                    .unwrap_or_else(|| format!("minimum allowed value is {}", value)),
            ),
            IntegerConstraint::Max { value, message } => PredicateErr::new(
                "max_value",
                message
                    .clone()
                    .unwrap_or_else(|| format!("maximum allowed value is {}", value)),
            ),
            IntegerConstraint::Positive { message } => PredicateErr::new(
                "positive",
                message
                    .clone()
                    .unwrap_or_else(|| "must be greater than 0".to_string()),
            ),
            IntegerConstraint::NonNegative { message } => PredicateErr::new(
                "non_negative",
                message
                    .clone()
                    .unwrap_or_else(|| "must be 0 or greater".to_string()),
            ),
            IntegerConstraint::Negative { message } => PredicateErr::new(
                "negative",
                message
                    .clone()
                    .unwrap_or_else(|| "must be less than 0".to_string()),
            ),
            IntegerConstraint::MultipleOf { factor, message } => PredicateErr::new(
                "multiple_of",
                message
                    .clone()
                    .unwrap_or_else(|| format!("expected multiple of {}", factor)),
            ),
        }
    }

    fn set_message(&mut self, msg: String) {
        match self {
            IntegerConstraint::Min { message, .. }
            | IntegerConstraint::Max { message, .. }
            | IntegerConstraint::Positive { message }
            | IntegerConstraint::NonNegative { message }
            | IntegerConstraint::Negative { message }
            | IntegerConstraint::MultipleOf { message, .. } => *message = Some(msg),
        }
    }
}

/// A schema for validating integer values.
///
/// The runtime check is exact: floats are rejected even when they carry an
/// integral value, and booleans are a distinct kind entirely. With
/// [`coerce`](IntegerSchema::coerce) enabled, numeric strings are parsed.
///
/// # Example
///
/// ```rust
/// use inquest::Schema;
/// use serde_json::json;
///
/// let schema = Schema::integer().min(0).max(100);
///
/// assert!(schema.validate(&json!(50)).is_valid());
/// assert!(schema.validate(&json!(-5)).is_invalid());
/// assert!(schema.validate(&json!(1.5)).is_invalid());
/// ```
#[derive(Clone, Default)]
pub struct IntegerSchema {
    constraints: Vec<IntegerConstraint>,
    predicates: Vec<Predicate<i64>>,
    predicates_async: Vec<Arc<dyn AsyncPredicate<i64>>>,
    coerce: bool,
}

impl IntegerSchema {
    /// Creates a new integer schema with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the integer to be at least `value` (inclusive).
    pub fn min(mut self, value: i64) -> Self {
        self.constraints.push(IntegerConstraint::Min {
            value,
            message: None,
        });
        self
    }

    /// Requires the integer to be at most `value` (inclusive).
    pub fn max(mut self, value: i64) -> Self {
        self.constraints.push(IntegerConstraint::Max {
            value,
            message: None,
        });
        self
    }

    /// Requires the integer to fall within an inclusive range.
    pub fn range(self, range: RangeInclusive<i64>) -> Self {
        self.min(*range.start()).max(*range.end())
    }

    /// Requires the integer to be greater than 0.
    pub fn positive(mut self) -> Self {
        self.constraints
            .push(IntegerConstraint::Positive { message: None });
        self
    }

    /// Requires the integer to be 0 or greater.
    pub fn non_negative(mut self) -> Self {
        self.constraints
            .push(IntegerConstraint::NonNegative { message: None });
        self
    }

    /// Requires the integer to be less than 0.
    pub fn negative(mut self) -> Self {
        self.constraints
            .push(IntegerConstraint::Negative { message: None });
        self
    }

    /// Requires the integer to be a multiple of `factor`.
    pub fn multiple_of(mut self, factor: i64) -> Self {
        self.constraints.push(IntegerConstraint::MultipleOf {
            factor,
            message: None,
        });
        self
    }

    /// Also accepts numeric strings, parsing them before constraints run.
    pub fn coerce(mut self) -> Self {
        self.coerce = true;
        self
    }

    /// Adds a custom predicate with the given code and failure message.
    pub fn predicate(
        mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        test: impl Fn(&i64) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicates.push(Predicate::new(code, message, test));
        self
    }

    /// Adds an async predicate. A schema holding one can only be driven
    /// through [`validate_async`](IntegerSchema::validate_async).
    pub fn predicate_async(mut self, pred: impl AsyncPredicate<i64> + 'static) -> Self {
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

    fn typed(&self, value: &Value) -> Result<i64, Invalid> {
        if let Some(n) = value.as_i64() {
            return Ok(n);
        }
        match value {
            // An integral number that does not fit i64 (a large u64): the
            // kind is compatible but the conversion is not representable.
            Value::Number(n) if !n.is_f64() => Err(Invalid::new(
                ErrorNode::Coercion {
                    compatible: vec![JsonKind::Integer],
                    dest: "integer",
                },
                value.clone(),
                "integer",
            )),
            Value::String(s) if self.coerce => {
                s.trim().parse::<i64>().map_err(|_| {
                    Invalid::new(
                        ErrorNode::Coercion {
                            compatible: vec![JsonKind::Integer, JsonKind::String],
                            dest: "integer",
                        },
                        value.clone(),
                        "integer",
                    )
                })
            }
            _ => Err(Invalid::new(
                ErrorNode::Type {
                    expected: JsonKind::Integer,
                },
                value.clone(),
                "integer",
            )),
        }
    }

    fn failing_predicates(&self, n: i64) -> Vec<PredicateErr> {
        let mut failing: Vec<PredicateErr> = self
            .constraints
            .iter()
            .filter(|c| !c.check(n))
            .map(|c| c.detail())
            .collect();
        for pred in &self.predicates {
            if !pred.check(&n) {
                failing.push(pred.detail());
            }
        }
        failing
    }

    fn finish(&self, n: i64, failing: Vec<PredicateErr>, raw: &Value) -> Validated<i64> {
        if failing.is_empty() {
            Validated::Valid(n)
        } else {
            Validated::Invalid(Invalid::new(
                ErrorNode::Predicates(failing),
                raw.clone(),
                "integer",
            ))
        }
    }

    /// Validates a value against this schema.
    ///
    /// # Panics
    ///
    /// Panics if the schema holds async predicates; use
    /// [`validate_async`](IntegerSchema::validate_async) for those.
    pub fn validate(&self, value: &Value) -> Validated<i64> {
        if !self.predicates_async.is_empty() {
            reject_sync_entry("integer");
        }
        let n = match self.typed(value) {
            Ok(n) => n,
            Err(invalid) => return Validated::Invalid(invalid),
        };
        let failing = self.failing_predicates(n);
        self.finish(n, failing, value)
    }

    /// Async counterpart of [`validate`](IntegerSchema::validate).
    pub async fn validate_async(&self, value: &Value) -> Validated<i64> {
        let n = match self.typed(value) {
            Ok(n) => n,
            Err(invalid) => return Validated::Invalid(invalid),
        };
        let mut failing = self.failing_predicates(n);
        for pred in &self.predicates_async {
            if !pred.check(&n).await {
                failing.push(pred.detail());
            }
        }
        self.finish(n, failing, value)
    }
}

#[async_trait::async_trait]
impl super::traits::SchemaLike for IntegerSchema {
    type Output = i64;

    fn validate(&self, value: &Value) -> Validated<i64> {
        IntegerSchema::validate(self, value)
    }

    async fn validate_async(&self, value: &Value) -> Validated<i64> {
        IntegerSchema::validate_async(self, value).await
    }

    fn validate_to_value(&self, value: &Value) -> Validated<Value> {
        IntegerSchema::validate(self, value).map(Value::from)
    }

    async fn validate_to_value_async(&self, value: &Value) -> Validated<Value> {
        IntegerSchema::validate_async(self, value).await.map(Value::from)
    }
}

/// A constraint applied to float values.
#[derive(Clone)]
enum FloatConstraint {
    Min { value: f64, message: Option<String> },
    Max { value: f64, message: Option<String> },
}

impl FloatConstraint {
    fn check(&self, n: f64) -> bool {
        match self {
            FloatConstraint::Min { value, .. } => n >= *value,
            FloatConstraint::Max { value, .. } => n <= *value,
        }
    }

    fn detail(&self) -> PredicateErr {
        match self {
            FloatConstraint::Min { value, message } => PredicateErr::new(
                "min_value",
                message
                    .clone()
                    .unwrap_or_else(|| format!("minimum allowed value is {}", value)),
            ),
            FloatConstraint::Max { value, message } => PredicateErr::new(
                "max_value",
                message
                    .clone()
                    .unwrap_or_else(|| format!("maximum allowed value is {}", value)),
            ),
        }
    }

    fn set_message(&mut self, msg: String) {
        match self {
            FloatConstraint::Min { message, .. } | FloatConstraint::Max { message, .. } => {
                *message = Some(msg)
            }
        }
    }
}

/// A schema for validating float values.
///
/// The runtime check is exact: integers are rejected unless
/// [`coerce`](FloatSchema::coerce) is enabled, which also accepts numeric
/// strings.
#[derive(Clone, Default)]
pub struct FloatSchema {
    constraints: Vec<FloatConstraint>,
    predicates: Vec<Predicate<f64>>,
    coerce: bool,
}

impl FloatSchema {
    /// Creates a new float schema with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the float to be at least `value` (inclusive).
    pub fn min(mut self, value: f64) -> Self {
        self.constraints.push(FloatConstraint::Min {
            value,
            message: None,
        });
        self
    }

    /// Requires the float to be at most `value` (inclusive).
    pub fn max(mut self, value: f64) -> Self {
        self.constraints.push(FloatConstraint::Max {
            value,
            message: None,
        });
        self
    }

    /// Also accepts integers and numeric strings, converting them before
    /// constraints run.
    pub fn coerce(mut self) -> Self {
        self.coerce = true;
        self
    }

    /// Adds a custom predicate with the given code and failure message.
    pub fn predicate(
        mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        test: impl Fn(&f64) -> bool + Send + Sync + 'static,
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

    fn typed(&self, value: &Value) -> Result<f64, Invalid> {
        match value {
            Value::Number(n) if n.is_f64() => Ok(n.as_f64().unwrap_or_default()),
            Value::Number(n) if self.coerce => {
                n.as_f64().ok_or_else(|| {
                    Invalid::new(
                        ErrorNode::Coercion {
                            compatible: vec![JsonKind::Float, JsonKind::Integer, JsonKind::String],
                            dest: "float",
                        },
                        value.clone(),
                        "float",
                    )
                })
            }
            Value::String(s) if self.coerce => {
                s.trim().parse::<f64>().map_err(|_| {
                    Invalid::new(
                        ErrorNode::Coercion {
                            compatible: vec![JsonKind::Float, JsonKind::Integer, JsonKind::String],
                            dest: "float",
                        },
                        value.clone(),
                        "float",
                    )
                })
            }
            _ => Err(Invalid::new(
                ErrorNode::Type {
                    expected: JsonKind::Float,
                },
                value.clone(),
                "float",
            )),
        }
    }

    /// Validates a value against this schema.
    pub fn validate(&self, value: &Value) -> Validated<f64> {
        let n = match self.typed(value) {
            Ok(n) => n,
            Err(invalid) => return Validated::Invalid(invalid),
        };
        let mut failing: Vec<PredicateErr> = self
            .constraints
            .iter()
            .filter(|c| !c.check(n))
            .map(|c| c.detail())
            .collect();
        for pred in &self.predicates {
            if !pred.check(&n) {
                failing.push(pred.detail());
            }
        }
        if failing.is_empty() {
            Validated::Valid(n)
        } else {
            Validated::Invalid(Invalid::new(
                ErrorNode::Predicates(failing),
                value.clone(),
                "float",
            ))
        }
    }
}

#[async_trait::async_trait]
impl super::traits::SchemaLike for FloatSchema {
    type Output = f64;

    fn validate(&self, value: &Value) -> Validated<f64> {
        FloatSchema::validate(self, value)
    }

    fn validate_to_value(&self, value: &Value) -> Validated<Value> {
        FloatSchema::validate(self, value).map(Value::from)
    }
}
