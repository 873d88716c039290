//! Unique-collection validation.
//!
//! Decoded JSON has no set kind, so [`SetSchema`] accepts an array whose
//! members must be distinct. Member failures are positionless, since a set
//! has no meaningful indices; each failing member's error carries the
//! offending raw value for identification.

use serde_json::Value;

use crate::error::{ErrorNode, Invalid, JsonKind, PredicateErr};
use crate::validated::Validated;

use super::array::find_duplicates;
use super::predicate::Predicate;
use super::traits::{SchemaLike, ValueValidator};

/// A constraint applied to the collection as a whole.
#[derive(Clone)]
enum SetConstraint {
    MinSize { min: usize, message: Option<String> },
    MaxSize { max: usize, message: Option<String> },
}

impl SetConstraint {
    fn check(&self, items: &[Value]) -> bool {
        match self {
            SetConstraint::MinSize { min, .. } => items.len() >= *min,
            SetConstraint::MaxSize { max, .. } => items.len() <= *max,
        }
    }

    fn detail(&self) -> PredicateErr {
        match self {
            SetConstraint::MinSize { min, message } => PredicateErr::new(
                "min_size",
                message
                    .clone()
                    .unwrap_or_else(|| format!("minimum allowed size is {}", min)),
            ),
            SetConstraint::MaxSize { max, message } => PredicateErr::new(
                "max_size",
                message
                    .clone()
                    .unwrap_or_else(|| format!("maximum allowed size is {}", max)),
            ),
        }
    }

    fn set_message(&mut self, msg: String) {
        match self {
            SetConstraint::MinSize { message, .. } | SetConstraint::MaxSize { message, .. } => {
                *message = Some(msg)
            }
        }
    }
}

/// A schema for validating arrays treated as sets of distinct members.
///
/// Uniqueness is implicit: duplicated members fail the collection. Output
/// preserves the input's member order.
pub struct SetSchema {
    item_schema: Box<dyn ValueValidator>,
    constraints: Vec<SetConstraint>,
    predicates: Vec<Predicate<[Value]>>,
}

impl SetSchema {
    /// Creates a new set schema with the given member schema.
    pub fn new<S: SchemaLike + 'static>(item_schema: S) -> Self {
        Self {
            item_schema: Box::new(item_schema),
            constraints: Vec::new(),
            predicates: Vec::new(),
        }
    }

    /// Requires at least `min` members.
    pub fn min_size(mut self, min: usize) -> Self {
        self.constraints
            .push(SetConstraint::MinSize { min, message: None });
        self
    }

    /// Requires at most `max` members.
    pub fn max_size(mut self, max: usize) -> Self {
        self.constraints
            .push(SetConstraint::MaxSize { max, message: None });
        self
    }

    /// Adds a custom collection-level predicate.
    pub fn predicate(
        mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        test: impl Fn(&[Value]) -> bool + Send + Sync + 'static,
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

    /// The member schema, part of the read-only introspection surface.
    pub fn item_schema(&self) -> &dyn ValueValidator {
        self.item_schema.as_ref()
    }

    /// The details of every declared collection-level check, including the
    /// implicit uniqueness requirement.
    pub fn declared_predicates(&self) -> Vec<PredicateErr> {
        std::iter::once(Self::unique_detail())
            .chain(self.constraints.iter().map(|c| c.detail()))
            .chain(self.predicates.iter().map(|p| p.detail()))
            .collect()
    }

    fn unique_detail() -> PredicateErr {
        PredicateErr::new("unique", "all members must be distinct")
    }

    fn shape<'v>(&self, value: &'v Value) -> Result<&'v Vec<Value>, Invalid> {
        value.as_array().ok_or_else(|| {
            Invalid::new(
                ErrorNode::Type {
                    expected: JsonKind::Array,
                },
                value.clone(),
                "set",
            )
        })
    }

    fn failing_set_predicates(&self, items: &[Value]) -> Vec<PredicateErr> {
        let mut failing = Vec::new();
        if find_duplicates(items, |v| v.clone())
            .values()
            .any(|ix| ix.len() > 1)
        {
            failing.push(Self::unique_detail());
        }
        for constraint in &self.constraints {
            if !constraint.check(items) {
                failing.push(constraint.detail());
            }
        }
        for pred in &self.predicates {
            if !pred.check(items) {
                failing.push(pred.detail());
            }
        }
        failing
    }

    fn assemble(
        &self,
        predicates: Vec<PredicateErr>,
        members: Vec<Invalid>,
        validated: Vec<Value>,
        raw: &Value,
    ) -> Validated<Vec<Value>> {
        if predicates.is_empty() && members.is_empty() {
            Validated::Valid(validated)
        } else {
            Validated::Invalid(Invalid::new(
                ErrorNode::Members { predicates, members },
                raw.clone(),
                "set",
            ))
        }
    }

    /// Validates a value against this schema.
    ///
    /// Collection-level failures (duplicates, size) and member failures
    /// are reported together; every member is visited.
    pub fn validate(&self, value: &Value) -> Validated<Vec<Value>> {
        let items = match self.shape(value) {
            Ok(items) => items,
            Err(invalid) => return Validated::Invalid(invalid),
        };
        let failing = self.failing_set_predicates(items);

        let mut members = Vec::new();
        let mut validated = Vec::with_capacity(items.len());
        for item in items {
            match self.item_schema.validate_value(item) {
                Validated::Valid(v) => validated.push(v),
                Validated::Invalid(e) => members.push(e),
            }
        }
        self.assemble(failing, members, validated, value)
    }

    /// Async counterpart of [`validate`](SetSchema::validate).
    pub async fn validate_async(&self, value: &Value) -> Validated<Vec<Value>> {
        let items = match self.shape(value) {
            Ok(items) => items,
            Err(invalid) => return Validated::Invalid(invalid),
        };
        let failing = self.failing_set_predicates(items);

        let mut members = Vec::new();
        let mut validated = Vec::with_capacity(items.len());
        for item in items {
            match self.item_schema.validate_value_async(item).await {
                Validated::Valid(v) => validated.push(v),
                Validated::Invalid(e) => members.push(e),
            }
        }
        self.assemble(failing, members, validated, value)
    }
}

#[async_trait::async_trait]
impl SchemaLike for SetSchema {
    type Output = Vec<Value>;

    fn validate(&self, value: &Value) -> Validated<Vec<Value>> {
        SetSchema::validate(self, value)
    }

    async fn validate_async(&self, value: &Value) -> Validated<Vec<Value>> {
        SetSchema::validate_async(self, value).await
    }

    fn validate_to_value(&self, value: &Value) -> Validated<Value> {
        SetSchema::validate(self, value).map(Value::Array)
    }

    async fn validate_to_value_async(&self, value: &Value) -> Validated<Value> {
        SetSchema::validate_async(self, value).await.map(Value::Array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{IntegerSchema, StringSchema};
    use serde_json::json;

    fn unwrap_invalid<T: std::fmt::Debug>(v: Validated<T>) -> Invalid {
        v.into_result().unwrap_err()
    }

    #[test]
    fn test_accepts_distinct_members() {
        let schema = SetSchema::new(StringSchema::new());
        assert_eq!(
            schema.validate(&json!(["a", "b", "c"])),
            Validated::Valid(vec![json!("a"), json!("b"), json!("c")])
        );
    }

    #[test]
    fn test_duplicates_fail() {
        let schema = SetSchema::new(StringSchema::new());
        let invalid = unwrap_invalid(schema.validate(&json!(["a", "b", "a"])));
        match &invalid.error {
            ErrorNode::Members { predicates, members } => {
                assert_eq!(predicates[0].code, "unique");
                assert!(members.is_empty());
            }
            other => panic!("expected Members, got {:?}", other),
        }
    }

    #[test]
    fn test_member_failures_carry_raw_values() {
        let schema = SetSchema::new(IntegerSchema::new());
        let invalid = unwrap_invalid(schema.validate(&json!([1, "x", 3])));
        match &invalid.error {
            ErrorNode::Members { members, .. } => {
                assert_eq!(members.len(), 1);
                assert_eq!(members[0].value, json!("x"));
            }
            other => panic!("expected Members, got {:?}", other),
        }
    }

    #[test]
    fn test_size_and_member_failures_coexist() {
        let schema = SetSchema::new(IntegerSchema::new()).min_size(3);
        let invalid = unwrap_invalid(schema.validate(&json!([1, "x"])));
        match &invalid.error {
            ErrorNode::Members { predicates, members } => {
                assert_eq!(predicates[0].code, "min_size");
                assert_eq!(members.len(), 1);
            }
            other => panic!("expected Members, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_array() {
        let schema = SetSchema::new(StringSchema::new());
        let invalid = unwrap_invalid(schema.validate(&json!({"a": 1})));
        assert_eq!(
            invalid.error,
            ErrorNode::Type {
                expected: JsonKind::Array
            }
        );
    }
}
