//! Schema combinators: unions and nullable wrappers.
//!
//! [`UnionSchema`] accepts a value satisfying any one of several declared
//! shapes. This is the one place success short-circuits, since at most one
//! variant can own a value. Failure reporting stays exhaustive: when no variant
//! accepts, every attempt's error is collected in declared order.
//!
//! [`OptionalSchema`] passes `null` through and otherwise delegates to its
//! inner schema, wrapping inner failures in a single-child node.

use serde_json::Value;

use crate::error::{ErrorNode, Invalid};
use crate::validated::Validated;

use super::traits::{SchemaLike, ValueValidator};

/// A schema accepting a value that satisfies at least one of N variants.
///
/// Variants are tried in declared order; the first success wins and its
/// index tags the output, so callers can tell which shape matched.
///
/// # Example
///
/// ```rust
/// use inquest::{ErrorNode, Schema, Validated};
/// use serde_json::json;
///
/// // an id is either a non-empty string or a positive integer
/// let schema = Schema::union()
///     .variant(Schema::string().min_len(1))
///     .variant(Schema::integer().positive());
///
/// assert_eq!(
///     schema.validate(&json!("abc123")),
///     Validated::Valid((0, json!("abc123")))
/// );
/// assert_eq!(schema.validate(&json!(42)), Validated::Valid((1, json!(42))));
///
/// // when nothing matches, every variant's failure is reported
/// match schema.validate(&json!(null)) {
///     Validated::Invalid(invalid) => match invalid.error {
///         ErrorNode::Variants { variants } => assert_eq!(variants.len(), 2),
///         other => panic!("unexpected error: {:?}", other),
///     },
///     Validated::Valid(_) => panic!("expected failure"),
/// }
/// ```
#[derive(Default)]
pub struct UnionSchema {
    variants: Vec<Box<dyn ValueValidator>>,
}

impl UnionSchema {
    /// Creates a new union schema with no variants.
    ///
    /// A union with no variants rejects every value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a variant. Order matters: earlier variants win ties.
    pub fn variant<S: SchemaLike + 'static>(mut self, schema: S) -> Self {
        self.variants.push(Box::new(schema));
        self
    }

    /// The number of declared variants.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Returns true if no variants are declared.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// The variant schemas in declared order, part of the read-only
    /// introspection surface.
    pub fn variant_schemas(&self) -> impl Iterator<Item = &dyn ValueValidator> {
        self.variants.iter().map(|v| v.as_ref())
    }

    fn exhausted(&self, attempts: Vec<Invalid>, raw: &Value) -> Invalid {
        Invalid::new(
            ErrorNode::Variants { variants: attempts },
            raw.clone(),
            "union",
        )
    }

    /// Validates a value, returning the winning variant's index alongside
    /// the validated value.
    pub fn validate(&self, value: &Value) -> Validated<(usize, Value)> {
        let mut attempts = Vec::with_capacity(self.variants.len());
        for (index, variant) in self.variants.iter().enumerate() {
            match variant.validate_value(value) {
                Validated::Valid(v) => return Validated::Valid((index, v)),
                Validated::Invalid(e) => attempts.push(e),
            }
        }
        Validated::Invalid(self.exhausted(attempts, value))
    }

    /// Async counterpart of [`validate`](UnionSchema::validate); variants
    /// are awaited in declared order.
    pub async fn validate_async(&self, value: &Value) -> Validated<(usize, Value)> {
        let mut attempts = Vec::with_capacity(self.variants.len());
        for (index, variant) in self.variants.iter().enumerate() {
            match variant.validate_value_async(value).await {
                Validated::Valid(v) => return Validated::Valid((index, v)),
                Validated::Invalid(e) => attempts.push(e),
            }
        }
        Validated::Invalid(self.exhausted(attempts, value))
    }
}

#[async_trait::async_trait]
impl SchemaLike for UnionSchema {
    type Output = (usize, Value);

    fn validate(&self, value: &Value) -> Validated<(usize, Value)> {
        UnionSchema::validate(self, value)
    }

    async fn validate_async(&self, value: &Value) -> Validated<(usize, Value)> {
        UnionSchema::validate_async(self, value).await
    }

    fn validate_to_value(&self, value: &Value) -> Validated<Value> {
        UnionSchema::validate(self, value).map(|(_, v)| v)
    }

    async fn validate_to_value_async(&self, value: &Value) -> Validated<Value> {
        UnionSchema::validate_async(self, value).await.map(|(_, v)| v)
    }
}

/// A schema that accepts `null` or delegates to an inner schema.
///
/// Inner failures are wrapped in a single-child node so renderers can tell
/// "the wrapped schema rejected the non-null value" apart from the inner
/// schema's own placement in a larger tree.
pub struct OptionalSchema {
    inner: Box<dyn ValueValidator>,
}

impl OptionalSchema {
    /// Creates a nullable wrapper around the given schema.
    pub fn new<S: SchemaLike + 'static>(inner: S) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    /// The wrapped schema, part of the read-only introspection surface.
    pub fn inner_schema(&self) -> &dyn ValueValidator {
        self.inner.as_ref()
    }

    fn wrap(&self, inner: Invalid, raw: &Value) -> Invalid {
        Invalid::new(ErrorNode::Child(Box::new(inner)), raw.clone(), "optional")
    }

    /// Validates a value: `null` passes through unchanged, anything else
    /// must satisfy the inner schema.
    pub fn validate(&self, value: &Value) -> Validated<Value> {
        if value.is_null() {
            return Validated::Valid(Value::Null);
        }
        match self.inner.validate_value(value) {
            Validated::Valid(v) => Validated::Valid(v),
            Validated::Invalid(e) => Validated::Invalid(self.wrap(e, value)),
        }
    }

    /// Async counterpart of [`validate`](OptionalSchema::validate).
    pub async fn validate_async(&self, value: &Value) -> Validated<Value> {
        if value.is_null() {
            return Validated::Valid(Value::Null);
        }
        match self.inner.validate_value_async(value).await {
            Validated::Valid(v) => Validated::Valid(v),
            Validated::Invalid(e) => Validated::Invalid(self.wrap(e, value)),
        }
    }
}

#[async_trait::async_trait]
impl SchemaLike for OptionalSchema {
    type Output = Value;

    fn validate(&self, value: &Value) -> Validated<Value> {
        OptionalSchema::validate(self, value)
    }

    async fn validate_async(&self, value: &Value) -> Validated<Value> {
        OptionalSchema::validate_async(self, value).await
    }

    fn validate_to_value(&self, value: &Value) -> Validated<Value> {
        OptionalSchema::validate(self, value)
    }

    async fn validate_to_value_async(&self, value: &Value) -> Validated<Value> {
        OptionalSchema::validate_async(self, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{IntegerSchema, ObjectSchema, StringSchema};
    use serde_json::json;

    fn unwrap_invalid<T: std::fmt::Debug>(v: Validated<T>) -> Invalid {
        v.into_result().unwrap_err()
    }

    #[test]
    fn test_first_match_wins() {
        // both variants accept an unconstrained string; the first owns it
        let schema = UnionSchema::new()
            .variant(StringSchema::new())
            .variant(StringSchema::new().min_len(1));
        assert_eq!(
            schema.validate(&json!("x")),
            Validated::Valid((0, json!("x")))
        );
    }

    #[test]
    fn test_later_variant_matches() {
        let schema = UnionSchema::new()
            .variant(StringSchema::new())
            .variant(IntegerSchema::new());
        assert_eq!(schema.validate(&json!(7)), Validated::Valid((1, json!(7))));
    }

    #[test]
    fn test_all_variants_fail_exhaustively() {
        let schema = UnionSchema::new()
            .variant(StringSchema::new())
            .variant(IntegerSchema::new());
        let invalid = unwrap_invalid(schema.validate(&json!(true)));
        match &invalid.error {
            ErrorNode::Variants { variants } => {
                assert_eq!(variants.len(), 2);
                // attempt order matches declaration order
                assert_eq!(variants[0].schema, "string");
                assert_eq!(variants[1].schema, "integer");
            }
            other => panic!("expected Variants, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_union_rejects_everything() {
        let schema = UnionSchema::new();
        let invalid = unwrap_invalid(schema.validate(&json!("anything")));
        assert_eq!(invalid.error, ErrorNode::Variants { variants: vec![] });
    }

    #[test]
    fn test_union_of_records() {
        let circle = ObjectSchema::new()
            .field("kind", StringSchema::new())
            .field("radius", IntegerSchema::new().positive());
        let rect = ObjectSchema::new()
            .field("kind", StringSchema::new())
            .field("width", IntegerSchema::new().positive())
            .field("height", IntegerSchema::new().positive());

        let schema = UnionSchema::new().variant(circle).variant(rect);

        let result = schema.validate(&json!({"kind": "circle", "radius": 3}));
        assert_eq!(result.clone().valid().map(|(i, _)| i), Some(0));

        let result = schema.validate(&json!({"kind": "rect", "width": 2, "height": 3}));
        assert_eq!(result.valid().map(|(i, _)| i), Some(1));
    }

    #[test]
    fn test_optional_passes_null() {
        let schema = OptionalSchema::new(StringSchema::new());
        assert_eq!(schema.validate(&json!(null)), Validated::Valid(Value::Null));
    }

    #[test]
    fn test_optional_delegates_non_null() {
        let schema = OptionalSchema::new(StringSchema::new().min_len(2));
        assert_eq!(
            schema.validate(&json!("ok")),
            Validated::Valid(json!("ok"))
        );
    }

    #[test]
    fn test_optional_wraps_inner_failure() {
        let schema = OptionalSchema::new(StringSchema::new());
        let invalid = unwrap_invalid(schema.validate(&json!(42)));
        match invalid.error {
            ErrorNode::Child(child) => {
                assert_eq!(child.schema, "string");
            }
            other => panic!("expected Child, got {:?}", other),
        }
    }
}
