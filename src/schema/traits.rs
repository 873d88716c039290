//! Traits for schema polymorphism.
//!
//! [`SchemaLike`] is the capability every schema implements: validate a
//! raw value, synchronously or asynchronously, into a typed outcome.
//! [`ValueValidator`] is its type-erased form, used wherever schemas of
//! different output types are composed (record fields, list items, union
//! variants).

use async_trait::async_trait;
use serde_json::Value;

use crate::validated::Validated;

/// A schema that can validate JSON values into a typed output.
///
/// Schemas are immutable once constructed: validation never touches
/// per-call mutable state on the schema, so a single instance can be shared
/// across threads and tasks and validated against concurrently without
/// locking.
///
/// The synchronous and asynchronous entry points have identical
/// success/failure semantics. The async path exists so predicates and
/// nested schemas may suspend (e.g. for I/O-backed checks); schemas without
/// async components inherit defaults that simply delegate to the sync path.
///
/// # Panics
///
/// Schemas configured with async-only checks panic when driven through
/// [`validate`](SchemaLike::validate): silently skipping a declared check
/// is never acceptable, and the mismatch is a programming error rather than
/// a property of the input.
#[async_trait]
pub trait SchemaLike: Send + Sync {
    /// The typed value produced by successful validation.
    type Output: Send;

    /// Validates a value against this schema.
    fn validate(&self, value: &Value) -> Validated<Self::Output>;

    /// Validates a value, suspending at async predicate and child-schema
    /// boundaries. Semantics are identical to [`validate`](SchemaLike::validate).
    async fn validate_async(&self, value: &Value) -> Validated<Self::Output> {
        self.validate(value)
    }

    /// Validates a value and returns the result as a `serde_json::Value`.
    ///
    /// This lets schemas with different output types be used uniformly as
    /// children of container schemas.
    fn validate_to_value(&self, value: &Value) -> Validated<Value>;

    /// Async counterpart of [`validate_to_value`](SchemaLike::validate_to_value).
    async fn validate_to_value_async(&self, value: &Value) -> Validated<Value> {
        self.validate_to_value(value)
    }
}

/// A type-erased schema producing `serde_json::Value` output.
///
/// Every [`SchemaLike`] automatically implements this trait, so any schema
/// can be boxed into a heterogeneous collection:
///
/// ```rust
/// use inquest::{Schema, ValueValidator};
///
/// let validators: Vec<Box<dyn ValueValidator>> = vec![
///     Box::new(Schema::string().min_len(1)),
///     Box::new(Schema::integer().positive()),
/// ];
/// ```
#[async_trait]
pub trait ValueValidator: Send + Sync {
    /// Validates a value, returning the result as a `serde_json::Value`.
    fn validate_value(&self, value: &Value) -> Validated<Value>;

    /// Async counterpart of [`validate_value`](ValueValidator::validate_value).
    async fn validate_value_async(&self, value: &Value) -> Validated<Value>;
}

#[async_trait]
impl<S: SchemaLike> ValueValidator for S {
    fn validate_value(&self, value: &Value) -> Validated<Value> {
        self.validate_to_value(value)
    }

    async fn validate_value_async(&self, value: &Value) -> Validated<Value> {
        self.validate_to_value_async(value).await
    }
}
