//! Deferred schema construction for recursive definitions.
//!
//! A schema cannot contain itself directly, or construction would never
//! terminate. [`LazySchema`] wraps a supplier function instead, invoking
//! it only when a value is actually validated, so self- and mutually-
//! recursive schemas are ordinary functions that refer to each other.

use std::sync::Arc;

use serde_json::Value;

use crate::validated::Validated;

use super::traits::{SchemaLike, ValueValidator};

/// A schema resolved from a supplier at validation time.
///
/// Recursion terminates because the supplier is only invoked as deep as
/// the data actually nests.
///
/// # Example
///
/// ```rust
/// use inquest::{ObjectSchema, Schema};
/// use serde_json::json;
///
/// // a tree node: an id plus any number of child nodes
/// fn node_schema() -> ObjectSchema {
///     Schema::object()
///         .field("id", Schema::integer())
///         .field("children", Schema::array(Schema::lazy(node_schema)))
/// }
///
/// let schema = node_schema();
/// let result = schema.validate(&json!({
///     "id": 1,
///     "children": [
///         {"id": 2, "children": []},
///         {"id": 3, "children": [{"id": 4, "children": []}]}
///     ]
/// }));
/// assert!(result.is_valid());
/// ```
pub struct LazySchema {
    supplier: Arc<dyn Fn() -> Box<dyn ValueValidator> + Send + Sync>,
    recurrent: bool,
}

impl LazySchema {
    /// Creates a lazy schema from a supplier of the real schema.
    ///
    /// The `recurrent` flag defaults to true, since a deferral is usually
    /// part of a cycle. Use [`forward_only`](LazySchema::forward_only) when the
    /// deferral is a mere forward reference, so introspection consumers
    /// know no cycle is present.
    pub fn new<S, F>(supplier: F) -> Self
    where
        S: SchemaLike + 'static,
        F: Fn() -> S + Send + Sync + 'static,
    {
        Self {
            supplier: Arc::new(move || Box::new(supplier())),
            recurrent: true,
        }
    }

    /// Marks this deferral as a forward reference rather than a cycle.
    pub fn forward_only(mut self) -> Self {
        self.recurrent = false;
        self
    }

    /// Returns true if this deferral participates in a cycle.
    ///
    /// Part of the read-only introspection surface: consumers emitting a
    /// reference-style representation need to know whether inlining the
    /// resolved schema would recurse forever.
    pub fn is_recurrent(&self) -> bool {
        self.recurrent
    }

    /// Resolves the underlying schema by invoking the supplier.
    pub fn resolve(&self) -> Box<dyn ValueValidator> {
        (self.supplier)()
    }

    /// Validates a value by resolving the supplier and delegating.
    pub fn validate(&self, value: &Value) -> Validated<Value> {
        self.resolve().validate_value(value)
    }

    /// Async counterpart of [`validate`](LazySchema::validate).
    pub async fn validate_async(&self, value: &Value) -> Validated<Value> {
        self.resolve().validate_value_async(value).await
    }
}

impl Clone for LazySchema {
    fn clone(&self) -> Self {
        Self {
            supplier: Arc::clone(&self.supplier),
            recurrent: self.recurrent,
        }
    }
}

#[async_trait::async_trait]
impl SchemaLike for LazySchema {
    type Output = Value;

    fn validate(&self, value: &Value) -> Validated<Value> {
        LazySchema::validate(self, value)
    }

    async fn validate_async(&self, value: &Value) -> Validated<Value> {
        LazySchema::validate_async(self, value).await
    }

    fn validate_to_value(&self, value: &Value) -> Validated<Value> {
        LazySchema::validate(self, value)
    }

    async fn validate_to_value_async(&self, value: &Value) -> Validated<Value> {
        LazySchema::validate_async(self, value).await
    }
}
