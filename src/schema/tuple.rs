//! Fixed-arity sequence validation.
//!
//! [`TupleSchema`] validates sequences of an exact length where every
//! position has its own, independently-typed schema. This differs from
//! [`ArraySchema`](super::ArraySchema), which applies one schema to every
//! item.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{ErrorNode, Invalid, JsonKind};
use crate::validated::Validated;

use super::predicate::{reject_sync_entry, AsyncCheck};
use super::traits::{SchemaLike, ValueValidator};

/// A whole-tuple check run after every slot has validated.
type TupleCheck = Box<dyn Fn(Vec<Value>) -> Validated<Vec<Value>> + Send + Sync>;

/// A schema for validating heterogeneous sequences of exact length.
///
/// # Example
///
/// ```rust
/// use inquest::{ErrorNode, Schema, Validated};
/// use serde_json::json;
///
/// // (name, age) pairs
/// let schema = Schema::tuple()
///     .slot(Schema::string().min_len(1))
///     .slot(Schema::integer().non_negative());
///
/// assert!(schema.validate(&json!(["Alice", 30])).is_valid());
///
/// // wrong arity fails without validating any slot
/// match schema.validate(&json!(["Alice"])) {
///     Validated::Invalid(invalid) => {
///         assert_eq!(invalid.error, ErrorNode::Arity { expected: 2, actual: 1 });
///     }
///     Validated::Valid(_) => panic!("expected failure"),
/// }
/// ```
#[derive(Default)]
pub struct TupleSchema {
    slots: Vec<Box<dyn ValueValidator>>,
    check: Option<TupleCheck>,
    check_async: Option<Box<dyn AsyncCheck<Vec<Value>>>>,
}

impl TupleSchema {
    /// Creates a new tuple schema with no slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional slot with its own schema.
    pub fn slot<S: SchemaLike + 'static>(mut self, schema: S) -> Self {
        self.slots.push(Box::new(schema));
        self
    }

    /// Sets a whole-tuple check, run only after every slot has passed.
    ///
    /// # Panics
    ///
    /// Panics if an async check is already configured.
    pub fn check(
        mut self,
        f: impl Fn(Vec<Value>) -> Validated<Vec<Value>> + Send + Sync + 'static,
    ) -> Self {
        assert!(
            self.check_async.is_none(),
            "tuple schema cannot have both check and check_async"
        );
        self.check = Some(Box::new(f));
        self
    }

    /// Sets an async whole-tuple check. A schema holding one can only be
    /// driven through [`validate_async`](TupleSchema::validate_async).
    ///
    /// # Panics
    ///
    /// Panics if a synchronous check is already configured.
    pub fn check_async(mut self, c: impl AsyncCheck<Vec<Value>> + 'static) -> Self {
        assert!(
            self.check.is_none(),
            "tuple schema cannot have both check and check_async"
        );
        self.check_async = Some(Box::new(c));
        self
    }

    /// The number of declared slots.
    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    /// The slot schemas in positional order, part of the read-only
    /// introspection surface.
    pub fn slot_schemas(&self) -> impl Iterator<Item = &dyn ValueValidator> {
        self.slots.iter().map(|s| s.as_ref())
    }

    fn shape<'v>(&self, value: &'v Value) -> Result<&'v Vec<Value>, Invalid> {
        let items = value.as_array().ok_or_else(|| {
            Invalid::new(
                ErrorNode::Type {
                    expected: JsonKind::Array,
                },
                value.clone(),
                "tuple",
            )
        })?;
        if items.len() != self.slots.len() {
            return Err(Invalid::new(
                ErrorNode::Arity {
                    expected: self.slots.len(),
                    actual: items.len(),
                },
                value.clone(),
                "tuple",
            ));
        }
        Ok(items)
    }

    fn assemble(
        &self,
        indexes: BTreeMap<usize, Invalid>,
        validated: Vec<Value>,
        raw: &Value,
    ) -> Result<Vec<Value>, Invalid> {
        if indexes.is_empty() {
            Ok(validated)
        } else {
            Err(Invalid::new(
                ErrorNode::Indexes {
                    predicates: Vec::new(),
                    indexes,
                },
                raw.clone(),
                "tuple",
            ))
        }
    }

    /// Validates a value against this schema.
    ///
    /// # Panics
    ///
    /// Panics if the schema holds an async whole-tuple check; use
    /// [`validate_async`](TupleSchema::validate_async) for those.
    pub fn validate(&self, value: &Value) -> Validated<Vec<Value>> {
        if self.check_async.is_some() {
            reject_sync_entry("tuple");
        }
        let items = match self.shape(value) {
            Ok(items) => items,
            Err(invalid) => return Validated::Invalid(invalid),
        };

        let mut indexes = BTreeMap::new();
        let mut validated = Vec::with_capacity(items.len());
        for (index, (item, slot)) in items.iter().zip(&self.slots).enumerate() {
            match slot.validate_value(item) {
                Validated::Valid(v) => validated.push(v),
                Validated::Invalid(e) => {
                    indexes.insert(index, e);
                }
            }
        }

        match self.assemble(indexes, validated, value) {
            Ok(validated) => match &self.check {
                Some(f) => f(validated),
                None => Validated::Valid(validated),
            },
            Err(invalid) => Validated::Invalid(invalid),
        }
    }

    /// Async counterpart of [`validate`](TupleSchema::validate); slots are
    /// awaited in positional order.
    pub async fn validate_async(&self, value: &Value) -> Validated<Vec<Value>> {
        let items = match self.shape(value) {
            Ok(items) => items,
            Err(invalid) => return Validated::Invalid(invalid),
        };

        let mut indexes = BTreeMap::new();
        let mut validated = Vec::with_capacity(items.len());
        for (index, (item, slot)) in items.iter().zip(&self.slots).enumerate() {
            match slot.validate_value_async(item).await {
                Validated::Valid(v) => validated.push(v),
                Validated::Invalid(e) => {
                    indexes.insert(index, e);
                }
            }
        }

        match self.assemble(indexes, validated, value) {
            Ok(validated) => {
                if let Some(c) = &self.check_async {
                    c.check(validated).await
                } else if let Some(f) = &self.check {
                    f(validated)
                } else {
                    Validated::Valid(validated)
                }
            }
            Err(invalid) => Validated::Invalid(invalid),
        }
    }
}

#[async_trait::async_trait]
impl SchemaLike for TupleSchema {
    type Output = Vec<Value>;

    fn validate(&self, value: &Value) -> Validated<Vec<Value>> {
        TupleSchema::validate(self, value)
    }

    async fn validate_async(&self, value: &Value) -> Validated<Vec<Value>> {
        TupleSchema::validate_async(self, value).await
    }

    fn validate_to_value(&self, value: &Value) -> Validated<Value> {
        TupleSchema::validate(self, value).map(Value::Array)
    }

    async fn validate_to_value_async(&self, value: &Value) -> Validated<Value> {
        TupleSchema::validate_async(self, value).await.map(Value::Array)
    }
}
