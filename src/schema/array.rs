//! List schema validation.
//!
//! [`ArraySchema`] validates homogeneous sequences. Sequence-level checks
//! (length, uniqueness, custom predicates) and per-item validation always
//! both run: a too-short list with broken items reports the length
//! violation and every failing index together.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::Value;

use crate::error::{ErrorNode, Invalid, JsonKind, PredicateErr};
use crate::validated::Validated;

use super::predicate::{reject_sync_entry, AsyncPredicate, Predicate};
use super::traits::{SchemaLike, ValueValidator};

/// A constraint applied to the sequence as a whole.
enum ArrayConstraint {
    MinItems {
        min: usize,
        message: Option<String>,
    },
    MaxItems {
        max: usize,
        message: Option<String>,
    },
    Unique {
        message: Option<String>,
    },
    UniqueBy {
        key_fn: Arc<dyn Fn(&Value) -> Value + Send + Sync>,
        message: Option<String>,
    },
}

impl ArrayConstraint {
    fn check(&self, items: &[Value]) -> bool {
        match self {
            ArrayConstraint::MinItems { min, .. } => items.len() >= *min,
            ArrayConstraint::MaxItems { max, .. } => items.len() <= *max,
            ArrayConstraint::Unique { .. } => {
                find_duplicates(items, |v| v.clone()).values().all(|ix| ix.len() == 1)
            }
            ArrayConstraint::UniqueBy { key_fn, .. } => {
                find_duplicates(items, |v| key_fn(v)).values().all(|ix| ix.len() == 1)
            }
        }
    }

    fn detail(&self) -> PredicateErr {
        match self {
            ArrayConstraint::MinItems { min, message } => PredicateErr::new(
                "min_items",
                message
                    .clone()
                    .unwrap_or_else(|| format!("minimum allowed length is {}", min)),
            ),
            ArrayConstraint::MaxItems { max, message } => PredicateErr::new(
                "max_items",
                message
                    .clone()
                    .unwrap_or_else(|| format!("maximum allowed length is {}", max)),
            ),
            ArrayConstraint::Unique { message } | ArrayConstraint::UniqueBy { message, .. } => {
                PredicateErr::new(
                    "unique",
                    message
                        .clone()
                        .unwrap_or_else(|| "all items must be unique".to_string()),
                )
            }
        }
    }

    fn set_message(&mut self, msg: String) {
        match self {
            ArrayConstraint::MinItems { message, .. }
            | ArrayConstraint::MaxItems { message, .. }
            | ArrayConstraint::Unique { message }
            | ArrayConstraint::UniqueBy { message, .. } => *message = Some(msg),
        }
    }
}

/// A schema for validating arrays against a single item schema.
///
/// # Example
///
/// ```rust
/// use inquest::{ErrorNode, Schema, Validated};
/// use serde_json::json;
///
/// let schema = Schema::array(Schema::integer().min(0));
///
/// match schema.validate(&json!([1, -1, "x"])) {
///     Validated::Invalid(invalid) => match invalid.error {
///         ErrorNode::Indexes { indexes, .. } => {
///             // index 0 passed and is absent; 1 and 2 failed
///             assert_eq!(indexes.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
///         }
///         other => panic!("unexpected error: {:?}", other),
///     },
///     Validated::Valid(_) => panic!("expected failure"),
/// }
/// ```
pub struct ArraySchema {
    item_schema: Box<dyn ValueValidator>,
    constraints: Vec<ArrayConstraint>,
    predicates: Vec<Predicate<[Value]>>,
    predicates_async: Vec<Arc<dyn AsyncPredicate<[Value]>>>,
}

impl ArraySchema {
    /// Creates a new array schema with the given item schema.
    pub fn new<S: SchemaLike + 'static>(item_schema: S) -> Self {
        Self {
            item_schema: Box::new(item_schema),
            constraints: Vec::new(),
            predicates: Vec::new(),
            predicates_async: Vec::new(),
        }
    }

    pub(crate) fn from_boxed(item_schema: Box<dyn ValueValidator>) -> Self {
        Self {
            item_schema,
            constraints: Vec::new(),
            predicates: Vec::new(),
            predicates_async: Vec::new(),
        }
    }

    /// Requires at least `min` items.
    pub fn min_items(mut self, min: usize) -> Self {
        self.constraints
            .push(ArrayConstraint::MinItems { min, message: None });
        self
    }

    /// Requires at most `max` items.
    pub fn max_items(mut self, max: usize) -> Self {
        self.constraints
            .push(ArrayConstraint::MaxItems { max, message: None });
        self
    }

    /// Requires at least one item.
    pub fn non_empty(self) -> Self {
        self.min_items(1)
    }

    /// Requires all items to be distinct (by JSON equality).
    pub fn unique(mut self) -> Self {
        self.constraints
            .push(ArrayConstraint::Unique { message: None });
        self
    }

    /// Requires all items to be distinct under a key function, e.g.
    /// uniqueness of an `id` field across an array of objects.
    pub fn unique_by(
        mut self,
        key_fn: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.constraints.push(ArrayConstraint::UniqueBy {
            key_fn: Arc::new(key_fn),
            message: None,
        });
        self
    }

    /// Adds a custom sequence-level predicate.
    pub fn predicate(
        mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        test: impl Fn(&[Value]) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicates.push(Predicate::new(code, message, test));
        self
    }

    /// Adds an async sequence-level predicate. A schema holding one can
    /// only be driven through [`validate_async`](ArraySchema::validate_async).
    pub fn predicate_async(mut self, pred: impl AsyncPredicate<[Value]> + 'static) -> Self {
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

    /// The item schema, part of the read-only introspection surface.
    pub fn item_schema(&self) -> &dyn ValueValidator {
        self.item_schema.as_ref()
    }

    /// The details of every declared sequence-level check.
    pub fn declared_predicates(&self) -> Vec<PredicateErr> {
        self.constraints
            .iter()
            .map(|c| c.detail())
            .chain(self.predicates.iter().map(|p| p.detail()))
            .chain(self.predicates_async.iter().map(|p| p.detail()))
            .collect()
    }

    fn shape<'v>(&self, value: &'v Value) -> Result<&'v Vec<Value>, Invalid> {
        value.as_array().ok_or_else(|| {
            Invalid::new(
                ErrorNode::Type {
                    expected: JsonKind::Array,
                },
                value.clone(),
                "array",
            )
        })
    }

    fn failing_sequence_predicates(&self, items: &[Value]) -> Vec<PredicateErr> {
        let mut failing: Vec<PredicateErr> = self
            .constraints
            .iter()
            .filter(|c| !c.check(items))
            .map(|c| c.detail())
            .collect();
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
        indexes: BTreeMap<usize, Invalid>,
        validated: Vec<Value>,
        raw: &Value,
    ) -> Validated<Vec<Value>> {
        if predicates.is_empty() && indexes.is_empty() {
            Validated::Valid(validated)
        } else {
            Validated::Invalid(Invalid::new(
                ErrorNode::Indexes { predicates, indexes },
                raw.clone(),
                "array",
            ))
        }
    }

    /// Validates a value against this schema.
    ///
    /// Sequence-level predicate failures never suppress item validation:
    /// both classes of failure are reported under the same node.
    ///
    /// # Panics
    ///
    /// Panics if the schema holds async predicates; use
    /// [`validate_async`](ArraySchema::validate_async) for those.
    pub fn validate(&self, value: &Value) -> Validated<Vec<Value>> {
        if !self.predicates_async.is_empty() {
            reject_sync_entry("array");
        }
        let items = match self.shape(value) {
            Ok(items) => items,
            Err(invalid) => return Validated::Invalid(invalid),
        };
        let failing = self.failing_sequence_predicates(items);

        let mut indexes = BTreeMap::new();
        let mut validated = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match self.item_schema.validate_value(item) {
                Validated::Valid(v) => validated.push(v),
                Validated::Invalid(e) => {
                    indexes.insert(index, e);
                }
            }
        }
        self.assemble(failing, indexes, validated, value)
    }

    /// Async counterpart of [`validate`](ArraySchema::validate); items are
    /// awaited in index order.
    pub async fn validate_async(&self, value: &Value) -> Validated<Vec<Value>> {
        let items = match self.shape(value) {
            Ok(items) => items,
            Err(invalid) => return Validated::Invalid(invalid),
        };
        let mut failing = self.failing_sequence_predicates(items);
        for pred in &self.predicates_async {
            if !pred.check(items).await {
                failing.push(pred.detail());
            }
        }

        let mut indexes = BTreeMap::new();
        let mut validated = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match self.item_schema.validate_value_async(item).await {
                Validated::Valid(v) => validated.push(v),
                Validated::Invalid(e) => {
                    indexes.insert(index, e);
                }
            }
        }
        self.assemble(failing, indexes, validated, value)
    }
}

#[async_trait::async_trait]
impl SchemaLike for ArraySchema {
    type Output = Vec<Value>;

    fn validate(&self, value: &Value) -> Validated<Vec<Value>> {
        ArraySchema::validate(self, value)
    }

    async fn validate_async(&self, value: &Value) -> Validated<Vec<Value>> {
        ArraySchema::validate_async(self, value).await
    }

    fn validate_to_value(&self, value: &Value) -> Validated<Value> {
        ArraySchema::validate(self, value).map(Value::Array)
    }

    async fn validate_to_value_async(&self, value: &Value) -> Validated<Value> {
        ArraySchema::validate_async(self, value).await.map(Value::Array)
    }
}

/// Groups indices by a serialized key, for duplicate detection.
pub(crate) fn find_duplicates<F>(items: &[Value], key_fn: F) -> HashMap<String, Vec<usize>>
where
    F: Fn(&Value) -> Value,
{
    let mut seen: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, item) in items.iter().enumerate() {
        let key = key_fn(item);
        // serialization as the lookup key handles all value types uniformly
        let key_str = serde_json::to_string(&key).unwrap_or_else(|_| format!("{:?}", key));
        seen.entry(key_str).or_default().push(i);
    }
    seen
}
