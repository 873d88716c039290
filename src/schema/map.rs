//! Homogeneous map schema validation.
//!
//! [`MapSchema`] validates objects whose keys and values all follow one
//! schema each (a dictionary, as opposed to a fixed-field record). Key and
//! value are validated independently for every entry; a failing entry is
//! reported under its original input key with whichever side(s) failed.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{ErrorNode, Invalid, JsonKind, KeyValErrs, PredicateErr};
use crate::validated::Validated;

use super::predicate::Predicate;
use super::string::StringSchema;
use super::traits::{SchemaLike, ValueValidator};

/// A constraint applied to the map as a whole.
#[derive(Clone)]
enum MapConstraint {
    MinKeys { min: usize, message: Option<String> },
    MaxKeys { max: usize, message: Option<String> },
}

impl MapConstraint {
    fn check(&self, map: &Map<String, Value>) -> bool {
        match self {
            MapConstraint::MinKeys { min, .. } => map.len() >= *min,
            MapConstraint::MaxKeys { max, .. } => map.len() <= *max,
        }
    }

    fn detail(&self) -> PredicateErr {
        match self {
            MapConstraint::MinKeys { min, message } => PredicateErr::new(
                "min_keys",
                message
                    .clone()
                    .unwrap_or_else(|| format!("minimum allowed properties is {}", min)),
            ),
            MapConstraint::MaxKeys { max, message } => PredicateErr::new(
                "max_keys",
                message
                    .clone()
                    .unwrap_or_else(|| format!("maximum allowed properties is {}", max)),
            ),
        }
    }

    fn set_message(&mut self, msg: String) {
        match self {
            MapConstraint::MinKeys { message, .. } | MapConstraint::MaxKeys { message, .. } => {
                *message = Some(msg)
            }
        }
    }
}

/// A schema for validating homogeneous maps.
///
/// # Example
///
/// ```rust
/// use inquest::{ErrorNode, Schema, Validated};
/// use serde_json::json;
///
/// let schema = Schema::map(Schema::integer());
///
/// assert!(schema.validate(&json!({"a": 1, "b": 2})).is_valid());
///
/// match schema.validate(&json!({"a": 1, "b": "x"})) {
///     Validated::Invalid(invalid) => match invalid.error {
///         ErrorNode::MapEntries { entries, .. } => {
///             // "a" validated and is absent; "b" failed on its value
///             assert!(entries.contains_key("b"));
///             assert!(!entries.contains_key("a"));
///         }
///         other => panic!("unexpected error: {:?}", other),
///     },
///     Validated::Valid(_) => panic!("expected failure"),
/// }
/// ```
pub struct MapSchema {
    key_schema: StringSchema,
    value_schema: Box<dyn ValueValidator>,
    constraints: Vec<MapConstraint>,
    predicates: Vec<Predicate<Map<String, Value>>>,
}

impl MapSchema {
    /// Creates a new map schema with the given value schema. Keys default
    /// to an unconstrained string schema.
    pub fn new<S: SchemaLike + 'static>(value_schema: S) -> Self {
        Self {
            key_schema: StringSchema::new(),
            value_schema: Box::new(value_schema),
            constraints: Vec::new(),
            predicates: Vec::new(),
        }
    }

    /// Sets the schema keys must satisfy (JSON map keys are always
    /// strings, so key validation is string validation).
    pub fn keys(mut self, key_schema: StringSchema) -> Self {
        self.key_schema = key_schema;
        self
    }

    /// Requires at least `min` entries.
    pub fn min_keys(mut self, min: usize) -> Self {
        self.constraints
            .push(MapConstraint::MinKeys { min, message: None });
        self
    }

    /// Requires at most `max` entries.
    pub fn max_keys(mut self, max: usize) -> Self {
        self.constraints
            .push(MapConstraint::MaxKeys { max, message: None });
        self
    }

    /// Adds a custom map-level predicate.
    pub fn predicate(
        mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        test: impl Fn(&Map<String, Value>) -> bool + Send + Sync + 'static,
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

    /// The key schema, part of the read-only introspection surface.
    pub fn key_schema(&self) -> &StringSchema {
        &self.key_schema
    }

    /// The value schema, part of the read-only introspection surface.
    pub fn value_schema(&self) -> &dyn ValueValidator {
        self.value_schema.as_ref()
    }

    /// The details of every declared map-level check.
    pub fn declared_predicates(&self) -> Vec<PredicateErr> {
        self.constraints
            .iter()
            .map(|c| c.detail())
            .chain(self.predicates.iter().map(|p| p.detail()))
            .collect()
    }

    fn shape<'v>(&self, value: &'v Value) -> Result<&'v Map<String, Value>, Invalid> {
        value.as_object().ok_or_else(|| {
            Invalid::new(
                ErrorNode::Type {
                    expected: JsonKind::Object,
                },
                value.clone(),
                "map",
            )
        })
    }

    fn failing_map_predicates(&self, map: &Map<String, Value>) -> Vec<PredicateErr> {
        let mut failing: Vec<PredicateErr> = self
            .constraints
            .iter()
            .filter(|c| !c.check(map))
            .map(|c| c.detail())
            .collect();
        for pred in &self.predicates {
            if !pred.check(map) {
                failing.push(pred.detail());
            }
        }
        failing
    }

    fn assemble(
        &self,
        predicates: Vec<PredicateErr>,
        entries: IndexMap<String, KeyValErrs>,
        validated: Map<String, Value>,
        raw: &Value,
    ) -> Validated<Map<String, Value>> {
        if predicates.is_empty() && entries.is_empty() {
            Validated::Valid(validated)
        } else {
            Validated::Invalid(Invalid::new(
                ErrorNode::MapEntries { predicates, entries },
                raw.clone(),
                "map",
            ))
        }
    }

    /// Validates a value against this schema.
    ///
    /// Every entry is visited; for each, key and value are validated
    /// independently, and map-level predicate failures are reported
    /// alongside entry failures.
    pub fn validate(&self, value: &Value) -> Validated<Map<String, Value>> {
        let map = match self.shape(value) {
            Ok(map) => map,
            Err(invalid) => return Validated::Invalid(invalid),
        };
        let failing = self.failing_map_predicates(map);

        let mut entries = IndexMap::new();
        let mut validated = Map::new();
        for (key, val) in map {
            let key_result = self.key_schema.validate(&Value::String(key.clone()));
            let val_result = self.value_schema.validate_value(val);
            self.merge_entry(key, key_result, val_result, &mut entries, &mut validated);
        }
        self.assemble(failing, entries, validated, value)
    }

    /// Async counterpart of [`validate`](MapSchema::validate); entries are
    /// awaited in input order.
    pub async fn validate_async(&self, value: &Value) -> Validated<Map<String, Value>> {
        let map = match self.shape(value) {
            Ok(map) => map,
            Err(invalid) => return Validated::Invalid(invalid),
        };
        let failing = self.failing_map_predicates(map);

        let mut entries = IndexMap::new();
        let mut validated = Map::new();
        for (key, val) in map {
            let key_result = self
                .key_schema
                .validate_async(&Value::String(key.clone()))
                .await;
            let val_result = self.value_schema.validate_value_async(val).await;
            self.merge_entry(key, key_result, val_result, &mut entries, &mut validated);
        }
        self.assemble(failing, entries, validated, value)
    }

    fn merge_entry(
        &self,
        key: &str,
        key_result: Validated<String>,
        val_result: Validated<Value>,
        entries: &mut IndexMap<String, KeyValErrs>,
        validated: &mut Map<String, Value>,
    ) {
        match (key_result, val_result) {
            (Validated::Valid(k), Validated::Valid(v)) => {
                validated.insert(k, v);
            }
            (key_result, val_result) => {
                entries.insert(
                    key.to_string(),
                    KeyValErrs {
                        key: key_result.invalid(),
                        val: val_result.invalid(),
                    },
                );
            }
        }
    }
}

#[async_trait::async_trait]
impl SchemaLike for MapSchema {
    type Output = Map<String, Value>;

    fn validate(&self, value: &Value) -> Validated<Map<String, Value>> {
        MapSchema::validate(self, value)
    }

    async fn validate_async(&self, value: &Value) -> Validated<Map<String, Value>> {
        MapSchema::validate_async(self, value).await
    }

    fn validate_to_value(&self, value: &Value) -> Validated<Value> {
        MapSchema::validate(self, value).map(Value::Object)
    }

    async fn validate_to_value_async(&self, value: &Value) -> Validated<Value> {
        MapSchema::validate_async(self, value).await.map(Value::Object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IntegerSchema;
    use serde_json::json;

    fn unwrap_invalid<T: std::fmt::Debug>(v: Validated<T>) -> Invalid {
        v.into_result().unwrap_err()
    }

    #[test]
    fn test_accepts_valid_entries() {
        let schema = MapSchema::new(IntegerSchema::new());
        let map = schema
            .validate(&json!({"a": 1, "b": 2}))
            .valid()
            .unwrap();
        assert_eq!(map.get("a"), Some(&json!(1)));
        assert_eq!(map.get("b"), Some(&json!(2)));
    }

    #[test]
    fn test_rejects_non_object() {
        let schema = MapSchema::new(IntegerSchema::new());
        let invalid = unwrap_invalid(schema.validate(&json!([1, 2])));
        assert_eq!(
            invalid.error,
            ErrorNode::Type {
                expected: JsonKind::Object
            }
        );
    }

    #[test]
    fn test_only_failing_entries_reported() {
        let schema = MapSchema::new(IntegerSchema::new());
        let invalid = unwrap_invalid(schema.validate(&json!({"a": 1, "b": "x"})));
        match &invalid.error {
            ErrorNode::MapEntries { entries, .. } => {
                assert_eq!(entries.len(), 1);
                let kv = &entries["b"];
                assert!(kv.key.is_none());
                assert!(matches!(
                    kv.val.as_ref().map(|i| &i.error),
                    Some(ErrorNode::Type { .. })
                ));
            }
            other => panic!("expected MapEntries, got {:?}", other),
        }
    }

    #[test]
    fn test_key_failures_reported_under_raw_key() {
        let schema = MapSchema::new(IntegerSchema::new()).keys(StringSchema::new().max_len(2));
        let invalid = unwrap_invalid(schema.validate(&json!({"toolong": 1})));
        match &invalid.error {
            ErrorNode::MapEntries { entries, .. } => {
                let kv = &entries["toolong"];
                assert!(kv.key.is_some());
                assert!(kv.val.is_none());
            }
            other => panic!("expected MapEntries, got {:?}", other),
        }
    }

    #[test]
    fn test_key_and_value_can_both_fail() {
        let schema = MapSchema::new(IntegerSchema::new()).keys(StringSchema::new().max_len(2));
        let invalid = unwrap_invalid(schema.validate(&json!({"toolong": "x"})));
        match &invalid.error {
            ErrorNode::MapEntries { entries, .. } => {
                let kv = &entries["toolong"];
                assert!(kv.key.is_some());
                assert!(kv.val.is_some());
            }
            other => panic!("expected MapEntries, got {:?}", other),
        }
    }

    #[test]
    fn test_output_keyed_by_validated_key() {
        let schema = MapSchema::new(IntegerSchema::new()).keys(StringSchema::new().uppercase());
        let map = schema.validate(&json!({"key": 1})).valid().unwrap();
        assert_eq!(map.get("KEY"), Some(&json!(1)));
        assert!(map.get("key").is_none());
    }

    #[test]
    fn test_size_constraints_coexist_with_entry_failures() {
        let schema = MapSchema::new(IntegerSchema::new()).min_keys(3);
        let invalid = unwrap_invalid(schema.validate(&json!({"a": "x"})));
        match &invalid.error {
            ErrorNode::MapEntries { predicates, entries } => {
                assert_eq!(predicates[0].code, "min_keys");
                assert!(entries.contains_key("a"));
            }
            other => panic!("expected MapEntries, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_map() {
        let schema = MapSchema::new(IntegerSchema::new());
        assert!(schema.validate(&json!({})).is_valid());

        let schema = MapSchema::new(IntegerSchema::new()).min_keys(1);
        assert!(schema.validate(&json!({})).is_invalid());
    }
}
