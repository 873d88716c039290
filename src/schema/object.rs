//! Record schema validation.
//!
//! [`ObjectSchema`] validates JSON objects with a fixed, declared set of
//! named fields. Every field is visited on every validation; failures
//! accumulate into a [`ErrorNode::Keys`] node holding only the failing
//! fields, in declaration order.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{ErrorNode, Invalid, JsonKind};
use crate::validated::Validated;

use super::predicate::{reject_sync_entry, AsyncCheck};
use super::traits::{SchemaLike, ValueValidator};

/// Definition of a field within an object schema.
struct FieldDef {
    schema: Box<dyn ValueValidator>,
    required: bool,
    default: Option<Value>,
}

/// A whole-object check run after every field has validated.
type ObjectCheck =
    Box<dyn Fn(Map<String, Value>) -> Validated<Map<String, Value>> + Send + Sync>;

/// A schema for validating JSON objects with fixed, named fields.
///
/// Validation proceeds in phases:
///
/// 1. The value must be an object.
/// 2. With [`deny_unknown_keys`](ObjectSchema::deny_unknown_keys) set,
///    undeclared keys fail the whole object immediately, before any
///    per-field validation runs (an unknown-key failure is total, not merged with
///    field failures).
/// 3. Every declared field is validated in declaration order, with no
///    short-circuiting; missing required fields record a missing-key
///    error, absent optional fields are simply omitted from the output
///    (never substituted with `null`).
/// 4. If all fields passed, the optional whole-object check runs. This is
///    the one place cross-field rules belong.
///
/// # Example
///
/// ```rust
/// use inquest::{ErrorNode, Schema, Validated};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("name", Schema::string().min_len(1))
///     .field("age", Schema::integer().non_negative());
///
/// let result = schema.validate(&json!({"name": "", "age": -5}));
/// match result {
///     Validated::Invalid(invalid) => match invalid.error {
///         // both failures are reported, keyed like the input
///         ErrorNode::Keys { keys } => assert_eq!(keys.len(), 2),
///         other => panic!("unexpected error: {:?}", other),
///     },
///     Validated::Valid(_) => panic!("expected failure"),
/// }
/// ```
pub struct ObjectSchema {
    fields: IndexMap<String, FieldDef>,
    deny_unknown: bool,
    check: Option<ObjectCheck>,
    check_async: Option<Box<dyn AsyncCheck<Map<String, Value>>>>,
}

impl ObjectSchema {
    /// Creates a new object schema with no fields.
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
            deny_unknown: false,
            check: None,
            check_async: None,
        }
    }

    /// Adds a required field.
    pub fn field<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.fields.insert(
            name.into(),
            FieldDef {
                schema: Box::new(schema),
                required: true,
                default: None,
            },
        );
        self
    }

    /// Adds an optional field. When absent from the input, the field is
    /// omitted from the output map.
    pub fn optional<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.fields.insert(
            name.into(),
            FieldDef {
                schema: Box::new(schema),
                required: false,
                default: None,
            },
        );
        self
    }

    /// Adds an optional field with a default used when the field is absent.
    pub fn default<S>(mut self, name: impl Into<String>, schema: S, default: Value) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.fields.insert(
            name.into(),
            FieldDef {
                schema: Box::new(schema),
                required: false,
                default: Some(default),
            },
        );
        self
    }

    pub(crate) fn insert_boxed(
        mut self,
        name: String,
        schema: Box<dyn ValueValidator>,
        required: bool,
    ) -> Self {
        self.fields.insert(
            name,
            FieldDef {
                schema,
                required,
                default: None,
            },
        );
        self
    }

    /// Rejects inputs containing keys outside the declared field set.
    ///
    /// The check runs before any per-field validation and fails the whole
    /// object on its own.
    pub fn deny_unknown_keys(mut self) -> Self {
        self.deny_unknown = true;
        self
    }

    /// Sets a whole-object check, run only after every field has passed.
    ///
    /// The check receives the validated field map and may transform it or
    /// reject it (typically via [`Invalid::custom`]) for cross-field
    /// reasons.
    ///
    /// # Panics
    ///
    /// Panics if an async check is already configured; a schema carries at
    /// most one whole-object check.
    pub fn check(
        mut self,
        f: impl Fn(Map<String, Value>) -> Validated<Map<String, Value>> + Send + Sync + 'static,
    ) -> Self {
        assert!(
            self.check_async.is_none(),
            "object schema cannot have both check and check_async"
        );
        self.check = Some(Box::new(f));
        self
    }

    /// Sets an async whole-object check. A schema holding one can only be
    /// driven through [`validate_async`](ObjectSchema::validate_async).
    ///
    /// # Panics
    ///
    /// Panics if a synchronous check is already configured.
    pub fn check_async(mut self, c: impl AsyncCheck<Map<String, Value>> + 'static) -> Self {
        assert!(
            self.check.is_none(),
            "object schema cannot have both check and check_async"
        );
        self.check_async = Some(Box::new(c));
        self
    }

    /// The declared field names, in declaration order.
    ///
    /// Part of the read-only introspection surface.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The schema of a declared field, if any.
    pub fn field_schema(&self, name: &str) -> Option<&dyn ValueValidator> {
        self.fields.get(name).map(|def| def.schema.as_ref())
    }

    /// Returns true if the named field is declared and required.
    pub fn is_required(&self, name: &str) -> bool {
        self.fields.get(name).map(|def| def.required).unwrap_or(false)
    }

    fn shape<'v>(&self, value: &'v Value) -> Result<&'v Map<String, Value>, Invalid> {
        value.as_object().ok_or_else(|| {
            Invalid::new(
                ErrorNode::Type {
                    expected: JsonKind::Object,
                },
                value.clone(),
                "object",
            )
        })
    }

    /// The unknown-key precondition: checked before any field validation.
    fn unknown_keys(&self, obj: &Map<String, Value>, raw: &Value) -> Option<Invalid> {
        if !self.deny_unknown {
            return None;
        }
        if obj.keys().any(|k| !self.fields.contains_key(k)) {
            Some(Invalid::new(
                ErrorNode::ExtraKeys {
                    expected: self.fields.keys().cloned().collect(),
                },
                raw.clone(),
                "object",
            ))
        } else {
            None
        }
    }

    fn assemble(
        &self,
        failures: IndexMap<String, Invalid>,
        validated: Map<String, Value>,
        raw: &Value,
    ) -> Result<Map<String, Value>, Invalid> {
        if failures.is_empty() {
            Ok(validated)
        } else {
            Err(Invalid::new(
                ErrorNode::Keys { keys: failures },
                raw.clone(),
                "object",
            ))
        }
    }

    fn pass_through_unknown(&self, obj: &Map<String, Value>, validated: &mut Map<String, Value>) {
        for (key, value) in obj {
            if !self.fields.contains_key(key) {
                validated.insert(key.clone(), value.clone());
            }
        }
    }

    fn missing_key() -> Invalid {
        Invalid::new(ErrorNode::MissingKey, Value::Null, "object")
    }

    /// Validates a value against this schema.
    ///
    /// # Panics
    ///
    /// Panics if the schema holds an async whole-object check; use
    /// [`validate_async`](ObjectSchema::validate_async) for those.
    pub fn validate(&self, value: &Value) -> Validated<Map<String, Value>> {
        if self.check_async.is_some() {
            reject_sync_entry("object");
        }
        let obj = match self.shape(value) {
            Ok(obj) => obj,
            Err(invalid) => return Validated::Invalid(invalid),
        };
        if let Some(invalid) = self.unknown_keys(obj, value) {
            return Validated::Invalid(invalid);
        }

        let mut failures = IndexMap::new();
        let mut validated = Map::new();
        for (name, def) in &self.fields {
            match obj.get(name) {
                Some(field_value) => match def.schema.validate_value(field_value) {
                    Validated::Valid(v) => {
                        validated.insert(name.clone(), v);
                    }
                    Validated::Invalid(e) => {
                        failures.insert(name.clone(), e);
                    }
                },
                None if def.required => {
                    failures.insert(name.clone(), Self::missing_key());
                }
                None => {
                    if let Some(default) = &def.default {
                        validated.insert(name.clone(), default.clone());
                    }
                }
            }
        }
        self.pass_through_unknown(obj, &mut validated);

        match self.assemble(failures, validated, value) {
            Ok(validated) => match &self.check {
                Some(f) => f(validated),
                None => Validated::Valid(validated),
            },
            Err(invalid) => Validated::Invalid(invalid),
        }
    }

    /// Async counterpart of [`validate`](ObjectSchema::validate); fields
    /// are awaited in declaration order.
    pub async fn validate_async(&self, value: &Value) -> Validated<Map<String, Value>> {
        let obj = match self.shape(value) {
            Ok(obj) => obj,
            Err(invalid) => return Validated::Invalid(invalid),
        };
        if let Some(invalid) = self.unknown_keys(obj, value) {
            return Validated::Invalid(invalid);
        }

        let mut failures = IndexMap::new();
        let mut validated = Map::new();
        for (name, def) in &self.fields {
            match obj.get(name) {
                Some(field_value) => match def.schema.validate_value_async(field_value).await {
                    Validated::Valid(v) => {
                        validated.insert(name.clone(), v);
                    }
                    Validated::Invalid(e) => {
                        failures.insert(name.clone(), e);
                    }
                },
                None if def.required => {
                    failures.insert(name.clone(), Self::missing_key());
                }
                None => {
                    if let Some(default) = &def.default {
                        validated.insert(name.clone(), default.clone());
                    }
                }
            }
        }
        self.pass_through_unknown(obj, &mut validated);

        match self.assemble(failures, validated, value) {
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

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SchemaLike for ObjectSchema {
    type Output = Map<String, Value>;

    fn validate(&self, value: &Value) -> Validated<Map<String, Value>> {
        ObjectSchema::validate(self, value)
    }

    async fn validate_async(&self, value: &Value) -> Validated<Map<String, Value>> {
        ObjectSchema::validate_async(self, value).await
    }

    fn validate_to_value(&self, value: &Value) -> Validated<Value> {
        ObjectSchema::validate(self, value).map(Value::Object)
    }

    async fn validate_to_value_async(&self, value: &Value) -> Validated<Value> {
        ObjectSchema::validate_async(self, value).await.map(Value::Object)
    }
}
