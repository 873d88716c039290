//! Deriving record schemas from structural type declarations.
//!
//! [`SchemaRegistry`] is a thread-safe dispatch table from type labels
//! (`"string"`, `"integer"`, ...) to schema factories. [`RecordDecl`]
//! builds an [`ObjectSchema`] from an ordered field declaration by looking
//! each field's type label up in the registry: the moral equivalent of
//! deriving a validator from a struct definition, without requiring any
//! runtime reflection. Individual fields can override the registry with an
//! explicit schema.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::schema::{ObjectSchema, Schema, SchemaLike, ValueValidator};

/// A factory producing a fresh schema for a registered type label.
type SchemaFactory = Arc<dyn Fn() -> Box<dyn ValueValidator> + Send + Sync>;

/// Type alias for the factory storage map.
type FactoryMap = Arc<RwLock<HashMap<String, SchemaFactory>>>;

/// A thread-safe registry mapping type labels to schema factories.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>`: lookups from many threads run
/// concurrently, registrations are serialized.
///
/// # Example
///
/// ```rust
/// use inquest::{RecordDecl, Schema, SchemaRegistry};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::with_defaults();
///
/// // register a project-specific type
/// registry
///     .register("username", || Box::new(Schema::string().trim().min_len(3)))
///     .unwrap();
///
/// // derive a record schema from a field declaration
/// let user = RecordDecl::new()
///     .field("name", "username")
///     .field("age", "integer")
///     .build(&registry)
///     .unwrap();
///
/// assert!(user.validate(&json!({"name": "ada", "age": 36})).is_valid());
/// ```
pub struct SchemaRegistry {
    factories: FactoryMap,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            factories: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates a registry pre-seeded with the built-in scalar labels:
    /// `string`, `integer`, `float`, `boolean`, `decimal`, `date`,
    /// `datetime`, `uuid`, and `bytes`.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        {
            let mut factories = registry.factories.write();
            factories.insert("string".into(), factory(Schema::string));
            factories.insert("integer".into(), factory(Schema::integer));
            factories.insert("float".into(), factory(Schema::float));
            factories.insert("boolean".into(), factory(Schema::boolean));
            factories.insert("decimal".into(), factory(Schema::decimal));
            factories.insert("date".into(), factory(Schema::date));
            factories.insert("datetime".into(), factory(Schema::datetime));
            factories.insert("uuid".into(), factory(Schema::uuid));
            factories.insert("bytes".into(), factory(Schema::bytes));
        }
        registry
    }

    /// Registers a factory for a type label.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if the label is already
    /// registered. Use [`replace`](SchemaRegistry::replace) to override.
    pub fn register<F>(&self, label: impl Into<String>, f: F) -> Result<(), RegistryError>
    where
        F: Fn() -> Box<dyn ValueValidator> + Send + Sync + 'static,
    {
        let label = label.into();
        let mut factories = self.factories.write();
        if factories.contains_key(&label) {
            return Err(RegistryError::DuplicateName(label));
        }
        factories.insert(label, Arc::new(f));
        Ok(())
    }

    /// Registers or overrides a factory for a type label.
    pub fn replace<F>(&self, label: impl Into<String>, f: F)
    where
        F: Fn() -> Box<dyn ValueValidator> + Send + Sync + 'static,
    {
        self.factories.write().insert(label.into(), Arc::new(f));
    }

    /// Returns true if the label is registered.
    pub fn contains(&self, label: &str) -> bool {
        self.factories.read().contains_key(label)
    }

    /// Produces a fresh schema for the label, if registered.
    pub fn resolve(&self, label: &str) -> Option<Box<dyn ValueValidator>> {
        let f = self.factories.read().get(label).cloned();
        f.map(|f| f())
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Clone for SchemaRegistry {
    fn clone(&self) -> Self {
        Self {
            factories: Arc::clone(&self.factories),
        }
    }
}

fn factory<S, F>(f: F) -> SchemaFactory
where
    S: SchemaLike + 'static,
    F: Fn() -> S + Send + Sync + 'static,
{
    Arc::new(move || Box::new(f()))
}

/// How a declared field obtains its schema.
enum FieldSource {
    Label(String),
    Schema(Box<dyn ValueValidator>),
}

/// One field of a record declaration.
struct DeclField {
    name: String,
    source: FieldSource,
    required: bool,
}

/// A structural record declaration: an ordered list of named, typed
/// fields, buildable into an [`ObjectSchema`] against a registry.
#[derive(Default)]
pub struct RecordDecl {
    fields: Vec<DeclField>,
    deny_unknown: bool,
}

impl RecordDecl {
    /// Creates an empty declaration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a required field whose schema comes from the registry.
    pub fn field(mut self, name: impl Into<String>, type_label: impl Into<String>) -> Self {
        self.fields.push(DeclField {
            name: name.into(),
            source: FieldSource::Label(type_label.into()),
            required: true,
        });
        self
    }

    /// Declares an optional field whose schema comes from the registry.
    pub fn optional(mut self, name: impl Into<String>, type_label: impl Into<String>) -> Self {
        self.fields.push(DeclField {
            name: name.into(),
            source: FieldSource::Label(type_label.into()),
            required: false,
        });
        self
    }

    /// Declares a required field with an explicit schema, overriding the
    /// registry.
    pub fn field_with<S: SchemaLike + 'static>(mut self, name: impl Into<String>, schema: S) -> Self {
        self.fields.push(DeclField {
            name: name.into(),
            source: FieldSource::Schema(Box::new(schema)),
            required: true,
        });
        self
    }

    /// Declares an optional field with an explicit schema.
    pub fn optional_with<S: SchemaLike + 'static>(
        mut self,
        name: impl Into<String>,
        schema: S,
    ) -> Self {
        self.fields.push(DeclField {
            name: name.into(),
            source: FieldSource::Schema(Box::new(schema)),
            required: false,
        });
        self
    }

    /// Makes the built schema reject undeclared keys.
    pub fn deny_unknown_keys(mut self) -> Self {
        self.deny_unknown = true;
        self
    }

    /// Builds an [`ObjectSchema`] by resolving every label against the
    /// registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownType`] naming the first label that
    /// is not registered.
    pub fn build(self, registry: &SchemaRegistry) -> Result<ObjectSchema, RegistryError> {
        let mut schema = ObjectSchema::new();
        for field in self.fields {
            let child = match field.source {
                FieldSource::Label(label) => registry
                    .resolve(&label)
                    .ok_or(RegistryError::UnknownType(label))?,
                FieldSource::Schema(child) => child,
            };
            schema = schema.insert_boxed(field.name, child, field.required);
        }
        if self.deny_unknown {
            schema = schema.deny_unknown_keys();
        }
        Ok(schema)
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a label that already exists.
    #[error("type label '{0}' already registered")]
    DuplicateName(String),

    /// A record declaration referenced a label with no registered factory.
    #[error("type label '{0}' not registered")]
    UnknownType(String),
}
