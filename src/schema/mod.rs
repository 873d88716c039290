//! Schema definitions for validation.
//!
//! Each schema type validates one shape of value and accumulates every
//! failure it finds rather than stopping at the first. Schemas compose:
//! containers hold child schemas for their fields, items, entries, slots,
//! or variants, and failure trees mirror that composition.

mod array;
mod boolean;
mod bytes;
mod combinators;
mod decimal;
mod lazy;
mod map;
mod numeric;
mod object;
mod predicate;
mod set;
mod string;
mod time;
mod traits;
mod tuple;
mod uuid;

pub use self::array::ArraySchema;
pub use self::boolean::BooleanSchema;
pub use self::bytes::BytesSchema;
pub use self::combinators::{OptionalSchema, UnionSchema};
pub use self::decimal::DecimalSchema;
pub use self::lazy::LazySchema;
pub use self::map::MapSchema;
pub use self::numeric::{FloatSchema, IntegerSchema};
pub use self::object::ObjectSchema;
pub use self::predicate::{AsyncCheck, AsyncPredicate, Predicate};
pub use self::set::SetSchema;
pub use self::string::StringSchema;
pub use self::time::{DateSchema, DateTimeSchema};
pub use self::traits::{SchemaLike, ValueValidator};
pub use self::tuple::TupleSchema;
pub use self::uuid::UuidSchema;

/// Entry point for creating validation schemas.
///
/// `Schema` provides factory methods for every schema type. Each returned
/// schema is a builder: chain constraint methods, then call `validate` (or
/// `validate_async`) as many times as needed. Schemas are immutable and
/// freely shareable once built.
///
/// # Example
///
/// ```rust
/// use inquest::Schema;
/// use serde_json::json;
///
/// let user = Schema::object()
///     .field("name", Schema::string().trim().min_len(1))
///     .field("age", Schema::integer().non_negative())
///     .optional("email", Schema::string().email())
///     .deny_unknown_keys();
///
/// assert!(user.validate(&json!({"name": "Ada", "age": 36})).is_valid());
/// ```
pub struct Schema;

impl Schema {
    /// Creates a string schema.
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// Creates an integer schema. Floats are rejected, not truncated.
    pub fn integer() -> IntegerSchema {
        IntegerSchema::new()
    }

    /// Creates a float schema. Integers are rejected unless coercion is
    /// enabled.
    pub fn float() -> FloatSchema {
        FloatSchema::new()
    }

    /// Creates a boolean schema.
    pub fn boolean() -> BooleanSchema {
        BooleanSchema::new()
    }

    /// Creates a decimal schema, coercing from strings and integers.
    pub fn decimal() -> DecimalSchema {
        DecimalSchema::new()
    }

    /// Creates a `YYYY-MM-DD` date schema.
    pub fn date() -> DateSchema {
        DateSchema::new()
    }

    /// Creates an RFC 3339 datetime schema.
    pub fn datetime() -> DateTimeSchema {
        DateTimeSchema::new()
    }

    /// Creates a UUID schema.
    pub fn uuid() -> UuidSchema {
        UuidSchema::new()
    }

    /// Creates a base64 bytes schema.
    pub fn bytes() -> BytesSchema {
        BytesSchema::new()
    }

    /// Creates an object schema with fixed, named fields.
    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }

    /// Creates an array schema applying one schema to every item.
    pub fn array<S: SchemaLike + 'static>(item_schema: S) -> ArraySchema {
        ArraySchema::new(item_schema)
    }

    /// Creates a homogeneous map schema with the given value schema.
    pub fn map<S: SchemaLike + 'static>(value_schema: S) -> MapSchema {
        MapSchema::new(value_schema)
    }

    /// Creates a fixed-arity tuple schema; add slots with
    /// [`TupleSchema::slot`].
    pub fn tuple() -> TupleSchema {
        TupleSchema::new()
    }

    /// Creates a unique-collection schema with the given member schema.
    pub fn set<S: SchemaLike + 'static>(item_schema: S) -> SetSchema {
        SetSchema::new(item_schema)
    }

    /// Creates a union schema; add variants with [`UnionSchema::variant`].
    pub fn union() -> UnionSchema {
        UnionSchema::new()
    }

    /// Creates a nullable wrapper around the given schema.
    pub fn optional<S: SchemaLike + 'static>(inner: S) -> OptionalSchema {
        OptionalSchema::new(inner)
    }

    /// Creates a lazily-resolved schema, enabling recursive definitions.
    pub fn lazy<S, F>(supplier: F) -> LazySchema
    where
        S: SchemaLike + 'static,
        F: Fn() -> S + Send + Sync + 'static,
    {
        LazySchema::new(supplier)
    }
}
