//! # Inquest
//!
//! A validation library that accumulates ALL validation errors into typed
//! trees mirroring the shape of the input, rather than short-circuiting on
//! the first failure.
//!
//! ## Overview
//!
//! A schema validates a decoded JSON value ([`serde_json::Value`]) and
//! returns a [`Validated`] outcome: either the typed, possibly coerced
//! result, or an [`Invalid`] carrying an [`ErrorNode`] tree. Container
//! schemas (records, arrays, maps, tuples, sets) visit every child and
//! report every failing member: a record with three broken fields
//! produces one error tree naming all three, keyed exactly like the input.
//!
//! ## Core types
//!
//! - [`Schema`]: entry point for building schemas
//! - [`Validated`]: the `Valid`/`Invalid` outcome of every validation
//! - [`ErrorNode`]: the closed taxonomy of failure shapes
//! - [`report`]: renderers turning error trees into flat or JSON form
//!
//! ## Example
//!
//! ```rust
//! use inquest::{report, Schema, Validated};
//! use serde_json::json;
//!
//! let schema = Schema::object()
//!     .field("name", Schema::string().trim().min_len(1))
//!     .field("age", Schema::integer().non_negative());
//!
//! match schema.validate(&json!({"name": "", "age": -3})) {
//!     Validated::Valid(user) => println!("ok: {:?}", user),
//!     Validated::Invalid(invalid) => {
//!         // both failures are present, addressed by path
//!         for error in report::flatten(&invalid) {
//!             println!("{}", error);
//!         }
//!     }
//! }
//! ```
//!
//! ## Async validation
//!
//! Every schema has an async entry point with identical semantics, so
//! predicates backed by I/O (uniqueness lookups, remote checks) can
//! suspend without blocking. A schema holding async-only checks refuses
//! the synchronous entry point by panicking; skipping a declared check
//! silently is never an option.

pub mod error;
pub mod path;
pub mod registry;
pub mod report;
pub mod schema;
pub mod validated;

pub use error::{ErrorNode, Invalid, JsonKind, KeyValErrs, PredicateErr};
pub use path::{JsonPath, PathSegment};
pub use registry::{RecordDecl, RegistryError, SchemaRegistry};
pub use report::{flatten, to_json, FlatError};
pub use schema::{
    ArraySchema, AsyncCheck, AsyncPredicate, BooleanSchema, BytesSchema, DateSchema,
    DateTimeSchema, DecimalSchema, FloatSchema, IntegerSchema, LazySchema, MapSchema,
    ObjectSchema, OptionalSchema, Predicate, Schema, SchemaLike, SetSchema, StringSchema,
    TupleSchema, UnionSchema, UuidSchema, ValueValidator,
};
pub use validated::Validated;

// Re-exported so downstream code can name the scalar output types without
// depending on the underlying crates directly.
pub use chrono::{DateTime, FixedOffset, NaiveDate};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
