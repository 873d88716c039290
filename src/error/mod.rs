//! Error types for validation failures.
//!
//! Failures are structured: an [`Invalid`] carries an [`ErrorNode`] tree
//! whose shape mirrors the input (record errors keyed like the record,
//! sequence errors indexed like the sequence). See [`crate::report`] for
//! converting trees into flat, renderable errors.

mod node;

pub use node::{ErrorNode, Invalid, JsonKind, KeyValErrs, PredicateErr};
