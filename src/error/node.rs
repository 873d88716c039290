//! The error taxonomy: a closed set of failure shapes composable into trees.
//!
//! Every failed validation produces an [`Invalid`] whose [`ErrorNode`]
//! mirrors the shape of the input: record failures are keyed like the
//! record, sequence failures are indexed like the sequence, and so on.
//! Container nodes are always partial: they name only the members that
//! failed; succeeding members never appear.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde_json::Value;

/// The runtime kind of a JSON value.
///
/// Used by type and coercion errors to report what was found or expected.
/// Integers and floats are distinguished even though JSON has a single
/// number production; exact-type schemas rely on the split (an integer
/// schema rejects `1.5`, a float schema rejects `1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonKind {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Array,
    Object,
}

impl JsonKind {
    /// Returns the kind of the given value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Boolean,
            Value::Number(n) => {
                if n.is_f64() {
                    JsonKind::Float
                } else {
                    JsonKind::Integer
                }
            }
            Value::String(_) => JsonKind::String,
            Value::Array(_) => JsonKind::Array,
            Value::Object(_) => JsonKind::Object,
        }
    }
}

impl Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonKind::Null => "null",
            JsonKind::Boolean => "boolean",
            JsonKind::Integer => "integer",
            JsonKind::Float => "float",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
        };
        write!(f, "{}", name)
    }
}

/// A single failed value-level check.
///
/// Carries a machine-readable code (e.g. `min_length`) and a human-readable
/// message. Schemas collect one of these per failing predicate, in
/// declaration order, with no short-circuiting between predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateErr {
    /// Machine-readable code for programmatic handling.
    pub code: String,
    /// Human-readable description of the failed check.
    pub message: String,
}

impl PredicateErr {
    /// Creates a new predicate error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Key and/or value errors from a single entry of a homogeneous map.
///
/// At least one of the two sides is populated; an entry whose key and value
/// both validated never appears in a [`ErrorNode::MapEntries`] node.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValErrs {
    /// The key's failure, if the key failed validation.
    pub key: Option<Invalid>,
    /// The value's failure, if the value failed validation.
    pub val: Option<Invalid>,
}

/// One failure shape in the closed error taxonomy.
///
/// Renderers are expected to match exhaustively over this enum, so the
/// compiler guarantees every failure shape has a defined rendering and
/// adding a variant is a breaking change caught at build time.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorNode {
    /// The input had the wrong runtime shape.
    Type {
        /// The kind that was required.
        expected: JsonKind,
    },

    /// The input's kind was in the schema's compatible set, but conversion
    /// to the destination type failed (e.g. a malformed decimal string).
    Coercion {
        /// The kinds the schema can convert from.
        compatible: Vec<JsonKind>,
        /// The destination type's name.
        dest: &'static str,
    },

    /// The value had the right shape but failed one or more value-level
    /// checks. Declaration order; every failing predicate is present.
    Predicates(Vec<PredicateErr>),

    /// A required key was absent from a record.
    MissingKey,

    /// A record contained keys outside its declared key set.
    ExtraKeys {
        /// The full set of keys the schema declares.
        expected: BTreeSet<String>,
    },

    /// One or more named record fields failed; holds only the failing
    /// fields, in declaration order.
    Keys {
        keys: IndexMap<String, Invalid>,
    },

    /// A sequence failed: sequence-level predicate failures and per-index
    /// failures are reported together under one node. Either list may be
    /// empty, but not both.
    Indexes {
        /// Failed sequence-level checks (length, uniqueness, custom).
        predicates: Vec<PredicateErr>,
        /// Failing positions only; validated positions are absent.
        indexes: BTreeMap<usize, Invalid>,
    },

    /// A homogeneous map failed: map-level predicate failures and per-entry
    /// failures are reported together. Entries are keyed by the original
    /// input key and hold only the failing side(s).
    MapEntries {
        predicates: Vec<PredicateErr>,
        entries: IndexMap<String, KeyValErrs>,
    },

    /// Every variant of a union rejected the value; one entry per attempted
    /// variant, in declared order.
    Variants {
        variants: Vec<Invalid>,
    },

    /// A unique-collection failed: collection-level predicate failures
    /// (size, uniqueness) and member failures together. Member errors are
    /// positionless; each carries the offending raw value.
    Members {
        predicates: Vec<PredicateErr>,
        members: Vec<Invalid>,
    },

    /// A fixed-arity sequence had the wrong number of elements.
    Arity {
        expected: usize,
        actual: usize,
    },

    /// A single-child wrapper's inner schema failed (e.g. a nullable
    /// wrapper around a non-null value).
    Child(Box<Invalid>),

    /// A free-form failure, used by whole-object cross-field checks and
    /// other custom rejections.
    Message(String),
}

/// A failed validation, with enough context to render a message without
/// revisiting the input: the error tree, the raw value that failed, and a
/// stable label naming the schema family that rejected it.
#[derive(Debug, Clone, PartialEq)]
pub struct Invalid {
    /// What went wrong, mirroring the input's shape.
    pub error: ErrorNode,
    /// The raw input value that failed.
    pub value: Value,
    /// Label of the schema family that produced this failure
    /// (e.g. `"string"`, `"object"`, `"union"`).
    pub schema: &'static str,
}

impl Invalid {
    /// Creates a new failure node.
    pub fn new(error: ErrorNode, value: Value, schema: &'static str) -> Self {
        Self {
            error,
            value,
            schema,
        }
    }

    /// Creates a free-form failure, for use in whole-object checks.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Invalid, Schema, Validated};
    /// use serde_json::{json, Value};
    ///
    /// let schema = Schema::object()
    ///     .field("min", Schema::integer())
    ///     .field("max", Schema::integer())
    ///     .check(|obj| {
    ///         if obj["min"].as_i64() > obj["max"].as_i64() {
    ///             let raw = Value::Object(obj);
    ///             Validated::Invalid(Invalid::custom("min must not exceed max", raw))
    ///         } else {
    ///             Validated::Valid(obj)
    ///         }
    ///     });
    ///
    /// let result = schema.validate(&json!({"min": 9, "max": 3}));
    /// assert!(result.is_invalid());
    /// ```
    pub fn custom(message: impl Into<String>, value: Value) -> Self {
        Self {
            error: ErrorNode::Message(message.into()),
            value,
            schema: "check",
        }
    }
}

// The error model is shared freely across threads and tasks; these
// assertions keep that true if the field types ever change.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Invalid>();
    assert_sync::<Invalid>();
    assert_send::<ErrorNode>();
    assert_sync::<ErrorNode>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_kind_of() {
        assert_eq!(JsonKind::of(&json!(null)), JsonKind::Null);
        assert_eq!(JsonKind::of(&json!(true)), JsonKind::Boolean);
        assert_eq!(JsonKind::of(&json!(1)), JsonKind::Integer);
        assert_eq!(JsonKind::of(&json!(1.5)), JsonKind::Float);
        assert_eq!(JsonKind::of(&json!("a")), JsonKind::String);
        assert_eq!(JsonKind::of(&json!([])), JsonKind::Array);
        assert_eq!(JsonKind::of(&json!({})), JsonKind::Object);
    }

    #[test]
    fn test_json_kind_display() {
        assert_eq!(JsonKind::Boolean.to_string(), "boolean");
        assert_eq!(JsonKind::Integer.to_string(), "integer");
        assert_eq!(JsonKind::Object.to_string(), "object");
    }

    #[test]
    fn test_bool_is_not_a_masquerading_integer() {
        // Unlike languages where bool subclasses int, the JSON model keeps
        // the kinds fully distinct.
        assert_ne!(JsonKind::of(&json!(true)), JsonKind::of(&json!(1)));
    }

    #[test]
    fn test_invalid_equality() {
        let a = Invalid::new(
            ErrorNode::Type {
                expected: JsonKind::String,
            },
            json!(1),
            "string",
        );
        let b = Invalid::new(
            ErrorNode::Type {
                expected: JsonKind::String,
            },
            json!(1),
            "string",
        );
        assert_eq!(a, b);

        let c = Invalid::new(
            ErrorNode::Type {
                expected: JsonKind::Integer,
            },
            json!(1),
            "string",
        );
        assert_ne!(a, c);
    }

    #[test]
    fn test_nested_error_tree() {
        let field_err = Invalid::new(
            ErrorNode::Predicates(vec![PredicateErr::new("min_length", "too short")]),
            json!(""),
            "string",
        );
        let mut keys = IndexMap::new();
        keys.insert("name".to_string(), field_err.clone());
        let record_err = Invalid::new(ErrorNode::Keys { keys }, json!({"name": ""}), "object");

        match &record_err.error {
            ErrorNode::Keys { keys } => {
                assert_eq!(keys.get("name"), Some(&field_err));
            }
            other => panic!("expected Keys, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_invalid() {
        let inv = Invalid::custom("fields are inconsistent", json!({}));
        assert_eq!(
            inv.error,
            ErrorNode::Message("fields are inconsistent".to_string())
        );
        assert_eq!(inv.schema, "check");
    }
}
