//! Rendering error trees for humans and machines.
//!
//! The error model is a tree mirroring the input; this module converts it
//! into consumable forms: [`flatten`] produces path-addressed flat errors
//! (one per leaf failure), [`to_json`] produces a JSON structure shaped
//! like the input with message lists at the failure points.
//!
//! Every function here matches exhaustively over [`ErrorNode`] with no
//! catch-all arm: a new error variant fails compilation until a rendering
//! is defined for it.

use std::collections::BTreeSet;
use std::fmt::{self, Display};

use serde_json::{json, Map, Value};

use crate::error::{ErrorNode, Invalid, JsonKind, PredicateErr};
use crate::path::JsonPath;

/// A single rendered failure with the path where it occurred.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatError {
    /// Where in the input the failure occurred.
    pub path: JsonPath,
    /// Machine-readable code (e.g. `invalid_type`, `min_length`).
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl FlatError {
    fn new(path: &JsonPath, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.clone(),
            code: code.into(),
            message: message.into(),
        }
    }
}

impl Display for FlatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Converts an error tree into a flat list of path-addressed errors.
///
/// # Example
///
/// ```rust
/// use inquest::{report, Schema, Validated};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("name", Schema::string().min_len(1))
///     .field("scores", Schema::array(Schema::integer()));
///
/// let result = schema.validate(&json!({"name": "", "scores": [1, "x"]}));
/// let invalid = match result {
///     Validated::Invalid(invalid) => invalid,
///     Validated::Valid(_) => panic!("expected failure"),
/// };
///
/// let flat = report::flatten(&invalid);
/// let paths: Vec<String> = flat.iter().map(|e| e.path.to_string()).collect();
/// assert_eq!(paths, vec!["name", "scores[1]"]);
/// ```
pub fn flatten(invalid: &Invalid) -> Vec<FlatError> {
    let mut out = Vec::new();
    walk(invalid, &JsonPath::root(), &mut out);
    out
}

fn walk(invalid: &Invalid, path: &JsonPath, out: &mut Vec<FlatError>) {
    match &invalid.error {
        ErrorNode::Type { expected } => {
            out.push(FlatError::new(
                path,
                "invalid_type",
                format!("expected {}", described(*expected)),
            ));
        }
        ErrorNode::Coercion { compatible, dest } => {
            out.push(FlatError::new(path, "coercion", coercion_message(compatible, dest)));
        }
        ErrorNode::Predicates(predicates) => {
            for p in predicates {
                out.push(FlatError::new(path, p.code.clone(), p.message.clone()));
            }
        }
        ErrorNode::MissingKey => {
            out.push(FlatError::new(path, "required", "key missing"));
        }
        ErrorNode::ExtraKeys { expected } => {
            out.push(FlatError::new(path, "unknown_keys", extra_keys_message(expected)));
        }
        ErrorNode::Keys { keys } => {
            for (name, child) in keys {
                walk(child, &path.push_field(name.as_str()), out);
            }
        }
        ErrorNode::Indexes { predicates, indexes } => {
            for p in predicates {
                out.push(FlatError::new(path, p.code.clone(), p.message.clone()));
            }
            for (index, child) in indexes {
                walk(child, &path.push_index(*index), out);
            }
        }
        ErrorNode::MapEntries { predicates, entries } => {
            for p in predicates {
                out.push(FlatError::new(path, p.code.clone(), p.message.clone()));
            }
            for (key, kv) in entries {
                let entry_path = path.push_field(key.as_str());
                if let Some(key_err) = &kv.key {
                    walk_prefixed(key_err, &entry_path, "invalid key: ", out);
                }
                if let Some(val_err) = &kv.val {
                    walk(val_err, &entry_path, out);
                }
            }
        }
        ErrorNode::Variants { variants } => {
            for (index, attempt) in variants.iter().enumerate() {
                walk_prefixed(attempt, path, &format!("variant {}: ", index), out);
            }
        }
        ErrorNode::Members { predicates, members } => {
            for p in predicates {
                out.push(FlatError::new(path, p.code.clone(), p.message.clone()));
            }
            for member in members {
                walk_prefixed(member, path, "member: ", out);
            }
        }
        ErrorNode::Arity { expected, actual } => {
            out.push(FlatError::new(
                path,
                "arity",
                format!("expected an array of length {}, got {}", expected, actual),
            ));
        }
        ErrorNode::Child(child) => {
            walk(child, path, out);
        }
        ErrorNode::Message(message) => {
            out.push(FlatError::new(path, "invalid", message.clone()));
        }
    }
}

fn walk_prefixed(invalid: &Invalid, path: &JsonPath, prefix: &str, out: &mut Vec<FlatError>) {
    let mut sub = Vec::new();
    walk(invalid, path, &mut sub);
    for mut e in sub {
        e.message = format!("{}{}", prefix, e.message);
        out.push(e);
    }
}

/// Converts an error tree into a JSON structure mirroring the input.
///
/// Leaf failures become arrays of messages; record and map failures become
/// objects keyed like the input; sequence failures become `[index, errors]`
/// pairs. Container-level failures that have no key of their own use the
/// reserved keys `"__container__"` and `"__unknown_keys__"`.
pub fn to_json(invalid: &Invalid) -> Value {
    match &invalid.error {
        ErrorNode::Type { expected } => {
            let message = format!("expected {}", described(*expected));
            match expected {
                JsonKind::Object | JsonKind::Array => json!({ "__container__": [message] }),
                JsonKind::Null
                | JsonKind::Boolean
                | JsonKind::Integer
                | JsonKind::Float
                | JsonKind::String => json!([message]),
            }
        }
        ErrorNode::Coercion { compatible, dest } => {
            json!([coercion_message(compatible, dest)])
        }
        ErrorNode::Predicates(predicates) => messages(predicates),
        ErrorNode::MissingKey => json!(["key missing"]),
        ErrorNode::ExtraKeys { expected } => {
            json!({ "__unknown_keys__": extra_keys_message(expected) })
        }
        ErrorNode::Keys { keys } => {
            let mut obj = Map::new();
            for (name, child) in keys {
                obj.insert(name.clone(), to_json(child));
            }
            Value::Object(obj)
        }
        ErrorNode::Indexes { predicates, indexes } => {
            let items: Vec<Value> = indexes
                .iter()
                .map(|(index, child)| json!([index, to_json(child)]))
                .collect();
            if predicates.is_empty() {
                Value::Array(items)
            } else {
                json!({ "__container__": messages(predicates), "items": items })
            }
        }
        ErrorNode::MapEntries { predicates, entries } => {
            let mut obj = Map::new();
            if !predicates.is_empty() {
                obj.insert("__container__".to_string(), messages(predicates));
            }
            for (key, kv) in entries {
                let mut sides = Map::new();
                if let Some(key_err) = &kv.key {
                    sides.insert("key".to_string(), to_json(key_err));
                }
                if let Some(val_err) = &kv.val {
                    sides.insert("value".to_string(), to_json(val_err));
                }
                obj.insert(key.clone(), Value::Object(sides));
            }
            Value::Object(obj)
        }
        ErrorNode::Variants { variants } => {
            json!({ "variants": variants.iter().map(to_json).collect::<Vec<_>>() })
        }
        ErrorNode::Members { predicates, members } => {
            let mut obj = Map::new();
            if !predicates.is_empty() {
                obj.insert("__container__".to_string(), messages(predicates));
            }
            obj.insert(
                "member_errors".to_string(),
                Value::Array(members.iter().map(to_json).collect()),
            );
            Value::Object(obj)
        }
        ErrorNode::Arity { expected, actual } => {
            json!([format!("expected an array of length {}, got {}", expected, actual)])
        }
        ErrorNode::Child(child) => to_json(child),
        ErrorNode::Message(message) => json!([message]),
    }
}

fn messages(predicates: &[PredicateErr]) -> Value {
    Value::Array(
        predicates
            .iter()
            .map(|p| Value::String(p.message.clone()))
            .collect(),
    )
}

fn described(kind: JsonKind) -> String {
    match kind {
        JsonKind::Null => "null".to_string(),
        JsonKind::Integer | JsonKind::Array | JsonKind::Object => format!("an {}", kind),
        JsonKind::Boolean | JsonKind::Float | JsonKind::String => format!("a {}", kind),
    }
}

fn coercion_message(compatible: &[JsonKind], dest: &str) -> String {
    let kinds: Vec<String> = compatible.iter().map(|k| k.to_string()).collect();
    format!(
        "could not coerce to {} (compatible with {})",
        dest,
        kinds.join(", ")
    )
}

fn extra_keys_message(expected: &BTreeSet<String>) -> String {
    if expected.is_empty() {
        "expected an empty object".to_string()
    } else {
        let keys: Vec<String> = expected.iter().map(|k| format!("'{}'", k)).collect();
        format!("only expected {}", keys.join(", "))
    }
}

impl Display for Invalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flat = flatten(self);
        writeln!(f, "Validation failed with {} error(s):", flat.len())?;
        for (i, error) in flat.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for Invalid {}
