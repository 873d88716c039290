//! Integration tests for lazy and recursive schema definitions.

use inquest::{ErrorNode, Invalid, ObjectSchema, Schema, Validated};
use serde_json::json;

fn unwrap_invalid<T: std::fmt::Debug>(v: Validated<T>) -> Invalid {
    v.into_result().unwrap_err()
}

/// A singly-linked list: a value plus an optional tail.
fn linked_list() -> ObjectSchema {
    Schema::object()
        .field("value", Schema::integer())
        .optional("next", Schema::lazy(linked_list))
}

#[test]
fn test_self_recursive_schema() {
    let schema = linked_list();

    assert!(schema.validate(&json!({"value": 1})).is_valid());
    assert!(schema
        .validate(&json!({"value": 1, "next": {"value": 2, "next": {"value": 3}}}))
        .is_valid());
}

#[test]
fn test_recursive_failure_reported_at_depth() {
    let schema = linked_list();
    let invalid = unwrap_invalid(schema.validate(&json!({
        "value": 1,
        "next": {"value": 2, "next": {"value": "three"}}
    })));

    let flat = inquest::report::flatten(&invalid);
    assert_eq!(flat.len(), 1);
    assert_eq!(flat[0].path.to_string(), "next.next.value");
}

/// Mutually recursive schemas: a tree alternates between two node kinds.
fn branch() -> ObjectSchema {
    Schema::object()
        .field("label", Schema::string())
        .field("leaves", Schema::array(Schema::lazy(leaf)))
}

fn leaf() -> ObjectSchema {
    Schema::object()
        .field("weight", Schema::integer())
        .optional("subtree", Schema::lazy(branch))
}

#[test]
fn test_mutually_recursive_schemas() {
    let schema = branch();
    let result = schema.validate(&json!({
        "label": "root",
        "leaves": [
            {"weight": 1},
            {"weight": 2, "subtree": {"label": "nested", "leaves": []}}
        ]
    }));
    assert!(result.is_valid());
}

#[test]
fn test_deep_recursion_bounded_by_data() {
    // 200 levels of nesting still terminates: the supplier only resolves
    // as deep as the input actually nests
    let mut value = json!({"value": 0});
    for i in 1..200 {
        value = json!({"value": i, "next": value});
    }
    assert!(linked_list().validate(&value).is_valid());
}

#[test]
fn test_recurrent_flag_for_introspection() {
    let cyclic = Schema::lazy(linked_list);
    assert!(cyclic.is_recurrent());

    let forward = Schema::lazy(|| Schema::string()).forward_only();
    assert!(!forward.is_recurrent());
}

#[test]
fn test_lazy_failure_keeps_inner_error_shape() {
    let schema = Schema::lazy(|| Schema::integer().positive());
    let invalid = unwrap_invalid(schema.validate(&json!(-2)));
    assert!(matches!(invalid.error, ErrorNode::Predicates(_)));
}
