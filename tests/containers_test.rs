//! Integration tests for array, map, tuple, and set validation.

use inquest::{ErrorNode, Invalid, JsonKind, Schema, Validated};
use serde_json::json;

fn unwrap_invalid<T: std::fmt::Debug>(v: Validated<T>) -> Invalid {
    v.into_result().unwrap_err()
}

#[test]
fn test_array_index_errors_are_partial_and_typed() {
    let schema = Schema::array(Schema::integer().min(0));
    let invalid = unwrap_invalid(schema.validate(&json!([1, -1, "x"])));

    match &invalid.error {
        ErrorNode::Indexes { predicates, indexes } => {
            assert!(predicates.is_empty());
            assert_eq!(indexes.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
            match &indexes[&1].error {
                ErrorNode::Predicates(preds) => assert_eq!(preds[0].code, "min_value"),
                other => panic!("expected Predicates, got {:?}", other),
            }
            assert_eq!(
                indexes[&2].error,
                ErrorNode::Type {
                    expected: JsonKind::Integer
                }
            );
        }
        other => panic!("expected Indexes, got {:?}", other),
    }
}

#[test]
fn test_array_sequence_predicates_do_not_suppress_item_errors() {
    let schema = Schema::array(Schema::integer().positive()).min_items(5).unique();
    let invalid = unwrap_invalid(schema.validate(&json!([1, -2, 1])));

    match &invalid.error {
        ErrorNode::Indexes { predicates, indexes } => {
            let codes: Vec<_> = predicates.iter().map(|p| p.code.as_str()).collect();
            assert_eq!(codes, vec!["min_items", "unique"]);
            assert_eq!(indexes.keys().copied().collect::<Vec<_>>(), vec![1]);
        }
        other => panic!("expected Indexes, got {:?}", other),
    }
}

#[test]
fn test_array_of_records_paths() {
    let schema = Schema::array(
        Schema::object()
            .field("name", Schema::string().min_len(1))
            .field("age", Schema::integer().positive()),
    );
    let invalid = unwrap_invalid(schema.validate(&json!([
        {"name": "", "age": 30},
        {"name": "Bob", "age": -5}
    ])));

    match &invalid.error {
        ErrorNode::Indexes { indexes, .. } => {
            match &indexes[&0].error {
                ErrorNode::Keys { keys } => assert!(keys.contains_key("name")),
                other => panic!("expected Keys, got {:?}", other),
            }
            match &indexes[&1].error {
                ErrorNode::Keys { keys } => assert!(keys.contains_key("age")),
                other => panic!("expected Keys, got {:?}", other),
            }
        }
        other => panic!("expected Indexes, got {:?}", other),
    }
}

#[test]
fn test_map_failures_keyed_by_original_key() {
    let schema = Schema::map(Schema::integer());
    let invalid = unwrap_invalid(schema.validate(&json!({"a": 1, "b": "x"})));

    match &invalid.error {
        ErrorNode::MapEntries { entries, .. } => {
            assert_eq!(entries.len(), 1);
            let kv = &entries["b"];
            assert!(kv.key.is_none());
            assert_eq!(
                kv.val.as_ref().unwrap().error,
                ErrorNode::Type {
                    expected: JsonKind::Integer
                }
            );
        }
        other => panic!("expected MapEntries, got {:?}", other),
    }
}

#[test]
fn test_map_validated_keys_rekey_output() {
    let schema = Schema::map(Schema::integer()).keys(Schema::string().trim());
    let map = schema
        .validate(&json!({" padded ": 9}))
        .into_result()
        .unwrap();
    assert_eq!(map.get("padded"), Some(&json!(9)));
}

#[test]
fn test_tuple_arity_precedes_slot_validation() {
    let schema = Schema::tuple()
        .slot(Schema::string())
        .slot(Schema::integer());

    let invalid = unwrap_invalid(schema.validate(&json!([1, 2, 3])));
    assert_eq!(
        invalid.error,
        ErrorNode::Arity {
            expected: 2,
            actual: 3
        }
    );
}

#[test]
fn test_tuple_heterogeneous_slots() {
    let schema = Schema::tuple()
        .slot(Schema::string())
        .slot(Schema::integer())
        .slot(Schema::boolean());

    assert!(schema.validate(&json!(["x", 1, true])).is_valid());

    let invalid = unwrap_invalid(schema.validate(&json!([1, "x", 0])));
    match &invalid.error {
        ErrorNode::Indexes { indexes, .. } => {
            assert_eq!(indexes.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
        }
        other => panic!("expected Indexes, got {:?}", other),
    }
}

#[test]
fn test_set_rejects_duplicates_and_bad_members_together() {
    let schema = Schema::set(Schema::integer());
    let invalid = unwrap_invalid(schema.validate(&json!([1, 1, "x"])));

    match &invalid.error {
        ErrorNode::Members { predicates, members } => {
            assert_eq!(predicates[0].code, "unique");
            assert_eq!(members.len(), 1);
            assert_eq!(members[0].value, json!("x"));
        }
        other => panic!("expected Members, got {:?}", other),
    }
}

#[test]
fn test_optional_wraps_failures_and_passes_null() {
    let schema = Schema::optional(Schema::integer().positive());

    assert!(schema.validate(&json!(null)).is_valid());
    assert!(schema.validate(&json!(3)).is_valid());

    let invalid = unwrap_invalid(schema.validate(&json!(-3)));
    match invalid.error {
        ErrorNode::Child(child) => {
            assert!(matches!(child.error, ErrorNode::Predicates(_)));
        }
        other => panic!("expected Child, got {:?}", other),
    }
}

#[test]
fn test_containers_compose_arbitrarily() {
    // map of arrays of (name, score) tuples
    let schema = Schema::map(Schema::array(
        Schema::tuple()
            .slot(Schema::string().min_len(1))
            .slot(Schema::integer().non_negative()),
    ));

    assert!(schema
        .validate(&json!({"round1": [["ada", 10], ["bob", 7]]}))
        .is_valid());

    let invalid = unwrap_invalid(schema.validate(&json!({"round1": [["ada", -1]]})));
    match &invalid.error {
        ErrorNode::MapEntries { entries, .. } => {
            let inner = entries["round1"].val.as_ref().unwrap();
            assert!(matches!(inner.error, ErrorNode::Indexes { .. }));
        }
        other => panic!("expected MapEntries, got {:?}", other),
    }
}
