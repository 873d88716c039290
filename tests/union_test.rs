//! Integration tests for union validation.

use inquest::{ErrorNode, Invalid, Schema, Validated};
use serde_json::json;

fn unwrap_invalid<T: std::fmt::Debug>(v: Validated<T>) -> Invalid {
    v.into_result().unwrap_err()
}

#[test]
fn test_first_success_short_circuits_with_tag() {
    let schema = Schema::union()
        .variant(Schema::string().min_len(1))
        .variant(Schema::integer().positive());

    assert_eq!(
        schema.validate(&json!("id-1")),
        Validated::Valid((0, json!("id-1")))
    );
    assert_eq!(schema.validate(&json!(7)), Validated::Valid((1, json!(7))));
}

#[test]
fn test_exhaustive_failure_lists_every_variant_in_order() {
    let schema = Schema::union()
        .variant(Schema::string())
        .variant(Schema::integer());

    let invalid = unwrap_invalid(schema.validate(&json!(true)));
    match invalid.error {
        ErrorNode::Variants { variants } => {
            assert_eq!(variants.len(), 2);
            assert_eq!(variants[0].schema, "string");
            assert_eq!(variants[1].schema, "integer");
        }
        other => panic!("expected Variants, got {:?}", other),
    }
}

#[test]
fn test_variant_failures_keep_their_structure() {
    // a failing record variant still reports its per-field errors
    let schema = Schema::union()
        .variant(Schema::object().field("id", Schema::integer()))
        .variant(Schema::string());

    let invalid = unwrap_invalid(schema.validate(&json!({"id": "nope"})));
    match invalid.error {
        ErrorNode::Variants { variants } => {
            match &variants[0].error {
                ErrorNode::Keys { keys } => assert!(keys.contains_key("id")),
                other => panic!("expected Keys, got {:?}", other),
            }
            assert!(matches!(variants[1].error, ErrorNode::Type { .. }));
        }
        other => panic!("expected Variants, got {:?}", other),
    }
}

#[test]
fn test_union_inside_record() {
    let schema = Schema::object().field(
        "id",
        Schema::union()
            .variant(Schema::string().min_len(1))
            .variant(Schema::integer().positive()),
    );

    assert!(schema.validate(&json!({"id": "abc"})).is_valid());
    assert!(schema.validate(&json!({"id": 12})).is_valid());

    let invalid = unwrap_invalid(schema.validate(&json!({"id": -1})));
    match invalid.error {
        ErrorNode::Keys { keys } => {
            assert!(matches!(keys["id"].error, ErrorNode::Variants { .. }));
        }
        other => panic!("expected Keys, got {:?}", other),
    }
}

#[test]
fn test_overlapping_variants_prefer_declaration_order() {
    // both variants accept any integer; the first declared one owns it
    let schema = Schema::union()
        .variant(Schema::integer())
        .variant(Schema::integer().positive());
    assert_eq!(schema.validate(&json!(5)), Validated::Valid((0, json!(5))));
}
