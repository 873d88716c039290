//! Integration tests for the scalar schema family.

use inquest::{Decimal, ErrorNode, Invalid, JsonKind, Schema, Validated};
use serde_json::json;

fn unwrap_invalid<T: std::fmt::Debug>(v: Validated<T>) -> Invalid {
    v.into_result().unwrap_err()
}

#[test]
fn test_exact_type_checks_do_not_cross() {
    // each scalar accepts exactly its own kind
    assert!(Schema::string().validate(&json!(1)).is_invalid());
    assert!(Schema::integer().validate(&json!("1")).is_invalid());
    assert!(Schema::integer().validate(&json!(1.0)).is_invalid());
    assert!(Schema::float().validate(&json!(1)).is_invalid());
    assert!(Schema::boolean().validate(&json!(0)).is_invalid());
    assert!(Schema::boolean().validate(&json!(1)).is_invalid());
}

#[test]
fn test_every_failing_predicate_is_reported() {
    let schema = Schema::string().min_len(10).pattern(r"^\d+$").unwrap().not_blank();
    let invalid = unwrap_invalid(schema.validate(&json!("   ")));
    match invalid.error {
        ErrorNode::Predicates(preds) => {
            let codes: Vec<_> = preds.iter().map(|p| p.code.as_str()).collect();
            // declaration order, no short-circuit after the first failure
            assert_eq!(codes, vec!["min_length", "pattern", "not_blank"]);
        }
        other => panic!("expected Predicates, got {:?}", other),
    }
}

#[test]
fn test_decimal_preserves_precision_where_float_would_not() {
    let schema = Schema::decimal();
    let d = schema.validate(&json!("0.30")).into_result().unwrap();
    assert_eq!(d, "0.30".parse::<Decimal>().unwrap());
    assert_eq!(d.to_string(), "0.30");
}

#[test]
fn test_coercing_scalars_report_compatible_kinds() {
    let invalid = unwrap_invalid(Schema::decimal().validate(&json!(true)));
    assert_eq!(
        invalid.error,
        ErrorNode::Coercion {
            compatible: vec![JsonKind::String, JsonKind::Integer],
            dest: "decimal",
        }
    );

    let invalid = unwrap_invalid(Schema::date().validate(&json!("01-15-2024")));
    assert_eq!(
        invalid.error,
        ErrorNode::Coercion {
            compatible: vec![JsonKind::String],
            dest: "date",
        }
    );
}

#[test]
fn test_datetime_round_trips_through_value_output() {
    use inquest::SchemaLike;

    let schema = Schema::datetime();
    let out = schema
        .validate_to_value(&json!("2024-06-01T12:00:00+00:00"))
        .into_result()
        .unwrap();
    assert_eq!(out, json!("2024-06-01T12:00:00+00:00"));
}

#[test]
fn test_uuid_and_bytes() {
    assert!(Schema::uuid()
        .validate(&json!("a5f9f8c4-6f5b-4a0e-9c3d-2b8f1e7a6d01"))
        .is_valid());
    assert!(Schema::uuid().validate(&json!("xyz")).is_invalid());

    assert_eq!(
        Schema::bytes().validate(&json!("aGVsbG8=")),
        Validated::Valid(b"hello".to_vec())
    );
    assert!(Schema::bytes().validate(&json!("%%%")).is_invalid());
}

#[test]
fn test_preprocessing_happens_before_predicates() {
    let schema = Schema::string().trim().lowercase().exact_len(3);
    assert_eq!(
        schema.validate(&json!("  ABC  ")),
        Validated::Valid("abc".to_string())
    );
}

#[test]
fn test_predicates_never_mutate_input() {
    let schema = Schema::string().min_len(1);
    let input = json!("hello");
    let before = input.clone();
    let _ = schema.validate(&input);
    assert_eq!(input, before);
}

#[test]
fn test_totality_no_panic_on_any_shape() {
    // every scalar schema terminates with Valid or Invalid on every kind
    let values = [
        json!(null),
        json!(true),
        json!(0),
        json!(-1),
        json!(1.5),
        json!(""),
        json!("text"),
        json!([1, 2]),
        json!({"k": "v"}),
        json!(u64::MAX),
    ];
    for value in &values {
        let _ = Schema::string().validate(value);
        let _ = Schema::integer().validate(value);
        let _ = Schema::float().validate(value);
        let _ = Schema::boolean().validate(value);
        let _ = Schema::decimal().validate(value);
        let _ = Schema::date().validate(value);
        let _ = Schema::datetime().validate(value);
        let _ = Schema::uuid().validate(value);
        let _ = Schema::bytes().validate(value);
    }
}
