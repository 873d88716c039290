//! Schemas are immutable after construction and safe to share across
//! threads without locking.

use std::sync::Arc;
use std::thread;

use inquest::{Schema, ValueValidator};
use serde_json::json;

#[test]
fn test_shared_schema_validates_concurrently() {
    let schema = Arc::new(
        Schema::object()
            .field("name", Schema::string().trim().min_len(1))
            .field("scores", Schema::array(Schema::integer().min(0)).max_items(10)),
    );

    let mut handles = Vec::new();
    for t in 0..8 {
        let schema = Arc::clone(&schema);
        handles.push(thread::spawn(move || {
            for i in 0..100 {
                let good = json!({"name": format!("user-{}-{}", t, i), "scores": [i]});
                assert!(schema.validate(&good).is_valid());

                let bad = json!({"name": "", "scores": [-1]});
                assert!(schema.validate(&bad).is_invalid());
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_schema_trait_objects_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}

    let boxed: Box<dyn ValueValidator> = Box::new(Schema::string());
    assert_send_sync(&boxed);

    let schema = Schema::union()
        .variant(Schema::string())
        .variant(Schema::integer());
    assert_send_sync(&schema);
}

#[test]
fn test_repeated_validation_is_deterministic() {
    let schema = Schema::object()
        .field("a", Schema::string())
        .field("b", Schema::integer());
    let input = json!({"a": 1, "b": "x"});

    let first = schema.validate(&input);
    for _ in 0..50 {
        assert_eq!(schema.validate(&input), first);
    }
}

#[test]
fn test_clonable_scalars_validate_identically() {
    let schema = Schema::string().min_len(2).max_len(4);
    let cloned = schema.clone();
    for value in [json!("a"), json!("ab"), json!("abcd"), json!("abcde")] {
        assert_eq!(schema.validate(&value), cloned.validate(&value));
    }
}
