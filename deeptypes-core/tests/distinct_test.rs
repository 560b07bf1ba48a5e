// deeptypes-core - Distinct integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for in-place sort-and-deduplicate.
//!
//! Tests for: integer slices, references to slices, structs with private
//! fields, cyclic values and invalid arguments

mod common;

use common::{Error, Struct, Value, distinct_in_place, equal, new_ref, recursive};

fn distinct_ints(input: &[i64]) -> Value {
    let mut v = Value::ints(input);
    distinct_in_place(&mut v).expect("distinct failed");
    v
}

// =============================================================================
// Integers
// =============================================================================

#[test]
fn test_distinct_ints() {
    let cases: &[(&[i64], &[i64])] = &[
        (&[], &[]),
        (&[1], &[1]),
        (&[1, 2, 3, 4, 5], &[1, 2, 3, 4, 5]),
        (&[5, 4, 3, 2, 1], &[1, 2, 3, 4, 5]),
        (&[1, 2, 2, 3, 4, 5], &[1, 2, 3, 4, 5]),
        (&[3, 2, 4, 5, 3, 4, 2, 5], &[2, 3, 4, 5]),
        (
            &[1, 2, 2, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 4, 4],
            &[1, 2, 3, 4],
        ),
    ];
    for (input, expected) in cases {
        let got = distinct_ints(input);
        assert!(
            got.identical(&Value::ints(expected)),
            "distinct({:?}) = {}, expected {:?}",
            input,
            got,
            expected
        );
    }
}

#[test]
fn test_distinct_through_reference() {
    let cell = new_ref(Value::ints(&[3, 3, 1, 2, 1]));
    let mut v = Value::ptr_to(&cell);
    distinct_in_place(&mut v).unwrap();
    assert!(cell.borrow().identical(&Value::ints(&[1, 2, 3])));
}

#[test]
fn test_distinct_nan_collapses() {
    let mut v = Value::slice(vec![
        Value::float(f64::NAN),
        Value::float(1.0),
        Value::float(f64::NAN),
    ]);
    distinct_in_place(&mut v).unwrap();
    let shown: Vec<String> = v.as_items().unwrap().iter().map(|x| x.to_string()).collect();
    assert_eq!(shown, vec!["NaN", "1"]);
}

#[test]
fn test_nested_sequences_compare_as_given() {
    let mut v = Value::slice(vec![
        Value::ints(&[2, 1]),
        Value::ints(&[1, 2]),
        Value::ints(&[2, 1]),
    ]);
    distinct_in_place(&mut v).unwrap();
    assert_eq!(v.to_string(), "[[1 2] [2 1]]");
}

// =============================================================================
// Structs and references
// =============================================================================

fn tagged(key: i64, note: &str) -> Value {
    Struct::new("tagged")
        .with_field("Key", Value::int(key))
        .with_private_field("note", Value::string(note))
        .into()
}

#[test]
fn test_private_fields_do_not_distinguish() {
    let mut v = Value::slice(vec![tagged(2, "x"), tagged(1, "y"), tagged(2, "z")]);
    distinct_in_place(&mut v).unwrap();
    let items = v.as_items().unwrap();
    assert_eq!(items.len(), 2);
    assert!(equal(&items[0], &tagged(1, "")).unwrap());
    assert!(equal(&items[1], &tagged(2, "")).unwrap());
}

#[test]
fn test_distinct_references_by_target() {
    let mut v = Value::slice(vec![
        Value::ptr(Value::string("b")),
        Value::ptr(Value::string("a")),
        Value::ptr(Value::string("b")),
        Value::nil_ptr(),
        Value::nil_ptr(),
    ]);
    distinct_in_place(&mut v).unwrap();
    assert_eq!(v.to_string(), "[<nil> &\"a\" &\"b\"]");
}

#[test]
fn test_distinct_recursive() {
    let mut v = Value::slice(vec![
        recursive(3),
        recursive(1),
        recursive(1),
        recursive(1),
        recursive(3),
    ]);
    distinct_in_place(&mut v).unwrap();
    let items = v.as_items().unwrap();
    assert_eq!(items.len(), 2);
    assert!(equal(&items[0], &recursive(1)).unwrap());
    assert!(equal(&items[1], &recursive(3)).unwrap());
}

// =============================================================================
// Invalid arguments
// =============================================================================

#[test]
fn test_rejects_non_slices() {
    for mut v in [
        Value::int(1),
        Value::array(vec![Value::int(2), Value::int(1)]),
        Value::map(Vec::new()),
        Value::nil_ptr(),
    ] {
        let err = distinct_in_place(&mut v).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }), "{}", err);
    }
}

#[test]
fn test_reference_to_array_rejected() {
    let mut v = Value::ptr(Value::array(vec![Value::int(1)]));
    let err = distinct_in_place(&mut v).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid argument: expected slice or reference to slice, got reference to array"
    );
}

#[test]
fn test_mixed_shapes_fail() {
    let mut v = Value::slice(vec![Value::int(1), Value::bool(true)]);
    assert!(matches!(
        distinct_in_place(&mut v),
        Err(Error::ShapeMismatch { .. })
    ));
}
