// deeptypes-core - Deep cycle integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Long reference cycles must terminate in every engine, on the default
//! test thread stack.

mod common;

use common::{Value, distinct_in_place, equal, less, recursive, recursive_ptr, sort};

const DEPTHS: [usize; 3] = [100, 250, 500];

#[test]
fn test_long_slice_cycles_order_by_depth() {
    for depth in DEPTHS {
        assert!(less(&recursive(depth), &recursive(depth + 1)).unwrap());
        assert!(!less(&recursive(depth + 1), &recursive(depth)).unwrap());
        assert!(equal(&recursive(depth), &recursive(depth)).unwrap());
    }
}

#[test]
fn test_long_reference_cycles_order_by_depth() {
    for depth in DEPTHS {
        assert!(less(&recursive_ptr(depth), &recursive_ptr(depth + 1)).unwrap());
        assert!(equal(&recursive_ptr(depth), &recursive_ptr(depth)).unwrap());
    }
}

#[test]
fn test_long_cycles_sort() {
    for depth in DEPTHS {
        let mut v = recursive(depth);
        assert!(sort(&mut v).unwrap());
        let mut v = recursive_ptr(depth);
        assert!(sort(&mut v).unwrap());
    }
}

#[test]
fn test_long_cycles_distinct() {
    let mut v = Value::slice(vec![
        recursive(300),
        recursive(2),
        recursive(300),
        recursive(2),
    ]);
    distinct_in_place(&mut v).unwrap();
    let items = v.as_items().unwrap();
    assert_eq!(items.len(), 2);
    assert!(equal(&items[0], &recursive(2)).unwrap());
    assert!(equal(&items[1], &recursive(300)).unwrap());
}
