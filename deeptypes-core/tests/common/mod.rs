// deeptypes-core - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared builders and helpers for deeptypes integration tests.
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Available Helpers
//!
//! - [`recursive`] - A struct whose slice field closes a reference cycle
//! - [`recursive_ptr`] - A struct whose reference field closes a cycle
//! - [`record`] - A struct with public fields `A`, `G` and private `h`
//!
//! # Macros
//!
//! - [`assert_less_equal!`] - Check `less`, `equal` and `compare` together

#![allow(dead_code, unused_imports)]

pub use deeptypes_core::{
    Error, Map, Struct, Value, compare, distinct_in_place, equal, less, new_ref, sort,
};

/// Build `recursive{Inner []*recursive}` of the given depth.
///
/// The chain of `depth` cells ends with a reference back to the first
/// one. The returned value is a copy of the first cell's contents, so it
/// shares every cell but is not itself one of them.
#[must_use]
pub fn recursive(depth: usize) -> Value {
    cycle(depth, "recursive", |next| Value::slice(vec![next]))
}

/// Build `recursive2{Inner *recursive2}` of the given depth.
#[must_use]
pub fn recursive_ptr(depth: usize) -> Value {
    cycle(depth, "recursive2", |next| next)
}

fn cycle(depth: usize, name: &str, wrap: impl Fn(Value) -> Value) -> Value {
    assert!(depth > 0, "cycle depth must be positive");
    let cells: Vec<_> = (0..depth).map(|_| new_ref(Value::nil_ptr())).collect();
    for (i, cell) in cells.iter().enumerate() {
        let next = Value::ptr_to(&cells[(i + 1) % depth]);
        *cell.borrow_mut() = Struct::new(name).with_field("Inner", wrap(next)).into();
    }
    let root = cells[0].borrow().clone();
    root
}

/// Build an instance of a small struct type with two public fields and
/// one private field.
#[must_use]
pub fn record(a: i64, g: bool, h: i64) -> Value {
    Struct::new("record")
        .with_field("A", Value::int(a))
        .with_field("G", Value::bool(g))
        .with_private_field("h", Value::int(h))
        .into()
}

/// Assert the `(less, equal)` verdict for two values, and that `compare`
/// agrees with it.
///
/// # Example
///
/// ```ignore
/// assert_less_equal!(Value::int(0), Value::int(1), true, false);
/// ```
#[macro_export]
macro_rules! assert_less_equal {
    ($l:expr, $r:expr, $less:expr, $equal:expr) => {{
        let l = $l;
        let r = $r;
        let lt = $crate::common::less(&l, &r).expect("less failed");
        let eq = $crate::common::equal(&l, &r).expect("equal failed");
        assert_eq!(lt, $less, "less({}, {})", l, r);
        assert_eq!(eq, $equal, "equal({}, {})", l, r);
        let expected = if $less {
            std::cmp::Ordering::Less
        } else if $equal {
            std::cmp::Ordering::Equal
        } else {
            std::cmp::Ordering::Greater
        };
        let cmp = $crate::common::compare(&l, &r).expect("compare failed");
        assert_eq!(cmp, expected, "compare({}, {})", l, r);
    }};
}
