// deeptypes - Structural ordering and deep sorting for runtime values
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # deeptypes
//!
//! Generic structural ordering, equality and in-place deep sorting over
//! values whose shape is only known at runtime.
//!
//! ```rust
//! use deeptypes::{Value, less, sort};
//!
//! let mut v = Value::ints(&[3, 1, 2]);
//! assert!(sort(&mut v).unwrap());
//! assert_eq!(v.to_string(), "[1 2 3]");
//! assert!(less(&Value::ints(&[9]), &Value::ints(&[0, 0])).unwrap());
//! ```
//!
//! Statically typed data goes through [`IntoValue`] and [`FromValue`]:
//!
//! ```rust
//! let words: Vec<String> = ["b", "a", "b"].map(String::from).to_vec();
//! assert_eq!(deeptypes::distinct(words).unwrap(), vec!["a", "b"]);
//! ```

pub mod convert;

pub use convert::{FromValue, IntoValue, from_value, to_value};
pub use deeptypes_core::{
    Error, Result, Visited, compare, distinct_in_place, equal, less, less_equal, sort,
    to_ordering,
};
pub use deeptypes_value::{
    Channel, Field, Map, Opaque, OpaqueKind, Ref, Shape, Struct, Value, Visibility,
    get_print_length, identity, new_ref, set_print_length,
};

/// Deeply sort a typed value and convert it back.
///
/// The value is sorted through a reference, so fixed-size arrays are
/// reordered too.
pub fn sorted<T: IntoValue + FromValue>(value: T) -> Result<T> {
    let cell = new_ref(value.into_value());
    sort(&mut Value::ptr_to(&cell))?;
    let inner = cell.borrow();
    T::from_value(&inner)
}

/// Sort typed items and drop duplicates under structural equality.
pub fn distinct<T: IntoValue + FromValue>(items: Vec<T>) -> Result<Vec<T>> {
    let mut value = items.into_value();
    distinct_in_place(&mut value)?;
    Vec::<T>::from_value(&value)
}
