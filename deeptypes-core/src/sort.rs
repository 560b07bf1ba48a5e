// deeptypes-core - Deep in-place sorting
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Sort every sequence reachable inside a value.
//!
//! The traversal follows references, public struct fields and map values.
//! A sequence found that way is reordered but its elements are not entered,
//! so sequences nested inside a sequence keep their own order. Map keys are
//! left alone and maps themselves impose no order. Whether storage may be
//! rewritten depends on how it was reached: the root is visited as a
//! by-value operand, a dereferenced target is addressable, struct fields
//! inherit their struct's addressability and map values never are. An
//! array that is not addressable is left untouched.

use std::cmp::Ordering;

use deeptypes_value::Value;
use tracing::{debug, trace};

use crate::error::Result;
use crate::order::{compare_or_record, float_lt, to_ordering};
use crate::visited::Visited;

/// Sort every array and slice reachable within `value`, in place.
///
/// Elements are ordered ascending by the rules of [`crate::less`]. Returns
/// whether the root itself could be sorted: false for leaf shapes and for
/// a non-empty array passed directly (wrap it in a reference to sort it).
///
/// Fails with a shape mismatch if a sequence holds values of different
/// shapes; that sequence may be left partially reordered.
///
/// Every reference cell reached is borrowed mutably while its target is
/// visited, so none may be borrowed elsewhere during the call.
pub fn sort(value: &mut Value) -> Result<bool> {
    debug!(shape = %value.shape(), "deep sort");
    sort_value(&mut Visited::new(), value, false)
}

fn sort_value(visited: &mut Visited, value: &mut Value, addressable: bool) -> Result<bool> {
    match value {
        Value::Ptr(None) => Ok(true),
        Value::Ptr(Some(target)) => {
            if !visited.enter(target) {
                trace!("skipping reference already being sorted");
                return Ok(true);
            }
            let sortable = sort_value(visited, &mut target.borrow_mut(), true);
            visited.leave(target);
            sortable
        }
        Value::Array(items) => {
            if items.is_empty() {
                return Ok(true);
            }
            if !addressable {
                trace!(len = items.len(), "array held by value, left unsorted");
                return Ok(false);
            }
            sort_items(visited, items)?;
            Ok(true)
        }
        Value::Slice(items) => {
            sort_items(visited, items)?;
            Ok(true)
        }
        Value::Map(map) => {
            for (key, item) in map.iter_mut() {
                sort_value(visited, item, false).map_err(|e| e.at(format!("[{}]", key)))?;
            }
            Ok(true)
        }
        Value::Struct(s) => {
            for field in s.public_fields_mut() {
                sort_value(visited, &mut field.value, addressable)
                    .map_err(|e| e.at(&*field.name))?;
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Sort a run of elements in place. The elements themselves are not
/// entered.
pub(crate) fn sort_items(visited: &mut Visited, items: &mut [Value]) -> Result<()> {
    let Some(shape) = items.first().map(Value::shape) else {
        return Ok(());
    };
    if shape.is_primitive() && items.iter().all(|v| v.shape() == shape) {
        items.sort_unstable_by(primitive_order);
        return Ok(());
    }

    let mut failure = None;
    items.sort_unstable_by(|a, b| compare_or_record(visited, a, b, &mut failure));
    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Direct ordering for primitive elements of one shape; agrees with the
/// structural ordering without touching the visited set.
fn primitive_order(l: &Value, r: &Value) -> Ordering {
    match (l, r) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Uint(a), Value::Uint(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => to_ordering(float_lt(*a, *b)),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        // Callers check that every element has the same primitive shape.
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_order_matches_float_rule() {
        let mut items = vec![
            Value::float(2.0),
            Value::float(f64::NEG_INFINITY),
            Value::float(f64::NAN),
            Value::float(-1.0),
        ];
        sort_items(&mut Visited::new(), &mut items).unwrap();
        let shown: Vec<String> = items.iter().map(|v| v.to_string()).collect();
        assert_eq!(shown, vec!["NaN", "-Inf", "-1", "2"]);
    }

    #[test]
    fn test_mixed_primitives_fail() {
        let mut items = vec![Value::int(2), Value::string("a"), Value::int(1)];
        assert!(sort_items(&mut Visited::new(), &mut items).is_err());
    }

    #[test]
    fn test_nested_sequences_keep_their_order() {
        let mut items = vec![Value::ints(&[3, 1]), Value::ints(&[2])];
        sort_items(&mut Visited::new(), &mut items).unwrap();
        assert!(items[0].identical(&Value::ints(&[2])));
        assert!(items[1].identical(&Value::ints(&[3, 1])));
    }

    #[test]
    fn test_empty_items() {
        let mut items: Vec<Value> = Vec::new();
        assert!(sort_items(&mut Visited::new(), &mut items).is_ok());
    }

    #[test]
    fn test_leaf_shapes_not_sortable() {
        assert!(!sort(&mut Value::int(3)).unwrap());
        assert!(!sort(&mut Value::string("x")).unwrap());
        assert!(sort(&mut Value::nil_ptr()).unwrap());
    }
}
