// deeptypes-core - Structural ordering
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Deep less-than and deep equality over same-shaped values.
//!
//! Every rule produces a `(less, equal)` pair with at most one flag set;
//! neither set means the left operand is greater. Comparison stops at the
//! first difference.
//!
//! - Bools: `false < true`.
//! - Integers: numeric order on the 64-bit representative.
//! - Floats: NaN is less than everything else and equal to NaN; negative
//!   infinity is next; then the usual order.
//! - Complexes: real part first, then imaginary part, each as a float.
//! - Strings: byte-lexicographic.
//! - Channels: fewer buffered elements is less.
//! - Opaque values are never less; equal only when identical.
//! - Arrays and slices: shorter is less, otherwise element by element.
//! - Maps: fewer entries is less. Otherwise both key sets are sorted and
//!   compared like slices, then in sorted-key order each left value is
//!   compared with the right value under the same key.
//! - References: nil is less than non-nil. A reference that would re-enter
//!   a cycle is less than one that can still recurse, and two such
//!   references are equal. Otherwise the targets are compared.
//! - Structs: public fields in declaration order; the first unequal field
//!   decides. Private fields are never read.

use std::cmp::Ordering;
use std::rc::Rc;

use deeptypes_value::{Map, Ref, Struct, Value};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::visited::Visited;

/// Whether `l` is deeply less than `r`.
///
/// Fails with [`Error::ShapeMismatch`] if the operands, or any pair of
/// values compared on the way, differ in shape.
pub fn less(l: &Value, r: &Value) -> Result<bool> {
    debug!(left = %l.shape(), right = %r.shape(), "less");
    let (lt, _) = less_equal(&mut Visited::new(), l, r)?;
    Ok(lt)
}

/// Whether `l` is deeply equal to `r`, considering public struct fields
/// only.
pub fn equal(l: &Value, r: &Value) -> Result<bool> {
    debug!(left = %l.shape(), right = %r.shape(), "equal");
    let (_, eq) = less_equal(&mut Visited::new(), l, r)?;
    Ok(eq)
}

/// Three-way comparison following the rules of [`less`] and [`equal`].
pub fn compare(l: &Value, r: &Value) -> Result<Ordering> {
    debug!(left = %l.shape(), right = %r.shape(), "compare");
    less_equal(&mut Visited::new(), l, r).map(to_ordering)
}

/// Convert a `(less, equal)` verdict into an [`Ordering`].
pub fn to_ordering((lt, eq): (bool, bool)) -> Ordering {
    if lt {
        Ordering::Less
    } else if eq {
        Ordering::Equal
    } else {
        Ordering::Greater
    }
}

/// Compute `(less, equal)` for two values within an ongoing traversal.
///
/// `visited` holds the references currently being compared; it is left
/// as it was found.
pub fn less_equal(visited: &mut Visited, l: &Value, r: &Value) -> Result<(bool, bool)> {
    match (l, r) {
        (Value::Bool(a), Value::Bool(b)) => Ok((!a & b, a == b)),
        (Value::Int(a), Value::Int(b)) => Ok(ord_lt(a, b)),
        (Value::Uint(a), Value::Uint(b)) => Ok(ord_lt(a, b)),
        (Value::Float(a), Value::Float(b)) => Ok(float_lt(*a, *b)),
        (Value::Complex(ar, ai), Value::Complex(br, bi)) => Ok(complex_lt((*ar, *ai), (*br, *bi))),
        (Value::String(a), Value::String(b)) => Ok(ord_lt(a, b)),
        (Value::Chan(a), Value::Chan(b)) => Ok(ord_lt(&a.len(), &b.len())),
        (Value::Opaque(a), Value::Opaque(b)) => Ok((false, a.same(b))),
        (Value::Array(a), Value::Array(b)) | (Value::Slice(a), Value::Slice(b)) => {
            seq_less_equal(visited, a, b)
        }
        (Value::Map(a), Value::Map(b)) => map_less_equal(visited, a, b),
        (Value::Ptr(a), Value::Ptr(b)) => ptr_less_equal(visited, a.as_ref(), b.as_ref()),
        (Value::Struct(a), Value::Struct(b)) => struct_less_equal(visited, a, b),
        _ => Err(Error::shapes(l.shape(), r.shape())),
    }
}

/// Comparator for use inside `sort_by` closures, which cannot return
/// errors. The first error is stored in `failure`; once set, every
/// further comparison reports `Equal` so the sort finishes quickly.
pub(crate) fn compare_or_record(
    visited: &mut Visited,
    l: &Value,
    r: &Value,
    failure: &mut Option<Error>,
) -> Ordering {
    if failure.is_some() {
        return Ordering::Equal;
    }
    match less_equal(visited, l, r) {
        Ok(verdict) => to_ordering(verdict),
        Err(e) => {
            *failure = Some(e);
            Ordering::Equal
        }
    }
}

fn ord_lt<T: Ord + ?Sized>(l: &T, r: &T) -> (bool, bool) {
    match l.cmp(r) {
        Ordering::Less => (true, false),
        Ordering::Equal => (false, true),
        Ordering::Greater => (false, false),
    }
}

/// Float rule: NaN first, then negative infinity, then ordinary order.
pub(crate) fn float_lt(l: f64, r: f64) -> (bool, bool) {
    if l.is_nan() {
        let rnan = r.is_nan();
        return (!rnan, rnan);
    }
    if r.is_nan() {
        return (false, false);
    }
    if l == f64::NEG_INFINITY {
        let rinf = r == f64::NEG_INFINITY;
        return (!rinf, rinf);
    }
    if r == f64::NEG_INFINITY {
        return (false, false);
    }
    (l < r, l == r)
}

fn complex_lt(l: (f64, f64), r: (f64, f64)) -> (bool, bool) {
    let (lt, eq) = float_lt(l.0, r.0);
    if eq { float_lt(l.1, r.1) } else { (lt, eq) }
}

fn seq_less_equal(visited: &mut Visited, l: &[Value], r: &[Value]) -> Result<(bool, bool)> {
    if l.len() != r.len() {
        return Ok((l.len() < r.len(), false));
    }
    for (i, (a, b)) in l.iter().zip(r).enumerate() {
        let (lt, eq) = less_equal(visited, a, b).map_err(|e| e.at(format!("[{}]", i)))?;
        if !eq {
            return Ok((lt, false));
        }
    }
    Ok((false, true))
}

fn map_less_equal(visited: &mut Visited, l: &Map, r: &Map) -> Result<(bool, bool)> {
    if l.len() != r.len() {
        return Ok((l.len() < r.len(), false));
    }
    let left = sorted_entries(visited, l)?;
    let right = sorted_entries(visited, r)?;

    for ((lk, _), (rk, _)) in left.iter().zip(&right) {
        let (lt, eq) = less_equal(visited, lk, rk)?;
        if !eq {
            return Ok((lt, false));
        }
    }
    // Each left value is compared with the right value stored under the
    // identical key. A left key with no identical right key (a distinct
    // cell with an equal target) pairs with the right value at the same
    // sorted position.
    for ((lk, lv), (_, positional)) in left.iter().zip(&right) {
        let rv = r.get(lk).unwrap_or(*positional);
        let (lt, eq) = less_equal(visited, lv, rv).map_err(|e| e.at(format!("[{}]", lk)))?;
        if !eq {
            return Ok((lt, false));
        }
    }
    Ok((false, true))
}

/// Entries of a map ordered by key under this engine.
fn sorted_entries<'a>(visited: &mut Visited, map: &'a Map) -> Result<Vec<(&'a Value, &'a Value)>> {
    let mut entries: Vec<_> = map.iter().collect();
    let mut failure = None;
    entries.sort_unstable_by(|(a, _), (b, _)| compare_or_record(visited, a, b, &mut failure));
    match failure {
        Some(e) => Err(e),
        None => Ok(entries),
    }
}

fn ptr_less_equal(visited: &mut Visited, l: Option<&Ref>, r: Option<&Ref>) -> Result<(bool, bool)> {
    let (l, r) = match (l, r) {
        (None, None) => return Ok((false, true)),
        (None, Some(_)) => return Ok((true, false)),
        (Some(_), None) => return Ok((false, false)),
        (Some(l), Some(r)) => (l, r),
    };
    if Rc::ptr_eq(l, r) {
        return Ok((false, true));
    }

    let (lseen, rseen) = (visited.contains(l), visited.contains(r));
    if lseen || rseen {
        trace!(left = lseen, right = rseen, "reference closes a cycle");
        return Ok((lseen && !rseen, lseen && rseen));
    }

    visited.enter(l);
    visited.enter(r);
    let verdict = less_equal(visited, &l.borrow(), &r.borrow());
    visited.leave(l);
    visited.leave(r);
    verdict
}

fn struct_less_equal(visited: &mut Visited, l: &Struct, r: &Struct) -> Result<(bool, bool)> {
    if !l.same_layout(r) {
        return Err(Error::shape_mismatch(l.describe(), r.describe()));
    }
    for (a, b) in l.public_fields().zip(r.public_fields()) {
        let (lt, eq) = less_equal(visited, &a.value, &b.value).map_err(|e| e.at(&*a.name))?;
        if !eq {
            return Ok((lt, false));
        }
    }
    Ok((false, true))
}
