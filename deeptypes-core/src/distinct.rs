// deeptypes-core - Sort and deduplicate
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Sort a growable sequence and compact away its duplicates in place.

use deeptypes_value::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::order::less_equal;
use crate::sort::sort_items;
use crate::visited::Visited;

const EXPECTED: &str = "slice or reference to slice";

/// Sort a slice following the rules of [`crate::sort`], then drop every
/// element equal (under [`crate::equal`]) to the one kept before it.
///
/// `value` must be a [`Value::Slice`] or a non-nil reference to one; the
/// slice is truncated in place without reallocating. Anything else fails
/// with [`Error::InvalidArgument`].
pub fn distinct_in_place(value: &mut Value) -> Result<()> {
    let mut visited = Visited::new();
    match value {
        Value::Slice(items) => compact(&mut visited, items),
        Value::Ptr(Some(target)) => {
            // Elements may point back at the slice's own cell; keep it on
            // the path so they compare as cycle-closing instead of
            // borrowing it again.
            visited.enter(target);
            let mut inner = target.borrow_mut();
            match &mut *inner {
                Value::Slice(items) => compact(&mut visited, items),
                other => Err(Error::invalid_argument(
                    EXPECTED,
                    format!("reference to {}", other.describe()),
                )),
            }
        }
        other => Err(Error::invalid_argument(EXPECTED, other.describe())),
    }
}

fn compact(visited: &mut Visited, items: &mut Vec<Value>) -> Result<()> {
    sort_items(visited, items)?;

    let before = items.len();
    let mut failure = None;
    // `dedup_by` hands over (candidate, last kept) and drops the candidate
    // when the closure returns true.
    items.dedup_by(|next, last| {
        if failure.is_some() {
            return false;
        }
        match less_equal(visited, last, next) {
            Ok((_, eq)) => eq,
            Err(e) => {
                failure = Some(e);
                false
            }
        }
    });
    if let Some(e) = failure {
        return Err(e);
    }

    debug!(before, kept = items.len(), "distinct pass complete");
    Ok(())
}
