// deeptypes-core - Structural ordering, sort and distinct engines
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # deeptypes-core
//!
//! Structural ordering, deep equality, in-place deep sorting and in-place
//! deduplication over [`Value`]s.
//!
//! All three engines share one traversal discipline: references are
//! followed, public struct fields are visited in declaration order and a
//! [`Visited`] set detects cycles so every operation terminates.

pub mod distinct;
pub mod error;
pub mod order;
pub mod sort;
pub mod visited;

pub use distinct::distinct_in_place;
pub use error::{Error, Result};
pub use order::{compare, equal, less, less_equal, to_ordering};
pub use sort::sort;
pub use visited::Visited;

// Re-export value types for convenience
pub use deeptypes_value::{Field, Map, Ref, Shape, Struct, Value, Visibility, new_ref};
