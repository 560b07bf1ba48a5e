// deeptypes-core - Error types for the deeptypes engines
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Error types for ordering, sorting and conversion.

use deeptypes_value::Shape;
use thiserror::Error;

/// Result type for deeptypes operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the engines.
///
/// Both engine errors are caller bugs: the operation is aborted and no
/// verdict is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Two values reached by the same traversal step do not share a shape
    /// (or, for structs, a type).
    #[error("shape mismatch{}: {left} vs {right}", at_path(.path))]
    ShapeMismatch {
        left: String,
        right: String,
        /// Location below the operands, e.g. `Items[2].Name`; empty at the top.
        path: String,
    },
    /// `distinct_in_place` on something other than a growable sequence.
    #[error("invalid argument: expected {expected}, got {got}")]
    InvalidArgument { expected: &'static str, got: String },
    /// A value could not be converted into the requested Rust type.
    #[error("cannot convert {got} to {expected}")]
    Conversion { expected: &'static str, got: String },
}

fn at_path(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at {}", path)
    }
}

impl Error {
    /// Create a shape mismatch error between two type descriptions.
    pub fn shape_mismatch(left: impl Into<String>, right: impl Into<String>) -> Self {
        Error::ShapeMismatch {
            left: left.into(),
            right: right.into(),
            path: String::new(),
        }
    }

    /// Create a shape mismatch error between two shapes.
    pub fn shapes(left: Shape, right: Shape) -> Self {
        Error::shape_mismatch(left.name(), right.name())
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(expected: &'static str, got: impl Into<String>) -> Self {
        Error::InvalidArgument {
            expected,
            got: got.into(),
        }
    }

    /// Create a conversion error.
    pub fn conversion(expected: &'static str, got: impl Into<String>) -> Self {
        Error::Conversion {
            expected,
            got: got.into(),
        }
    }

    /// Prefix the location of a shape mismatch with an enclosing segment:
    /// a field name (`Name`) or an index (`[3]`). Other errors pass through.
    pub fn at(self, segment: impl AsRef<str>) -> Self {
        match self {
            Error::ShapeMismatch { left, right, path } => {
                let segment = segment.as_ref();
                let path = if path.is_empty() {
                    segment.to_string()
                } else if path.starts_with('[') {
                    format!("{}{}", segment, path)
                } else {
                    format!("{}.{}", segment, path)
                };
                Error::ShapeMismatch { left, right, path }
            }
            other => other,
        }
    }
}
