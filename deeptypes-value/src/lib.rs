// deeptypes-value - Runtime value model for deeptypes
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # deeptypes-value
//!
//! The runtime value model shared by the deeptypes engines.
//! Every value is a [`Value`], classified by its [`Shape`].

pub mod value;

pub use value::{
    Channel, Field, Map, Opaque, OpaqueKind, Ref, Shape, Struct, Value, Visibility,
    get_print_length, identity, new_ref, set_print_length,
};
