// deeptypes - Type conversion traits
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Type conversion between Rust and runtime values.
//!
//! This module provides the [`IntoValue`] and [`FromValue`] traits for
//! converting between statically typed Rust data and [`Value`].
//!
//! # Built-in Conversions
//!
//! | Rust Type | Shape |
//! |-----------|-------|
//! | `bool` | `bool` |
//! | `i8` .. `i64`, `isize` | `int` |
//! | `u8` .. `u64`, `usize` | `uint` |
//! | `f32`, `f64` | `float` |
//! | `String`, `&str`, `Rc<str>` | `string` |
//! | `Vec<T>` | `slice` |
//! | `[T; N]` | `array` |
//! | `Option<T>` | `ptr` (nil for `None`) |
//! | `HashMap<K, V>`, `BTreeMap<K, V>` | `map` |
//!
//! Integer conversions back into Rust accept either integer shape and are
//! range-checked; a value that does not fit is a conversion error rather
//! than a silent truncation.
//!
//! # Custom Conversions
//!
//! ```rust
//! use deeptypes::{FromValue, IntoValue, Struct, Value, Result, Error};
//!
//! struct Point { x: i64, y: i64 }
//!
//! impl IntoValue for Point {
//!     fn into_value(self) -> Value {
//!         Struct::new("Point")
//!             .with_field("X", Value::int(self.x))
//!             .with_field("Y", Value::int(self.y))
//!             .into()
//!     }
//! }
//!
//! impl FromValue for Point {
//!     fn from_value(value: &Value) -> Result<Self> {
//!         let s = value
//!             .as_struct()
//!             .filter(|s| s.name() == "Point")
//!             .ok_or_else(|| Error::conversion("struct Point", value.describe()))?;
//!         let field = |name: &str| {
//!             s.field(name)
//!                 .ok_or_else(|| Error::conversion("struct Point", value.describe()))
//!         };
//!         Ok(Point {
//!             x: i64::from_value(field("X")?)?,
//!             y: i64::from_value(field("Y")?)?,
//!         })
//!     }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::rc::Rc;

use deeptypes_core::{Error, Result};
use deeptypes_value::Value;
use num_traits::NumCast;

/// Convert a Rust type into a `Value`.
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Convert a `Value` into a Rust type.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

// ============================================================================
// IntoValue implementations
// ============================================================================

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

macro_rules! int_into_value {
    ($variant:ident as $wide:ty: $($t:ty),*) => {
        $(
            impl IntoValue for $t {
                fn into_value(self) -> Value {
                    Value::$variant(self as $wide)
                }
            }
        )*
    };
}

int_into_value!(Int as i64: i8, i16, i32, i64, isize);
int_into_value!(Uint as u64: u8, u16, u32, u64, usize);

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(self as f64)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::string(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::string(self)
    }
}

impl IntoValue for Rc<str> {
    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::slice(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: IntoValue, const N: usize> IntoValue for [T; N] {
    fn into_value(self) -> Value {
        Value::array(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => Value::ptr(v.into_value()),
            None => Value::nil_ptr(),
        }
    }
}

impl<K: IntoValue, V: IntoValue> IntoValue for HashMap<K, V> {
    fn into_value(self) -> Value {
        Value::map(
            self.into_iter()
                .map(|(k, v)| (k.into_value(), v.into_value()))
                .collect(),
        )
    }
}

impl<K: IntoValue, V: IntoValue> IntoValue for BTreeMap<K, V> {
    fn into_value(self) -> Value {
        Value::map(
            self.into_iter()
                .map(|(k, v)| (k.into_value(), v.into_value()))
                .collect(),
        )
    }
}

// ============================================================================
// FromValue implementations
// ============================================================================

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(Error::conversion("bool", other.describe())),
        }
    }
}

/// Narrow an integer payload of either sign into `T`, failing when it
/// does not fit.
fn narrow<T: NumCast>(value: &Value, expected: &'static str) -> Result<T> {
    let cast = match value {
        Value::Int(n) => <T as NumCast>::from(*n),
        Value::Uint(n) => <T as NumCast>::from(*n),
        other => return Err(Error::conversion(expected, other.describe())),
    };
    cast.ok_or_else(|| Error::conversion(expected, format!("{} {}", value.type_name(), value)))
}

macro_rules! int_from_value {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                fn from_value(value: &Value) -> Result<Self> {
                    narrow(value, stringify!($t))
                }
            }
        )*
    };
}

int_from_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Float(n) => Ok(*n),
            Value::Int(n) => Ok(*n as f64),
            Value::Uint(n) => Ok(*n as f64),
            other => Err(Error::conversion("f64", other.describe())),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self> {
        let wide = f64::from_value(value).map_err(|_| Error::conversion("f32", value.describe()))?;
        let result = wide as f32;
        if result.is_infinite() && wide.is_finite() {
            Err(Error::conversion("f32", format!("float {}", wide)))
        } else {
            Ok(result)
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s.to_string()),
            other => Err(Error::conversion("string", other.describe())),
        }
    }
}

impl FromValue for Rc<str> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Rc::clone(s)),
            other => Err(Error::conversion("string", other.describe())),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match value.as_items() {
            Some(items) => items.iter().map(T::from_value).collect(),
            None => Err(Error::conversion("slice or array", value.describe())),
        }
    }
}

impl<T: FromValue, const N: usize> FromValue for [T; N] {
    fn from_value(value: &Value) -> Result<Self> {
        let items = Vec::<T>::from_value(value)?;
        let len = items.len();
        <[T; N]>::try_from(items)
            .map_err(|_| Error::conversion("array", format!("{} of length {}", value.describe(), len)))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Ptr(None) => Ok(None),
            Value::Ptr(Some(target)) => {
                let inner = target.borrow();
                T::from_value(&inner).map(Some)
            }
            other => Err(Error::conversion("ptr", other.describe())),
        }
    }
}

impl<K: FromValue + Eq + Hash, V: FromValue> FromValue for HashMap<K, V> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Map(m) => {
                let mut result = HashMap::with_capacity(m.len());
                for (k, v) in m.iter() {
                    result.insert(K::from_value(k)?, V::from_value(v)?);
                }
                Ok(result)
            }
            other => Err(Error::conversion("map", other.describe())),
        }
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Map(m) => {
                let mut result = BTreeMap::new();
                for (k, v) in m.iter() {
                    result.insert(K::from_value(k)?, V::from_value(v)?);
                }
                Ok(result)
            }
            other => Err(Error::conversion("map", other.describe())),
        }
    }
}

// ============================================================================
// Convenience functions
// ============================================================================

/// Convert a Rust value into a [`Value`].
#[must_use]
pub fn to_value<T: IntoValue>(value: T) -> Value {
    value.into_value()
}

/// Convert a [`Value`] into a Rust type.
pub fn from_value<T: FromValue>(value: &Value) -> Result<T> {
    T::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrowing_is_range_checked() {
        assert_eq!(i8::from_value(&Value::int(127)).unwrap(), 127);
        assert_eq!(
            i8::from_value(&Value::int(128)).unwrap_err(),
            Error::conversion("i8", "int 128")
        );
        assert!(u32::from_value(&Value::int(-1)).is_err());
        assert_eq!(u8::from_value(&Value::int(200)).unwrap(), 200);
        assert_eq!(i64::from_value(&Value::uint(5)).unwrap(), 5);
        assert!(i64::from_value(&Value::uint(u64::MAX)).is_err());
    }

    #[test]
    fn test_wrong_shape() {
        assert_eq!(
            i64::from_value(&Value::string("1")).unwrap_err(),
            Error::conversion("i64", "string")
        );
        assert!(bool::from_value(&Value::int(1)).is_err());
        assert!(String::from_value(&Value::nil_ptr()).is_err());
    }

    #[test]
    fn test_f32_overflow() {
        assert_eq!(f32::from_value(&Value::float(1.5)).unwrap(), 1.5);
        assert!(f32::from_value(&Value::float(1e300)).is_err());
        assert!(f32::from_value(&Value::float(f64::INFINITY)).unwrap().is_infinite());
    }

    #[test]
    fn test_array_length_checked() {
        let v = to_value(vec![1i64, 2, 3]);
        assert_eq!(<[i64; 3]>::from_value(&v).unwrap(), [1, 2, 3]);
        assert!(<[i64; 2]>::from_value(&v).is_err());
    }

    #[test]
    fn test_option_is_reference() {
        assert!(to_value(None::<i64>).is_nil());
        let v = to_value(Some(4u8));
        assert_eq!(v.shape(), deeptypes_value::Shape::Ptr);
        assert_eq!(Option::<u8>::from_value(&v).unwrap(), Some(4));
    }
}
