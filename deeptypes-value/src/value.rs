// deeptypes-value - Value types for deeptypes
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Core value type for deeptypes.
//!
//! `Value` is the closed enum every engine in `deeptypes-core` walks. The
//! variant of a value is its [`Shape`]; two values can only be ordered
//! against each other when their shapes agree.
//!
//! Arrays, slices, structs and maps hold their contents inline. Sharing and
//! cycles are expressed through [`Value::Ptr`], whose target lives in a
//! reference-counted [`RefCell`] so that sorting can rewrite it in place.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

// Thread-local print settings (can be configured by the host application)
thread_local! {
    /// Maximum number of elements to print in a sequence or map.
    /// None means unlimited, Some(n) means print at most n elements.
    /// Default: None (unlimited)
    static PRINT_LENGTH: Cell<Option<usize>> = const { Cell::new(None) };
}

/// Get the current print-length setting.
pub fn get_print_length() -> Option<usize> {
    PRINT_LENGTH.with(|pl| pl.get())
}

/// Set the print-length setting. Returns the previous value.
pub fn set_print_length(len: Option<usize>) -> Option<usize> {
    PRINT_LENGTH.with(|pl| pl.replace(len))
}

// ============================================================================
// Shape
// ============================================================================

/// Runtime classification of a value.
///
/// Shape decides which comparison and traversal rule applies. Integer and
/// float widths are not part of the shape: every signed integer is an
/// `Int`, every unsigned integer a `Uint`, every float a `Float`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Bool,
    Int,
    Uint,
    Float,
    Complex,
    String,
    Struct,
    Array,
    Slice,
    Map,
    Ptr,
    Chan,
    Opaque,
}

impl Shape {
    /// Lower-case name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Shape::Bool => "bool",
            Shape::Int => "int",
            Shape::Uint => "uint",
            Shape::Float => "float",
            Shape::Complex => "complex",
            Shape::String => "string",
            Shape::Struct => "struct",
            Shape::Array => "array",
            Shape::Slice => "slice",
            Shape::Map => "map",
            Shape::Ptr => "ptr",
            Shape::Chan => "chan",
            Shape::Opaque => "opaque",
        }
    }

    /// Shapes that sort without any recursive traversal.
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            Shape::Bool | Shape::Int | Shape::Uint | Shape::Float | Shape::String
        )
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// References
// ============================================================================

/// Shared, mutable target of a [`Value::Ptr`].
pub type Ref = Rc<RefCell<Value>>;

/// Allocate a new reference cell holding `value`.
pub fn new_ref(value: Value) -> Ref {
    Rc::new(RefCell::new(value))
}

/// Identity of a reference cell: its allocation address.
///
/// Two `Ref`s have the same identity exactly when they point at the same
/// cell. Used as the key of cycle-detection sets.
pub fn identity(r: &Ref) -> usize {
    Rc::as_ptr(r) as *const () as usize
}

// ============================================================================
// Struct Types
// ============================================================================

/// Whether a struct field takes part in ordering and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

/// A named struct field.
#[derive(Clone)]
pub struct Field {
    pub name: Rc<str>,
    pub visibility: Visibility,
    pub value: Value,
}

impl Field {
    pub fn new(name: impl Into<Rc<str>>, visibility: Visibility, value: Value) -> Self {
        Field {
            name: name.into(),
            visibility,
            value,
        }
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// An aggregate with named fields, kept in declaration order.
///
/// Private fields are carried along (and printed) but the engines never
/// read or write them.
#[derive(Clone)]
pub struct Struct {
    name: Rc<str>,
    fields: Vec<Field>,
}

impl Struct {
    /// Create an empty struct of the given type name. Anonymous structs use
    /// an empty name.
    pub fn new(name: impl Into<Rc<str>>) -> Self {
        Struct {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder: append a public field.
    pub fn with_field(mut self, name: impl Into<Rc<str>>, value: Value) -> Self {
        self.fields.push(Field::new(name, Visibility::Public, value));
        self
    }

    /// Builder: append a private field.
    pub fn with_private_field(mut self, name: impl Into<Rc<str>>, value: Value) -> Self {
        self.fields.push(Field::new(name, Visibility::Private, value));
        self
    }

    pub fn push_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Public fields in declaration order.
    pub fn public_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_public())
    }

    /// Public fields in declaration order, mutably.
    pub fn public_fields_mut(&mut self) -> impl Iterator<Item = &mut Field> {
        self.fields.iter_mut().filter(|f| f.is_public())
    }

    /// Look up a field (public or private) by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|f| &*f.name == name)
            .map(|f| &f.value)
    }

    /// Look up a field (public or private) by name, mutably.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|f| &*f.name == name)
            .map(|f| &mut f.value)
    }

    /// Whether two structs are of the same type: same name and the same
    /// fields, with the same visibility, in the same order.
    pub fn same_layout(&self, other: &Struct) -> bool {
        self.name == other.name
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(&other.fields)
                .all(|(a, b)| a.name == b.name && a.visibility == b.visibility)
    }

    /// Type description used in diagnostics, e.g. `struct Point`.
    pub fn describe(&self) -> String {
        if self.name.is_empty() {
            "struct".to_string()
        } else {
            format!("struct {}", self.name)
        }
    }
}

// ============================================================================
// Keyed collection
// ============================================================================

/// A keyed collection with unique keys.
///
/// Entries are stored in insertion order; nothing about comparison or
/// sorting depends on that order. Keys are unique under
/// [`Value::identical`], the identity-style equality a hash map uses.
///
/// Lookups scan the entries linearly, since floats and references have no
/// hash that agrees with [`Value::identical`]. Building a map of `n`
/// entries is therefore O(n²); this type suits the small keyed
/// collections that get compared and sorted, not large indexes.
#[derive(Clone, Default)]
pub struct Map {
    entries: Vec<(Value, Value)>,
}

impl Map {
    pub fn new() -> Self {
        Map {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Map {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert an entry, returning the previous value stored under an
    /// identical key.
    ///
    /// Scans every existing key, so this is O(len).
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        match self.entries.iter_mut().find(|(k, _)| k.identical(&key)) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.identical(key))
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &Value) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k.identical(key))
            .map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        let idx = self.entries.iter().position(|(k, _)| k.identical(key))?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterate entries with mutable values. Keys stay immutable so the
    /// uniqueness invariant cannot be broken.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Value, &mut Value)> {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.entries.iter_mut().map(|(_, v)| v)
    }
}

impl FromIterator<(Value, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

// ============================================================================
// Channel
// ============================================================================

/// A buffered channel. Clones share the same buffer.
///
/// Only the number of buffered elements matters for ordering.
#[derive(Clone)]
pub struct Channel {
    buffer: Rc<RefCell<VecDeque<Value>>>,
    capacity: usize,
}

impl Channel {
    /// An unbuffered channel: it can never hold a pending element.
    pub fn new() -> Self {
        Channel::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Channel {
            buffer: Rc::new(RefCell::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Buffer a value. A full channel hands the value back.
    pub fn send(&self, value: Value) -> Result<(), Value> {
        let mut buffer = self.buffer.borrow_mut();
        if buffer.len() >= self.capacity {
            return Err(value);
        }
        buffer.push_back(value);
        Ok(())
    }

    pub fn recv(&self) -> Option<Value> {
        self.buffer.borrow_mut().pop_front()
    }

    /// Number of buffered, unconsumed elements.
    pub fn len(&self) -> usize {
        self.buffer.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether both handles share one buffer.
    pub fn same(&self, other: &Channel) -> bool {
        Rc::ptr_eq(&self.buffer, &other.buffer)
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Opaque values
// ============================================================================

/// What an opaque value stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpaqueKind {
    Func,
    Interface,
    RawPointer,
}

/// A value compared by identity only: a function, an interface or a raw
/// pointer. The target is never inspected.
#[derive(Clone)]
pub struct Opaque {
    kind: OpaqueKind,
    target: Option<Rc<dyn Any>>,
}

impl Opaque {
    pub fn new(kind: OpaqueKind, target: Rc<dyn Any>) -> Self {
        Opaque {
            kind,
            target: Some(target),
        }
    }

    pub fn nil(kind: OpaqueKind) -> Self {
        Opaque { kind, target: None }
    }

    /// Wrap a function (or any callable) as an opaque value.
    pub fn func<F: Any>(f: F) -> Self {
        Opaque::new(OpaqueKind::Func, Rc::new(f))
    }

    pub fn kind(&self) -> OpaqueKind {
        self.kind
    }

    pub fn is_nil(&self) -> bool {
        self.target.is_none()
    }

    pub fn target(&self) -> Option<&Rc<dyn Any>> {
        self.target.as_ref()
    }

    /// Identity equality: same kind and the same allocation (or both nil).
    pub fn same(&self, other: &Opaque) -> bool {
        self.kind == other.kind
            && match (&self.target, &other.target) {
                (None, None) => true,
                (Some(a), Some(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
                _ => false,
            }
    }
}

// ============================================================================
// Value
// ============================================================================

/// The core value type for deeptypes.
///
/// Each variant is one [`Shape`]. Values are cheap to clone except for the
/// inline aggregates (arrays, slices, structs, maps), which clone deeply up
/// to the first reference.
#[derive(Clone)]
pub enum Value {
    /// Boolean true or false
    Bool(bool),
    /// Signed integer of any width, widened to 64 bits
    Int(i64),
    /// Unsigned integer of any width, widened to 64 bits
    Uint(u64),
    /// Floating point number of any width, widened to 64 bits
    Float(f64),
    /// Complex number (real, imaginary)
    Complex(f64, f64),
    /// Immutable string
    String(Rc<str>),
    /// Aggregate with named fields
    Struct(Struct),
    /// Fixed-size sequence (value semantics)
    Array(Vec<Value>),
    /// Growable sequence
    Slice(Vec<Value>),
    /// Keyed collection
    Map(Map),
    /// Reference, `None` is nil
    Ptr(Option<Ref>),
    /// Buffered channel
    Chan(Channel),
    /// Function, interface or raw pointer
    Opaque(Opaque),
}

impl Value {
    /// Create a boolean value
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    /// Create a signed integer value
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    /// Create an unsigned integer value
    pub fn uint(n: u64) -> Self {
        Value::Uint(n)
    }

    /// Create a float value
    pub fn float(n: f64) -> Self {
        Value::Float(n)
    }

    /// Create a complex value
    pub fn complex(re: f64, im: f64) -> Self {
        Value::Complex(re, im)
    }

    /// Create a string value
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::String(s.into())
    }

    /// Create a fixed-size sequence
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(items)
    }

    /// Create a growable sequence
    pub fn slice(items: Vec<Value>) -> Self {
        Value::Slice(items)
    }

    /// Create a growable sequence of signed integers
    pub fn ints(items: &[i64]) -> Self {
        Value::Slice(items.iter().copied().map(Value::Int).collect())
    }

    /// Create a keyed collection from entries. Later entries win on
    /// identical keys.
    ///
    /// Each entry goes through [`Map::insert`], so this is quadratic in
    /// the number of entries.
    pub fn map(entries: Vec<(Value, Value)>) -> Self {
        Value::Map(entries.into_iter().collect())
    }

    /// Create a nil reference
    pub fn nil_ptr() -> Self {
        Value::Ptr(None)
    }

    /// Create a reference to a freshly allocated cell holding `value`
    pub fn ptr(value: Value) -> Self {
        Value::Ptr(Some(new_ref(value)))
    }

    /// Create a reference sharing an existing cell
    pub fn ptr_to(target: &Ref) -> Self {
        Value::Ptr(Some(Rc::clone(target)))
    }

    /// The shape of this value.
    pub fn shape(&self) -> Shape {
        match self {
            Value::Bool(_) => Shape::Bool,
            Value::Int(_) => Shape::Int,
            Value::Uint(_) => Shape::Uint,
            Value::Float(_) => Shape::Float,
            Value::Complex(_, _) => Shape::Complex,
            Value::String(_) => Shape::String,
            Value::Struct(_) => Shape::Struct,
            Value::Array(_) => Shape::Array,
            Value::Slice(_) => Shape::Slice,
            Value::Map(_) => Shape::Map,
            Value::Ptr(_) => Shape::Ptr,
            Value::Chan(_) => Shape::Chan,
            Value::Opaque(_) => Shape::Opaque,
        }
    }

    /// Get the type name of this value (for error messages)
    pub fn type_name(&self) -> &'static str {
        self.shape().name()
    }

    /// Type description for diagnostics. Same as the shape name except for
    /// named structs.
    pub fn describe(&self) -> String {
        match self {
            Value::Struct(s) => s.describe(),
            other => other.type_name().to_string(),
        }
    }

    /// Nil reference or nil opaque value.
    pub fn is_nil(&self) -> bool {
        match self {
            Value::Ptr(p) => p.is_none(),
            Value::Opaque(o) => o.is_nil(),
            _ => false,
        }
    }

    /// Elements of an array or slice.
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) | Value::Slice(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Struct> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Target cell of a non-nil reference.
    pub fn as_ref_cell(&self) -> Option<&Ref> {
        match self {
            Value::Ptr(p) => p.as_ref(),
            _ => None,
        }
    }

    /// Identity-style equality, the `==` a hash map applies to its keys.
    ///
    /// Primitives compare by value (floats by bit pattern), strings by
    /// content, references, channels and opaque values by identity, and
    /// aggregates element by element including private fields. This is not
    /// the structural equality of the ordering engine: two distinct
    /// references to equal targets are not identical.
    pub fn identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Complex(ar, ai), Value::Complex(br, bi)) => {
                ar.to_bits() == br.to_bits() && ai.to_bits() == bi.to_bits()
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => {
                a.same_layout(b)
                    && a
                        .fields()
                        .iter()
                        .zip(b.fields())
                        .all(|(x, y)| x.value.identical(&y.value))
            }
            (Value::Array(a), Value::Array(b)) | (Value::Slice(a), Value::Slice(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.identical(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .all(|(k, v)| b.get(k).is_some_and(|w| v.identical(w)))
            }
            (Value::Ptr(None), Value::Ptr(None)) => true,
            (Value::Ptr(Some(a)), Value::Ptr(Some(b))) => Rc::ptr_eq(a, b),
            (Value::Chan(a), Value::Chan(b)) => a.same(b),
            (Value::Opaque(a), Value::Opaque(b)) => a.same(b),
            _ => false,
        }
    }
}

impl From<Struct> for Value {
    fn from(s: Struct) -> Self {
        Value::Struct(s)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl From<Channel> for Value {
    fn from(c: Channel) -> Self {
        Value::Chan(c)
    }
}

impl From<Opaque> for Value {
    fn from(o: Opaque) -> Self {
        Value::Opaque(o)
    }
}

// ============================================================================
// Printing
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printing = Vec::new();
        write_value(f, self, &mut printing)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Write `value`, tracking the references currently being printed so that a
/// cycle renders as `&<cycle>` instead of recursing forever.
fn write_value(f: &mut fmt::Formatter<'_>, value: &Value, printing: &mut Vec<usize>) -> fmt::Result {
    match value {
        Value::Bool(b) => write!(f, "{}", b),
        Value::Int(n) => write!(f, "{}", n),
        Value::Uint(n) => write!(f, "{}", n),
        Value::Float(n) => write_float(f, *n),
        Value::Complex(re, im) => {
            write!(f, "(")?;
            write_float(f, *re)?;
            if im.is_nan() || (im.is_finite() && im.is_sign_positive()) {
                write!(f, "+")?;
            }
            write_float(f, *im)?;
            write!(f, "i)")
        }
        Value::String(s) => write!(f, "{:?}", &**s),
        Value::Struct(s) => {
            write!(f, "{}{{", s.name())?;
            for (i, field) in s.fields().iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}:", field.name)?;
                write_value(f, &field.value, printing)?;
            }
            write!(f, "}}")
        }
        Value::Array(items) | Value::Slice(items) => {
            write!(f, "[")?;
            let limit = get_print_length().unwrap_or(usize::MAX);
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                if i >= limit {
                    write!(f, "...")?;
                    break;
                }
                write_value(f, item, printing)?;
            }
            write!(f, "]")
        }
        Value::Map(map) => {
            write!(f, "map[")?;
            let limit = get_print_length().unwrap_or(usize::MAX);
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                if i >= limit {
                    write!(f, "...")?;
                    break;
                }
                write_value(f, k, printing)?;
                write!(f, ":")?;
                write_value(f, v, printing)?;
            }
            write!(f, "]")
        }
        Value::Ptr(None) => write!(f, "<nil>"),
        Value::Ptr(Some(target)) => {
            let id = identity(target);
            if printing.contains(&id) {
                return write!(f, "&<cycle>");
            }
            let Ok(inner) = target.try_borrow() else {
                return write!(f, "&<borrowed>");
            };
            printing.push(id);
            write!(f, "&")?;
            let result = write_value(f, &inner, printing);
            printing.pop();
            result
        }
        Value::Chan(c) => write!(f, "chan({}/{})", c.len(), c.capacity()),
        Value::Opaque(o) if o.is_nil() => write!(f, "<nil>"),
        Value::Opaque(o) => match o.kind() {
            OpaqueKind::Func => write!(f, "<func>"),
            OpaqueKind::Interface => write!(f, "<interface>"),
            OpaqueKind::RawPointer => write!(f, "<pointer>"),
        },
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        if n > 0.0 {
            write!(f, "+Inf")
        } else {
            write!(f, "-Inf")
        }
    } else {
        write!(f, "{}", n)
    }
}

// ============================================================================
// Tests
// ============================================================================
