//! Values, tag keys and the parsed message map.

use std::fmt;

use cmf_error::{BuildError, CmfResult};
use indexmap::IndexMap;

use crate::codec::TypeCode;

/// Parsed message: tag -> value(s), in first-seen tag order.
pub type Message = IndexMap<Tag, Entry>;

////////////////////////////////////////////////////////////////////////////////
// Tag
////////////////////////////////////////////////////////////////////////////////

/// Field identifier. The wire only carries numbers; names are resolved
/// through a [`Dictionary`](crate::Dictionary).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    Number(u64),
    Name(String),
}

impl Tag {
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Name(_) => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Name(name) => Some(name),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<u64> for Tag {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Tag {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// Conversion of builder tag arguments.
///
/// Integers become [`Tag::Number`]; negative ones are rejected. Strings
/// become [`Tag::Name`].
pub trait IntoTag {
    fn into_tag(self) -> CmfResult<Tag>;
}

macro_rules! impl_into_tag_unsigned {
    ($($t:ty),*) => {
        $(
            impl IntoTag for $t {
                fn into_tag(self) -> CmfResult<Tag> {
                    Ok(Tag::Number(self as u64))
                }
            }
        )*
    };
}

macro_rules! impl_into_tag_signed {
    ($($t:ty),*) => {
        $(
            impl IntoTag for $t {
                fn into_tag(self) -> CmfResult<Tag> {
                    u64::try_from(self)
                        .map(Tag::Number)
                        .map_err(|_| BuildError::NegativeTag { tag: self as i128 }.into())
                }
            }
        )*
    };
}

impl_into_tag_unsigned!(u8, u16, u32, u64, usize);
impl_into_tag_signed!(i8, i16, i32, i64, isize);

impl IntoTag for i128 {
    fn into_tag(self) -> CmfResult<Tag> {
        if self < 0 {
            return Err(BuildError::NegativeTag { tag: self }.into());
        }
        u64::try_from(self)
            .map(Tag::Number)
            .map_err(|_| BuildError::VarintOutOfRange { value: self }.into())
    }
}

impl IntoTag for &str {
    fn into_tag(self) -> CmfResult<Tag> {
        Ok(Tag::Name(self.to_string()))
    }
}

impl IntoTag for String {
    fn into_tag(self) -> CmfResult<Tag> {
        Ok(Tag::Name(self))
    }
}

impl IntoTag for &String {
    fn into_tag(self) -> CmfResult<Tag> {
        Ok(Tag::Name(self.clone()))
    }
}

impl IntoTag for Tag {
    fn into_tag(self) -> CmfResult<Tag> {
        Ok(self)
    }
}

impl IntoTag for &Tag {
    fn into_tag(self) -> CmfResult<Tag> {
        Ok(self.clone())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Value
////////////////////////////////////////////////////////////////////////////////

/// A single field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed integer; the magnitude must fit in a u64 on the wire.
    Int(i128),
    Text(String),
    Bytes(Vec<u8>),
    Bool(bool),
    Double(f64),
}

impl Value {
    /// Text rendering of any displayable value.
    ///
    /// This is the way to add a value of a type the codec has no wire
    /// representation for.
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        Self::Text(value.to_string())
    }

    /// Wire type this value is written as.
    pub fn type_code(&self) -> TypeCode {
        match self {
            Self::Int(n) if *n < 0 => TypeCode::NegativeNumber,
            Self::Int(_) => TypeCode::PositiveNumber,
            Self::Text(_) => TypeCode::String,
            Self::Bytes(_) => TypeCode::ByteArray,
            Self::Bool(b) => TypeCode::for_bool(*b),
            Self::Double(_) => TypeCode::Double,
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Double(d) => write!(f, "{d}"),
        }
    }
}

macro_rules! impl_value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Self::Int(n as i128)
                }
            }
        )*
    };
}

impl_value_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(d: f32) -> Self {
        Self::Double(d as f64)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(b: &[u8; N]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Entry
////////////////////////////////////////////////////////////////////////////////

/// Value(s) stored under one tag.
///
/// A tag seen once holds a `Single` value; every further occurrence turns
/// the entry into a `Repeated` list in wire order.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Single(Value),
    Repeated(Vec<Value>),
}

impl Entry {
    /// Appends a value, promoting a single value to a list.
    pub fn push(
        &mut self,
        value: Value,
    ) {
        if let Self::Repeated(values) = self {
            values.push(value);
            return;
        }
        let previous = std::mem::replace(self, Self::Repeated(Vec::with_capacity(2)));
        if let Self::Repeated(values) = self {
            values.extend(previous.into_values());
            values.push(value);
        }
    }

    /// All values in wire order.
    pub fn values(&self) -> &[Value] {
        match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::Repeated(vs) => vs,
        }
    }

    pub fn into_values(self) -> Vec<Value> {
        match self {
            Self::Single(v) => vec![v],
            Self::Repeated(vs) => vs,
        }
    }

    /// The value of a tag seen once.
    pub fn as_single(&self) -> Option<&Value> {
        match self {
            Self::Single(v) => Some(v),
            Self::Repeated(_) => None,
        }
    }

    pub fn is_repeated(&self) -> bool {
        matches!(self, Self::Repeated(_))
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

impl From<Value> for Entry {
    fn from(v: Value) -> Self {
        Self::Single(v)
    }
}

impl From<&Entry> for Entry {
    fn from(e: &Entry) -> Self {
        e.clone()
    }
}

/// Raw bytes stay one value; they are not a sequence of integers.
impl From<Vec<u8>> for Entry {
    fn from(b: Vec<u8>) -> Self {
        Self::Single(Value::Bytes(b))
    }
}

// A sequence fans out to one pair per element when building.
macro_rules! impl_entry_from_vec {
    ($($t:ty),*) => {
        $(
            impl From<Vec<$t>> for Entry {
                fn from(values: Vec<$t>) -> Self {
                    Self::Repeated(values.into_iter().map(Value::from).collect())
                }
            }
        )*
    };
}

impl_entry_from_vec!(
    Value, i8, i16, i32, i64, i128, isize, u16, u32, u64, usize, f32, f64, bool, &str, String,
    Vec<u8>
);

macro_rules! impl_entry_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Entry {
                fn from(v: $t) -> Self {
                    Self::Single(v.into())
                }
            }
        )*
    };
}

impl_entry_from_scalar!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize, f32, f64, bool, &str, String, &[u8]
);
