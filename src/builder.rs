//! Message builder.
//!
//! Appends (tag, value) pairs to one growing buffer. Every writer validates
//! the tag and coerces the value before touching the buffer, so a failed
//! call leaves the message exactly as it was.
//!
//! ```
//! use cmf::Builder;
//!
//! let mut b = Builder::new();
//! b.add(0, true)?.add(1, false)?;
//! assert_eq!(b.to_hex(), "040d");
//! # Ok::<(), cmf::StackError>(())
//! ```

use std::fmt::Display;

use byteorder::{LittleEndian, WriteBytesExt};
use cmf_error::{BuildError, CmfResult, ResultExt};
use tracing::{debug, trace};

use crate::{
    codec::{encode_hex, varint::write_varint, write_tag_typed, TypeCode},
    coerce::{IntoDouble, IntoInt, Truthy},
    dictionary::Dictionary,
    value::{Entry, IntoTag, Tag, Value},
};

#[derive(Debug, Clone, Default)]
pub struct Builder {
    buf: Vec<u8>,
    dictionary: Dictionary,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder that also accepts tag names from `dictionary`.
    pub fn with_dictionary(dictionary: Dictionary) -> Self {
        Self {
            buf: Vec::new(),
            dictionary,
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Discards the message; the dictionary is kept.
    pub fn reset(&mut self) -> &mut Self {
        debug!(discarded = self.buf.len(), "Builder reset");
        self.buf.clear();
        self
    }

    /// Adds every (tag, value) pair of `pairs`.
    ///
    /// A repeated entry (or any `Vec` of values) is written as one pair per
    /// element, all under the same tag.
    pub fn build<I, K, V>(
        &mut self,
        pairs: I,
    ) -> CmfResult<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: IntoTag,
        V: Into<Entry>,
    {
        for (key, values) in pairs {
            let tag = key.into_tag()?;
            for value in values.into().into_values() {
                self.add(&tag, value)?;
            }
        }
        Ok(self)
    }

    /// Adds a pair, choosing the wire type from the kind of value.
    ///
    /// Types without a wire form go through [`Value::display`] first.
    pub fn add<T, V>(
        &mut self,
        tag: T,
        value: V,
    ) -> CmfResult<&mut Self>
    where
        T: IntoTag,
        V: Into<Value>,
    {
        match value.into() {
            Value::Int(n) => self.add_int(tag, n),
            Value::Text(s) => self.add_string(tag, s),
            Value::Bytes(b) => self.add_bytes(tag, b),
            Value::Bool(b) => self.add_bool(tag, b),
            Value::Double(d) => self.add_double(tag, d),
        }
    }

    /// Adds an integer pair; the sign selects POSITIVE or NEGATIVE number.
    pub fn add_int<T, V>(
        &mut self,
        tag: T,
        value: V,
    ) -> CmfResult<&mut Self>
    where
        T: IntoTag,
        V: IntoInt,
    {
        let tag = self.resolve_tag(tag)?;
        let value = value.into_int()?;
        let magnitude =
            u64::try_from(value.unsigned_abs()).map_err(|_| BuildError::VarintOutOfRange { value })?;
        let ty = if value < 0 {
            TypeCode::NegativeNumber
        } else {
            TypeCode::PositiveNumber
        };

        self.write_header(tag, ty)?;
        write_varint(&mut self.buf, magnitude)?;
        Ok(self)
    }

    /// Adds a STRING pair from the text rendering of `value`.
    pub fn add_string<T, V>(
        &mut self,
        tag: T,
        value: V,
    ) -> CmfResult<&mut Self>
    where
        T: IntoTag,
        V: Display,
    {
        let tag = self.resolve_tag(tag)?;
        let text = value.to_string();

        self.write_header(tag, TypeCode::String)?;
        self.write_length_prefixed(text.as_bytes())?;
        Ok(self)
    }

    /// Adds a BYTE_ARRAY pair. The bytes are not validated.
    pub fn add_bytes<T, V>(
        &mut self,
        tag: T,
        value: V,
    ) -> CmfResult<&mut Self>
    where
        T: IntoTag,
        V: AsRef<[u8]>,
    {
        let tag = self.resolve_tag(tag)?;

        self.write_header(tag, TypeCode::ByteArray)?;
        self.write_length_prefixed(value.as_ref())?;
        Ok(self)
    }

    /// Adds a boolean pair from the truthiness of `value`.
    pub fn add_bool<T, V>(
        &mut self,
        tag: T,
        value: V,
    ) -> CmfResult<&mut Self>
    where
        T: IntoTag,
        V: Truthy,
    {
        let tag = self.resolve_tag(tag)?;
        self.write_header(tag, TypeCode::for_bool(value.is_truthy()))?;
        Ok(self)
    }

    /// Adds a DOUBLE pair, 8 bytes little-endian.
    pub fn add_double<T, V>(
        &mut self,
        tag: T,
        value: V,
    ) -> CmfResult<&mut Self>
    where
        T: IntoTag,
        V: IntoDouble,
    {
        let tag = self.resolve_tag(tag)?;
        let value = value.into_double()?;

        self.write_header(tag, TypeCode::Double)?;
        self.buf
            .write_f64::<LittleEndian>(value)
            .context("Failed to write double payload")?;
        Ok(self)
    }

    /// Same as [`add_double`](Self::add_double).
    pub fn add_float<T, V>(
        &mut self,
        tag: T,
        value: V,
    ) -> CmfResult<&mut Self>
    where
        T: IntoTag,
        V: IntoDouble,
    {
        self.add_double(tag, value)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Lowercase hex, two characters per byte.
    pub fn to_hex(&self) -> String {
        encode_hex(&self.buf)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Resolves a tag argument to its wire number.
    fn resolve_tag<T: IntoTag>(
        &self,
        tag: T,
    ) -> CmfResult<u64> {
        match tag.into_tag()? {
            Tag::Number(n) => Ok(n),
            Tag::Name(name) => self
                .dictionary
                .number(&name)
                .ok_or_else(|| BuildError::UnknownTagName { name }.into()),
        }
    }

    fn write_header(
        &mut self,
        tag: u64,
        ty: TypeCode,
    ) -> CmfResult<()> {
        trace!(tag, ty = ?ty, offset = self.buf.len(), "Writing pair");
        write_tag_typed(&mut self.buf, tag, ty)?;
        Ok(())
    }

    fn write_length_prefixed(
        &mut self,
        bytes: &[u8],
    ) -> CmfResult<()> {
        write_varint(&mut self.buf, bytes.len() as u64)?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }
}
