//! Message parser.
//!
//! Reads one (tag, value) pair at a time from a buffer it never mutates.
//! The cursor only moves past a pair once the whole pair decoded; after an
//! error it still points at the start of the failing pair.
//!
//! ```
//! use cmf::{Parser, Tag, Value};
//!
//! let mut p = Parser::new();
//! p.set_message_hex("040d")?;
//! assert_eq!(p.next_pair()?, Some((Tag::Number(0), Value::Bool(true))));
//! assert_eq!(p.next_pair()?, Some((Tag::Number(1), Value::Bool(false))));
//! assert_eq!(p.next_pair()?, None);
//! # Ok::<(), cmf::StackError>(())
//! ```

use std::{borrow::Cow, iter::FusedIterator};

use cmf_error::{CmfResult, MalformedMessageError};
use indexmap::map::Entry as MapEntry;
use tracing::{debug, trace, warn};

use crate::{
    codec::{decode_hex, read_tag, ByteReader, TypeCode},
    config::{ParserOptions, Utf8Policy},
    dictionary::Dictionary,
    value::{Entry, Message, Tag, Value},
};

#[derive(Debug, Clone, Default)]
pub struct Parser<'a> {
    dictionary: Dictionary,
    options: ParserOptions,
    message: Cow<'a, [u8]>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser that reports tag names from `dictionary` where it has them.
    pub fn with_dictionary(dictionary: Dictionary) -> Self {
        Self {
            dictionary,
            ..Self::default()
        }
    }

    pub fn with_options(
        mut self,
        options: ParserOptions,
    ) -> Self {
        self.options = options;
        self
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Replaces the message and rewinds the cursor.
    pub fn set_message<M>(
        &mut self,
        message: M,
    ) where
        M: Into<Cow<'a, [u8]>>,
    {
        self.message = message.into();
        self.pos = 0;
        debug!(len = self.message.len(), "Parser message set");
    }

    /// Replaces the message with the decoded hex text.
    ///
    /// On invalid hex the previous message and cursor are kept.
    pub fn set_message_hex(
        &mut self,
        hex: &str,
    ) -> CmfResult<()> {
        let bytes = decode_hex(hex)?;
        self.set_message(bytes);
        Ok(())
    }

    /// Byte offset of the next pair.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.message.len()
    }

    /// Decodes the next pair, `Ok(None)` once the message is consumed.
    ///
    /// # Errors
    /// `MalformedMessage` if the pair is truncated, has an unknown type, a
    /// varint that does not fit in 64 bits, or (with [`Utf8Policy::Strict`])
    /// a STRING that is not UTF-8.
    pub fn next_pair(&mut self) -> CmfResult<Option<(Tag, Value)>> {
        if self.is_eof() {
            return Ok(None);
        }

        let start = self.pos;
        let mut r = ByteReader::at(&self.message, start);

        let (number, code) = read_tag(&mut r)?;
        let ty = TypeCode::from_code(code).ok_or(MalformedMessageError::UnknownType {
            code,
            offset: Some(start),
        })?;

        let value = match ty {
            TypeCode::PositiveNumber => Value::Int(i128::from(r.read_varint()?)),
            TypeCode::NegativeNumber => Value::Int(-i128::from(r.read_varint()?)),
            TypeCode::String => {
                let bytes = r.read_length_prefixed("string payload")?;
                let offset = r.position() - bytes.len();
                Value::Text(self.decode_text(bytes, offset)?)
            }
            TypeCode::ByteArray => Value::Bytes(r.read_length_prefixed("bytes payload")?.to_vec()),
            TypeCode::BoolTrue => Value::Bool(true),
            TypeCode::BoolFalse => Value::Bool(false),
            TypeCode::Double => Value::Double(r.read_f64_le()?),
        };

        let end = r.position();
        let tag = self.tag_for(number);
        trace!(tag = %tag, ty = ?ty, offset = start, len = end - start, "Decoded pair");

        self.pos = end;
        Ok(Some((tag, value)))
    }

    /// Lazy iterator over the remaining pairs.
    ///
    /// Yields the first error and then stops.
    pub fn pairs(&mut self) -> Pairs<'_, 'a> {
        Pairs {
            parser: self,
            done: false,
        }
    }

    /// Folds the remaining pairs into a [`Message`].
    ///
    /// A tag seen more than once collects its values in wire order. Any
    /// malformed pair fails the whole call.
    pub fn parse(&mut self) -> CmfResult<Message> {
        let mut message = Message::new();
        while let Some((tag, value)) = self.next_pair()? {
            match message.entry(tag) {
                MapEntry::Occupied(mut slot) => slot.get_mut().push(value),
                MapEntry::Vacant(slot) => {
                    slot.insert(Entry::Single(value));
                }
            }
        }
        Ok(message)
    }

    /// Sets `message` and parses it.
    pub fn parse_message<M>(
        &mut self,
        message: M,
    ) -> CmfResult<Message>
    where
        M: Into<Cow<'a, [u8]>>,
    {
        self.set_message(message);
        self.parse()
    }

    /// Sets the message from hex text and parses it.
    pub fn parse_hex(
        &mut self,
        hex: &str,
    ) -> CmfResult<Message> {
        self.set_message_hex(hex)?;
        self.parse()
    }

    fn tag_for(
        &self,
        number: u64,
    ) -> Tag {
        match self.dictionary.name(number) {
            Some(name) => Tag::Name(name.to_string()),
            None => Tag::Number(number),
        }
    }

    fn decode_text(
        &self,
        bytes: &[u8],
        offset: usize,
    ) -> CmfResult<String> {
        match self.options.utf8 {
            Utf8Policy::Strict => std::str::from_utf8(bytes).map(str::to_string).map_err(|e| {
                MalformedMessageError::InvalidUtf8 {
                    reason: e.to_string(),
                    offset: Some(offset + e.valid_up_to()),
                }
                .into()
            }),
            Utf8Policy::Lossy => {
                let text = String::from_utf8_lossy(bytes);
                if let Cow::Owned(_) = text {
                    warn!(offset, len = bytes.len(), "Replaced invalid UTF-8 in string value");
                }
                Ok(text.into_owned())
            }
        }
    }
}

/// Iterator returned by [`Parser::pairs`].
#[derive(Debug)]
pub struct Pairs<'p, 'a> {
    parser: &'p mut Parser<'a>,
    done: bool,
}

impl Iterator for Pairs<'_, '_> {
    type Item = CmfResult<(Tag, Value)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.parser.next_pair() {
            Ok(Some(pair)) => Some(Ok(pair)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Pairs<'_, '_> {}
