//! Compact Message Format (CMF).
//!
//! A message is a flat sequence of (tag, value) pairs. Each pair starts with
//! a tag/type byte, followed by a payload whose framing the type decides:
//! a varint for integers, a varint length and bytes for strings and byte
//! arrays, nothing for booleans and 8 little-endian bytes for doubles.
//!
//! ```
//! use cmf::{Builder, Dictionary, Entry, Parser, Tag, Value};
//!
//! let dict = Dictionary::from_names(["name", "age"])?;
//!
//! let mut b = Builder::with_dictionary(dict.clone());
//! b.add("name", "Ada")?.add("age", 36)?;
//!
//! let message = Parser::with_dictionary(dict).parse_message(b.as_bytes())?;
//! assert_eq!(message[&Tag::from("age")], Entry::Single(Value::Int(36)));
//! # Ok::<(), cmf::StackError>(())
//! ```

/// Message builder: typed writers and coercions.
pub mod builder;
/// Wire primitives: varint, type codes, tag byte, byte reader, hex.
pub mod codec;
/// Input coercions used by the typed builder writers.
pub mod coerce;
/// Settings loaded from file and environment.
pub mod config;
/// Tag name <-> number table.
pub mod dictionary;
/// Console logging setup.
pub mod logging;
/// Message parser: pair at a time, iterator, or whole-message fold.
pub mod parser;
/// Tags, values and the parsed message map.
pub mod value;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

pub use builder::Builder;
pub use cmf_error::{
    BuildError, CmfResult, DictionaryError, ErrorExt, HexError, MalformedMessageError,
    StackError, StatusCode,
};
pub use coerce::{IntoDouble, IntoInt, Truthy};
pub use config::{ParserOptions, Settings, Utf8Policy};
pub use dictionary::Dictionary;
pub use parser::{Pairs, Parser};
pub use value::{Entry, IntoTag, Message, Tag, Value};

/// Builds a message from (tag, value) pairs.
pub fn build<I, K, V>(
    pairs: I,
    dictionary: Option<Dictionary>,
) -> CmfResult<Vec<u8>>
where
    I: IntoIterator<Item = (K, V)>,
    K: IntoTag,
    V: Into<Entry>,
{
    let mut builder = Builder::with_dictionary(dictionary.unwrap_or_default());
    builder.build(pairs)?;
    Ok(builder.into_bytes())
}

/// Same as [`build`], as lowercase hex.
pub fn build_hex<I, K, V>(
    pairs: I,
    dictionary: Option<Dictionary>,
) -> CmfResult<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: IntoTag,
    V: Into<Entry>,
{
    build(pairs, dictionary).map(codec::encode_hex)
}

/// Parses a whole message.
pub fn parse(
    message: &[u8],
    dictionary: Option<Dictionary>,
) -> CmfResult<Message> {
    Parser::with_dictionary(dictionary.unwrap_or_default()).parse_message(message)
}

/// Parses a whole message given as hex text.
pub fn parse_hex(
    hex: &str,
    dictionary: Option<Dictionary>,
) -> CmfResult<Message> {
    Parser::with_dictionary(dictionary.unwrap_or_default()).parse_hex(hex)
}
