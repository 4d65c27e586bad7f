//! Wire-level building blocks: varints, type codes, the tag/type byte and
//! a cursor over message bytes.

pub mod hex;
pub mod reader;
pub mod tags;
pub mod types;
pub mod varint;

pub use self::hex::{decode_hex, encode_hex};
pub use reader::ByteReader;
pub use tags::{read_tag, write_tag, write_tag_typed, ESCAPE_TAG};
pub use types::TypeCode;
pub use varint::{read_varint, varint_size, write_varint, write_varint_signed, MAX_VARINT_LEN};
