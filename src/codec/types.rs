//! Type codes carried in the low 3 bits of every tag/type byte.
//!
//! The code decides how the payload after the tag is framed. Code 7 is not
//! assigned; seeing it on the wire means the message is malformed.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Mask selecting the type code bits of a tag/type byte.
pub const TYPE_MASK: u8 = 0x07;

/// Wire type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum TypeCode {
    /// Varint magnitude.
    PositiveNumber = 0,
    /// Varint magnitude of the negated value.
    NegativeNumber = 1,
    /// Varint byte length, then UTF-8 bytes.
    String = 2,
    /// Varint byte length, then raw bytes.
    ByteArray = 3,
    /// No payload.
    BoolTrue = 4,
    /// No payload.
    BoolFalse = 5,
    /// 8 bytes, little-endian IEEE-754 double.
    Double = 6,
}

impl TypeCode {
    /// Looks up a type code, `None` for unassigned codes.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::try_from(code).ok()
    }

    /// Numeric wire code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Type used for a boolean value.
    pub const fn for_bool(value: bool) -> Self {
        if value {
            Self::BoolTrue
        } else {
            Self::BoolFalse
        }
    }

    /// `true` for types framed as varint length + bytes.
    pub const fn is_length_prefixed(self) -> bool {
        matches!(self, Self::String | Self::ByteArray)
    }
}
