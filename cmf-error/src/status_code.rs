use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Status codes used to categorize errors.
///
/// # Ranges:
/// - 0xxx: Success
/// - 1xxx: General errors
/// - 2xxx: Configuration errors (tags, dictionaries, coercions)
/// - 6xxx: IO
/// - 8xxx: Wire format / protocol errors
///
/// `num_enum::TryFromPrimitive` gives a native `TryFrom<u32>`, handy when a
/// code travels as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 0xxx: Success ===
    Success = 0,

    // === 1xxx: General errors ===
    Unknown = 1000,
    Unsupported = 1001,
    Internal = 1003,
    InvalidArgs = 1004,

    // === 2xxx: Configuration errors ===
    InvalidTag = 2000,
    UnknownTagName = 2001,
    InvalidType = 2002,
    TypeError = 2003,
    InvalidValue = 2004,
    DuplicateValue = 2005,
    OutOfRange = 2006,
    CoercionFailed = 2007,

    // === 6xxx: IO ===
    Io = 6000,
    UnexpectedEof = 6007,

    // === 8xxx: Wire format ===
    MalformedMessage = 8000,
    InvalidHex = 8001,
}

////////////////////////////////////////////////////////////////////////////////
// Inherent methods
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    /// Numeric representation of the status code.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Looks up a `StatusCode` by its number.
    ///
    /// Backed by `TryFrom<u32>` from `num_enum`; returns `None` when the value
    /// matches no variant.
    pub fn from_u32(v: u32) -> Option<Self> {
        Self::try_from(v).ok()
    }

    /// Returns `true` if `code` means success.
    pub fn is_success(code: u32) -> bool {
        Self::Success as u32 == code
    }

    /// The error was caused by the caller's input at write time: a bad tag,
    /// a bad dictionary, or a value that could not be coerced.
    ///
    /// `InvalidArgs` (1004) belongs here semantically and is matched
    /// explicitly.
    pub fn is_config_error(&self) -> bool {
        let c = self.code();
        if (2000..=2999).contains(&c) {
            return true;
        }
        matches!(self, Self::InvalidArgs)
    }

    /// Wire format errors: malformed messages and bad hex (8xxx).
    pub fn is_protocol_error(&self) -> bool {
        (8000..=8999).contains(&self.code())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Trait impls for StatusCode
////////////////////////////////////////////////////////////////////////////////

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
