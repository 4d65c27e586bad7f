use std::any::Any;

use crate::{ErrorExt, StatusCode};

/// The message bytes cannot be decoded.
///
/// Every variant is the same kind of failure from the caller's point of
/// view ([`StatusCode::MalformedMessage`]); the variants only carry the cause
/// and the byte offset where decoding stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedMessageError {
    /// The buffer ended before a value was complete.
    UnexpectedEof {
        context: &'static str,
        offset: Option<usize>,
        expected_bytes: Option<usize>,
        got_bytes: Option<usize>,
    },

    /// A varint does not fit in 64 bits.
    VarintOverflow { offset: Option<usize> },

    /// Type code outside the known set (only 7 today).
    UnknownType { code: u8, offset: Option<usize> },

    /// A STRING payload is not valid UTF-8.
    InvalidUtf8 {
        reason: String,
        offset: Option<usize>,
    },
}

impl MalformedMessageError {
    /// Shorthand for a truncated read.
    pub fn eof(context: &'static str) -> Self {
        Self::UnexpectedEof {
            context,
            offset: None,
            expected_bytes: None,
            got_bytes: None,
        }
    }

    /// Shorthand for a length-prefixed or fixed-size read that came up short.
    pub fn short_read(
        context: &'static str,
        expected: usize,
        got: usize,
    ) -> Self {
        Self::UnexpectedEof {
            context,
            offset: None,
            expected_bytes: Some(expected),
            got_bytes: Some(got),
        }
    }

    /// Adds the byte offset to the error.
    pub fn with_offset(
        mut self,
        offset: usize,
    ) -> Self {
        match &mut self {
            Self::UnexpectedEof { offset: o, .. }
            | Self::VarintOverflow { offset: o }
            | Self::UnknownType { offset: o, .. }
            | Self::InvalidUtf8 { offset: o, .. } => {
                *o = Some(offset);
            }
        }
        self
    }

    /// Byte offset where decoding stopped, if known.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::UnexpectedEof { offset, .. }
            | Self::VarintOverflow { offset }
            | Self::UnknownType { offset, .. }
            | Self::InvalidUtf8 { offset, .. } => *offset,
        }
    }
}

impl std::fmt::Display for MalformedMessageError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::UnexpectedEof {
                context,
                offset,
                expected_bytes,
                got_bytes,
            } => {
                write!(f, "Unexpected end of stream while reading {context}")?;
                if let (Some(exp), Some(got)) = (expected_bytes, got_bytes) {
                    write!(f, " (expected {exp} bytes, got {got})")?;
                }
                write_offset(f, *offset)
            }
            Self::VarintOverflow { offset } => {
                write!(f, "Varint does not fit in 64 bits")?;
                write_offset(f, *offset)
            }
            Self::UnknownType { code, offset } => {
                write!(f, "Unknown type {code}")?;
                write_offset(f, *offset)
            }
            Self::InvalidUtf8 { reason, offset } => {
                write!(f, "String value is not valid UTF-8: {reason}")?;
                write_offset(f, *offset)
            }
        }
    }
}

fn write_offset(
    f: &mut std::fmt::Formatter<'_>,
    offset: Option<usize>,
) -> std::fmt::Result {
    if let Some(o) = offset {
        write!(f, " [offset: 0x{o:X}]")?;
    }
    Ok(())
}

impl std::error::Error for MalformedMessageError {}

impl ErrorExt for MalformedMessageError {
    fn status_code(&self) -> StatusCode {
        StatusCode::MalformedMessage
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
