use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Errors raised while writing a message.
///
/// All of them are reported before anything is appended to the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Invalid tag value {tag}. Must be >= 0")]
    NegativeTag { tag: i128 },

    #[error("Tag '{name}' not found in dictionary")]
    UnknownTagName { name: String },

    #[error("Invalid type code {code}. Must be in 0..=6")]
    InvalidType { code: u8 },

    #[error("Invalid varint value {value}. Must be >= 0")]
    NegativeVarint { value: i128 },

    #[error("Varint value {value} does not fit in 64 bits")]
    VarintOutOfRange { value: i128 },

    #[error("Cannot convert {input:?} to {target}")]
    Coercion { target: &'static str, input: String },
}

impl ErrorExt for BuildError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NegativeTag { .. } => StatusCode::InvalidTag,
            Self::UnknownTagName { .. } => StatusCode::UnknownTagName,
            Self::InvalidType { .. } => StatusCode::InvalidType,
            Self::NegativeVarint { .. } => StatusCode::InvalidValue,
            Self::VarintOutOfRange { .. } => StatusCode::OutOfRange,
            Self::Coercion { .. } => StatusCode::CoercionFailed,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
