use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Dictionary validation failures.
///
/// Wrong-kind keys and values map to [`StatusCode::TypeError`]; repeated
/// numbers map to [`StatusCode::DuplicateValue`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictionaryError {
    #[error("Invalid dictionary key {key}. Must not be an integer")]
    IntegerKey { key: String },

    #[error("Invalid dictionary value {value} for key {key}. Must be an integer")]
    NonIntegerValue { key: String, value: String },

    #[error("Invalid dictionary value {value} for key {key}. Must be >= 0")]
    NegativeValue { key: String, value: i128 },

    #[error("Invalid dictionary value {value} for key {key}. Must fit in 64 bits")]
    ValueOutOfRange { key: String, value: i128 },

    #[error("Dictionary values must be unique: {value} is used by '{first}' and '{second}'")]
    DuplicateValue {
        value: u64,
        first: String,
        second: String,
    },

    #[error("Dictionary must be an array of names or an object of name to number: {reason}")]
    InvalidShape { reason: String },
}

impl DictionaryError {
    /// `true` for failures caused by a key or value of the wrong kind.
    pub fn is_wrong_kind(&self) -> bool {
        matches!(
            self,
            Self::IntegerKey { .. } | Self::NonIntegerValue { .. } | Self::InvalidShape { .. }
        )
    }
}

impl ErrorExt for DictionaryError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::IntegerKey { .. } | Self::NonIntegerValue { .. } | Self::InvalidShape { .. } => {
                StatusCode::TypeError
            }
            Self::NegativeValue { .. } => StatusCode::InvalidValue,
            Self::ValueOutOfRange { .. } => StatusCode::OutOfRange,
            Self::DuplicateValue { .. } => StatusCode::DuplicateValue,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
