use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Hex text given to a consuming entry point is not valid hex.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("Hex message has odd length {len}")]
    OddLength { len: usize },

    #[error("Invalid hex character {ch:?} at index {index}")]
    InvalidCharacter { ch: char, index: usize },
}

impl ErrorExt for HexError {
    fn status_code(&self) -> StatusCode {
        StatusCode::InvalidHex
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
