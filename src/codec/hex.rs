//! Lowercase hex text form of a message.

use cmf_error::{CmfResult, HexError};

/// Two lowercase hex digits per byte.
pub fn encode_hex<T: AsRef<[u8]>>(bytes: T) -> String {
    hex::encode(bytes)
}

/// Decodes hex text (either case). Surrounding whitespace is ignored.
///
/// # Errors
/// `HexError` for an odd number of digits or a non-hex character.
pub fn decode_hex(text: &str) -> CmfResult<Vec<u8>> {
    let text = text.trim();
    hex::decode(text).map_err(|e| {
        match e {
            hex::FromHexError::InvalidHexCharacter { c, index } => {
                HexError::InvalidCharacter { ch: c, index }
            }
            hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
                HexError::OddLength { len: text.len() }
            }
        }
        .into()
    })
}
