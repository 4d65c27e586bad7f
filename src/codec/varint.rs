//! Biased big-endian variable-length integers.
//!
//! Groups of 7 bits, most significant group first. Every byte but the last
//! has the continuation bit (0x80) set. Unlike LEB128 each continuation adds
//! one to the value it prefixes, so every integer has exactly one encoding
//! and there is no "leading zero group" form:
//! - 0-127: 1 byte
//! - 128-16511: 2 bytes
//! - 16512-2113663: 3 bytes
//! - u64::MAX: 10 bytes

use std::io::Write;

use cmf_error::{ensure, BuildError, CmfResult, MalformedMessageError, ResultExt};
use tracing::trace;

/// Maximum number of bytes a u64 takes as a varint.
pub const MAX_VARINT_LEN: usize = 10;

/// Continuation bit, set on every byte but the last one.
pub const CONTINUATION_BIT: u8 = 0x80;

const PAYLOAD_MASK: u64 = 0x7F;

/// Writes `value` as a varint, returns the number of bytes written.
///
/// # Examples
/// ```
/// use cmf::codec::varint::write_varint;
///
/// let mut buf = Vec::new();
/// write_varint(&mut buf, 127).unwrap();
/// assert_eq!(buf, vec![0x7F]);
///
/// let mut buf = Vec::new();
/// write_varint(&mut buf, 128).unwrap();
/// assert_eq!(buf, vec![0x80, 0x00]);
/// ```
pub fn write_varint<W: Write>(
    w: &mut W,
    value: u64,
) -> CmfResult<usize> {
    let mut groups = [0u8; MAX_VARINT_LEN];
    let mut start = MAX_VARINT_LEN - 1;

    // Least significant group first, it is the only one without the
    // continuation bit.
    groups[start] = (value & PAYLOAD_MASK) as u8;
    let mut rest = value >> 7;
    while rest > 0 {
        rest -= 1;
        start -= 1;
        groups[start] = CONTINUATION_BIT | (rest & PAYLOAD_MASK) as u8;
        rest >>= 7;
    }

    let bytes = &groups[start..];
    w.write_all(bytes).context("Failed to write varint")?;
    Ok(bytes.len())
}

/// Writes a signed value as a varint.
///
/// # Errors
/// - `NegativeVarint` if `value < 0`
/// - `VarintOutOfRange` if `value > u64::MAX`
pub fn write_varint_signed<W: Write>(
    w: &mut W,
    value: i128,
) -> CmfResult<usize> {
    ensure!(value >= 0, BuildError::NegativeVarint { value });
    let value = u64::try_from(value).map_err(|_| BuildError::VarintOutOfRange { value })?;
    write_varint(w, value)
}

/// Reads a varint from the start of `buf`.
///
/// Returns the value and the number of bytes consumed.
///
/// # Errors
/// - `UnexpectedEof` if `buf` ends before a byte without the continuation bit
/// - `VarintOverflow` if the value does not fit in a u64
///
/// # Examples
/// ```
/// use cmf::codec::varint::read_varint;
///
/// assert_eq!(read_varint(&[0x7F]).unwrap(), (127, 1));
/// assert_eq!(read_varint(&[0x80, 0x00, 0x42]).unwrap(), (128, 2));
/// assert!(read_varint(&[0x80]).is_err());
/// ```
pub fn read_varint(buf: &[u8]) -> CmfResult<(u64, usize)> {
    let mut result: u64 = 0;

    for (i, &byte) in buf.iter().enumerate() {
        if result > u64::MAX >> 7 {
            trace!(offset = i, "Varint overflows 64 bits");
            return Err(MalformedMessageError::VarintOverflow { offset: Some(i) }.into());
        }
        result = (result << 7) | (byte as u64 & PAYLOAD_MASK);

        if byte & CONTINUATION_BIT == 0 {
            return Ok((result, i + 1));
        }

        result = result
            .checked_add(1)
            .ok_or(MalformedMessageError::VarintOverflow { offset: Some(i) })?;
    }

    trace!(len = buf.len(), "Varint not terminated");
    Err(MalformedMessageError::eof("varint")
        .with_offset(buf.len())
        .into())
}

/// Computes the varint size of a value without writing it.
pub fn varint_size(value: u64) -> usize {
    let mut size = 1;
    let mut rest = value >> 7;
    while rest > 0 {
        rest -= 1;
        rest >>= 7;
        size += 1;
    }
    size
}
