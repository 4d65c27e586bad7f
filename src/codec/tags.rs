//! Tag/type byte.
//!
//! Tags below 31 share one byte with the type code: `(tag << 3) | type`.
//! Larger tags set all five tag bits (`0xF8 | type`) and follow with the
//! tag as a varint.

use std::io::Write;

use cmf_error::{bail, BuildError, CmfResult, ResultExt};

use super::{reader::ByteReader, types::TYPE_MASK, varint::write_varint, TypeCode};

/// First tag that needs the escape form.
pub const ESCAPE_TAG: u64 = 31;

/// Tag bits of the escape byte.
pub const ESCAPE_BYTE: u8 = 0xF8;

/// Writes the tag/type header, returns the number of bytes written.
///
/// # Errors
/// `InvalidType` if `code` is not an assigned type code.
pub fn write_tag<W: Write>(
    w: &mut W,
    tag: u64,
    code: u8,
) -> CmfResult<usize> {
    let Some(ty) = TypeCode::from_code(code) else {
        bail!(BuildError::InvalidType { code });
    };
    write_tag_typed(w, tag, ty)
}

/// Same as [`write_tag`] for an already validated type.
pub fn write_tag_typed<W: Write>(
    w: &mut W,
    tag: u64,
    ty: TypeCode,
) -> CmfResult<usize> {
    if tag < ESCAPE_TAG {
        w.write_all(&[((tag as u8) << 3) | ty.code()])
            .context("Failed to write tag byte")?;
        return Ok(1);
    }

    w.write_all(&[ESCAPE_BYTE | ty.code()])
        .context("Failed to write tag escape byte")?;
    Ok(1 + write_varint(w, tag)?)
}

/// Reads a tag/type header.
///
/// Returns the tag and the raw type code; the code is not checked here so
/// the caller can report it together with the pair offset.
pub fn read_tag(r: &mut ByteReader<'_>) -> CmfResult<(u64, u8)> {
    let start = r.position();
    let byte = r.read_u8("tag")?;
    let code = byte & TYPE_MASK;
    let tag = u64::from(byte >> 3);

    if tag < ESCAPE_TAG {
        return Ok((tag, code));
    }

    let tag = r.read_varint().inspect_err(|_| r.rewind(start))?;
    Ok((tag, code))
}
