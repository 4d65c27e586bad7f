//! Cursor over an immutable byte slice.
//!
//! Every read either advances the cursor past the bytes it consumed or
//! fails with a [`MalformedMessageError`] carrying the offset where it
//! stopped. A failed read leaves the cursor where it was.

use byteorder::{ByteOrder, LittleEndian};
use cmf_error::{CmfResult, MalformedMessageError};

use super::varint::read_varint;

/// Size of a DOUBLE payload.
pub const DOUBLE_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Starts reading `buf` at `pos`.
    pub fn at(
        buf: &'a [u8],
        pos: usize,
    ) -> Self {
        Self {
            buf,
            pos: pos.min(buf.len()),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor back to `pos`, used to undo a partial read.
    pub fn rewind(
        &mut self,
        pos: usize,
    ) {
        self.pos = pos.min(self.pos);
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub fn read_u8(
        &mut self,
        context: &'static str,
    ) -> CmfResult<u8> {
        let byte = *self
            .buf
            .get(self.pos)
            .ok_or_else(|| MalformedMessageError::eof(context).with_offset(self.pos))?;
        self.pos += 1;
        Ok(byte)
    }

    /// Reads exactly `len` bytes, borrowed from the underlying buffer.
    pub fn read_exact(
        &mut self,
        len: usize,
        context: &'static str,
    ) -> CmfResult<&'a [u8]> {
        let available = self.remaining();
        if len > available {
            return Err(MalformedMessageError::short_read(context, len, available)
                .with_offset(self.pos)
                .into());
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_varint(&mut self) -> CmfResult<u64> {
        let start = self.pos;
        let (value, consumed) = read_varint(&self.buf[start..]).map_err(|e| {
            // Offsets from the varint decoder are relative to `start`.
            match e.downcast_ref::<MalformedMessageError>() {
                Some(m) => {
                    let relative = m.offset().unwrap_or(0);
                    m.clone().with_offset(start + relative).into()
                }
                None => e,
            }
        })?;
        self.pos += consumed;
        Ok(value)
    }

    /// Reads a varint length and then that many bytes.
    pub fn read_length_prefixed(
        &mut self,
        context: &'static str,
    ) -> CmfResult<&'a [u8]> {
        let start = self.pos;
        let len = self.read_varint()?;
        // A length beyond the address space can never be satisfied.
        let len = usize::try_from(len).unwrap_or(usize::MAX);
        self.read_exact(len, context)
            .inspect_err(|_| self.rewind(start))
    }

    pub fn read_f64_le(&mut self) -> CmfResult<f64> {
        let bytes = self.read_exact(DOUBLE_LEN, "double payload")?;
        Ok(LittleEndian::read_f64(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_reads() {
        let data = [0x42, 0xB1, 0x70, 0x02, b'h', b'i'];
        let mut r = ByteReader::new(&data);

        assert_eq!(r.read_u8("byte").unwrap(), 0x42);
        assert_eq!(r.read_varint().unwrap(), 6512);
        assert_eq!(r.read_length_prefixed("string").unwrap(), b"hi");
        assert!(r.is_eof());
        assert_eq!(r.position(), data.len());
    }

    #[test]
    fn test_read_u8_eof() {
        let mut r = ByteReader::new(&[]);
        let err = r.read_u8("tag").unwrap_err();
        let m = err.downcast_ref::<MalformedMessageError>().unwrap();
        assert_eq!(m.offset(), Some(0));
    }

    #[test]
    fn test_short_read_keeps_position() {
        let data = [0x02, b'a'];
        let mut r = ByteReader::new(&data);

        let err = r.read_length_prefixed("string payload").unwrap_err();
        assert!(err.to_string().contains("expected 2 bytes, got 1"));
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn test_varint_error_offset_is_absolute() {
        let data = [0x00, 0x00, 0x80];
        let mut r = ByteReader::at(&data, 2);
        let err = r.read_varint().unwrap_err();
        let m = err.downcast_ref::<MalformedMessageError>().unwrap();
        assert_eq!(m.offset(), Some(3));
        assert_eq!(r.position(), 2);
    }

    #[test]
    fn test_read_f64() {
        let data = [0x9a, 0x99, 0x99, 0x99, 0x99, 0x99, 0xf1, 0x3f];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_f64_le().unwrap(), 1.1);
        assert!(r.is_eof());
    }

    #[test]
    fn test_read_f64_truncated() {
        let data = [0x9a, 0x99, 0x99];
        let mut r = ByteReader::new(&data);
        assert!(r.read_f64_le().is_err());
        assert_eq!(r.remaining(), 3);
    }

    #[test]
    fn test_huge_length_is_short_read() {
        let mut buf = Vec::new();
        crate::codec::varint::write_varint(&mut buf, u64::MAX).unwrap();
        let mut r = ByteReader::new(&buf);
        assert!(r.read_length_prefixed("bytes payload").is_err());
        assert_eq!(r.position(), 0);
    }
}
