// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Byte-level framing shared by values and envelopes.
//!
//! Frame layout:
//!
//! ```text
//! full:  [tag: u8] [type id: u32 LE] [len: u32 LE] [payload]
//! delta: [tag: u8]                   [len: u32 LE] [payload]
//! ```
//!
//! Integers are little-endian and fixed width.

use crate::error::CodecError;
use crate::error::CodecResult;

/// Tag for a full encoding of a builtin type.
pub const TAG_FULL_BUILTIN: u8 = 0x01;

/// Tag for a full encoding of a user-defined type.
pub const TAG_FULL_USER: u8 = 0x02;

/// Tag for a delta-only encoding.
pub const TAG_DELTA: u8 = 0x03;

/// Bytes of framing before a full payload.
pub const FULL_HEADER_LEN: usize = 1 + 4 + 4;

/// Bytes of framing before a delta payload.
pub const DELTA_HEADER_LEN: usize = 1 + 4;

/// An append-only output buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataOutput {
    buf: Vec<u8>,
}

impl DataOutput {
    pub fn new() -> DataOutput {
        return DataOutput { buf: Vec::new() };
    }

    #[inline]
    pub fn len(&self) -> usize {
        return self.buf.len();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.buf.is_empty();
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        return &self.buf;
    }

    pub fn into_vec(self) -> Vec<u8> {
        return self.buf;
    }

    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    #[inline]
    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(value as u8);
    }

    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Append bytes with no length prefix.
    #[inline]
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a u32 length prefix followed by the bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> CodecResult<()> {
        let len = u32::try_from(bytes.len()).map_err(|_| {
            CodecError::Serialization(format!("{} bytes exceed u32 length prefix", bytes.len()))
        })?;
        self.write_u32(len);
        self.write_raw(bytes);
        return Ok(());
    }

    pub fn write_str(&mut self, value: &str) -> CodecResult<()> {
        return self.write_bytes(value.as_bytes());
    }
}

/// A cursor over input bytes.
#[derive(Clone, Debug)]
pub struct DataInput<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> DataInput<'a> {
    pub fn new(buf: &'a [u8]) -> DataInput<'a> {
        return DataInput { buf, pos: 0 };
    }

    /// Bytes not yet consumed.
    #[inline]
    pub fn remaining(&self) -> usize {
        return self.buf.len() - self.pos;
    }

    /// Consume exactly `len` bytes.
    pub fn read_raw(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        if self.remaining() < len {
            return Err(CodecError::Truncated { needed: len - self.remaining() });
        }
        let out = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        return Ok(out);
    }

    pub fn read_u8(&mut self) -> CodecResult<u8> {
        return Ok(self.read_raw(1)?[0]);
    }

    pub fn read_bool(&mut self) -> CodecResult<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::Serialization(format!("invalid bool byte {other:#04x}"))),
        }
    }

    pub fn read_u32(&mut self) -> CodecResult<u32> {
        let bytes = self.read_raw(4)?;
        let mut array = [0u8; 4];
        array.copy_from_slice(bytes);
        return Ok(u32::from_le_bytes(array));
    }

    pub fn read_u64(&mut self) -> CodecResult<u64> {
        let bytes = self.read_raw(8)?;
        let mut array = [0u8; 8];
        array.copy_from_slice(bytes);
        return Ok(u64::from_le_bytes(array));
    }

    pub fn read_i64(&mut self) -> CodecResult<i64> {
        return Ok(self.read_u64()? as i64);
    }

    /// Read a u32 length prefix and that many bytes.
    pub fn read_bytes(&mut self) -> CodecResult<&'a [u8]> {
        let len = self.read_u32()? as usize;
        return self.read_raw(len);
    }

    pub fn read_str(&mut self) -> CodecResult<&'a str> {
        let bytes = self.read_bytes()?;
        return std::str::from_utf8(bytes)
            .map_err(|e| CodecError::Serialization(format!("invalid utf-8: {e}")));
    }

    /// Fail unless every byte has been consumed.
    pub fn finish(&self) -> CodecResult<()> {
        if self.remaining() != 0 {
            return Err(CodecError::Serialization(format!(
                "{} trailing bytes after payload",
                self.remaining()
            )));
        }
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_and_strings() {
        let mut out = DataOutput::new();
        out.write_u8(7);
        out.write_bool(true);
        out.write_u32(0xDEAD_BEEF);
        out.write_i64(-5);
        out.write_str("hello").unwrap();

        let mut input = DataInput::new(out.as_slice());
        assert_eq!(input.read_u8().unwrap(), 7);
        assert!(input.read_bool().unwrap());
        assert_eq!(input.read_u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(input.read_i64().unwrap(), -5);
        assert_eq!(input.read_str().unwrap(), "hello");
        assert!(input.finish().is_ok());
    }

    #[test]
    fn truncated_input_reports_shortfall() {
        let mut input = DataInput::new(&[1, 2]);
        assert_eq!(input.read_u32(), Err(CodecError::Truncated { needed: 2 }));
    }

    #[test]
    fn length_prefix_is_checked() {
        let mut out = DataOutput::new();
        out.write_u32(10);
        out.write_raw(b"abc");
        let mut input = DataInput::new(out.as_slice());
        assert_eq!(input.read_bytes(), Err(CodecError::Truncated { needed: 7 }));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let input = DataInput::new(&[0]);
        assert!(matches!(input.finish(), Err(CodecError::Serialization(_))));
    }
}
