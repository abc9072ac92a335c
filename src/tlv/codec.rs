//! TLV encoding and decoding.
//!
//! Types and lengths are VAR-NUMBERs: values below 253 take one byte, larger
//! values are prefixed by 253, 254 or 255 and stored big-endian in 2, 4 or 8
//! bytes. Non-negative integers use the shortest of 1, 2, 4 or 8 bytes.

use crate::error::{NdnKeyError, Result};

/// Append a VAR-NUMBER to `buf`.
pub fn write_var_number(buf: &mut Vec<u8>, value: u64) {
    if value < 253 {
        buf.push(value as u8);
    } else if value <= u16::MAX as u64 {
        buf.push(253);
        buf.extend_from_slice(&(value as u16).to_be_bytes());
    } else if value <= u32::MAX as u64 {
        buf.push(254);
        buf.extend_from_slice(&(value as u32).to_be_bytes());
    } else {
        buf.push(255);
        buf.extend_from_slice(&value.to_be_bytes());
    }
}

/// Shortest big-endian encoding of a non-negative integer.
pub fn encode_non_negative_integer(value: u64) -> Vec<u8> {
    if value <= u8::MAX as u64 {
        vec![value as u8]
    } else if value <= u16::MAX as u64 {
        (value as u16).to_be_bytes().to_vec()
    } else if value <= u32::MAX as u64 {
        (value as u32).to_be_bytes().to_vec()
    } else {
        value.to_be_bytes().to_vec()
    }
}

/// Decode a non-negative integer of 1, 2, 4 or 8 bytes.
pub fn decode_non_negative_integer(bytes: &[u8]) -> Result<u64> {
    match bytes.len() {
        1 | 2 | 4 | 8 => Ok(bytes.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64)),
        n => Err(NdnKeyError::DecodeError(format!(
            "Invalid non-negative integer length: {}",
            n
        ))),
    }
}

/// Builds a TLV byte sequence.
#[derive(Debug, Default, Clone)]
pub struct TlvWriter {
    buf: Vec<u8>,
}

impl TlvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one element with the given value.
    pub fn write(&mut self, typ: u64, value: &[u8]) -> &mut Self {
        write_var_number(&mut self.buf, typ);
        write_var_number(&mut self.buf, value.len() as u64);
        self.buf.extend_from_slice(value);
        self
    }

    /// Append one element holding a non-negative integer.
    pub fn write_uint(&mut self, typ: u64, value: u64) -> &mut Self {
        self.write(typ, &encode_non_negative_integer(value))
    }

    /// Append one element whose value is built by `build`.
    pub fn write_nested<F>(&mut self, typ: u64, build: F) -> &mut Self
    where
        F: FnOnce(&mut TlvWriter),
    {
        let mut inner = TlvWriter::new();
        build(&mut inner);
        self.write(typ, &inner.buf)
    }

    /// Append already-encoded elements verbatim.
    pub fn write_raw(&mut self, encoded: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(encoded);
        self
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// One decoded element, borrowing from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element<'a> {
    pub typ: u64,
    pub value: &'a [u8],
    /// The whole element including its type and length.
    pub raw: &'a [u8],
}

/// Reads consecutive TLV elements from a byte slice.
#[derive(Debug, Clone)]
pub struct TlvReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> TlvReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Type of the next element without consuming it.
    pub fn peek_type(&self) -> Option<u64> {
        self.clone().read_var_number().ok()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| {
                NdnKeyError::DecodeError(format!(
                    "Truncated TLV: need {} bytes at offset {}, have {}",
                    n,
                    self.pos,
                    self.data.len() - self.pos
                ))
            })?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_var_number(&mut self) -> Result<u64> {
        let first = self.take(1)?[0];
        let width = match first {
            253 => 2,
            254 => 4,
            255 => 8,
            small => return Ok(small as u64),
        };
        decode_non_negative_integer(self.take(width)?)
    }

    /// Read the next element.
    pub fn read(&mut self) -> Result<Element<'a>> {
        let start = self.pos;
        let typ = self.read_var_number()?;
        let len = self.read_var_number()?;
        let len = usize::try_from(len)
            .map_err(|_| NdnKeyError::DecodeError(format!("TLV length {} too large", len)))?;
        let value = self.take(len)?;
        Ok(Element {
            typ,
            value,
            raw: &self.data[start..self.pos],
        })
    }

    /// Read the next element and require its type to be `typ`.
    pub fn expect(&mut self, typ: u64) -> Result<Element<'a>> {
        let element = self.read()?;
        if element.typ != typ {
            return Err(NdnKeyError::DecodeError(format!(
                "Expected TLV type {}, found {}",
                typ, element.typ
            )));
        }
        Ok(element)
    }

    /// Read the next element only if it has type `typ`.
    pub fn optional(&mut self, typ: u64) -> Result<Option<Element<'a>>> {
        if self.peek_type() == Some(typ) {
            self.read().map(Some)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var_number(value: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        write_var_number(&mut buf, value);
        buf
    }

    #[test]
    fn test_var_number_widths() {
        assert_eq!(var_number(0), vec![0]);
        assert_eq!(var_number(252), vec![252]);
        assert_eq!(var_number(253), vec![253, 0x00, 0xFD]);
        assert_eq!(var_number(0x1_0000), vec![254, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(var_number(u64::MAX).len(), 9);
    }

    #[test]
    fn test_non_negative_integer_is_shortest() {
        assert_eq!(encode_non_negative_integer(1), vec![1]);
        assert_eq!(encode_non_negative_integer(3_600_000), vec![0x00, 0x36, 0xEE, 0x80]);
        assert_eq!(encode_non_negative_integer(0x1_0000_0000).len(), 8);
    }

    #[test]
    fn test_decode_non_negative_integer_rejects_odd_length() {
        assert!(decode_non_negative_integer(&[1, 2, 3]).is_err());
        assert_eq!(decode_non_negative_integer(&[0x01, 0x00]).unwrap(), 256);
    }

    #[test]
    fn test_nested_elements() {
        let mut writer = TlvWriter::new();
        writer
            .write_nested(20, |inner| {
                inner.write_uint(24, 2);
            })
            .write(21, b"abc");

        assert_eq!(writer.as_bytes(), &[20, 3, 24, 1, 2, 21, 3, b'a', b'b', b'c']);

        let bytes = writer.into_bytes();
        let mut reader = TlvReader::new(&bytes);
        let meta = reader.expect(20).unwrap();
        assert_eq!(meta.raw, &bytes[..5]);
        let content = reader.expect(21).unwrap();
        assert_eq!(content.value, b"abc");
        assert!(reader.is_empty());

        let mut inner = TlvReader::new(meta.value);
        let content_type = inner.expect(24).unwrap();
        assert_eq!(decode_non_negative_integer(content_type.value).unwrap(), 2);
    }

    #[test]
    fn test_long_value_uses_extended_length() {
        let value = vec![7u8; 300];
        let mut writer = TlvWriter::new();
        writer.write(21, &value);

        let bytes = writer.into_bytes();
        assert_eq!(&bytes[..4], &[21, 253, 0x01, 0x2C]);
        let element = TlvReader::new(&bytes).read().unwrap();
        assert_eq!(element.value.len(), 300);
    }

    #[test]
    fn test_truncated_input_is_an_error() {
        let mut reader = TlvReader::new(&[21, 5, 1, 2]);
        match reader.read() {
            Err(NdnKeyError::DecodeError(msg)) => assert!(msg.contains("Truncated")),
            _ => panic!("Expected DecodeError"),
        }
    }

    #[test]
    fn test_expect_wrong_type() {
        let mut reader = TlvReader::new(&[21, 0]);
        assert!(reader.expect(22).is_err());
    }

    #[test]
    fn test_optional_leaves_other_types() {
        let bytes = [25, 1, 9, 21, 0];
        let mut reader = TlvReader::new(&bytes);
        assert!(reader.optional(24).unwrap().is_none());
        assert_eq!(reader.optional(25).unwrap().unwrap().value, &[9]);
        assert_eq!(reader.peek_type(), Some(21));
    }
}
