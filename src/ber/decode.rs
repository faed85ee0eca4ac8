//! BER decoding.
//!
//! Zero-copy decoding over `Bytes`: sub-decoders for constructed values and
//! OCTET STRING contents share the original buffer.

use bytes::Bytes;

use super::length::decode_length;
use super::tag;
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;

/// BER decoder that reads from a byte buffer.
///
/// Offsets in errors are absolute positions in the datagram, even for
/// sub-decoders.
pub struct Decoder {
    data: Bytes,
    offset: usize,
    base: usize,
}

impl Decoder {
    /// Create a new decoder from bytes.
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            offset: 0,
            base: 0,
        }
    }

    /// Create a decoder from a byte slice (copies the data).
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    /// Absolute offset of the next byte.
    pub fn offset(&self) -> usize {
        self.base + self.offset
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Check if we've reached the end.
    pub fn is_empty(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Peek at the next tag without consuming it.
    pub fn peek_tag(&self) -> Option<u8> {
        self.data.get(self.offset).copied()
    }

    /// Unread bytes, without consuming them.
    pub fn remaining_bytes(&self) -> Bytes {
        self.data.slice(self.offset..)
    }

    fn error(&self, kind: DecodeErrorKind) -> Error {
        self.error_at(self.offset(), kind)
    }

    fn error_at(&self, offset: usize, kind: DecodeErrorKind) -> Error {
        tracing::debug!(target: "snmp_agent::ber", { snmp.offset = offset, kind = %kind }, "decode error");
        Error::decode(offset, kind)
    }

    /// Require that every byte has been consumed.
    pub fn expect_end(&self) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        Err(self.error(DecodeErrorKind::TrailingBytes {
            count: self.remaining(),
        }))
    }

    /// Read a tag byte.
    pub fn read_tag(&mut self) -> Result<u8> {
        let tag = self
            .peek_tag()
            .ok_or_else(|| self.error(DecodeErrorKind::TruncatedData))?;
        self.offset += 1;
        Ok(tag)
    }

    /// Read a definite length.
    pub fn read_length(&mut self) -> Result<usize> {
        let (len, consumed) = decode_length(&self.data[self.offset..], self.offset())?;
        self.offset += consumed;
        Ok(len)
    }

    /// Read raw bytes without copying.
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        if self.offset.saturating_add(len) > self.data.len() {
            return Err(self.error(DecodeErrorKind::InsufficientData {
                needed: len,
                available: self.remaining(),
            }));
        }
        let bytes = self.data.slice(self.offset..self.offset + len);
        self.offset += len;
        Ok(bytes)
    }

    /// Read and expect a specific tag, returning the content length.
    pub fn expect_tag(&mut self, expected: u8) -> Result<usize> {
        let actual = self.read_tag()?;
        if actual != expected {
            self.offset -= 1;
            if expected == tag::universal::OCTET_STRING
                && actual == tag::universal::OCTET_STRING_CONSTRUCTED
            {
                return Err(self.error(DecodeErrorKind::ConstructedOctetString));
            }
            return Err(self.error(DecodeErrorKind::UnexpectedTag { expected, actual }));
        }
        self.read_length()
    }

    /// Read a tag and its length, returning both.
    pub fn read_header(&mut self) -> Result<(u8, usize)> {
        let tag = self.read_tag()?;
        let len = self.read_length()?;
        Ok((tag, len))
    }

    /// Read a BER INTEGER.
    pub fn read_integer(&mut self) -> Result<i32> {
        let len = self.expect_tag(tag::universal::INTEGER)?;
        self.read_integer_value(len)
    }

    /// Read INTEGER content of the given length.
    ///
    /// Redundant leading sign octets are accepted; more than four significant
    /// octets is an error.
    pub fn read_integer_value(&mut self, len: usize) -> Result<i32> {
        if len == 0 {
            return Err(self.error(DecodeErrorKind::ZeroLengthInteger));
        }

        let start = self.offset();
        let bytes = self.read_bytes(len)?;
        let digits = strip_sign_octets(&bytes);
        if digits.len() > 4 {
            return Err(self.error_at(start, DecodeErrorKind::IntegerTooLong { length: len }));
        }

        let mut value: i32 = if digits[0] & 0x80 != 0 { -1 } else { 0 };
        for &byte in digits {
            value = (value << 8) | i32::from(byte);
        }
        Ok(value)
    }

    /// Read unsigned 32-bit content of the given length.
    pub fn read_unsigned32_value(&mut self, len: usize) -> Result<u32> {
        let digits = self.read_unsigned_digits(len, 4)?;
        let mut value: u32 = 0;
        for &byte in digits.iter() {
            value = (value << 8) | u32::from(byte);
        }
        Ok(value)
    }

    /// Read Counter64 content of the given length.
    pub fn read_integer64_value(&mut self, len: usize) -> Result<u64> {
        let digits = self.read_unsigned_digits(len, 8)?;
        let mut value: u64 = 0;
        for &byte in digits.iter() {
            value = (value << 8) | u64::from(byte);
        }
        Ok(value)
    }

    /// Unsigned content with leading zero octets removed, at most `max` long.
    fn read_unsigned_digits(&mut self, len: usize, max: usize) -> Result<Bytes> {
        if len == 0 {
            return Err(self.error(DecodeErrorKind::ZeroLengthInteger));
        }

        let start = self.offset();
        let bytes = self.read_bytes(len)?;
        let zeros = bytes.iter().take(len - 1).take_while(|&&b| b == 0).count();
        if len - zeros > max {
            return Err(self.error_at(start, DecodeErrorKind::IntegerTooLong { length: len }));
        }
        Ok(bytes.slice(zeros..))
    }

    /// Read an OCTET STRING.
    pub fn read_octet_string(&mut self) -> Result<Bytes> {
        let len = self.expect_tag(tag::universal::OCTET_STRING)?;
        self.read_bytes(len)
    }

    /// Read a NULL.
    pub fn read_null(&mut self) -> Result<()> {
        let len = self.expect_tag(tag::universal::NULL)?;
        if len != 0 {
            return Err(self.error(DecodeErrorKind::InvalidNull));
        }
        Ok(())
    }

    /// Read an OBJECT IDENTIFIER.
    pub fn read_oid(&mut self) -> Result<Oid> {
        let len = self.expect_tag(tag::universal::OBJECT_IDENTIFIER)?;
        self.read_oid_value(len)
    }

    /// Read OID content of the given length.
    pub fn read_oid_value(&mut self, len: usize) -> Result<Oid> {
        let start = self.offset();
        let bytes = self.read_bytes(len)?;
        Oid::from_ber(&bytes).map_err(|err| match err {
            Error::Decode { offset, kind } => Error::decode(start + offset, kind),
            other => other,
        })
    }

    /// Read IpAddress content of the given length.
    pub fn read_ip_address_value(&mut self, len: usize) -> Result<[u8; 4]> {
        if len != 4 {
            return Err(self.error(DecodeErrorKind::InvalidIpAddressLength { length: len }));
        }
        let bytes = self.read_bytes(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Read a SEQUENCE, returning a decoder for its contents.
    pub fn read_sequence(&mut self) -> Result<Decoder> {
        self.read_constructed(tag::universal::SEQUENCE)
    }

    /// Read a constructed value with a specific tag, returning a decoder for
    /// its contents.
    pub fn read_constructed(&mut self, expected_tag: u8) -> Result<Decoder> {
        let len = self.expect_tag(expected_tag)?;
        self.sub_decoder(len)
    }

    /// Create a sub-decoder over the next `len` bytes.
    pub fn sub_decoder(&mut self, len: usize) -> Result<Decoder> {
        let base = self.offset();
        let content = self.read_bytes(len)?;
        Ok(Decoder {
            data: content,
            offset: 0,
            base,
        })
    }
}

/// Drop leading 0x00/0xFF octets that only repeat the sign of the next one.
fn strip_sign_octets(bytes: &[u8]) -> &[u8] {
    let mut digits = bytes;
    while let [first, second, ..] = digits
        && ((*first == 0x00 && second & 0x80 == 0) || (*first == 0xFF && second & 0x80 != 0))
    {
        digits = &digits[1..];
    }
    digits
}
