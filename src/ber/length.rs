//! BER definite-length encoding (X.690 8.1.3).

use crate::error::{DecodeErrorKind, Error, Result};

/// Largest content length accepted while decoding.
///
/// SNMP messages travel in single UDP datagrams, so anything above this is
/// a corrupt or hostile length field.
pub const MAX_LENGTH: usize = 0x0010_0000;

/// Encode a length for the reverse encode buffer.
///
/// Returns the bytes in reverse wire order together with how many of them
/// are valid.
pub fn encode_length(len: usize) -> ([u8; 9], usize) {
    let mut out = [0u8; 9];
    if len < 0x80 {
        out[0] = len as u8;
        return (out, 1);
    }

    let mut count = 0;
    let mut remaining = len;
    while remaining > 0 {
        out[count] = (remaining & 0xFF) as u8;
        remaining >>= 8;
        count += 1;
    }
    out[count] = 0x80 | count as u8;
    (out, count + 1)
}

/// Decode a length field at the start of `data`.
///
/// `base_offset` is the position of `data` within the whole message and is
/// only used for error reporting. Returns `(length, bytes consumed)`.
pub fn decode_length(data: &[u8], base_offset: usize) -> Result<(usize, usize)> {
    let first = *data
        .first()
        .ok_or_else(|| Error::decode(base_offset, DecodeErrorKind::TruncatedData))?;

    if first < 0x80 {
        return Ok((first as usize, 1));
    }
    if first == 0x80 {
        return Err(Error::decode(base_offset, DecodeErrorKind::IndefiniteLength));
    }

    let octets = (first & 0x7F) as usize;
    if octets > std::mem::size_of::<usize>() || octets > 4 {
        return Err(Error::decode(
            base_offset,
            DecodeErrorKind::LengthTooLong { octets },
        ));
    }
    if data.len() < 1 + octets {
        return Err(Error::decode(base_offset, DecodeErrorKind::TruncatedData));
    }

    let mut len: usize = 0;
    for &byte in &data[1..=octets] {
        len = (len << 8) | byte as usize;
    }

    if len > MAX_LENGTH {
        return Err(Error::decode(
            base_offset,
            DecodeErrorKind::LengthExceedsMax {
                length: len,
                max: MAX_LENGTH,
            },
        ));
    }

    Ok((len, 1 + octets))
}
