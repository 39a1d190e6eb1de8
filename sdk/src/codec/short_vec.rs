//! Compact array length: 7 bits per byte, continuation flag in the MSB.
//!
//! Lengths are limited to `u16::MAX`, so an encoding is one to three bytes.
//! Decoding rejects aliases (a trailing zero continuation byte) so every
//! length has exactly one valid encoding.

use super::{CodecError, Reader};
use crate::config::MAX_COMPACT_LEN_BYTES;

/// Appends the compact encoding of `len`.
pub fn encode_len(out: &mut Vec<u8>, len: usize) {
    let mut rem = len;
    loop {
        let mut elem = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            out.push(elem);
            break;
        }
        elem |= 0x80;
        out.push(elem);
    }
}

/// Reads a compact length.
pub fn decode_len(reader: &mut Reader<'_>) -> Result<usize, CodecError> {
    let mut len: usize = 0;
    for nth in 0..MAX_COMPACT_LEN_BYTES {
        let elem = reader.read_u8()?;
        len |= ((elem & 0x7f) as usize) << (nth * 7);
        if elem & 0x80 == 0 {
            if elem == 0 && nth > 0 {
                return Err(CodecError::InvalidCompactLength);
            }
            if len > u16::MAX as usize {
                return Err(CodecError::InvalidCompactLength);
            }
            return Ok(len);
        }
    }
    Err(CodecError::InvalidCompactLength)
}

/// Number of bytes the compact encoding of `len` occupies.
pub fn encoded_len_size(len: usize) -> usize {
    let mut size = 1;
    let mut rem = len >> 7;
    while rem != 0 {
        size += 1;
        rem >>= 7;
    }
    size
}
