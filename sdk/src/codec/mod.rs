//! # Binary Primitive Codec
//!
//! Stateless little-endian read/write for every primitive the wire format and
//! the on-chain account layouts are built from: booleans, fixed-width
//! integers, 32-byte keys, discriminant-tagged optionals and length-prefixed
//! sequences.
//!
//! Reading goes through a bounds-checked [`Reader`]. Writing appends to a
//! plain `Vec<u8>`; encoding into a growable buffer cannot fail, so
//! [`Encode`] returns nothing.
//!
//! ```text
//! reader.rs    - cursor over a borrowed buffer, per-field sequence helpers
//! short_vec.rs - the 7-bits-per-byte compact length used by the wire format
//! ```
//!
//! Length prefixes are chosen per field, not globally: wire arrays use the
//! compact length, Borsh-style account fields use a `u32` count, and SPL
//! Token fields use a 4-byte `COption` tag with a fixed-size payload.

pub mod reader;
pub mod short_vec;

pub use reader::Reader;
pub use short_vec::{decode_len, encode_len};

use thiserror::Error;

/// Decode failures. All of them are fatal for the buffer being read and
/// have no effect on any other buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A read ran past the end of the buffer, or bytes were left over where
    /// the layout declares none.
    #[error("buffer length mismatch: expected {expected} bytes, got {actual}")]
    BufferLengthMismatch { expected: usize, actual: usize },

    /// An option, enum or boolean tag outside the values the field allows.
    #[error("unknown discriminant {tag} for {field}")]
    UnknownDiscriminant { field: &'static str, tag: u32 },

    /// Compact length that is non-canonical or exceeds `u16::MAX`.
    #[error("invalid compact length encoding")]
    InvalidCompactLength,

    #[error("string field is not valid utf-8")]
    InvalidUtf8,
}

/// Types that can be read from a [`Reader`].
pub trait Decode: Sized {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError>;
}

/// Types that can be appended to a byte buffer.
pub trait Encode {
    fn encode(&self, out: &mut Vec<u8>);
}

/// Decodes a value that must span the whole buffer.
pub fn decode_exact<T: Decode>(data: &[u8]) -> Result<T, CodecError> {
    let mut reader = Reader::new(data);
    let value = T::decode(&mut reader)?;
    reader.finish()?;
    Ok(value)
}

/// Encodes a value into a fresh buffer.
pub fn encode_to_vec<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
    let mut out = Vec::new();
    value.encode(&mut out);
    out
}

// ---------------------------------------------------------------------------
// Primitive impls
// ---------------------------------------------------------------------------

impl Decode for bool {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        match reader.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            tag => Err(CodecError::UnknownDiscriminant {
                field: "bool",
                tag: tag as u32,
            }),
        }
    }
}

impl Encode for bool {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(u8::from(*self));
    }
}

macro_rules! impl_le_int {
    ($($ty:ty),*) => {
        $(
            impl Decode for $ty {
                fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
                    Ok(<$ty>::from_le_bytes(reader.read_array()?))
                }
            }

            impl Encode for $ty {
                fn encode(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_le_int!(u8, u16, u32, u64, i64);

impl<const N: usize> Decode for [u8; N] {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        reader.read_array()
    }
}

impl<const N: usize> Encode for [u8; N] {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self);
    }
}

/// Zero-sized values; decoding consumes nothing.
impl Decode for () {
    fn decode(_reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(())
    }
}

impl<A: Decode, B: Decode> Decode for (A, B) {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok((A::decode(reader)?, B::decode(reader)?))
    }
}

/// Borsh-style option: one tag byte, payload only when present.
impl<T: Decode> Decode for Option<T> {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        match reader.read_u8()? {
            0 => Ok(None),
            1 => Ok(Some(T::decode(reader)?)),
            tag => Err(CodecError::UnknownDiscriminant {
                field: "Option",
                tag: tag as u32,
            }),
        }
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            None => out.push(0),
            Some(value) => {
                out.push(1);
                value.encode(out);
            }
        }
    }
}

/// Borsh-style string: `u32` byte length then utf-8.
impl Decode for String {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let len = reader.read_u32()? as usize;
        let bytes = reader.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8)
    }
}

impl Encode for str {
    fn encode(&self, out: &mut Vec<u8>) {
        (self.len() as u32).encode(out);
        out.extend_from_slice(self.as_bytes());
    }
}

impl Encode for String {
    fn encode(&self, out: &mut Vec<u8>) {
        self.as_str().encode(out);
    }
}

// ---------------------------------------------------------------------------
// Sequence writers
// ---------------------------------------------------------------------------

/// Writes a compact length followed by each element.
pub fn write_compact_vec<T: Encode>(out: &mut Vec<u8>, items: &[T]) {
    encode_len(out, items.len());
    for item in items {
        item.encode(out);
    }
}

/// Writes a compact length followed by raw bytes.
pub fn write_compact_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    encode_len(out, bytes.len());
    out.extend_from_slice(bytes);
}

/// Writes a `u32` count followed by each element (Borsh vectors).
pub fn write_vec_u32<T: Encode>(out: &mut Vec<u8>, items: &[T]) {
    (items.len() as u32).encode(out);
    for item in items {
        item.encode(out);
    }
}

/// Writes an SPL `COption`: a `u32` tag then a payload that is always
/// present on the wire, zero-filled when the option is empty.
pub fn write_coption<T: Encode + Default>(out: &mut Vec<u8>, value: &Option<T>) {
    match value {
        Some(inner) => {
            1u32.encode(out);
            inner.encode(out);
        }
        None => {
            0u32.encode(out);
            T::default().encode(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_rejects_values_other_than_zero_and_one() {
        assert_eq!(decode_exact::<bool>(&[0]), Ok(false));
        assert_eq!(decode_exact::<bool>(&[1]), Ok(true));
        assert_eq!(
            decode_exact::<bool>(&[2]),
            Err(CodecError::UnknownDiscriminant {
                field: "bool",
                tag: 2
            })
        );
    }

    #[test]
    fn integers_are_little_endian() {
        assert_eq!(encode_to_vec(&3000u64), vec![184, 11, 0, 0, 0, 0, 0, 0]);
        assert_eq!(encode_to_vec(&2u32), vec![2, 0, 0, 0]);
        assert_eq!(decode_exact::<u16>(&[0x34, 0x12]), Ok(0x1234));
    }

    #[test]
    fn short_integer_read_fails_instead_of_padding() {
        assert_eq!(
            decode_exact::<u64>(&[1, 2, 3]),
            Err(CodecError::BufferLengthMismatch {
                expected: 8,
                actual: 3
            })
        );
    }

    #[test]
    fn option_absent_has_no_payload() {
        assert_eq!(encode_to_vec(&None::<u64>), vec![0]);
        assert_eq!(decode_exact::<Option<u64>>(&[0]), Ok(None));
        assert_eq!(
            decode_exact::<Option<u16>>(&[1, 7, 0]),
            Ok(Some(7))
        );
    }

    #[test]
    fn option_unknown_tag_is_fatal() {
        assert_eq!(
            decode_exact::<Option<u8>>(&[9, 1]),
            Err(CodecError::UnknownDiscriminant {
                field: "Option",
                tag: 9
            })
        );
    }

    #[test]
    fn trailing_bytes_fail_exact_decode() {
        assert_eq!(
            decode_exact::<u8>(&[1, 2]),
            Err(CodecError::BufferLengthMismatch {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn borsh_string_prefix_is_u32() {
        let bytes = encode_to_vec("memo");
        assert_eq!(&bytes[..4], &[4, 0, 0, 0]);
        assert_eq!(decode_exact::<String>(&bytes).unwrap(), "memo");
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert_eq!(
            decode_exact::<String>(&[1, 0, 0, 0, 0xff]),
            Err(CodecError::InvalidUtf8)
        );
    }

    #[test]
    fn coption_none_still_writes_payload() {
        let mut out = Vec::new();
        write_coption::<u64>(&mut out, &None);
        assert_eq!(out, vec![0; 12]);

        let mut out = Vec::new();
        write_coption(&mut out, &Some(5u64));
        assert_eq!(out, vec![1, 0, 0, 0, 5, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn vec_prefixes_differ_per_field() {
        let mut compact = Vec::new();
        write_compact_vec(&mut compact, &[1u8, 2, 3]);
        assert_eq!(compact, vec![3, 1, 2, 3]);

        let mut borsh = Vec::new();
        write_vec_u32(&mut borsh, &[1u8, 2, 3]);
        assert_eq!(borsh, vec![3, 0, 0, 0, 1, 2, 3]);
    }
}
