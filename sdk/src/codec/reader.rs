//! Bounds-checked cursor over a borrowed byte buffer.

use super::{short_vec, CodecError, Decode};

/// Cursor that never reads past the end of its buffer.
///
/// Every read either returns exactly the bytes requested or fails with
/// [`CodecError::BufferLengthMismatch`]; nothing is ever zero-padded.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread tail of the buffer.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(CodecError::BufferLengthMismatch {
                expected: self.offset.saturating_add(len),
                actual: self.data.len(),
            })?;
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), CodecError> {
        self.read_bytes(len).map(|_| ())
    }

    pub fn peek_u8(&self) -> Option<u8> {
        self.data.get(self.offset).copied()
    }

    pub fn read<T: Decode>(&mut self) -> Result<T, CodecError> {
        T::decode(self)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        bool::decode(self)
    }

    pub fn read_compact_len(&mut self) -> Result<usize, CodecError> {
        short_vec::decode_len(self)
    }

    /// Compact length, then that many elements.
    pub fn read_compact_vec<T: Decode>(&mut self) -> Result<Vec<T>, CodecError> {
        let len = self.read_compact_len()?;
        self.read_n(len)
    }

    /// Compact length, then that many raw bytes.
    pub fn read_compact_bytes(&mut self) -> Result<Vec<u8>, CodecError> {
        let len = self.read_compact_len()?;
        Ok(self.read_bytes(len)?.to_vec())
    }

    /// `u32` count, then that many elements (Borsh vectors).
    pub fn read_vec_u32<T: Decode>(&mut self) -> Result<Vec<T>, CodecError> {
        let len = self.read_u32()? as usize;
        self.read_n(len)
    }

    /// SPL `COption`: a `u32` tag of 0 or 1 followed by a payload that is
    /// always on the wire. With tag 0 the payload bytes are consumed and
    /// discarded, so the field reads as `None` whatever they contain.
    pub fn read_coption<T: Decode>(&mut self) -> Result<Option<T>, CodecError> {
        let tag = self.read_u32()?;
        let value = T::decode(self)?;
        match tag {
            0 => Ok(None),
            1 => Ok(Some(value)),
            tag => Err(CodecError::UnknownDiscriminant {
                field: "COption",
                tag,
            }),
        }
    }

    /// Fails unless every byte has been consumed.
    pub fn finish(self) -> Result<(), CodecError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CodecError::BufferLengthMismatch {
                expected: self.offset,
                actual: self.data.len(),
            })
        }
    }

    fn read_n<T: Decode>(&mut self, len: usize) -> Result<Vec<T>, CodecError> {
        // A hostile length must not turn into a huge allocation before the
        // reads start failing.
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            items.push(T::decode(self)?);
        }
        Ok(items)
    }
}
