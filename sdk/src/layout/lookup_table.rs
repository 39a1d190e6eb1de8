//! Address lookup table account state.

use serde::Serialize;

use super::LayoutError;
use crate::account::PublicKey;
use crate::codec::{CodecError, Encode, Reader};
use crate::config::{LOOKUP_TABLE_ACTIVE_SENTINEL, LOOKUP_TABLE_META_SIZE, PUBKEY_BYTES};

/// `u32` discriminant of an initialized lookup table.
const LOOKUP_TABLE_TYPE: u32 = 1;

/// Decoded lookup table.
///
/// The 56-byte meta region is `u32` type, deactivation slot, last extended
/// slot, start index of the last extension, a one-byte authority tag with
/// the key only when set, then zero padding. Addresses follow, 32 bytes each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupTableState {
    pub deactivation_slot: u64,
    pub last_extended_slot: u64,
    pub last_extended_slot_start_index: u8,
    pub authority: Option<PublicKey>,
    pub addresses: Vec<PublicKey>,
}

impl LookupTableState {
    pub const META_LEN: usize = LOOKUP_TABLE_META_SIZE;

    /// A never-deactivated, authority-less table.
    pub fn active(addresses: Vec<PublicKey>) -> Self {
        Self {
            deactivation_slot: LOOKUP_TABLE_ACTIVE_SENTINEL,
            last_extended_slot: 0,
            last_extended_slot_start_index: 0,
            authority: None,
            addresses,
        }
    }

    pub fn is_active(&self) -> bool {
        self.deactivation_slot == LOOKUP_TABLE_ACTIVE_SENTINEL
    }

    pub fn decode_from(data: &[u8]) -> Result<Self, LayoutError> {
        let mut reader = Reader::new(data);
        match reader.read_u32()? {
            0 => return Err(LayoutError::UninitializedAccount),
            LOOKUP_TABLE_TYPE => {}
            tag => {
                return Err(CodecError::UnknownDiscriminant {
                    field: "lookup table type",
                    tag,
                }
                .into())
            }
        }
        let deactivation_slot = reader.read_u64()?;
        let last_extended_slot = reader.read_u64()?;
        let last_extended_slot_start_index = reader.read_u8()?;
        let authority = reader.read()?;
        reader.skip(Self::META_LEN - reader.offset())?;

        if reader.remaining() % PUBKEY_BYTES != 0 {
            return Err(CodecError::BufferLengthMismatch {
                expected: data.len() - reader.remaining() % PUBKEY_BYTES,
                actual: data.len(),
            }
            .into());
        }
        let count = reader.remaining() / PUBKEY_BYTES;
        let mut addresses = Vec::with_capacity(count);
        for _ in 0..count {
            addresses.push(reader.read()?);
        }
        tracing::trace!(addresses = count, "decoded lookup table");
        Ok(Self {
            deactivation_slot,
            last_extended_slot,
            last_extended_slot_start_index,
            authority,
            addresses,
        })
    }
}

impl Encode for LookupTableState {
    fn encode(&self, out: &mut Vec<u8>) {
        let start = out.len();
        LOOKUP_TABLE_TYPE.encode(out);
        self.deactivation_slot.encode(out);
        self.last_extended_slot.encode(out);
        self.last_extended_slot_start_index.encode(out);
        self.authority.encode(out);
        out.resize(start + Self::META_LEN, 0);
        for address in &self.addresses {
            address.encode(out);
        }
    }
}
