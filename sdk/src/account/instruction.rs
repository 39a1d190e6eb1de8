//! Program calls, before and after compilation against a message.

use serde::{Deserialize, Serialize};

use super::{AccountMeta, PublicKey};
use crate::codec::{write_compact_bytes, CodecError, Decode, Encode, Reader};

/// An opaque call into an on-chain program. `data` is program-defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInstruction {
    pub program_id: PublicKey,
    pub keys: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

impl TransactionInstruction {
    pub fn new(program_id: PublicKey, keys: Vec<AccountMeta>, data: Vec<u8>) -> Self {
        Self {
            program_id,
            keys,
            data,
        }
    }
}

/// An instruction re-expressed as byte indexes into a message's resolved
/// account list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indexes: Vec<u8>,
    pub data: Vec<u8>,
}

impl CompiledInstruction {
    /// Largest index this instruction references.
    pub fn max_index(&self) -> u8 {
        self.account_indexes
            .iter()
            .copied()
            .fold(self.program_id_index, u8::max)
    }
}

/// `program_id_index || compact(len) || indexes || compact(len) || data`
impl Encode for CompiledInstruction {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(self.program_id_index);
        write_compact_bytes(out, &self.account_indexes);
        write_compact_bytes(out, &self.data);
    }
}

impl Decode for CompiledInstruction {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            program_id_index: reader.read_u8()?,
            account_indexes: reader.read_compact_bytes()?,
            data: reader.read_compact_bytes()?,
        })
    }
}
