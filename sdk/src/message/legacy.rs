//! The original (unversioned) message format.

use serde::Serialize;
use tracing::debug;

use super::compiler::{compile_instructions, compile_legacy_keys};
use super::{check_instruction_indexes, CompileError, MessageHeader};
use crate::account::{CompiledInstruction, PublicKey, TransactionInstruction};
use crate::codec::{
    decode_exact, encode_to_vec, write_compact_vec, CodecError, Decode, Encode, Reader,
};
use crate::config::CompileOptions;
use crate::crypto::Hash;

/// A compiled legacy message: what every signer signs over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<PublicKey>,
    pub recent_blockhash: Hash,
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Compiles `instructions` with `payer` as the fee payer.
    pub fn compile(
        payer: &PublicKey,
        instructions: &[TransactionInstruction],
        recent_blockhash: Hash,
    ) -> Result<Self, CompileError> {
        Self::compile_with_signers(
            payer,
            instructions,
            recent_blockhash,
            &[],
            CompileOptions::default(),
        )
    }

    /// Compiles while checking that every key in `signature_keys` ends up
    /// in the signer prefix.
    pub fn compile_with_signers(
        payer: &PublicKey,
        instructions: &[TransactionInstruction],
        recent_blockhash: Hash,
        signature_keys: &[PublicKey],
        options: CompileOptions,
    ) -> Result<Self, CompileError> {
        if instructions.is_empty() {
            return Err(CompileError::NoInstructionsProvided);
        }
        let (header, account_keys) =
            compile_legacy_keys(payer, instructions, signature_keys, options)?;
        let instructions = compile_instructions(instructions, &account_keys)?;
        debug!(
            payer = %payer,
            keys = account_keys.len(),
            signers = header.num_required_signatures,
            instructions = instructions.len(),
            "compiled legacy message"
        );
        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        encode_to_vec(self)
    }

    /// Decodes a message that must span the whole buffer.
    pub fn deserialize(data: &[u8]) -> Result<Self, CodecError> {
        decode_exact(data)
    }

    /// Header and index checks for a message that came off the wire.
    pub fn sanitize(&self) -> Result<(), CompileError> {
        self.header.sanitize(self.account_keys.len())?;
        check_instruction_indexes(&self.instructions, self.account_keys.len())
    }

    pub fn fee_payer(&self) -> Option<&PublicKey> {
        self.account_keys.first()
    }

    pub fn is_account_signer(&self, index: usize) -> bool {
        self.header.is_signer_index(index)
    }

    pub fn is_account_writable(&self, index: usize) -> bool {
        self.header
            .is_writable_index(index, self.account_keys.len())
    }

    /// The signer prefix of `account_keys`.
    pub fn signer_keys(&self) -> &[PublicKey] {
        let n = usize::from(self.header.num_required_signatures).min(self.account_keys.len());
        &self.account_keys[..n]
    }

    /// Distinct program ids in first-use order.
    pub fn program_ids(&self) -> Vec<PublicKey> {
        let mut ids: Vec<PublicKey> = Vec::new();
        for ix in &self.instructions {
            if let Some(id) = self.account_keys.get(usize::from(ix.program_id_index)) {
                if !ids.contains(id) {
                    ids.push(*id);
                }
            }
        }
        ids
    }

    pub fn is_program_id(&self, index: usize) -> bool {
        self.instructions
            .iter()
            .any(|ix| usize::from(ix.program_id_index) == index)
    }
}

impl Encode for Message {
    fn encode(&self, out: &mut Vec<u8>) {
        self.header.encode(out);
        write_compact_vec(out, &self.account_keys);
        self.recent_blockhash.encode(out);
        write_compact_vec(out, &self.instructions);
    }
}

impl Decode for Message {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            header: reader.read()?,
            account_keys: reader.read_compact_vec()?,
            recent_blockhash: reader.read()?,
            instructions: reader.read_compact_vec()?,
        })
    }
}
