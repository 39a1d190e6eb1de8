//! Legacy wire format.
//!
//! ```text
//! transaction := compact(n) || n * signature(64) || message
//! ```
//!
//! Empty signature slots go out as 64 zero bytes and come back as `None`.

use tracing::trace;

use super::builder::Transaction;
use super::verification::{verify_table, TransactionError};
use super::SignaturePair;
use crate::account::{AccountMeta, TransactionInstruction};
use crate::codec::{encode_len, Reader};
use crate::config::{SerializeConfig, PACKET_DATA_SIZE};
use crate::crypto::Signature;
use crate::message::{CompileError, Message};

impl Transaction {
    /// The bytes every signer signs.
    pub fn serialize_message(&self) -> Result<Vec<u8>, TransactionError> {
        let (message, _) = self.compiled_view()?;
        Ok(message.serialize())
    }

    /// Wire bytes. Compiles if needed but never stores the result, and runs
    /// the signature checks `config` asks for first.
    pub fn serialize(&self, config: SerializeConfig) -> Result<Vec<u8>, TransactionError> {
        let (message, table) = self.compiled_view()?;
        let message_bytes = message.serialize();
        if config.verify_signatures {
            verify_table(&message_bytes, &table, config.require_all_signatures)?;
        } else if config.require_all_signatures {
            if let Some(missing) = table.iter().find(|pair| pair.signature.is_none()) {
                return Err(TransactionError::MissingSignatures(missing.public_key));
            }
        }

        let mut out = Vec::with_capacity(3 + table.len() * 64 + message_bytes.len());
        encode_len(&mut out, table.len());
        for pair in &table {
            let signature = pair.signature.unwrap_or_default();
            out.extend_from_slice(signature.as_bytes());
        }
        out.extend_from_slice(&message_bytes);
        if out.len() > PACKET_DATA_SIZE {
            return Err(TransactionError::TooLarge {
                size: out.len(),
                max: PACKET_DATA_SIZE,
            });
        }
        trace!(bytes = out.len(), signatures = table.len(), "transaction serialized");
        Ok(out)
    }

    /// Parses wire bytes. The whole buffer must be consumed.
    pub fn from_bytes(data: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = Reader::new(data);
        let signatures: Vec<Signature> = reader.read_compact_vec()?;
        let message: Message = reader.read()?;
        reader.finish()?;
        Self::populate(message, signatures)
    }

    /// Rebuilds a transaction around an already compiled message.
    ///
    /// Instruction account flags come from the header partition, not from
    /// whatever the original instructions requested, so a round trip can
    /// upgrade a meta that was merged with a stronger one at compile time.
    /// The message itself is kept as is, so re-serializing is byte-identical.
    pub fn populate(message: Message, signatures: Vec<Signature>) -> Result<Self, TransactionError> {
        message.sanitize()?;
        let expected = usize::from(message.header.num_required_signatures);
        if signatures.len() != expected {
            return Err(TransactionError::SignatureCountMismatch {
                expected,
                actual: signatures.len(),
            });
        }

        let table: Vec<SignaturePair> = message
            .signer_keys()
            .iter()
            .zip(signatures)
            .map(|(key, signature)| SignaturePair {
                public_key: *key,
                signature: (!signature.is_placeholder()).then_some(signature),
            })
            .collect();

        let keys = &message.account_keys;
        let mut instructions = Vec::with_capacity(message.instructions.len());
        for compiled in &message.instructions {
            let program_id = *keys
                .get(usize::from(compiled.program_id_index))
                .ok_or(CompileError::AccountIndexOutOfRange)?;
            let mut metas = Vec::with_capacity(compiled.account_indexes.len());
            for index in compiled.account_indexes.iter().map(|i| usize::from(*i)) {
                let pubkey = *keys.get(index).ok_or(CompileError::AccountIndexOutOfRange)?;
                metas.push(AccountMeta {
                    pubkey,
                    is_signer: message.is_account_signer(index),
                    is_writable: message.is_account_writable(index),
                });
            }
            instructions.push(TransactionInstruction::new(
                program_id,
                metas,
                compiled.data.clone(),
            ));
        }

        Ok(Self {
            signatures: table,
            fee_payer: message.fee_payer().copied(),
            instructions,
            recent_blockhash: Some(message.recent_blockhash),
            compile_options: Default::default(),
            message: Some(message),
        })
    }
}
