//! The mutable, pre-compilation transaction.
//!
//! A [`Transaction`] accumulates instructions, a fee payer and a recent
//! blockhash. It is not wire data until it has been compiled into a
//! [`Message`]. The compiled message is cached, and every setter that can
//! change the message drops the cache.

use std::borrow::Cow;

use tracing::debug;

use super::verification::TransactionError;
use super::SignaturePair;
use crate::account::{PublicKey, TransactionInstruction};
use crate::config::CompileOptions;
use crate::crypto::{Hash, Signature};
use crate::message::{CompileError, Message};

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A legacy transaction under construction.
///
/// The signature table is positional on the wire but keyed here: slot `i`
/// always belongs to `account_keys[i]` of the compiled message, and
/// signatures are only ever placed by matching public key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub(crate) signatures: Vec<SignaturePair>,
    pub(crate) fee_payer: Option<PublicKey>,
    pub(crate) instructions: Vec<TransactionInstruction>,
    pub(crate) recent_blockhash: Option<Hash>,
    pub(crate) compile_options: CompileOptions,
    pub(crate) message: Option<Message>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    // -- fluent construction -------------------------------------------------

    pub fn with_fee_payer(mut self, fee_payer: PublicKey) -> Self {
        self.set_fee_payer(fee_payer);
        self
    }

    pub fn with_recent_blockhash(mut self, blockhash: Hash) -> Self {
        self.set_recent_blockhash(blockhash);
        self
    }

    pub fn with_instruction(mut self, instruction: TransactionInstruction) -> Self {
        self.add_instruction(instruction);
        self
    }

    pub fn with_instructions(
        mut self,
        instructions: impl IntoIterator<Item = TransactionInstruction>,
    ) -> Self {
        for instruction in instructions {
            self.add_instruction(instruction);
        }
        self
    }

    /// Chooses how compilation treats a signature attached for an account
    /// that no instruction marks as a signer.
    pub fn with_compile_options(mut self, options: CompileOptions) -> Self {
        self.compile_options = options;
        self.message = None;
        self
    }

    // -- in-place mutation ---------------------------------------------------

    pub fn set_fee_payer(&mut self, fee_payer: PublicKey) {
        self.fee_payer = Some(fee_payer);
        self.message = None;
    }

    pub fn set_recent_blockhash(&mut self, blockhash: Hash) {
        self.recent_blockhash = Some(blockhash);
        self.message = None;
    }

    pub fn add_instruction(&mut self, instruction: TransactionInstruction) {
        self.instructions.push(instruction);
        self.message = None;
    }

    // -- accessors -----------------------------------------------------------

    pub fn signatures(&self) -> &[SignaturePair] {
        &self.signatures
    }

    /// The fee payer's signature, which doubles as the transaction id.
    pub fn signature(&self) -> Option<&Signature> {
        self.signatures.first().and_then(|pair| pair.signature.as_ref())
    }

    /// The explicit fee payer, or the first signer if none was set.
    pub fn fee_payer(&self) -> Option<PublicKey> {
        self.fee_payer
            .or_else(|| self.signatures.first().map(|pair| pair.public_key))
    }

    pub fn instructions(&self) -> &[TransactionInstruction] {
        &self.instructions
    }

    pub fn recent_blockhash(&self) -> Option<&Hash> {
        self.recent_blockhash.as_ref()
    }

    // -- compilation ---------------------------------------------------------

    /// Compiles a fresh message, validating `signature_keys` against the
    /// signer set. Never touches `self`.
    pub(crate) fn compile_message(
        &self,
        signature_keys: &[PublicKey],
    ) -> Result<Message, TransactionError> {
        let recent_blockhash = self
            .recent_blockhash
            .ok_or(CompileError::MissingRecentBlockhash)?;
        let fee_payer = self
            .fee_payer
            .or_else(|| signature_keys.first().copied())
            .ok_or(CompileError::MissingFeePayer)?;
        Ok(Message::compile_with_signers(
            &fee_payer,
            &self.instructions,
            recent_blockhash,
            signature_keys,
            self.compile_options,
        )?)
    }

    pub(crate) fn signature_keys(&self) -> Vec<PublicKey> {
        self.signatures.iter().map(|pair| pair.public_key).collect()
    }

    /// Compiles the message if the cache is empty and aligns the signature
    /// table with its signer prefix.
    ///
    /// Repeated calls with no builder change in between return the same
    /// message and leave attached signatures alone.
    pub fn compile(&mut self) -> Result<&Message, TransactionError> {
        let message = match self.message.take() {
            Some(message) => message,
            None => {
                let message = self.compile_message(&self.signature_keys())?;
                debug!(
                    signers = message.header.num_required_signatures,
                    keys = message.account_keys.len(),
                    "transaction compiled"
                );
                message
            }
        };
        self.signatures = aligned_table(&self.signatures, message.signer_keys());
        Ok(self.message.insert(message))
    }

    /// The message and signature table `compile` would produce, without
    /// storing either.
    pub(crate) fn compiled_view(
        &self,
    ) -> Result<(Cow<'_, Message>, Vec<SignaturePair>), TransactionError> {
        let message = match &self.message {
            Some(message) => Cow::Borrowed(message),
            None => Cow::Owned(self.compile_message(&self.signature_keys())?),
        };
        let table = aligned_table(&self.signatures, message.signer_keys());
        Ok((message, table))
    }
}

/// Rebuilds `table` to match `signer_keys` slot for slot. Signatures move
/// with their key; keys that left the signer set lose theirs.
pub(crate) fn aligned_table(
    table: &[SignaturePair],
    signer_keys: &[PublicKey],
) -> Vec<SignaturePair> {
    let in_order = table.len() == signer_keys.len()
        && table
            .iter()
            .zip(signer_keys)
            .all(|(pair, key)| pair.public_key == *key);
    if in_order {
        return table.to_vec();
    }
    signer_keys
        .iter()
        .map(|key| SignaturePair {
            public_key: *key,
            signature: table
                .iter()
                .find(|pair| pair.public_key == *key)
                .and_then(|pair| pair.signature),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
