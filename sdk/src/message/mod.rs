//! # Message Compiler
//!
//! Turns an unordered instruction set, a fee payer and a recent blockhash
//! into the canonical message a validator signs over: an ordered,
//! deduplicated account table, a 3-byte privilege header, and instructions
//! re-expressed as byte indexes into that table.
//!
//! ```text
//! compiler.rs     - key ordering for both formats, instruction index compilation
//! legacy.rs       - the original message format
//! v0.rs           - versioned message with address lookup tables
//! lookup_table.rs - lookup table snapshots supplied to the v0 compiler
//! ```
//!
//! Compilation is a pure function of its inputs. It does no I/O and can be
//! re-run any number of times.

pub mod compiler;
pub mod legacy;
pub mod lookup_table;
pub mod v0;

pub use legacy::Message;
pub use lookup_table::AddressLookupTableAccount;
pub use v0::{MessageAddressTableLookup, MessageV0};

use serde::Serialize;
use thiserror::Error;

use crate::account::{CompiledInstruction, PublicKey};
use crate::codec::{CodecError, Decode, Encode, Reader};
use crate::config::MESSAGE_VERSION_PREFIX;
use crate::crypto::Hash;

/// Compilation and structural validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("transaction fee payer required")]
    MissingFeePayer,

    #[error("transaction recent blockhash required")]
    MissingRecentBlockhash,

    #[error("no instructions provided")]
    NoInstructionsProvided,

    #[error("unknown signer: {0}")]
    UnknownSigner(PublicKey),

    /// A signature was attached for an account no instruction marks as a
    /// signer. Only raised under `SignerPromotion::Reject`.
    #[error("account {0} has a signature but is not marked as a signer")]
    UnmarkedSigner(PublicKey),

    #[error("instruction references an account outside the resolved key list")]
    AccountIndexOutOfRange,

    #[error("message references more than 256 accounts")]
    AccountIndexOverflow,

    #[error("address lookup table index exceeds 255")]
    LookupTableIndexOverflow,

    #[error("address lookup table {0} is deactivated")]
    LookupTableInactive(PublicKey),

    #[error("address lookup table {0} was not supplied")]
    LookupTableNotFound(PublicKey),

    /// Header counts that cannot describe the key list they precede.
    #[error("message header is inconsistent with its account keys")]
    MalformedHeader,
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Three counters that partition a flat key list into writable signers,
/// readonly signers, writable non-signers and readonly non-signers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

impl MessageHeader {
    /// Whether the key at static position `index` is a signer.
    pub fn is_signer_index(&self, index: usize) -> bool {
        index < usize::from(self.num_required_signatures)
    }

    /// Whether the key at static position `index` is writable, given
    /// `num_static_keys` keys in total.
    pub fn is_writable_index(&self, index: usize, num_static_keys: usize) -> bool {
        let num_signed = usize::from(self.num_required_signatures);
        let num_readonly_signed = usize::from(self.num_readonly_signed_accounts);
        let num_readonly_unsigned = usize::from(self.num_readonly_unsigned_accounts);
        if index < num_signed {
            index < num_signed.saturating_sub(num_readonly_signed)
        } else {
            index < num_static_keys.saturating_sub(num_readonly_unsigned)
        }
    }

    /// Structural checks shared by both message formats: the signer and
    /// readonly-unsigned regions fit in the key list, and there is a
    /// writable fee payer.
    pub(crate) fn sanitize(&self, num_static_keys: usize) -> Result<(), CompileError> {
        let num_signed = usize::from(self.num_required_signatures);
        let num_readonly_unsigned = usize::from(self.num_readonly_unsigned_accounts);
        if num_signed.saturating_add(num_readonly_unsigned) > num_static_keys {
            return Err(CompileError::MalformedHeader);
        }
        if self.num_readonly_signed_accounts >= self.num_required_signatures {
            return Err(CompileError::MalformedHeader);
        }
        Ok(())
    }
}

impl Encode for MessageHeader {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(self.num_required_signatures);
        out.push(self.num_readonly_signed_accounts);
        out.push(self.num_readonly_unsigned_accounts);
    }
}

impl Decode for MessageHeader {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            num_required_signatures: reader.read_u8()?,
            num_readonly_signed_accounts: reader.read_u8()?,
            num_readonly_unsigned_accounts: reader.read_u8()?,
        })
    }
}

/// Checks every instruction index against `num_accounts`.
pub(crate) fn check_instruction_indexes(
    instructions: &[CompiledInstruction],
    num_accounts: usize,
) -> Result<(), CompileError> {
    for ix in instructions {
        if usize::from(ix.max_index()) >= num_accounts {
            return Err(CompileError::AccountIndexOutOfRange);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Versioned dispatch
// ---------------------------------------------------------------------------

/// Either message format, as carried by a [`crate::transaction::VersionedTransaction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionedMessage {
    Legacy(Message),
    V0(MessageV0),
}

impl VersionedMessage {
    pub fn header(&self) -> &MessageHeader {
        match self {
            Self::Legacy(message) => &message.header,
            Self::V0(message) => &message.header,
        }
    }

    pub fn static_account_keys(&self) -> &[PublicKey] {
        match self {
            Self::Legacy(message) => &message.account_keys,
            Self::V0(message) => &message.account_keys,
        }
    }

    pub fn recent_blockhash(&self) -> &Hash {
        match self {
            Self::Legacy(message) => &message.recent_blockhash,
            Self::V0(message) => &message.recent_blockhash,
        }
    }

    pub fn instructions(&self) -> &[CompiledInstruction] {
        match self {
            Self::Legacy(message) => &message.instructions,
            Self::V0(message) => &message.instructions,
        }
    }

    /// Address table lookups; always empty for legacy messages.
    pub fn address_table_lookups(&self) -> &[MessageAddressTableLookup] {
        match self {
            Self::Legacy(_) => &[],
            Self::V0(message) => &message.address_table_lookups,
        }
    }

    /// `None` for legacy, `Some(0)` for v0.
    pub fn version(&self) -> Option<u8> {
        match self {
            Self::Legacy(_) => None,
            Self::V0(_) => Some(0),
        }
    }

    /// The signer prefix of the static key list.
    pub fn signer_keys(&self) -> &[PublicKey] {
        let keys = self.static_account_keys();
        let num_signed = usize::from(self.header().num_required_signatures).min(keys.len());
        &keys[..num_signed]
    }

    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Self::Legacy(message) => message.serialize(),
            Self::V0(message) => message.serialize(),
        }
    }

    /// Decodes a message that must span the whole buffer.
    pub fn deserialize(data: &[u8]) -> Result<Self, VersionedDecodeError> {
        let mut reader = Reader::new(data);
        let message = Self::read(&mut reader)?;
        reader.finish()?;
        Ok(message)
    }

    /// Reads either format, dispatching on the high bit of the first byte.
    pub(crate) fn read(reader: &mut Reader<'_>) -> Result<Self, VersionedDecodeError> {
        match reader.peek_u8() {
            Some(prefix) if prefix & MESSAGE_VERSION_PREFIX != 0 => {
                let version = prefix & !MESSAGE_VERSION_PREFIX;
                if version != 0 {
                    return Err(VersionedDecodeError::UnsupportedVersion(version));
                }
                Ok(Self::V0(MessageV0::decode(reader)?))
            }
            _ => Ok(Self::Legacy(Message::decode(reader)?)),
        }
    }
}

/// Decode failures specific to version dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionedDecodeError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("unsupported message version {0}")]
    UnsupportedVersion(u8),
}
