//! Transaction errors and signature verification.
//!
//! Verification recomputes the message bytes and checks each present
//! signature against the key in its slot. It never mutates the transaction.

use thiserror::Error;

use super::builder::Transaction;
use super::SignaturePair;
use crate::account::PublicKey;
use crate::codec::CodecError;
use crate::message::{CompileError, VersionedDecodeError};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from building, signing, verifying and (de)serializing
/// transactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("no signers")]
    NoSigner,

    /// A raw signature handed to `add_signature` was not 64 bytes.
    #[error("signature must be 64 bytes, got {0}")]
    InvalidSignerLength(usize),

    #[error("cannot add a signature for {0}: not a required signer")]
    NonSignerAddSignature(PublicKey),

    #[error("missing signature for {0}")]
    MissingSignatures(PublicKey),

    #[error("signature verification failed for {0}")]
    InvalidSignatures(PublicKey),

    /// The wire signature count disagrees with the message header.
    #[error("expected {expected} signatures, found {actual}")]
    SignatureCountMismatch { expected: usize, actual: usize },

    #[error("unsupported message version {0}")]
    UnsupportedVersion(u8),

    #[error("transaction is {size} bytes, limit is {max}")]
    TooLarge { size: usize, max: usize },
}

impl From<VersionedDecodeError> for TransactionError {
    fn from(err: VersionedDecodeError) -> Self {
        match err {
            VersionedDecodeError::Codec(err) => Self::Codec(err),
            VersionedDecodeError::UnsupportedVersion(version) => Self::UnsupportedVersion(version),
        }
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Checks a signature table against `message`.
///
/// With `require_all`, the first empty slot fails the whole check before any
/// curve arithmetic runs on the remaining slots. Without it, empty slots are
/// skipped.
pub(crate) fn verify_table(
    message: &[u8],
    table: &[SignaturePair],
    require_all: bool,
) -> Result<(), TransactionError> {
    if require_all {
        if let Some(missing) = table.iter().find(|pair| pair.signature.is_none()) {
            return Err(TransactionError::MissingSignatures(missing.public_key));
        }
    }
    for pair in table {
        if let Some(signature) = &pair.signature {
            if !signature.verify(&pair.public_key, message) {
                return Err(TransactionError::InvalidSignatures(pair.public_key));
            }
        }
    }
    Ok(())
}

impl Transaction {
    /// Verifies every attached signature against the current message.
    pub fn verify(&self, require_all: bool) -> Result<(), TransactionError> {
        let (message, table) = self.compiled_view()?;
        verify_table(&message.serialize(), &table, require_all)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
