//! # Transaction Engine
//!
//! Wraps a compiled message with its signature table and moves it to and
//! from the wire.
//!
//! ```text
//! builder.rs      - the mutable Transaction an application assembles, and its compile cache
//! signing.rs      - sign, partial_sign, add_signature
//! verification.rs - TransactionError and signature checks
//! wire.rs         - legacy wire serialization and deserialization
//! versioned.rs    - VersionedTransaction over either message format
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build**: create a [`Transaction`], add instructions, set the fee
//!    payer and a recent blockhash.
//! 2. **Compile**: happens lazily on the first operation that needs the
//!    message bytes, and again only after the builder changes.
//! 3. **Sign**: every signer signs the serialized message. Signatures are
//!    placed by public key, never by call order, so independent parties can
//!    [`Transaction::partial_sign`] in any order and converge on the same
//!    table.
//! 4. **Serialize**: `compact(n) || n * 64-byte signature || message`.
//!
//! Signing only ever changes the signature table. The message is a pure
//! function of instructions, fee payer, blockhash and signer set.

pub mod builder;
pub mod signing;
pub mod verification;
pub mod versioned;
pub mod wire;

pub use builder::Transaction;
pub use verification::TransactionError;
pub use versioned::VersionedTransaction;

use serde::Serialize;

use crate::account::PublicKey;
use crate::crypto::Signature;

/// One slot of the signature table: a required signer and its signature
/// once one has been attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignaturePair {
    pub public_key: PublicKey,
    pub signature: Option<Signature>,
}

impl SignaturePair {
    /// An empty slot for `public_key`.
    pub fn new(public_key: PublicKey) -> Self {
        Self {
            public_key,
            signature: None,
        }
    }
}
