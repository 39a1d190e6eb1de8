//! # Account & Instruction Model
//!
//! Value types shared by every layer above the codec: the 32-byte
//! [`PublicKey`], the per-instruction [`AccountMeta`] capability request,
//! and the [`TransactionInstruction`] / [`CompiledInstruction`] pair.

pub mod instruction;
pub mod meta;
pub mod pubkey;

pub use instruction::{CompiledInstruction, TransactionInstruction};
pub use meta::AccountMeta;
pub use pubkey::{PubkeyError, PublicKey};
