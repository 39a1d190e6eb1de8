// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # solwire - transaction construction and binary codec
//!
//! Builds, signs, serializes and decodes the exact byte structures Solana
//! validators and RPC nodes expect. A one-byte ordering or length mistake
//! here produces a transaction the network rejects or misreads, so every
//! layout is bit-exact and every decode is total.
//!
//! ## Architecture
//!
//! - **codec** - little-endian primitives, compact lengths, option tags.
//! - **layout** - typed views of mint, token account, swap pool and lookup
//!   table account data, from raw bytes or the RPC `data` field.
//! - **account** - public keys, account metas, instructions.
//! - **message** - the compiler: deduplicated, privilege-ordered account
//!   table plus header, in legacy and v0 (lookup table) form.
//! - **transaction** - signature table, signing, verification, wire format.
//! - **programs** - instruction builders for the common native and SPL
//!   programs.
//! - **crypto** - Ed25519 keys and signatures, SHA-256.
//! - **config** - protocol constants and option structs.
//!
//! ## Ground rules
//!
//! 1. Everything is synchronous and pure. Network I/O (blockhashes,
//!    account fetches, sending bytes) belongs to the caller.
//! 2. Signatures are placed by public key, never by arrival order.
//! 3. Secret keys are never logged and only leave a [`crypto::Keypair`] in
//!    zero-on-drop buffers.
//! 4. The library never installs a tracing subscriber.

pub mod account;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod layout;
pub mod message;
pub mod programs;
pub mod transaction;

pub use account::{AccountMeta, CompiledInstruction, PublicKey, TransactionInstruction};
pub use config::{CompileOptions, SerializeConfig, SignerPromotion};
pub use crypto::{Hash, Keypair, Signature, Signer};
pub use message::{
    AddressLookupTableAccount, CompileError, Message, MessageHeader, MessageV0, VersionedMessage,
};
pub use transaction::{Transaction, TransactionError, VersionedTransaction};
