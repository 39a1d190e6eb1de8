//! # Cryptographic Primitives
//!
//! Thin, typed wrappers around audited implementations:
//!
//! - **Ed25519** (`ed25519-dalek`) for transaction signatures. Verification
//!   is strict: small-order keys and malleable signatures are rejected.
//! - **SHA-256** (`sha2`) for address derivation and blockhash-shaped digests.
//! - **Curve membership** (`curve25519-dalek`) for telling program-derived
//!   addresses apart from real keys.
//!
//! Nothing here logs key material.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{sha256, Hash, HashError};
pub use keys::{KeyError, Keypair, Signer};
pub use signatures::{verify, Signature, SignatureError};
