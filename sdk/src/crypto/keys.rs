//! # Key Management
//!
//! Ed25519 keypairs and the [`Signer`] seam the transaction engine signs
//! through.
//!
//! The export format is the one every wallet uses: 64 bytes, the 32-byte
//! secret seed followed by the 32-byte public key. Exports are wrapped in
//! [`Zeroizing`] so the copy is wiped when dropped.

use ed25519_dalek::{Signer as DalekSigner, SigningKey};
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;
use zeroize::Zeroizing;

use super::Signature;
use crate::account::PublicKey;
use crate::config::{KEYPAIR_BYTES, SECRET_KEY_BYTES};

/// Key loading errors. Messages never include key bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("keypair must be {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("keypair validation failed: public key does not match secret key")]
    KeypairMismatch,

    #[error("keypair string is not valid base58")]
    InvalidBase58,

    #[error("keypair file is not a JSON array of bytes")]
    InvalidJson,
}

/// Anything that can produce an Ed25519 signature for a public key.
///
/// The transaction engine only ever talks to this trait, so hardware
/// wallets and remote signers plug in without touching it.
pub trait Signer {
    fn public_key(&self) -> PublicKey;
    fn sign_message(&self, message: &[u8]) -> Signature;
}

/// An Ed25519 signing identity.
///
/// Does not implement `Serialize`. Exporting a secret has to go through
/// [`Keypair::to_bytes`] or [`Keypair::to_base58_string`] explicitly.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// A fresh keypair from the OS RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic keypair from a 32-byte secret seed.
    pub fn from_seed(seed: &[u8; SECRET_KEY_BYTES]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Loads the 64-byte `secret || public` export. The public half must
    /// match the one derived from the secret.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let bytes: &[u8; KEYPAIR_BYTES] =
            bytes.try_into().map_err(|_| KeyError::WrongLength {
                expected: KEYPAIR_BYTES,
                actual: bytes.len(),
            })?;
        let signing_key =
            SigningKey::from_keypair_bytes(bytes).map_err(|_| KeyError::KeypairMismatch)?;
        Ok(Self { signing_key })
    }

    /// Base58 of the 64-byte export, the format wallets paste around.
    pub fn from_base58_string(s: &str) -> Result<Self, KeyError> {
        let bytes = Zeroizing::new(
            bs58::decode(s)
                .into_vec()
                .map_err(|_| KeyError::InvalidBase58)?,
        );
        Self::from_bytes(&bytes)
    }

    /// Parses a keypair file: a JSON array of 64 byte values.
    pub fn from_json(json: &str) -> Result<Self, KeyError> {
        let bytes: Zeroizing<Vec<u8>> = Zeroizing::new(
            serde_json::from_str(json).map_err(|_| KeyError::InvalidJson)?,
        );
        Self::from_bytes(&bytes)
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::new(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature::new(self.signing_key.sign(message).to_bytes())
    }

    /// The 64-byte `secret || public` export.
    pub fn to_bytes(&self) -> Zeroizing<[u8; KEYPAIR_BYTES]> {
        Zeroizing::new(self.signing_key.to_keypair_bytes())
    }

    pub fn to_base58_string(&self) -> Zeroizing<String> {
        Zeroizing::new(bs58::encode(self.to_bytes().as_slice()).into_string())
    }

    /// The 32-byte secret seed.
    pub fn secret_bytes(&self) -> Zeroizing<[u8; SECRET_KEY_BYTES]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }
}

impl Signer for Keypair {
    fn public_key(&self) -> PublicKey {
        Keypair::public_key(self)
    }

    fn sign_message(&self, message: &[u8]) -> Signature {
        self.sign(message)
    }
}

impl<T: Signer + ?Sized> Signer for &T {
    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }

    fn sign_message(&self, message: &[u8]) -> Signature {
        (**self).sign_message(message)
    }
}

impl Clone for Keypair {
    fn clone(&self) -> Self {
        Self::from_seed(&self.secret_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Public half only.
        write!(f, "Keypair({})", self.public_key())
    }
}

/// Keypairs compare by public key.
impl PartialEq for Keypair {
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for Keypair {}
