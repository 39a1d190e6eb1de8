//! 32-byte account identities and address derivation.
//!
//! A [`PublicKey`] names every account, program and mint. Equality and
//! ordering are byte-wise; the textual form is base58.

use curve25519_dalek::edwards::CompressedEdwardsY;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use crate::codec::{CodecError, Decode, Encode, Reader};
use crate::config::{MAX_SEEDS, MAX_SEED_LEN, PDA_MARKER, PUBKEY_BYTES};

/// Longest base58 string that can decode to 32 bytes.
const MAX_BASE58_LEN: usize = 44;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PubkeyError {
    #[error("invalid base58 public key")]
    InvalidBase58,

    #[error("public key must be 32 bytes, got {0}")]
    WrongLength(usize),

    #[error("seed exceeds 32 bytes or more than 16 seeds supplied")]
    MaxSeedLengthExceeded,

    #[error("derived address lies on the ed25519 curve")]
    InvalidSeeds,

    #[error("no bump seed produced an off-curve address")]
    NoViableBumpSeed,
}

/// An account address.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey([u8; PUBKEY_BYTES]);

impl PublicKey {
    pub const fn new(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn try_from_slice(slice: &[u8]) -> Result<Self, PubkeyError> {
        let bytes: [u8; PUBKEY_BYTES] = slice
            .try_into()
            .map_err(|_| PubkeyError::WrongLength(slice.len()))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_BYTES] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; PUBKEY_BYTES] {
        self.0
    }

    /// A fresh, process-unique key. Only meant for tests and fixtures.
    pub fn new_unique() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut bytes = [0u8; PUBKEY_BYTES];
        // Big-endian so consecutive keys also sort in creation order.
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        bytes[0] = 0xfe;
        Self(bytes)
    }

    /// Whether the bytes decompress to a point on the ed25519 curve.
    /// Program-derived addresses are by construction off the curve.
    pub fn is_on_curve(&self) -> bool {
        CompressedEdwardsY(self.0).decompress().is_some()
    }

    /// `sha256(base || seed || owner)`. Used by system-program instructions
    /// that create accounts without a separate keypair.
    pub fn create_with_seed(
        base: &PublicKey,
        seed: &str,
        owner: &PublicKey,
    ) -> Result<PublicKey, PubkeyError> {
        if seed.len() > MAX_SEED_LEN {
            return Err(PubkeyError::MaxSeedLengthExceeded);
        }
        let mut hasher = Sha256::new();
        hasher.update(base.as_bytes());
        hasher.update(seed.as_bytes());
        hasher.update(owner.as_bytes());
        Ok(PublicKey(hasher.finalize().into()))
    }

    /// Derives a program address from `seeds`. Fails if the hash lands on
    /// the curve, since such an address could have a private key.
    pub fn create_program_address(
        seeds: &[&[u8]],
        program_id: &PublicKey,
    ) -> Result<PublicKey, PubkeyError> {
        if seeds.len() > MAX_SEEDS || seeds.iter().any(|seed| seed.len() > MAX_SEED_LEN) {
            return Err(PubkeyError::MaxSeedLengthExceeded);
        }
        let mut hasher = Sha256::new();
        for seed in seeds {
            hasher.update(seed);
        }
        hasher.update(program_id.as_bytes());
        hasher.update(PDA_MARKER);
        let address = PublicKey(hasher.finalize().into());
        if address.is_on_curve() {
            return Err(PubkeyError::InvalidSeeds);
        }
        Ok(address)
    }

    /// Searches bump seeds from 255 down and returns the first off-curve
    /// address with the bump that produced it.
    pub fn find_program_address(
        seeds: &[&[u8]],
        program_id: &PublicKey,
    ) -> Result<(PublicKey, u8), PubkeyError> {
        if seeds.len() >= MAX_SEEDS {
            return Err(PubkeyError::MaxSeedLengthExceeded);
        }
        for bump in (0..=u8::MAX).rev() {
            let bump_seed = [bump];
            let mut with_bump: Vec<&[u8]> = seeds.to_vec();
            with_bump.push(&bump_seed);
            match Self::create_program_address(&with_bump, program_id) {
                Ok(address) => return Ok((address, bump)),
                Err(PubkeyError::InvalidSeeds) => continue,
                Err(err) => return Err(err),
            }
        }
        Err(PubkeyError::NoViableBumpSeed)
    }
}

impl FromStr for PublicKey {
    type Err = PubkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() > MAX_BASE58_LEN {
            return Err(PubkeyError::InvalidBase58);
        }
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|_| PubkeyError::InvalidBase58)?;
        Self::try_from_slice(&bytes)
    }
}

impl From<[u8; PUBKEY_BYTES]> for PublicKey {
    fn from(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Raw 32-byte copy; no curve validation.
impl Decode for PublicKey {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self(reader.read_array()?))
    }
}

impl Encode for PublicKey {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_exact;

    #[test]
    fn base58_roundtrip() {
        let key = PublicKey::new_unique();
        let text = key.to_string();
        assert_eq!(text.parse::<PublicKey>().unwrap(), key);
    }

    #[test]
    fn all_zero_key_is_all_ones_in_base58() {
        assert_eq!(
            PublicKey::default().to_string(),
            "11111111111111111111111111111111"
        );
    }

    #[test]
    fn rejects_wrong_length_and_bad_alphabet() {
        assert_eq!(
            "1111".parse::<PublicKey>(),
            Err(PubkeyError::WrongLength(4))
        );
        assert_eq!(
            "0OIl".parse::<PublicKey>(),
            Err(PubkeyError::InvalidBase58)
        );
        assert_eq!(
            "1".repeat(45).parse::<PublicKey>(),
            Err(PubkeyError::InvalidBase58)
        );
    }

    #[test]
    fn ordering_is_bytewise() {
        let low = PublicKey::new([0; 32]);
        let mut high_bytes = [0; 32];
        high_bytes[0] = 1;
        let high = PublicKey::new(high_bytes);
        assert!(low < high);
    }

    #[test]
    fn unique_keys_differ() {
        assert_ne!(PublicKey::new_unique(), PublicKey::new_unique());
    }

    #[test]
    fn codec_reads_raw_bytes() {
        let bytes = [7u8; 32];
        assert_eq!(decode_exact::<PublicKey>(&bytes).unwrap(), PublicKey::new(bytes));
        assert!(decode_exact::<PublicKey>(&bytes[..31]).is_err());
    }

    #[test]
    fn serde_uses_base58_string() {
        let key = PublicKey::new_unique();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", key));
        let back: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn seeded_address_is_deterministic() {
        let base = PublicKey::new_unique();
        let owner = PublicKey::new_unique();
        let a = PublicKey::create_with_seed(&base, "vault", &owner).unwrap();
        let b = PublicKey::create_with_seed(&base, "vault", &owner).unwrap();
        assert_eq!(a, b);
        assert_ne!(
            a,
            PublicKey::create_with_seed(&base, "vault2", &owner).unwrap()
        );
    }

    #[test]
    fn seeded_address_rejects_long_seed() {
        let base = PublicKey::new_unique();
        assert_eq!(
            PublicKey::create_with_seed(&base, &"x".repeat(33), &base),
            Err(PubkeyError::MaxSeedLengthExceeded)
        );
    }

    #[test]
    fn found_program_address_is_off_curve_and_reproducible() {
        let program_id = PublicKey::new_unique();
        let (address, bump) =
            PublicKey::find_program_address(&[b"escrow".as_ref(), &[1u8, 2, 3]], &program_id).unwrap();
        assert!(!address.is_on_curve());
        let again =
            PublicKey::create_program_address(&[b"escrow".as_ref(), &[1u8, 2, 3], &[bump]], &program_id)
                .unwrap();
        assert_eq!(address, again);
    }

    #[test]
    fn program_address_rejects_oversized_seed() {
        let program_id = PublicKey::new_unique();
        let long = [0u8; 33];
        assert_eq!(
            PublicKey::create_program_address(&[long.as_ref()], &program_id),
            Err(PubkeyError::MaxSeedLengthExceeded)
        );
    }

    #[test]
    fn ed25519_public_keys_are_on_curve() {
        let keypair = crate::crypto::Keypair::from_seed(&[9u8; 32]);
        assert!(keypair.public_key().is_on_curve());
    }
}
