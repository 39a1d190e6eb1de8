//! Transactions over either message format.
//!
//! Unlike [`super::Transaction`], a [`VersionedTransaction`] holds an
//! already compiled message: signatures are purely positional, slot `i`
//! belonging to static key `i`.

use tracing::debug;

use super::verification::{verify_table, TransactionError};
use super::SignaturePair;
use crate::account::PublicKey;
use crate::codec::{encode_len, Reader};
use crate::config::PACKET_DATA_SIZE;
use crate::crypto::{Signature, Signer};
use crate::message::{CompileError, VersionedMessage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedTransaction {
    /// One entry per required signer; all zeros until signed.
    pub signatures: Vec<Signature>,
    pub message: VersionedMessage,
}

impl VersionedTransaction {
    /// An unsigned transaction with a zeroed slot per required signer.
    pub fn new(message: VersionedMessage) -> Result<Self, TransactionError> {
        sanitize(&message)?;
        let required = usize::from(message.header().num_required_signatures);
        Ok(Self {
            signatures: vec![Signature::default(); required],
            message,
        })
    }

    /// Builds and signs in one step.
    pub fn try_new<S: Signer>(
        message: VersionedMessage,
        signers: &[S],
    ) -> Result<Self, TransactionError> {
        let mut tx = Self::new(message)?;
        tx.sign(signers)?;
        Ok(tx)
    }

    /// Signs with each of `signers`, leaving other slots untouched.
    pub fn sign<S: Signer>(&mut self, signers: &[S]) -> Result<(), TransactionError> {
        if signers.is_empty() {
            return Err(TransactionError::NoSigner);
        }
        let bytes = self.message.serialize();
        let mut signatures = self.signatures.clone();
        for signer in signers {
            let key = signer.public_key();
            let slot = self.slot_of(&key).ok_or(CompileError::UnknownSigner(key))?;
            signatures[slot] = signer.sign_message(&bytes);
        }
        debug!(
            signers = signers.len(),
            version = ?self.message.version(),
            "versioned transaction signed"
        );
        self.signatures = signatures;
        Ok(())
    }

    /// Attaches a signature produced elsewhere.
    pub fn add_signature(
        &mut self,
        public_key: &PublicKey,
        signature: &[u8],
    ) -> Result<(), TransactionError> {
        let signature = Signature::try_from_slice(signature)
            .map_err(|_| TransactionError::InvalidSignerLength(signature.len()))?;
        let slot = self
            .slot_of(public_key)
            .ok_or(TransactionError::NonSignerAddSignature(*public_key))?;
        self.signatures[slot] = signature;
        Ok(())
    }

    fn slot_of(&self, key: &PublicKey) -> Option<usize> {
        self.message
            .signer_keys()
            .iter()
            .position(|signer| signer == key)
            .filter(|slot| *slot < self.signatures.len())
    }

    /// Signature slots paired with their keys; zeroed slots read as `None`.
    pub fn signature_pairs(&self) -> Vec<SignaturePair> {
        self.message
            .signer_keys()
            .iter()
            .zip(&self.signatures)
            .map(|(key, signature)| SignaturePair {
                public_key: *key,
                signature: (!signature.is_placeholder()).then_some(*signature),
            })
            .collect()
    }

    pub fn verify(&self, require_all: bool) -> Result<(), TransactionError> {
        verify_table(
            &self.message.serialize(),
            &self.signature_pairs(),
            require_all,
        )
    }

    /// Wire bytes. Fails with [`TransactionError::TooLarge`] past the
    /// packet limit; signatures are not checked here, see [`Self::verify`].
    pub fn serialize(&self) -> Result<Vec<u8>, TransactionError> {
        let message = self.message.serialize();
        let mut out = Vec::with_capacity(3 + self.signatures.len() * 64 + message.len());
        encode_len(&mut out, self.signatures.len());
        for signature in &self.signatures {
            out.extend_from_slice(signature.as_bytes());
        }
        out.extend_from_slice(&message);
        if out.len() > PACKET_DATA_SIZE {
            return Err(TransactionError::TooLarge {
                size: out.len(),
                max: PACKET_DATA_SIZE,
            });
        }
        Ok(out)
    }

    /// Parses wire bytes of either format. The signature count has to match
    /// the header and the whole buffer must be consumed.
    pub fn deserialize(data: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = Reader::new(data);
        let signatures: Vec<Signature> = reader.read_compact_vec()?;
        let message = VersionedMessage::read(&mut reader)?;
        reader.finish()?;
        sanitize(&message)?;
        let expected = usize::from(message.header().num_required_signatures);
        if signatures.len() != expected {
            return Err(TransactionError::SignatureCountMismatch {
                expected,
                actual: signatures.len(),
            });
        }
        Ok(Self {
            signatures,
            message,
        })
    }
}

fn sanitize(message: &VersionedMessage) -> Result<(), CompileError> {
    match message {
        VersionedMessage::Legacy(message) => message.sanitize(),
        VersionedMessage::V0(message) => message.sanitize(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{AccountMeta, TransactionInstruction};
    use crate::codec::CodecError;
    use crate::crypto::{Hash, Keypair};
    use crate::message::{AddressLookupTableAccount, Message, MessageV0};
    use crate::programs::system;

    fn v0_message(payer: &Keypair) -> (VersionedMessage, PublicKey) {
        let loaded = PublicKey::new_unique();
        let table = AddressLookupTableAccount::new(PublicKey::new_unique(), vec![loaded]);
        let ix = system::transfer(&payer.public_key(), &loaded, 5);
        let message =
            MessageV0::compile(&payer.public_key(), &[ix], &[table], Hash::digest(b"v0")).unwrap();
        (VersionedMessage::V0(message), loaded)
    }

    #[test]
    fn v0_sign_roundtrip() {
        let payer = Keypair::generate();
        let (message, _) = v0_message(&payer);
        let tx = VersionedTransaction::try_new(message, &[&payer]).unwrap();
        assert!(tx.verify(true).is_ok());

        let bytes = tx.serialize().unwrap();
        assert_eq!(bytes[65], 0x80);
        let decoded = VersionedTransaction::deserialize(&bytes).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.serialize().unwrap(), bytes);
    }

    #[test]
    fn legacy_messages_decode_as_legacy() {
        let payer = Keypair::generate();
        let ix = system::transfer(&payer.public_key(), &PublicKey::new_unique(), 5);
        let message = Message::compile(&payer.public_key(), &[ix], Hash::default()).unwrap();
        let tx = VersionedTransaction::try_new(VersionedMessage::Legacy(message), &[&payer])
            .unwrap();
        let decoded = VersionedTransaction::deserialize(&tx.serialize().unwrap()).unwrap();
        assert_eq!(decoded.message.version(), None);
    }

    #[test]
    fn unknown_signer_is_rejected() {
        let payer = Keypair::generate();
        let (message, _) = v0_message(&payer);
        let stranger = Keypair::generate();
        assert_eq!(
            VersionedTransaction::try_new(message, &[&stranger]).unwrap_err(),
            TransactionError::Compile(CompileError::UnknownSigner(stranger.public_key()))
        );
    }

    #[test]
    fn unsigned_slots_read_as_missing() {
        let payer = Keypair::generate();
        let (message, _) = v0_message(&payer);
        let tx = VersionedTransaction::new(message).unwrap();
        assert_eq!(
            tx.verify(true),
            Err(TransactionError::MissingSignatures(payer.public_key()))
        );
        assert!(tx.verify(false).is_ok());
    }

    #[test]
    fn add_signature_by_key() {
        let payer = Keypair::generate();
        let (message, _) = v0_message(&payer);
        let mut tx = VersionedTransaction::new(message).unwrap();
        let signature = payer.sign(&tx.message.serialize());
        tx.add_signature(&payer.public_key(), signature.as_ref()).unwrap();
        assert!(tx.verify(true).is_ok());

        let outsider = PublicKey::new_unique();
        assert_eq!(
            tx.add_signature(&outsider, signature.as_ref()),
            Err(TransactionError::NonSignerAddSignature(outsider))
        );
    }

    #[test]
    fn signature_count_mismatch_is_rejected() {
        let payer = Keypair::generate();
        let (message, _) = v0_message(&payer);
        let mut bytes = vec![2u8];
        bytes.extend_from_slice(&[0u8; 128]);
        bytes.extend_from_slice(&message.serialize());
        assert_eq!(
            VersionedTransaction::deserialize(&bytes),
            Err(TransactionError::SignatureCountMismatch {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let mut bytes = vec![0u8, 0x85];
        bytes.extend_from_slice(&[0u8; 8]);
        assert_eq!(
            VersionedTransaction::deserialize(&bytes),
            Err(TransactionError::UnsupportedVersion(5))
        );
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let payer = Keypair::generate();
        let (message, _) = v0_message(&payer);
        let mut bytes = VersionedTransaction::try_new(message, &[&payer])
            .unwrap()
            .serialize()
            .unwrap();
        bytes.push(1);
        assert!(matches!(
            VersionedTransaction::deserialize(&bytes),
            Err(TransactionError::Codec(CodecError::BufferLengthMismatch { .. }))
        ));
    }

    #[test]
    fn oversized_transaction_is_rejected() {
        let payer = Keypair::generate();
        let instructions: Vec<TransactionInstruction> = (0..60)
            .map(|_| system::transfer(&payer.public_key(), &PublicKey::new_unique(), 1))
            .collect();
        let message =
            MessageV0::compile(&payer.public_key(), &instructions, &[], Hash::default()).unwrap();
        let tx = VersionedTransaction::try_new(VersionedMessage::V0(message), &[&payer]).unwrap();
        assert!(matches!(
            tx.serialize(),
            Err(TransactionError::TooLarge { size, max: PACKET_DATA_SIZE }) if size > PACKET_DATA_SIZE
        ));
    }

    #[test]
    fn instruction_data_is_untouched() {
        let payer = Keypair::generate();
        let program = PublicKey::new_unique();
        let ix = TransactionInstruction::new(
            program,
            vec![AccountMeta::new(payer.public_key(), true)],
            vec![9, 8, 7],
        );
        let message =
            MessageV0::compile(&payer.public_key(), &[ix], &[], Hash::default()).unwrap();
        let tx = VersionedTransaction::try_new(VersionedMessage::V0(message), &[&payer]).unwrap();
        assert_eq!(tx.message.instructions()[0].data, vec![9, 8, 7]);
    }
}
