//! Signing with one or more [`Signer`]s.
//!
//! Signing is separate from building because key material may live
//! elsewhere (hardware wallet, remote fee payer). Every signature lands in
//! the slot whose key matches the signer, so the order in which signers
//! arrive never matters.

use tracing::debug;

use super::builder::Transaction;
use super::verification::TransactionError;
use super::SignaturePair;
use crate::account::PublicKey;
use crate::crypto::{Signature, Signer};
use crate::message::CompileError;

/// Drops repeated keys, keeping the first signer for each.
fn unique_signers<S: Signer>(signers: &[S]) -> Result<Vec<(PublicKey, &S)>, TransactionError> {
    if signers.is_empty() {
        return Err(TransactionError::NoSigner);
    }
    let mut unique: Vec<(PublicKey, &S)> = Vec::with_capacity(signers.len());
    for signer in signers {
        let key = signer.public_key();
        if !unique.iter().any(|(seen, _)| *seen == key) {
            unique.push((key, signer));
        }
    }
    Ok(unique)
}

fn place(
    table: &mut [SignaturePair],
    key: &PublicKey,
    signature: Signature,
) -> Result<(), TransactionError> {
    let slot = table
        .iter_mut()
        .find(|pair| pair.public_key == *key)
        .ok_or(CompileError::UnknownSigner(*key))?;
    slot.signature = Some(signature);
    Ok(())
}

impl Transaction {
    /// Replaces the signature table with `signers` and signs.
    ///
    /// Any signature attached earlier is discarded. Without an explicit fee
    /// payer, the first signer pays. Fails with
    /// [`TransactionError::NoSigner`] if `signers` is empty; on any failure
    /// the transaction is left as it was.
    pub fn sign<S: Signer>(&mut self, signers: &[S]) -> Result<(), TransactionError> {
        let signers = unique_signers(signers)?;
        let keys: Vec<PublicKey> = signers.iter().map(|(key, _)| *key).collect();
        let message = self.compile_message(&keys)?;
        let bytes = message.serialize();

        let mut table: Vec<SignaturePair> = message
            .signer_keys()
            .iter()
            .map(|key| SignaturePair::new(*key))
            .collect();
        for (key, signer) in &signers {
            place(&mut table, key, signer.sign_message(&bytes))?;
        }
        debug!(
            signers = signers.len(),
            required = table.len(),
            "transaction signed"
        );
        self.signatures = table;
        self.message = Some(message);
        Ok(())
    }

    /// Adds signatures from `signers` and keeps the ones already present.
    ///
    /// Each signer must already be a required signer of the compiled
    /// message.
    pub fn partial_sign<S: Signer>(&mut self, signers: &[S]) -> Result<(), TransactionError> {
        let signers = unique_signers(signers)?;
        let (message, mut table) = self.compiled_view()?;
        let bytes = message.serialize();
        for (key, signer) in &signers {
            place(&mut table, key, signer.sign_message(&bytes))?;
        }
        debug!(signers = signers.len(), "transaction partially signed");
        let message = message.into_owned();
        self.signatures = table;
        self.message = Some(message);
        Ok(())
    }

    /// Attaches a signature produced elsewhere for `public_key`.
    ///
    /// The signature is stored as given; use [`Transaction::verify`] to check
    /// it.
    pub fn add_signature(
        &mut self,
        public_key: &PublicKey,
        signature: &[u8],
    ) -> Result<(), TransactionError> {
        let signature = Signature::try_from_slice(signature)
            .map_err(|_| TransactionError::InvalidSignerLength(signature.len()))?;
        let (message, mut table) = self.compiled_view()?;
        let slot = table
            .iter_mut()
            .find(|pair| pair.public_key == *public_key)
            .ok_or(TransactionError::NonSignerAddSignature(*public_key))?;
        slot.signature = Some(signature);
        let message = message.into_owned();
        self.signatures = table;
        self.message = Some(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Hash, Keypair};
    use crate::programs::{memo, system};

    fn shared_tx(payer: &Keypair, cosigner: &Keypair) -> Transaction {
        Transaction::new()
            .with_fee_payer(payer.public_key())
            .with_recent_blockhash(Hash::digest(b"shared"))
            .with_instruction(system::transfer(
                &payer.public_key(),
                &PublicKey::new_unique(),
                10,
            ))
            .with_instruction(memo::memo("co-signed", &[cosigner.public_key()]))
    }

    #[test]
    fn sign_requires_a_signer() {
        let payer = Keypair::generate();
        let mut tx = shared_tx(&payer, &Keypair::generate());
        let none: [&Keypair; 0] = [];
        assert_eq!(tx.sign(&none), Err(TransactionError::NoSigner));
    }

    #[test]
    fn sign_fills_every_slot() {
        let payer = Keypair::generate();
        let cosigner = Keypair::generate();
        let mut tx = shared_tx(&payer, &cosigner);
        tx.sign(&[&cosigner, &payer]).unwrap();
        assert_eq!(tx.signatures()[0].public_key, payer.public_key());
        assert!(tx.signatures().iter().all(|pair| pair.signature.is_some()));
    }

    #[test]
    fn duplicate_signers_sign_once() {
        let payer = Keypair::generate();
        let mut tx = Transaction::new()
            .with_recent_blockhash(Hash::default())
            .with_instruction(system::transfer(&payer.public_key(), &PublicKey::new_unique(), 1));
        tx.sign(&[&payer, &payer]).unwrap();
        assert_eq!(tx.signatures().len(), 1);
    }

    #[test]
    fn failed_sign_leaves_state_untouched() {
        let payer = Keypair::generate();
        let cosigner = Keypair::generate();
        let stranger = Keypair::generate();
        let mut tx = shared_tx(&payer, &cosigner);
        tx.partial_sign(&[&payer]).unwrap();
        let before = tx.clone();
        assert_eq!(
            tx.sign(&[&payer, &stranger]),
            Err(TransactionError::Compile(CompileError::UnknownSigner(
                stranger.public_key()
            )))
        );
        assert_eq!(tx, before);
    }

    #[test]
    fn partial_sign_order_does_not_matter() {
        let payer = Keypair::generate();
        let cosigner = Keypair::generate();

        let mut forward = shared_tx(&payer, &cosigner);
        forward.partial_sign(&[&payer]).unwrap();
        forward.partial_sign(&[&cosigner]).unwrap();

        let mut backward = shared_tx(&payer, &cosigner);
        backward.partial_sign(&[&cosigner]).unwrap();
        backward.partial_sign(&[&payer]).unwrap();

        assert_eq!(forward.signatures(), backward.signatures());
        assert!(forward.verify(true).is_ok());
    }

    #[test]
    fn partial_sign_rejects_non_signer() {
        let payer = Keypair::generate();
        let mut tx = shared_tx(&payer, &Keypair::generate());
        let stranger = Keypair::generate();
        assert_eq!(
            tx.partial_sign(&[&stranger]),
            Err(TransactionError::Compile(CompileError::UnknownSigner(
                stranger.public_key()
            )))
        );
    }

    #[test]
    fn add_signature_checks_length_and_slot() {
        let payer = Keypair::generate();
        let cosigner = Keypair::generate();
        let mut tx = shared_tx(&payer, &cosigner);
        assert_eq!(
            tx.add_signature(&payer.public_key(), &[0u8; 63]),
            Err(TransactionError::InvalidSignerLength(63))
        );
        let outsider = PublicKey::new_unique();
        assert_eq!(
            tx.add_signature(&outsider, &[0u8; 64]),
            Err(TransactionError::NonSignerAddSignature(outsider))
        );
    }

    #[test]
    fn remote_signature_verifies() {
        let payer = Keypair::generate();
        let cosigner = Keypair::generate();
        let mut tx = shared_tx(&payer, &cosigner);
        tx.partial_sign(&[&cosigner]).unwrap();

        let bytes = tx.serialize_message().unwrap();
        let remote = payer.sign(&bytes);
        tx.add_signature(&payer.public_key(), remote.as_ref()).unwrap();
        assert!(tx.verify(true).is_ok());
    }
}
