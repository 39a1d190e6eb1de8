//! Memo program: attaches utf-8 text to a transaction.

use super::MEMO_PROGRAM_ID;
use crate::account::{AccountMeta, PublicKey, TransactionInstruction};

/// Every key in `signers` must sign the transaction.
pub fn memo(text: &str, signers: &[PublicKey]) -> TransactionInstruction {
    TransactionInstruction::new(
        MEMO_PROGRAM_ID,
        signers
            .iter()
            .map(|key| AccountMeta::new_readonly(*key, true))
            .collect(),
        text.as_bytes().to_vec(),
    )
}
