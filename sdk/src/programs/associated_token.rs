//! Associated token accounts: the canonical token account for an
//! (owner, mint) pair, at a program-derived address.

use super::{ProgramError, ASSOCIATED_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID};
use crate::account::{AccountMeta, PublicKey, TransactionInstruction};

const CREATE_IDEMPOTENT: u8 = 1;

/// Seeds are `[owner, token_program_id, mint]`.
pub fn get_associated_token_address(
    owner: &PublicKey,
    mint: &PublicKey,
    token_program_id: &PublicKey,
) -> Result<PublicKey, ProgramError> {
    let (address, _) = PublicKey::find_program_address(
        &[owner.as_ref(), token_program_id.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )?;
    Ok(address)
}

fn build(
    payer: &PublicKey,
    owner: &PublicKey,
    mint: &PublicKey,
    token_program_id: &PublicKey,
    data: Vec<u8>,
) -> Result<TransactionInstruction, ProgramError> {
    let address = get_associated_token_address(owner, mint, token_program_id)?;
    Ok(TransactionInstruction::new(
        ASSOCIATED_TOKEN_PROGRAM_ID,
        vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(address, false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(*token_program_id, false),
        ],
        data,
    ))
}

/// Fails on-chain if the account already exists.
pub fn create(
    payer: &PublicKey,
    owner: &PublicKey,
    mint: &PublicKey,
    token_program_id: &PublicKey,
) -> Result<TransactionInstruction, ProgramError> {
    build(payer, owner, mint, token_program_id, Vec::new())
}

/// Succeeds on-chain whether or not the account already exists.
pub fn create_idempotent(
    payer: &PublicKey,
    owner: &PublicKey,
    mint: &PublicKey,
    token_program_id: &PublicKey,
) -> Result<TransactionInstruction, ProgramError> {
    build(payer, owner, mint, token_program_id, vec![CREATE_IDEMPOTENT])
}
