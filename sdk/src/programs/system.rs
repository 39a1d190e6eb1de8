//! System program: lamport transfers and account creation.
//!
//! Instruction data starts with a `u32` discriminant.

use super::SYSTEM_PROGRAM_ID;
use crate::account::{AccountMeta, PublicKey, TransactionInstruction};
use crate::codec::Encode;

const CREATE_ACCOUNT: u32 = 0;
const ASSIGN: u32 = 1;
const TRANSFER: u32 = 2;
const CREATE_ACCOUNT_WITH_SEED: u32 = 3;
const ALLOCATE: u32 = 8;

fn data(tag: u32, fields: &[&dyn Encode]) -> Vec<u8> {
    let mut out = Vec::new();
    tag.encode(&mut out);
    for field in fields {
        field.encode(&mut out);
    }
    out
}

/// Moves `lamports` from `from` (signer) to `to`.
pub fn transfer(from: &PublicKey, to: &PublicKey, lamports: u64) -> TransactionInstruction {
    TransactionInstruction::new(
        SYSTEM_PROGRAM_ID,
        vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
        data(TRANSFER, &[&lamports]),
    )
}

/// Creates `new_account` with `space` bytes owned by `owner`, funded by
/// `from`. Both accounts sign.
pub fn create_account(
    from: &PublicKey,
    new_account: &PublicKey,
    lamports: u64,
    space: u64,
    owner: &PublicKey,
) -> TransactionInstruction {
    TransactionInstruction::new(
        SYSTEM_PROGRAM_ID,
        vec![
            AccountMeta::new(*from, true),
            AccountMeta::new(*new_account, true),
        ],
        data(CREATE_ACCOUNT, &[&lamports, &space, owner]),
    )
}

pub fn assign(account: &PublicKey, owner: &PublicKey) -> TransactionInstruction {
    TransactionInstruction::new(
        SYSTEM_PROGRAM_ID,
        vec![AccountMeta::new(*account, true)],
        data(ASSIGN, &[owner]),
    )
}

pub fn allocate(account: &PublicKey, space: u64) -> TransactionInstruction {
    TransactionInstruction::new(
        SYSTEM_PROGRAM_ID,
        vec![AccountMeta::new(*account, true)],
        data(ALLOCATE, &[&space]),
    )
}

/// Creates the account at `PublicKey::create_with_seed(base, seed, owner)`.
/// The seed is length-prefixed with a `u64`.
pub fn create_account_with_seed(
    from: &PublicKey,
    to: &PublicKey,
    base: &PublicKey,
    seed: &str,
    lamports: u64,
    space: u64,
    owner: &PublicKey,
) -> TransactionInstruction {
    let mut keys = vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)];
    if base != from {
        keys.push(AccountMeta::new_readonly(*base, true));
    }
    let seed_len = seed.len() as u64;
    let mut out = data(CREATE_ACCOUNT_WITH_SEED, &[base, &seed_len]);
    out.extend_from_slice(seed.as_bytes());
    for field in [&lamports as &dyn Encode, &space, owner] {
        field.encode(&mut out);
    }
    TransactionInstruction::new(SYSTEM_PROGRAM_ID, keys, out)
}
