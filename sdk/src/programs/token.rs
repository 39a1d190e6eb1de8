//! SPL Token instructions. Every builder takes the token program id so the
//! same code drives both the classic program and Token-2022.
//!
//! Instruction data starts with a one-byte discriminant. Authorities are
//! either a single signer or a multisig account followed by its signers.

use super::{ProgramError, SYSVAR_RENT_ID, TOKEN_2022_PROGRAM_ID, TOKEN_PROGRAM_ID};
use crate::account::{AccountMeta, PublicKey, TransactionInstruction};
use crate::codec::Encode;

const INITIALIZE_MINT: u8 = 0;
const INITIALIZE_ACCOUNT: u8 = 1;
const TRANSFER: u8 = 3;
const APPROVE: u8 = 4;
const REVOKE: u8 = 5;
const MINT_TO: u8 = 7;
const BURN: u8 = 8;
const CLOSE_ACCOUNT: u8 = 9;
const TRANSFER_CHECKED: u8 = 12;
const SYNC_NATIVE: u8 = 17;

fn check_program_id(token_program_id: &PublicKey) -> Result<(), ProgramError> {
    if *token_program_id == TOKEN_PROGRAM_ID || *token_program_id == TOKEN_2022_PROGRAM_ID {
        Ok(())
    } else {
        Err(ProgramError::IncorrectProgramId(*token_program_id))
    }
}

/// The authority, signing itself or as a multisig with `signers`.
fn push_authority(keys: &mut Vec<AccountMeta>, authority: &PublicKey, signers: &[PublicKey]) {
    keys.push(AccountMeta::new_readonly(*authority, signers.is_empty()));
    keys.extend(signers.iter().map(|s| AccountMeta::new_readonly(*s, true)));
}

fn with_amount(tag: u8, amount: u64) -> Vec<u8> {
    let mut data = vec![tag];
    amount.encode(&mut data);
    data
}

/// Data is the fixed 67-byte form: tag, decimals, mint authority, then a
/// one-byte option tag and a freeze authority that is zeroed when absent.
pub fn initialize_mint(
    token_program_id: &PublicKey,
    mint: &PublicKey,
    mint_authority: &PublicKey,
    freeze_authority: Option<&PublicKey>,
    decimals: u8,
) -> Result<TransactionInstruction, ProgramError> {
    check_program_id(token_program_id)?;
    let mut data = vec![INITIALIZE_MINT, decimals];
    mint_authority.encode(&mut data);
    data.push(u8::from(freeze_authority.is_some()));
    freeze_authority
        .copied()
        .unwrap_or_default()
        .encode(&mut data);
    Ok(TransactionInstruction::new(
        *token_program_id,
        vec![
            AccountMeta::new(*mint, false),
            AccountMeta::new_readonly(SYSVAR_RENT_ID, false),
        ],
        data,
    ))
}

pub fn initialize_account(
    token_program_id: &PublicKey,
    account: &PublicKey,
    mint: &PublicKey,
    owner: &PublicKey,
) -> Result<TransactionInstruction, ProgramError> {
    check_program_id(token_program_id)?;
    Ok(TransactionInstruction::new(
        *token_program_id,
        vec![
            AccountMeta::new(*account, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(SYSVAR_RENT_ID, false),
        ],
        vec![INITIALIZE_ACCOUNT],
    ))
}

pub fn transfer(
    token_program_id: &PublicKey,
    source: &PublicKey,
    destination: &PublicKey,
    authority: &PublicKey,
    signers: &[PublicKey],
    amount: u64,
) -> Result<TransactionInstruction, ProgramError> {
    check_program_id(token_program_id)?;
    let mut keys = vec![
        AccountMeta::new(*source, false),
        AccountMeta::new(*destination, false),
    ];
    push_authority(&mut keys, authority, signers);
    Ok(TransactionInstruction::new(
        *token_program_id,
        keys,
        with_amount(TRANSFER, amount),
    ))
}

/// Like [`transfer`] but the program also checks the mint and decimals.
/// Token-2022 mints with transfer fees require this form.
#[allow(clippy::too_many_arguments)]
pub fn transfer_checked(
    token_program_id: &PublicKey,
    source: &PublicKey,
    mint: &PublicKey,
    destination: &PublicKey,
    authority: &PublicKey,
    signers: &[PublicKey],
    amount: u64,
    decimals: u8,
) -> Result<TransactionInstruction, ProgramError> {
    check_program_id(token_program_id)?;
    let mut keys = vec![
        AccountMeta::new(*source, false),
        AccountMeta::new_readonly(*mint, false),
        AccountMeta::new(*destination, false),
    ];
    push_authority(&mut keys, authority, signers);
    let mut data = with_amount(TRANSFER_CHECKED, amount);
    data.push(decimals);
    Ok(TransactionInstruction::new(*token_program_id, keys, data))
}

pub fn approve(
    token_program_id: &PublicKey,
    source: &PublicKey,
    delegate: &PublicKey,
    owner: &PublicKey,
    signers: &[PublicKey],
    amount: u64,
) -> Result<TransactionInstruction, ProgramError> {
    check_program_id(token_program_id)?;
    let mut keys = vec![
        AccountMeta::new(*source, false),
        AccountMeta::new_readonly(*delegate, false),
    ];
    push_authority(&mut keys, owner, signers);
    Ok(TransactionInstruction::new(
        *token_program_id,
        keys,
        with_amount(APPROVE, amount),
    ))
}

pub fn revoke(
    token_program_id: &PublicKey,
    source: &PublicKey,
    owner: &PublicKey,
    signers: &[PublicKey],
) -> Result<TransactionInstruction, ProgramError> {
    check_program_id(token_program_id)?;
    let mut keys = vec![AccountMeta::new(*source, false)];
    push_authority(&mut keys, owner, signers);
    Ok(TransactionInstruction::new(
        *token_program_id,
        keys,
        vec![REVOKE],
    ))
}

pub fn mint_to(
    token_program_id: &PublicKey,
    mint: &PublicKey,
    destination: &PublicKey,
    mint_authority: &PublicKey,
    signers: &[PublicKey],
    amount: u64,
) -> Result<TransactionInstruction, ProgramError> {
    check_program_id(token_program_id)?;
    let mut keys = vec![
        AccountMeta::new(*mint, false),
        AccountMeta::new(*destination, false),
    ];
    push_authority(&mut keys, mint_authority, signers);
    Ok(TransactionInstruction::new(
        *token_program_id,
        keys,
        with_amount(MINT_TO, amount),
    ))
}

pub fn burn(
    token_program_id: &PublicKey,
    account: &PublicKey,
    mint: &PublicKey,
    owner: &PublicKey,
    signers: &[PublicKey],
    amount: u64,
) -> Result<TransactionInstruction, ProgramError> {
    check_program_id(token_program_id)?;
    let mut keys = vec![
        AccountMeta::new(*account, false),
        AccountMeta::new(*mint, false),
    ];
    push_authority(&mut keys, owner, signers);
    Ok(TransactionInstruction::new(
        *token_program_id,
        keys,
        with_amount(BURN, amount),
    ))
}

pub fn close_account(
    token_program_id: &PublicKey,
    account: &PublicKey,
    destination: &PublicKey,
    owner: &PublicKey,
    signers: &[PublicKey],
) -> Result<TransactionInstruction, ProgramError> {
    check_program_id(token_program_id)?;
    let mut keys = vec![
        AccountMeta::new(*account, false),
        AccountMeta::new(*destination, false),
    ];
    push_authority(&mut keys, owner, signers);
    Ok(TransactionInstruction::new(
        *token_program_id,
        keys,
        vec![CLOSE_ACCOUNT],
    ))
}

/// Brings a wrapped-SOL account's token amount in line with its lamports.
pub fn sync_native(
    token_program_id: &PublicKey,
    account: &PublicKey,
) -> Result<TransactionInstruction, ProgramError> {
    check_program_id(token_program_id)?;
    Ok(TransactionInstruction::new(
        *token_program_id,
        vec![AccountMeta::new(*account, false)],
        vec![SYNC_NATIVE],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_single_owner() {
        let (src, dst, owner) = (
            PublicKey::new_unique(),
            PublicKey::new_unique(),
            PublicKey::new_unique(),
        );
        let ix = transfer(&TOKEN_PROGRAM_ID, &src, &dst, &owner, &[], 5).unwrap();
        assert_eq!(ix.data, vec![3, 5, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(ix.keys[2], AccountMeta::new_readonly(owner, true));
    }

    #[test]
    fn multisig_authority_does_not_sign() {
        let multisig = PublicKey::new_unique();
        let s1 = PublicKey::new_unique();
        let s2 = PublicKey::new_unique();
        let ix = revoke(
            &TOKEN_2022_PROGRAM_ID,
            &PublicKey::new_unique(),
            &multisig,
            &[s1, s2],
        )
        .unwrap();
        assert_eq!(ix.keys[1], AccountMeta::new_readonly(multisig, false));
        assert_eq!(ix.keys[2], AccountMeta::new_readonly(s1, true));
        assert_eq!(ix.keys[3], AccountMeta::new_readonly(s2, true));
    }

    #[test]
    fn rejects_foreign_program_id() {
        let other = PublicKey::new_unique();
        assert_eq!(
            sync_native(&other, &PublicKey::new_unique()),
            Err(ProgramError::IncorrectProgramId(other))
        );
    }

    #[test]
    fn transfer_checked_appends_decimals() {
        let mint = PublicKey::new_unique();
        let ix = transfer_checked(
            &TOKEN_PROGRAM_ID,
            &PublicKey::new_unique(),
            &mint,
            &PublicKey::new_unique(),
            &PublicKey::new_unique(),
            &[],
            1_000,
            6,
        )
        .unwrap();
        assert_eq!(ix.data, vec![12, 232, 3, 0, 0, 0, 0, 0, 0, 6]);
        assert_eq!(ix.keys[1], AccountMeta::new_readonly(mint, false));
    }

    #[test]
    fn initialize_mint_is_fixed_width() {
        let mint = PublicKey::new_unique();
        let authority = PublicKey::new([1; 32]);
        let without = initialize_mint(&TOKEN_PROGRAM_ID, &mint, &authority, None, 9).unwrap();
        assert_eq!(without.data.len(), 67);
        assert_eq!(without.data[34], 0);
        assert_eq!(&without.data[35..], &[0u8; 32]);

        let freeze = PublicKey::new([2; 32]);
        let with =
            initialize_mint(&TOKEN_PROGRAM_ID, &mint, &authority, Some(&freeze), 9).unwrap();
        assert_eq!(with.data[34], 1);
        assert_eq!(&with.data[35..], freeze.as_bytes());
    }

    #[test]
    fn simple_tags() {
        let k = PublicKey::new_unique();
        let p = &TOKEN_PROGRAM_ID;
        assert_eq!(initialize_account(p, &k, &k, &k).unwrap().data, vec![1]);
        assert_eq!(approve(p, &k, &k, &k, &[], 1).unwrap().data[0], 4);
        assert_eq!(mint_to(p, &k, &k, &k, &[], 1).unwrap().data[0], 7);
        assert_eq!(burn(p, &k, &k, &k, &[], 1).unwrap().data[0], 8);
        assert_eq!(close_account(p, &k, &k, &k, &[]).unwrap().data, vec![9]);
        assert_eq!(sync_native(p, &k).unwrap().data, vec![17]);
    }
}
