//! Address lookup table program: table creation and extension.
//!
//! Instruction data starts with a `u32` discriminant; vectors carry a `u64`
//! length.

use super::{ProgramError, ADDRESS_LOOKUP_TABLE_PROGRAM_ID, SYSTEM_PROGRAM_ID};
use crate::account::{AccountMeta, PublicKey, TransactionInstruction};
use crate::codec::Encode;

const CREATE_LOOKUP_TABLE: u32 = 0;
const FREEZE_LOOKUP_TABLE: u32 = 1;
const EXTEND_LOOKUP_TABLE: u32 = 2;
const DEACTIVATE_LOOKUP_TABLE: u32 = 3;
const CLOSE_LOOKUP_TABLE: u32 = 4;

/// Table address for `authority` created at `recent_slot`, with its bump.
pub fn derive_lookup_table_address(
    authority: &PublicKey,
    recent_slot: u64,
) -> Result<(PublicKey, u8), ProgramError> {
    Ok(PublicKey::find_program_address(
        &[authority.as_ref(), &recent_slot.to_le_bytes()],
        &ADDRESS_LOOKUP_TABLE_PROGRAM_ID,
    )?)
}

/// Creates a table and returns the instruction together with the new
/// table's address.
pub fn create_lookup_table(
    authority: &PublicKey,
    payer: &PublicKey,
    recent_slot: u64,
) -> Result<(TransactionInstruction, PublicKey), ProgramError> {
    let (table, bump) = derive_lookup_table_address(authority, recent_slot)?;
    let mut data = Vec::new();
    CREATE_LOOKUP_TABLE.encode(&mut data);
    recent_slot.encode(&mut data);
    bump.encode(&mut data);
    let ix = TransactionInstruction::new(
        ADDRESS_LOOKUP_TABLE_PROGRAM_ID,
        vec![
            AccountMeta::new(table, false),
            AccountMeta::new_readonly(*authority, true),
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data,
    );
    Ok((ix, table))
}

/// Appends `new_addresses`. `payer` funds the extra rent when the table
/// grows.
pub fn extend_lookup_table(
    table: &PublicKey,
    authority: &PublicKey,
    payer: Option<&PublicKey>,
    new_addresses: &[PublicKey],
) -> TransactionInstruction {
    let mut keys = vec![
        AccountMeta::new(*table, false),
        AccountMeta::new_readonly(*authority, true),
    ];
    if let Some(payer) = payer {
        keys.push(AccountMeta::new(*payer, true));
        keys.push(AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false));
    }
    let mut data = Vec::new();
    EXTEND_LOOKUP_TABLE.encode(&mut data);
    (new_addresses.len() as u64).encode(&mut data);
    for address in new_addresses {
        address.encode(&mut data);
    }
    TransactionInstruction::new(ADDRESS_LOOKUP_TABLE_PROGRAM_ID, keys, data)
}

fn authority_only(tag: u32, table: &PublicKey, authority: &PublicKey) -> TransactionInstruction {
    let mut data = Vec::new();
    tag.encode(&mut data);
    TransactionInstruction::new(
        ADDRESS_LOOKUP_TABLE_PROGRAM_ID,
        vec![
            AccountMeta::new(*table, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data,
    )
}

/// Makes the table permanently immutable.
pub fn freeze_lookup_table(table: &PublicKey, authority: &PublicKey) -> TransactionInstruction {
    authority_only(FREEZE_LOOKUP_TABLE, table, authority)
}

/// Starts the cool-down after which the table can be closed. A deactivated
/// table can no longer be used by new transactions.
pub fn deactivate_lookup_table(table: &PublicKey, authority: &PublicKey) -> TransactionInstruction {
    authority_only(DEACTIVATE_LOOKUP_TABLE, table, authority)
}

pub fn close_lookup_table(
    table: &PublicKey,
    authority: &PublicKey,
    recipient: &PublicKey,
) -> TransactionInstruction {
    let mut ix = authority_only(CLOSE_LOOKUP_TABLE, table, authority);
    ix.keys.push(AccountMeta::new(*recipient, false));
    ix
}
