//! Compute budget requests. These take no accounts.

use super::COMPUTE_BUDGET_PROGRAM_ID;
use crate::account::TransactionInstruction;
use crate::codec::Encode;

const SET_COMPUTE_UNIT_LIMIT: u8 = 2;
const SET_COMPUTE_UNIT_PRICE: u8 = 3;

pub fn set_compute_unit_limit(units: u32) -> TransactionInstruction {
    let mut data = vec![SET_COMPUTE_UNIT_LIMIT];
    units.encode(&mut data);
    TransactionInstruction::new(COMPUTE_BUDGET_PROGRAM_ID, Vec::new(), data)
}

/// Priority fee in micro-lamports per compute unit.
pub fn set_compute_unit_price(micro_lamports: u64) -> TransactionInstruction {
    let mut data = vec![SET_COMPUTE_UNIT_PRICE];
    micro_lamports.encode(&mut data);
    TransactionInstruction::new(COMPUTE_BUDGET_PROGRAM_ID, Vec::new(), data)
}
