//! # Program Instruction Builders
//!
//! Constructors for the instructions most transactions are made of. Each
//! builder returns a [`TransactionInstruction`](crate::account::TransactionInstruction)
//! with the account order and data layout the on-chain program expects.

pub mod address_lookup_table;
pub mod associated_token;
pub mod compute_budget;
pub mod memo;
pub mod system;
pub mod token;

use thiserror::Error;

use crate::account::{PubkeyError, PublicKey};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    #[error("{0} is not a token program")]
    IncorrectProgramId(PublicKey),

    #[error(transparent)]
    Pubkey(#[from] PubkeyError),
}

// ---------------------------------------------------------------------------
// Well-known program and sysvar ids
// ---------------------------------------------------------------------------

/// `11111111111111111111111111111111`
pub const SYSTEM_PROGRAM_ID: PublicKey = PublicKey::new([0; 32]);

/// `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: PublicKey = PublicKey::new([
    6, 221, 246, 225, 215, 101, 161, 147, 217, 203, 225, 70, 206, 235, 121, 172, 28, 180, 133,
    237, 95, 91, 55, 145, 58, 140, 245, 133, 126, 255, 0, 169,
]);

/// `TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb`
pub const TOKEN_2022_PROGRAM_ID: PublicKey = PublicKey::new([
    6, 221, 246, 225, 238, 117, 143, 222, 24, 66, 93, 188, 228, 108, 205, 218, 182, 26, 252, 77,
    131, 185, 13, 39, 254, 189, 249, 40, 216, 161, 139, 252,
]);

/// `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: PublicKey = PublicKey::new([
    140, 151, 37, 143, 78, 36, 137, 241, 187, 61, 16, 41, 20, 142, 13, 131, 11, 90, 19, 153, 218,
    255, 16, 132, 4, 142, 123, 216, 219, 233, 248, 89,
]);

/// `ComputeBudget111111111111111111111111111111`
pub const COMPUTE_BUDGET_PROGRAM_ID: PublicKey = PublicKey::new([
    3, 6, 70, 111, 229, 33, 23, 50, 255, 236, 173, 186, 114, 195, 155, 231, 188, 140, 229, 187,
    197, 247, 18, 107, 44, 67, 155, 58, 64, 0, 0, 0,
]);

/// `MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr`
pub const MEMO_PROGRAM_ID: PublicKey = PublicKey::new([
    5, 74, 83, 90, 153, 41, 33, 6, 77, 36, 232, 113, 96, 218, 56, 124, 124, 53, 181, 221, 188,
    146, 187, 129, 228, 31, 168, 64, 65, 5, 68, 141,
]);

/// `AddressLookupTab1e1111111111111111111111111`
pub const ADDRESS_LOOKUP_TABLE_PROGRAM_ID: PublicKey = PublicKey::new([
    2, 119, 166, 175, 151, 51, 155, 122, 200, 141, 24, 146, 201, 4, 70, 245, 0, 2, 48, 146, 102,
    246, 46, 83, 193, 24, 36, 73, 130, 0, 0, 0,
]);

/// `SwaPpA9LAaLfeLi3a68M4DjnLqgtticKg6CnyNwgAC8`
pub const TOKEN_SWAP_PROGRAM_ID: PublicKey = PublicKey::new([
    6, 165, 58, 174, 54, 191, 72, 111, 181, 217, 56, 38, 78, 230, 69, 215, 75, 96, 22, 224, 244,
    122, 235, 179, 236, 22, 67, 139, 247, 191, 251, 225,
]);

/// `SysvarRent111111111111111111111111111111111`
pub const SYSVAR_RENT_ID: PublicKey = PublicKey::new([
    6, 167, 213, 23, 25, 44, 92, 81, 33, 140, 201, 76, 61, 74, 241, 127, 88, 218, 238, 8, 155, 161,
    253, 68, 227, 219, 217, 138, 0, 0, 0, 0,
]);

/// Wrapped SOL mint, `So11111111111111111111111111111111111111112`.
pub const NATIVE_MINT: PublicKey = PublicKey::new([
    6, 155, 136, 87, 254, 171, 129, 132, 251, 104, 127, 99, 70, 24, 192, 53, 218, 196, 57, 220, 26,
    235, 59, 85, 152, 160, 240, 0, 0, 0, 0, 1,
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_their_base58_names() {
        let cases = [
            (SYSTEM_PROGRAM_ID, "11111111111111111111111111111111"),
            (TOKEN_PROGRAM_ID, "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"),
            (TOKEN_2022_PROGRAM_ID, "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb"),
            (ASSOCIATED_TOKEN_PROGRAM_ID, "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL"),
            (COMPUTE_BUDGET_PROGRAM_ID, "ComputeBudget111111111111111111111111111111"),
            (MEMO_PROGRAM_ID, "MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr"),
            (ADDRESS_LOOKUP_TABLE_PROGRAM_ID, "AddressLookupTab1e1111111111111111111111111"),
            (TOKEN_SWAP_PROGRAM_ID, "SwaPpA9LAaLfeLi3a68M4DjnLqgtticKg6CnyNwgAC8"),
            (SYSVAR_RENT_ID, "SysvarRent111111111111111111111111111111111"),
            (NATIVE_MINT, "So11111111111111111111111111111111111111112"),
        ];
        for (id, text) in cases {
            assert_eq!(id.to_string(), text);
        }
    }
}
