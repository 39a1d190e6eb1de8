//! # Buffer Layout Decoder
//!
//! Typed views of raw on-chain account data, built on the primitive codec.
//!
//! ```text
//! mint.rs          - SPL Token mint (82 bytes, Token-2022 extensions after 165)
//! token_account.rs - SPL Token account (165 bytes, Token-2022 extensions after)
//! extensions.rs    - Token-2022 account-type byte and TLV extension list
//! swap.rs          - token-swap pool state (324 bytes)
//! lookup_table.rs  - address lookup table (56-byte meta + addresses)
//! encoding.rs      - the RPC `data` field: base64, base58 or parsed JSON
//! ```
//!
//! Decoding is total. A short buffer, an unknown tag or an unexpected
//! trailing byte fails the whole decode; nothing is zero-filled or skipped.
//! The only trailing data any layout accepts is the Token-2022 extension
//! region, and that region is itself decoded record by record.
//!
//! The caller always knows which layout it expects, so dispatch is a
//! closed [`AccountKind`] enum rather than anything inferred from the data.

pub mod encoding;
pub mod extensions;
pub mod lookup_table;
pub mod mint;
pub mod swap;
pub mod token_account;

pub use encoding::{BinaryEncoding, EncodedAccountData, ParsedAccount};
pub use extensions::{AccountType, Extension, TransferFee};
pub use lookup_table::LookupTableState;
pub use mint::Mint;
pub use swap::{CurveType, Fees, TokenSwap};
pub use token_account::{TokenAccount, TokenAccountState};

use serde::Serialize;
use thiserror::Error;

use crate::codec::CodecError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Text that is not valid base64 or base58.
    #[error("invalid {encoding} account data")]
    InvalidEncoding { encoding: &'static str },

    /// A parsed-JSON account the requested layout cannot be built from.
    #[error("parsed account data cannot be decoded as {0}")]
    UnsupportedParsedShape(&'static str),

    #[error("parsed field `{field}` is invalid")]
    ParsedField { field: &'static str },

    #[error("account is not initialized")]
    UninitializedAccount,

    /// A byte that must be zero is not: Token-2022 padding before the
    /// account type, or the slack after the last extension.
    #[error("non-zero padding byte at offset {offset}")]
    NonZeroPadding { offset: usize },
}

/// The account layouts this crate decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    Mint,
    TokenAccount,
    TokenSwap,
    LookupTable,
}

impl AccountKind {
    /// Smallest valid encoding of this layout.
    pub fn min_len(self) -> usize {
        match self {
            Self::Mint => Mint::LEN,
            Self::TokenAccount => TokenAccount::LEN,
            Self::TokenSwap => TokenSwap::LEN,
            Self::LookupTable => LookupTableState::META_LEN,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Mint => "mint",
            Self::TokenAccount => "token account",
            Self::TokenSwap => "token swap",
            Self::LookupTable => "lookup table",
        }
    }

    /// Decodes raw bytes as this layout.
    pub fn decode(self, data: &[u8]) -> Result<AccountState, LayoutError> {
        tracing::trace!(kind = self.name(), len = data.len(), "decoding account data");
        Ok(match self {
            Self::Mint => AccountState::Mint(Mint::decode_from(data)?),
            Self::TokenAccount => AccountState::TokenAccount(TokenAccount::decode_from(data)?),
            Self::TokenSwap => AccountState::TokenSwap(TokenSwap::decode_from(data)?),
            Self::LookupTable => AccountState::LookupTable(LookupTableState::decode_from(data)?),
        })
    }
}

/// A decoded account of any supported layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "info", rename_all = "camelCase")]
pub enum AccountState {
    Mint(Mint),
    TokenAccount(TokenAccount),
    TokenSwap(TokenSwap),
    LookupTable(LookupTableState),
}

impl AccountState {
    pub fn kind(&self) -> AccountKind {
        match self {
            Self::Mint(_) => AccountKind::Mint,
            Self::TokenAccount(_) => AccountKind::TokenAccount,
            Self::TokenSwap(_) => AccountKind::TokenSwap,
            Self::LookupTable(_) => AccountKind::LookupTable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initialized_mint() -> [u8; 82] {
        let mut bytes = [0u8; 82];
        // is_initialized follows authority(36) supply(8) decimals(1).
        bytes[45] = 1;
        bytes
    }

    #[test]
    fn min_lengths() {
        assert_eq!(AccountKind::Mint.min_len(), 82);
        assert_eq!(AccountKind::TokenAccount.min_len(), 165);
        assert_eq!(AccountKind::TokenSwap.min_len(), 324);
        assert_eq!(AccountKind::LookupTable.min_len(), 56);
    }

    #[test]
    fn dispatch_returns_matching_kind() {
        let state = AccountKind::Mint.decode(&initialized_mint()).unwrap();
        assert_eq!(state.kind(), AccountKind::Mint);
    }

    #[test]
    fn one_failing_decode_leaves_others_unaffected() {
        assert!(AccountKind::TokenAccount.decode(&[0u8; 10]).is_err());
        assert!(AccountKind::Mint.decode(&initialized_mint()).is_ok());
        assert_eq!(
            AccountKind::Mint.decode(&[0u8; 82]),
            Err(LayoutError::UninitializedAccount)
        );
    }
}
