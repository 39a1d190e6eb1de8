//! Per-instruction account capability requests.

use serde::{Deserialize, Serialize};

use super::PublicKey;

/// One instruction's use of one account.
///
/// Flags only become meaningful for the transaction once every meta for the
/// same key has been merged: a writable or signer request anywhere upgrades
/// the account for the whole message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMeta {
    pub pubkey: PublicKey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    /// A writable account.
    pub fn new(pubkey: PublicKey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    /// A read-only account.
    pub fn new_readonly(pubkey: PublicKey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }

    /// ORs the privileges of `other` into `self`. Both metas must name the
    /// same key.
    pub fn merge(&mut self, other: &AccountMeta) {
        debug_assert_eq!(self.pubkey, other.pubkey);
        self.is_signer |= other.is_signer;
        self.is_writable |= other.is_writable;
    }

    /// Returns the merged meta without modifying either input.
    pub fn merged(mut self, other: &AccountMeta) -> AccountMeta {
        self.merge(other);
        self
    }
}
