//! Lookup table snapshots handed to the v0 compiler.

use crate::account::PublicKey;
use crate::layout::{LayoutError, LookupTableState};

/// An address lookup table as fetched from the chain: its address plus the
/// decoded account state. Treated as an immutable snapshot for the length
/// of one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressLookupTableAccount {
    pub key: PublicKey,
    pub state: LookupTableState,
}

impl AddressLookupTableAccount {
    /// An active table with no authority holding `addresses`.
    pub fn new(key: PublicKey, addresses: Vec<PublicKey>) -> Self {
        Self {
            key,
            state: LookupTableState::active(addresses),
        }
    }

    /// Decodes the raw account data of the table at `key`.
    pub fn from_account_data(key: PublicKey, data: &[u8]) -> Result<Self, LayoutError> {
        Ok(Self {
            key,
            state: LookupTableState::decode_from(data)?,
        })
    }

    pub fn addresses(&self) -> &[PublicKey] {
        &self.state.addresses
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}
