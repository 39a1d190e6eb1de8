//! SPL Token account state.

use serde::Serialize;

use super::extensions::{decode_extension_region, AccountType, Extension};
use super::LayoutError;
use crate::account::PublicKey;
use crate::codec::{write_coption, CodecError, Decode, Encode, Reader};
use crate::config::TOKEN_ACCOUNT_LEN;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenAccountState {
    #[default]
    Uninitialized,
    Initialized,
    Frozen,
}

impl TokenAccountState {
    fn tag(self) -> u8 {
        match self {
            Self::Uninitialized => 0,
            Self::Initialized => 1,
            Self::Frozen => 2,
        }
    }
}

impl Decode for TokenAccountState {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        match reader.read_u8()? {
            0 => Ok(Self::Uninitialized),
            1 => Ok(Self::Initialized),
            2 => Ok(Self::Frozen),
            tag => Err(CodecError::UnknownDiscriminant {
                field: "account state",
                tag: u32::from(tag),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAccount {
    pub mint: PublicKey,
    pub owner: PublicKey,
    pub amount: u64,
    pub delegate: Option<PublicKey>,
    pub state: TokenAccountState,
    /// Rent-exempt reserve for wrapped native accounts.
    pub is_native: Option<u64>,
    pub delegated_amount: u64,
    pub close_authority: Option<PublicKey>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl TokenAccount {
    pub const LEN: usize = TOKEN_ACCOUNT_LEN;

    /// Decodes a classic 165-byte account, or a Token-2022 account with an
    /// account-type byte and extensions after it. Uninitialized accounts
    /// are rejected.
    pub fn decode_from(data: &[u8]) -> Result<Self, LayoutError> {
        let mut reader = Reader::new(data);
        let mut account = Self::decode(&mut reader)?;
        if data.len() > Self::LEN {
            account.extensions = decode_extension_region(data, Self::LEN, AccountType::Account)?;
        }
        if account.state == TokenAccountState::Uninitialized {
            return Err(LayoutError::UninitializedAccount);
        }
        Ok(account)
    }

    pub fn is_frozen(&self) -> bool {
        self.state == TokenAccountState::Frozen
    }
}

impl Decode for TokenAccount {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            mint: reader.read()?,
            owner: reader.read()?,
            amount: reader.read_u64()?,
            delegate: reader.read_coption()?,
            state: reader.read()?,
            is_native: reader.read_coption()?,
            delegated_amount: reader.read_u64()?,
            close_authority: reader.read_coption()?,
            extensions: Vec::new(),
        })
    }
}

/// Writes the 165-byte base state. Extensions are not re-encoded.
impl Encode for TokenAccount {
    fn encode(&self, out: &mut Vec<u8>) {
        self.mint.encode(out);
        self.owner.encode(out);
        self.amount.encode(out);
        write_coption(out, &self.delegate);
        self.state.tag().encode(out);
        write_coption(out, &self.is_native);
        self.delegated_amount.encode(out);
        write_coption(out, &self.close_authority);
    }
}
