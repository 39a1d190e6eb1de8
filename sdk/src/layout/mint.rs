//! SPL Token mint state.

use serde::Serialize;

use super::extensions::{decode_extension_region, AccountType, Extension, ACCOUNT_TYPE_OFFSET};
use super::LayoutError;
use crate::account::PublicKey;
use crate::codec::{write_coption, CodecError, Decode, Encode, Reader};
use crate::config::MINT_LEN;

/// Decoded mint.
///
/// `mint_authority` and `freeze_authority` are SPL `COption`s: a 4-byte
/// tag followed by 32 bytes that are on the wire whether or not the tag is
/// set. A zero tag forces `None` regardless of what those bytes hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mint {
    pub mint_authority: Option<PublicKey>,
    pub supply: u64,
    pub decimals: u8,
    pub is_initialized: bool,
    pub freeze_authority: Option<PublicKey>,
    /// Token-2022 extensions; empty for classic SPL Token mints.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Mint {
    pub const LEN: usize = MINT_LEN;

    /// Decodes a classic 82-byte mint, or a Token-2022 mint whose data
    /// runs past the account-type offset. A mint that was never
    /// initialized is rejected.
    pub fn decode_from(data: &[u8]) -> Result<Self, LayoutError> {
        let mut reader = Reader::new(data);
        let mut mint = Self::decode(&mut reader)?;
        if data.len() > ACCOUNT_TYPE_OFFSET {
            mint.extensions = decode_extension_region(data, Self::LEN, AccountType::Mint)?;
        } else {
            reader.finish()?;
        }
        if !mint.is_initialized {
            return Err(LayoutError::UninitializedAccount);
        }
        Ok(mint)
    }
}

impl Decode for Mint {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            mint_authority: reader.read_coption()?,
            supply: reader.read_u64()?,
            decimals: reader.read_u8()?,
            is_initialized: reader.read_bool()?,
            freeze_authority: reader.read_coption()?,
            extensions: Vec::new(),
        })
    }
}

/// Writes the 82-byte base state. Extensions are not re-encoded.
impl Encode for Mint {
    fn encode(&self, out: &mut Vec<u8>) {
        write_coption(out, &self.mint_authority);
        self.supply.encode(out);
        self.decimals.encode(out);
        self.is_initialized.encode(out);
        write_coption(out, &self.freeze_authority);
    }
}
