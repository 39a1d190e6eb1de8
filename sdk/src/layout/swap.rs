//! Token-swap pool state.

use serde::Serialize;

use super::LayoutError;
use crate::account::PublicKey;
use crate::codec::{decode_exact, CodecError, Decode, Encode, Reader};
use crate::config::TOKEN_SWAP_LEN;

/// Only layout version the pool program has shipped.
const SWAP_VERSION_1: u8 = 1;

/// Fee schedule, every fee as a numerator/denominator pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fees {
    pub trade_fee_numerator: u64,
    pub trade_fee_denominator: u64,
    pub owner_trade_fee_numerator: u64,
    pub owner_trade_fee_denominator: u64,
    pub owner_withdraw_fee_numerator: u64,
    pub owner_withdraw_fee_denominator: u64,
    pub host_fee_numerator: u64,
    pub host_fee_denominator: u64,
}

impl Decode for Fees {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            trade_fee_numerator: reader.read_u64()?,
            trade_fee_denominator: reader.read_u64()?,
            owner_trade_fee_numerator: reader.read_u64()?,
            owner_trade_fee_denominator: reader.read_u64()?,
            owner_withdraw_fee_numerator: reader.read_u64()?,
            owner_withdraw_fee_denominator: reader.read_u64()?,
            host_fee_numerator: reader.read_u64()?,
            host_fee_denominator: reader.read_u64()?,
        })
    }
}

impl Encode for Fees {
    fn encode(&self, out: &mut Vec<u8>) {
        for value in [
            self.trade_fee_numerator,
            self.trade_fee_denominator,
            self.owner_trade_fee_numerator,
            self.owner_trade_fee_denominator,
            self.owner_withdraw_fee_numerator,
            self.owner_withdraw_fee_denominator,
            self.host_fee_numerator,
            self.host_fee_denominator,
        ] {
            value.encode(out);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CurveType {
    #[default]
    ConstantProduct,
    ConstantPrice,
    Offset,
}

impl CurveType {
    fn tag(self) -> u8 {
        match self {
            Self::ConstantProduct => 0,
            Self::ConstantPrice => 1,
            Self::Offset => 2,
        }
    }
}

impl Decode for CurveType {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        match reader.read_u8()? {
            0 => Ok(Self::ConstantProduct),
            1 => Ok(Self::ConstantPrice),
            2 => Ok(Self::Offset),
            tag => Err(CodecError::UnknownDiscriminant {
                field: "curve type",
                tag: u32::from(tag),
            }),
        }
    }
}

/// A swap pool. The leading version byte is included in [`TokenSwap::LEN`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSwap {
    pub version: u8,
    pub is_initialized: bool,
    pub bump_seed: u8,
    pub token_program_id: PublicKey,
    pub token_account_a: PublicKey,
    pub token_account_b: PublicKey,
    pub pool_mint: PublicKey,
    pub mint_a: PublicKey,
    pub mint_b: PublicKey,
    pub pool_fee_account: PublicKey,
    pub fees: Fees,
    pub curve_type: CurveType,
    /// Curve-specific parameters, opaque here.
    pub curve_parameters: [u8; 32],
}

impl TokenSwap {
    pub const LEN: usize = TOKEN_SWAP_LEN;

    pub fn decode_from(data: &[u8]) -> Result<Self, LayoutError> {
        Ok(decode_exact(data)?)
    }
}

impl Decode for TokenSwap {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let version = reader.read_u8()?;
        if version != SWAP_VERSION_1 {
            return Err(CodecError::UnknownDiscriminant {
                field: "swap version",
                tag: u32::from(version),
            });
        }
        Ok(Self {
            version,
            is_initialized: reader.read_bool()?,
            bump_seed: reader.read_u8()?,
            token_program_id: reader.read()?,
            token_account_a: reader.read()?,
            token_account_b: reader.read()?,
            pool_mint: reader.read()?,
            mint_a: reader.read()?,
            mint_b: reader.read()?,
            pool_fee_account: reader.read()?,
            fees: reader.read()?,
            curve_type: reader.read()?,
            curve_parameters: reader.read()?,
        })
    }
}

impl Encode for TokenSwap {
    fn encode(&self, out: &mut Vec<u8>) {
        self.version.encode(out);
        self.is_initialized.encode(out);
        self.bump_seed.encode(out);
        for key in [
            &self.token_program_id,
            &self.token_account_a,
            &self.token_account_b,
            &self.pool_mint,
            &self.mint_a,
            &self.mint_b,
            &self.pool_fee_account,
        ] {
            key.encode(out);
        }
        self.fees.encode(out);
        self.curve_type.tag().encode(out);
        self.curve_parameters.encode(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_to_vec;

    fn sample() -> TokenSwap {
        TokenSwap {
            version: 1,
            is_initialized: true,
            bump_seed: 254,
            token_program_id: PublicKey::new([1; 32]),
            mint_a: PublicKey::new([5; 32]),
            fees: Fees {
                trade_fee_numerator: 25,
                trade_fee_denominator: 10_000,
                ..Fees::default()
            },
            curve_type: CurveType::ConstantPrice,
            ..TokenSwap::default()
        }
    }

    #[test]
    fn pool_state_is_324_bytes() {
        let bytes = encode_to_vec(&sample());
        assert_eq!(bytes.len(), TokenSwap::LEN);
        assert_eq!(TokenSwap::decode_from(&bytes).unwrap(), sample());
    }

    #[test]
    fn fee_offsets() {
        let bytes = encode_to_vec(&sample());
        // 3 header bytes + 7 keys.
        assert_eq!(&bytes[227..235], &25u64.to_le_bytes());
        assert_eq!(bytes[291], 1);
    }

    #[test]
    fn unknown_curve_type_fails() {
        let mut bytes = encode_to_vec(&sample());
        bytes[291] = 7;
        assert!(matches!(
            TokenSwap::decode_from(&bytes),
            Err(LayoutError::Codec(CodecError::UnknownDiscriminant {
                field: "curve type",
                tag: 7
            }))
        ));
    }

    #[test]
    fn unknown_version_fails() {
        let mut bytes = encode_to_vec(&sample());
        bytes[0] = 0;
        assert!(TokenSwap::decode_from(&bytes).is_err());
    }

    #[test]
    fn length_must_be_exact() {
        let mut bytes = encode_to_vec(&sample());
        assert!(TokenSwap::decode_from(&bytes[..323]).is_err());
        bytes.push(0);
        assert!(TokenSwap::decode_from(&bytes).is_err());
    }
}
