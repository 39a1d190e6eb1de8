//! Token-2022 extension region.
//!
//! Both mints and token accounts are padded to the 165-byte token-account
//! size, followed by a one-byte account type and then a list of TLV
//! records: `u16` type, `u16` length, `length` bytes of value.

use serde::Serialize;

use super::LayoutError;
use crate::account::PublicKey;
use crate::codec::{decode_exact, CodecError, Decode, Reader};
use crate::config::TOKEN_ACCOUNT_LEN;

/// Offset of the account-type byte in a Token-2022 account.
pub const ACCOUNT_TYPE_OFFSET: usize = TOKEN_ACCOUNT_LEN;

/// TLV header: type and length, both `u16`.
pub const TLV_HEADER_LEN: usize = 4;

/// Extension type of unused, zero-filled TLV space.
const UNINITIALIZED_EXTENSION: u16 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountType {
    Mint,
    Account,
}

impl AccountType {
    fn from_tag(tag: u8) -> Result<Self, CodecError> {
        match tag {
            1 => Ok(Self::Mint),
            2 => Ok(Self::Account),
            tag => Err(CodecError::UnknownDiscriminant {
                field: "account type",
                tag: u32::from(tag),
            }),
        }
    }
}

/// One epoch's transfer fee schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferFee {
    pub epoch: u64,
    pub maximum_fee: u64,
    pub transfer_fee_basis_points: u16,
}

impl Decode for TransferFee {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            epoch: reader.read_u64()?,
            maximum_fee: reader.read_u64()?,
            transfer_fee_basis_points: reader.read_u16()?,
        })
    }
}

/// A decoded extension. Types this crate has no layout for are kept raw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "extension", content = "state", rename_all = "camelCase")]
pub enum Extension {
    #[serde(rename_all = "camelCase")]
    TransferFeeConfig {
        transfer_fee_config_authority: Option<PublicKey>,
        withdraw_withheld_authority: Option<PublicKey>,
        withheld_amount: u64,
        older_transfer_fee: TransferFee,
        newer_transfer_fee: TransferFee,
    },
    #[serde(rename_all = "camelCase")]
    TransferFeeAmount { withheld_amount: u64 },
    #[serde(rename_all = "camelCase")]
    MintCloseAuthority { close_authority: Option<PublicKey> },
    #[serde(rename_all = "camelCase")]
    DefaultAccountState { account_state: u8 },
    ImmutableOwner,
    #[serde(rename_all = "camelCase")]
    MemoTransfer { require_incoming_transfer_memos: bool },
    NonTransferable,
    #[serde(rename_all = "camelCase")]
    PermanentDelegate { delegate: Option<PublicKey> },
    #[serde(rename_all = "camelCase")]
    MetadataPointer {
        authority: Option<PublicKey>,
        metadata_address: Option<PublicKey>,
    },
    #[serde(rename_all = "camelCase")]
    Unknown { extension_type: u16, data: Vec<u8> },
}

impl Extension {
    pub const TRANSFER_FEE_CONFIG: u16 = 1;
    pub const TRANSFER_FEE_AMOUNT: u16 = 2;
    pub const MINT_CLOSE_AUTHORITY: u16 = 3;
    pub const DEFAULT_ACCOUNT_STATE: u16 = 6;
    pub const IMMUTABLE_OWNER: u16 = 7;
    pub const MEMO_TRANSFER: u16 = 8;
    pub const NON_TRANSFERABLE: u16 = 9;
    pub const PERMANENT_DELEGATE: u16 = 12;
    pub const METADATA_POINTER: u16 = 18;

    pub fn extension_type(&self) -> u16 {
        match self {
            Self::TransferFeeConfig { .. } => Self::TRANSFER_FEE_CONFIG,
            Self::TransferFeeAmount { .. } => Self::TRANSFER_FEE_AMOUNT,
            Self::MintCloseAuthority { .. } => Self::MINT_CLOSE_AUTHORITY,
            Self::DefaultAccountState { .. } => Self::DEFAULT_ACCOUNT_STATE,
            Self::ImmutableOwner => Self::IMMUTABLE_OWNER,
            Self::MemoTransfer { .. } => Self::MEMO_TRANSFER,
            Self::NonTransferable => Self::NON_TRANSFERABLE,
            Self::PermanentDelegate { .. } => Self::PERMANENT_DELEGATE,
            Self::MetadataPointer { .. } => Self::METADATA_POINTER,
            Self::Unknown { extension_type, .. } => *extension_type,
        }
    }

    /// Decodes one value. Known types must fill their value exactly.
    fn from_tlv(extension_type: u16, value: &[u8]) -> Result<Self, CodecError> {
        let ext = match extension_type {
            Self::TRANSFER_FEE_CONFIG => decode_exact::<TransferFeeConfigRaw>(value)?.into(),
            Self::TRANSFER_FEE_AMOUNT => Self::TransferFeeAmount {
                withheld_amount: decode_exact(value)?,
            },
            Self::MINT_CLOSE_AUTHORITY => Self::MintCloseAuthority {
                close_authority: decode_exact::<OptionalNonZeroKey>(value)?.0,
            },
            Self::DEFAULT_ACCOUNT_STATE => Self::DefaultAccountState {
                account_state: decode_exact(value)?,
            },
            Self::IMMUTABLE_OWNER => {
                decode_exact::<()>(value)?;
                Self::ImmutableOwner
            }
            Self::MEMO_TRANSFER => Self::MemoTransfer {
                require_incoming_transfer_memos: decode_exact(value)?,
            },
            Self::NON_TRANSFERABLE => {
                decode_exact::<()>(value)?;
                Self::NonTransferable
            }
            Self::PERMANENT_DELEGATE => Self::PermanentDelegate {
                delegate: decode_exact::<OptionalNonZeroKey>(value)?.0,
            },
            Self::METADATA_POINTER => {
                let (authority, metadata_address) =
                    decode_exact::<(OptionalNonZeroKey, OptionalNonZeroKey)>(value)?;
                Self::MetadataPointer {
                    authority: authority.0,
                    metadata_address: metadata_address.0,
                }
            }
            extension_type => Self::Unknown {
                extension_type,
                data: value.to_vec(),
            },
        };
        Ok(ext)
    }
}

/// Token-2022 encodes optional keys as 32 bytes, all zero meaning absent.
struct OptionalNonZeroKey(Option<PublicKey>);

impl Decode for OptionalNonZeroKey {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let key: PublicKey = reader.read()?;
        Ok(Self((key != PublicKey::default()).then_some(key)))
    }
}

struct TransferFeeConfigRaw {
    transfer_fee_config_authority: OptionalNonZeroKey,
    withdraw_withheld_authority: OptionalNonZeroKey,
    withheld_amount: u64,
    older_transfer_fee: TransferFee,
    newer_transfer_fee: TransferFee,
}

impl Decode for TransferFeeConfigRaw {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            transfer_fee_config_authority: reader.read()?,
            withdraw_withheld_authority: reader.read()?,
            withheld_amount: reader.read()?,
            older_transfer_fee: reader.read()?,
            newer_transfer_fee: reader.read()?,
        })
    }
}

impl From<TransferFeeConfigRaw> for Extension {
    fn from(raw: TransferFeeConfigRaw) -> Self {
        Self::TransferFeeConfig {
            transfer_fee_config_authority: raw.transfer_fee_config_authority.0,
            withdraw_withheld_authority: raw.withdraw_withheld_authority.0,
            withheld_amount: raw.withheld_amount,
            older_transfer_fee: raw.older_transfer_fee,
            newer_transfer_fee: raw.newer_transfer_fee,
        }
    }
}

/// Decodes everything from the account-type byte to the end of `data`.
///
/// `base_len` is the unpadded size of the base state (82 for mints, 165
/// for accounts). Bytes between it and the account-type offset are padding
/// and must be zero. A record of type 0 ends the list; the space after it
/// is unused and must be zero too.
pub(crate) fn decode_extension_region(
    data: &[u8],
    base_len: usize,
    expected: AccountType,
) -> Result<Vec<Extension>, LayoutError> {
    let mut reader = Reader::new(data);
    reader.skip(base_len)?;
    let padding = reader.read_bytes(ACCOUNT_TYPE_OFFSET.saturating_sub(base_len))?;
    check_zeroed(padding, base_len)?;
    let tag = reader.read_u8()?;
    if AccountType::from_tag(tag)? != expected {
        return Err(CodecError::UnknownDiscriminant {
            field: "account type",
            tag: u32::from(tag),
        }
        .into());
    }

    let mut extensions = Vec::new();
    while !reader.is_empty() {
        let start = reader.offset();
        let extension_type = reader.read_u16()?;
        if extension_type == UNINITIALIZED_EXTENSION {
            check_zeroed(&data[start..], start)?;
            break;
        }
        let len = usize::from(reader.read_u16()?);
        let value = reader.read_bytes(len)?;
        extensions.push(Extension::from_tlv(extension_type, value)?);
    }
    tracing::trace!(count = extensions.len(), "decoded token-2022 extensions");
    Ok(extensions)
}

fn check_zeroed(bytes: &[u8], offset: usize) -> Result<(), LayoutError> {
    match bytes.iter().position(|byte| *byte != 0) {
        Some(at) => Err(LayoutError::NonZeroPadding { offset: offset + at }),
        None => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Appends one TLV record.
    pub(crate) fn push_tlv(out: &mut Vec<u8>, extension_type: u16, value: &[u8]) {
        out.extend_from_slice(&extension_type.to_le_bytes());
        out.extend_from_slice(&(value.len() as u16).to_le_bytes());
        out.extend_from_slice(value);
    }

    fn account_region(records: &[(u16, Vec<u8>)]) -> Vec<u8> {
        let mut data = vec![0u8; ACCOUNT_TYPE_OFFSET];
        data.push(2);
        for (ty, value) in records {
            push_tlv(&mut data, *ty, value);
        }
        data
    }

    #[test]
    fn decodes_known_and_unknown_records() {
        let data = account_region(&[
            (Extension::IMMUTABLE_OWNER, vec![]),
            (Extension::TRANSFER_FEE_AMOUNT, 77u64.to_le_bytes().to_vec()),
            (Extension::MEMO_TRANSFER, vec![1]),
            (200, vec![9, 9]),
        ]);
        let extensions =
            decode_extension_region(&data, TOKEN_ACCOUNT_LEN, AccountType::Account).unwrap();
        assert_eq!(
            extensions,
            vec![
                Extension::ImmutableOwner,
                Extension::TransferFeeAmount { withheld_amount: 77 },
                Extension::MemoTransfer {
                    require_incoming_transfer_memos: true
                },
                Extension::Unknown {
                    extension_type: 200,
                    data: vec![9, 9]
                },
            ]
        );
    }

    #[test]
    fn transfer_fee_config_is_108_bytes() {
        let authority = PublicKey::new([4; 32]);
        let mut value = Vec::new();
        value.extend_from_slice(authority.as_bytes());
        value.extend_from_slice(&[0u8; 32]);
        value.extend_from_slice(&5u64.to_le_bytes());
        for fee in [(1u64, 100u64, 25u16), (2, 200, 50)] {
            value.extend_from_slice(&fee.0.to_le_bytes());
            value.extend_from_slice(&fee.1.to_le_bytes());
            value.extend_from_slice(&fee.2.to_le_bytes());
        }
        assert_eq!(value.len(), 108);

        let mut data = vec![0u8; ACCOUNT_TYPE_OFFSET];
        data.push(1);
        push_tlv(&mut data, Extension::TRANSFER_FEE_CONFIG, &value);
        let extensions = decode_extension_region(&data, 82, AccountType::Mint).unwrap();
        assert_eq!(
            extensions,
            vec![Extension::TransferFeeConfig {
                transfer_fee_config_authority: Some(authority),
                withdraw_withheld_authority: None,
                withheld_amount: 5,
                older_transfer_fee: TransferFee {
                    epoch: 1,
                    maximum_fee: 100,
                    transfer_fee_basis_points: 25
                },
                newer_transfer_fee: TransferFee {
                    epoch: 2,
                    maximum_fee: 200,
                    transfer_fee_basis_points: 50
                },
            }]
        );
    }

    #[test]
    fn partial_header_fails() {
        let mut data = account_region(&[(Extension::IMMUTABLE_OWNER, vec![])]);
        data.extend_from_slice(&[7, 0]);
        assert!(matches!(
            decode_extension_region(&data, TOKEN_ACCOUNT_LEN, AccountType::Account),
            Err(LayoutError::Codec(CodecError::BufferLengthMismatch { .. }))
        ));
    }

    #[test]
    fn overrunning_value_fails() {
        let mut data = account_region(&[]);
        data.extend_from_slice(&[200, 0, 10, 0, 1, 2]);
        assert!(decode_extension_region(&data, TOKEN_ACCOUNT_LEN, AccountType::Account).is_err());
    }

    #[test]
    fn known_type_with_wrong_size_fails() {
        let data = account_region(&[(Extension::MEMO_TRANSFER, vec![1, 0])]);
        assert!(decode_extension_region(&data, TOKEN_ACCOUNT_LEN, AccountType::Account).is_err());
    }

    #[test]
    fn wrong_account_type_fails() {
        let data = account_region(&[]);
        assert!(decode_extension_region(&data, 82, AccountType::Mint).is_err());
    }

    #[test]
    fn non_zero_padding_before_account_type_fails() {
        let mut data = vec![0u8; ACCOUNT_TYPE_OFFSET];
        data[100] = 5;
        data.push(1);
        assert_eq!(
            decode_extension_region(&data, 82, AccountType::Mint),
            Err(LayoutError::NonZeroPadding { offset: 100 })
        );
    }

    #[test]
    fn type_zero_ends_the_list() {
        let mut data = account_region(&[(Extension::IMMUTABLE_OWNER, vec![])]);
        data.extend_from_slice(&[0u8; 12]);
        let extensions =
            decode_extension_region(&data, TOKEN_ACCOUNT_LEN, AccountType::Account).unwrap();
        assert_eq!(extensions, vec![Extension::ImmutableOwner]);

        let marker = data.len() - 12;
        data[marker + 6] = 3;
        assert_eq!(
            decode_extension_region(&data, TOKEN_ACCOUNT_LEN, AccountType::Account),
            Err(LayoutError::NonZeroPadding { offset: marker + 6 })
        );
    }

    #[test]
    fn zero_key_reads_as_none() {
        let data = account_region(&[(Extension::PERMANENT_DELEGATE, vec![0; 32])]);
        let extensions =
            decode_extension_region(&data, TOKEN_ACCOUNT_LEN, AccountType::Account).unwrap();
        assert_eq!(extensions, vec![Extension::PermanentDelegate { delegate: None }]);
    }
}
