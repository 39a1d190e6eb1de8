//! The RPC `data` field of an account, in every shape nodes return it.
//!
//! ```text
//! ["<base64>", "base64"]      binary, base64
//! ["<base58>", "base58"]      binary, base58
//! "<base58>"                  legacy binary, bare base58 string
//! {"program": .., "parsed": ..}   jsonParsed
//! ```

use base64::Engine;
use serde::{Deserialize, Serialize};

use super::{AccountKind, AccountState, LayoutError, Mint, TokenAccount, TokenAccountState};
use crate::account::PublicKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryEncoding {
    Base64,
    Base58,
}

impl BinaryEncoding {
    pub fn decode(self, text: &str) -> Result<Vec<u8>, LayoutError> {
        match self {
            Self::Base64 => base64::engine::general_purpose::STANDARD
                .decode(text)
                .map_err(|_| LayoutError::InvalidEncoding { encoding: "base64" }),
            Self::Base58 => bs58::decode(text)
                .into_vec()
                .map_err(|_| LayoutError::InvalidEncoding { encoding: "base58" }),
        }
    }

    pub fn encode(self, data: &[u8]) -> String {
        match self {
            Self::Base64 => base64::engine::general_purpose::STANDARD.encode(data),
            Self::Base58 => bs58::encode(data).into_string(),
        }
    }
}

/// A `jsonParsed` account: the node has already decoded the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedAccount {
    pub program: String,
    pub parsed: serde_json::Value,
    #[serde(default)]
    pub space: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EncodedAccountData {
    LegacyBinary(String),
    Json(ParsedAccount),
    Binary(String, BinaryEncoding),
}

impl EncodedAccountData {
    /// Raw bytes, if this is a binary form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, LayoutError> {
        match self {
            Self::LegacyBinary(text) => BinaryEncoding::Base58.decode(text),
            Self::Binary(text, encoding) => encoding.decode(text),
            Self::Json(_) => Err(LayoutError::UnsupportedParsedShape("raw bytes")),
        }
    }

    /// Decodes as `kind`. Binary forms go through the byte layouts; parsed
    /// JSON is accepted for mints and token accounts.
    pub fn decode(&self, kind: AccountKind) -> Result<AccountState, LayoutError> {
        match self {
            Self::Json(parsed) => parsed.decode(kind),
            _ => kind.decode(&self.to_bytes()?),
        }
    }
}

// ---------------------------------------------------------------------------
// jsonParsed token shapes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ParsedEnvelope {
    #[serde(rename = "type")]
    account_type: String,
    info: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParsedMint {
    mint_authority: Option<String>,
    supply: String,
    decimals: u8,
    is_initialized: bool,
    freeze_authority: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParsedTokenAmount {
    amount: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParsedTokenAccount {
    mint: String,
    owner: String,
    token_amount: ParsedTokenAmount,
    #[serde(default)]
    delegate: Option<String>,
    state: String,
    #[serde(default)]
    is_native: bool,
    #[serde(default)]
    rent_exempt_reserve: Option<ParsedTokenAmount>,
    #[serde(default)]
    delegated_amount: Option<ParsedTokenAmount>,
    #[serde(default)]
    close_authority: Option<String>,
}

fn parse_key(field: &'static str, text: &str) -> Result<PublicKey, LayoutError> {
    text.parse().map_err(|_| LayoutError::ParsedField { field })
}

fn parse_opt_key(field: &'static str, text: Option<&str>) -> Result<Option<PublicKey>, LayoutError> {
    text.map(|t| parse_key(field, t)).transpose()
}

fn parse_amount(field: &'static str, text: &str) -> Result<u64, LayoutError> {
    text.parse().map_err(|_| LayoutError::ParsedField { field })
}

impl ParsedAccount {
    pub fn decode(&self, kind: AccountKind) -> Result<AccountState, LayoutError> {
        let envelope: ParsedEnvelope = serde_json::from_value(self.parsed.clone())
            .map_err(|_| LayoutError::UnsupportedParsedShape(kind.name()))?;
        match (kind, envelope.account_type.as_str()) {
            (AccountKind::Mint, "mint") => {
                let info: ParsedMint = serde_json::from_value(envelope.info)
                    .map_err(|_| LayoutError::UnsupportedParsedShape(kind.name()))?;
                Ok(AccountState::Mint(Mint {
                    mint_authority: parse_opt_key("mintAuthority", info.mint_authority.as_deref())?,
                    supply: parse_amount("supply", &info.supply)?,
                    decimals: info.decimals,
                    is_initialized: info.is_initialized,
                    freeze_authority: parse_opt_key(
                        "freezeAuthority",
                        info.freeze_authority.as_deref(),
                    )?,
                    extensions: Vec::new(),
                }))
            }
            (AccountKind::TokenAccount, "account") => {
                let info: ParsedTokenAccount = serde_json::from_value(envelope.info)
                    .map_err(|_| LayoutError::UnsupportedParsedShape(kind.name()))?;
                let state = match info.state.as_str() {
                    "uninitialized" => TokenAccountState::Uninitialized,
                    "initialized" => TokenAccountState::Initialized,
                    "frozen" => TokenAccountState::Frozen,
                    _ => return Err(LayoutError::ParsedField { field: "state" }),
                };
                let is_native = if info.is_native {
                    Some(match &info.rent_exempt_reserve {
                        Some(reserve) => parse_amount("rentExemptReserve", &reserve.amount)?,
                        None => 0,
                    })
                } else {
                    None
                };
                Ok(AccountState::TokenAccount(TokenAccount {
                    mint: parse_key("mint", &info.mint)?,
                    owner: parse_key("owner", &info.owner)?,
                    amount: parse_amount("tokenAmount", &info.token_amount.amount)?,
                    delegate: parse_opt_key("delegate", info.delegate.as_deref())?,
                    state,
                    is_native,
                    delegated_amount: match &info.delegated_amount {
                        Some(amount) => parse_amount("delegatedAmount", &amount.amount)?,
                        None => 0,
                    },
                    close_authority: parse_opt_key(
                        "closeAuthority",
                        info.close_authority.as_deref(),
                    )?,
                    extensions: Vec::new(),
                }))
            }
            _ => Err(LayoutError::UnsupportedParsedShape(kind.name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_to_vec;
    use serde_json::json;

    fn mint_bytes() -> Vec<u8> {
        encode_to_vec(&Mint {
            mint_authority: Some(PublicKey::new([1; 32])),
            supply: 500,
            decimals: 9,
            is_initialized: true,
            ..Mint::default()
        })
    }

    #[test]
    fn base64_and_base58_decode_identically() {
        let bytes = mint_bytes();
        let b64: EncodedAccountData =
            serde_json::from_value(json!([BinaryEncoding::Base64.encode(&bytes), "base64"]))
                .unwrap();
        let b58: EncodedAccountData =
            serde_json::from_value(json!([BinaryEncoding::Base58.encode(&bytes), "base58"]))
                .unwrap();
        let legacy: EncodedAccountData =
            serde_json::from_value(json!(BinaryEncoding::Base58.encode(&bytes))).unwrap();

        let expected = AccountKind::Mint.decode(&bytes).unwrap();
        assert_eq!(b64.decode(AccountKind::Mint).unwrap(), expected);
        assert_eq!(b58.decode(AccountKind::Mint).unwrap(), expected);
        assert_eq!(legacy.decode(AccountKind::Mint).unwrap(), expected);
    }

    #[test]
    fn invalid_base64_is_reported() {
        let data = EncodedAccountData::Binary("!!!".into(), BinaryEncoding::Base64);
        assert_eq!(
            data.to_bytes(),
            Err(LayoutError::InvalidEncoding { encoding: "base64" })
        );
    }

    #[test]
    fn parsed_mint() {
        let authority = PublicKey::new([1; 32]);
        let data: EncodedAccountData = serde_json::from_value(json!({
            "program": "spl-token",
            "parsed": {
                "type": "mint",
                "info": {
                    "mintAuthority": authority.to_string(),
                    "supply": "500",
                    "decimals": 9,
                    "isInitialized": true,
                    "freezeAuthority": null
                }
            },
            "space": 82
        }))
        .unwrap();
        assert_eq!(
            data.decode(AccountKind::Mint).unwrap(),
            AccountKind::Mint.decode(&mint_bytes()).unwrap()
        );
    }

    #[test]
    fn parsed_token_account() {
        let mint = PublicKey::new([2; 32]);
        let owner = PublicKey::new([3; 32]);
        let data: EncodedAccountData = serde_json::from_value(json!({
            "program": "spl-token",
            "parsed": {
                "type": "account",
                "info": {
                    "mint": mint.to_string(),
                    "owner": owner.to_string(),
                    "tokenAmount": {"amount": "42", "decimals": 6, "uiAmountString": "0.000042"},
                    "state": "frozen",
                    "isNative": true,
                    "rentExemptReserve": {"amount": "2039280", "decimals": 9}
                }
            },
            "space": 165
        }))
        .unwrap();
        let AccountState::TokenAccount(account) = data.decode(AccountKind::TokenAccount).unwrap()
        else {
            panic!("expected token account");
        };
        assert_eq!(account.mint, mint);
        assert_eq!(account.amount, 42);
        assert_eq!(account.state, TokenAccountState::Frozen);
        assert_eq!(account.is_native, Some(2_039_280));
    }

    #[test]
    fn parsed_shape_for_wrong_kind_fails() {
        let data = EncodedAccountData::Json(ParsedAccount {
            program: "spl-token".into(),
            parsed: json!({"type": "mint", "info": {}}),
            space: 82,
        });
        assert_eq!(
            data.decode(AccountKind::TokenSwap),
            Err(LayoutError::UnsupportedParsedShape("token swap"))
        );
    }
}
