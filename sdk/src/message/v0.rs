//! Versioned (v0) messages.
//!
//! A v0 message keeps a short static key list and pulls further accounts
//! from on-chain address lookup tables. The resolved account list an
//! instruction index points into is:
//!
//! ```text
//! static keys ++ writable loads (table order) ++ readonly loads (table order)
//! ```

use serde::Serialize;
use tracing::debug;

use super::compiler::{compile_instructions, CompiledKeys, LoadedAddresses};
use super::{check_instruction_indexes, AddressLookupTableAccount, CompileError, MessageHeader};
use crate::account::{CompiledInstruction, PublicKey, TransactionInstruction};
use crate::codec::{
    encode_to_vec, write_compact_bytes, write_compact_vec, CodecError, Decode, Encode, Reader,
};
use crate::config::{MAX_ACCOUNT_KEYS, MESSAGE_VERSION_PREFIX};
use crate::crypto::Hash;

/// Accounts one lookup table contributes, as indexes into that table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageAddressTableLookup {
    pub account_key: PublicKey,
    pub writable_indexes: Vec<u8>,
    pub readonly_indexes: Vec<u8>,
}

impl Encode for MessageAddressTableLookup {
    fn encode(&self, out: &mut Vec<u8>) {
        self.account_key.encode(out);
        write_compact_bytes(out, &self.writable_indexes);
        write_compact_bytes(out, &self.readonly_indexes);
    }
}

impl Decode for MessageAddressTableLookup {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            account_key: reader.read()?,
            writable_indexes: reader.read_compact_bytes()?,
            readonly_indexes: reader.read_compact_bytes()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageV0 {
    pub header: MessageHeader,
    /// Static keys only; see [`MessageV0::account_keys`] for the full list.
    pub account_keys: Vec<PublicKey>,
    pub recent_blockhash: Hash,
    pub instructions: Vec<CompiledInstruction>,
    pub address_table_lookups: Vec<MessageAddressTableLookup>,
}

impl MessageV0 {
    /// Compiles `instructions`, moving every eligible account into the
    /// supplied lookup tables.
    ///
    /// Signers and program ids always stay static. If more than one table
    /// holds an account, the last table in `lookup_tables` is used. Any
    /// deactivated table fails compilation with
    /// [`CompileError::LookupTableInactive`].
    pub fn compile(
        payer: &PublicKey,
        instructions: &[TransactionInstruction],
        lookup_tables: &[AddressLookupTableAccount],
        recent_blockhash: Hash,
    ) -> Result<Self, CompileError> {
        if instructions.is_empty() {
            return Err(CompileError::NoInstructionsProvided);
        }
        let mut compiled_keys = CompiledKeys::compile(payer, instructions);
        let (address_table_lookups, loaded) = compiled_keys.extract_table_lookups(lookup_tables)?;
        let (header, account_keys) = compiled_keys.into_message_components()?;

        let resolved = resolve(&account_keys, &loaded);
        if resolved.len() > MAX_ACCOUNT_KEYS {
            return Err(CompileError::AccountIndexOverflow);
        }
        let instructions = compile_instructions(instructions, &resolved)?;
        debug!(
            payer = %payer,
            static_keys = account_keys.len(),
            loaded_writable = loaded.writable.len(),
            loaded_readonly = loaded.readonly.len(),
            lookups = address_table_lookups.len(),
            "compiled v0 message"
        );
        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
            address_table_lookups,
        })
    }

    /// Looks up every loaded index in `lookup_tables`.
    pub fn loaded_addresses(
        &self,
        lookup_tables: &[AddressLookupTableAccount],
    ) -> Result<LoadedAddresses, CompileError> {
        let mut loaded = LoadedAddresses::default();
        for lookup in &self.address_table_lookups {
            let table = lookup_tables
                .iter()
                .find(|table| table.key == lookup.account_key)
                .ok_or(CompileError::LookupTableNotFound(lookup.account_key))?;
            let fetch = |i: &u8| {
                table
                    .addresses()
                    .get(usize::from(*i))
                    .copied()
                    .ok_or(CompileError::AccountIndexOutOfRange)
            };
            for i in &lookup.writable_indexes {
                loaded.writable.push(fetch(i)?);
            }
            for i in &lookup.readonly_indexes {
                loaded.readonly.push(fetch(i)?);
            }
        }
        Ok(loaded)
    }

    /// The fully resolved account list instruction indexes point into.
    pub fn account_keys(
        &self,
        lookup_tables: &[AddressLookupTableAccount],
    ) -> Result<Vec<PublicKey>, CompileError> {
        let loaded = self.loaded_addresses(lookup_tables)?;
        Ok(resolve(&self.account_keys, &loaded))
    }

    fn num_loaded_writable(&self) -> usize {
        self.address_table_lookups
            .iter()
            .map(|lookup| lookup.writable_indexes.len())
            .sum()
    }

    fn num_loaded(&self) -> usize {
        self.address_table_lookups
            .iter()
            .map(|lookup| lookup.writable_indexes.len() + lookup.readonly_indexes.len())
            .sum()
    }

    /// Signer status at a resolved position. Loaded accounts never sign.
    pub fn is_account_signer(&self, index: usize) -> bool {
        self.header.is_signer_index(index)
    }

    /// Writability at a resolved position.
    pub fn is_account_writable(&self, index: usize) -> bool {
        let num_static = self.account_keys.len();
        if index < num_static {
            self.header.is_writable_index(index, num_static)
        } else {
            index - num_static < self.num_loaded_writable()
        }
    }

    /// Header, lookup and index checks for a message that came off the wire.
    pub fn sanitize(&self) -> Result<(), CompileError> {
        self.header.sanitize(self.account_keys.len())?;
        if self
            .address_table_lookups
            .iter()
            .any(|l| l.writable_indexes.is_empty() && l.readonly_indexes.is_empty())
        {
            return Err(CompileError::MalformedHeader);
        }
        let total = self.account_keys.len() + self.num_loaded();
        if total > MAX_ACCOUNT_KEYS {
            return Err(CompileError::AccountIndexOverflow);
        }
        check_instruction_indexes(&self.instructions, total)
    }

    /// Wire bytes, including the version prefix.
    pub fn serialize(&self) -> Vec<u8> {
        encode_to_vec(self)
    }

    pub fn deserialize(data: &[u8]) -> Result<Self, CodecError> {
        crate::codec::decode_exact(data)
    }
}

fn resolve(static_keys: &[PublicKey], loaded: &LoadedAddresses) -> Vec<PublicKey> {
    static_keys
        .iter()
        .chain(&loaded.writable)
        .chain(&loaded.readonly)
        .copied()
        .collect()
}

impl Encode for MessageV0 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(MESSAGE_VERSION_PREFIX);
        self.header.encode(out);
        write_compact_vec(out, &self.account_keys);
        self.recent_blockhash.encode(out);
        write_compact_vec(out, &self.instructions);
        write_compact_vec(out, &self.address_table_lookups);
    }
}

impl Decode for MessageV0 {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let prefix = reader.read_u8()?;
        if prefix != MESSAGE_VERSION_PREFIX {
            return Err(CodecError::UnknownDiscriminant {
                field: "message version",
                tag: u32::from(prefix),
            });
        }
        Ok(Self {
            header: reader.read()?,
            account_keys: reader.read_compact_vec()?,
            recent_blockhash: reader.read()?,
            instructions: reader.read_compact_vec()?,
            address_table_lookups: reader.read_compact_vec()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountMeta;

    struct Fixture {
        payer: PublicKey,
        program: PublicKey,
        loaded_w: PublicKey,
        loaded_r: PublicKey,
        static_w: PublicKey,
        table: AddressLookupTableAccount,
    }

    fn fixture() -> Fixture {
        let loaded_w = PublicKey::new_unique();
        let loaded_r = PublicKey::new_unique();
        Fixture {
            payer: PublicKey::new_unique(),
            program: PublicKey::new_unique(),
            loaded_w,
            loaded_r,
            static_w: PublicKey::new_unique(),
            table: AddressLookupTableAccount::new(
                PublicKey::new_unique(),
                vec![PublicKey::new_unique(), loaded_r, loaded_w],
            ),
        }
    }

    fn compile(f: &Fixture) -> MessageV0 {
        let ix = TransactionInstruction::new(
            f.program,
            vec![
                AccountMeta::new_readonly(f.loaded_r, false),
                AccountMeta::new(f.loaded_w, false),
                AccountMeta::new(f.static_w, false),
            ],
            vec![7],
        );
        MessageV0::compile(&f.payer, &[ix], &[f.table.clone()], Hash::digest(b"h")).unwrap()
    }

    #[test]
    fn loaded_accounts_follow_static_keys() {
        let f = fixture();
        let message = compile(&f);
        assert_eq!(message.account_keys, vec![f.payer, f.static_w, f.program]);
        assert_eq!(
            message.address_table_lookups,
            vec![MessageAddressTableLookup {
                account_key: f.table.key,
                writable_indexes: vec![2],
                readonly_indexes: vec![1],
            }]
        );

        let resolved = message.account_keys(&[f.table.clone()]).unwrap();
        assert_eq!(
            resolved,
            vec![f.payer, f.static_w, f.program, f.loaded_w, f.loaded_r]
        );
        // loaded_r, loaded_w, static_w
        assert_eq!(message.instructions[0].account_indexes, vec![4, 3, 1]);
        assert_eq!(message.instructions[0].program_id_index, 2);
    }

    #[test]
    fn resolved_writability() {
        let f = fixture();
        let message = compile(&f);
        let writable: Vec<bool> = (0..5).map(|i| message.is_account_writable(i)).collect();
        assert_eq!(writable, vec![true, true, false, true, false]);
        assert!(!message.is_account_signer(3));
    }

    #[test]
    fn wire_roundtrip_keeps_prefix() {
        let f = fixture();
        let message = compile(&f);
        let bytes = message.serialize();
        assert_eq!(bytes[0], 0x80);
        let decoded = MessageV0::deserialize(&bytes).unwrap();
        assert_eq!(decoded, message);
        assert!(decoded.sanitize().is_ok());
    }

    #[test]
    fn missing_table_fails_resolution() {
        let f = fixture();
        let message = compile(&f);
        assert_eq!(
            message.account_keys(&[]),
            Err(CompileError::LookupTableNotFound(f.table.key))
        );
    }

    #[test]
    fn no_tables_keeps_everything_static() {
        let f = fixture();
        let ix = TransactionInstruction::new(
            f.program,
            vec![AccountMeta::new(f.loaded_w, false)],
            vec![],
        );
        let message = MessageV0::compile(&f.payer, &[ix], &[], Hash::default()).unwrap();
        assert!(message.address_table_lookups.is_empty());
        assert_eq!(message.account_keys, vec![f.payer, f.loaded_w, f.program]);
    }

    #[test]
    fn legacy_prefix_is_not_v0() {
        assert!(matches!(
            MessageV0::deserialize(&[1, 0, 0]),
            Err(CodecError::UnknownDiscriminant { .. })
        ));
    }
}
