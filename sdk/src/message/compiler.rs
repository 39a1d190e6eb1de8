//! Account ordering for both message formats.
//!
//! The legacy and v0 formats order their key tables differently. Legacy
//! messages stable-sort every account meta by privilege and then
//! deduplicate, so keys keep the order they were first encountered within
//! each privilege class. V0 messages collect keys into an insertion-ordered
//! map (payer, then each instruction's program id followed by its accounts)
//! and group them afterwards. Both end up with the same four contiguous
//! groups the header describes.

use std::collections::HashMap;

use tracing::warn;

use super::{CompileError, MessageAddressTableLookup, MessageHeader};
use super::lookup_table::AddressLookupTableAccount;
use crate::account::{AccountMeta, CompiledInstruction, PublicKey, TransactionInstruction};
use crate::config::{CompileOptions, SignerPromotion, MAX_ACCOUNT_KEYS};

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

/// Signers first, then writable first within each group. Stable, so ties
/// keep their encounter order.
fn sort_by_privilege(metas: &mut [AccountMeta]) {
    metas.sort_by(|a, b| {
        b.is_signer
            .cmp(&a.is_signer)
            .then(b.is_writable.cmp(&a.is_writable))
    });
}

fn header_for(metas: &[AccountMeta]) -> Result<MessageHeader, CompileError> {
    let count = |pred: &dyn Fn(&AccountMeta) -> bool| -> Result<u8, CompileError> {
        u8::try_from(metas.iter().filter(|m| pred(m)).count())
            .map_err(|_| CompileError::AccountIndexOverflow)
    };
    Ok(MessageHeader {
        num_required_signatures: count(&|m| m.is_signer)?,
        num_readonly_signed_accounts: count(&|m| m.is_signer && !m.is_writable)?,
        num_readonly_unsigned_accounts: count(&|m| !m.is_signer && !m.is_writable)?,
    })
}

/// Re-expresses each instruction as indexes into `keys`. Fails fast if an
/// instruction names an account that `keys` does not contain.
pub(crate) fn compile_instructions(
    instructions: &[TransactionInstruction],
    keys: &[PublicKey],
) -> Result<Vec<CompiledInstruction>, CompileError> {
    if keys.len() > MAX_ACCOUNT_KEYS {
        return Err(CompileError::AccountIndexOverflow);
    }
    let mut positions: HashMap<&PublicKey, u8> = HashMap::with_capacity(keys.len());
    for (i, key) in keys.iter().enumerate() {
        let index = u8::try_from(i).map_err(|_| CompileError::AccountIndexOverflow)?;
        positions.entry(key).or_insert(index);
    }
    let position = |key: &PublicKey| -> Result<u8, CompileError> {
        positions
            .get(key)
            .copied()
            .ok_or(CompileError::AccountIndexOutOfRange)
    };

    instructions
        .iter()
        .map(|ix| {
            Ok(CompiledInstruction {
                program_id_index: position(&ix.program_id)?,
                account_indexes: ix
                    .keys
                    .iter()
                    .map(|meta| position(&meta.pubkey))
                    .collect::<Result<_, _>>()?,
                data: ix.data.clone(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Legacy ordering
// ---------------------------------------------------------------------------

/// Orders and deduplicates every account the instructions touch, places
/// the fee payer first and checks each key in `signature_keys` against
/// the result.
pub(crate) fn compile_legacy_keys(
    payer: &PublicKey,
    instructions: &[TransactionInstruction],
    signature_keys: &[PublicKey],
    options: CompileOptions,
) -> Result<(MessageHeader, Vec<PublicKey>), CompileError> {
    let mut metas: Vec<AccountMeta> = instructions
        .iter()
        .flat_map(|ix| ix.keys.iter().copied())
        .collect();
    let mut program_ids: Vec<PublicKey> = Vec::new();
    for ix in instructions {
        if !program_ids.contains(&ix.program_id) {
            program_ids.push(ix.program_id);
        }
    }
    metas.extend(
        program_ids
            .into_iter()
            .map(|id| AccountMeta::new_readonly(id, false)),
    );

    sort_by_privilege(&mut metas);

    let mut unique: Vec<AccountMeta> = Vec::with_capacity(metas.len() + 1);
    let mut seen: HashMap<PublicKey, usize> = HashMap::with_capacity(metas.len());
    for meta in metas {
        match seen.get(&meta.pubkey) {
            Some(&i) => unique[i].merge(&meta),
            None => {
                seen.insert(meta.pubkey, unique.len());
                unique.push(meta);
            }
        }
    }

    unique.retain(|meta| meta.pubkey != *payer);
    unique.insert(0, AccountMeta::new(*payer, true));

    for key in signature_keys {
        let meta = unique
            .iter_mut()
            .find(|meta| meta.pubkey == *key)
            .ok_or(CompileError::UnknownSigner(*key))?;
        if meta.is_signer {
            continue;
        }
        match options.signer_promotion {
            SignerPromotion::Reject => return Err(CompileError::UnmarkedSigner(*key)),
            SignerPromotion::Tolerate => {
                warn!(account = %key, "promoting account with attached signature to signer");
                meta.is_signer = true;
            }
        }
    }

    // Merging and promotion can move a key into a higher class than the
    // position it was sorted into; the header needs contiguous groups.
    sort_by_privilege(&mut unique);

    if unique.len() > MAX_ACCOUNT_KEYS {
        return Err(CompileError::AccountIndexOverflow);
    }
    let header = header_for(&unique)?;
    Ok((header, unique.into_iter().map(|meta| meta.pubkey).collect()))
}

// ---------------------------------------------------------------------------
// V0 ordering
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct KeyFlags {
    is_signer: bool,
    is_writable: bool,
    is_invoked: bool,
}

/// Keys loaded through lookup tables, in resolution order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadedAddresses {
    pub writable: Vec<PublicKey>,
    pub readonly: Vec<PublicKey>,
}

impl LoadedAddresses {
    pub fn len(&self) -> usize {
        self.writable.len() + self.readonly.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Insertion-ordered key map used by the v0 compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompiledKeys {
    entries: Vec<(PublicKey, KeyFlags)>,
}

impl CompiledKeys {
    pub(crate) fn compile(payer: &PublicKey, instructions: &[TransactionInstruction]) -> Self {
        let mut keys = CompiledKeys {
            entries: Vec::new(),
        };
        let mut index: HashMap<PublicKey, usize> = HashMap::new();
        let mut entry = |key: PublicKey, entries: &mut Vec<(PublicKey, KeyFlags)>| -> usize {
            *index.entry(key).or_insert_with(|| {
                entries.push((key, KeyFlags::default()));
                entries.len() - 1
            })
        };

        let payer_at = entry(*payer, &mut keys.entries);
        keys.entries[payer_at].1.is_signer = true;
        keys.entries[payer_at].1.is_writable = true;

        for ix in instructions {
            let at = entry(ix.program_id, &mut keys.entries);
            keys.entries[at].1.is_invoked = true;
            for meta in &ix.keys {
                let at = entry(meta.pubkey, &mut keys.entries);
                let flags = &mut keys.entries[at].1;
                flags.is_signer |= meta.is_signer;
                flags.is_writable |= meta.is_writable;
            }
        }
        keys
    }

    /// Moves every non-signer, non-program key found in `tables` out of
    /// the static set. When more than one table holds a key, the table
    /// supplied last wins. Lookups come back in table order and tables
    /// that load nothing are omitted.
    pub(crate) fn extract_table_lookups(
        &mut self,
        tables: &[AddressLookupTableAccount],
    ) -> Result<(Vec<MessageAddressTableLookup>, LoadedAddresses), CompileError> {
        if let Some(table) = tables.iter().find(|table| !table.is_active()) {
            return Err(CompileError::LookupTableInactive(table.key));
        }

        // (table position, index within table) for each loadable key.
        let mut placement: HashMap<PublicKey, (usize, u8)> = HashMap::new();
        for (key, flags) in &self.entries {
            if flags.is_signer || flags.is_invoked {
                continue;
            }
            for (table_at, table) in tables.iter().enumerate().rev() {
                if let Some(i) = table.addresses().iter().position(|a| a == key) {
                    let i = u8::try_from(i).map_err(|_| CompileError::LookupTableIndexOverflow)?;
                    placement.insert(*key, (table_at, i));
                    break;
                }
            }
        }

        let mut lookups = Vec::new();
        let mut loaded = LoadedAddresses::default();
        for (table_at, table) in tables.iter().enumerate() {
            let mut lookup = MessageAddressTableLookup {
                account_key: table.key,
                writable_indexes: Vec::new(),
                readonly_indexes: Vec::new(),
            };
            for (key, flags) in &self.entries {
                let Some(&(at, i)) = placement.get(key) else {
                    continue;
                };
                if at != table_at {
                    continue;
                }
                if flags.is_writable {
                    lookup.writable_indexes.push(i);
                    loaded.writable.push(*key);
                } else {
                    lookup.readonly_indexes.push(i);
                    loaded.readonly.push(*key);
                }
            }
            if !lookup.writable_indexes.is_empty() || !lookup.readonly_indexes.is_empty() {
                lookups.push(lookup);
            }
        }

        self.entries.retain(|(key, _)| !placement.contains_key(key));
        Ok((lookups, loaded))
    }

    /// Header and static key list in group order.
    pub(crate) fn into_message_components(
        self,
    ) -> Result<(MessageHeader, Vec<PublicKey>), CompileError> {
        let mut metas: Vec<AccountMeta> = self
            .entries
            .into_iter()
            .map(|(pubkey, flags)| AccountMeta {
                pubkey,
                is_signer: flags.is_signer,
                is_writable: flags.is_writable,
            })
            .collect();
        sort_by_privilege(&mut metas);
        if metas.len() > MAX_ACCOUNT_KEYS {
            return Err(CompileError::AccountIndexOverflow);
        }
        let header = header_for(&metas)?;
        Ok((header, metas.into_iter().map(|meta| meta.pubkey).collect()))
    }
}
