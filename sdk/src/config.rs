//! # Wire Constants & Operation Options
//!
//! Every fixed size, limit and sentinel the codec and compiler depend on
//! lives here. Validators enforce these byte-for-byte, so they are not
//! tunables: changing one produces transactions the network rejects.
//!
//! The option structs at the bottom are the only runtime configuration the
//! library accepts. There are no environment variables and no config files.

// ---------------------------------------------------------------------------
// Key & Signature Sizes
// ---------------------------------------------------------------------------

/// Public keys, program ids, mints and blockhashes are all 32 bytes.
pub const PUBKEY_BYTES: usize = 32;

/// Blockhash length. Same width as a public key, different meaning.
pub const HASH_BYTES: usize = 32;

/// Ed25519 signature length.
pub const SIGNATURE_BYTES: usize = 64;

/// Ed25519 secret seed length.
pub const SECRET_KEY_BYTES: usize = 32;

/// Keypair export format: 32-byte secret seed followed by the 32-byte public key.
pub const KEYPAIR_BYTES: usize = SECRET_KEY_BYTES + PUBKEY_BYTES;

// ---------------------------------------------------------------------------
// Transaction Limits
// ---------------------------------------------------------------------------

/// Maximum serialized transaction size: IPv6 MTU (1280) minus headers.
pub const PACKET_DATA_SIZE: usize = 1280 - 40 - 8;

/// Account indexes are encoded as a single byte, so a message can address
/// at most 256 accounts (static plus lookup-table loaded).
pub const MAX_ACCOUNT_KEYS: usize = 256;

/// Compact lengths are capped at `u16::MAX`, which needs at most 3 bytes.
pub const MAX_COMPACT_LEN_BYTES: usize = 3;

/// High bit of the first message byte flags a versioned message.
pub const MESSAGE_VERSION_PREFIX: u8 = 0x80;

// ---------------------------------------------------------------------------
// Address Derivation
// ---------------------------------------------------------------------------

/// Maximum length of a single derivation seed.
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of seeds accepted by program address derivation.
pub const MAX_SEEDS: usize = 16;

/// Suffix hashed into every program-derived address.
pub const PDA_MARKER: &[u8; 21] = b"ProgramDerivedAddress";

// ---------------------------------------------------------------------------
// Account Layout Sizes
// ---------------------------------------------------------------------------

/// SPL Token mint account size.
pub const MINT_LEN: usize = 82;

/// SPL Token account size. Token-2022 places the account-type byte right
/// after this region for both mints and accounts.
pub const TOKEN_ACCOUNT_LEN: usize = 165;

/// Token-swap pool state, including the leading version byte.
pub const TOKEN_SWAP_LEN: usize = 324;

/// Fixed metadata region at the start of an address lookup table account.
pub const LOOKUP_TABLE_META_SIZE: usize = 56;

/// Deactivation slot value of a lookup table that has never been deactivated.
pub const LOOKUP_TABLE_ACTIVE_SENTINEL: u64 = u64::MAX;

// ---------------------------------------------------------------------------
// Operation Options
// ---------------------------------------------------------------------------

/// Controls the final checks `Transaction::serialize` runs before emitting bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeConfig {
    /// Fail if any signer slot is still empty.
    pub require_all_signatures: bool,
    /// Cryptographically check every present signature.
    pub verify_signatures: bool,
}

impl Default for SerializeConfig {
    fn default() -> Self {
        Self {
            require_all_signatures: true,
            verify_signatures: true,
        }
    }
}

/// What the legacy compiler does when an attached signature belongs to an
/// account that no instruction marked as a signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignerPromotion {
    /// Fail with `CompileError::UnmarkedSigner`.
    #[default]
    Reject,
    /// Promote the account to signer and log a warning.
    Tolerate,
}

/// Options for legacy message compilation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub signer_promotion: SignerPromotion,
}
