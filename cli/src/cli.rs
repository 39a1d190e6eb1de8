//! # CLI Interface
//!
//! Argument structure for the `solwire` binary, via `clap` derive. Every
//! subcommand works offline: input comes from arguments, output goes to
//! stdout.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use solwire::layout::{AccountKind, BinaryEncoding};

use crate::logging::LogFormat;

/// Offline Solana transaction and account inspector.
#[derive(Parser, Debug)]
#[command(
    name = "solwire",
    about = "Decode, build and sign Solana wire data offline",
    version,
    propagate_version = true
)]
pub struct SolwireCli {
    /// Log output format. Logs go to stderr.
    #[arg(
        long,
        global = true,
        env = "SOLWIRE_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a legacy or v0 wire transaction and print it as JSON.
    DecodeTx(DecodeTxArgs),
    /// Decode account data and print it as JSON.
    DecodeAccount(DecodeAccountArgs),
    /// Build and sign a SOL transfer, printing the wire transaction.
    Transfer(TransferArgs),
    /// Print the public key of a keypair file.
    Pubkey(KeypairArgs),
}

/// Text encodings accepted for binary input and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Encoding {
    Base64,
    Base58,
}

impl From<Encoding> for BinaryEncoding {
    fn from(encoding: Encoding) -> Self {
        match encoding {
            Encoding::Base64 => BinaryEncoding::Base64,
            Encoding::Base58 => BinaryEncoding::Base58,
        }
    }
}

/// Account layouts `decode-account` understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Mint,
    TokenAccount,
    TokenSwap,
    LookupTable,
}

impl From<Kind> for AccountKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Mint => AccountKind::Mint,
            Kind::TokenAccount => AccountKind::TokenAccount,
            Kind::TokenSwap => AccountKind::TokenSwap,
            Kind::LookupTable => AccountKind::LookupTable,
        }
    }
}

#[derive(Args, Debug)]
pub struct DecodeTxArgs {
    /// The encoded transaction.
    pub text: String,

    #[arg(long, value_enum, default_value_t = Encoding::Base64)]
    pub encoding: Encoding,
}

#[derive(Args, Debug)]
pub struct DecodeAccountArgs {
    /// The encoded account data.
    pub text: String,

    #[arg(long, value_enum)]
    pub kind: Kind,

    #[arg(long, value_enum, default_value_t = Encoding::Base64)]
    pub encoding: Encoding,
}

#[derive(Args, Debug)]
pub struct KeypairArgs {
    /// Keypair file: a JSON array of 64 bytes.
    #[arg(long, short = 'k', env = "SOLWIRE_KEYPAIR")]
    pub keypair: PathBuf,
}

#[derive(Args, Debug)]
pub struct TransferArgs {
    #[command(flatten)]
    pub keypair: KeypairArgs,

    /// Recipient address (base58).
    #[arg(long)]
    pub to: String,

    #[arg(long)]
    pub lamports: u64,

    /// Recent blockhash (base58), fetched separately.
    #[arg(long)]
    pub blockhash: String,

    /// Optional priority fee, in micro-lamports per compute unit.
    #[arg(long)]
    pub compute_unit_price: Option<u64>,

    #[arg(long, value_enum, default_value_t = Encoding::Base64)]
    pub encoding: Encoding,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        SolwireCli::command().debug_assert();
    }

    #[test]
    fn parses_decode_account() {
        let cli = SolwireCli::try_parse_from([
            "solwire",
            "decode-account",
            "AAAA",
            "--kind",
            "token-account",
            "--encoding",
            "base58",
        ])
        .unwrap();
        match cli.command {
            Commands::DecodeAccount(args) => {
                assert_eq!(args.kind, Kind::TokenAccount);
                assert_eq!(args.encoding, Encoding::Base58);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn log_format_is_global() {
        let cli = SolwireCli::try_parse_from([
            "solwire",
            "pubkey",
            "--keypair",
            "id.json",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
    }
}
