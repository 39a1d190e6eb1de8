// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # solwire CLI
//!
//! Entry point for the `solwire` binary: a thin, offline developer tool
//! over the `solwire` library.
//!
//! - `decode-tx`      - wire transaction to JSON
//! - `decode-account` - account data to JSON
//! - `transfer`       - build and sign a SOL transfer
//! - `pubkey`         - print a keypair file's public key
//!
//! Nothing here talks to the network. Blockhashes and account data are
//! fetched by whatever drives the tool.

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use std::path::Path;

use solwire::layout::{AccountKind, BinaryEncoding};
use solwire::message::VersionedMessage;
use solwire::programs::{compute_budget, system};
use solwire::{Hash, Keypair, PublicKey, SerializeConfig, Transaction, VersionedTransaction};

use cli::{Commands, SolwireCli};

fn main() -> Result<()> {
    let cli = SolwireCli::parse();
    logging::init_logging("solwire=warn,solwire_cli=info", cli.log_format);

    let output = match cli.command {
        Commands::DecodeTx(args) => {
            let summary = decode_tx(&args.text, args.encoding.into())?;
            serde_json::to_string_pretty(&summary)?
        }
        Commands::DecodeAccount(args) => {
            let state = decode_account(&args.text, args.kind.into(), args.encoding.into())?;
            serde_json::to_string_pretty(&state)?
        }
        Commands::Transfer(args) => {
            let keypair = read_keypair(&args.keypair.keypair)?;
            let to: PublicKey = args
                .to
                .parse()
                .with_context(|| format!("invalid recipient address: {}", args.to))?;
            let blockhash: Hash = args
                .blockhash
                .parse()
                .with_context(|| format!("invalid blockhash: {}", args.blockhash))?;
            transfer(
                &keypair,
                &to,
                args.lamports,
                blockhash,
                args.compute_unit_price,
                args.encoding.into(),
            )?
        }
        Commands::Pubkey(args) => read_keypair(&args.keypair)?.public_key().to_string(),
    };
    println!("{output}");
    Ok(())
}

/// Loads a JSON byte-array keypair file.
fn read_keypair(path: &Path) -> Result<Keypair> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read keypair file: {}", path.display()))?;
    Keypair::from_json(&text)
        .with_context(|| format!("failed to parse keypair file: {}", path.display()))
}

/// Decodes a wire transaction of either format into a JSON summary.
fn decode_tx(text: &str, encoding: BinaryEncoding) -> Result<Value> {
    let bytes = encoding
        .decode(text.trim())
        .context("failed to decode transaction text")?;
    let tx = VersionedTransaction::deserialize(&bytes).context("invalid wire transaction")?;
    tracing::debug!(bytes = bytes.len(), "transaction decoded");

    let message = &tx.message;
    let version = match message.version() {
        Some(version) => json!(version),
        None => json!("legacy"),
    };
    let keys: Vec<Value> = message
        .static_account_keys()
        .iter()
        .enumerate()
        .map(|(index, key)| {
            json!({
                "pubkey": key,
                "signer": message.header().is_signer_index(index),
                "writable": is_writable(message, index),
            })
        })
        .collect();

    Ok(json!({
        "version": version,
        "signatures": tx.signature_pairs(),
        "verified": tx.verify(false).is_ok(),
        "header": message.header(),
        "accountKeys": keys,
        "recentBlockhash": message.recent_blockhash(),
        "instructions": message.instructions(),
        "addressTableLookups": message.address_table_lookups(),
        "size": bytes.len(),
    }))
}

fn is_writable(message: &VersionedMessage, index: usize) -> bool {
    match message {
        VersionedMessage::Legacy(message) => message.is_account_writable(index),
        VersionedMessage::V0(message) => message.is_account_writable(index),
    }
}

fn decode_account(text: &str, kind: AccountKind, encoding: BinaryEncoding) -> Result<Value> {
    let bytes = encoding
        .decode(text.trim())
        .context("failed to decode account text")?;
    let state = kind
        .decode(&bytes)
        .with_context(|| format!("account data is not a valid {}", kind.name()))?;
    Ok(serde_json::to_value(state)?)
}

/// Builds and fully signs a transfer from `keypair`, returning the encoded
/// wire transaction.
fn transfer(
    keypair: &Keypair,
    to: &PublicKey,
    lamports: u64,
    blockhash: Hash,
    compute_unit_price: Option<u64>,
    encoding: BinaryEncoding,
) -> Result<String> {
    let from = keypair.public_key();
    let mut tx = Transaction::new()
        .with_fee_payer(from)
        .with_recent_blockhash(blockhash);
    if let Some(price) = compute_unit_price {
        tx.add_instruction(compute_budget::set_compute_unit_price(price));
    }
    tx.add_instruction(system::transfer(&from, to, lamports));
    tx.sign(&[keypair]).context("failed to sign transfer")?;
    let bytes = tx
        .serialize(SerializeConfig::default())
        .context("failed to serialize transfer")?;
    tracing::info!(
        from = %from,
        to = %to,
        lamports,
        bytes = bytes.len(),
        "transfer signed"
    );
    Ok(encoding.encode(&bytes))
}
