//! `ledgerfeed` command-line tool.
//!
//! Encodes broadcasts into hex payloads and decodes hex payloads into the
//! record a block processor would persist. Set `RUST_LOG` for diagnostics.

use std::{
    io::{self, Write},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use ledgerfeed_core::{
    Address, BroadcastAction, BroadcastProcessor, BroadcastRecord, ConfigError, PriceQuote,
    ProcessorConfig, StaticAssetRegistry, TransactionMeta, compose,
};
use ledgerfeed_proto::EncodingError;
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ledgerfeed", version, about = "Encode and decode ledgerfeed broadcasts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a broadcast and print the payload as hex
    Encode {
        /// Publishing address
        #[arg(long)]
        source: String,

        /// Seconds since epoch
        #[arg(long)]
        timestamp: u32,

        /// Asset the price is quoted in
        #[arg(long, default_value_t = 0)]
        price_asset_id: u64,

        /// Price in the asset's smallest unit (0 for none)
        #[arg(long, default_value_t = 0)]
        price_amount: u64,

        /// Fee multiplier scaled by 10^8
        #[arg(long, default_value_t = 0)]
        fee_multiplier: u32,

        /// Broadcast text (empty locks the feed)
        #[arg(long, default_value = "")]
        text: String,
    },

    /// Decode a hex payload and print the resulting record as JSON
    Decode {
        /// Hex-encoded payload (envelope + body)
        payload: String,

        /// Publishing address
        #[arg(long)]
        source: String,

        /// Treat the source feed as locked
        #[arg(long)]
        locked: bool,

        /// Transaction index
        #[arg(long, default_value_t = 0)]
        tx_index: u64,

        /// Transaction hash
        #[arg(long, default_value = "")]
        tx_hash: String,

        /// Block height
        #[arg(long, default_value_t = 0)]
        block_index: u64,

        /// Subunits per whole unit of divisible assets
        #[arg(long, default_value_t = ProcessorConfig::DEFAULT_UNIT)]
        unit: u64,

        /// Asset ids to treat as divisible (repeatable)
        #[arg(long = "divisible", value_name = "ASSET_ID")]
        divisible: Vec<u64>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid hex payload: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct DecodeOutput {
    record: BroadcastRecord,
    price: Option<PriceQuote>,
    summary: Option<String>,
    locks_feed: bool,
    settles: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "ledgerfeed failed");
            let _ = writeln!(io::stderr(), "error: {error}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Encode { source, timestamp, price_asset_id, price_amount, fee_multiplier, text } => {
            let composed = compose(
                Address::new(source),
                timestamp,
                price_asset_id,
                price_amount,
                fee_multiplier,
                &text,
            )?;
            writeln!(out, "{}", hex::encode(&composed.data))?;
        },
        Command::Decode {
            payload,
            source,
            locked,
            tx_index,
            tx_hash,
            block_index,
            unit,
            divisible,
        } => {
            let payload = hex::decode(payload.trim())?;

            let assets = divisible.iter().fold(StaticAssetRegistry::new(), |assets, &id| {
                assets.with_asset(id, format!("ASSET#{id}"), true)
            });
            let config = ProcessorConfig { unit };
            let processor = BroadcastProcessor::new(config, assets)?;

            let tx = TransactionMeta { tx_index, tx_hash, block_index, source: Address::new(source) };
            let actions = processor.process_payload(&tx, &payload, &move |_: &Address| locked);

            let mut output = None;
            let mut locks_feed = false;
            let mut settles = false;
            for action in actions {
                match action {
                    BroadcastAction::Persist(record) => output = Some(record),
                    BroadcastAction::LockFeed { .. } => locks_feed = true,
                    BroadcastAction::Settle(_) => settles = true,
                }
            }

            if let Some(record) = output {
                let output = DecodeOutput {
                    price: processor.quote(&record),
                    summary: processor.summarize(&record),
                    record,
                    locks_feed,
                    settles,
                };
                serde_json::to_writer_pretty(&mut out, &output)?;
                writeln!(out)?;
            }
        },
    }

    Ok(())
}
