use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use paisa_core::time::{local_date, parse_timezone};
use paisa_extract::{Importer, ParsedBatch, RemoteClassifier, RemoteConfig, SmsEngine};

mod config;
mod input;
mod state;

#[derive(Parser, Debug)]
#[command(name = "paisa", version, about = "Bank-SMS expense and subscription scanner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a batch of bank notification messages into transactions
    Scan {
        /// SMS-backup CSV export with body/date columns
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Plain text file, one message per line (default: stdin)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Emit the batch as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Skip the remote classifier even if configured
        #[arg(long)]
        local_only: bool,
    },

    /// Config file management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default ~/.paisa/config.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Scan { csv, file, json, local_only } => scan(csv, file, json, local_only).await,
        Command::Config { command: ConfigCommand::Init } => config::init_config(),
    }
}

async fn scan(
    csv: Option<PathBuf>,
    file: Option<PathBuf>,
    json: bool,
    local_only: bool,
) -> Result<()> {
    let cfg = config::load_config()?;
    let tz = parse_timezone(&cfg.timezone)?;

    let messages = if let Some(path) = csv {
        input::read_csv_messages(&path, tz)?
    } else if let Some(path) = file {
        input::read_text_messages(&path)?
    } else {
        input::read_stdin_messages()?
    };

    if messages.is_empty() {
        println!("No messages to scan");
        return Ok(());
    }

    let remote = if !local_only && cfg.remote.enabled && !cfg.remote.endpoint.is_empty() {
        Some(RemoteClassifier::new(&RemoteConfig {
            endpoint: cfg.remote.endpoint.clone(),
            timeout_secs: cfg.remote.timeout_secs,
        })?)
    } else {
        None
    };

    let engine = SmsEngine::with_timezone(&cfg.timezone)?;
    let importer = Importer::with_engine(engine, remote);
    let today = local_date(Utc::now(), tz);
    let batch = importer.run(&messages, today).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
    } else {
        print_summary(messages.len(), &batch);
    }
    Ok(())
}

fn print_summary(scanned: usize, batch: &ParsedBatch) {
    println!(
        "Scanned {} messages: {} transactions, {} subscriptions (net {:+.2})\n",
        scanned,
        batch.transactions.len(),
        batch.subscriptions.len(),
        batch.net_change()
    );

    for txn in &batch.transactions {
        println!(
            "  {}  {:>12.2}  {:<17}  {}",
            txn.date,
            txn.amount,
            txn.category.label(),
            txn.description
        );
    }

    if !batch.subscriptions.is_empty() {
        println!("\nSubscriptions:");
        for sub in &batch.subscriptions {
            println!(
                "  {:<20} {:>10.2}  renews {}",
                sub.name, sub.amount, sub.renewal_date
            );
        }
    }
}
