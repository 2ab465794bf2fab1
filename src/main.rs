use std::path::Path;

use coin_ledger::ledger::{self, LedgerConfig};
use csv::{ReaderBuilder, Trim};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// The size of the channel for processing requests.
const CHANNEL_SIZE: usize = 100;

/// One output row per coin stack.
#[derive(Serialize)]
struct StackRow<'a> {
    holder: ledger::HolderId,
    stack: ledger::StackId,
    currency: ledger::Denomination,
    quantity: u64,
    name: &'a str,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coin_ledger=info")),
        )
        .init();

    let args = std::env::args().collect::<Vec<_>>();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <requests_csv_file> [config_toml_file]", args[0]);
        std::process::exit(1);
    }
    let input_file = &args[1];

    let config = match args.get(2) {
        Some(path) => LedgerConfig::from_path(Path::new(path)).expect("Failed to load config"),
        None => LedgerConfig::default(),
    };

    let ledger = ledger::Ledger::new(
        ledger::MemoryStore::new(),
        ledger::StaticCatalog::standard(),
        config.change_order,
    );
    let (sender, receiver) = mpsc::channel(CHANNEL_SIZE);
    let mut state = ledger::State::new(ledger, config.price_multipliers(), receiver);

    let handle = tokio::spawn(async move {
        state.run().await;
        state
    });

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(input_file)
        .expect("Failed to read CSV file");

    for request in reader.deserialize() {
        match request {
            Ok(request) => {
                if let Err(err) = sender.send(request).await {
                    tracing::error!("Error sending request: {err}");
                }
            }
            Err(err) => tracing::warn!("Skipping malformed row: {err}"),
        }
    }

    drop(sender); // Close the sender to signal no more requests will be sent
    let state = handle
        .await
        .expect("Failed to join the state handling task");

    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for (holder, stacks) in state.ledger().store().snapshot().await {
        for stack in &stacks {
            let row = StackRow {
                holder,
                stack: stack.id,
                currency: stack.denomination,
                quantity: stack.quantity,
                name: &stack.name,
            };
            if let Err(err) = writer.serialize(row) {
                tracing::error!("Error writing stack: {err}");
            }
        }
    }
    if let Err(err) = writer.flush() {
        tracing::error!("Error flushing output: {err}");
    }
}
