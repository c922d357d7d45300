//! Submit a card design to a running relay.

use anyhow::{Context, Result};
use cardrelay_core::client::{RelayClient, DEFAULT_RELAY_URL};
use clap::Args;
use colored::Colorize;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Args)]
pub struct SubmitArgs {
    /// Card data as inline JSON
    #[arg(long, required_unless_present = "file", conflicts_with = "file")]
    pub data: Option<String>,

    /// Path to a JSON file holding the card data
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Relay base URL
    #[arg(long, env = "CARDRELAY_URL", default_value = DEFAULT_RELAY_URL)]
    pub url: String,
}

fn read_card_data(args: &SubmitArgs) -> Result<Value> {
    let raw = match (&args.data, &args.file) {
        (Some(data), _) => data.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("Either --data or --file is required"),
    };
    serde_json::from_str(&raw).context("Card data is not valid JSON")
}

pub async fn execute(args: SubmitArgs) -> Result<()> {
    let card_data = read_card_data(&args)?;
    let client = RelayClient::new(&args.url);

    let outcome = client
        .submit_design(card_data)
        .await
        .with_context(|| format!("Submission to {} failed", client.base_url()))?;

    println!(
        "{} {} ({})",
        "Design".green().bold(),
        outcome.design.id.cyan(),
        outcome.design.processed_at.dimmed()
    );
    println!(
        "  {} {}",
        "Notified clients:".bold(),
        outcome.notified_clients
    );
    Ok(())
}
