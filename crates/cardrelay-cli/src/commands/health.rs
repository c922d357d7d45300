//! Relay health check command.

use anyhow::{Context, Result};
use cardrelay_core::client::{RelayClient, DEFAULT_RELAY_URL};
use clap::Args;
use colored::Colorize;

#[derive(Args)]
pub struct HealthArgs {
    /// Relay base URL
    #[arg(long, env = "CARDRELAY_URL", default_value = DEFAULT_RELAY_URL)]
    pub url: String,
}

pub async fn execute(args: HealthArgs) -> Result<()> {
    let client = RelayClient::new(&args.url);
    let health = client
        .health()
        .await
        .with_context(|| format!("Health check against {} failed", client.base_url()))?;

    println!("{}: {}", "Status".bold(), health.status.green());
    println!("{}: {}", "Connected clients".bold(), health.connected_clients);
    println!("{}: {}", "Timestamp".bold(), health.timestamp.dimmed());
    Ok(())
}
