//! Relay server command.

use anyhow::Result;
use cardrelay_core::config::{DEFAULT_HOST, DEFAULT_PORT};
use cardrelay_core::RelayConfig;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "CARDRELAY_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "CARDRELAY_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Allowed CORS origin (repeatable, or comma-separated)
    #[arg(long = "origin", env = "CARDRELAY_ORIGINS", value_delimiter = ',')]
    pub origins: Vec<String>,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (defaults to ./cardrelay.log)
    #[arg(long, requires = "log")]
    pub log_file: Option<PathBuf>,
}

impl ServeArgs {
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("cardrelay.log"))
    }

    pub fn config(&self) -> RelayConfig {
        RelayConfig {
            host: self.host.clone(),
            port: self.port,
            ..RelayConfig::default()
        }
        .with_origins(&self.origins)
    }
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let config = args.config();

    println!();
    println!("  {} {}", "CardRelay".cyan().bold(), "Notification Relay".bold());
    println!();
    println!("  {}     http://{}/api/health", "Health".green(), config.bind_addr());
    println!("  {}     http://{}/api/card/design", "Submit".green(), config.bind_addr());
    println!("  {}  ws://{}/ws", "WebSocket".green(), config.bind_addr());
    println!("  {}    {}", "Origins".green(), config.allowed_origins.join(", "));
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    cardrelay_web::run_server(config).await?;

    Ok(())
}
