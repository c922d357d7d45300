//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod health;
pub mod serve;
pub mod submit;

/// Card design notification relay
#[derive(Parser)]
#[command(name = "cardrelay")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay server
    Serve(serve::ServeArgs),

    /// Submit card data to a running relay
    Submit(submit::SubmitArgs),

    /// Show a running relay's health
    Health(health::HealthArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::execute(args).await,
            Commands::Submit(args) => submit::execute(args).await,
            Commands::Health(args) => health::execute(args).await,
        }
    }
}
