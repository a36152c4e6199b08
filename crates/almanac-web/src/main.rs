//! Almanac
//!
//! Serves a Feishu Bitable table as an article site.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use almanac_web::commands::{ConfigAction, handle_config_command};
use almanac_web::{Server, SiteConfig};
use anyhow::Result;
use clap::Parser;

/// Almanac - article site over a Feishu Bitable table
#[derive(Parser, Debug)]
#[command(name = "almanac")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, global = true, env = "ALMANAC_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Serve the site (default)
    Serve,
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,almanac=debug".into()),
        )
        .init();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let config = SiteConfig::load(args.config.as_deref())?;
            let server = Server::new(config).inspect_err(|e| {
                tracing::error!("Invalid configuration: {e}");
            })?;
            server.run().await?;
        }
        Command::Config { action } => handle_config_command(args.config.as_deref(), action)?,
    }

    Ok(())
}
