//! Conclave CLI — the main entry point.
//!
//! Commands:
//! - `chat`   — Interactive chat with the manager agent, or single-message mode
//! - `tools`  — List the built-in tools and their tags
//! - `agents` — List the agents in the default fleet

use clap::{Parser, Subcommand};

mod commands;
mod fleet;

#[derive(Parser)]
#[command(
    name = "conclave",
    about = "Conclave — a multi-agent orchestration runtime",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the manager agent
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// List the built-in tools
    Tools,

    /// List the agents in the default fleet
    Agents,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Chat { message } => commands::chat::run(message).await?,
        Commands::Tools => commands::tools::run()?,
        Commands::Agents => commands::agents::run()?,
    }

    Ok(())
}
