// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Corvid - a character-driven conversational agent.
//!
//! This is the binary entry point for the Corvid agent.

mod app;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

/// Corvid - a character-driven conversational agent.
#[derive(Parser, Debug)]
#[command(name = "corvid", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Rebuild the knowledge table from the persona's ingestion URLs.
    Ingest,
    /// Ask the persona a question and publish the reply.
    Ask {
        /// The question to ask.
        query: String,
        /// Recipient handle; routes the reply as a direct message.
        #[arg(long)]
        to: Option<String>,
    },
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match corvid_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            corvid_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Some(Commands::Ingest) => app::run_ingest(&config).await,
        Some(Commands::Ask { query, to }) => app::run_ask(&config, &query, to.as_deref()).await,
        Some(Commands::Config) => app::run_config(&config),
        None => {
            println!("corvid: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("corvid: {e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("corvid={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
