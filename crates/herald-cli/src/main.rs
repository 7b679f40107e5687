//! herald CLI - render catalog change events into channel messages.

mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use herald_core::Channel;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "herald")]
#[command(author, version, about = "Catalog change notification renderer")]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    format: output::OutputFormat,

    /// Catalog path (defaults to current directory)
    #[arg(long, short = 'C', global = true)]
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new catalog
    Init {
        /// Catalog UI base URL used in rendered links
        #[arg(long)]
        base_url: Option<String>,

        /// Catalog name shown in logs
        #[arg(long)]
        name: Option<String>,
    },

    /// Render a change event file (JSON or YAML) into a message
    Render {
        /// Path to the event file
        event: PathBuf,

        /// Target channel (defaults to the configured channel)
        #[arg(long, short = 'c')]
        channel: Option<Channel>,

        /// Publisher name shown in the header
        #[arg(long, short = 'p')]
        publisher: Option<String>,
    },

    /// Render the connection test message
    TestMessage {
        /// Target channel (defaults to the configured channel)
        #[arg(long, short = 'c')]
        channel: Option<Channel>,

        /// Publisher name shown in the header
        #[arg(long, short = 'p')]
        publisher: Option<String>,
    },

    /// Show the marked-up difference between two values
    Diff {
        /// Previous value (empty for none)
        old: String,

        /// Current value
        new: String,

        /// Target channel (defaults to the configured channel, or slack)
        #[arg(long, short = 'c')]
        channel: Option<Channel>,
    },

    /// Start the HTTP preview server
    Serve {
        /// Port to listen on
        #[arg(long, short = 'p', default_value = "17474")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let catalog_path = match cli.path {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match cli.command {
        Commands::Init { base_url, name } => {
            commands::init(&catalog_path, base_url, name, cli.format)
        }
        Commands::Render {
            event,
            channel,
            publisher,
        } => commands::render(
            &catalog_path,
            &event,
            channel,
            publisher.as_deref(),
            cli.format,
        ),
        Commands::TestMessage { channel, publisher } => {
            commands::test_message(&catalog_path, channel, publisher.as_deref(), cli.format)
        }
        Commands::Diff { old, new, channel } => {
            commands::diff(&catalog_path, &old, &new, channel, cli.format)
        }
        Commands::Serve { port, host } => commands::serve(&catalog_path, &host, port),
    }
}
