//! CLI argument definitions using clap
//!
//! Commands:
//! - floradb serve --snapshot <path> --port <port>
//! - floradb query --snapshot <path> [--query <json>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// FloraDB - a spreadsheet-snapshot plant database with an advanced JSON
/// query engine
#[derive(Parser, Debug)]
#[command(name = "floradb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the query HTTP server
    Serve {
        /// Path to the snapshot JSON file
        #[arg(long, default_value = "./snapshot.json")]
        snapshot: PathBuf,

        /// Port to listen on
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },

    /// Execute a single advanced query and exit
    Query {
        /// Path to the snapshot JSON file
        #[arg(long, default_value = "./snapshot.json")]
        snapshot: PathBuf,

        /// Query as an inline JSON string; reads stdin when omitted
        #[arg(long)]
        query: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
