//! CLI module for brawlbrief.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// brawlbrief - Brawl Stars video briefs with RAG
///
/// Turns Brawl Stars YouTube videos into structured briefs, filters them
/// against the official brawler roster, and indexes the result in a managed
/// RAG corpus for grounded questions.
#[derive(Parser, Debug)]
#[command(name = "brawlbrief")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a YouTube video: extract, filter, chunk, upload, and index
    Process {
        /// YouTube URL or bare video ID
        url: String,

        /// Force local mode: fetch the transcript only, no oracle or index
        #[arg(short, long)]
        local: bool,
    },

    /// Ask a grounded question against the indexed corpus
    Query {
        /// The question to ask
        question: String,
    },

    /// List files imported into the corpus
    List,

    /// Check system requirements and configuration
    Doctor,

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
