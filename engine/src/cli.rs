//! CLI interface for the helpdesk
//!
//! This module provides the command-line interface using clap's derive API.
//! Running without a subcommand starts the terminal chat.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AI IT Helpdesk Agent
///
/// Answers questions from your IT policy documents and keeps a simple
/// in-memory ticket queue for everything else.
#[derive(Parser, Debug)]
#[command(name = "helpdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The subcommand to run, defaulting to the terminal chat
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Chat)
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Chat with the helpdesk in the terminal (default)
    Chat,

    /// Serve the web chat UI
    Web {
        /// Address to listen on (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Ask a single knowledge-base question and exit
    Ask {
        /// The question to ask
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Build or refresh the policy vector index
    Index {
        /// Rebuild even if the stored index is up to date
        #[arg(long)]
        rebuild: bool,
    },

    /// Run system diagnostics
    Doctor,
}
