//! CLI command definitions using clap.
//!
//! - serve: run the HTTP server
//! - token: mint a session token for a user
//! - topics: list a user's topics
//! - verify / consolidate: run the editor pipeline from the terminal

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use redator::prompt::ConsolidationStyle;

/// Redator - academic outline editor with AI coherence checks
#[derive(Parser, Debug)]
#[command(name = "redator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log to stderr instead of the log file
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Override the bind address from config
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Mint a session token for a user
    Token {
        user: String,
    },

    /// List a user's topics, newest first
    Topics {
        user: String,
    },

    /// Coherence check of a topic's outline
    Verify {
        user: String,
        topic: String,
    },

    /// Consolidate a topic into one article
    Consolidate {
        user: String,
        topic: String,

        /// Write a .docx file instead of printing text
        #[arg(long)]
        docx: Option<PathBuf>,

        /// Macro-structure to request (defaults: classic for text, extended for docx)
        #[arg(short, long, value_enum)]
        style: Option<StyleArg>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleArg {
    Classic,
    Extended,
}

impl From<StyleArg> for ConsolidationStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Classic => ConsolidationStyle::Classic,
            StyleArg::Extended => ConsolidationStyle::Extended,
        }
    }
}
