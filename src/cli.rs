//! Command-line interface for strictly_cricket.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Cricket - ball-by-ball scoring with checked transitions
#[derive(Parser, Debug)]
#[command(name = "strictly_cricket")]
#[command(about = "Score cricket matches ball by ball", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to scorer configuration (TOML). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a scoring script and print the scorecard
    Score {
        /// Path to the scoring script (TOML)
        script: PathBuf,

        /// Print the final match as JSON instead of a scorecard
        #[arg(long)]
        json: bool,
    },

    /// Replay a scoring script and ask the LLM for commentary
    Insight {
        /// Path to the scoring script (TOML)
        script: PathBuf,
    },

    /// Show live international scores
    Live {
        /// Keep refreshing until interrupted
        #[arg(short, long)]
        watch: bool,
    },
}
