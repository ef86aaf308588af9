//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - analyze: run the multi-cycle analysis pipeline on a dataset
//! - review: run the scientific review crew on a paper

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cadre - a multi-agent analysis and review orchestrator
#[derive(Parser, Debug)]
#[command(name = "cadre")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the multi-cycle analysis pipeline on a dataset
    Analyze {
        /// Path to the dataset file (e.g. a CSV)
        dataset: PathBuf,

        /// Override the number of outer cycles
        #[arg(long)]
        cycles: Option<u32>,

        /// Override the working directory for scripts and reports
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Run the scientific review crew on a paper
    Review {
        /// Path to the paper text (markdown or plain text)
        paper: PathBuf,

        /// Figure image files to attach to every specialist review
        #[arg(short, long)]
        figures: Vec<PathBuf>,
    },
}
