//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{CheckCommand, CompletionsCommand, SamplesCommand, ShowCommand};
use clap::{Parser, Subcommand};

/// Command-line tool for checking and inspecting tailseeker run configurations.
#[derive(Parser)]
#[command(name = "tailseeker")]
#[command(version, about = "Check and inspect tailseeker run configurations", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Resolve and validate a configuration file
    Check(CheckCommand),

    /// Print the resolved configuration
    Show(ShowCommand),

    /// List the resolved samples
    Samples(SamplesCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
