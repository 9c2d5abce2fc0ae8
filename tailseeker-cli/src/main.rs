//! Main entry point for the tailseeker CLI.
//!
//! The CLI resolves tailseeker run configurations without starting a run:
//! - `check`: Resolve and validate a configuration file
//! - `show`: Print the resolved configuration
//! - `samples`: List the resolved samples
//! - `completions`: Generate shell completion scripts

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments; usage errors share the invalid-arguments exit code
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(4);
        }
        Err(e) => e.exit(),
    };

    // Initialize logging based on verbosity
    tailseeker::init_logger(cli.verbose, cli.quiet).install();

    let global = GlobalOptions { quiet: cli.quiet };

    // Execute the command
    let result = match cli.command {
        cli::Command::Check(cmd) => cmd.execute(&global),
        cli::Command::Show(cmd) => cmd.execute(&global),
        cli::Command::Samples(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
