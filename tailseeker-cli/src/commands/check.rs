//! Command to check a tailseeker configuration file.

use crate::error::CliError;
use crate::utils::{load_configuration, GlobalOptions};
use clap::Args;
use std::path::PathBuf;

/// Resolve and validate a configuration file.
#[derive(Args)]
pub struct CheckCommand {
    /// Configuration file to check
    #[arg(value_name = "CONFIG")]
    pub config_path: PathBuf,
}

impl CheckCommand {
    /// Execute the check command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(&self.config_path)?;

        if !global.quiet {
            println!(
                "Configuration is valid: {} samples, {} read buffer entries",
                config.num_samples(),
                config.buffers.read_buffer_entry_count
            );
        }

        config.teardown();
        Ok(())
    }
}
