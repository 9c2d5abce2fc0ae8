//! Show command implementation.
//!
//! Prints the fully resolved configuration, derived values included, so a
//! run can be inspected or diffed against another one.

use crate::error::CliError;
use crate::utils::{load_configuration, GlobalOptions};
use clap::{Args, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tailseeker::Configuration;

/// Print the resolved configuration.
#[derive(Args)]
pub struct ShowCommand {
    /// Configuration file to resolve
    #[arg(value_name = "CONFIG")]
    pub config_path: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "yaml", ignore_case = true)]
    pub format: OutputFormat,
}

/// Output format for the show command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl ShowCommand {
    /// Execute the show command.
    pub fn execute(self, _global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(&self.config_path)?;
        let rendered = render(&config, self.format)?;

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(rendered.as_bytes())?;
        if !rendered.ends_with('\n') {
            writeln!(handle)?;
        }

        config.teardown();
        Ok(())
    }
}

/// Serialize a configuration in the requested format.
pub fn render(config: &Configuration, format: OutputFormat) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(config)?,
        OutputFormat::Yaml => serde_yaml::to_string(config)?,
    })
}
