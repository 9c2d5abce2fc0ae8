//! Utility functions shared by the CLI commands.

use crate::error::CliError;
use std::path::Path;
use tailseeker::Configuration;

/// Global CLI options shared across all commands.
///
/// Verbosity is consumed by the logger before dispatch, so only the quiet
/// flag reaches the commands.
#[derive(Debug, Clone, Copy)]
pub struct GlobalOptions {
    /// Suppress non-essential output.
    pub quiet: bool,
}

/// Resolve the configuration file named on the command line.
///
/// A missing file is reported as an argument error rather than an I/O
/// error, since the user most likely mistyped the path.
pub fn load_configuration(path: &Path) -> Result<Configuration, CliError> {
    if !path.exists() {
        return Err(CliError::InvalidArguments(format!(
            "File not found: {}",
            path.display()
        )));
    }

    Ok(tailseeker::resolve(path)?)
}

/// Render an optional string, using `-` for absent values.
pub fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    }
}
