//! Samples command implementation.
//!
//! Lists the resolved samples, synthesized ones included, in ordinal order
//! as tab-separated values.

use crate::error::CliError;
use crate::utils::{load_configuration, or_dash, GlobalOptions};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use tailseeker::Sample;

/// Column headers for the sample table.
const COLUMN_HEADERS: [&str; 6] = [
    "ordinal",
    "name",
    "index",
    "max_index_mismatches",
    "delimiter",
    "umi_length",
];

/// List the samples of a configuration.
#[derive(Args)]
pub struct SamplesCommand {
    /// Configuration file to resolve
    #[arg(value_name = "CONFIG")]
    pub config_path: PathBuf,

    /// Omit the header line
    #[arg(long)]
    pub no_header: bool,
}

impl SamplesCommand {
    /// Execute the samples command.
    pub fn execute(self, _global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(&self.config_path)?;

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        write_table(&mut handle, &config.samples, !self.no_header)?;
        handle.flush()?;

        config.teardown();
        Ok(())
    }
}

/// Write one tab-separated row per sample.
pub fn write_table(
    out: &mut impl Write,
    samples: &[Sample],
    header: bool,
) -> std::io::Result<()> {
    if header {
        writeln!(out, "{}", COLUMN_HEADERS.join("\t"))?;
    }

    for sample in samples {
        let info = &sample.info;
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}",
            sample.ordinal,
            info.name,
            or_dash(info.index.as_deref()),
            info.max_index_mismatches,
            or_dash(info.delimiter.as_deref()),
            info.umi_total_length,
        )?;
    }

    Ok(())
}
