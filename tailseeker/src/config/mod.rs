//! Configuration resolution for tailseeker.
//!
//! A tailseeker run is described by a single INI file. Resolution turns that
//! file into one immutable [`Configuration`] in four stages:
//!
//! 1. the [`lexer`] splits the text into `(section, key, value)` entries
//! 2. the [`dispatch`]er routes each entry to its section's setter table,
//!    creating samples and UMI slots on first mention
//! 3. the derived-value pass fills in window ends, sample lengths, the
//!    synthesized `Unknown` and control samples, ordinals, the T-intensity
//!    score table and the buffer budget
//! 4. the [`validator`] rejects configurations the pipeline cannot run with
//!
//! Any error aborts resolution; nothing partially resolved is returned.
//!
//! # Examples
//!
//! Resolving a file:
//!
//! ```no_run
//! use tailseeker::config::resolve;
//!
//! let config = resolve("tailseeker.conf").unwrap();
//! for sample in &config.samples {
//!     println!("{}\t{}", sample.ordinal, sample.name());
//! }
//! ```
//!
//! Resolving text directly:
//!
//! ```
//! use tailseeker::config::resolve_str;
//!
//! let config = resolve_str(
//!     "[read_format]
//! total-cycles = 251
//! fivep-start = 1
//! fivep-length = 25
//! threep-start = 33
//! threep-length = 219
//!
//! [sample:HeLa]
//! index = ACAGTG
//! ",
//! )
//! .unwrap();
//!
//! assert_eq!(config.read_format.threep_start, Some(32));
//! assert_eq!(config.samples[0].name(), "Unknown");
//! assert_eq!(config.samples[1].name(), "HeLa");
//! ```

pub mod builder;
mod derive;
pub mod dispatch;
mod handlers;
pub mod lexer;
pub mod registry;
pub mod schema;
pub mod scores;
pub mod validator;
pub mod values;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;
use lexer::Lexer;

// Re-export key types at module root
pub use builder::ConfigBuilder;
pub use registry::{SampleRegistry, UmiInterval, UmiTable};
pub use schema::{
    AlternativeCall, BalancerParams, BaseWeights, BufferBudget, Configuration, ControlInfo,
    FinderParams, OutputPaths, ReadFormat, RulerParams, RunOptions, Sample, SampleInfo,
    SeederParams, SourceInfo,
};
pub use validator::ConfigValidator;

/// Resolve the configuration file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, contains an
/// unknown section or key, or fails validation.
pub fn resolve(path: impl AsRef<Path>) -> Result<Configuration> {
    let path = path.as_ref();
    log::debug!("resolving configuration from {}", path.display());
    let file = File::open(path)?;
    resolve_reader(BufReader::new(file), path)
}

/// Resolve configuration text held in memory.
///
/// # Errors
///
/// Same as [`resolve`], minus I/O failures.
pub fn resolve_str(text: &str) -> Result<Configuration> {
    resolve_reader(text.as_bytes(), Path::new("<string>"))
}

fn resolve_reader(reader: impl BufRead, path: &Path) -> Result<Configuration> {
    let mut builder = ConfigBuilder::new();
    for entry in Lexer::new(reader, path) {
        let entry = entry?;
        builder
            .feed(&entry.section, &entry.key, &entry.value)
            .map_err(|e| {
                log::debug!("{}:{}: {e}", path.display(), entry.line);
                e
            })?;
    }
    builder.build()
}
