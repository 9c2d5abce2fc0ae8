//! Configuration builder.
//!
//! [`ConfigBuilder`] is the single writer during resolution. Entries are fed
//! one at a time; [`ConfigBuilder::build`] runs the derived-value pass and
//! the validator and hands out the finished [`Configuration`]. Dropping a
//! builder after an error releases everything fed so far.

use crate::config::derive::compute_derived_values;
use crate::config::dispatch::feed_entry;
use crate::config::registry::SampleRegistry;
use crate::config::schema::Configuration;
use crate::config::validator::ConfigValidator;
use crate::error::Result;

/// Accumulates configuration entries.
///
/// # Examples
///
/// ```
/// use tailseeker::config::ConfigBuilder;
///
/// let mut builder = ConfigBuilder::new();
/// builder.feed("read_format", "total-cycles", "100").unwrap();
/// builder.feed("read_format", "threep-start", "53").unwrap();
/// builder.feed("read_format", "threep-length", "48").unwrap();
/// builder.feed("sample:HeLa", "index", "ACAGTG").unwrap();
///
/// let config = builder.build().unwrap();
/// assert_eq!(config.read_format.threep_start, Some(52));
/// assert_eq!(config.num_samples(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Configuration,
    registry: SampleRegistry,
}

impl ConfigBuilder {
    /// Create a builder holding only the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one `(section, key, value)` entry.
    ///
    /// # Errors
    ///
    /// Fails on an unknown section or key, or a value the key rejects.
    pub fn feed(&mut self, section: &str, key: &str, value: &str) -> Result<()> {
        feed_entry(&mut self.config, &mut self.registry, section, key, value)
    }

    /// Number of samples declared so far, synthesized samples excluded.
    #[must_use]
    pub fn declared_samples(&self) -> usize {
        self.registry.len()
    }

    /// Derive the remaining values and validate the result.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the derived configuration is unusable.
    pub fn build(self) -> Result<Configuration> {
        let config = compute_derived_values(self.config, self.registry);
        ConfigValidator::validate(&config)?;
        log::info!(
            "configuration resolved with {} samples",
            config.num_samples()
        );
        Ok(config)
    }
}
