//! Configuration validation.
//!
//! Runs on a fully derived [`Configuration`], so checks can rely on the
//! synthesized samples and the buffer budget being in place.

use std::collections::HashSet;

use crate::config::schema::{Configuration, UNKNOWN_SAMPLE_NAME};
use crate::error::{Error, Result};

/// Validates a resolved configuration.
///
/// # Examples
///
/// ```
/// use tailseeker::config::{resolve_str, ConfigValidator};
///
/// let config = resolve_str(
///     "[read_format]\ntotal-cycles = 100\nthreep-start = 53\nthreep-length = 48\n",
/// )
/// .unwrap();
/// ConfigValidator::validate(&config).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first field that fails.
    pub fn validate(config: &Configuration) -> Result<()> {
        Self::validate_read_format(config)?;

        if config.options.threads < 1 {
            return Err(Error::Validation {
                field: "options.threads".into(),
                message: format!("must be at least 1, got {}", config.options.threads),
            });
        }

        if config.buffers.read_buffer_entry_count <= 0 {
            return Err(Error::Validation {
                field: "options.read-buffer-size".into(),
                message: format!(
                    "{} bytes leave no room for read entries; increase read-buffer-size or reduce threads",
                    config.options.read_buffer_size
                ),
            });
        }

        Self::validate_samples(config)
    }

    fn validate_read_format(config: &Configuration) -> Result<()> {
        let format = &config.read_format;

        let required = [
            ("read_format.total-cycles", format.total_cycles),
            ("read_format.threep-start", format.threep_start),
            ("read_format.threep-length", format.threep_length),
        ];
        for (field, value) in required {
            if value.is_none() {
                return Err(Error::Validation {
                    field: field.into(),
                    message: "is required".into(),
                });
            }
        }

        if format.index_length < 0 {
            return Err(Error::Validation {
                field: "read_format.index-length".into(),
                message: format!("cannot be negative, got {}", format.index_length),
            });
        }

        let starts = [
            ("read_format.fivep-start", format.fivep_start),
            ("read_format.index-start", format.index_start),
            ("read_format.threep-start", format.threep_start),
        ];
        for (field, start) in starts {
            Self::validate_start(field, start.unwrap_or(0))?;
        }
        Self::validate_start("balancer.start", config.balancer.start)?;
        Self::validate_start("control.phix-match-start", config.control.first_cycle)?;

        let threep_start = i64::from(format.threep_start.unwrap_or(0));
        let threep_length = i64::from(format.threep_length.unwrap_or(0));
        let total_cycles = i64::from(format.total_cycles.unwrap_or(0));
        if threep_start + threep_length > total_cycles {
            return Err(Error::Validation {
                field: "read_format.threep-length".into(),
                message: format!(
                    "three-prime read ends at cycle {} but the run has {total_cycles} cycles",
                    threep_start + threep_length
                ),
            });
        }

        Ok(())
    }

    /// Offsets are stored zero-based, so a one-based input of 0 shows up
    /// as -1 here.
    fn validate_start(field: &str, offset: i32) -> Result<()> {
        if offset < 0 {
            return Err(Error::Validation {
                field: field.into(),
                message: format!("positions start at 1, got {}", offset.saturating_add(1)),
            });
        }
        Ok(())
    }

    fn validate_samples(config: &Configuration) -> Result<()> {
        let mut seen = HashSet::new();
        for sample in &config.samples {
            if !seen.insert(sample.name()) {
                return Err(Error::Validation {
                    field: format!("sample:{}", sample.name()),
                    message: "sample name is used more than once".into(),
                });
            }
        }

        let control = config.control.name.as_deref();
        let synthesized = |name: &str| name == UNKNOWN_SAMPLE_NAME || Some(name) == control;
        for sample in config.samples.iter().filter(|s| !synthesized(s.name())) {
            if sample.info.index.is_none() {
                return Err(Error::Validation {
                    field: format!("sample:{}.index", sample.name()),
                    message: "every sample needs an index sequence".into(),
                });
            }
            for (ordinal, umi) in sample.info.umi.iter().enumerate() {
                if umi.length > 0 && umi.start < 0 {
                    return Err(Error::Validation {
                        field: format!("sample:{}.umi-start:{}", sample.name(), ordinal + 1),
                        message: "positions start at 1".into(),
                    });
                }
            }
        }

        Ok(())
    }
}
