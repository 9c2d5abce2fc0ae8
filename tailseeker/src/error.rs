//! Error types for the tailseeker library.
//!
//! Every failure during configuration resolution is reported through a single
//! [`Error`] enum built with `thiserror`. Resolution is fail-fast: the first
//! error aborts the whole run and no partially resolved configuration is ever
//! handed back to the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a tailseeker error.
///
/// # Examples
///
/// ```
/// use tailseeker::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the tailseeker library.
#[derive(Debug, Error)]
pub enum Error {
    /// A section header that is not one of the recognized sections.
    #[error("unknown section [{section}] in the configuration")]
    UnknownSection {
        /// The section name as written in the file.
        section: String,
    },

    /// A key that is not recognized within an otherwise valid section.
    #[error("unknown key \"{key}\" in [{section}]")]
    UnknownKey {
        /// The section the key appeared in.
        section: String,
        /// The offending key.
        key: String,
    },

    /// A boolean option whose value is neither yes/no nor 1/0.
    #[error("\"{key}\" in [{section}] must be either yes or no (got \"{value}\")")]
    InvalidBooleanValue {
        /// The section the key appeared in.
        section: String,
        /// The boolean key.
        key: String,
        /// The rejected value.
        value: String,
    },

    /// A UMI key without a `:<n>` suffix, or with an ordinal below 1.
    #[error("invalid UMI ordinal in \"{key}\" of [{section}]: {reason}")]
    InvalidUmiOrdinal {
        /// The sample section the key appeared in.
        section: String,
        /// The offending key.
        key: String,
        /// Why the ordinal was rejected.
        reason: String,
    },

    /// An `[alternative_calls]` key that is not a positive cycle number.
    #[error("alternative call position \"{key}\" in [alternative_calls] is out of range")]
    InvalidAlternativeCallPosition {
        /// The offending key.
        key: String,
    },

    /// Growing a per-sample table failed to reserve memory.
    #[error("failed to allocate {what}: {details}")]
    AllocationFailure {
        /// What was being allocated.
        what: String,
        /// Details from the allocator.
        details: String,
    },

    /// A cross-field check failed after derived values were computed.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The configuration text could not be lexed.
    #[error("failed to parse {}:{line}: {message}", path.display())]
    Parse {
        /// The file being parsed.
        path: PathBuf,
        /// 1-based line number of the offending line.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if the error came out of the validator.
    ///
    /// # Examples
    ///
    /// ```
    /// use tailseeker::Error;
    ///
    /// let err = Error::Validation {
    ///     field: "options.threads".to_string(),
    ///     message: "must be at least 1".to_string(),
    /// };
    /// assert!(err.is_validation());
    /// ```
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if the error names an unrecognized section or key.
    #[must_use]
    pub fn is_unknown_entry(&self) -> bool {
        matches!(self, Self::UnknownSection { .. } | Self::UnknownKey { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_section_error() {
        let err = Error::UnknownSection {
            section: "bogus".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("unknown section"));
        assert!(display.contains("[bogus]"));
        assert!(err.is_unknown_entry());
    }

    #[test]
    fn test_unknown_key_names_section_and_key() {
        let err = Error::UnknownKey {
            section: "read_format".to_string(),
            key: "total-cycle".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("read_format"));
        assert!(display.contains("total-cycle"));
        assert!(err.is_unknown_entry());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_invalid_boolean_error() {
        let err = Error::InvalidBooleanValue {
            section: "options".to_string(),
            key: "keep-no-delimiter".to_string(),
            value: "maybe".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("keep-no-delimiter"));
        assert!(display.contains("yes or no"));
        assert!(display.contains("maybe"));
    }

    #[test]
    fn test_invalid_umi_ordinal_error() {
        let err = Error::InvalidUmiOrdinal {
            section: "sample:A".to_string(),
            key: "umi-start:0".to_string(),
            reason: "umi number must start from 1".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("sample:A"));
        assert!(display.contains("umi-start:0"));
    }

    #[test]
    fn test_validation_error() {
        let err = Error::Validation {
            field: "options.read-buffer-size".to_string(),
            message: "no room for read buffer entries".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("validation error"));
        assert!(display.contains("read-buffer-size"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_parse_error_mentions_line() {
        let err = Error::Parse {
            path: PathBuf::from("/tmp/tailseeker.conf"),
            line: 12,
            message: "expected '=' or ':'".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("tailseeker.conf:12"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        let display = format!("{err}");
        assert!(display.contains("I/O error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<u16> {
            Err(Error::InvalidAlternativeCallPosition {
                key: "0".to_string(),
            })
        }

        assert!(returns_result().is_err());
    }
}
