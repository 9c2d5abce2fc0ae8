//! Entry dispatcher.
//!
//! Picks the handler for a section name. Section names are compared without
//! regard to ASCII case; `sample:<name>` sections carry the sample name,
//! which keeps its case.

use std::fmt;

use crate::config::handlers::{
    self, KeySpec, BALANCER_KEYS, CONTROL_KEYS, FINDER_KEYS, OPTIONS_KEYS, OUTPUT_KEYS,
    READ_FORMAT_KEYS, RULER_KEYS, SEEDER_KEYS, SOURCE_KEYS,
};
use crate::config::registry::SampleRegistry;
use crate::config::schema::Configuration;
use crate::config::values::starts_with_ignore_case;
use crate::error::{Error, Result};

const SAMPLE_SECTION_PREFIX: &str = "sample:";

/// A recognized configuration section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section<'a> {
    /// `[source]`
    Source,
    /// `[read_format]`
    ReadFormat,
    /// `[options]`
    Options,
    /// `[output]`
    Output,
    /// `[alternative_calls]`
    AlternativeCalls,
    /// `[control]`
    Control,
    /// `[balancer]`
    Balancer,
    /// `[polyA_seeder]`
    PolyASeeder,
    /// `[polyA_finder]`
    PolyAFinder,
    /// `[polyA_ruler]`
    PolyARuler,
    /// `[sample:<name>]`
    Sample(&'a str),
}

const FIXED_SECTIONS: [(&str, Section<'static>); 10] = [
    ("source", Section::Source),
    ("read_format", Section::ReadFormat),
    ("options", Section::Options),
    ("output", Section::Output),
    ("alternative_calls", Section::AlternativeCalls),
    ("control", Section::Control),
    ("balancer", Section::Balancer),
    ("polyA_seeder", Section::PolyASeeder),
    ("polyA_finder", Section::PolyAFinder),
    ("polyA_ruler", Section::PolyARuler),
];

impl<'a> Section<'a> {
    /// Recognizes a section name.
    ///
    /// # Examples
    ///
    /// ```
    /// use tailseeker::config::dispatch::Section;
    ///
    /// assert_eq!(Section::parse("POLYA_RULER"), Some(Section::PolyARuler));
    /// assert_eq!(Section::parse("Sample:HeLa-1"), Some(Section::Sample("HeLa-1")));
    /// assert_eq!(Section::parse("samples"), None);
    /// ```
    #[must_use]
    pub fn parse(name: &'a str) -> Option<Self> {
        if starts_with_ignore_case(name, SAMPLE_SECTION_PREFIX) {
            return Some(Self::Sample(&name[SAMPLE_SECTION_PREFIX.len()..]));
        }
        FIXED_SECTIONS
            .iter()
            .find(|(fixed, _)| fixed.eq_ignore_ascii_case(name))
            .map(|&(_, section)| section)
    }
}

impl fmt::Display for Section<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sample(name) => write!(f, "{SAMPLE_SECTION_PREFIX}{name}"),
            fixed => {
                let name = FIXED_SECTIONS
                    .iter()
                    .find(|(_, section)| section == fixed)
                    .map_or("?", |&(name, _)| name);
                f.write_str(name)
            }
        }
    }
}

/// Routes one entry to its section handler.
///
/// # Errors
///
/// Fails on an unknown section or key, or on a value its handler rejects.
pub fn feed_entry(
    config: &mut Configuration,
    samples: &mut SampleRegistry,
    section: &str,
    key: &str,
    value: &str,
) -> Result<()> {
    let parsed = Section::parse(section).ok_or_else(|| Error::UnknownSection {
        section: section.to_string(),
    })?;

    let table: &[KeySpec<Configuration>] = match parsed {
        Section::AlternativeCalls => {
            return handlers::feed_alternative_call(config, key, value);
        }
        Section::Sample(name) => {
            let sample = samples.get_or_insert(name);
            return handlers::feed_sample(sample, section, key, value);
        }
        Section::Source => SOURCE_KEYS,
        Section::ReadFormat => READ_FORMAT_KEYS,
        Section::Options => OPTIONS_KEYS,
        Section::Output => OUTPUT_KEYS,
        Section::Control => CONTROL_KEYS,
        Section::Balancer => BALANCER_KEYS,
        Section::PolyASeeder => SEEDER_KEYS,
        Section::PolyAFinder => FINDER_KEYS,
        Section::PolyARuler => RULER_KEYS,
    };
    handlers::apply(table, config, section, key, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(section: &str, key: &str, value: &str) -> Result<(Configuration, SampleRegistry)> {
        let mut config = Configuration::default();
        let mut samples = SampleRegistry::new();
        feed_entry(&mut config, &mut samples, section, key, value)?;
        Ok((config, samples))
    }

    #[test]
    fn test_section_names_ignore_case() {
        assert_eq!(Section::parse("Read_Format"), Some(Section::ReadFormat));
        assert_eq!(Section::parse("polya_finder"), Some(Section::PolyAFinder));
        assert_eq!(Section::parse("OPTIONS"), Some(Section::Options));
        assert_eq!(Section::parse("read-format"), None);
        assert_eq!(Section::parse(""), None);
    }

    #[test]
    fn test_sample_prefix_keeps_name_case() {
        assert_eq!(Section::parse("SAMPLE:MixedCase"), Some(Section::Sample("MixedCase")));
        assert_eq!(Section::parse("sample:"), Some(Section::Sample("")));
        assert_eq!(Section::parse("sample"), None);
    }

    #[test]
    fn test_section_display() {
        assert_eq!(Section::PolyASeeder.to_string(), "polyA_seeder");
        assert_eq!(Section::Sample("A").to_string(), "sample:A");
    }

    #[test]
    fn test_routes_fixed_sections() {
        let (config, _) = feed("options", "threads", "8").unwrap();
        assert_eq!(config.options.threads, 8);

        let (config, _) = feed("polyA_ruler", "maximum-dark-cycles", "7").unwrap();
        assert_eq!(config.ruler.max_dark_cycles, 7);
    }

    #[test]
    fn test_routes_alternative_calls() {
        let (config, _) = feed("alternative_calls", "41", "alt.calls").unwrap();
        assert_eq!(config.alternative_calls.len(), 1);
        assert_eq!(config.alternative_calls[0].first_cycle, 40);
    }

    #[test]
    fn test_routes_samples() {
        let (_, samples) = feed("sample:HeLa", "index", "ACAGTG").unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples.get("HeLa").unwrap().index.as_deref(), Some("ACAGTG"));
    }

    #[test]
    fn test_unknown_section() {
        let err = feed("bogus", "threads", "1").unwrap_err();
        assert!(matches!(err, Error::UnknownSection { ref section } if section == "bogus"));
    }

    #[test]
    fn test_unknown_key_in_sample_names_section() {
        let err = feed("sample:A", "colour", "blue").unwrap_err();
        match err {
            Error::UnknownKey { section, key } => {
                assert_eq!(section, "sample:A");
                assert_eq!(key, "colour");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
