//! Section handlers.
//!
//! Each fixed section is a static table mapping a key name to a typed setter.
//! Key lookup ignores ASCII case. `-start` keys go through
//! `parse_one_based` so every stored start is zero-based.

use std::path::PathBuf;

use crate::config::registry::UmiTable;
use crate::config::schema::{AlternativeCall, Configuration, SampleInfo};
use crate::config::values::{
    parse_bool, parse_f32, parse_int, parse_long, parse_one_based, parse_percent,
    starts_with_ignore_case,
};
use crate::error::{Error, Result};

/// How a recognized key turns its value into a mutation.
pub(crate) enum Setter<T: 'static> {
    /// Takes the raw value and converts it itself.
    Value(fn(&mut T, &str)),
    /// Takes a yes/no flag.
    Flag(fn(&mut T, bool)),
}

/// One recognized key of a section.
pub(crate) struct KeySpec<T: 'static> {
    pub key: &'static str,
    pub setter: Setter<T>,
}

const fn value<T>(key: &'static str, set: fn(&mut T, &str)) -> KeySpec<T> {
    KeySpec {
        key,
        setter: Setter::Value(set),
    }
}

const fn flag<T>(key: &'static str, set: fn(&mut T, bool)) -> KeySpec<T> {
    KeySpec {
        key,
        setter: Setter::Flag(set),
    }
}

/// Looks `key` up in `table` and applies it to `target`.
pub(crate) fn apply<T>(
    table: &[KeySpec<T>],
    target: &mut T,
    section: &str,
    key: &str,
    raw: &str,
) -> Result<()> {
    let spec = table
        .iter()
        .find(|spec| spec.key.eq_ignore_ascii_case(key))
        .ok_or_else(|| Error::UnknownKey {
            section: section.to_string(),
            key: key.to_string(),
        })?;

    match spec.setter {
        Setter::Value(set) => set(target, raw),
        Setter::Flag(set) => {
            let flag = parse_bool(raw).ok_or_else(|| Error::InvalidBooleanValue {
                section: section.to_string(),
                key: key.to_string(),
                value: raw.to_string(),
            })?;
            set(target, flag);
        }
    }
    Ok(())
}

pub(crate) static SOURCE_KEYS: &[KeySpec<Configuration>] = &[
    value("data-dir", |c, v| c.source.data_dir = Some(PathBuf::from(v))),
    value("laneid", |c, v| c.source.lane_id = Some(v.to_string())),
    value("lane", |c, v| c.source.lane = Some(parse_int(v))),
    value("tile", |c, v| c.source.tile = Some(parse_int(v))),
    value("threep-colormatrix", |c, v| {
        c.source.threep_colormatrix = Some(PathBuf::from(v));
    }),
];

pub(crate) static READ_FORMAT_KEYS: &[KeySpec<Configuration>] = &[
    value("total-cycles", |c, v| {
        c.read_format.total_cycles = Some(parse_int(v));
    }),
    value("fivep-start", |c, v| {
        c.read_format.fivep_start = Some(parse_one_based(v));
    }),
    value("fivep-length", |c, v| {
        c.read_format.fivep_length = Some(parse_int(v));
    }),
    value("index-start", |c, v| {
        c.read_format.index_start = Some(parse_one_based(v));
    }),
    value("index-length", |c, v| c.read_format.index_length = parse_int(v)),
    value("threep-start", |c, v| {
        c.read_format.threep_start = Some(parse_one_based(v));
    }),
    value("threep-length", |c, v| {
        c.read_format.threep_length = Some(parse_int(v));
    }),
    value("threep-seqqual-output-length", |c, v| {
        c.read_format.threep_seqqual_output_length = parse_int(v);
    }),
];

pub(crate) static OPTIONS_KEYS: &[KeySpec<Configuration>] = &[
    flag("keep-no-delimiter", |c, f| c.options.keep_no_delimiter = f),
    flag("keep-low-quality-balancer", |c, f| {
        c.options.keep_low_quality_balancer = f;
    }),
    value("threads", |c, v| c.options.threads = parse_int(v)),
    value("read-buffer-size", |c, v| {
        c.options.read_buffer_size = parse_long(v);
    }),
];

pub(crate) static OUTPUT_KEYS: &[KeySpec<Configuration>] = &[
    value("seqqual", |c, v| c.output.seqqual = Some(PathBuf::from(v))),
    value("taginfo", |c, v| c.output.taginfo = Some(PathBuf::from(v))),
    value("signal", |c, v| c.output.signal = Some(PathBuf::from(v))),
    value("signal-dists", |c, v| {
        c.output.signal_dists = Some(PathBuf::from(v));
    }),
    value("stats", |c, v| c.output.stats = Some(PathBuf::from(v))),
    value("length-dists", |c, v| {
        c.output.length_dists = Some(PathBuf::from(v));
    }),
];

pub(crate) static CONTROL_KEYS: &[KeySpec<Configuration>] = &[
    value("phix-match-name", |c, v| c.control.name = Some(v.to_string())),
    value("phix-match-start", |c, v| {
        c.control.first_cycle = parse_one_based(v);
    }),
    value("phix-match-length", |c, v| c.control.read_length = parse_int(v)),
];

pub(crate) static BALANCER_KEYS: &[KeySpec<Configuration>] = &[
    value("start", |c, v| c.balancer.start = parse_one_based(v)),
    value("length", |c, v| c.balancer.length = parse_int(v)),
    value("minimum-occurrence", |c, v| {
        c.balancer.minimum_occurrence = parse_int(v);
    }),
    value("num-positive-samples", |c, v| {
        c.balancer.num_positive_samples = parse_int(v);
    }),
    value("num-negative-samples", |c, v| {
        c.balancer.num_negative_samples = parse_int(v);
    }),
    value("minimum-quality", |c, v| c.balancer.min_quality = parse_int(v)),
    value("minimum-qcpass-percent", |c, v| {
        c.balancer.min_fraction_passes = parse_percent(v);
    }),
];

pub(crate) static SEEDER_KEYS: &[KeySpec<Configuration>] = &[
    value("seed-trigger-polya-length", |c, v| {
        c.seeder.seed_trigger_polya_length = parse_int(v);
    }),
    value("negative-sample-polya-length", |c, v| {
        c.seeder.negative_sample_polya_length = parse_int(v);
    }),
    value("max-cctr-scan-left-space", |c, v| {
        c.seeder.max_cctr_scan_left_space = parse_int(v);
    }),
    value("max-cctr-scan-right-space", |c, v| {
        c.seeder.max_cctr_scan_right_space = parse_int(v);
    }),
    value("required-cdf-contrast", |c, v| {
        c.seeder.required_cdf_contrast = parse_f32(v);
    }),
    value("polya-boundary-pos", |c, v| {
        c.seeder.polya_boundary_pos = parse_int(v);
    }),
    value("polya-sampling-gap", |c, v| {
        c.seeder.polya_sampling_gap = parse_int(v);
    }),
    value("dist-sampling-bins", |c, v| {
        c.seeder.dist_sampling_bins = parse_int(v);
    }),
    value("fair-sampling-fingerprint-length", |c, v| {
        c.seeder.fair_sampling_fingerprint_length = parse_int(v);
    }),
    value("fair-sampling-hash-space-size", |c, v| {
        c.seeder.fair_sampling_hash_space_size = parse_int(v);
    }),
    value("fair-sampling-max-count", |c, v| {
        c.seeder.fair_sampling_max_count = parse_int(v);
    }),
];

pub(crate) static FINDER_KEYS: &[KeySpec<Configuration>] = &[
    value("polyA-weight-T", |c, v| c.finder.weights_polya.t = parse_int(v)),
    value("polyA-weight-A", |c, v| c.finder.weights_polya.a = parse_int(v)),
    value("polyA-weight-C", |c, v| c.finder.weights_polya.c = parse_int(v)),
    value("polyA-weight-G", |c, v| c.finder.weights_polya.g = parse_int(v)),
    value("polyA-weight-N", |c, v| c.finder.weights_polya.n = parse_int(v)),
    value("nonA-weight-T", |c, v| c.finder.weights_non_a.t = parse_int(v)),
    value("nonA-weight-A", |c, v| c.finder.weights_non_a.a = parse_int(v)),
    value("nonA-weight-C", |c, v| c.finder.weights_non_a.c = parse_int(v)),
    value("nonA-weight-G", |c, v| c.finder.weights_non_a.g = parse_int(v)),
    value("nonA-weight-N", |c, v| c.finder.weights_non_a.n = parse_int(v)),
    value("minimum-polya-length", |c, v| {
        c.finder.min_polya_length = parse_int(v);
    }),
    value("maximum-modifications", |c, v| {
        c.finder.max_terminal_modifications = parse_int(v);
    }),
    value("signal-analysis-trigger", |c, v| {
        c.finder.sigproc_trigger_polya_length = parse_int(v);
    }),
];

pub(crate) static RULER_KEYS: &[KeySpec<Configuration>] = &[
    value("dark-cycles-threshold", |c, v| {
        c.ruler.dark_cycles_threshold = parse_f32(v);
    }),
    value("maximum-dark-cycles", |c, v| {
        c.ruler.max_dark_cycles = parse_int(v);
    }),
    value("t-intensity-k", |c, v| c.ruler.t_intensity_k = parse_f32(v)),
    value("t-intensity-center", |c, v| {
        c.ruler.t_intensity_center = parse_f32(v);
    }),
];

pub(crate) static SAMPLE_KEYS: &[KeySpec<SampleInfo>] = &[
    value("index", |s, v| s.index = Some(v.to_string())),
    value("maximum-index-mismatch", |s, v| {
        s.max_index_mismatches = parse_int(v);
    }),
    value("delimiter-seq", |s, v| s.delimiter = Some(v.to_string())),
    value("delimiter-start", |s, v| s.delimiter_pos = parse_one_based(v)),
    value("maximum-delimiter-mismatch", |s, v| {
        s.max_delimiter_mismatches = parse_int(v);
    }),
    value("fingerprint-seq", |s, v| s.fingerprint = Some(v.to_string())),
    value("fingerprint-start", |s, v| {
        s.fingerprint_pos = parse_one_based(v);
    }),
    value("maximum-fingerprint-mismatch", |s, v| {
        s.max_fingerprint_mismatches = parse_int(v);
    }),
    value("limit-threep-processing", |s, v| {
        s.limit_threep_processing = parse_int(v);
    }),
];

/// Prefix shared by the composite `umi-<qualifier>:<n>` keys.
pub(crate) const UMI_KEY_PREFIX: &str = "umi-";

/// Handles an `[alternative_calls]` entry, whose key is a one-based cycle.
/// New entries go to the front of the list.
pub(crate) fn feed_alternative_call(config: &mut Configuration, key: &str, raw: &str) -> Result<()> {
    let first_cycle = parse_int(key);
    if first_cycle <= 0 {
        return Err(Error::InvalidAlternativeCallPosition {
            key: key.to_string(),
        });
    }

    config.alternative_calls.insert(
        0,
        AlternativeCall {
            first_cycle: first_cycle - 1,
            path: PathBuf::from(raw),
        },
    );
    Ok(())
}

/// Handles one `[sample:<name>]` entry against an already looked-up sample.
pub(crate) fn feed_sample(sample: &mut SampleInfo, section: &str, key: &str, raw: &str) -> Result<()> {
    if starts_with_ignore_case(key, UMI_KEY_PREFIX) {
        feed_umi(&mut sample.umi, section, key, raw)
    } else {
        apply(SAMPLE_KEYS, sample, section, key, raw)
    }
}

fn feed_umi(table: &mut UmiTable, section: &str, key: &str, raw: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidUmiOrdinal {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    };

    let (_, number) = key
        .rsplit_once(':')
        .ok_or_else(|| invalid("umi qualifiers must be followed by a number"))?;
    let ordinal = usize::try_from(parse_int(number))
        .ok()
        .filter(|&n| n >= 1)
        .ok_or_else(|| invalid("umi number must start from 1"))?;

    if starts_with_ignore_case(key, "umi-start:") {
        table.slot_mut(ordinal)?.start = parse_one_based(raw);
    } else if starts_with_ignore_case(key, "umi-length:") {
        table.slot_mut(ordinal)?.length = parse_int(raw);
    } else {
        return Err(Error::UnknownKey {
            section: section.to_string(),
            key: key.to_string(),
        });
    }
    Ok(())
}
