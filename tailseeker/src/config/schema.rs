//! Resolved configuration structures.
//!
//! [`Configuration`] is the root aggregate handed to the read-processing
//! pipeline. It owns every sample, every UMI interval table and the list of
//! alternative base-call sources. All `*_start` / `*_pos` / `first_cycle`
//! fields hold zero-based cycle offsets; the one-based values written in the
//! configuration file are translated once, when the entry is ingested.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;

use crate::config::registry::UmiTable;

/// Default number of worker threads.
pub const DEFAULT_THREADS: i32 = 1;

/// Default length of the index read.
pub const DEFAULT_INDEX_LENGTH: i32 = 6;

/// Default read buffer budget in bytes (512 MiB).
pub const DEFAULT_READ_BUFFER_SIZE: i64 = 536_870_912;

/// Default number of three-prime cycles written to the seqqual output.
pub const DEFAULT_THREEP_SEQQUAL_OUTPUT_LENGTH: i32 = 250;

/// Longest cluster identifier the seqqual writer emits.
pub const MAX_CLUSTERID_LEN: i64 = 64;

/// Number of clusters handed to a worker in one job.
pub const NUM_CLUSTERS_PER_JOB: i64 = 1000;

/// Name of the fallback sample that collects unassigned reads.
pub const UNKNOWN_SAMPLE_NAME: &str = "Unknown";

/// Base used to build the accept-all index of synthesized samples.
pub const WILDCARD_BASE: char = 'X';

/// The fully resolved configuration of a tailseeker run.
///
/// Instances are produced by [`crate::config::resolve`] or
/// [`crate::config::ConfigBuilder::build`]; a `Default` value holds only
/// the built-in defaults and has no samples.
#[derive(Debug, Default, Serialize)]
pub struct Configuration {
    /// `[source]` settings.
    pub source: SourceInfo,
    /// `[read_format]` geometry.
    pub read_format: ReadFormat,
    /// `[options]` knobs.
    pub options: RunOptions,
    /// `[output]` destinations.
    pub output: OutputPaths,
    /// `[alternative_calls]` entries, most recently declared first.
    pub alternative_calls: Vec<AlternativeCall>,
    /// `[control]` descriptor.
    pub control: ControlInfo,
    /// `[balancer]` parameters.
    pub balancer: BalancerParams,
    /// `[polyA_seeder]` parameters.
    pub seeder: SeederParams,
    /// `[polyA_finder]` parameters.
    pub finder: FinderParams,
    /// `[polyA_ruler]` parameters.
    pub ruler: RulerParams,
    /// Samples in ordinal order: `Unknown`, the control (if any), then user
    /// samples in reverse declaration order.
    pub samples: Vec<Sample>,
    /// Write and read buffer sizing derived from the settings above.
    pub buffers: BufferBudget,
}

impl Configuration {
    /// Number of samples, including the synthesized ones.
    #[must_use]
    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    /// Looks up a sample by its exact name.
    #[must_use]
    pub fn sample(&self, name: &str) -> Option<&Sample> {
        self.samples.iter().find(|s| s.info.name == name)
    }

    /// Looks up a sample by its exact name for attaching output streams.
    pub fn sample_mut(&mut self, name: &str) -> Option<&mut Sample> {
        self.samples.iter_mut().find(|s| s.info.name == name)
    }

    /// Releases the configuration and everything it owns.
    ///
    /// Every sample must have had its output stream detached first. Tearing
    /// down while a stream is still attached means a writer may still be
    /// using the sample, which is unrecoverable; the process is aborted.
    pub fn teardown(self) {
        if let Some(sample) = self.samples.iter().find(|s| s.has_open_stream()) {
            log::error!(
                "configuration torn down while sample \"{}\" still has an open output stream",
                sample.info.name
            );
            std::process::abort();
        }

        log::debug!("releasing configuration with {} samples", self.samples.len());
        drop(self);
    }
}

/// Location of the run being imported.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceInfo {
    /// Instrument output directory.
    pub data_dir: Option<PathBuf>,
    /// Flowcell lane identifier.
    pub lane_id: Option<String>,
    /// Lane number.
    pub lane: Option<i32>,
    /// Tile number.
    pub tile: Option<i32>,
    /// Colour matrix used for three-prime intensities.
    pub threep_colormatrix: Option<PathBuf>,
}

/// Read layout. Starts are zero-based cycle offsets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadFormat {
    /// Total number of sequencing cycles.
    pub total_cycles: Option<i32>,
    /// First cycle of the five-prime read.
    pub fivep_start: Option<i32>,
    /// Length of the five-prime read.
    pub fivep_length: Option<i32>,
    /// First cycle of the index read.
    pub index_start: Option<i32>,
    /// Length of the index read.
    pub index_length: i32,
    /// First cycle of the three-prime read.
    pub threep_start: Option<i32>,
    /// Length of the three-prime read.
    pub threep_length: Option<i32>,
    /// Three-prime cycles written to the seqqual output; never longer than
    /// the three-prime read once resolved.
    pub threep_seqqual_output_length: i32,
}

impl Default for ReadFormat {
    fn default() -> Self {
        Self {
            total_cycles: None,
            fivep_start: None,
            fivep_length: None,
            index_start: None,
            index_length: DEFAULT_INDEX_LENGTH,
            threep_start: None,
            threep_length: None,
            threep_seqqual_output_length: DEFAULT_THREEP_SEQQUAL_OUTPUT_LENGTH,
        }
    }
}

/// Operational knobs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOptions {
    /// Keep reads in which no delimiter was found.
    pub keep_no_delimiter: bool,
    /// Keep reads whose balancer region failed the quality filter.
    pub keep_low_quality_balancer: bool,
    /// Worker threads.
    pub threads: i32,
    /// Memory budget for the read buffer, in bytes.
    pub read_buffer_size: i64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            keep_no_delimiter: false,
            keep_low_quality_balancer: false,
            threads: DEFAULT_THREADS,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

/// Output destinations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputPaths {
    /// Sequence and quality records.
    pub seqqual: Option<PathBuf>,
    /// Tag information records.
    pub taginfo: Option<PathBuf>,
    /// Raw signal dumps.
    pub signal: Option<PathBuf>,
    /// Signal distributions.
    pub signal_dists: Option<PathBuf>,
    /// Per-sample statistics.
    pub stats: Option<PathBuf>,
    /// Tail length distributions.
    pub length_dists: Option<PathBuf>,
}

/// An alternative base-call source covering cycles from `first_cycle` on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlternativeCall {
    /// Zero-based first cycle taken from this source.
    pub first_cycle: i32,
    /// Path to the alternative calls.
    pub path: PathBuf,
}

/// Spike-in control (PhiX) descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ControlInfo {
    /// Name under which control reads are reported; no control sample is
    /// synthesized when unset.
    pub name: Option<String>,
    /// Zero-based first cycle matched against the control sequence.
    pub first_cycle: i32,
    /// Number of cycles matched against the control sequence.
    pub read_length: i32,
    /// Ordinal of the synthesized control sample.
    pub sample_ordinal: Option<usize>,
}

/// Balancer window and quality filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalancerParams {
    /// Zero-based first cycle of the window.
    pub start: i32,
    /// Window length.
    pub length: i32,
    /// One past the last cycle of the window (derived).
    pub end: i32,
    /// Minimum occurrence of a base in the window.
    pub minimum_occurrence: i32,
    /// Positive samples drawn per cluster.
    pub num_positive_samples: i32,
    /// Negative samples drawn per cluster.
    pub num_negative_samples: i32,
    /// Minimum base quality counted as passing.
    pub min_quality: i32,
    /// Fraction of window bases that must pass.
    pub min_fraction_passes: f32,
    /// Number of window bases that must pass (derived).
    pub min_bases_passes: i32,
}

impl Default for BalancerParams {
    fn default() -> Self {
        Self {
            start: 0,
            length: 20,
            end: 0,
            minimum_occurrence: 2,
            num_positive_samples: 2,
            num_negative_samples: 4,
            min_quality: 25,
            min_fraction_passes: 0.70,
            min_bases_passes: 0,
        }
    }
}

/// Parameters of the poly(A) seeder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct SeederParams {
    pub seed_trigger_polya_length: i32,
    pub negative_sample_polya_length: i32,
    pub max_cctr_scan_left_space: i32,
    pub max_cctr_scan_right_space: i32,
    pub required_cdf_contrast: f32,
    pub polya_boundary_pos: i32,
    pub polya_sampling_gap: i32,
    pub dist_sampling_bins: i32,
    pub fair_sampling_fingerprint_length: i32,
    pub fair_sampling_hash_space_size: i32,
    pub fair_sampling_max_count: i32,
}

impl Default for SeederParams {
    fn default() -> Self {
        Self {
            seed_trigger_polya_length: 10,
            negative_sample_polya_length: 0,
            max_cctr_scan_left_space: 20,
            max_cctr_scan_right_space: 20,
            required_cdf_contrast: 0.35,
            polya_boundary_pos: 120,
            polya_sampling_gap: 3,
            dist_sampling_bins: 1000,
            fair_sampling_fingerprint_length: 30,
            fair_sampling_hash_space_size: 1_048_576,
            fair_sampling_max_count: 5,
        }
    }
}

/// Per-base scores used by the poly(A) finder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct BaseWeights {
    pub t: i32,
    pub a: i32,
    pub c: i32,
    pub g: i32,
    pub n: i32,
}

impl BaseWeights {
    /// Weight of a base call; anything outside `ACGT` scores as `N`.
    #[must_use]
    pub fn weight(&self, base: u8) -> i32 {
        match base.to_ascii_uppercase() {
            b'T' => self.t,
            b'A' => self.a,
            b'C' => self.c,
            b'G' => self.g,
            _ => self.n,
        }
    }
}

/// Parameters of the poly(A) finder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinderParams {
    /// Scores inside a poly(A) stretch.
    pub weights_polya: BaseWeights,
    /// Scores outside a poly(A) stretch.
    pub weights_non_a: BaseWeights,
    /// Shortest tail reported.
    pub min_polya_length: i32,
    /// Non-A bases tolerated at the tail end.
    pub max_terminal_modifications: i32,
    /// Tail length from which signal analysis takes over.
    pub sigproc_trigger_polya_length: i32,
}

impl Default for FinderParams {
    fn default() -> Self {
        Self {
            weights_polya: BaseWeights {
                t: 2,
                a: -9,
                c: -9,
                g: -9,
                n: -1,
            },
            weights_non_a: BaseWeights {
                t: -1,
                a: 0,
                c: -4,
                g: -4,
                n: 0,
            },
            min_polya_length: 5,
            max_terminal_modifications: 20,
            sigproc_trigger_polya_length: 10,
        }
    }
}

/// Parameters of the signal-based poly(A) ruler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RulerParams {
    /// Intensity below which a cycle counts as dark.
    pub dark_cycles_threshold: f32,
    /// Dark cycles tolerated before measurement stops.
    pub max_dark_cycles: i32,
    /// Gain of the T intensity logistic.
    pub t_intensity_k: f32,
    /// Centre of the T intensity logistic.
    pub t_intensity_center: f32,
    /// T intensity scores by intensity bin (derived).
    #[serde(skip)]
    pub t_intensity_scores: Vec<f32>,
}

impl Default for RulerParams {
    fn default() -> Self {
        Self {
            dark_cycles_threshold: 10.0,
            max_dark_cycles: 5,
            t_intensity_k: 20.0,
            t_intensity_center: 0.75,
            t_intensity_scores: Vec::new(),
        }
    }
}

/// Buffer sizing derived from the run geometry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BufferBudget {
    /// Worst-case bytes of seqqual output per cluster.
    pub max_bufsize_seqqual: i64,
    /// Worst-case bytes of taginfo output per cluster.
    pub max_bufsize_taginfo: i64,
    /// Raw reads that fit in the read buffer next to the write buffers.
    pub read_buffer_entry_count: i64,
}

/// Demultiplexing settings of one sample as written in `[sample:<name>]`,
/// plus the per-sample values derived from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SampleInfo {
    /// Unique sample name.
    pub name: String,
    /// Index sequence.
    pub index: Option<String>,
    /// Mismatches allowed against the index.
    pub max_index_mismatches: i32,
    /// Delimiter sequence.
    pub delimiter: Option<String>,
    /// Zero-based delimiter position; absolute once resolved.
    pub delimiter_pos: i32,
    /// Length of the delimiter sequence (derived).
    pub delimiter_length: i32,
    /// Mismatches allowed against the delimiter.
    pub max_delimiter_mismatches: i32,
    /// Fingerprint sequence.
    pub fingerprint: Option<String>,
    /// Zero-based fingerprint position.
    pub fingerprint_pos: i32,
    /// Length of the fingerprint sequence (derived).
    pub fingerprint_length: i32,
    /// Mismatches allowed against the fingerprint.
    pub max_fingerprint_mismatches: i32,
    /// Maximum three-prime cycles processed; zero means no limit.
    pub limit_threep_processing: i32,
    /// UMI intervals by one-based ordinal.
    pub umi: UmiTable,
    /// Combined length of all UMI intervals (derived).
    pub umi_total_length: i32,
    /// Three-prime cycles dumped for signal analysis (derived).
    pub signal_dump_length: i32,
}

impl SampleInfo {
    /// A fresh sample with nothing but a name.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// A synthesized sample that accepts any index of `index_length` bases.
    #[must_use]
    pub fn wildcard(name: &str, index_length: i32) -> Self {
        let width = usize::try_from(index_length).unwrap_or(0);
        Self {
            name: name.to_string(),
            index: Some(std::iter::repeat(WILDCARD_BASE).take(width).collect()),
            max_index_mismatches: index_length,
            delimiter: Some(String::new()),
            delimiter_pos: -1,
            max_delimiter_mismatches: -1,
            fingerprint: Some(String::new()),
            ..Default::default()
        }
    }
}

/// Locks the downstream pipeline takes on a sample. The resolver only
/// creates them.
#[derive(Debug, Default)]
pub struct SampleLocks {
    /// Serializes writes to the sample's signal output.
    pub signal_writer: Mutex<()>,
    /// Serializes updates to the sample's statistics.
    pub stats: Mutex<()>,
}

/// A writer attached to a sample by the output subsystem.
pub struct OutputStream(Box<dyn Write + Send>);

impl fmt::Debug for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OutputStream")
    }
}

/// A resolved sample with its ordinal and synchronization handles.
#[derive(Debug, Serialize)]
pub struct Sample {
    /// Dense zero-based position in [`Configuration::samples`].
    pub ordinal: usize,
    /// Settings and derived values.
    #[serde(flatten)]
    pub info: SampleInfo,
    #[serde(skip)]
    locks: SampleLocks,
    #[serde(skip)]
    seqqual_stream: Option<OutputStream>,
}

impl Sample {
    pub(crate) fn new(ordinal: usize, info: SampleInfo) -> Self {
        Self {
            ordinal,
            info,
            locks: SampleLocks::default(),
            seqqual_stream: None,
        }
    }

    /// Sample name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Lock guarding the sample's signal writer.
    #[must_use]
    pub fn signal_writer_lock(&self) -> &Mutex<()> {
        &self.locks.signal_writer
    }

    /// Lock guarding the sample's statistics.
    #[must_use]
    pub fn stats_lock(&self) -> &Mutex<()> {
        &self.locks.stats
    }

    /// Attaches the seqqual output stream, returning any previous one.
    pub fn attach_seqqual_stream(
        &mut self,
        stream: Box<dyn Write + Send>,
    ) -> Option<Box<dyn Write + Send>> {
        self.seqqual_stream
            .replace(OutputStream(stream))
            .map(|OutputStream(old)| old)
    }

    /// Detaches the seqqual output stream so the caller can flush and close it.
    pub fn detach_seqqual_stream(&mut self) -> Option<Box<dyn Write + Send>> {
        self.seqqual_stream.take().map(|OutputStream(stream)| stream)
    }

    /// Whether an output stream is still attached.
    #[must_use]
    pub fn has_open_stream(&self) -> bool {
        self.seqqual_stream.is_some()
    }
}
