//! Derived-value pass.
//!
//! Runs once after every entry has been fed. The steps depend on each other
//! and run in a fixed order: balancer window, per-sample lengths, synthetic
//! samples, score table, ordinals, and finally the buffer budget, which
//! needs the final sample count.

use crate::config::registry::SampleRegistry;
use crate::config::schema::{
    Configuration, Sample, SampleInfo, MAX_CLUSTERID_LEN, NUM_CLUSTERS_PER_JOB,
    UNKNOWN_SAMPLE_NAME,
};
use crate::config::scores::precalc_t_intensity_scores;

/// Ordinal of the control sample, right after the fallback sample.
const CONTROL_SAMPLE_ORDINAL: usize = 1;

/// Completes `config` with every value derived from the fed entries and
/// moves the declared samples into it.
pub(crate) fn compute_derived_values(
    mut config: Configuration,
    mut registry: SampleRegistry,
) -> Configuration {
    derive_balancer_window(&mut config);
    let longest_umi = derive_sample_lengths(&config, &mut registry);

    let index_length = config.read_format.index_length;
    let threep_length = config.read_format.threep_length.unwrap_or(0);
    // Synthetic samples have no delimiter, so they dump the whole 3' read.
    let synthesize = |name: &str| {
        let mut info = SampleInfo::wildcard(name, index_length);
        info.signal_dump_length = threep_length;
        info
    };
    let fallback = synthesize(UNKNOWN_SAMPLE_NAME);
    let control = config
        .control
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .map(synthesize);
    let has_control = control.is_some();
    let ordered = registry.into_ordered(fallback, control);

    config.ruler.t_intensity_scores =
        precalc_t_intensity_scores(config.ruler.t_intensity_k, config.ruler.t_intensity_center);

    config.samples = ordered
        .into_iter()
        .enumerate()
        .map(|(ordinal, info)| Sample::new(ordinal, info))
        .collect();
    config.control.sample_ordinal = has_control.then_some(CONTROL_SAMPLE_ORDINAL);

    derive_buffer_budget(&mut config, longest_umi);

    log::debug!(
        "derived {} samples, read buffer holds {} entries",
        config.samples.len(),
        config.buffers.read_buffer_entry_count
    );
    config
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn derive_balancer_window(config: &mut Configuration) {
    let balancer = &mut config.balancer;
    balancer.end = balancer.start.saturating_add(balancer.length);
    balancer.min_bases_passes =
        (balancer.length as f32 * balancer.min_fraction_passes).floor() as i32;
}

fn text_length(text: Option<&str>) -> i32 {
    text.map_or(0, |t| i32::try_from(t.len()).unwrap_or(i32::MAX))
}

/// Fills in the per-sample lengths and returns the longest total UMI length.
fn derive_sample_lengths(config: &Configuration, registry: &mut SampleRegistry) -> i32 {
    let threep_start = config.read_format.threep_start.unwrap_or(0);
    let threep_length = config.read_format.threep_length.unwrap_or(0);
    let mut longest_umi = 0;

    for sample in registry.iter_mut() {
        sample.delimiter_length = text_length(sample.delimiter.as_deref());
        sample.fingerprint_length = text_length(sample.fingerprint.as_deref());

        let mut umi_total = 0i32;
        for umi in sample.umi.iter_mut().filter(|umi| umi.length > 0) {
            umi.end = umi.start.saturating_add(umi.length);
            umi_total = umi_total.saturating_add(umi.length);
        }
        sample.umi_total_length = umi_total;
        longest_umi = longest_umi.max(umi_total);

        let has_delimiter = sample.delimiter.is_some();
        let mut dump_length = if has_delimiter {
            let delimiter_end = sample.delimiter_pos.saturating_add(sample.delimiter_length);
            threep_length.saturating_sub(delimiter_end)
        } else {
            threep_length
        };
        if sample.limit_threep_processing > 0 {
            dump_length = dump_length.min(sample.limit_threep_processing);
        }
        sample.signal_dump_length = dump_length;

        if has_delimiter {
            sample.delimiter_pos = sample.delimiter_pos.saturating_add(threep_start);
        }
    }

    longest_umi
}

fn derive_buffer_budget(config: &mut Configuration, longest_umi: i32) {
    let format = &mut config.read_format;
    if let Some(threep_length) = format.threep_length {
        if format.threep_seqqual_output_length > threep_length {
            format.threep_seqqual_output_length = threep_length;
        }
    }

    let nsamples = i64::try_from(config.samples.len()).unwrap_or(i64::MAX);
    let fivep_length = i64::from(format.fivep_length.unwrap_or(0));
    let seqqual_output = i64::from(format.threep_seqqual_output_length);
    let total_cycles = i64::from(format.total_cycles.unwrap_or(0));
    let threep_length = i64::from(format.threep_length.unwrap_or(0));

    let budget = &mut config.buffers;
    budget.max_bufsize_seqqual =
        nsamples.saturating_mul(MAX_CLUSTERID_LEN + 2 * fivep_length + 2 * seqqual_output + 6);
    budget.max_bufsize_taginfo = nsamples.saturating_mul(
        5 + 30 + i64::from(config.finder.max_terminal_modifications) + i64::from(longest_umi),
    );

    let footprint_per_entry = 2 * total_cycles + 8 * threep_length;
    let write_footprint = i64::from(config.options.threads)
        .saturating_mul(NUM_CLUSTERS_PER_JOB)
        .saturating_mul(budget.max_bufsize_seqqual.saturating_add(budget.max_bufsize_taginfo));

    budget.read_buffer_entry_count = if footprint_per_entry > 0 {
        config.options.read_buffer_size.saturating_sub(write_footprint) / footprint_per_entry
    } else {
        0
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(total: i32, threep_start: i32, threep_length: i32) -> Configuration {
        let mut config = Configuration::default();
        config.read_format.total_cycles = Some(total);
        config.read_format.fivep_start = Some(0);
        config.read_format.fivep_length = Some(25);
        config.read_format.threep_start = Some(threep_start);
        config.read_format.threep_length = Some(threep_length);
        config
    }

    fn names(config: &Configuration) -> Vec<&str> {
        config.samples.iter().map(Sample::name).collect()
    }

    #[test]
    fn test_default_balancer_window() {
        let config = compute_derived_values(geometry(100, 52, 48), SampleRegistry::new());
        assert_eq!(config.balancer.end, 20);
        assert_eq!(config.balancer.min_bases_passes, 14);
    }

    #[test]
    fn test_seqqual_output_clamped_to_threep_length() {
        let config = compute_derived_values(geometry(100, 52, 48), SampleRegistry::new());
        assert_eq!(config.read_format.threep_seqqual_output_length, 48);
    }

    #[test]
    fn test_fallback_only() {
        let config = compute_derived_values(geometry(100, 52, 48), SampleRegistry::new());
        assert_eq!(names(&config), vec!["Unknown"]);
        let unknown = &config.samples[0];
        assert_eq!(unknown.ordinal, 0);
        assert_eq!(unknown.info.max_index_mismatches, 6);
        assert_eq!(unknown.info.signal_dump_length, 48);
        assert!(config.control.sample_ordinal.is_none());
    }

    #[test]
    fn test_sample_order_and_ordinals() {
        let mut config = geometry(100, 52, 48);
        config.control.name = Some("PhiX".to_string());
        let mut registry = SampleRegistry::new();
        registry.get_or_insert("A");
        registry.get_or_insert("B");

        let config = compute_derived_values(config, registry);
        assert_eq!(names(&config), vec!["Unknown", "PhiX", "B", "A"]);
        let ordinals: Vec<usize> = config.samples.iter().map(|s| s.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3]);
        assert_eq!(config.control.sample_ordinal, Some(1));
        assert_eq!(config.samples[1].info.index.as_deref(), Some("XXXXXX"));
    }

    #[test]
    fn test_delimiter_rebased_and_dump_length() {
        let mut registry = SampleRegistry::new();
        let sample = registry.get_or_insert("A");
        sample.delimiter = Some("GTCAG".to_string());
        sample.delimiter_pos = 13;
        sample.fingerprint = Some("ACGT".to_string());

        let config = compute_derived_values(geometry(100, 52, 48), registry);
        let a = config.sample("A").unwrap();
        assert_eq!(a.info.delimiter_length, 5);
        assert_eq!(a.info.fingerprint_length, 4);
        assert_eq!(a.info.delimiter_pos, 65);
        assert_eq!(a.info.signal_dump_length, 48 - 18);
    }

    #[test]
    fn test_dump_length_capped_by_limit() {
        let mut registry = SampleRegistry::new();
        registry.get_or_insert("A").limit_threep_processing = 10;
        registry.get_or_insert("B");

        let config = compute_derived_values(geometry(100, 52, 48), registry);
        assert_eq!(config.sample("A").unwrap().info.signal_dump_length, 10);
        assert_eq!(config.sample("B").unwrap().info.signal_dump_length, 48);
        assert_eq!(config.sample("B").unwrap().info.delimiter_pos, 0);
    }

    #[test]
    fn test_umi_totals() {
        let mut registry = SampleRegistry::new();
        let sample = registry.get_or_insert("A");
        let first = sample.umi.slot_mut(1).unwrap();
        first.start = 4;
        first.length = 4;
        sample.umi.slot_mut(3).unwrap().length = 3;

        let config = compute_derived_values(geometry(100, 52, 48), registry);
        let a = config.sample("A").unwrap();
        assert_eq!(a.info.umi_total_length, 7);
        assert_eq!(a.info.umi.get(1).unwrap().end, 8);
        assert_eq!(a.info.umi.get(2).unwrap().end, 0);
        assert_eq!(config.buffers.max_bufsize_taginfo, 2 * (35 + 20 + 7));
    }

    #[test]
    fn test_empty_control_name_adds_no_sample() {
        let mut config = geometry(100, 52, 48);
        config.control.name = Some(String::new());
        let mut registry = SampleRegistry::new();
        registry.get_or_insert("A");

        let config = compute_derived_values(config, registry);
        assert_eq!(names(&config), vec!["Unknown", "A"]);
        assert_eq!(config.sample("A").unwrap().ordinal, 1);
        assert!(config.control.sample_ordinal.is_none());
    }

    #[test]
    fn test_umi_slots_without_length_are_skipped() {
        let mut registry = SampleRegistry::new();
        let sample = registry.get_or_insert("A");
        sample.umi.slot_mut(1).unwrap().start = 9;
        sample.umi.slot_mut(2).unwrap().length = -3;

        let config = compute_derived_values(geometry(100, 52, 48), registry);
        let a = config.sample("A").unwrap();
        assert_eq!(a.info.umi.get(1).unwrap().end, 0);
        assert_eq!(a.info.umi.get(2).unwrap().end, 0);
        assert_eq!(a.info.umi_total_length, 0);
        assert_eq!(config.buffers.max_bufsize_taginfo, 2 * (35 + 20));
    }

    #[test]
    fn test_buffer_budget() {
        let mut registry = SampleRegistry::new();
        registry.get_or_insert("A");
        let config = compute_derived_values(geometry(100, 52, 48), registry);

        let seqqual = 2 * (64 + 2 * 25 + 2 * 48 + 6);
        let taginfo = 2 * (35 + 20);
        assert_eq!(config.buffers.max_bufsize_seqqual, seqqual);
        assert_eq!(config.buffers.max_bufsize_taginfo, taginfo);
        let footprint = 2 * 100 + 8 * 48;
        assert_eq!(
            config.buffers.read_buffer_entry_count,
            (536_870_912 - 1000 * (seqqual + taginfo)) / footprint
        );
    }

    #[test]
    fn test_zero_footprint_gives_zero_entries() {
        let config = compute_derived_values(Configuration::default(), SampleRegistry::new());
        assert_eq!(config.buffers.read_buffer_entry_count, 0);
    }

    #[test]
    fn test_score_table_filled() {
        let config = compute_derived_values(geometry(100, 52, 48), SampleRegistry::new());
        assert_eq!(config.ruler.t_intensity_scores.len(), 1025);
    }
}
