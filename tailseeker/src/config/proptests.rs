//! Property-based tests for configuration resolution.

use super::derive::compute_derived_values;
use super::dispatch::feed_entry;
use super::registry::SampleRegistry;
use super::resolve_str;
use super::schema::Configuration;
use proptest::prelude::*;

fn fed(entries: &[(&str, &str, String)]) -> (Configuration, SampleRegistry) {
    let mut config = Configuration::default();
    let mut registry = SampleRegistry::new();
    for (section, key, value) in entries {
        feed_entry(&mut config, &mut registry, section, key, value).unwrap();
    }
    (config, registry)
}

fn config_text(threads: i32, threep_length: i32, samples: &[String]) -> String {
    let mut text = format!(
        "[read_format]\ntotal-cycles = 251\nfivep-start = 1\nfivep-length = 25\n\
         threep-start = 33\nthreep-length = {threep_length}\n\n\
         [options]\nthreads = {threads}\n"
    );
    for name in samples {
        text.push_str(&format!("\n[sample:{name}]\nindex = ACAGTG\ndelimiter-seq = GTCAG\n"));
    }
    text
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    // Every one-based position key is stored as an offset one lower
    #[test]
    fn start_keys_are_stored_zero_based(v in 1i32..100_000) {
        let value = v.to_string();
        let (config, registry) = fed(&[
            ("read_format", "fivep-start", value.clone()),
            ("read_format", "index-start", value.clone()),
            ("read_format", "threep-start", value.clone()),
            ("balancer", "start", value.clone()),
            ("control", "phix-match-start", value.clone()),
            ("sample:A", "delimiter-start", value.clone()),
            ("sample:A", "fingerprint-start", value.clone()),
            ("sample:A", "umi-start:1", value),
        ]);

        prop_assert_eq!(config.read_format.fivep_start, Some(v - 1));
        prop_assert_eq!(config.read_format.index_start, Some(v - 1));
        prop_assert_eq!(config.read_format.threep_start, Some(v - 1));
        prop_assert_eq!(config.balancer.start, v - 1);
        prop_assert_eq!(config.control.first_cycle, v - 1);
        let sample = registry.get("A").unwrap();
        prop_assert_eq!(sample.delimiter_pos, v - 1);
        prop_assert_eq!(sample.fingerprint_pos, v - 1);
        prop_assert_eq!(sample.umi.get(1).unwrap().start, v - 1);
    }

    // More workers leave less room for read entries, never more
    #[test]
    fn more_threads_never_grow_read_buffer(
        threads in 1i32..64,
        extra in 0i32..64,
        read_buffer_size in 0i64..(1i64 << 34),
        samples in 0usize..8,
    ) {
        let entry_count = |threads: i32| {
            let (mut config, mut registry) = fed(&[
                ("read_format", "total-cycles", "251".to_string()),
                ("read_format", "fivep-length", "25".to_string()),
                ("read_format", "threep-start", "33".to_string()),
                ("read_format", "threep-length", "219".to_string()),
            ]);
            config.options.threads = threads;
            config.options.read_buffer_size = read_buffer_size;
            for i in 0..samples {
                registry.get_or_insert(&format!("S{i}"));
            }
            compute_derived_values(config, registry).buffers.read_buffer_entry_count
        };

        prop_assert!(entry_count(threads + extra) <= entry_count(threads));
    }

    // Skipped UMI ordinals are zero-filled and the table spans the largest one
    #[test]
    fn umi_table_spans_largest_ordinal(ordinal in 1usize..64, start in 1i32..200, length in 0i32..20) {
        let mut config = Configuration::default();
        let mut registry = SampleRegistry::new();
        let start_key = format!("umi-start:{ordinal}");
        let length_key = format!("umi-length:{ordinal}");
        feed_entry(&mut config, &mut registry, "sample:A", &start_key, &start.to_string()).unwrap();
        feed_entry(&mut config, &mut registry, "sample:A", &length_key, &length.to_string()).unwrap();

        let umi = &registry.get("A").unwrap().umi;
        prop_assert_eq!(umi.len(), ordinal);
        for gap in 1..ordinal {
            prop_assert_eq!(umi.get(gap).unwrap().length, 0);
        }
        prop_assert_eq!(umi.get(ordinal).unwrap().start, start - 1);
        prop_assert_eq!(umi.get(ordinal).unwrap().length, length);
    }

    // Resolving the same text twice gives the same configuration
    #[test]
    fn resolution_is_deterministic(
        threads in 1i32..16,
        threep_length in 1i32..218,
        samples in prop::collection::hash_set("[A-Za-z][A-Za-z0-9]{0,8}", 0..6),
    ) {
        let samples: Vec<String> = samples
            .into_iter()
            .filter(|name| name != "Unknown")
            .collect();
        let text = config_text(threads, threep_length, &samples);

        let first = resolve_str(&text).unwrap();
        let second = resolve_str(&text).unwrap();
        prop_assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
        prop_assert_eq!(&first.ruler.t_intensity_scores, &second.ruler.t_intensity_scores);
        prop_assert_eq!(first.num_samples(), samples.len() + 1);
    }
}
