#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # tailseeker
//!
//! Configuration resolution for tailseeker poly(A) tail-length runs.
//!
//! A run is described by one INI file: read geometry, output paths, sample
//! barcodes and UMIs, and the tuning knobs of the balancer and the polyA
//! seeder, finder and ruler. This library turns that file into a single
//! validated [`Configuration`] that the demultiplexer, the output writers and
//! the polyA stages read from.
//!
//! ## Core Types
//!
//! - [`Configuration`]: the resolved run description
//! - [`ConfigBuilder`]: feeds entries one at a time and builds the result
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use tailseeker::resolve_str;
//!
//! let config = resolve_str(
//!     "[read_format]\ntotal-cycles = 100\nthreep-start = 53\nthreep-length = 48\n",
//! )
//! .unwrap();
//!
//! assert_eq!(config.read_format.threep_start, Some(52));
//! assert_eq!(config.read_format.threep_seqqual_output_length, 48);
//! assert_eq!(config.balancer.min_bases_passes, 14);
//! ```

pub mod config;
pub mod error;
pub mod logging;

// Re-export key types at crate root for convenience
pub use config::{resolve, resolve_str, ConfigBuilder, Configuration, Sample, SampleInfo};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
