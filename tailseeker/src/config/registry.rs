//! Sample and UMI interval registry.
//!
//! Samples come into existence the first time any `[sample:<name>]` entry
//! mentions them, in whatever order the file lists them. Within a sample, UMI
//! intervals are addressed by a one-based ordinal and the table grows to the
//! largest ordinal seen so far; ordinals that were skipped are left as
//! zero-length placeholders.

use serde::Serialize;

use crate::config::schema::SampleInfo;
use crate::error::{Error, Result};

/// A half-open `[start, end)` cycle range of a UMI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UmiInterval {
    /// Zero-based first cycle.
    pub start: i32,
    /// Number of cycles.
    pub length: i32,
    /// One past the last cycle (derived).
    pub end: i32,
}

/// UMI intervals of one sample, indexed by one-based ordinal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UmiTable {
    intervals: Vec<UmiInterval>,
}

impl UmiTable {
    /// Number of slots, i.e. the largest ordinal referenced so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Whether no UMI has been referenced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Interval for a one-based ordinal.
    #[must_use]
    pub fn get(&self, ordinal: usize) -> Option<&UmiInterval> {
        ordinal.checked_sub(1).and_then(|i| self.intervals.get(i))
    }

    /// Iterates over all slots in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = &UmiInterval> {
        self.intervals.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut UmiInterval> {
        self.intervals.iter_mut()
    }

    /// Returns the slot for `ordinal` (one-based), growing the table first if
    /// needed. Existing slots keep their values; new ones are zeroed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if the table cannot grow.
    ///
    /// # Panics
    ///
    /// Panics if `ordinal` is zero; callers reject that earlier.
    pub(crate) fn slot_mut(&mut self, ordinal: usize) -> Result<&mut UmiInterval> {
        assert!(ordinal >= 1, "UMI ordinals are one-based");

        if self.intervals.len() < ordinal {
            let additional = ordinal - self.intervals.len();
            self.intervals
                .try_reserve_exact(additional)
                .map_err(|e| Error::AllocationFailure {
                    what: format!("{ordinal} UMI intervals"),
                    details: e.to_string(),
                })?;
            self.intervals.resize(ordinal, UmiInterval::default());
        }

        Ok(&mut self.intervals[ordinal - 1])
    }
}

/// Samples in declaration order, looked up by name.
///
/// Sample counts are in the tens, so lookup is a linear scan.
#[derive(Debug, Default)]
pub struct SampleRegistry {
    samples: Vec<SampleInfo>,
}

impl SampleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of declared samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no sample has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Finds a sample by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SampleInfo> {
        self.samples.iter().find(|s| s.name == name)
    }

    /// Returns the sample called `name`, creating it on first reference.
    pub fn get_or_insert(&mut self, name: &str) -> &mut SampleInfo {
        let position = match self.samples.iter().position(|s| s.name == name) {
            Some(position) => position,
            None => {
                log::debug!("registering sample \"{name}\"");
                self.samples.push(SampleInfo::named(name));
                self.samples.len() - 1
            }
        };
        &mut self.samples[position]
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut SampleInfo> {
        self.samples.iter_mut()
    }

    /// Final sample order handed to consumers: the `fallback` sample, then
    /// the `control` sample if any, then declared samples newest first.
    #[must_use]
    pub fn into_ordered(self, fallback: SampleInfo, control: Option<SampleInfo>) -> Vec<SampleInfo> {
        let mut ordered = Vec::with_capacity(self.samples.len() + 2);
        ordered.push(fallback);
        ordered.extend(control);
        ordered.extend(self.samples.into_iter().rev());
        ordered
    }
}
