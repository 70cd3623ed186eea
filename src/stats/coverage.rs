/// Per-chromosome position span and read density
use crate::record::AlignmentRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Observed position range and read count on one reference sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChromosomeCoverageStats {
    pub min_position: u64,
    pub max_position: u64,
    pub read_count: u64,
}

impl ChromosomeCoverageStats {
    fn new(position: u64) -> Self {
        Self {
            min_position: position,
            max_position: position,
            read_count: 1,
        }
    }

    fn add(&mut self, position: u64) {
        self.min_position = self.min_position.min(position);
        self.max_position = self.max_position.max(position);
        self.read_count += 1;
    }

    /// Inclusive span between the leftmost and rightmost read starts
    pub fn coverage_length(&self) -> u64 {
        self.max_position - self.min_position + 1
    }

    /// Reads per covered base; 0 when every read sits at POS 0
    pub fn coverage_density(&self) -> f64 {
        if self.max_position == 0 {
            0.0
        } else {
            self.read_count as f64 / self.coverage_length() as f64
        }
    }

    /// Span as a percentage of the rightmost observed position
    pub fn coverage_percentage(&self) -> f64 {
        if self.max_position == 0 {
            0.0
        } else {
            100.0 * self.coverage_length() as f64 / self.max_position as f64
        }
    }
}

/// Groups mapped read positions by reference name.
///
/// Only the running min/max/count is kept per reference, so memory is
/// bounded by the number of references rather than reads.
#[derive(Debug, Default)]
pub struct CoverageAnalyzer {
    chromosomes: BTreeMap<String, ChromosomeCoverageStats>,
}

impl CoverageAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record; unmapped records and RNAME `*` are ignored.
    pub fn add(&mut self, record: &AlignmentRecord) {
        if record.is_unmapped() || !record.has_reference() {
            return;
        }

        match self.chromosomes.get_mut(&record.reference_name) {
            Some(stats) => stats.add(record.position),
            None => {
                self.chromosomes.insert(
                    record.reference_name.clone(),
                    ChromosomeCoverageStats::new(record.position),
                );
            }
        }
    }

    pub fn into_inner(self) -> BTreeMap<String, ChromosomeCoverageStats> {
        self.chromosomes
    }
}
