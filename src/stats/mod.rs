/// Alignment statistics collection and reporting
use crate::error::Error;
use crate::record::AlignmentRecord;
use log::info;
use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroU32;

pub mod cigar;
pub mod coverage;
pub mod pairing;
pub mod quality;

pub use cigar::{CigarClass, CigarCounter, classify_cigar};
pub use coverage::{ChromosomeCoverageStats, CoverageAnalyzer};
pub use pairing::{MappingCounter, ReadPair};
pub use quality::{DEFAULT_MAPQ_BIN_WIDTH, QualityHistogram};

/// `100 * count / total`, or 0 when `total` is 0
pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * count as f64 / total as f64
    }
}

/// Options controlling what the collector keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsConfig {
    /// Bucket width for the binned MAPQ distribution
    pub mapq_bin_width: NonZeroU32,
    /// Keep every mapped mate indexed by query name
    pub track_read_pairs: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            mapq_bin_width: DEFAULT_MAPQ_BIN_WIDTH,
            track_read_pairs: false,
        }
    }
}

/// Single-pass accumulator feeding every statistic from one record stream.
#[derive(Debug)]
pub struct StatsCollector {
    config: StatsConfig,
    total_reads: u64,
    mapping: MappingCounter,
    coverage: CoverageAnalyzer,
    quality: QualityHistogram,
    mapped_quality: QualityHistogram,
    cigar: CigarCounter,
}

impl StatsCollector {
    pub fn new(config: StatsConfig) -> Self {
        Self {
            config,
            total_reads: 0,
            mapping: MappingCounter::new(config.track_read_pairs),
            coverage: CoverageAnalyzer::new(),
            quality: QualityHistogram::new(),
            mapped_quality: QualityHistogram::new(),
            cigar: CigarCounter::default(),
        }
    }

    /// Record one alignment in every aggregate
    pub fn add(&mut self, record: &AlignmentRecord) {
        self.total_reads += 1;
        self.mapping.add(record);
        self.coverage.add(record);
        self.quality.add(record.mapping_quality);
        if !record.is_unmapped() {
            self.mapped_quality.add(record.mapping_quality);
        }
        self.cigar.add(&record.cigar);
    }

    /// Freeze the aggregates into a summary
    pub fn finish(mut self) -> StatisticsSummary {
        let complete_pairs = self.mapping.complete_pairs();
        let read_pairs = self.mapping.take_read_pairs();

        StatisticsSummary {
            total_reads: self.total_reads,
            mapped_reads: self.mapping.mapped_reads,
            unmapped_reads: self.mapping.unmapped_reads,
            first_reads_mapped: self.mapping.first_reads_mapped,
            second_reads_mapped: self.mapping.second_reads_mapped,
            partially_mapped_reads: self.cigar.partial,
            cigar_available_reads: self.cigar.available,
            complete_pairs,
            chromosomes: self.coverage.into_inner(),
            quality: self.quality,
            mapped_quality: self.mapped_quality,
            mapq_bin_width: self.config.mapq_bin_width,
            read_pairs,
        }
    }
}

/// Run every statistic over a record stream.
///
/// Stops at the first parse or I/O error.
pub fn collect<I>(records: I, config: StatsConfig) -> Result<StatisticsSummary, Error>
where
    I: IntoIterator<Item = Result<AlignmentRecord, Error>>,
{
    let mut collector = StatsCollector::new(config);
    for record in records {
        collector.add(&record?);
    }
    Ok(collector.finish())
}

/// Final statistics for one SAM file.
#[derive(Debug, Clone)]
pub struct StatisticsSummary {
    pub total_reads: u64,
    pub mapped_reads: u64,
    pub unmapped_reads: u64,
    pub first_reads_mapped: u64,
    pub second_reads_mapped: u64,
    /// Records whose CIGAR has a clip, indel or skip
    pub partially_mapped_reads: u64,
    /// Records whose CIGAR is not `*`
    pub cigar_available_reads: u64,
    /// Query names with both mates mapped (only when pairs are tracked)
    pub complete_pairs: Option<u64>,
    pub chromosomes: BTreeMap<String, ChromosomeCoverageStats>,
    /// MAPQ of every record, mapped or not
    pub quality: QualityHistogram,
    /// MAPQ of mapped records only
    pub mapped_quality: QualityHistogram,
    pub mapq_bin_width: NonZeroU32,
    pub read_pairs: Option<HashMap<String, ReadPair>>,
}

impl StatisticsSummary {
    pub fn percentage_mapped(&self) -> f64 {
        percentage(self.mapped_reads, self.total_reads)
    }

    pub fn percentage_unmapped(&self) -> f64 {
        percentage(self.unmapped_reads, self.total_reads)
    }

    pub fn percentage_first_mapped(&self) -> f64 {
        percentage(self.first_reads_mapped, self.total_reads)
    }

    pub fn percentage_second_mapped(&self) -> f64 {
        percentage(self.second_reads_mapped, self.total_reads)
    }

    /// Partial alignments among records that have a CIGAR
    pub fn percentage_partially_mapped(&self) -> f64 {
        percentage(self.partially_mapped_reads, self.cigar_available_reads)
    }

    /// MAPQ distribution folded into `mapq_bin_width` buckets
    pub fn bucketed_quality(&self) -> BTreeMap<u32, u64> {
        self.quality.bucketed(self.mapq_bin_width)
    }

    /// Print summary statistics to log
    pub fn print_summary(&self) {
        if self.total_reads == 0 {
            info!("No reads processed");
            return;
        }

        info!("=== Alignment Summary ===");
        info!("Total reads: {}", self.total_reads);
        info!(
            "Mapped reads: {} ({:.2}%)",
            self.mapped_reads,
            self.percentage_mapped()
        );
        info!(
            "Unmapped reads: {} ({:.2}%)",
            self.unmapped_reads,
            self.percentage_unmapped()
        );
        info!(
            "First reads mapped: {} ({:.2}%)",
            self.first_reads_mapped,
            self.percentage_first_mapped()
        );
        info!(
            "Second reads mapped: {} ({:.2}%)",
            self.second_reads_mapped,
            self.percentage_second_mapped()
        );
        info!(
            "Partially mapped reads: {} of {} with CIGAR ({:.2}%)",
            self.partially_mapped_reads,
            self.cigar_available_reads,
            self.percentage_partially_mapped()
        );
        if let Some(complete) = self.complete_pairs {
            info!("Pairs with both mates mapped: {}", complete);
        }

        info!("=== Chromosome Coverage ===");
        for (name, cov) in &self.chromosomes {
            info!(
                "{}: min {} max {} span {} reads {} density {:.4} ({:.2}%)",
                name,
                cov.min_position,
                cov.max_position,
                cov.coverage_length(),
                cov.read_count,
                cov.coverage_density(),
                cov.coverage_percentage()
            );
        }

        info!(
            "=== MAPQ Distribution (bins of {}) ===",
            self.mapq_bin_width
        );
        for (lower, count) in self.bucketed_quality() {
            info!(
                "[{}, {}): {}",
                lower,
                lower + self.mapq_bin_width.get(),
                count
            );
        }
    }
}
