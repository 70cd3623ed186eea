/// JSON export of the statistics summary
use crate::error::Error;
use crate::stats::{QualityHistogram, StatisticsSummary};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
struct ChromosomeReport {
    min_position: u64,
    max_position: u64,
    read_count: u64,
    coverage_length: u64,
    coverage_density: f64,
    coverage_percentage: f64,
}

#[derive(Debug, Serialize)]
struct SummaryReport<'a> {
    total_reads: u64,
    mapped_reads: u64,
    unmapped_reads: u64,
    first_reads_mapped: u64,
    second_reads_mapped: u64,
    partially_mapped_reads: u64,
    cigar_available_reads: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    complete_pairs: Option<u64>,
    percentage_mapped: f64,
    percentage_unmapped: f64,
    percentage_first_mapped: f64,
    percentage_second_mapped: f64,
    percentage_partially_mapped: f64,
    chromosome_coverage: BTreeMap<&'a str, ChromosomeReport>,
    quality_distribution: &'a QualityHistogram,
    mapped_quality_distribution: &'a QualityHistogram,
    mapq_bin_width: u32,
    quality_distribution_binned: BTreeMap<u32, u64>,
}

impl<'a> SummaryReport<'a> {
    fn new(summary: &'a StatisticsSummary) -> Self {
        let chromosome_coverage = summary
            .chromosomes
            .iter()
            .map(|(name, cov)| {
                (
                    name.as_str(),
                    ChromosomeReport {
                        min_position: cov.min_position,
                        max_position: cov.max_position,
                        read_count: cov.read_count,
                        coverage_length: cov.coverage_length(),
                        coverage_density: cov.coverage_density(),
                        coverage_percentage: cov.coverage_percentage(),
                    },
                )
            })
            .collect();

        Self {
            total_reads: summary.total_reads,
            mapped_reads: summary.mapped_reads,
            unmapped_reads: summary.unmapped_reads,
            first_reads_mapped: summary.first_reads_mapped,
            second_reads_mapped: summary.second_reads_mapped,
            partially_mapped_reads: summary.partially_mapped_reads,
            cigar_available_reads: summary.cigar_available_reads,
            complete_pairs: summary.complete_pairs,
            percentage_mapped: summary.percentage_mapped(),
            percentage_unmapped: summary.percentage_unmapped(),
            percentage_first_mapped: summary.percentage_first_mapped(),
            percentage_second_mapped: summary.percentage_second_mapped(),
            percentage_partially_mapped: summary.percentage_partially_mapped(),
            chromosome_coverage,
            quality_distribution: &summary.quality,
            mapped_quality_distribution: &summary.mapped_quality,
            mapq_bin_width: summary.mapq_bin_width.get(),
            quality_distribution_binned: summary.bucketed_quality(),
        }
    }
}

/// Serialize a summary as pretty-printed JSON.
pub fn write_json<W: Write>(summary: &StatisticsSummary, writer: W) -> Result<(), Error> {
    serde_json::to_writer_pretty(writer, &SummaryReport::new(summary))?;
    Ok(())
}

/// Write a summary as JSON to `path`, replacing any existing file.
pub fn write_json_file(summary: &StatisticsSummary, path: &Path) -> Result<(), Error> {
    let file = File::create(path).map_err(|e| Error::io(e, path))?;
    let mut writer = BufWriter::new(file);
    write_json(summary, &mut writer)?;
    writeln!(writer).map_err(|e| Error::io(e, path))?;
    writer.flush().map_err(|e| Error::io(e, path))?;
    Ok(())
}
