pub mod error;
pub mod flags;
pub mod io;
pub mod params;
pub mod record;
pub mod report;
pub mod stats;

use log::info;

use crate::io::sam::SamReader;
use crate::params::Parameters;
use crate::stats::StatisticsSummary;

/// Top-level dispatcher. Called from `main()` after CLI parsing.
pub fn run(params: &Parameters) -> anyhow::Result<StatisticsSummary> {
    params.validate()?;

    info!("samqc v{}", env!("CARGO_PKG_VERSION"));
    info!("samFile: {}", params.sam_file.display());
    info!("mapqBinWidth: {}", params.mapq_bin_width);

    let config = params.stats_config()?;
    let mut reader = SamReader::open(&params.sam_file)?;
    let summary = stats::collect(reader.by_ref(), config)?;

    info!(
        "Read {} records ({} header lines, {} malformed lines skipped)",
        summary.total_reads,
        reader.header_lines(),
        reader.skipped_lines()
    );
    summary.print_summary();

    if let Some(out) = &params.out_json {
        info!("Writing JSON summary to {}...", out.display());
        report::write_json_file(&summary, out)?;
    }

    Ok(summary)
}
