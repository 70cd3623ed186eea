use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::Parser;

use crate::stats::{DEFAULT_MAPQ_BIN_WIDTH, StatsConfig};

/// samqc command-line parameters, using STAR-style `--camelCase` argument names.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "samqc",
    about = "Alignment-quality statistics for SAM files",
    version
)]
pub struct Parameters {
    // ── Input ───────────────────────────────────────────────────────────
    /// Input SAM file (plain text or gzip compressed)
    #[arg(long = "samFile")]
    pub sam_file: PathBuf,

    // ── Statistics ──────────────────────────────────────────────────────
    /// Width of the MAPQ distribution buckets
    #[arg(long = "mapqBinWidth", default_value_t = DEFAULT_MAPQ_BIN_WIDTH.get())]
    pub mapq_bin_width: u32,

    /// Keep mapped mates by read name and report complete pairs
    #[arg(long = "keepReadPairs")]
    pub keep_read_pairs: bool,

    // ── Output ──────────────────────────────────────────────────────────
    /// Write the statistics summary as JSON to this path
    #[arg(long = "outJson")]
    pub out_json: Option<PathBuf>,
}

impl Parameters {
    /// Validate parameter combinations that clap alone cannot enforce.
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        if self.mapq_bin_width == 0 {
            return Err(crate::error::Error::Parameter(
                "--mapqBinWidth must be >= 1".into(),
            ));
        }

        if let Some(out) = &self.out_json {
            if out == &self.sam_file {
                return Err(crate::error::Error::Parameter(
                    "--outJson must differ from --samFile".into(),
                ));
            }
        }

        Ok(())
    }

    /// Collector options derived from the command line.
    pub fn stats_config(&self) -> Result<StatsConfig, crate::error::Error> {
        let mapq_bin_width = NonZeroU32::new(self.mapq_bin_width).ok_or_else(|| {
            crate::error::Error::Parameter("--mapqBinWidth must be >= 1".into())
        })?;

        Ok(StatsConfig {
            mapq_bin_width,
            track_read_pairs: self.keep_read_pairs,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: parse a command line (without program name).
    fn parse(args: &[&str]) -> Parameters {
        let mut full = vec!["samqc"];
        full.extend_from_slice(args);
        Parameters::parse_from(full)
    }

    #[test]
    fn defaults() {
        let p = parse(&["--samFile", "reads.sam"]);
        assert_eq!(p.sam_file, PathBuf::from("reads.sam"));
        assert_eq!(p.mapq_bin_width, 10);
        assert!(!p.keep_read_pairs);
        assert!(p.out_json.is_none());
        assert!(p.validate().is_ok());

        let config = p.stats_config().unwrap();
        assert_eq!(config, StatsConfig::default());
    }

    #[test]
    fn full_command() {
        let p = parse(&[
            "--samFile",
            "/data/sample.sam.gz",
            "--mapqBinWidth",
            "5",
            "--keepReadPairs",
            "--outJson",
            "/out/sample.json",
        ]);
        assert_eq!(p.sam_file, PathBuf::from("/data/sample.sam.gz"));
        assert_eq!(p.mapq_bin_width, 5);
        assert!(p.keep_read_pairs);
        assert_eq!(p.out_json, Some(PathBuf::from("/out/sample.json")));

        let config = p.stats_config().unwrap();
        assert_eq!(config.mapq_bin_width.get(), 5);
        assert!(config.track_read_pairs);
    }

    #[test]
    fn sam_file_required() {
        let result = Parameters::try_parse_from(["samqc"]);
        assert!(result.is_err());
    }

    #[test]
    fn validate_zero_bin_width() {
        let p = parse(&["--samFile", "reads.sam", "--mapqBinWidth", "0"]);
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("mapqBinWidth"));
        assert!(p.stats_config().is_err());
    }

    #[test]
    fn validate_output_overwrites_input() {
        let p = parse(&["--samFile", "reads.sam", "--outJson", "reads.sam"]);
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("outJson"));
    }
}
