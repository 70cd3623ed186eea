/// SAM text reader with gzip support
use crate::error::Error;
use crate::record::{AlignmentRecord, SAM_FIELD_COUNT};
use bstr::ByteSlice;
use flate2::read::GzDecoder;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Classification of a single line of SAM text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// `@`-prefixed header line
    Header,
    /// Data line with fewer than 11 columns
    Malformed,
    Record(AlignmentRecord),
}

/// Parse one line of SAM text.
///
/// Header lines and lines with too few columns are not errors; a typed
/// column that fails to parse is. Only FLAG, POS and MAPQ must be valid
/// UTF-8, so stray bytes in comments or optional tags are tolerated.
///
/// # Arguments
/// * `line` - Raw line bytes, with or without the trailing newline
/// * `line_number` - 1-based line number in the file
pub fn parse_line(line: &[u8], line_number: usize) -> Result<ParsedLine, Error> {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);

    if line.starts_with(b"@") {
        return Ok(ParsedLine::Header);
    }

    let fields: Vec<&[u8]> = line.split_str("\t").take(SAM_FIELD_COUNT).collect();
    match <&[&[u8]; SAM_FIELD_COUNT]>::try_from(fields.as_slice()) {
        Ok(mandatory) => {
            AlignmentRecord::from_fields(mandatory, line_number).map(ParsedLine::Record)
        }
        Err(_) => Ok(ParsedLine::Malformed),
    }
}

/// Streaming SAM reader yielding typed alignment records in file order.
pub struct SamReader {
    inner: Box<dyn BufRead + Send>,
    path: PathBuf,
    line_number: usize,
    header_lines: u64,
    skipped_lines: u64,
    buf: Vec<u8>,
}

impl SamReader {
    /// Open a SAM file (plain or gzip compressed)
    ///
    /// Compression is detected from the `.gz` / `.gzip` extension.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| Error::io(e, path))?;

        let path_str = path.to_string_lossy();
        let is_gzipped = path_str.ends_with(".gz") || path_str.ends_with(".gzip");

        let inner: Box<dyn BufRead + Send> = if is_gzipped {
            Box::new(BufReader::new(GzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        Ok(Self::with_path(inner, path.to_path_buf()))
    }

    /// Wrap an already-open reader (stdin, in-memory buffers).
    pub fn from_reader<R: BufRead + Send + 'static>(reader: R) -> Self {
        Self::with_path(Box::new(reader), PathBuf::from("<stream>"))
    }

    fn with_path(inner: Box<dyn BufRead + Send>, path: PathBuf) -> Self {
        Self {
            inner,
            path,
            line_number: 0,
            header_lines: 0,
            skipped_lines: 0,
            buf: Vec::new(),
        }
    }

    /// Number of `@` header lines seen so far
    pub fn header_lines(&self) -> u64 {
        self.header_lines
    }

    /// Number of data lines dropped for having fewer than 11 columns
    pub fn skipped_lines(&self) -> u64 {
        self.skipped_lines
    }

    /// Read the next alignment record, skipping headers and malformed lines.
    ///
    /// # Returns
    /// - Ok(Some(record)) for the next data line
    /// - Ok(None) at end of input
    /// - Err on I/O failure or a non-numeric FLAG/POS/MAPQ
    pub fn next_record(&mut self) -> Result<Option<AlignmentRecord>, Error> {
        loop {
            self.buf.clear();
            let n = self
                .inner
                .read_until(b'\n', &mut self.buf)
                .map_err(|e| Error::io(e, &self.path))?;
            if n == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            match parse_line(&self.buf, self.line_number)? {
                ParsedLine::Header => self.header_lines += 1,
                ParsedLine::Malformed => {
                    debug!(
                        "{}:{}: fewer than {} columns, line skipped",
                        self.path.display(),
                        self.line_number,
                        SAM_FIELD_COUNT
                    );
                    self.skipped_lines += 1;
                }
                ParsedLine::Record(record) => return Ok(Some(record)),
            }
        }
    }
}

impl Iterator for SamReader {
    type Item = Result<AlignmentRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    const SAM: &str = "@HD\tVN:1.6\tSO:unsorted\n\
@SQ\tSN:chr1\tLN:1000\n\
r1\t99\tchr1\t100\t60\t50M\t=\t150\t100\tACGT\tIIII\n\
r1\t147\tchr1\t150\t60\t50M\t=\t100\t-100\tACGT\tIIII\n\
r2\t4\t*\t0\t0\t*\t*\t0\t0\tACGT\tIIII\n";

    fn reader(text: &str) -> SamReader {
        SamReader::from_reader(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn test_parse_header_line() {
        assert_eq!(parse_line(b"@HD\tVN:1.6", 1).unwrap(), ParsedLine::Header);
    }

    #[test]
    fn test_parse_short_line() {
        assert_eq!(parse_line(b"r1\t0\tchr1", 1).unwrap(), ParsedLine::Malformed);
        assert_eq!(parse_line(b"", 1).unwrap(), ParsedLine::Malformed);
    }

    #[test]
    fn test_parse_strips_line_ending() {
        let line = b"r1\t0\tchr1\t1\t0\t*\t*\t0\t0\tA\tI\r\n";
        match parse_line(line, 1).unwrap() {
            ParsedLine::Record(record) => assert_eq!(record.quality_string, "I"),
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn test_reads_records_in_order() {
        let mut r = reader(SAM);
        let records: Vec<_> = r.by_ref().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].flag, 99);
        assert_eq!(records[1].flag, 147);
        assert_eq!(records[2].reference_name, "*");
        assert_eq!(r.header_lines(), 2);
        assert_eq!(r.skipped_lines(), 0);
    }

    #[test]
    fn test_header_only_yields_nothing() {
        let mut r = reader("@HD\tVN:1.6\n@SQ\tSN:chr1\tLN:10\n");
        assert!(r.next_record().unwrap().is_none());
        assert_eq!(r.header_lines(), 2);
    }

    #[test]
    fn test_n_data_lines_give_n_records() {
        let mut text = String::new();
        for i in 0..25 {
            text.push_str(&format!("r{i}\t0\tchr1\t{}\t30\t10M\t*\t0\t0\tACGTACGTAC\tIIIIIIIIII\n", i + 1));
        }
        assert_eq!(reader(&text).count(), 25);
    }

    #[test]
    fn test_malformed_lines_dropped() {
        let text = "r1\t0\tchr1\t1\t0\t*\t*\t0\t0\tA\tI\nbroken\tline\nr2\t0\tchr1\t2\t0\t*\t*\t0\t0\tA\tI\n";
        let mut r = reader(text);
        let names: Vec<String> = r
            .by_ref()
            .map(|rec| rec.unwrap().query_name)
            .collect();
        assert_eq!(names, vec!["r1", "r2"]);
        assert_eq!(r.skipped_lines(), 1);
    }

    #[test]
    fn test_latin1_comment_and_tag_tolerated() {
        let text: &[u8] = b"@HD\tVN:1.6\n\
@CO\tr\xe9sultat d'alignement\n\
r1\t0\tchr1\t7\t30\t4M\t*\t0\t0\tACGT\tIIII\tXC:Z:caf\xe9\n";
        let mut r = SamReader::from_reader(Cursor::new(text.to_vec()));
        let records: Vec<_> = r.by_ref().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].position, 7);
        assert_eq!(records[0].quality_string, "IIII");
        assert_eq!(r.header_lines(), 2);
    }

    #[test]
    fn test_non_utf8_mapq_is_format_error() {
        let text: &[u8] = b"r1\t0\tchr1\t7\t3\xb0\t4M\t*\t0\t0\tACGT\tIIII\n";
        let err = SamReader::from_reader(Cursor::new(text.to_vec()))
            .next_record()
            .unwrap_err();
        assert!(matches!(err, Error::Format { field: "MAPQ", line: 1, .. }));
    }

    #[test]
    fn test_format_error_reports_file_line() {
        let text = "@HD\tVN:1.6\nr1\t0\tchr1\tNaN\t0\t*\t*\t0\t0\tA\tI\n";
        let err = reader(text).next_record().unwrap_err();
        match err {
            Error::Format { line, field, .. } => {
                assert_eq!(line, 2);
                assert_eq!(field, "POS");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_open_missing_file() {
        let err = SamReader::open(Path::new("/nonexistent/reads.sam"))
            .err()
            .unwrap();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/reads.sam"));
    }

    #[test]
    fn test_open_gzip() {
        use flate2::Compression;
        use flate2::write::GzEncoder;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.sam.gz");
        let file = File::create(&path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(SAM.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let records: Vec<_> = SamReader::open(&path)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_open_is_restartable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.sam");
        std::fs::write(&path, SAM).unwrap();

        let first = SamReader::open(&path).unwrap().count();
        let second = SamReader::open(&path).unwrap().count();
        assert_eq!(first, 3);
        assert_eq!(first, second);
    }
}
