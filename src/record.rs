/// Typed SAM alignment record
use crate::error::Error;
use crate::flags::{DecodedFlag, decode_flag};
use bstr::ByteSlice;
use std::str::FromStr;

/// Number of mandatory tab-separated SAM columns.
pub const SAM_FIELD_COUNT: usize = 11;

/// Sentinel used by SAM for "no value" in RNAME, CIGAR and friends.
pub const MISSING: &str = "*";

/// One SAM alignment line with its mandatory columns.
///
/// FLAG, POS and MAPQ are parsed when the record is built; the remaining
/// columns are kept as text, with invalid UTF-8 replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord {
    pub query_name: String,
    pub flag: u16,
    pub reference_name: String,
    /// 1-based leftmost position; 0 when unplaced
    pub position: u64,
    pub mapping_quality: u8,
    pub cigar: String,
    pub mate_reference: String,
    pub mate_position: String,
    pub template_length: String,
    pub sequence: String,
    pub quality_string: String,
}

fn parse_number<T: FromStr>(raw: &[u8], line_number: usize, field: &'static str) -> Result<T, Error> {
    raw.to_str()
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::format(line_number, field, raw.to_str_lossy()))
}

fn text(raw: &[u8]) -> String {
    raw.to_str_lossy().into_owned()
}

impl AlignmentRecord {
    /// Build a record from the 11 mandatory columns of a SAM line.
    ///
    /// # Arguments
    /// * `fields` - The mandatory columns, in SAM order
    /// * `line_number` - 1-based line number, used in error messages
    pub fn from_fields(fields: &[&[u8]; SAM_FIELD_COUNT], line_number: usize) -> Result<Self, Error> {
        let flag = parse_number(fields[1], line_number, "FLAG")?;
        let position = parse_number(fields[3], line_number, "POS")?;
        let mapping_quality = parse_number(fields[4], line_number, "MAPQ")?;

        Ok(Self {
            query_name: text(fields[0]),
            flag,
            reference_name: text(fields[2]),
            position,
            mapping_quality,
            cigar: text(fields[5]),
            mate_reference: text(fields[6]),
            mate_position: text(fields[7]),
            template_length: text(fields[8]),
            sequence: text(fields[9]),
            quality_string: text(fields[10]),
        })
    }

    pub fn flags(&self) -> DecodedFlag {
        decode_flag(self.flag)
    }

    pub fn is_unmapped(&self) -> bool {
        self.flags().is_unmapped
    }

    /// True when RNAME names a reference sequence.
    pub fn has_reference(&self) -> bool {
        self.reference_name != MISSING
    }
}

/// Build a record from a tab-separated test line.
#[cfg(test)]
pub(crate) fn record_from_line(line: &str) -> AlignmentRecord {
    match crate::io::sam::parse_line(line.as_bytes(), 1).unwrap() {
        crate::io::sam::ParsedLine::Record(record) => record,
        other => panic!("not a record line: {other:?}"),
    }
}
