/// Partial-alignment detection from CIGAR strings
use crate::record::MISSING;
use noodles::sam::alignment::record::cigar::op::Kind;

/// How much of a read the CIGAR string says was aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CigarClass {
    /// CIGAR is `*`
    Unavailable,
    /// Only M, =, X (or P) operations
    FullyMatched,
    /// At least one clip, indel or reference skip
    Partial,
}

fn op_kind(c: char) -> Option<Kind> {
    match c {
        'M' => Some(Kind::Match),
        'I' => Some(Kind::Insertion),
        'D' => Some(Kind::Deletion),
        'N' => Some(Kind::Skip),
        'S' => Some(Kind::SoftClip),
        'H' => Some(Kind::HardClip),
        'P' => Some(Kind::Pad),
        '=' => Some(Kind::SequenceMatch),
        'X' => Some(Kind::SequenceMismatch),
        _ => None,
    }
}

fn breaks_alignment(kind: Kind) -> bool {
    matches!(
        kind,
        Kind::SoftClip | Kind::HardClip | Kind::Insertion | Kind::Deletion | Kind::Skip
    )
}

/// Classify a CIGAR string.
///
/// Any S, H, I, D or N operation makes the alignment partial. Lengths and
/// unknown characters are not validated.
pub fn classify_cigar(cigar: &str) -> CigarClass {
    if cigar == MISSING {
        return CigarClass::Unavailable;
    }

    if cigar.chars().filter_map(op_kind).any(breaks_alignment) {
        CigarClass::Partial
    } else {
        CigarClass::FullyMatched
    }
}

/// Running tally of partial alignments among records with a CIGAR.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CigarCounter {
    /// Records whose CIGAR is not `*`
    pub available: u64,
    pub partial: u64,
}

impl CigarCounter {
    pub fn add(&mut self, cigar: &str) -> CigarClass {
        let class = classify_cigar(cigar);
        match class {
            CigarClass::Unavailable => {}
            CigarClass::FullyMatched => self.available += 1,
            CigarClass::Partial => {
                self.available += 1;
                self.partial += 1;
            }
        }
        class
    }
}
