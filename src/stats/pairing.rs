/// Mapped/unmapped counting and read-pair assembly
use crate::record::AlignmentRecord;
use std::collections::HashMap;

/// The mates seen so far for one query name.
///
/// Either slot may be empty: the mate may not have been reached yet, may be
/// unmapped, or may not exist at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadPair {
    pub first_read: Option<AlignmentRecord>,
    pub second_read: Option<AlignmentRecord>,
}

impl ReadPair {
    /// Both mates were mapped
    pub fn is_complete(&self) -> bool {
        self.first_read.is_some() && self.second_read.is_some()
    }
}

/// Counts mapped, unmapped, first-mate and second-mate records.
#[derive(Debug, Default)]
pub struct MappingCounter {
    pub mapped_reads: u64,
    pub unmapped_reads: u64,
    pub first_reads_mapped: u64,
    pub second_reads_mapped: u64,
    read_pairs: Option<HashMap<String, ReadPair>>,
}

impl MappingCounter {
    /// Create a counter; `track_pairs` also keeps every mapped mate by name.
    pub fn new(track_pairs: bool) -> Self {
        Self {
            read_pairs: track_pairs.then(HashMap::new),
            ..Self::default()
        }
    }

    /// Record one alignment.
    ///
    /// Unmapped records only bump `unmapped_reads`. For mapped records the
    /// first-mate and last-mate bits are checked independently.
    pub fn add(&mut self, record: &AlignmentRecord) {
        let flags = record.flags();
        if flags.is_unmapped {
            self.unmapped_reads += 1;
            return;
        }

        self.mapped_reads += 1;

        if flags.is_first {
            self.first_reads_mapped += 1;
        }
        if flags.is_second {
            self.second_reads_mapped += 1;
        }

        if let Some(pairs) = self.read_pairs.as_mut() {
            if !flags.is_first && !flags.is_second {
                return;
            }
            let pair = pairs.entry(record.query_name.clone()).or_default();
            if flags.is_first {
                pair.first_read = Some(record.clone());
            }
            if flags.is_second {
                pair.second_read = Some(record.clone());
            }
        }
    }

    /// Query names with both mates mapped; `None` when pairs are not tracked
    pub fn complete_pairs(&self) -> Option<u64> {
        self.read_pairs
            .as_ref()
            .map(|pairs| pairs.values().filter(|p| p.is_complete()).count() as u64)
    }

    /// Hand over the pair map, leaving the counter without one.
    pub fn take_read_pairs(&mut self) -> Option<HashMap<String, ReadPair>> {
        self.read_pairs.take()
    }
}
