/// MAPQ distribution
use serde::Serialize;
use std::collections::BTreeMap;
use std::num::NonZeroU32;

/// Default MAPQ bucket width
pub const DEFAULT_MAPQ_BIN_WIDTH: NonZeroU32 = match NonZeroU32::new(10) {
    Some(width) => width,
    None => panic!("MAPQ bucket width must be non-zero"),
};

/// Count of records per MAPQ value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QualityHistogram {
    counts: BTreeMap<u8, u64>,
}

impl QualityHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mapq: u8) {
        *self.counts.entry(mapq).or_insert(0) += 1;
    }

    /// (MAPQ, count) in ascending MAPQ order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().map(|(&q, &n)| (q, n))
    }

    /// Fold values into fixed-width buckets keyed by their lower bound.
    ///
    /// A value `v` lands in bucket `floor(v / width) * width`. Empty buckets
    /// are not emitted.
    pub fn bucketed(&self, width: NonZeroU32) -> BTreeMap<u32, u64> {
        let width = width.get();
        let mut buckets = BTreeMap::new();
        for (mapq, count) in self.iter() {
            let lower = (mapq as u32 / width) * width;
            *buckets.entry(lower).or_insert(0) += count;
        }
        buckets
    }
}
