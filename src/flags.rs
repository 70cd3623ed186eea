/// SAM FLAG decoding
///
/// Only three bits matter for the statistics:
/// - 0x4  segment unmapped
/// - 0x40 first segment in the template
/// - 0x80 last segment in the template
use noodles::sam::alignment::record::Flags;

/// The FLAG predicates used by the statistics collectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodedFlag {
    pub is_unmapped: bool,
    pub is_first: bool,
    pub is_second: bool,
}

/// Decode a raw SAM FLAG value.
///
/// Each bit is tested on its own; a record carrying both 0x40 and 0x80
/// reports both predicates as set.
pub fn decode_flag(flag: u16) -> DecodedFlag {
    let flags = Flags::from(flag);
    DecodedFlag {
        is_unmapped: flags.is_unmapped(),
        is_first: flags.is_first_segment(),
        is_second: flags.is_last_segment(),
    }
}
