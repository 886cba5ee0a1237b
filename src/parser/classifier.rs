//! Record classification for the HURDAT2 line stream
//!
//! HURDAT2 interleaves two record shapes in one flat file with no grouping
//! syntax; the field count is the sole discriminator. A header line carries
//! 4 comma-separated fields, a track line 21 (both counts include the empty
//! field produced by the trailing comma).

use crate::constants::{HEADER_FIELD_COUNT, TRACK_FIELD_COUNT};
use csv::StringRecord;

/// Discriminant for one classified input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Storm header record (4 fields)
    Header,
    /// Track observation record (21 fields)
    Track,
    /// Any other field count; skipped without touching the open aggregate
    Unrecognized,
}

/// Classify a whitespace-trimmed field sequence by field count
///
/// Deterministic and total: every record maps to exactly one kind.
pub fn classify(record: &StringRecord) -> RecordKind {
    match record.len() {
        HEADER_FIELD_COUNT => RecordKind::Header,
        TRACK_FIELD_COUNT => RecordKind::Track,
        _ => RecordKind::Unrecognized,
    }
}
