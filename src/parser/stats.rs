//! Parsing statistics for HURDAT2 processing
//!
//! Tracks per-run counters and the per-line errors encountered while
//! reassembling the record stream, for the end-of-run summary.

/// Simple parsing statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct ParseStats {
    /// Total number of input lines encountered
    pub total_lines: usize,

    /// Number of header records decoded
    pub headers_parsed: usize,

    /// Number of track records decoded and appended
    pub tracks_parsed: usize,

    /// Number of complete storm aggregates emitted
    pub storms_emitted: usize,

    /// Number of lines skipped (decode failures, orphan tracks, unrecognized)
    pub lines_skipped: usize,

    /// Number of lines with an unrecognized field count
    pub unrecognized_lines: usize,

    /// Number of track lines that arrived with no open header
    pub orphan_tracks: usize,

    /// Number of incomplete aggregates dropped by a premature header
    pub protocol_violations: usize,

    /// Per-line errors for diagnostics
    pub errors: Vec<String>,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self {
            total_lines: 0,
            headers_parsed: 0,
            tracks_parsed: 0,
            storms_emitted: 0,
            lines_skipped: 0,
            unrecognized_lines: 0,
            orphan_tracks: 0,
            protocol_violations: 0,
            errors: Vec::new(),
        }
    }

    /// Calculate success rate over consumed lines as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_lines == 0 {
            0.0
        } else {
            let consumed = self.headers_parsed + self.tracks_parsed;
            (consumed as f64 / self.total_lines as f64) * 100.0
        }
    }

    /// Check if parsing was mostly successful (>90% of lines consumed)
    pub fn is_successful(&self) -> bool {
        self.success_rate() > 90.0
    }
}

impl Default for ParseStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate_on_empty_input() {
        assert_eq!(ParseStats::new().success_rate(), 0.0);
    }

    #[test]
    fn test_success_rate() {
        let mut stats = ParseStats::new();
        stats.total_lines = 10;
        stats.headers_parsed = 1;
        stats.tracks_parsed = 8;
        stats.lines_skipped = 1;

        assert_eq!(stats.success_rate(), 90.0);
        assert!(!stats.is_successful());

        stats.tracks_parsed = 9;
        stats.lines_skipped = 0;
        assert!(stats.is_successful());
    }
}
