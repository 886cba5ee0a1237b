//! Aggregation state machine for storm reassembly
//!
//! Owns the single in-progress [`StormAggregate`]. Each classified line
//! either opens a new aggregate (header) or appends a decoded track to the
//! open one; the aggregate is handed back for emission exactly once, when
//! the appended track count reaches the header's declared total.
//!
//! Invariant: an aggregate held by the assembler is always incomplete, since
//! completion hands it back immediately. A header that declares zero tracks
//! is therefore emitted without ever being stored.

use crate::models::StormAggregate;
use crate::parser::classifier::{self, RecordKind};
use crate::parser::fields::{parse_header, parse_track};
use crate::parser::stats::ParseStats;
use crate::{Error, Result};
use csv::StringRecord;
use tracing::{debug, warn};

/// State machine that reassembles track records under their owning header
#[derive(Debug, Default)]
pub struct StormAssembler {
    /// The in-progress aggregate, if any (`None` = idle)
    open: Option<StormAggregate>,
}

impl StormAssembler {
    /// Create a new assembler in the idle state
    pub fn new() -> Self {
        Self { open: None }
    }

    /// Feed one classified input line into the state machine
    ///
    /// Returns the completed aggregate when this line finishes a storm.
    /// Per-line failures (decode errors, orphan tracks) are returned as
    /// errors after their skip counters have been recorded in `stats`; the
    /// open aggregate is never modified by a failing line.
    pub fn feed(
        &mut self,
        record: &StringRecord,
        line: u64,
        stats: &mut ParseStats,
    ) -> Result<Option<StormAggregate>> {
        match classifier::classify(record) {
            RecordKind::Header => self.begin_storm(record, line, stats),
            RecordKind::Track => self.append_track(record, line, stats),
            RecordKind::Unrecognized => {
                debug!(
                    line,
                    fields = record.len(),
                    "skipping line with unrecognized field count"
                );
                stats.unrecognized_lines += 1;
                stats.lines_skipped += 1;
                Ok(None)
            }
        }
    }

    /// Whether an aggregate is currently accumulating
    pub fn has_open_aggregate(&self) -> bool {
        self.open.is_some()
    }

    /// Storm identifier of the open aggregate, for diagnostics
    pub fn open_storm_id(&self) -> Option<String> {
        self.open.as_ref().map(|a| a.header.storm_id())
    }

    fn begin_storm(
        &mut self,
        record: &StringRecord,
        line: u64,
        stats: &mut ParseStats,
    ) -> Result<Option<StormAggregate>> {
        let header = parse_header(record, line).map_err(|e| {
            stats.lines_skipped += 1;
            e
        })?;

        // A new header before the open aggregate reached its declared count
        // abandons the partial: an aggregate is only valid when complete.
        if let Some(dropped) = self.open.take() {
            let violation = Error::protocol_violation(
                line,
                dropped.header.storm_id(),
                dropped.observed_tracks(),
                dropped.header.nr_of_tracks,
            );
            warn!("{}", violation);
            stats.protocol_violations += 1;
            stats.errors.push(violation.to_string());
        }

        stats.headers_parsed += 1;
        debug!(
            line,
            storm_id = %header.storm_id(),
            nr_of_tracks = header.nr_of_tracks,
            "opened storm aggregate"
        );

        let aggregate = StormAggregate::new(header);
        if aggregate.is_complete() {
            // Zero declared tracks: emit immediately, stay idle
            stats.storms_emitted += 1;
            return Ok(Some(aggregate));
        }

        self.open = Some(aggregate);
        Ok(None)
    }

    fn append_track(
        &mut self,
        record: &StringRecord,
        line: u64,
        stats: &mut ParseStats,
    ) -> Result<Option<StormAggregate>> {
        let Some(mut aggregate) = self.open.take() else {
            stats.orphan_tracks += 1;
            stats.lines_skipped += 1;
            return Err(Error::orphan_track(line));
        };

        // Decode before touching the aggregate so a failing line leaves it intact
        let track = match parse_track(record, line) {
            Ok(track) => track,
            Err(e) => {
                stats.lines_skipped += 1;
                self.open = Some(aggregate);
                return Err(e);
            }
        };

        aggregate.tracks.push(track);
        stats.tracks_parsed += 1;
        debug!(
            line,
            observed = aggregate.observed_tracks(),
            expected = aggregate.header.nr_of_tracks,
            "appended track record"
        );

        if aggregate.is_complete() {
            stats.storms_emitted += 1;
            return Ok(Some(aggregate));
        }

        self.open = Some(aggregate);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_record(storm_id: &str, name: &str, nr_of_tracks: usize) -> StringRecord {
        StringRecord::from(vec![
            storm_id.to_string(),
            name.to_string(),
            nr_of_tracks.to_string(),
            String::new(),
        ])
    }

    fn track_record(date: &str, time: &str) -> StringRecord {
        let mut fields = vec![
            date.to_string(),
            time.to_string(),
            "".to_string(),
            "HU".to_string(),
            "28.0N".to_string(),
            "94.8W".to_string(),
            "80".to_string(),
            "961".to_string(),
        ];
        fields.extend(std::iter::repeat("0".to_string()).take(12));
        fields.push("-999".to_string());
        StringRecord::from(fields)
    }

    #[test]
    fn test_emits_exactly_when_declared_count_reached() {
        let mut assembler = StormAssembler::new();
        let mut stats = ParseStats::new();

        assert!(
            assembler
                .feed(&header_record("AL011851", "UNNAMED", 2), 1, &mut stats)
                .unwrap()
                .is_none()
        );
        assert!(
            assembler
                .feed(&track_record("18510625", "0000"), 2, &mut stats)
                .unwrap()
                .is_none()
        );

        let emitted = assembler
            .feed(&track_record("18510625", "0600"), 3, &mut stats)
            .unwrap()
            .expect("second track completes the storm");

        assert_eq!(emitted.header.nr_of_tracks, 2);
        assert_eq!(emitted.tracks.len(), 2);
        // Input order preserved
        assert_eq!(emitted.tracks[0].date_time.to_string(), "1851-06-25 00:00:00");
        assert_eq!(emitted.tracks[1].date_time.to_string(), "1851-06-25 06:00:00");
        assert!(!assembler.has_open_aggregate());
        assert_eq!(stats.storms_emitted, 1);
    }

    #[test]
    fn test_zero_track_header_emits_immediately() {
        let mut assembler = StormAssembler::new();
        let mut stats = ParseStats::new();

        let emitted = assembler
            .feed(&header_record("AL021851", "UNNAMED", 0), 1, &mut stats)
            .unwrap()
            .expect("zero declared tracks emits at once");

        assert!(emitted.tracks.is_empty());
        assert_eq!(emitted.header.nr_of_tracks, 0);
        assert!(!assembler.has_open_aggregate());
    }

    #[test]
    fn test_orphan_track_is_rejected_without_emission() {
        let mut assembler = StormAssembler::new();
        let mut stats = ParseStats::new();

        let err = assembler
            .feed(&track_record("18510625", "0000"), 1, &mut stats)
            .unwrap_err();

        assert!(matches!(err, Error::OrphanTrack { line: 1 }));
        assert_eq!(stats.orphan_tracks, 1);
        assert_eq!(stats.storms_emitted, 0);
        assert!(!assembler.has_open_aggregate());
    }

    #[test]
    fn test_premature_header_drops_partial_aggregate() {
        let mut assembler = StormAssembler::new();
        let mut stats = ParseStats::new();

        assembler
            .feed(&header_record("AL011851", "UNNAMED", 3), 1, &mut stats)
            .unwrap();
        assembler
            .feed(&track_record("18510625", "0000"), 2, &mut stats)
            .unwrap();

        // New header arrives with 1 of 3 tracks accumulated
        assert!(
            assembler
                .feed(&header_record("AL021851", "UNNAMED", 1), 3, &mut stats)
                .unwrap()
                .is_none()
        );
        assert_eq!(stats.protocol_violations, 1);
        assert_eq!(assembler.open_storm_id().as_deref(), Some("AL021851"));

        // The replacement storm still completes normally
        let emitted = assembler
            .feed(&track_record("18510626", "0000"), 4, &mut stats)
            .unwrap()
            .expect("replacement storm completes");
        assert_eq!(emitted.header.storm_id(), "AL021851");
        assert_eq!(emitted.tracks.len(), 1);
        // The abandoned partial was never emitted
        assert_eq!(stats.storms_emitted, 1);
    }

    #[test]
    fn test_decode_failure_leaves_aggregate_intact() {
        let mut assembler = StormAssembler::new();
        let mut stats = ParseStats::new();

        assembler
            .feed(&header_record("AL011851", "UNNAMED", 1), 1, &mut stats)
            .unwrap();

        // Malformed wind speed on an otherwise track-shaped line
        let mut fields: Vec<String> = track_record("18510625", "0000")
            .iter()
            .map(|s| s.to_string())
            .collect();
        fields[6] = "NA".to_string();
        let bad: StringRecord = fields.into();

        let err = assembler.feed(&bad, 2, &mut stats).unwrap_err();
        assert!(matches!(err, Error::Decode { line: 2, .. }));
        assert!(assembler.has_open_aggregate());

        // A subsequent valid track still completes the storm
        let emitted = assembler
            .feed(&track_record("18510625", "0600"), 3, &mut stats)
            .unwrap()
            .expect("valid track completes the storm");
        assert_eq!(emitted.tracks.len(), 1);
    }

    #[test]
    fn test_unrecognized_line_is_ignored() {
        let mut assembler = StormAssembler::new();
        let mut stats = ParseStats::new();

        assembler
            .feed(&header_record("AL011851", "UNNAMED", 1), 1, &mut stats)
            .unwrap();

        let odd = StringRecord::from(vec!["a", "b", "c"]);
        assert!(assembler.feed(&odd, 2, &mut stats).unwrap().is_none());
        assert_eq!(stats.unrecognized_lines, 1);
        assert!(assembler.has_open_aggregate());
    }
}
