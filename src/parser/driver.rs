//! Core HURDAT2 parser implementation
//!
//! This module provides the main parser orchestration: reading the
//! comma-delimited line stream, feeding each record through the assembler,
//! and handing completed storm aggregates to the output sink in input order.

use std::io::Read;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::models::StormAggregate;
use crate::parser::assembler::StormAssembler;
use crate::parser::stats::ParseStats;
use crate::{Error, Result};

/// Stateful record-reassembly parser for the HURDAT2 line stream
///
/// The parser makes a single pass over the input:
/// - splits each line into whitespace-trimmed, comma-separated fields
/// - classifies it by field count and decodes it
/// - accumulates track records under their owning header and emits each
///   complete aggregate to the sink exactly once
///
/// Per-line failures are logged, counted and skipped; they never corrupt the
/// in-progress aggregate. Only I/O failures and sink failures other than a
/// broken pipe terminate the pass.
#[derive(Debug, Default)]
pub struct Hurdat2Parser {
    cancellation_token: CancellationToken,
}

impl Hurdat2Parser {
    /// Create a new parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser that stops consuming input when the token is cancelled
    ///
    /// Cancellation is cooperative at the line-read boundary: the line being
    /// processed finishes, nothing further is read, and no partial aggregate
    /// is emitted.
    pub fn with_cancellation(cancellation_token: CancellationToken) -> Self {
        Self { cancellation_token }
    }

    /// Parse a HURDAT2 stream, emitting completed aggregates to `sink`
    ///
    /// A sink failure caused by a closed downstream pipe stops consumption
    /// cleanly, as does cancellation of the parser's token; the statistics
    /// gathered so far are still returned.
    pub fn parse<R, F>(&self, input: R, mut sink: F) -> Result<ParseStats>
    where
        R: Read,
        F: FnMut(&StormAggregate) -> Result<()>,
    {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);

        let mut assembler = StormAssembler::new();
        let mut stats = ParseStats::new();
        let mut records = reader.records();

        loop {
            if self.cancellation_token.is_cancelled() {
                info!("cancellation requested, stopping");
                return Ok(stats);
            }
            let Some(result) = records.next() else { break };
            stats.total_lines += 1;

            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    let line = e
                        .position()
                        .map(|p| p.line())
                        .unwrap_or(stats.total_lines as u64);
                    let err = Error::record_reading(line, "unreadable record", Some(e));
                    warn!("{}", err);
                    stats.lines_skipped += 1;
                    stats.errors.push(err.to_string());
                    continue;
                }
            };

            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(stats.total_lines as u64);
            debug!(line, fields = record.len(), "read record");

            match assembler.feed(&record, line, &mut stats) {
                Ok(Some(aggregate)) => {
                    if let Err(e) = sink(&aggregate) {
                        if is_broken_pipe(&e) {
                            info!("output sink closed, stopping");
                            return Ok(stats);
                        }
                        return Err(e);
                    }
                }
                Ok(None) => {}
                Err(e) if e.is_per_line() => {
                    // Skip counters were already recorded by the assembler
                    warn!("{}", e);
                    stats.errors.push(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        if let Some(storm_id) = assembler.open_storm_id() {
            let message = format!(
                "input ended while storm {} was still accumulating; partial aggregate discarded",
                storm_id
            );
            warn!("{}", message);
            stats.errors.push(message);
        }

        info!(
            storms = stats.storms_emitted,
            tracks = stats.tracks_parsed,
            skipped = stats.lines_skipped,
            "finished parsing {} lines",
            stats.total_lines
        );

        Ok(stats)
    }

    /// Parse a stream and collect the emitted aggregates
    ///
    /// Convenience wrapper for callers that want the storms in memory rather
    /// than streamed to a sink.
    pub fn parse_to_vec<R: Read>(&self, input: R) -> Result<(Vec<StormAggregate>, ParseStats)> {
        let mut storms = Vec::new();
        let stats = self.parse(input, |aggregate| {
            storms.push(aggregate.clone());
            Ok(())
        })?;
        Ok((storms, stats))
    }
}

/// Whether an error is a broken-pipe condition on the output side
fn is_broken_pipe(error: &Error) -> bool {
    matches!(
        error,
        Error::Io { source, .. } if source.kind() == std::io::ErrorKind::BrokenPipe
    )
}
