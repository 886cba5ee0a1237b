//! HURDAT2 Processor Library
//!
//! A Rust library for converting NOAA HURDAT2 hurricane best-track data
//! from its fixed-format textual record stream into JSON Lines output.
//!
//! This library provides tools for:
//! - Classifying the two interleaved HURDAT2 record shapes (header and track)
//! - Decoding positional fields: signed coordinates, split date/time values,
//!   fixed-width storm identifiers, and quadrant wind-radii grids
//! - Reassembling track records under their owning storm header and emitting
//!   one complete aggregate per storm, exactly once
//! - Per-line error handling that never corrupts an in-progress aggregate

pub mod constants;
pub mod models;

// Core parsing modules
pub mod parser {
    pub mod assembler;
    pub mod classifier;
    pub mod fields;
    pub mod stats;

    mod driver;
    pub use driver::Hurdat2Parser;
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use models::{StormAggregate, StormHeader, TrackRecord, WindRadii};
pub use parser::Hurdat2Parser;

/// Result type alias for the HURDAT2 processor
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for HURDAT2 processing operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Input source cannot be opened or read
    #[error("Input unavailable: {path}: {message}")]
    InputUnavailable { path: String, message: String },

    /// Record reading error from the underlying CSV reader
    #[error("Record reading error at line {line}: {message}")]
    RecordReading {
        line: u64,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// A field or subfield failed its expected shape
    #[error("Decode error at line {line}: {message}")]
    Decode { line: u64, message: String },

    /// A track record arrived with no open storm aggregate
    #[error("Orphan track at line {line}: no storm header is open")]
    OrphanTrack { line: u64 },

    /// A new storm header arrived before the open aggregate was complete
    #[error(
        "Protocol violation at line {line}: new header while {observed} of {expected} \
         tracks were accumulated for {storm_id}"
    )]
    ProtocolViolation {
        line: u64,
        storm_id: String,
        observed: usize,
        expected: usize,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an input-unavailable error
    pub fn input_unavailable(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InputUnavailable {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a record reading error with context
    pub fn record_reading(
        line: u64,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::RecordReading {
            line,
            message: message.into(),
            source,
        }
    }

    /// Create a decode error for a single line
    pub fn decode(line: u64, message: impl Into<String>) -> Self {
        Self::Decode {
            line,
            message: message.into(),
        }
    }

    /// Create an orphan track error
    pub fn orphan_track(line: u64) -> Self {
        Self::OrphanTrack { line }
    }

    /// Create a protocol violation error
    pub fn protocol_violation(
        line: u64,
        storm_id: impl Into<String>,
        observed: usize,
        expected: usize,
    ) -> Self {
        Self::ProtocolViolation {
            line,
            storm_id: storm_id.into(),
            observed,
            expected,
        }
    }

    /// Create a processing interrupted error
    pub fn interrupted(reason: impl Into<String>) -> Self {
        Self::Interrupted {
            reason: reason.into(),
        }
    }

    /// Whether this error is localized to a single input line
    ///
    /// Per-line errors are reported and the line skipped; anything else
    /// terminates the run.
    pub fn is_per_line(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. }
                | Self::OrphanTrack { .. }
                | Self::ProtocolViolation { .. }
                | Self::RecordReading { .. }
        )
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Json {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}
