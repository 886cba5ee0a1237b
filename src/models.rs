//! Data models for HURDAT2 processing
//!
//! This module contains the core data structures for representing one storm's
//! header, its track observations, and the completed aggregate emitted as
//! JSON. Field names mirror the emitted JSON shape.

use crate::constants::OUTPUT_DATETIME_FORMAT;
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

// =============================================================================
// Storm Header
// =============================================================================

/// One storm's identity and expected shape, decoded from a header record
///
/// `nr_of_tracks` is the track count declared by the input; it is fixed at
/// creation and governs when the aggregate is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StormHeader {
    /// Two-character basin code (e.g. "AL", "EP")
    pub basin: String,

    /// Cyclone number within the basin and year
    pub cyclone_nr: i32,

    /// Storm year
    pub year: i32,

    /// Storm name, verbatim from the input (e.g. "KATRINA", "UNNAMED")
    pub name: String,

    /// Number of track records declared for this storm
    pub nr_of_tracks: usize,
}

impl StormHeader {
    /// Reconstruct the fixed-width storm identifier (e.g. "AL011851")
    pub fn storm_id(&self) -> String {
        format!("{}{:02}{:04}", self.basin, self.cyclone_nr, self.year)
    }
}

// =============================================================================
// Track Record
// =============================================================================

/// Maximum wind extent (nautical miles) per compass quadrant at one threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindRadii {
    #[serde(rename = "NE")]
    pub ne: i32,
    #[serde(rename = "SE")]
    pub se: i32,
    #[serde(rename = "SW")]
    pub sw: i32,
    #[serde(rename = "NW")]
    pub nw: i32,
}

/// One observation belonging to exactly one storm aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRecord {
    /// Observation time at second precision (seconds always zero)
    #[serde(serialize_with = "serialize_iso8601")]
    pub date_time: NaiveDateTime,

    /// Record identifier code (landfall, intensity peak, etc.; may be empty)
    pub identifier: String,

    /// Storm status code (e.g. "HU", "TS", "TD")
    pub status: String,

    /// Latitude in signed decimal degrees (south negative)
    pub latitude: f64,

    /// Longitude in signed decimal degrees (west negative)
    pub longitude: f64,

    /// Maximum sustained wind speed in knots
    pub max_wind_speed: i32,

    /// Minimum central pressure in millibars
    pub min_pressure: i32,

    /// Wind radii at the 34 kt threshold
    #[serde(rename = "34_kt_wind_radii")]
    pub wind_radii_34_kt: WindRadii,

    /// Wind radii at the 50 kt threshold
    #[serde(rename = "50_kt_wind_radii")]
    pub wind_radii_50_kt: WindRadii,

    /// Wind radii at the 68 kt threshold
    #[serde(rename = "68_kt_wind_radii")]
    pub wind_radii_68_kt: WindRadii,
}

/// Serialize a timestamp as `YYYY-MM-DDTHH:MM:SS`, matching the reference
/// output shape exactly (no fractional seconds, no timezone suffix)
fn serialize_iso8601<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&dt.format(OUTPUT_DATETIME_FORMAT))
}

// =============================================================================
// Storm Aggregate
// =============================================================================

/// The complete, emitted unit: one header with all its declared tracks
///
/// Created when a header record is classified, grown by appending tracks in
/// input order, and emitted exactly once when the track count reaches the
/// header's declared total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StormAggregate {
    #[serde(flatten)]
    pub header: StormHeader,

    /// Track observations in input order
    pub tracks: Vec<TrackRecord>,
}

impl StormAggregate {
    /// Create an empty aggregate for a newly classified header
    pub fn new(header: StormHeader) -> Self {
        let capacity = header.nr_of_tracks;
        Self {
            header,
            tracks: Vec::with_capacity(capacity),
        }
    }

    /// Number of tracks accumulated so far
    pub fn observed_tracks(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the declared track count has been reached
    pub fn is_complete(&self) -> bool {
        self.tracks.len() == self.header.nr_of_tracks
    }
}
