//! Application constants for the HURDAT2 processor
//!
//! Field layouts and subfield widths follow the NOAA HURDAT2 format
//! description (hurdat2-format-atlantic.pdf).

// =============================================================================
// Record Shapes
// =============================================================================

/// Field count that identifies a storm header record
pub const HEADER_FIELD_COUNT: usize = 4;

/// Field count that identifies a track (observation) record
pub const TRACK_FIELD_COUNT: usize = 21;

// =============================================================================
// Header Identifier Layout
// =============================================================================

/// The storm identifier is fixed-width: basin (2) + cyclone number (2) + year (4)
pub const STORM_ID_LEN: usize = 8;

/// Character range of the basin code within the storm identifier
pub const BASIN_RANGE: std::ops::Range<usize> = 0..2;

/// Character range of the cyclone number within the storm identifier
pub const CYCLONE_NR_RANGE: std::ops::Range<usize> = 2..4;

/// Character range of the year within the storm identifier
pub const YEAR_RANGE: std::ops::Range<usize> = 4..8;

// =============================================================================
// Track Record Layout
// =============================================================================

/// Index of the first wind-radii field within a track record
pub const WIND_RADII_FIRST_FIELD: usize = 8;

/// Wind speed thresholds (knots) carried by every track record, in field order
pub const WIND_RADII_THRESHOLDS_KT: [u16; 3] = [34, 50, 68];

/// Compass quadrants in field order within each threshold group
pub const QUADRANTS: [&str; 4] = ["NE", "SE", "SW", "NW"];

// =============================================================================
// Date and Time Formats
// =============================================================================

/// HURDAT2 date subfield format (8 digits)
pub const HURDAT2_DATE_FORMAT: &str = "%Y%m%d";

/// HURDAT2 time subfield format (4 digits, hour and minute)
pub const HURDAT2_TIME_FORMAT: &str = "%H%M";

/// ISO-8601 shape used for emitted timestamps
pub const OUTPUT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
