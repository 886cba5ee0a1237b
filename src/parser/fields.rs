//! Field decoding for HURDAT2 records
//!
//! Pure conversion functions from raw textual subfields into typed values.
//! Every decoder states its exact expected shape and fails with a decode
//! error rather than defaulting; a failure never touches parser state.

use crate::constants::{
    BASIN_RANGE, CYCLONE_NR_RANGE, HEADER_FIELD_COUNT, HURDAT2_DATE_FORMAT, HURDAT2_TIME_FORMAT,
    QUADRANTS, STORM_ID_LEN, TRACK_FIELD_COUNT, WIND_RADII_FIRST_FIELD, WIND_RADII_THRESHOLDS_KT,
    YEAR_RANGE,
};
use crate::models::{StormHeader, TrackRecord, WindRadii};
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::StringRecord;

/// Decode a signed geographic coordinate such as `29.3N` or `70.2W`
///
/// The last character must be one of N/S/E/W; the prefix is a non-negative
/// decimal magnitude. South and west are negative.
pub fn parse_position(value: &str, field_name: &str, line: u64) -> Result<f64> {
    let (magnitude, suffix) = match value.char_indices().last() {
        Some((idx, c)) => (&value[..idx], c),
        None => {
            return Err(Error::decode(
                line,
                format!("Empty value for {}", field_name),
            ));
        }
    };

    let sign = match suffix {
        'N' | 'E' => 1.0,
        'S' | 'W' => -1.0,
        other => {
            return Err(Error::decode(
                line,
                format!(
                    "Invalid hemisphere suffix for {}: '{}' (expected N, S, E or W, got '{}')",
                    field_name, value, other
                ),
            ));
        }
    };

    let degrees: f64 = magnitude.parse().map_err(|_| {
        Error::decode(
            line,
            format!(
                "Invalid coordinate magnitude for {}: '{}'",
                field_name, value
            ),
        )
    })?;

    if degrees < 0.0 {
        return Err(Error::decode(
            line,
            format!(
                "Negative coordinate magnitude for {}: '{}' (sign comes from the suffix)",
                field_name, value
            ),
        ));
    }

    Ok(sign * degrees)
}

/// Decode the split `YYYYMMDD` + `HHMM` subfields into one timestamp
///
/// Seconds are always zero; impossible calendar dates and times are rejected.
pub fn parse_timestamp(date: &str, time: &str, line: u64) -> Result<NaiveDateTime> {
    if date.len() != 8 {
        return Err(Error::decode(
            line,
            format!("Invalid date field: '{}' (expected 8 digits YYYYMMDD)", date),
        ));
    }
    if time.len() != 4 {
        return Err(Error::decode(
            line,
            format!("Invalid time field: '{}' (expected 4 digits HHMM)", time),
        ));
    }

    let date = NaiveDate::parse_from_str(date, HURDAT2_DATE_FORMAT)
        .map_err(|e| Error::decode(line, format!("Invalid date '{}': {}", date, e)))?;
    let time = NaiveTime::parse_from_str(time, HURDAT2_TIME_FORMAT)
        .map_err(|e| Error::decode(line, format!("Invalid time '{}': {}", time, e)))?;

    Ok(NaiveDateTime::new(date, time))
}

/// Decode a 4-field header record into a [`StormHeader`]
///
/// Field 0 is the fixed-width storm identifier (basin, cyclone number, year),
/// field 1 the name, field 2 the declared track count. Field 3 is the empty
/// remnant of the trailing comma.
pub fn parse_header(record: &StringRecord, line: u64) -> Result<StormHeader> {
    if record.len() != HEADER_FIELD_COUNT {
        return Err(Error::decode(
            line,
            format!(
                "Header record has {} fields (expected {})",
                record.len(),
                HEADER_FIELD_COUNT
            ),
        ));
    }

    let storm_id = required_field(record, 0, "storm identifier", line)?;
    if storm_id.len() < STORM_ID_LEN || !storm_id.is_ascii() {
        return Err(Error::decode(
            line,
            format!(
                "Invalid storm identifier '{}' (expected at least {} ASCII characters)",
                storm_id, STORM_ID_LEN
            ),
        ));
    }

    let basin = storm_id[BASIN_RANGE].to_string();
    let cyclone_nr = parse_subfield_i32(&storm_id[CYCLONE_NR_RANGE], "cyclone number", line)?;
    let year = parse_subfield_i32(&storm_id[YEAR_RANGE], "year", line)?;
    let name = required_field(record, 1, "storm name", line)?.to_string();
    let nr_of_tracks: usize = required_field(record, 2, "track count", line)?
        .parse()
        .map_err(|_| {
            Error::decode(
                line,
                format!(
                    "Invalid track count: '{}' (expected a non-negative integer)",
                    record.get(2).unwrap_or_default()
                ),
            )
        })?;

    Ok(StormHeader {
        basin,
        cyclone_nr,
        year,
        name,
        nr_of_tracks,
    })
}

/// Decode a 21-field track record into a [`TrackRecord`]
///
/// Fields 8..=19 form the 3x4 wind-radii grid, row-major over the 34/50/68 kt
/// thresholds and the NE/SE/SW/NW quadrants. Field 20 is required by the
/// format but its value is not retained.
pub fn parse_track(record: &StringRecord, line: u64) -> Result<TrackRecord> {
    if record.len() != TRACK_FIELD_COUNT {
        return Err(Error::decode(
            line,
            format!(
                "Track record has {} fields (expected {})",
                record.len(),
                TRACK_FIELD_COUNT
            ),
        ));
    }

    let date = required_field(record, 0, "date", line)?;
    let time = required_field(record, 1, "time", line)?;
    let date_time = parse_timestamp(date, time, line)?;

    let identifier = record.get(2).unwrap_or_default().to_string();
    let status = record.get(3).unwrap_or_default().to_string();

    let latitude = parse_position(required_field(record, 4, "latitude", line)?, "latitude", line)?;
    let longitude = parse_position(
        required_field(record, 5, "longitude", line)?,
        "longitude",
        line,
    )?;

    let max_wind_speed = parse_field_i32(record, 6, "max wind speed", line)?;
    let min_pressure = parse_field_i32(record, 7, "min pressure", line)?;

    let mut grid = [[0i32; QUADRANTS.len()]; WIND_RADII_THRESHOLDS_KT.len()];
    for (t, threshold) in WIND_RADII_THRESHOLDS_KT.iter().enumerate() {
        for (q, quadrant) in QUADRANTS.iter().enumerate() {
            let index = WIND_RADII_FIRST_FIELD + t * QUADRANTS.len() + q;
            let name = format!("{} kt {} wind radius", threshold, quadrant);
            grid[t][q] = parse_field_i32(record, index, &name, line)?;
        }
    }

    Ok(TrackRecord {
        date_time,
        identifier,
        status,
        latitude,
        longitude,
        max_wind_speed,
        min_pressure,
        wind_radii_34_kt: radii_from_row(&grid[0]),
        wind_radii_50_kt: radii_from_row(&grid[1]),
        wind_radii_68_kt: radii_from_row(&grid[2]),
    })
}

fn radii_from_row(row: &[i32; 4]) -> WindRadii {
    WindRadii {
        ne: row[0],
        se: row[1],
        sw: row[2],
        nw: row[3],
    }
}

/// Get a required field value from a record
fn required_field<'a>(
    record: &'a StringRecord,
    index: usize,
    field_name: &str,
    line: u64,
) -> Result<&'a str> {
    record.get(index).ok_or_else(|| {
        Error::decode(
            line,
            format!("Missing required field '{}' (index {})", field_name, index),
        )
    })
}

/// Parse a required i32 field from a record
fn parse_field_i32(record: &StringRecord, index: usize, field_name: &str, line: u64) -> Result<i32> {
    parse_subfield_i32(required_field(record, index, field_name, line)?, field_name, line)
}

fn parse_subfield_i32(value: &str, field_name: &str, line: u64) -> Result<i32> {
    value.parse::<i32>().map_err(|_| {
        Error::decode(
            line,
            format!("Invalid integer for {}: '{}'", field_name, value),
        )
    })
}
