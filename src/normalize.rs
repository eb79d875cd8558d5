//! Track normalization
//!
//! Maps decoded samples from either source format into the canonical point
//! sequence: coordinate-presence filtering, unit conversion to decimal
//! degrees, elevation fallback and timestamp carry-through.

use crate::types::{CanonicalPoint, PointTime, RawPoint, RecordMessage, TcxTrackpoint, Track};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Scale from signed 32-bit semicircle units to decimal degrees
pub const SEMICIRCLES_TO_DEGREES: f64 = 180.0 / 2_147_483_648.0;

/// Unit the source encodes coordinates in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateUnit {
    /// FIT position fields: signed fixed-point where a full circle is 2^32
    Semicircles,
    /// TCX coordinates: decimal degrees, used as-is
    Degrees,
}

impl CoordinateUnit {
    pub fn to_degrees(self, raw: f64) -> f64 {
        match self {
            CoordinateUnit::Semicircles => raw * SEMICIRCLES_TO_DEGREES,
            CoordinateUnit::Degrees => raw,
        }
    }
}

/// Raw point from a FIT record message.
///
/// Positions stay in semicircles; the timestamp is rendered to
/// second-precision UTC text here since the binary source has no textual form
/// to pass through.
pub fn raw_point_from_record(record: &RecordMessage) -> RawPoint {
    RawPoint {
        latitude: record.position_lat.map(|v| v as f64),
        longitude: record.position_long.map(|v| v as f64),
        elevation: record.elevation(),
        time: record.timestamp.map(|ts| PointTime {
            text: format_utc_second(ts),
            instant: Some(ts),
        }),
    }
}

/// Raw point from a TCX trackpoint.
///
/// The time text passes through verbatim; the instant is a best-effort parse
/// kept only for first-timestamp tracking, and a failed parse is not an error.
pub fn raw_point_from_trackpoint(tp: &TcxTrackpoint) -> RawPoint {
    RawPoint {
        latitude: tp.latitude,
        longitude: tp.longitude,
        elevation: tp.altitude,
        time: tp.time.as_ref().map(|text| PointTime {
            text: text.clone(),
            instant: parse_instant(text),
        }),
    }
}

/// Build a normalized track from a raw point sequence.
///
/// Points missing either coordinate are dropped; the survivors are converted
/// to decimal degrees. The track's start time is the instant of the first
/// surviving point that carried a parseable timestamp.
pub fn normalize_track<I>(
    source_name: &str,
    activity_type: &str,
    raw_points: I,
    unit: CoordinateUnit,
) -> Track
where
    I: IntoIterator<Item = RawPoint>,
{
    let points: Vec<CanonicalPoint> = raw_points
        .into_iter()
        .filter_map(|raw| {
            let (lat, lon) = match (raw.latitude, raw.longitude) {
                (Some(lat), Some(lon)) => (lat, lon),
                _ => return None,
            };
            Some(CanonicalPoint {
                latitude: unit.to_degrees(lat),
                longitude: unit.to_degrees(lon),
                elevation: raw.elevation,
                time: raw.time,
            })
        })
        .collect();

    let start_time = points
        .iter()
        .find_map(|p| p.time.as_ref().and_then(|t| t.instant));

    Track {
        source_name: source_name.to_string(),
        activity_type: activity_type.to_string(),
        points,
        start_time,
    }
}

/// Render a UTC instant as second-precision ISO-8601 with a `Z` suffix
pub fn format_utc_second(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Best-effort parse of an ISO-8601-like time string.
///
/// Accepts offset-carrying RFC 3339 text and naive `YYYY-MM-DDTHH:MM:SS[.f]`
/// text treated as UTC. Anything else is simply unparseable.
pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
