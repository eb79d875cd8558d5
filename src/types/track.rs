use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Timestamp of a track point: the text that goes into the output document,
/// plus the parsed instant when one could be recovered.
///
/// FIT sources always carry an instant (the text is rendered from it); TCX
/// sources pass their time text through verbatim and the instant is a
/// best-effort parse used only for first-timestamp tracking.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointTime {
    pub text: String,
    pub instant: Option<DateTime<Utc>>,
}

/// One decoded sample before normalization.
///
/// Coordinates are in source-specific units: semicircles for FIT, decimal
/// degrees for TCX. Elevation is always meters.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawPoint {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
    pub time: Option<PointTime>,
}

/// One normalized output sample. Latitude and longitude are always both
/// present; a raw point missing either coordinate is never turned into one.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CanonicalPoint {
    /// Decimal degrees, [-90, 90]
    pub latitude: f64,
    /// Decimal degrees, [-180, 180]
    pub longitude: f64,
    /// Meters
    pub elevation: Option<f64>,
    pub time: Option<PointTime>,
}

/// Normalized track from one source file
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Track {
    /// Source file name, used for the output `name` element
    pub source_name: String,
    /// Title-cased activity label, `"Unknown"` when undetectable
    pub activity_type: String,
    pub points: Vec<CanonicalPoint>,
    /// Instant of the first point that carried a parseable timestamp
    pub start_time: Option<DateTime<Utc>>,
}

impl Track {
    /// Whether the track has at least one valid point
    pub fn has_points(&self) -> bool {
        !self.points.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }
}
