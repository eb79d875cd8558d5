#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Decoded contents of a TCX document
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TcxActivity {
    /// `Sport` attribute of the first `Activity` element, if present
    pub sport: Option<String>,
    pub trackpoints: Vec<TcxTrackpoint>,
}

/// One `Trackpoint` element from a TCX document.
///
/// Coordinates stay absent when the element has no `Position` child or the
/// position is missing either coordinate; such points are dropped during
/// normalization and never count as valid.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TcxTrackpoint {
    /// Latitude in decimal degrees
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees
    pub longitude: Option<f64>,
    /// Altitude in meters
    pub altitude: Option<f64>,
    /// Verbatim `Time` element text, passed through to output unreformatted
    pub time: Option<String>,
}
