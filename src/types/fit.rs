use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A decoded FIT data message of one of the kinds the converter cares about.
///
/// Messages of any other global number are skipped during decoding and never
/// surface here.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FitMessage {
    Session(SessionMessage),
    Record(RecordMessage),
}

/// Activity summary data from session messages (global message 18)
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionMessage {
    /// Raw sport enum value; absent when the field is missing or invalid
    pub sport: Option<u8>,
}

impl SessionMessage {
    /// Resolve the raw sport enum to its FIT profile name.
    ///
    /// Unknown enum values resolve to `None`, which downstream classification
    /// treats the same as an absent sport field.
    pub fn sport_name(&self) -> Option<&'static str> {
        self.sport.and_then(sport_name)
    }
}

/// One timestamped sample from record messages (global message 20)
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecordMessage {
    /// Latitude in raw semicircle units
    pub position_lat: Option<i32>,
    /// Longitude in raw semicircle units
    pub position_long: Option<i32>,
    /// Primary altitude in meters (scale/offset already applied)
    pub altitude: Option<f64>,
    /// Enhanced altitude in meters, used when the primary field is absent
    pub enhanced_altitude: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl RecordMessage {
    /// Elevation in meters: primary altitude, falling back to enhanced altitude
    pub fn elevation(&self) -> Option<f64> {
        self.altitude.or(self.enhanced_altitude)
    }
}

/// Map a FIT sport enum value to its profile name
pub fn sport_name(value: u8) -> Option<&'static str> {
    let name = match value {
        0 => "generic",
        1 => "running",
        2 => "cycling",
        3 => "transition",
        4 => "fitness_equipment",
        5 => "swimming",
        6 => "basketball",
        7 => "soccer",
        8 => "tennis",
        9 => "american_football",
        10 => "training",
        11 => "walking",
        12 => "cross_country_skiing",
        13 => "alpine_skiing",
        14 => "snowboarding",
        15 => "rowing",
        16 => "mountaineering",
        17 => "hiking",
        18 => "multisport",
        19 => "paddling",
        20 => "flying",
        21 => "e_biking",
        22 => "motorcycling",
        23 => "boating",
        24 => "driving",
        25 => "golf",
        26 => "hang_gliding",
        27 => "horseback_riding",
        28 => "hunting",
        29 => "fishing",
        30 => "inline_skating",
        31 => "rock_climbing",
        32 => "sailing",
        33 => "ice_skating",
        34 => "sky_diving",
        35 => "snowshoeing",
        36 => "snowmobiling",
        37 => "stand_up_paddleboarding",
        38 => "surfing",
        39 => "wakeboarding",
        40 => "water_skiing",
        41 => "kayaking",
        42 => "rafting",
        43 => "windsurfing",
        44 => "kitesurfing",
        45 => "tactical",
        46 => "jumpmaster",
        47 => "boxing",
        48 => "floor_climbing",
        254 => "all",
        _ => return None,
    };
    Some(name)
}
