//! Per-file conversion pipeline
//!
//! Dispatches one input file through decode → classify → normalize →
//! serialize and reports a typed outcome. Each call is fully self-contained:
//! no state is shared between files, so callers are free to run conversions
//! in parallel.

use crate::classify::{classify_activity, is_filtered, DEFAULT_SKIP_TYPES};
use crate::error::Result;
use crate::export::export_track;
use crate::normalize::{
    normalize_track, raw_point_from_record, raw_point_from_trackpoint, CoordinateUnit,
};
use crate::parser::fit::parse_fit_file;
use crate::parser::tcx::parse_tcx_file;
use crate::types::{FitMessage, Track};
use std::fmt;
use std::path::{Path, PathBuf};

/// Options for a conversion run
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Directory output files are written into
    pub output_dir: PathBuf,
    /// Activity labels to skip, matched case-insensitively
    pub skip_types: Vec<String>,
    /// Enable verbose decode output
    pub debug: bool,
}

impl ConvertOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            skip_types: DEFAULT_SKIP_TYPES.iter().map(|s| s.to_string()).collect(),
            debug: false,
        }
    }
}

/// Why a file produced no output without being an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// File extension is not a supported source format
    UnsupportedType(String),
    /// Detected activity label is in the configured skip set
    FilteredActivity(String),
    /// No sample survived coordinate-presence filtering
    NoGpsPoints,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedType(ext) => write!(f, "unsupported file type: .{}", ext),
            SkipReason::FilteredActivity(label) => write!(f, "activity type: {}", label),
            SkipReason::NoGpsPoints => write!(f, "no GPS points"),
        }
    }
}

/// Result of converting one input file
#[derive(Debug, Clone)]
pub enum Outcome {
    Converted {
        output_path: PathBuf,
        output_name: String,
        activity_type: String,
    },
    Skipped(SkipReason),
}

/// Convert a single FIT or TCX file to GPX.
///
/// Skips (unsupported extension, filtered activity, empty track) come back as
/// `Outcome::Skipped`; decode and I/O failures are errors for the caller's
/// task boundary to report.
pub fn convert_file(input: &Path, options: &ConvertOptions) -> Result<Outcome> {
    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "fit" => convert_fit(input, options),
        "tcx" => convert_tcx(input, options),
        _ => Ok(Outcome::Skipped(SkipReason::UnsupportedType(extension))),
    }
}

fn convert_fit(input: &Path, options: &ConvertOptions) -> Result<Outcome> {
    let messages = parse_fit_file(input, options.debug)?;

    let sport = messages.iter().find_map(|m| match m {
        FitMessage::Session(session) => session.sport_name(),
        _ => None,
    });
    let activity_type = classify_activity(sport);

    let raw_points = messages.iter().filter_map(|m| match m {
        FitMessage::Record(record) => Some(raw_point_from_record(record)),
        _ => None,
    });

    finish(
        input,
        activity_type,
        raw_points,
        CoordinateUnit::Semicircles,
        options,
    )
}

fn convert_tcx(input: &Path, options: &ConvertOptions) -> Result<Outcome> {
    let activity = parse_tcx_file(input)?;

    let activity_type = classify_activity(activity.sport.as_deref());
    let raw_points = activity.trackpoints.iter().map(raw_point_from_trackpoint);

    finish(
        input,
        activity_type,
        raw_points,
        CoordinateUnit::Degrees,
        options,
    )
}

/// Shared tail of both pipelines: skip policy, normalization, serialization
fn finish<I>(
    input: &Path,
    activity_type: String,
    raw_points: I,
    unit: CoordinateUnit,
    options: &ConvertOptions,
) -> Result<Outcome>
where
    I: IntoIterator<Item = crate::types::RawPoint>,
{
    if is_filtered(&activity_type, &options.skip_types) {
        return Ok(Outcome::Skipped(SkipReason::FilteredActivity(activity_type)));
    }

    let source_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");
    let track: Track = normalize_track(source_name, &activity_type, raw_points, unit);

    if !track.has_points() {
        return Ok(Outcome::Skipped(SkipReason::NoGpsPoints));
    }

    if options.debug {
        println!(
            "{}: {} points, activity {}",
            source_name,
            track.point_count(),
            track.activity_type
        );
    }

    let output_path = export_track(&track, &options.output_dir)?;
    let output_name = output_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    Ok(Outcome::Converted {
        output_path,
        output_name,
        activity_type: track.activity_type,
    })
}
