//! Track Converter Library
//!
//! A Rust library for converting FIT and TCX activity recordings into GPX 1.1
//! track files. This library provides the full per-file conversion pipeline
//! plus the individual decoding, classification, normalization and export
//! stages for callers that want them separately.
//!
//! # Features
//!
//! - **`cli`** (default): Build the command-line batch converter binary
//! - **`serde`**: Enable serialization/deserialization of the data types
//!
//! # Quick Start
//!
//! Convert one file and inspect the outcome:
//! ```rust,no_run
//! use track_converter::{convert_file, ConvertOptions, Outcome};
//! use std::path::Path;
//!
//! let options = ConvertOptions::new("output");
//! match convert_file(Path::new("rides/morning.fit"), &options).unwrap() {
//!     Outcome::Converted { output_name, activity_type, .. } => {
//!         println!("{} ({})", output_name, activity_type);
//!     }
//!     Outcome::Skipped(reason) => println!("skipped: {}", reason),
//! }
//! ```
//!
//! Decode a FIT file without converting it:
//! ```rust,no_run
//! use track_converter::{parse_fit_file, FitMessage};
//! use std::path::Path;
//!
//! let messages = parse_fit_file(Path::new("rides/morning.fit"), false).unwrap();
//! let records = messages
//!     .iter()
//!     .filter(|m| matches!(m, FitMessage::Record(_)))
//!     .count();
//! println!("{} record messages", records);
//! ```
//!
//! # Public API
//!
//! ## Conversion Pipeline
//! - [`convert_file`] - Convert one FIT/TCX file to GPX
//! - [`ConvertOptions`] - Output directory, skip set and debug switch
//! - [`Outcome`] / [`SkipReason`] - Typed per-file results
//!
//! ## Decoders
//! - [`parse_fit_file`] / [`parse_fit_bytes`] - FIT container decoding
//! - [`parse_tcx_file`] / [`parse_tcx_str`] - TCX document decoding
//!
//! ## Normalization
//! - [`normalize_track`] - Raw points to a canonical [`Track`]
//! - [`CoordinateUnit`] - Semicircle vs. degree coordinate scaling
//! - [`classify_activity`] - Sport string to title-cased label
//!
//! ## Export
//! - [`export_track`] - Write a track as a pretty-printed GPX file
//! - [`render_gpx`] - Render a track to an in-memory GPX document
//! - [`output_file_name`] - The timestamp-prefixed naming policy

// Module declarations
pub mod classify;
pub mod convert;
#[cfg(feature = "cli")]
pub mod discover;
pub mod error;
pub mod export;
pub mod normalize;
pub mod parser;
pub mod types;

// Re-export everything from modules for convenience
pub use classify::*;
pub use convert::*;
#[cfg(feature = "cli")]
pub use discover::*;
pub use error::*;
pub use export::*;
pub use normalize::*;
pub use parser::*;
pub use types::*;
