//! TCX document parsing
//!
//! Pulls the activity sport attribute and the ordered trackpoint sequence out
//! of a TCX file. The document's default namespace is resolved once from the
//! root element and applied uniformly to every element lookup, so documents
//! with and without an `xmlns` declaration decode identically.

use crate::error::{ConvertError, Result};
use crate::types::{TcxActivity, TcxTrackpoint};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Which trackpoint child element text is currently being collected
#[derive(Debug, Clone, Copy, PartialEq)]
enum PointField {
    Latitude,
    Longitude,
    Altitude,
    Time,
}

/// Parse a TCX file from disk
pub fn parse_tcx_file(path: &Path) -> Result<TcxActivity> {
    let reader = NsReader::from_reader(BufReader::new(File::open(path)?));
    parse_tcx_reader(reader)
}

/// Parse a TCX document held in memory
pub fn parse_tcx_str(document: &str) -> Result<TcxActivity> {
    parse_tcx_reader(NsReader::from_reader(document.as_bytes()))
}

fn parse_tcx_reader<R: BufRead>(mut reader: NsReader<R>) -> Result<TcxActivity> {
    let mut buf = Vec::new();

    // Default namespace of the root element; every lookup below must resolve
    // to this same namespace (or to none when the document declares none)
    let mut root_ns: Option<Vec<u8>> = None;
    let mut seen_root = false;

    let mut activity = TcxActivity::default();
    let mut activity_seen = false;

    let mut trackpoint: Option<TcxTrackpoint> = None;
    let mut trackpoint_depth = 0usize;
    let mut in_position = false;
    let mut field: Option<PointField> = None;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let (resolved, local) = reader.resolve_element(e.name());
                if !seen_root {
                    seen_root = true;
                    root_ns = resolved_namespace(resolved);
                } else if namespace_matches(&root_ns, resolved) {
                    match local.as_ref() {
                        b"Activity" if !activity_seen => {
                            activity_seen = true;
                            activity.sport = sport_attribute(&e)?;
                        }
                        b"Trackpoint" if trackpoint.is_none() => {
                            trackpoint = Some(TcxTrackpoint::default());
                            trackpoint_depth = 0;
                            in_position = false;
                        }
                        other => {
                            if trackpoint.is_some() {
                                trackpoint_depth += 1;
                                field = start_point_field(other, trackpoint_depth, in_position);
                                if trackpoint_depth == 1 && other == b"Position" {
                                    in_position = true;
                                }
                                if field.is_some() {
                                    text.clear();
                                }
                            }
                        }
                    }
                }
            }
            Event::Empty(e) => {
                let (resolved, local) = reader.resolve_element(e.name());
                if !seen_root {
                    seen_root = true;
                    root_ns = resolved_namespace(resolved);
                } else if namespace_matches(&root_ns, resolved) {
                    // Self-closing elements carry no text, so only the
                    // Activity sport attribute is worth looking at
                    if local.as_ref() == b"Activity" && !activity_seen {
                        activity_seen = true;
                        activity.sport = sport_attribute(&e)?;
                    }
                }
            }
            Event::Text(t) => {
                if field.is_some() {
                    text.push_str(&t.unescape()?);
                }
            }
            Event::CData(t) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            }
            Event::End(e) => {
                let (resolved, local) = reader.resolve_element(e.name());
                if namespace_matches(&root_ns, resolved) {
                    if local.as_ref() == b"Trackpoint" {
                        if let Some(tp) = trackpoint.take() {
                            activity.trackpoints.push(tp);
                        }
                        field = None;
                        in_position = false;
                    } else if let Some(tp) = trackpoint.as_mut() {
                        if let Some(f) = field.take() {
                            finish_point_field(tp, f, &text)?;
                        }
                        if trackpoint_depth == 1 && local.as_ref() == b"Position" {
                            in_position = false;
                        }
                        trackpoint_depth = trackpoint_depth.saturating_sub(1);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(activity)
}

fn resolved_namespace(resolved: ResolveResult) -> Option<Vec<u8>> {
    match resolved {
        ResolveResult::Bound(ns) => Some(ns.0.to_vec()),
        _ => None,
    }
}

fn namespace_matches(root_ns: &Option<Vec<u8>>, resolved: ResolveResult) -> bool {
    match (root_ns, resolved) {
        (Some(ns), ResolveResult::Bound(bound)) => bound.0 == ns.as_slice(),
        (None, ResolveResult::Unbound) => true,
        _ => false,
    }
}

fn sport_attribute(element: &BytesStart) -> Result<Option<String>> {
    match element.try_get_attribute("Sport")? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

/// Map an element name opening inside a trackpoint to the field it fills
fn start_point_field(local: &[u8], depth: usize, in_position: bool) -> Option<PointField> {
    match (local, depth, in_position) {
        (b"LatitudeDegrees", 2, true) => Some(PointField::Latitude),
        (b"LongitudeDegrees", 2, true) => Some(PointField::Longitude),
        (b"AltitudeMeters", 1, false) => Some(PointField::Altitude),
        (b"Time", 1, false) => Some(PointField::Time),
        _ => None,
    }
}

fn finish_point_field(tp: &mut TcxTrackpoint, field: PointField, text: &str) -> Result<()> {
    match field {
        PointField::Latitude => tp.latitude = Some(parse_degrees(text, "LatitudeDegrees")?),
        PointField::Longitude => tp.longitude = Some(parse_degrees(text, "LongitudeDegrees")?),
        PointField::Altitude => {
            if !text.trim().is_empty() {
                tp.altitude = Some(parse_degrees(text, "AltitudeMeters")?);
            }
        }
        PointField::Time => {
            if !text.is_empty() {
                tp.time = Some(text.to_string());
            }
        }
    }
    Ok(())
}

fn parse_degrees(text: &str, what: &str) -> Result<f64> {
    text.trim().parse::<f64>().map_err(|_| {
        ConvertError::Parse(format!("invalid {} value '{}'", what, text.trim()))
    })
}
