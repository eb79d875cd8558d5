//! FIT container decoding
//!
//! Streams typed messages out of a FIT binary file in a single sequential
//! pass. Only session messages (sport metadata) and record messages (position
//! samples) are surfaced; every other message kind is skipped by size.

use crate::error::{ConvertError, Result};
use crate::parser::stream::FitDataStream;
use crate::types::{FitMessage, RecordMessage, SessionMessage};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Seconds between the Unix epoch and the FIT epoch (1989-12-31T00:00:00Z)
pub const FIT_EPOCH_OFFSET: i64 = 631_065_600;

const FIT_MAGIC: &[u8; 4] = b".FIT";
const FIT_HEADER_MIN_SIZE: usize = 12;

const MESG_SESSION: u16 = 18;
const MESG_RECORD: u16 = 20;

// Record header bits
const HEADER_COMPRESSED: u8 = 0x80;
const HEADER_DEFINITION: u8 = 0x40;
const HEADER_DEVELOPER_DATA: u8 = 0x20;
const HEADER_LOCAL_MASK: u8 = 0x0F;

// Record message (global 20) field numbers
const FIELD_POSITION_LAT: u8 = 0;
const FIELD_POSITION_LONG: u8 = 1;
const FIELD_ALTITUDE: u8 = 2;
const FIELD_ENHANCED_ALTITUDE: u8 = 78;
// Session message (global 18) field numbers
const FIELD_SPORT: u8 = 5;
// Common to all message kinds
const FIELD_TIMESTAMP: u8 = 253;

// Altitude fields carry scale 5 / offset 500 per the FIT profile
const ALTITUDE_SCALE: f64 = 5.0;
const ALTITUDE_OFFSET: f64 = 500.0;

#[derive(Debug, Clone)]
struct FieldDefinition {
    field_num: u8,
    size: u8,
    base_type: u8,
}

#[derive(Debug, Clone)]
struct MessageDefinition {
    global_id: u16,
    big_endian: bool,
    fields: Vec<FieldDefinition>,
    /// Total byte size of developer fields appended to each data message
    developer_bytes: usize,
}

impl MessageDefinition {
    fn data_size(&self) -> usize {
        self.fields.iter().map(|f| f.size as usize).sum::<usize>() + self.developer_bytes
    }
}

/// Parse a FIT file and return its session and record messages
pub fn parse_fit_file(path: &Path, debug: bool) -> Result<Vec<FitMessage>> {
    let data = fs::read(path)?;
    parse_fit_bytes(&data, debug)
}

/// Parse FIT data from memory and return its session and record messages
pub fn parse_fit_bytes(data: &[u8], debug: bool) -> Result<Vec<FitMessage>> {
    let (header_size, data_size) = parse_file_header(data)?;

    if debug {
        println!(
            "FIT header: {} bytes, {} data bytes, {} total file bytes",
            header_size,
            data_size,
            data.len()
        );
    }

    let data_end = header_size + data_size;
    if data_end > data.len() {
        return Err(ConvertError::InvalidHeader(format!(
            "declared data size {} exceeds file length {}",
            data_size,
            data.len()
        )));
    }

    let mut stream = FitDataStream::new(&data[..data_end]);
    stream.pos = header_size;

    let mut definitions: HashMap<u8, MessageDefinition> = HashMap::new();
    let mut last_timestamp: Option<u32> = None;
    let mut messages = Vec::new();

    while stream.pos < data_end {
        let header = stream.read_u8()?;

        if header & HEADER_COMPRESSED != 0 {
            // Compressed timestamp header: 2-bit local type, 5-bit offset
            // applied to the most recent decoded timestamp
            let local_id = (header >> 5) & 0x03;
            let offset = header & 0x1F;
            let timestamp = last_timestamp.map(|last| expand_time_offset(last, offset));
            decode_data_message(
                &mut stream,
                &definitions,
                local_id,
                timestamp,
                &mut last_timestamp,
                &mut messages,
                debug,
            )?;
        } else if header & HEADER_DEFINITION != 0 {
            let local_id = header & HEADER_LOCAL_MASK;
            let with_developer = header & HEADER_DEVELOPER_DATA != 0;
            let definition = parse_definition_message(&mut stream, with_developer)?;
            if debug {
                println!(
                    "Definition: local {} -> global {} ({} fields, {} data bytes)",
                    local_id,
                    definition.global_id,
                    definition.fields.len(),
                    definition.data_size()
                );
            }
            definitions.insert(local_id, definition);
        } else {
            let local_id = header & HEADER_LOCAL_MASK;
            decode_data_message(
                &mut stream,
                &definitions,
                local_id,
                None,
                &mut last_timestamp,
                &mut messages,
                debug,
            )?;
        }
    }

    if debug {
        println!("Decoded {} session/record messages", messages.len());
    }

    Ok(messages)
}

/// Validate the file header and return (header size, data section size)
fn parse_file_header(data: &[u8]) -> Result<(usize, usize)> {
    if data.len() < FIT_HEADER_MIN_SIZE {
        return Err(ConvertError::InvalidHeader(format!(
            "file too small for a FIT header ({} bytes)",
            data.len()
        )));
    }

    let header_size = data[0] as usize;
    if header_size < FIT_HEADER_MIN_SIZE || header_size > data.len() {
        return Err(ConvertError::InvalidHeader(format!(
            "invalid header size {}",
            header_size
        )));
    }

    if &data[8..12] != FIT_MAGIC {
        return Err(ConvertError::InvalidHeader(
            "missing .FIT magic bytes".to_string(),
        ));
    }

    let data_size = u32::from_le_bytes([data[4], data[5], data[6], data[7]]) as usize;
    Ok((header_size, data_size))
}

fn parse_definition_message(
    stream: &mut FitDataStream,
    with_developer: bool,
) -> Result<MessageDefinition> {
    stream.read_u8()?; // reserved
    let architecture = stream.read_u8()?;
    if architecture > 1 {
        return Err(ConvertError::InvalidRecord(format!(
            "invalid architecture byte {}",
            architecture
        )));
    }
    let big_endian = architecture == 1;
    let global_id = stream.read_u16(big_endian)?;

    let field_count = stream.read_u8()? as usize;
    let mut fields = Vec::with_capacity(field_count);
    for _ in 0..field_count {
        fields.push(FieldDefinition {
            field_num: stream.read_u8()?,
            size: stream.read_u8()?,
            base_type: stream.read_u8()?,
        });
    }

    // Developer fields only matter for their total data size
    let mut developer_bytes = 0usize;
    if with_developer {
        let dev_field_count = stream.read_u8()? as usize;
        for _ in 0..dev_field_count {
            stream.read_u8()?; // field number
            developer_bytes += stream.read_u8()? as usize;
            stream.read_u8()?; // developer data index
        }
    }

    Ok(MessageDefinition {
        global_id,
        big_endian,
        fields,
        developer_bytes,
    })
}

#[allow(clippy::too_many_arguments)]
fn decode_data_message(
    stream: &mut FitDataStream,
    definitions: &HashMap<u8, MessageDefinition>,
    local_id: u8,
    compressed_timestamp: Option<u32>,
    last_timestamp: &mut Option<u32>,
    messages: &mut Vec<FitMessage>,
    debug: bool,
) -> Result<()> {
    let definition = definitions.get(&local_id).ok_or_else(|| {
        // Without a definition the message length is unknowable and the
        // stream cannot be resynchronized
        ConvertError::InvalidRecord(format!(
            "data message references undefined local type {}",
            local_id
        ))
    })?;

    match definition.global_id {
        MESG_SESSION => {
            let session = parse_session_message(stream, definition, last_timestamp)?;
            if debug {
                println!("Session message: sport {:?}", session.sport);
            }
            messages.push(FitMessage::Session(session));
        }
        MESG_RECORD => {
            let record =
                parse_record_message(stream, definition, compressed_timestamp, last_timestamp)?;
            messages.push(FitMessage::Record(record));
        }
        _ => {
            // Unsupported message kind, skip by size
            stream.skip(definition.data_size())?;
        }
    }

    Ok(())
}

fn parse_session_message(
    stream: &mut FitDataStream,
    definition: &MessageDefinition,
    last_timestamp: &mut Option<u32>,
) -> Result<SessionMessage> {
    let mut session = SessionMessage::default();

    for field in &definition.fields {
        let value = read_field_value(stream, field, definition.big_endian)?;
        match (field.field_num, value) {
            (FIELD_SPORT, Some(v)) => session.sport = Some(v as u8),
            (FIELD_TIMESTAMP, Some(v)) => *last_timestamp = Some(v as u32),
            _ => {}
        }
    }
    stream.skip(definition.developer_bytes)?;

    Ok(session)
}

fn parse_record_message(
    stream: &mut FitDataStream,
    definition: &MessageDefinition,
    compressed_timestamp: Option<u32>,
    last_timestamp: &mut Option<u32>,
) -> Result<RecordMessage> {
    let mut record = RecordMessage::default();
    let mut raw_timestamp = compressed_timestamp;

    for field in &definition.fields {
        let value = read_field_value(stream, field, definition.big_endian)?;
        let value = match value {
            Some(v) => v,
            None => continue,
        };

        match field.field_num {
            FIELD_POSITION_LAT => record.position_lat = Some(value as i32),
            FIELD_POSITION_LONG => record.position_long = Some(value as i32),
            FIELD_ALTITUDE => record.altitude = Some(value as f64 / ALTITUDE_SCALE - ALTITUDE_OFFSET),
            FIELD_ENHANCED_ALTITUDE => {
                record.enhanced_altitude = Some(value as f64 / ALTITUDE_SCALE - ALTITUDE_OFFSET)
            }
            FIELD_TIMESTAMP => raw_timestamp = Some(value as u32),
            _ => {}
        }
    }
    stream.skip(definition.developer_bytes)?;

    if let Some(raw) = raw_timestamp {
        *last_timestamp = Some(raw);
        record.timestamp = fit_timestamp_to_utc(raw);
    }

    Ok(record)
}

/// Convert a raw FIT timestamp (seconds since the FIT epoch) to UTC
pub fn fit_timestamp_to_utc(raw: u32) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(FIT_EPOCH_OFFSET + raw as i64, 0)
}

/// Reconstruct a full timestamp from a compressed 5-bit time offset
fn expand_time_offset(last: u32, offset: u8) -> u32 {
    let candidate = (last & !0x1F) | offset as u32;
    if candidate >= last {
        candidate
    } else {
        candidate + 0x20
    }
}

/// Read one field value as a scalar, honoring the definition's byte order.
///
/// FIT invalid-value sentinels decode to `None`. Strings, floats, 64-bit
/// types and array fields (size differing from the base type's) are consumed
/// but not decoded, so unsupported content never desynchronizes the stream.
fn read_field_value(
    stream: &mut FitDataStream,
    field: &FieldDefinition,
    big_endian: bool,
) -> Result<Option<i64>> {
    // Bit 7 of the base type byte only flags endian-sensitivity
    let base_type = field.base_type & 0x1F;
    let size = field.size as usize;

    let value = match (base_type, size) {
        // enum, uint8, byte
        (0, 1) | (2, 1) | (13, 1) => {
            let v = stream.read_u8()?;
            (v != 0xFF).then_some(v as i64)
        }
        // sint8
        (1, 1) => {
            let v = stream.read_u8()?;
            (v != 0x7F).then_some(v as i8 as i64)
        }
        // uint8z
        (10, 1) => {
            let v = stream.read_u8()?;
            (v != 0x00).then_some(v as i64)
        }
        // sint16
        (3, 2) => {
            let v = stream.read_u16(big_endian)?;
            (v != 0x7FFF).then_some(v as i16 as i64)
        }
        // uint16
        (4, 2) => {
            let v = stream.read_u16(big_endian)?;
            (v != 0xFFFF).then_some(v as i64)
        }
        // uint16z
        (11, 2) => {
            let v = stream.read_u16(big_endian)?;
            (v != 0x0000).then_some(v as i64)
        }
        // sint32
        (5, 4) => {
            let v = stream.read_u32(big_endian)?;
            (v != 0x7FFF_FFFF).then_some(v as i32 as i64)
        }
        // uint32
        (6, 4) => {
            let v = stream.read_u32(big_endian)?;
            (v != 0xFFFF_FFFF).then_some(v as i64)
        }
        // uint32z
        (12, 4) => {
            let v = stream.read_u32(big_endian)?;
            (v != 0x0000_0000).then_some(v as i64)
        }
        _ => {
            stream.skip(size)?;
            None
        }
    };

    Ok(value)
}
