//! FIT decoder tests against fully synthetic files
//!
//! Covers the container structure (header validation, definition/data
//! dispatch, unknown-message skipping, compressed timestamp headers) and the
//! field semantics the conversion pipeline depends on (semicircle positions,
//! altitude scaling, invalid-value sentinels).

mod common;

use common::{altitude_raw, FitBuilder, INVALID_SINT32, INVALID_UINT16};
use track_converter::{
    fit_timestamp_to_utc, parse_fit_bytes, ConvertError, FitMessage, SEMICIRCLES_TO_DEGREES,
};

fn records(messages: &[FitMessage]) -> Vec<&track_converter::RecordMessage> {
    messages
        .iter()
        .filter_map(|m| match m {
            FitMessage::Record(r) => Some(r),
            _ => None,
        })
        .collect()
}

#[test]
fn decodes_session_and_record_messages() {
    let mut builder = FitBuilder::new();
    builder
        .define_session(0)
        .session(0, 1) // running
        .define_record(1)
        .record(1, 1_000, 1_234_567, -7_654_321, altitude_raw(100.0));
    let messages = parse_fit_bytes(&builder.build(), false).expect("file should decode");

    assert_eq!(messages.len(), 2, "one session plus one record expected");

    let sport = messages.iter().find_map(|m| match m {
        FitMessage::Session(s) => s.sport_name(),
        _ => None,
    });
    assert_eq!(sport, Some("running"));

    let recs = records(&messages);
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].position_lat, Some(1_234_567));
    assert_eq!(recs[0].position_long, Some(-7_654_321));
    assert_eq!(recs[0].altitude, Some(100.0));
    assert_eq!(recs[0].timestamp, fit_timestamp_to_utc(1_000));
}

#[test]
fn semicircle_positions_scale_to_degrees() {
    let raw_values: [i32; 4] = [0, 715_827_883, -1_073_741_824, 2_147_483_000];

    let mut builder = FitBuilder::new();
    builder.define_record(0);
    for &raw in &raw_values {
        builder.record(0, 0, raw, raw, altitude_raw(0.0));
    }
    let messages = parse_fit_bytes(&builder.build(), false).expect("file should decode");

    for (rec, &raw) in records(&messages).iter().zip(&raw_values) {
        let lat = rec.position_lat.expect("position should be present") as f64;
        let expected = raw as f64 * 180.0 / 2f64.powi(31);
        assert!(
            (lat * SEMICIRCLES_TO_DEGREES - expected).abs() < 5e-7,
            "raw {} should scale to {} degrees",
            raw,
            expected
        );
    }
}

#[test]
fn invalid_sentinels_decode_to_absent_fields() {
    let mut builder = FitBuilder::new();
    builder
        .define_record(0)
        .record(0, 1_000, INVALID_SINT32, 42, INVALID_UINT16);
    let messages = parse_fit_bytes(&builder.build(), false).expect("file should decode");

    let recs = records(&messages);
    assert_eq!(recs[0].position_lat, None, "0x7FFFFFFF latitude is invalid");
    assert_eq!(recs[0].position_long, Some(42));
    assert_eq!(recs[0].altitude, None, "0xFFFF altitude is invalid");
}

#[test]
fn enhanced_altitude_fills_in_for_missing_primary() {
    let mut builder = FitBuilder::new();
    builder.define(
        0,
        20,
        &[
            (0, 4, 0x85),  // position_lat
            (1, 4, 0x85),  // position_long
            (78, 4, 0x86), // enhanced_altitude, uint32
        ],
    );
    let mut payload = Vec::new();
    payload.extend_from_slice(&100i32.to_le_bytes());
    payload.extend_from_slice(&200i32.to_le_bytes());
    payload.extend_from_slice(&(((250.0_f64 + 500.0) * 5.0) as u32).to_le_bytes());
    builder.data(0, &payload);

    let messages = parse_fit_bytes(&builder.build(), false).expect("file should decode");
    let recs = records(&messages);
    assert_eq!(recs[0].altitude, None);
    assert_eq!(recs[0].enhanced_altitude, Some(250.0));
    assert_eq!(recs[0].elevation(), Some(250.0));
}

#[test]
fn unsupported_message_kinds_are_skipped_silently() {
    let mut builder = FitBuilder::new();
    builder
        .define(3, 34, &[(0, 4, 0x86), (1, 2, 0x84)]) // some other message kind
        .data(3, &[1, 2, 3, 4, 5, 6])
        .define_record(0)
        .record(0, 500, 1, 2, altitude_raw(10.0));

    let messages = parse_fit_bytes(&builder.build(), false).expect("file should decode");
    assert_eq!(messages.len(), 1, "only the record message should surface");
    assert!(matches!(messages[0], FitMessage::Record(_)));
}

#[test]
fn file_without_sessions_or_records_decodes_to_nothing() {
    let builder = FitBuilder::new();
    let messages = parse_fit_bytes(&builder.build(), false).expect("empty file should decode");
    assert!(messages.is_empty());
}

#[test]
fn big_endian_definitions_are_honored() {
    let mut builder = FitBuilder::new();
    // Hand-build a big-endian definition for a record message with one
    // sint32 position pair
    {
        let body = builder.body_mut();
        body.push(0x40); // definition, local 0
        body.push(0); // reserved
        body.push(1); // big-endian architecture
        body.extend_from_slice(&20u16.to_be_bytes());
        body.push(2);
        body.extend_from_slice(&[0, 4, 0x85]); // position_lat
        body.extend_from_slice(&[1, 4, 0x85]); // position_long
        body.push(0x00); // data, local 0
        body.extend_from_slice(&305_419_896i32.to_be_bytes());
        body.extend_from_slice(&(-2_023_406_815i32).to_be_bytes());
    }

    let messages = parse_fit_bytes(&builder.build(), false).expect("file should decode");
    let recs = records(&messages);
    assert_eq!(recs[0].position_lat, Some(305_419_896));
    assert_eq!(recs[0].position_long, Some(-2_023_406_815));
}

#[test]
fn compressed_timestamp_headers_extend_the_last_timestamp() {
    let mut builder = FitBuilder::new();
    builder
        .define_record(1)
        .record(1, 1_000, 1, 2, altitude_raw(0.0))
        // record definition without a timestamp field, for compressed headers
        .define(2, 20, &[(0, 4, 0x85), (1, 4, 0x85)]);
    let mut payload = Vec::new();
    payload.extend_from_slice(&3i32.to_le_bytes());
    payload.extend_from_slice(&4i32.to_le_bytes());
    // 1000 = 0b1111101000; low five bits are 8, so offset 13 lands at 1005
    builder.compressed_data(2, 13, &payload);

    let messages = parse_fit_bytes(&builder.build(), false).expect("file should decode");
    let recs = records(&messages);
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[1].timestamp, fit_timestamp_to_utc(1_005));
}

#[test]
fn bad_magic_is_an_invalid_header() {
    let mut data = FitBuilder::new().build();
    data[8..12].copy_from_slice(b"JUNK");

    match parse_fit_bytes(&data, false) {
        Err(ConvertError::InvalidHeader(_)) => {}
        other => panic!("expected InvalidHeader, got {:?}", other),
    }
}

#[test]
fn truncated_file_is_an_error_not_a_panic() {
    let mut builder = FitBuilder::new();
    builder
        .define_record(0)
        .record(0, 1_000, 1, 2, altitude_raw(0.0));
    let data = builder.build();

    // Chop the record in half but leave the declared data size alone
    let truncated = &data[..data.len() - 8];
    assert!(parse_fit_bytes(truncated, false).is_err());
}

#[test]
fn data_message_without_definition_is_rejected() {
    let mut builder = FitBuilder::new();
    builder.data(7, &[]);

    match parse_fit_bytes(&builder.build(), false) {
        Err(ConvertError::InvalidRecord(_)) => {}
        other => panic!("expected InvalidRecord, got {:?}", other),
    }
}
