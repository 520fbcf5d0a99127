// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Codec tests: layout, the two-line scenario, and rejection of malformed files.

use super::*;
use lcx_core::test_support::demo_line_config;
use lcx_core::{InfoRecord, LineConfigRecord, SchemaTag, SequenceCounter, StatusCode, StatusRecord};

/// Offsets of every text length prefix in an encoded frame, in file order.
pub(crate) fn length_offsets(frame: &Frame) -> Vec<(TextField, usize)> {
    let mut offsets = Vec::new();
    let mut pos = HEADER_LEN;
    let mut text = |field: TextField, value: &str, pos: &mut usize| {
        offsets.push((field, *pos));
        *pos += text_len(field, value);
    };
    for line in frame.lines() {
        text(TextField::LineName, line.line_name(), &mut pos);
        text(TextField::SerialNumber, line.serial_number(), &mut pos);
        pos += 2;
        for part in line.parts() {
            text(TextField::PartNumber, part.part_number(), &mut pos);
            text(TextField::AssemblyName, part.assembly_name(), &mut pos);
            text(TextField::Description, part.description(), &mut pos);
        }
    }
    offsets
}

/// Overwrite the length prefix at `offset` with `value`.
pub(crate) fn set_length(bytes: &mut [u8], field: TextField, offset: usize, value: usize) {
    match width_of(field) {
        Width::U8 => bytes[offset] = value as u8,
        Width::U16 => bytes[offset..offset + 2].copy_from_slice(&(value as u16).to_be_bytes()),
    }
}

fn read_length(bytes: &[u8], field: TextField, offset: usize) -> usize {
    match width_of(field) {
        Width::U8 => bytes[offset] as usize,
        Width::U16 => u16::from_be_bytes([bytes[offset], bytes[offset + 1]]) as usize,
    }
}

#[test]
fn two_line_scenario_roundtrips() {
    let record = demo_line_config();
    let bytes = encode_record(&record);
    let decoded: LineConfigRecord = decode_record(&bytes).unwrap();

    assert_eq!(decoded.schema_tag, SchemaTag(59));
    assert_eq!(decoded.lines().len(), 2);
    assert_eq!(decoded.lines()[0].parts().len(), 2);
    assert_eq!(decoded.lines()[1].parts().len(), 1);
    assert_eq!(decoded.lines()[0].line_name(), "Line001");
    assert_eq!(decoded.lines()[0].serial_number(), "Serial001");
    assert_eq!(decoded.lines()[1].line_name(), "Line002");
    assert_eq!(decoded.lines()[1].serial_number(), "Serial002");
    let part_b = &decoded.lines()[0].parts()[1];
    assert_eq!(part_b.part_number().as_bytes(), b"PartB");
    assert_eq!(part_b.assembly_name().as_bytes(), b"AssemblyB");
    assert_eq!(part_b.description().as_bytes(), b"Part Description B");
    assert_eq!(decoded, record);
}

#[test]
fn header_layout() {
    let bytes = encode_record(&demo_line_config());
    let file_length = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    assert_eq!(file_length, bytes.len());
    assert_eq!(&bytes[4..6], &59u16.to_be_bytes());
    assert_eq!(&bytes[6..8], &2u16.to_be_bytes());
    // First text field: "Line001" with its length prefix and terminator
    assert_eq!(bytes[8], 7);
    assert_eq!(&bytes[9..16], b"Line001");
    assert_eq!(bytes[16], 0);
}

#[test]
fn empty_frame_is_header_only() {
    let bytes = encode_record(&InfoRecord::acknowledgement(StatusCode::COMPLETE));
    assert_eq!(bytes, vec![0, 0, 0, 8, 0, 3, 0, 0]);
    let info: InfoRecord = decode_record(&bytes).unwrap();
    assert!(info.is_terminal());
}

#[test]
fn status_probe_roundtrips() {
    let record = StatusRecord::probe(SequenceCounter::new(9).unwrap());
    let bytes = encode_record(&record);
    assert_eq!(&bytes[4..6], &69u16.to_be_bytes());
    assert_eq!(&bytes[6..8], &1u16.to_be_bytes());
    let decoded: StatusRecord = decode_record(&bytes).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn every_length_field_mutation_is_rejected() {
    let frame = demo_line_config().to_frame();
    let bytes = encode(&frame);

    for (field, offset) in length_offsets(&frame) {
        let original = read_length(&bytes, field, offset);
        for value in [original + 1, original.saturating_sub(1), 0, 200] {
            if value == original {
                continue;
            }
            let mut mutated = bytes.clone();
            set_length(&mut mutated, field, offset, value);
            match decode(&mutated) {
                Err(DecodeError::LengthMismatch { field: Field::Text(f), offset: o, .. }) => {
                    assert_eq!((f, o), (field, offset));
                }
                other => panic!("{field} at {offset} set to {value}: got {other:?}"),
            }
        }
    }
}

#[test]
fn every_truncation_is_rejected() {
    let bytes = encode_record(&demo_line_config());
    for cut in 0..bytes.len() {
        let result = decode(&bytes[..cut]);
        assert!(
            matches!(result, Err(DecodeError::Truncated { .. })),
            "cut at {cut}: {result:?}"
        );
    }
}

#[test]
fn trailing_bytes_rejected_as_file_length_mismatch() {
    let mut bytes = encode_record(&demo_line_config());
    bytes.push(0);
    assert!(matches!(
        decode(&bytes),
        Err(DecodeError::LengthMismatch { field: Field::FileLength, .. })
    ));
}

#[yare::parameterized(
    more_lines_than_present  = { 3 },
    fewer_lines_than_present = { 1 },
)]
fn line_count_mismatch(count: u16) {
    let mut bytes = encode_record(&demo_line_config());
    bytes[6..8].copy_from_slice(&count.to_be_bytes());
    match decode(&bytes) {
        Err(DecodeError::CountMismatch { what: Counted::Lines, declared, .. }) => {
            assert_eq!(declared, usize::from(count));
        }
        other => panic!("expected line count mismatch, got {other:?}"),
    }
}

#[yare::parameterized(
    more_parts_than_present_on_last_line  = { 1, 2 },
    fewer_parts_than_present_on_last_line = { 1, 0 },
    fewer_parts_than_present_mid_file     = { 0, 1 },
)]
fn part_count_mismatch(line: usize, count: u16) {
    let frame = demo_line_config().to_frame();
    let mut bytes = encode(&frame);
    // The part count follows the line's serial number
    let (_, serial_offset) = length_offsets(&frame)
        .into_iter()
        .filter(|(field, _)| *field == TextField::SerialNumber)
        .nth(line)
        .unwrap();
    let at = serial_offset + text_len(TextField::SerialNumber, frame.lines()[line].serial_number());
    bytes[at..at + 2].copy_from_slice(&count.to_be_bytes());
    match decode(&bytes) {
        Err(DecodeError::CountMismatch { what: Counted::Parts, declared, .. }) => {
            assert_eq!(declared, usize::from(count));
        }
        other => panic!("expected part count mismatch, got {other:?}"),
    }
}

#[test]
fn invalid_utf8_rejected() {
    let frame = demo_line_config().to_frame();
    let mut bytes = encode(&frame);
    let (_, offset) = length_offsets(&frame)[0];
    bytes[offset + 1] = 0xFF;
    assert!(matches!(
        decode(&bytes),
        Err(DecodeError::InvalidText { field: TextField::LineName, .. })
    ));
}

#[test]
fn status_decode_requires_status_version() {
    let bytes = encode_record(&demo_line_config());
    let result = decode_record::<StatusRecord>(&bytes);
    assert!(matches!(result, Err(DecodeError::UnexpectedVersion { version: 59, .. })));
}

#[test]
fn status_decode_requires_single_line() {
    let mut bytes = encode_record(&demo_line_config());
    bytes[4..6].copy_from_slice(&60u16.to_be_bytes());
    let result = decode_record::<StatusRecord>(&bytes);
    assert!(matches!(result, Err(DecodeError::UnexpectedShape { expected: 1, found: 2, .. })));
}

#[test]
fn info_decodes_any_list_file_as_status_code() {
    let bytes = encode_record(&demo_line_config());
    let info: InfoRecord = decode_record(&bytes).unwrap();
    assert_eq!(info.status, StatusCode(59));
    assert!(!info.is_terminal());
    assert_eq!(info.lines().len(), 2);
}

#[test]
fn error_messages() {
    let err = DecodeError::LengthMismatch {
        field: Field::Text(TextField::PartNumber),
        offset: 12,
        declared: 6,
        found: 5,
    };
    assert_eq!(err.to_string(), "part number length mismatch at offset 12: declared 6, found 5");

    let err = DecodeError::Truncated { declared: 100, available: 40 };
    assert_eq!(err.to_string(), "truncated file: 100 bytes declared, 40 available");
}
