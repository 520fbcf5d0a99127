// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn part_entry_keeps_fields() {
    let part = PartEntry::new("PartA", "AssemblyA", "Part Description A").unwrap();
    assert_eq!(part.part_number(), "PartA");
    assert_eq!(part.assembly_name(), "AssemblyA");
    assert_eq!(part.description(), "Part Description A");
}

#[test]
fn line_entry_counts_parts() {
    let empty = LineEntry::new("Line001", "Serial001").unwrap();
    assert_eq!(empty.part_count(), 0);
    let parts = vec![
        PartEntry::new("PartA", "AssemblyA", "A").unwrap(),
        PartEntry::new("PartB", "AssemblyB", "B").unwrap(),
    ];
    let line = LineEntry::with_parts("Line001", "Serial001", parts).unwrap();
    assert_eq!(line.part_count(), 2);
    assert_eq!(line.parts()[1].part_number(), "PartB");
}

#[test]
fn empty_text_is_allowed() {
    let part = PartEntry::new("", "", "").unwrap();
    assert_eq!(part.description(), "");
}

#[yare::parameterized(
    line_name     = { TextField::LineName, 255 },
    serial_number = { TextField::SerialNumber, 255 },
    part_number   = { TextField::PartNumber, 255 },
    assembly_name = { TextField::AssemblyName, 255 },
    description   = { TextField::Description, 65535 },
)]
fn field_limits(field: TextField, limit: usize) {
    assert_eq!(field.max_len(), limit);
}

#[test]
fn short_field_rejects_256_bytes() {
    let long = "x".repeat(256);
    let err = LineEntry::new(long, "Serial").unwrap_err();
    assert_eq!(err, RecordError::TooLong { field: TextField::LineName, len: 256, limit: 255 });
}

#[test]
fn short_field_accepts_255_bytes() {
    let line = LineEntry::new("x".repeat(255), "Serial").unwrap();
    assert_eq!(line.line_name().len(), 255);
}

#[test]
fn description_accepts_long_text() {
    let part = PartEntry::new("P", "A", "d".repeat(1000)).unwrap();
    assert_eq!(part.description().len(), 1000);
}

#[test]
fn limit_counts_bytes_not_chars() {
    // 128 two-byte characters = 256 bytes
    let wide = "é".repeat(128);
    let err = PartEntry::new(wide, "A", "D").unwrap_err();
    assert!(matches!(err, RecordError::TooLong { field: TextField::PartNumber, len: 256, .. }));
}

#[test]
fn nul_byte_rejected() {
    let err = PartEntry::new("Part", "Asm\0bly", "D").unwrap_err();
    assert_eq!(err, RecordError::InteriorNul { field: TextField::AssemblyName });
}

#[test]
fn error_display_names_field() {
    let err = RecordError::InteriorNul { field: TextField::SerialNumber };
    assert_eq!(err.to_string(), "serial number contains a NUL byte");
}
