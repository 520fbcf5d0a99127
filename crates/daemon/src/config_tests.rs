// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lcx_core::test_support::demo_line_config;

#[test]
fn built_in_list_is_the_demo_list() {
    assert_eq!(load_line_config(None).unwrap(), demo_line_config());
}

#[test]
fn loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lines.toml");
    std::fs::write(
        &path,
        r#"
schema_tag = 61

[[line]]
name = "Press"
serial = "P-100"

[[line.part]]
number = "BOLT-8"
assembly = "Frame"
"#,
    )
    .unwrap();

    let record = load_line_config(Some(&path)).unwrap();
    assert_eq!(record.schema_tag, SchemaTag(61));
    assert_eq!(record.lines().len(), 1);
    let part = &record.lines()[0].parts()[0];
    assert_eq!(part.part_number(), "BOLT-8");
    assert_eq!(part.description(), "");
}

#[test]
fn schema_tag_defaults() {
    let record = parse_line_config("", "empty").unwrap();
    assert_eq!(record.schema_tag, SchemaTag::LINE_CONFIG);
    assert!(record.lines().is_empty());
}

#[test]
fn missing_file_is_read_error() {
    let err = load_line_config(Some(Path::new("/nonexistent/lines.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[yare::parameterized(
    unknown_key     = { "colour = 3" },
    missing_serial  = { "[[line]]\nname = \"L\"" },
    tag_too_large   = { "schema_tag = 70000" },
    wrong_type      = { "schema_tag = \"59\"" },
)]
fn rejects_malformed_toml(text: &str) {
    assert!(matches!(parse_line_config(text, "test"), Err(ConfigError::Parse { .. })));
}

#[test]
fn rejects_out_of_range_text() {
    let long = "x".repeat(300);
    let text = format!("[[line]]\nname = \"{long}\"\nserial = \"S\"\n");
    assert!(matches!(parse_line_config(&text, "test"), Err(ConfigError::Record { .. })));
}
