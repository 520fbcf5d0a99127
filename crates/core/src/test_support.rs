// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{LineConfigRecord, LineEntry, PartEntry, SchemaTag};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for records that satisfy every format invariant.
pub mod strategies {
    use crate::{
        InfoRecord, LineConfigRecord, LineEntry, PartEntry, SchemaTag, SequenceCounter,
        StatusCode, StatusRecord,
    };
    use proptest::prelude::*;

    /// Text without NUL bytes, at most `max_chars` characters.
    pub fn arb_text(max_chars: usize) -> impl Strategy<Value = String> {
        proptest::collection::vec(any::<char>().prop_filter("no NUL", |c| *c != '\0'), 0..=max_chars)
            .prop_map(|chars| chars.into_iter().collect())
    }

    // 63 chars * 4 bytes stays under the 255-byte short-field limit
    fn short_text() -> impl Strategy<Value = String> {
        arb_text(63)
    }

    pub fn arb_part() -> impl Strategy<Value = PartEntry> {
        (short_text(), short_text(), arb_text(200)).prop_filter_map(
            "part within limits",
            |(number, assembly, description)| PartEntry::new(number, assembly, description).ok(),
        )
    }

    pub fn arb_line() -> impl Strategy<Value = LineEntry> {
        (short_text(), short_text(), proptest::collection::vec(arb_part(), 0..4)).prop_filter_map(
            "line within limits",
            |(name, serial, parts)| LineEntry::with_parts(name, serial, parts).ok(),
        )
    }

    pub fn arb_line_config() -> impl Strategy<Value = LineConfigRecord> {
        (any::<u16>(), proptest::collection::vec(arb_line(), 0..4)).prop_filter_map(
            "record within limits",
            |(tag, lines)| LineConfigRecord::new(SchemaTag(tag), lines).ok(),
        )
    }

    pub fn arb_status() -> impl Strategy<Value = StatusRecord> {
        (0u8..SequenceCounter::MODULUS, arb_line()).prop_filter_map(
            "sequence in range",
            |(seq, line)| SequenceCounter::new(seq).map(|seq| StatusRecord::new(seq, line)),
        )
    }

    pub fn arb_info() -> impl Strategy<Value = InfoRecord> {
        (any::<u16>(), proptest::collection::vec(arb_line(), 0..3)).prop_filter_map(
            "record within limits",
            |(code, lines)| InfoRecord::new(StatusCode(code), lines).ok(),
        )
    }
}

// ── Fixtures ────────────────────────────────────────────────────────────

/// Two lines: Line001 with parts A and B, Line002 with part C.
pub fn demo_line_config() -> LineConfigRecord {
    let part = |id: char| {
        PartEntry::trusted(
            format!("Part{id}"),
            format!("Assembly{id}"),
            format!("Part Description {id}"),
        )
    };
    let lines = vec![
        LineEntry::trusted("Line001", "Serial001", vec![part('A'), part('B')]),
        LineEntry::trusted("Line002", "Serial002", vec![part('C')]),
    ];
    LineConfigRecord::trusted(SchemaTag::LINE_CONFIG, lines)
}
