// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Encoding and validating decode of [`Frame`]s.
//!
//! Text fields are length-prefixed and NUL-terminated. The decoder locates
//! each terminator independently of the declared length, so any length field
//! that disagrees with its text is reported as a mismatch instead of
//! shifting the rest of the parse.

use lcx_core::{LineEntry, PartEntry, TextField};

use crate::error::{Counted, DecodeError, Field};
use crate::frame::{Frame, Record};

/// file_length (4) + protocol_version (2) + line_count (2)
pub const HEADER_LEN: usize = 8;

#[derive(Clone, Copy)]
enum Width {
    U8,
    U16,
}

fn width_of(field: TextField) -> Width {
    match field {
        TextField::Description => Width::U16,
        _ => Width::U8,
    }
}

fn text_len(field: TextField, text: &str) -> usize {
    let prefix = match width_of(field) {
        Width::U8 => 1,
        Width::U16 => 2,
    };
    prefix + text.len() + 1
}

fn encoded_len(frame: &Frame) -> usize {
    HEADER_LEN
        + frame
            .lines()
            .iter()
            .map(|line| {
                text_len(TextField::LineName, line.line_name())
                    + text_len(TextField::SerialNumber, line.serial_number())
                    + 2
                    + line
                        .parts()
                        .iter()
                        .map(|part| {
                            text_len(TextField::PartNumber, part.part_number())
                                + text_len(TextField::AssemblyName, part.assembly_name())
                                + text_len(TextField::Description, part.description())
                        })
                        .sum::<usize>()
            })
            .sum::<usize>()
}

fn put_text(out: &mut Vec<u8>, field: TextField, text: &str) {
    // Entry constructors bound text to the field width
    match width_of(field) {
        Width::U8 => out.push(text.len() as u8),
        Width::U16 => out.extend_from_slice(&(text.len() as u16).to_be_bytes()),
    }
    out.extend_from_slice(text.as_bytes());
    out.push(0);
}

/// Encode a frame. Deterministic; every constructible frame is encodable.
pub fn encode(frame: &Frame) -> Vec<u8> {
    let total = encoded_len(frame);
    let mut out = Vec::with_capacity(total);

    // Files over 4 GiB are not representable; the saturated length makes
    // such a file fail to decode rather than wrap.
    out.extend_from_slice(&u32::try_from(total).unwrap_or(u32::MAX).to_be_bytes());
    out.extend_from_slice(&frame.protocol_version().to_be_bytes());
    out.extend_from_slice(&(frame.lines().len() as u16).to_be_bytes());

    for line in frame.lines() {
        put_text(&mut out, TextField::LineName, line.line_name());
        put_text(&mut out, TextField::SerialNumber, line.serial_number());
        out.extend_from_slice(&line.part_count().to_be_bytes());
        for part in line.parts() {
            put_text(&mut out, TextField::PartNumber, part.part_number());
            put_text(&mut out, TextField::AssemblyName, part.assembly_name());
            put_text(&mut out, TextField::Description, part.description());
        }
    }

    out
}

pub fn encode_record<R: Record>(record: &R) -> Vec<u8> {
    encode(&record.to_frame())
}

/// Cursor over the declared extent of a file.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn rest(&self) -> &'a [u8] {
        self.buf.get(self.pos..).unwrap_or_default()
    }

    fn u8(&mut self) -> Option<u8> {
        let byte = *self.buf.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    fn u16(&mut self) -> Option<u16> {
        let bytes = self.buf.get(self.pos..self.pos + 2)?;
        self.pos += 2;
        Some(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn count_mismatch(&self, what: Counted, declared: usize) -> DecodeError {
        DecodeError::CountMismatch { what, declared, offset: self.pos }
    }

    /// Read a length-prefixed, NUL-terminated text field. `within` names the
    /// entry being read, for reporting when its bytes run out.
    fn text(
        &mut self,
        field: TextField,
        within: (Counted, usize),
    ) -> Result<String, DecodeError> {
        let offset = self.pos;
        let declared = match width_of(field) {
            Width::U8 => self.u8().map(usize::from),
            Width::U16 => self.u16().map(usize::from),
        }
        .ok_or_else(|| self.count_mismatch(within.0, within.1))?;

        let rest = self.rest();
        let found = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
        if found != declared {
            return Err(DecodeError::LengthMismatch {
                field: Field::Text(field),
                offset,
                declared,
                found,
            });
        }

        let text = std::str::from_utf8(&rest[..found])
            .map_err(|_| DecodeError::InvalidText { field, offset })?;
        self.pos += found + 1;
        Ok(text.to_string())
    }
}

/// Decode and validate a file.
///
/// # Errors
/// - `Truncated` if the buffer is shorter than the header or the declared file length
/// - `LengthMismatch` if the file length or any text length disagrees with the content
/// - `CountMismatch` if the line or part counts disagree with the entries present
/// - `InvalidText` if a text field is not UTF-8
pub fn decode(bytes: &[u8]) -> Result<Frame, DecodeError> {
    let Some(prefix) = bytes.get(..4) else {
        return Err(DecodeError::Truncated { declared: HEADER_LEN, available: bytes.len() });
    };
    let declared = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;

    if declared > bytes.len() {
        return Err(DecodeError::Truncated { declared, available: bytes.len() });
    }
    if declared < bytes.len() {
        return Err(DecodeError::LengthMismatch {
            field: Field::FileLength,
            offset: 0,
            declared,
            found: bytes.len(),
        });
    }
    if bytes.len() < HEADER_LEN {
        return Err(DecodeError::Truncated { declared: HEADER_LEN, available: bytes.len() });
    }

    let protocol_version = u16::from_be_bytes([bytes[4], bytes[5]]);
    let line_count = usize::from(u16::from_be_bytes([bytes[6], bytes[7]]));

    let mut reader = Reader { buf: bytes, pos: HEADER_LEN };
    let mut lines = Vec::with_capacity(line_count.min(bytes.len() / 8));
    // End offset and declared part count of the last line read
    let mut previous = None;
    for _ in 0..line_count {
        if reader.is_empty() {
            return Err(reader.count_mismatch(Counted::Lines, line_count));
        }
        let remaining = line_count - lines.len();
        let line = read_line(&mut reader, line_count)
            .map_err(|e| surplus_parts(bytes, previous, remaining, line_count).unwrap_or(e))?;
        previous = Some((reader.pos, usize::from(line.part_count())));
        lines.push(line);
    }
    if !reader.is_empty() {
        return Err(surplus_parts(bytes, previous, 0, line_count)
            .unwrap_or_else(|| reader.count_mismatch(Counted::Lines, line_count)));
    }

    Ok(Frame::new(protocol_version, lines)?)
}

fn read_line(reader: &mut Reader<'_>, line_count: usize) -> Result<LineEntry, DecodeError> {
    let within = (Counted::Lines, line_count);
    let line_name = reader.text(TextField::LineName, within)?;
    let serial_number = reader.text(TextField::SerialNumber, within)?;
    let part_count = reader
        .u16()
        .map(usize::from)
        .ok_or_else(|| reader.count_mismatch(Counted::Lines, line_count))?;

    let within = (Counted::Parts, part_count);
    let mut parts = Vec::with_capacity(part_count.min(reader.rest().len() / 6));
    for _ in 0..part_count {
        if reader.is_empty() {
            return Err(reader.count_mismatch(Counted::Parts, part_count));
        }
        parts.push(read_part(reader, within)?);
    }

    Ok(LineEntry::with_parts(line_name, serial_number, parts)?)
}

fn read_part(
    reader: &mut Reader<'_>,
    within: (Counted, usize),
) -> Result<PartEntry, DecodeError> {
    let part_number = reader.text(TextField::PartNumber, within)?;
    let assembly_name = reader.text(TextField::AssemblyName, within)?;
    let description = reader.text(TextField::Description, within)?;
    Ok(PartEntry::new(part_number, assembly_name, description)?)
}

/// A part count mismatch, if the bytes after the last line read parse
/// cleanly once that line is given more parts than it declares.
fn surplus_parts(
    bytes: &[u8],
    previous: Option<(usize, usize)>,
    remaining: usize,
    line_count: usize,
) -> Option<DecodeError> {
    let (offset, declared) = previous?;
    let mut reader = Reader { buf: bytes, pos: offset };
    loop {
        read_part(&mut reader, (Counted::Parts, declared)).ok()?;
        let mut rest = Reader { buf: bytes, pos: reader.pos };
        let fits = (0..remaining)
            .all(|_| !rest.is_empty() && read_line(&mut rest, line_count).is_ok());
        if fits && rest.is_empty() {
            return Some(DecodeError::CountMismatch { what: Counted::Parts, declared, offset });
        }
    }
}

pub fn decode_record<R: Record>(bytes: &[u8]) -> Result<R, DecodeError> {
    R::from_frame(decode(bytes)?)
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "property_tests.rs"]
mod property_tests;
