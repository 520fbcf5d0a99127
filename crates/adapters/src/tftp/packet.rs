// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Payload bytes per DATA packet. A shorter block ends the transfer.
pub const BLOCK_SIZE: usize = 512;

const RRQ: u16 = 1;
const WRQ: u16 = 2;
const DATA: u16 = 3;
const ACK: u16 = 4;
const ERROR: u16 = 5;

/// Standard TFTP error codes used by this implementation.
pub struct ErrorCode;

impl ErrorCode {
    pub const NOT_DEFINED: u16 = 0;
    pub const FILE_NOT_FOUND: u16 = 1;
    pub const ACCESS_VIOLATION: u16 = 2;
    pub const ILLEGAL_OPERATION: u16 = 4;
    pub const UNKNOWN_TRANSFER_ID: u16 = 5;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    ReadRequest { filename: String, mode: String },
    WriteRequest { filename: String, mode: String },
    Data { block: u16, data: Vec<u8> },
    Ack { block: u16 },
    Error { code: u16, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    #[error("packet of {0} bytes is too short")]
    TooShort(usize),

    #[error("unknown opcode {0}")]
    UnknownOpcode(u16),

    #[error("request field is not NUL-terminated")]
    MissingTerminator,

    #[error("request field is not valid UTF-8")]
    InvalidText,
}

fn put_str(out: &mut Vec<u8>, text: &str) {
    out.extend_from_slice(text.as_bytes());
    out.push(0);
}

/// Split off a NUL-terminated string, returning it and the bytes after it.
fn take_str(bytes: &[u8]) -> Result<(String, &[u8]), PacketError> {
    let end = bytes.iter().position(|&b| b == 0).ok_or(PacketError::MissingTerminator)?;
    let text = std::str::from_utf8(&bytes[..end]).map_err(|_| PacketError::InvalidText)?;
    Ok((text.to_string(), &bytes[end + 1..]))
}

impl Packet {
    pub fn read_request(filename: &str) -> Self {
        Packet::ReadRequest { filename: filename.to_string(), mode: "octet".to_string() }
    }

    pub fn write_request(filename: &str) -> Self {
        Packet::WriteRequest { filename: filename.to_string(), mode: "octet".to_string() }
    }

    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Packet::Error { code, message: message.into() }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + BLOCK_SIZE);
        match self {
            Packet::ReadRequest { filename, mode } | Packet::WriteRequest { filename, mode } => {
                let opcode = if matches!(self, Packet::ReadRequest { .. }) { RRQ } else { WRQ };
                out.extend_from_slice(&opcode.to_be_bytes());
                put_str(&mut out, filename);
                put_str(&mut out, mode);
            }
            Packet::Data { block, data } => {
                out.extend_from_slice(&DATA.to_be_bytes());
                out.extend_from_slice(&block.to_be_bytes());
                out.extend_from_slice(data);
            }
            Packet::Ack { block } => {
                out.extend_from_slice(&ACK.to_be_bytes());
                out.extend_from_slice(&block.to_be_bytes());
            }
            Packet::Error { code, message } => {
                out.extend_from_slice(&ERROR.to_be_bytes());
                out.extend_from_slice(&code.to_be_bytes());
                put_str(&mut out, message);
            }
        }
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, PacketError> {
        if bytes.len() < 2 {
            return Err(PacketError::TooShort(bytes.len()));
        }
        let opcode = u16::from_be_bytes([bytes[0], bytes[1]]);
        let body = &bytes[2..];
        let short = || PacketError::TooShort(bytes.len());

        match opcode {
            RRQ | WRQ => {
                let (filename, rest) = take_str(body)?;
                // Option extensions after the mode are ignored
                let (mode, _) = take_str(rest)?;
                Ok(if opcode == RRQ {
                    Packet::ReadRequest { filename, mode }
                } else {
                    Packet::WriteRequest { filename, mode }
                })
            }
            DATA => {
                let block = body.get(..2).ok_or_else(short)?;
                Ok(Packet::Data {
                    block: u16::from_be_bytes([block[0], block[1]]),
                    data: body[2..].to_vec(),
                })
            }
            ACK => {
                let block = body.get(..2).ok_or_else(short)?;
                Ok(Packet::Ack { block: u16::from_be_bytes([block[0], block[1]]) })
            }
            ERROR => {
                let code = body.get(..2).ok_or_else(short)?;
                let text = &body[2..];
                let end = text.iter().position(|&b| b == 0).unwrap_or(text.len());
                Ok(Packet::Error {
                    code: u16::from_be_bytes([code[0], code[1]]),
                    message: String::from_utf8_lossy(&text[..end]).into_owned(),
                })
            }
            other => Err(PacketError::UnknownOpcode(other)),
        }
    }

    pub fn is_octet_mode(mode: &str) -> bool {
        mode.eq_ignore_ascii_case("octet")
    }
}

#[cfg(test)]
#[path = "packet_tests.rs"]
mod tests;
