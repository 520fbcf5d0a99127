// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal TFTP (RFC 1350, octet mode) over tokio UDP sockets.
//!
//! Every transfer is lock-step: one block in flight, a fixed per-packet
//! timeout, and a bounded number of retransmissions.

mod client;
mod packet;
mod server;
mod transfer;

pub use client::TftpClient;
pub use packet::{ErrorCode, Packet, PacketError, BLOCK_SIZE};
pub use server::TftpServer;
pub use transfer::TransferConfig;
