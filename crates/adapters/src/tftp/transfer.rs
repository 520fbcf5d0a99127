// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock-step send and receive loops shared by the client and server.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, trace};

use super::packet::{ErrorCode, Packet, BLOCK_SIZE};
use crate::exchange::TransferError;

/// Datagram buffer, large enough for any request or full DATA block.
pub(crate) const MAX_DATAGRAM: usize = 1500;

/// Timing for one transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferConfig {
    /// How long to wait for each reply before retransmitting
    pub timeout: Duration,
    /// Retransmissions before giving up
    pub retries: u32,
    /// How long `wait_for_request` listens before returning empty
    pub request_wait: Duration,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(1), retries: 5, request_wait: Duration::from_secs(1) }
    }
}

/// Bind an ephemeral socket of the same family as `peer`.
pub(crate) async fn ephemeral_socket(peer: SocketAddr) -> Result<UdpSocket, TransferError> {
    let any = match peer.ip() {
        IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
    };
    Ok(UdpSocket::bind(SocketAddr::new(any, 0)).await?)
}

/// Where a reply may come from.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Peer {
    /// A request went to a well-known port; the reply picks the transfer port
    Host(IpAddr),
    /// Transfer port established
    Bound(SocketAddr),
}

impl Peer {
    fn accepts(self, from: SocketAddr) -> bool {
        match self {
            Peer::Host(ip) => from.ip() == ip || ip.is_unspecified(),
            Peer::Bound(addr) => from == addr,
        }
    }
}

/// Send `outgoing` to `to` and wait for a reply from `peer` that `want`
/// accepts, retransmitting on each timeout.
pub(crate) async fn exchange(
    socket: &UdpSocket,
    outgoing: &Packet,
    to: SocketAddr,
    peer: Peer,
    config: &TransferConfig,
    want: impl Fn(&Packet) -> bool,
) -> Result<(Packet, SocketAddr), TransferError> {
    let bytes = outgoing.encode();
    let mut buf = [0u8; MAX_DATAGRAM];
    let attempts = config.retries + 1;

    for attempt in 0..attempts {
        if attempt > 0 {
            trace!(%to, attempt, "retransmitting");
        }
        socket.send_to(&bytes, to).await?;

        let deadline = tokio::time::Instant::now() + config.timeout;
        loop {
            let received = tokio::time::timeout_at(deadline, socket.recv_from(&mut buf)).await;
            let Ok(received) = received else { break };
            let (len, from) = received?;

            if !peer.accepts(from) {
                let stray = Packet::error(ErrorCode::UNKNOWN_TRANSFER_ID, "unknown transfer id");
                let _ = socket.send_to(&stray.encode(), from).await;
                continue;
            }
            let packet = match Packet::decode(&buf[..len]) {
                Ok(packet) => packet,
                Err(e) => {
                    debug!(%from, error = %e, "ignoring malformed packet");
                    continue;
                }
            };
            if let Packet::Error { code, message } = packet {
                return Err(TransferError::Remote { code, message });
            }
            if want(&packet) {
                return Ok((packet, from));
            }
            // Duplicate or stale packet; keep waiting for the one we need
        }
    }
    Err(TransferError::Timeout { attempts })
}

/// Send `bytes` as DATA blocks to `peer`, one block per ACK.
pub(crate) async fn send_data(
    socket: &UdpSocket,
    peer: SocketAddr,
    bytes: &[u8],
    config: &TransferConfig,
) -> Result<(), TransferError> {
    // A final short (possibly empty) block always terminates the transfer
    let blocks = bytes.len() / BLOCK_SIZE + 1;
    let mut block: u16 = 0;
    for index in 0..blocks {
        block = block.wrapping_add(1);
        let start = index * BLOCK_SIZE;
        let end = (start + BLOCK_SIZE).min(bytes.len());
        let data = Packet::Data { block, data: bytes[start..end].to_vec() };
        exchange(socket, &data, peer, Peer::Bound(peer), config, |reply| {
            matches!(reply, Packet::Ack { block: acked } if *acked == block)
        })
        .await?;
    }
    debug!(%peer, len = bytes.len(), blocks, "sent file");
    Ok(())
}

/// Receive DATA blocks after sending `opening` (an ACK 0 or a read request).
///
/// `finish` runs on the complete content before the final ACK goes out; if
/// it fails the peer gets an ERROR instead.
pub(crate) async fn receive_data<T>(
    socket: &UdpSocket,
    opening: Packet,
    to: SocketAddr,
    peer: Peer,
    config: &TransferConfig,
    finish: impl FnOnce(Vec<u8>) -> Result<T, TransferError>,
) -> Result<T, TransferError> {
    let mut content = Vec::new();
    let mut outgoing = opening;
    let mut to = to;
    let mut peer = peer;
    let mut expected: u16 = 1;

    loop {
        let (packet, from) = exchange(socket, &outgoing, to, peer, config, |reply| {
            matches!(reply, Packet::Data { block, .. } if *block == expected)
        })
        .await?;
        to = from;
        peer = Peer::Bound(from);

        let Packet::Data { data, .. } = packet else {
            return Err(TransferError::Unexpected(format!("{packet:?}")));
        };
        let last = data.len() < BLOCK_SIZE;
        content.extend_from_slice(&data);

        if last {
            let len = content.len();
            return match finish(content) {
                Ok(value) => {
                    socket.send_to(&Packet::Ack { block: expected }.encode(), from).await?;
                    debug!(peer = %from, len, "received file");
                    Ok(value)
                }
                Err(e) => {
                    let reply = Packet::error(ErrorCode::NOT_DEFINED, e.to_string());
                    let _ = socket.send_to(&reply.encode(), from).await;
                    Err(e)
                }
            };
        }
        outgoing = Packet::Ack { block: expected };
        expected = expected.wrapping_add(1);
    }
}

/// Bounded wait for one datagram on a listening socket.
pub(crate) async fn recv_request(
    socket: &UdpSocket,
    wait: Duration,
    buf: &mut [u8],
) -> Option<std::io::Result<(usize, SocketAddr)>> {
    timeout(wait, socket.recv_from(buf)).await.ok()
}
