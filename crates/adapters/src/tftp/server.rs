// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use lcx_core::{split_name, FileKind};
use lcx_storage::{FileStore, StoreError};
use parking_lot::Mutex;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

use super::packet::{ErrorCode, Packet};
use super::transfer::{
    ephemeral_socket, receive_data, recv_request, send_data, Peer, TransferConfig, MAX_DATAGRAM,
};
use crate::exchange::{ExchangeServer, TransferError};

/// TFTP server on a listening socket, serving from and storing into a file store.
///
/// Read requests are surfaced through [`ExchangeServer::wait_for_request`] for
/// dispatch. Write requests for accepted file kinds are completed on a spawned
/// task; the upload lands in the store only once every block has arrived.
/// Writes of any other name are refused with an access violation.
pub struct TftpServer {
    socket: UdpSocket,
    store: FileStore,
    config: TransferConfig,
    last_peer: Mutex<Option<SocketAddr>>,
    abort_next: AtomicBool,
    upload_kinds: Vec<FileKind>,
}

impl TftpServer {
    /// Listen on `port` on all IPv4 interfaces.
    pub async fn listen(port: u16, store: FileStore) -> Result<Self, TransferError> {
        Self::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)), store).await
    }

    pub async fn bind(addr: SocketAddr, store: FileStore) -> Result<Self, TransferError> {
        let socket = UdpSocket::bind(addr).await?;
        info!(addr = %socket.local_addr()?, root = %store.root().display(), "listening");
        Ok(Self {
            socket,
            store,
            config: TransferConfig::default(),
            last_peer: Mutex::new(None),
            abort_next: AtomicBool::new(false),
            upload_kinds: FileKind::ALL.to_vec(),
        })
    }

    pub fn with_config(mut self, config: TransferConfig) -> Self {
        self.config = config;
        self
    }

    /// Restrict which file kinds peers may upload. Every kind by default.
    pub fn with_upload_kinds(mut self, kinds: &[FileKind]) -> Self {
        self.upload_kinds = kinds.to_vec();
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransferError> {
        Ok(self.socket.local_addr()?)
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Refuse the next request.
    pub fn arm_abort(&self) {
        self.abort_next.store(true, Ordering::SeqCst);
    }

    async fn reject(&self, peer: SocketAddr, code: u16, message: &str) {
        let packet = Packet::error(code, message);
        if let Err(e) = self.socket.send_to(&packet.encode(), peer).await {
            debug!(%peer, error = %e, "failed to send error packet");
        }
    }

    /// Upload target for `filename`: its canonical name when the kind is accepted.
    fn upload_name(&self, filename: &str) -> Option<String> {
        let (stem, kind) = split_name(filename)?;
        self.upload_kinds.contains(&kind).then(|| kind.file_name(stem))
    }

    fn accept_upload(&self, filename: String, peer: SocketAddr) {
        let store = self.store.clone();
        let config = self.config;
        tokio::spawn(async move {
            let result: Result<(), TransferError> = async {
                let socket = ephemeral_socket(peer).await?;
                receive_data(
                    &socket,
                    Packet::Ack { block: 0 },
                    peer,
                    Peer::Bound(peer),
                    &config,
                    |bytes| Ok(store.write(&filename, &bytes)?),
                )
                .await
            }
            .await;
            match result {
                Ok(()) => info!(%peer, name = %filename, "upload stored"),
                Err(e) => warn!(%peer, name = %filename, error = %e, "upload failed"),
            }
        });
    }
}

#[async_trait]
impl ExchangeServer for TftpServer {
    async fn wait_for_request(&self) -> Option<String> {
        let mut buf = [0u8; MAX_DATAGRAM];
        let (len, peer) = match recv_request(&self.socket, self.config.request_wait, &mut buf).await? {
            Ok(received) => received,
            Err(e) => {
                warn!(error = %e, "receive failed");
                return None;
            }
        };

        let packet = match Packet::decode(&buf[..len]) {
            Ok(packet) => packet,
            Err(e) => {
                debug!(%peer, error = %e, "ignoring malformed request");
                return None;
            }
        };

        match packet {
            Packet::ReadRequest { filename, mode } | Packet::WriteRequest { filename, mode }
                if !Packet::is_octet_mode(&mode) =>
            {
                debug!(%peer, name = %filename, %mode, "unsupported transfer mode");
                self.reject(peer, ErrorCode::ILLEGAL_OPERATION, "only octet mode is supported")
                    .await;
                None
            }
            Packet::ReadRequest { filename, .. } => {
                if lcx_storage::validate_name(&filename).is_err() {
                    self.reject(peer, ErrorCode::ACCESS_VIOLATION, "invalid file name").await;
                    return None;
                }
                debug!(%peer, name = %filename, "read request");
                *self.last_peer.lock() = Some(peer);
                Some(filename)
            }
            Packet::WriteRequest { filename, .. } => {
                if lcx_storage::validate_name(&filename).is_err() {
                    self.reject(peer, ErrorCode::ACCESS_VIOLATION, "invalid file name").await;
                    return None;
                }
                let Some(name) = self.upload_name(&filename) else {
                    debug!(%peer, name = %filename, "refusing upload");
                    self.reject(peer, ErrorCode::ACCESS_VIOLATION, "upload not accepted").await;
                    return None;
                };
                debug!(%peer, name, "write request");
                self.accept_upload(name, peer);
                None
            }
            other => {
                // Transfer packets belong on a transfer port, not here
                debug!(%peer, packet = ?other, "unexpected packet on listening port");
                self.reject(peer, ErrorCode::UNKNOWN_TRANSFER_ID, "unknown transfer id").await;
                None
            }
        }
    }

    fn should_abort(&self) -> bool {
        self.abort_next.swap(false, Ordering::SeqCst)
    }

    async fn send_file(&self, name: &str) -> Result<(), TransferError> {
        let peer = (*self.last_peer.lock()).ok_or(TransferError::NoRequester)?;
        let socket = ephemeral_socket(peer).await?;

        let bytes = match self.store.read(name) {
            Ok(bytes) => bytes,
            Err(e) => {
                let code = match e {
                    StoreError::NotFound { .. } => ErrorCode::FILE_NOT_FOUND,
                    StoreError::InvalidName { .. } => ErrorCode::ACCESS_VIOLATION,
                    _ => ErrorCode::NOT_DEFINED,
                };
                let _ = socket.send_to(&Packet::error(code, e.to_string()).encode(), peer).await;
                return Err(e.into());
            }
        };

        send_data(&socket, peer, &bytes, &self.config).await?;
        info!(%peer, name, len = bytes.len(), "served");
        Ok(())
    }

    fn client_address(&self) -> Option<SocketAddr> {
        *self.last_peer.lock()
    }
}
