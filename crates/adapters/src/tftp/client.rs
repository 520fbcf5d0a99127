// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::net::SocketAddr;

use async_trait::async_trait;
use lcx_storage::FileStore;
use tracing::info;

use super::packet::Packet;
use super::transfer::{ephemeral_socket, exchange, receive_data, send_data, Peer, TransferConfig};
use crate::exchange::{ExchangeClient, TransferError};

/// TFTP client bound to one remote endpoint, reading and writing a local store.
#[derive(Debug, Clone)]
pub struct TftpClient {
    endpoint: SocketAddr,
    store: FileStore,
    config: TransferConfig,
}

impl TftpClient {
    pub fn new(endpoint: SocketAddr, store: FileStore) -> Self {
        Self { endpoint, store, config: TransferConfig::default() }
    }

    pub fn with_config(mut self, config: TransferConfig) -> Self {
        self.config = config;
        self
    }

    /// Fetch `name` from the endpoint into the local store. Returns its length.
    pub async fn download(&self, name: &str) -> Result<usize, TransferError> {
        lcx_storage::validate_name(name)?;
        let socket = ephemeral_socket(self.endpoint).await?;
        let store = &self.store;
        let len = receive_data(
            &socket,
            Packet::read_request(name),
            self.endpoint,
            Peer::Host(self.endpoint.ip()),
            &self.config,
            |bytes| {
                store.write(name, &bytes)?;
                Ok(bytes.len())
            },
        )
        .await?;
        info!(endpoint = %self.endpoint, name, len, "downloaded");
        Ok(len)
    }
}

#[async_trait]
impl ExchangeClient for TftpClient {
    async fn upload(&self, name: &str) -> Result<(), TransferError> {
        let bytes = self.store.read(name)?;
        let socket = ephemeral_socket(self.endpoint).await?;

        let (_, peer) = exchange(
            &socket,
            &Packet::write_request(name),
            self.endpoint,
            Peer::Host(self.endpoint.ip()),
            &self.config,
            |reply| matches!(reply, Packet::Ack { block: 0 }),
        )
        .await?;

        send_data(&socket, peer, &bytes, &self.config).await?;
        info!(endpoint = %self.endpoint, name, len = bytes.len(), "uploaded");
        Ok(())
    }
}
