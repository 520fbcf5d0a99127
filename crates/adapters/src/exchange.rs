// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exchange boundary consumed by the poll controller and the dispatcher.

use std::net::SocketAddr;

use async_trait::async_trait;
use lcx_storage::StoreError;
use thiserror::Error;

use crate::tftp::PacketError;

/// Errors from a file transfer. The caller sees one outcome per transfer.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no response after {attempts} attempts")]
    Timeout { attempts: u32 },

    #[error("remote error {code}: {message}")]
    Remote { code: u16, message: String },

    #[error("malformed packet: {0}")]
    Packet(#[from] PacketError),

    #[error("no requester to serve")]
    NoRequester,

    #[error("unexpected packet: {0}")]
    Unexpected(String),
}

/// Pushes named files from the local store to one remote endpoint.
#[async_trait]
pub trait ExchangeClient: Clone + Send + Sync + 'static {
    /// Upload the named file; succeeds only once the remote acknowledged all of it.
    async fn upload(&self, name: &str) -> Result<(), TransferError>;
}

/// Accepts inbound requests and serves files back to the requester.
#[async_trait]
pub trait ExchangeServer: Send + Sync + 'static {
    /// Wait for the next request. `None` means nothing to dispatch; poll again.
    async fn wait_for_request(&self) -> Option<String>;

    /// True when the next request should be refused. Resets after returning true.
    fn should_abort(&self) -> bool;

    /// Serve the named file's current bytes to the most recent requester.
    async fn send_file(&self, name: &str) -> Result<(), TransferError>;

    /// Address of the most recent requester.
    fn client_address(&self) -> Option<SocketAddr>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use std::collections::VecDeque;
    use std::net::SocketAddr;
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::{ExchangeClient, ExchangeServer, TransferError};

    type UploadHook = Arc<dyn Fn(&str, usize) + Send + Sync>;

    #[derive(Default)]
    struct FakeClientState {
        uploads: Vec<String>,
        fail_next: u32,
        fail_always: bool,
        hook: Option<UploadHook>,
    }

    /// Fake exchange client recording every upload attempt
    #[derive(Clone, Default)]
    pub struct FakeExchangeClient {
        inner: Arc<Mutex<FakeClientState>>,
    }

    impl FakeExchangeClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Names of every attempted upload, in order
        pub fn uploads(&self) -> Vec<String> {
            self.inner.lock().uploads.clone()
        }

        /// Fail the next `count` uploads
        pub fn fail_next(&self, count: u32) {
            self.inner.lock().fail_next = count;
        }

        pub fn fail_always(&self, fail: bool) {
            self.inner.lock().fail_always = fail;
        }

        /// Run `hook(name, attempt_index)` on every upload attempt, before
        /// the outcome is decided. Stands in for the remote's reaction.
        pub fn on_upload(&self, hook: impl Fn(&str, usize) + Send + Sync + 'static) {
            self.inner.lock().hook = Some(Arc::new(hook));
        }
    }

    #[async_trait]
    impl ExchangeClient for FakeExchangeClient {
        async fn upload(&self, name: &str) -> Result<(), TransferError> {
            let (hook, index, fail) = {
                let mut state = self.inner.lock();
                state.uploads.push(name.to_string());
                let fail = state.fail_always || state.fail_next > 0;
                state.fail_next = state.fail_next.saturating_sub(1);
                (state.hook.clone(), state.uploads.len() - 1, fail)
            };
            if let Some(hook) = hook {
                hook(name, index);
            }
            if fail {
                return Err(TransferError::Timeout { attempts: 0 });
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeServerState {
        requests: VecDeque<(String, SocketAddr)>,
        peer: Option<SocketAddr>,
        abort_next: bool,
        served: Vec<(String, Option<SocketAddr>)>,
        fail_sends: bool,
    }

    /// Fake exchange server fed with scripted requests
    #[derive(Clone, Default)]
    pub struct FakeExchangeServer {
        inner: Arc<Mutex<FakeServerState>>,
    }

    impl FakeExchangeServer {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a request from `peer`
        pub fn push_request(&self, name: &str, peer: SocketAddr) {
            self.inner.lock().requests.push_back((name.to_string(), peer));
        }

        pub fn arm_abort(&self) {
            self.inner.lock().abort_next = true;
        }

        pub fn is_abort_armed(&self) -> bool {
            self.inner.lock().abort_next
        }

        pub fn fail_sends(&self, fail: bool) {
            self.inner.lock().fail_sends = fail;
        }

        /// Files served so far, with the peer each went to
        pub fn served(&self) -> Vec<(String, Option<SocketAddr>)> {
            self.inner.lock().served.clone()
        }

        pub fn pending(&self) -> usize {
            self.inner.lock().requests.len()
        }
    }

    #[async_trait]
    impl ExchangeServer for FakeExchangeServer {
        async fn wait_for_request(&self) -> Option<String> {
            let mut state = self.inner.lock();
            let (name, peer) = state.requests.pop_front()?;
            state.peer = Some(peer);
            Some(name)
        }

        fn should_abort(&self) -> bool {
            std::mem::take(&mut self.inner.lock().abort_next)
        }

        async fn send_file(&self, name: &str) -> Result<(), TransferError> {
            let mut state = self.inner.lock();
            if state.fail_sends {
                return Err(TransferError::Timeout { attempts: 0 });
            }
            let peer = state.peer;
            state.served.push((name.to_string(), peer));
            Ok(())
        }

        fn client_address(&self) -> Option<SocketAddr> {
            self.inner.lock().peer
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeExchangeClient, FakeExchangeServer};

#[cfg(test)]
#[path = "exchange_tests.rs"]
mod tests;
