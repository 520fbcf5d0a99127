// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

/// A daemon config on an ephemeral port with fast transfers.
pub(super) fn test_config(dir: &std::path::Path) -> Config {
    let mut config = Config::for_dir(dir);
    config.port = 0;
    config.poll_interval = Duration::from_millis(10);
    config.transfer = TransferConfig {
        timeout: Duration::from_millis(20),
        retries: 0,
        request_wait: Duration::from_millis(20),
    };
    config
}

#[test]
fn config_for_dir_defaults() {
    let config = Config::for_dir("/tmp/lcx");
    assert_eq!(config.lock_path, PathBuf::from("/tmp/lcx/lcxd.pid"));
    assert_eq!(config.log_path, PathBuf::from("/tmp/lcx/lcxd.log"));
    assert_eq!(config.port, 69);
    assert_eq!(config.remote_port, 69);
    assert_eq!(config.lines_path, None);
    assert_eq!(config.policy, ContinuationPolicy::unbounded());
    assert!(!config.abort_first);
}

#[tokio::test]
async fn daemon_starts_and_shuts_down_cleanly() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let lock_path = config.lock_path.clone();

    let daemon = Daemon::start(config).await.unwrap();
    assert_ne!(daemon.local_addr().port(), 0);
    assert_eq!(daemon.line_config.lines().len(), 2);
    let pid = std::fs::read_to_string(&lock_path).unwrap();
    assert_eq!(pid.trim(), std::process::id().to_string());
    assert_eq!(daemon.sessions().active_count(), 0);

    let reports = daemon.shutdown().await.unwrap();
    assert!(reports.is_empty());
    assert!(!lock_path.exists());
}

#[tokio::test]
async fn second_daemon_on_same_dir_fails_to_lock() {
    let dir = TempDir::new().unwrap();
    let first = Daemon::start(test_config(dir.path())).await.unwrap();

    match Daemon::start(test_config(dir.path())).await {
        Err(LifecycleError::LockFailed(_)) => {}
        Err(e) => panic!("expected LockFailed, got: {e}"),
        Ok(_) => panic!("expected LockFailed, but startup succeeded"),
    }
    // The running daemon keeps its PID file
    assert!(first.config.lock_path.exists());

    first.shutdown().await.unwrap();
}

#[tokio::test]
async fn cancel_token_stops_listener() {
    let dir = TempDir::new().unwrap();
    let daemon = Daemon::start(test_config(dir.path())).await.unwrap();
    let token = daemon.cancel_token();
    token.cancel();
    assert!(daemon.shutdown().await.unwrap().is_empty());
}
