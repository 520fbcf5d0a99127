// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lcx_core::test_support::demo_line_config;
use lcx_core::{InfoRecord, StatusCode};
use tempfile::TempDir;
use tokio::net::UdpSocket;

/// A UDP port that never answers, so every upload times out quickly.
struct Fixture {
    _dir: TempDir,
    _silent: UdpSocket,
    store: FileStore,
    sessions: Sessions,
    cancel: CancellationToken,
}

async fn fixture(policy: ContinuationPolicy) -> Fixture {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let settings = SessionSettings {
        remote_port: silent.local_addr().unwrap().port(),
        poll_interval: Duration::from_millis(5),
        policy,
        transfer: TransferConfig {
            timeout: Duration::from_millis(10),
            retries: 0,
            request_wait: Duration::from_millis(10),
        },
    };
    let cancel = CancellationToken::new();
    let sessions = Sessions::new(settings, store.clone(), demo_line_config(), cancel.clone());
    Fixture { _dir: dir, _silent: silent, store, sessions, cancel }
}

fn peer() -> SocketAddr {
    "127.0.0.1:4000".parse().unwrap()
}

async fn wait_for_reports(sessions: &Sessions, count: usize) -> Vec<SessionReport> {
    for _ in 0..500 {
        let finished = sessions.finished();
        if finished.len() >= count {
            return finished;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("sessions did not finish: {:?}", sessions.finished());
}

#[tokio::test]
async fn session_exhausts_against_silent_station() {
    let fx = fixture(ContinuationPolicy { max_consecutive_errors: None, max_iterations: Some(2) })
        .await;

    assert!(fx.sessions.launch("st1", peer()));
    let reports = wait_for_reports(&fx.sessions, 1).await;

    assert_eq!(reports[0].stem, "st1");
    assert_eq!(reports[0].outcome(), Some(PollOutcome::Exhausted));
    let report = reports[0].report.as_ref().unwrap();
    assert_eq!(report.iterations, 2);
    // Initial list plus one status per iteration, all unanswered
    assert_eq!(report.uploads_attempted, 3);
    assert_eq!(report.uploads_failed, 3);
    assert!(fx.store.exists("st1.LCL"));
    assert!(fx.store.exists("st1.LCS"));
}

#[tokio::test]
async fn session_completes_when_info_file_is_terminal() {
    let fx = fixture(ContinuationPolicy::unbounded()).await;
    fx.store.generate("st1.LCI", &InfoRecord::acknowledgement(StatusCode::COMPLETE)).unwrap();

    assert!(fx.sessions.launch("st1", peer()));
    let reports = wait_for_reports(&fx.sessions, 1).await;

    assert_eq!(reports[0].outcome(), Some(PollOutcome::Done));
    assert_eq!(reports[0].report.as_ref().unwrap().last_status, Some(StatusCode::COMPLETE));
}

#[tokio::test]
async fn duplicate_launch_refused_while_running() {
    let fx = fixture(ContinuationPolicy::unbounded()).await;

    assert!(fx.sessions.launch("st1", peer()));
    assert!(!fx.sessions.launch("st1", peer()));
    assert!(fx.sessions.launch("st2", peer()));
    assert_eq!(fx.sessions.active_count(), 2);

    let reports = fx.sessions.join_all().await;
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.report.is_none()));
    assert_eq!(fx.sessions.active_count(), 0);
}

#[tokio::test]
async fn is_running_tracks_live_sessions() {
    let fx = fixture(ContinuationPolicy::unbounded()).await;

    assert!(!fx.sessions.is_running("st1"));
    assert!(fx.sessions.launch("st1", peer()));
    assert!(fx.sessions.is_running("st1"));
    assert!(!fx.sessions.is_running("st2"));

    fx.sessions.join_all().await;
    assert!(!fx.sessions.is_running("st1"));
}

#[tokio::test]
async fn relaunch_allowed_after_session_ends() {
    let fx = fixture(ContinuationPolicy { max_consecutive_errors: Some(1), max_iterations: None })
        .await;

    assert!(fx.sessions.launch("st1", peer()));
    let first = wait_for_reports(&fx.sessions, 1).await;
    assert_eq!(first[0].outcome(), Some(PollOutcome::Escalated));

    // The finished task may not be observed as finished for a moment
    let mut relaunched = false;
    for _ in 0..100 {
        if fx.sessions.launch("st1", peer()) {
            relaunched = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(relaunched);
    wait_for_reports(&fx.sessions, 2).await;
}

#[tokio::test]
async fn launch_refused_after_cancel() {
    let fx = fixture(ContinuationPolicy::unbounded()).await;
    fx.cancel.cancel();
    assert!(!fx.sessions.launch("st1", peer()));
    assert!(fx.sessions.join_all().await.is_empty());
}

#[tokio::test]
async fn run_until_cancelled_returns_none_on_cancel() {
    let fx = fixture(ContinuationPolicy::unbounded()).await;
    let config = SessionConfig::for_station(peer(), fx.store.root(), "st9");
    let client = TftpClient::new(peer(), fx.store.clone());
    let controller = PollController::new(config, demo_line_config(), client, SystemClock);

    let cancel = CancellationToken::new();
    cancel.cancel();
    assert_eq!(run_until_cancelled(controller, cancel).await, None);
}
