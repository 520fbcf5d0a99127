// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

const KEYS: &[&str] = &[
    "LCX_DIR",
    "LCX_PORT",
    "LCX_REMOTE_PORT",
    "LCX_CONFIG",
    "LCX_POLL_INTERVAL_MS",
    "LCX_MAX_CONSECUTIVE_ERRORS",
    "LCX_MAX_ITERATIONS",
    "LCX_ABORT_FIRST",
    "LCX_TRANSFER_TIMEOUT_MS",
    "LCX_LOG",
];

fn clear() {
    for key in KEYS {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn defaults_when_unset() {
    clear();
    assert_eq!(port(), 69);
    assert_eq!(remote_port(), None);
    assert_eq!(config_path(), None);
    assert_eq!(poll_interval(), Duration::from_secs(1));
    assert_eq!(max_consecutive_errors(), None);
    assert_eq!(max_iterations(), None);
    assert!(!abort_first());
    assert_eq!(transfer_timeout(), Duration::from_secs(1));
    assert_eq!(log_filter(), "info");
}

#[test]
#[serial]
fn values_are_parsed() {
    clear();
    std::env::set_var("LCX_PORT", "6969");
    std::env::set_var("LCX_REMOTE_PORT", "7070");
    std::env::set_var("LCX_POLL_INTERVAL_MS", "250");
    std::env::set_var("LCX_MAX_CONSECUTIVE_ERRORS", "4");
    std::env::set_var("LCX_MAX_ITERATIONS", "100");
    std::env::set_var("LCX_TRANSFER_TIMEOUT_MS", "40");
    std::env::set_var("LCX_LOG", "lcx_engine=debug");

    assert_eq!(port(), 6969);
    assert_eq!(remote_port(), Some(7070));
    assert_eq!(poll_interval(), Duration::from_millis(250));
    assert_eq!(max_consecutive_errors(), Some(4));
    assert_eq!(max_iterations(), Some(100));
    assert_eq!(transfer_timeout(), Duration::from_millis(40));
    assert_eq!(log_filter(), "lcx_engine=debug");
    clear();
}

#[test]
#[serial]
fn unparsable_values_fall_back() {
    clear();
    std::env::set_var("LCX_PORT", "not-a-port");
    std::env::set_var("LCX_MAX_ITERATIONS", "-3");
    assert_eq!(port(), DEFAULT_PORT);
    assert_eq!(max_iterations(), None);
    clear();
}

#[test]
#[serial]
fn abort_first_flag() {
    for (value, expected) in [("1", true), ("yes", true), ("0", false), ("false", false), ("", false)] {
        clear();
        std::env::set_var("LCX_ABORT_FIRST", value);
        assert_eq!(abort_first(), expected, "LCX_ABORT_FIRST={value:?}");
    }
    clear();
}

#[test]
#[serial]
fn store_dir_precedence() {
    clear();
    let xdg = std::env::var("XDG_STATE_HOME").ok();

    std::env::set_var("XDG_STATE_HOME", "/xdg");
    assert_eq!(store_dir().unwrap(), PathBuf::from("/xdg/lcx"));

    std::env::set_var("LCX_DIR", "/explicit");
    assert_eq!(store_dir().unwrap(), PathBuf::from("/explicit"));

    clear();
    match xdg {
        Some(value) => std::env::set_var("XDG_STATE_HOME", value),
        None => std::env::remove_var("XDG_STATE_HOME"),
    }
}
