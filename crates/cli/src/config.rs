// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tunables read from the environment

use jt_adapters::server::DEFAULT_HTTP_TIMEOUT;
use jt_engine::{RunnerConfig, DEFAULT_LOG_INTERVAL, DEFAULT_POLL_INTERVAL, DEFAULT_STREAM_GRACE};
use std::time::Duration;

// Env vars in milliseconds
fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Pause between build status polls
pub fn poll_interval() -> Duration {
    parse_duration_ms("JT_POLL_INTERVAL_MS").unwrap_or(DEFAULT_POLL_INTERVAL)
}

/// Pause between console polls that returned nothing
pub fn log_interval() -> Duration {
    parse_duration_ms("JT_LOG_INTERVAL_MS").unwrap_or(DEFAULT_LOG_INTERVAL)
}

/// Time the console stream gets to drain once the build finished
pub fn stream_grace() -> Duration {
    parse_duration_ms("JT_STREAM_GRACE_MS").unwrap_or(DEFAULT_STREAM_GRACE)
}

/// Timeout for a single HTTP request
pub fn http_timeout() -> Duration {
    parse_duration_ms("JT_HTTP_TIMEOUT_MS").unwrap_or(DEFAULT_HTTP_TIMEOUT)
}

pub fn runner_config() -> RunnerConfig {
    RunnerConfig {
        poll_interval: poll_interval(),
        log_interval: log_interval(),
        stream_grace: stream_grace(),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
