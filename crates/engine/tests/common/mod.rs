// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for engine scenario tests.

#![allow(dead_code)]

use jt_engine::{Progress, Reporter, RunnerConfig};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Console sink that keeps everything written to it
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Reporter that records every milestone
#[derive(Default)]
pub struct Recorded(pub Vec<Progress>);

impl Reporter for Recorded {
    fn report(&mut self, progress: Progress) {
        self.0.push(progress);
    }
}

/// Production pacing; the fake clock makes it free
pub fn config() -> RunnerConfig {
    RunnerConfig {
        stream_grace: Duration::from_millis(500),
        ..RunnerConfig::default()
    }
}
