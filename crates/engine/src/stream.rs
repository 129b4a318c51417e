// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console streaming for a running build.
//!
//! Streaming is best effort: failures are logged and reported back through
//! [`LogStream::finish`], never turned into a run error.

use jt_adapters::{CiError, CiServer};
use jt_core::{BuildRef, Clock};
use std::io::Write;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Default pause between console polls that returned nothing
pub const DEFAULT_LOG_INTERVAL: Duration = Duration::from_secs(1);

/// Errors that stop the console stream
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("console fetch failed: {0}")]
    Fetch(#[from] CiError),
    #[error("console write failed: {0}")]
    Write(#[from] std::io::Error),
    #[error("console task ended unexpectedly: {0}")]
    Task(String),
}

/// How a stream ended once its owner stopped waiting for it
#[derive(Debug)]
pub enum StreamEnd {
    /// Server reported no more output; total bytes seen
    Drained { bytes: u64 },
    Failed(StreamError),
    /// Still running when the grace period ran out
    Aborted,
}

/// Handle to the spawned console streaming task
pub struct LogStream {
    build: BuildRef,
    task: JoinHandle<Result<u64, StreamError>>,
}

impl LogStream {
    /// Start streaming `build`'s console into `sink` from offset zero.
    ///
    /// `interval` is slept between polls that returned no text.
    pub fn spawn<S, C, W>(server: S, build: BuildRef, clock: C, interval: Duration, sink: W) -> Self
    where
        S: CiServer,
        C: Clock,
        W: Write + Send + 'static,
    {
        tracing::debug!(build = %build, "starting console stream");
        let task = tokio::spawn(pump(server, build.clone(), clock, interval, sink));
        Self { build, task }
    }

    /// Give the stream up to `grace` to drain, then abort it.
    pub async fn finish(mut self, grace: Duration) -> StreamEnd {
        let end = match tokio::time::timeout(grace, &mut self.task).await {
            Ok(Ok(Ok(bytes))) => StreamEnd::Drained { bytes },
            Ok(Ok(Err(e))) => StreamEnd::Failed(e),
            Ok(Err(join)) => StreamEnd::Failed(StreamError::Task(join.to_string())),
            Err(_) => {
                self.task.abort();
                StreamEnd::Aborted
            }
        };

        match &end {
            StreamEnd::Drained { bytes } => {
                tracing::debug!(build = %self.build, bytes, "console stream drained")
            }
            StreamEnd::Failed(e) => {
                tracing::warn!(build = %self.build, error = %e, "console stream failed")
            }
            StreamEnd::Aborted => {
                tracing::debug!(build = %self.build, "console stream aborted after grace period")
            }
        }
        end
    }
}

async fn pump<S, C, W>(
    server: S,
    build: BuildRef,
    clock: C,
    interval: Duration,
    mut sink: W,
) -> Result<u64, StreamError>
where
    S: CiServer,
    C: Clock,
    W: Write + Send + 'static,
{
    let mut offset = 0u64;
    loop {
        let chunk = server.log_chunk(&build, offset).await?;
        if !chunk.text.is_empty() {
            sink.write_all(chunk.text.as_bytes())?;
            sink.flush()?;
        }
        offset = offset.max(chunk.next_offset);

        if !chunk.more {
            return Ok(offset);
        }
        if chunk.text.is_empty() {
            clock.sleep(interval).await;
        }
    }
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
