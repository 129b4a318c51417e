// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One trigger run: resolve, bind, trigger, wait, classify

use crate::stream::{LogStream, DEFAULT_LOG_INTERVAL};
use crate::trigger::{trigger, TriggerMode, TriggerOutcome};
use crate::waiter::{BuildWaiter, DEFAULT_POLL_INTERVAL};
use crate::{bind, resolve, RunError};
use jt_adapters::CiServer;
use jt_core::{
    BuildHandle, BuildRef, BuildState, Clock, Deadline, JobDetail, JobSelector, ParameterBindings,
    Verdict, WaitEffect, WaitNotice,
};
use std::io::Write;
use std::time::Duration;

/// Default wait budget shared by all wait stages
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(600);

/// Default time the console stream gets to drain after the build finished
pub const DEFAULT_STREAM_GRACE: Duration = Duration::from_secs(2);

/// Everything the user asked for in one invocation
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub selector: JobSelector,
    /// Trailing `key value` / `key=value` tokens
    pub raw_params: Vec<String>,
    pub mode: TriggerMode,
    /// Budget for the whole wait, from trigger to finish
    pub timeout: Duration,
}

/// Pacing for the polling loops
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub poll_interval: Duration,
    pub log_interval: Duration,
    pub stream_grace: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            log_interval: DEFAULT_LOG_INTERVAL,
            stream_grace: DEFAULT_STREAM_GRACE,
        }
    }
}

/// Milestones reported while a run progresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Resolved(JobDetail),
    Bound(ParameterBindings),
    Triggered(TriggerOutcome),
    Wait(WaitNotice),
}

/// Receives [`Progress`] as it happens
pub trait Reporter {
    fn report(&mut self, progress: Progress);
}

/// How a run ended without error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Fire-and-forget: the request was submitted, nothing was awaited
    Triggered(TriggerOutcome),
    /// The build finished; the verdict may still be a failure
    Completed { build: BuildRef, verdict: Verdict },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            RunOutcome::Triggered(_) => true,
            RunOutcome::Completed { verdict, .. } => verdict.is_success(),
        }
    }
}

/// Runs one request against a server
pub struct Runner<S, C> {
    server: S,
    clock: C,
    config: RunnerConfig,
}

impl<S, C> Runner<S, C>
where
    S: CiServer,
    C: Clock + Default,
{
    pub fn new(server: S, clock: C, config: RunnerConfig) -> Self {
        Self {
            server,
            clock,
            config,
        }
    }

    /// Execute `request`, writing the build console to `sink`.
    pub async fn run<R, W>(
        &self,
        request: RunRequest,
        reporter: &mut R,
        sink: W,
    ) -> Result<RunOutcome, RunError>
    where
        R: Reporter,
        W: Write + Send + 'static,
    {
        let job = resolve(&self.server, &request.selector).await?;
        let next_build = job.next_build_number;
        reporter.report(Progress::Resolved(job.clone()));

        if !job.buildable {
            return Err(RunError::Disabled(job.name.to_string()));
        }

        let bindings = bind(&job.parameters, &request.raw_params)?;
        reporter.report(Progress::Bound(bindings.clone()));

        let outcome = trigger(&self.server, &job.name, &bindings, request.mode).await?;
        reporter.report(Progress::Triggered(outcome.clone()));

        if request.mode == TriggerMode::FireAndForget {
            return Ok(RunOutcome::Triggered(outcome));
        }

        // The deadline starts right after the trigger and is never reset
        let deadline = Deadline::after(request.timeout, &self.clock);
        let handle = BuildHandle::new(BuildRef::new(job.name, next_build), deadline);
        let waiter = BuildWaiter::new(
            self.server.clone(),
            self.clock.clone(),
            self.config.poll_interval,
        );

        let mut sink = Some(sink);
        let mut stream: Option<LogStream> = None;
        let result = waiter
            .wait(handle, |effect| match effect {
                WaitEffect::StartLogStream(build) => {
                    if let Some(sink) = sink.take() {
                        // Separate clock instance so console pacing never moves the deadline
                        stream = Some(LogStream::spawn(
                            self.server.clone(),
                            build,
                            C::default(),
                            self.config.log_interval,
                            sink,
                        ));
                    }
                }
                WaitEffect::Emit(notice) => reporter.report(Progress::Wait(notice)),
            })
            .await;

        let handle = match result {
            Ok(handle) => handle,
            Err(e) => {
                finish_stream(stream, self.config.stream_grace).await;
                return Err(e);
            }
        };

        let outcome = match &handle.state {
            BuildState::Finished { result } => {
                let description = handle.latest.as_ref().and_then(|s| s.description.as_deref());
                Verdict::classify(result, description)
                    .map(|verdict| RunOutcome::Completed {
                        build: handle.build.clone(),
                        verdict,
                    })
                    .map_err(|e| RunError::Invariant(format!("{}: {}", handle.build, e)))
            }
            BuildState::GivenUp { stage } => Err(RunError::Timeout {
                stage: *stage,
                build: handle.build.clone(),
            }),
            other => Err(RunError::Invariant(format!(
                "wait ended in non-terminal state {:?}",
                other
            ))),
        };

        finish_stream(stream, self.config.stream_grace).await;
        outcome
    }
}

/// Stop the console stream, if one was started, so it never outlives the run
async fn finish_stream(stream: Option<LogStream>, grace: Duration) {
    if let Some(stream) = stream {
        stream.finish(grace).await;
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
