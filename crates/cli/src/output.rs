// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console rendering of run progress

use jt_core::{Verdict, WaitNotice};
use jt_engine::{Progress, Reporter, RunOutcome};
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

/// One output shared by progress lines and the build console.
///
/// Console text can stop mid-line; progress lines always start on a fresh one.
pub struct Console<W> {
    state: Arc<Mutex<ConsoleState<W>>>,
}

struct ConsoleState<W> {
    out: W,
    at_line_start: bool,
}

impl<W> Clone for Console<W> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self {
            state: Arc::new(Mutex::new(ConsoleState {
                out,
                at_line_start: true,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ConsoleState<W>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Write one complete line
    fn line(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        let mut state = self.lock();
        if !state.at_line_start {
            state.out.write_all(b"\n")?;
        }
        state.out.write_fmt(args)?;
        state.out.write_all(b"\n")?;
        state.at_line_start = true;
        state.out.flush()
    }

    #[cfg(test)]
    pub fn contents(&self) -> String
    where
        W: AsRef<[u8]>,
    {
        String::from_utf8_lossy(self.lock().out.as_ref()).into_owned()
    }
}

impl<W: Write> Write for Console<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.lock();
        let written = state.out.write(buf)?;
        if let Some(last) = buf[..written].last() {
            state.at_line_start = *last == b'\n';
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().out.flush()
    }
}

/// Prints progress as plain text lines
pub struct ConsoleReporter<W> {
    console: Console<W>,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(console: Console<W>) -> Self {
        Self { console }
    }

    /// Print the closing lines of a run that ended without error.
    ///
    /// A failed build is left to the caller, which reports it as an error.
    pub fn outcome(&mut self, outcome: &RunOutcome) {
        match outcome {
            RunOutcome::Triggered(_) => {
                let _ = self
                    .console
                    .line(format_args!("Not waiting for the build (--no-wait)"));
            }
            RunOutcome::Completed {
                verdict: Verdict::Passed { description },
                ..
            } => {
                if let Some(description) = description {
                    let _ = self.console.line(format_args!("{}", description));
                }
                let _ = self.console.line(format_args!("OK"));
            }
            RunOutcome::Completed { .. } => {}
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&mut self, progress: Progress) {
        let console = &self.console;
        let _ = match progress {
            Progress::Resolved(job) => console
                .line(format_args!("Found job {}", job.name))
                .and_then(|_| console.line(format_args!("Next build number: {}", job.next_build_number))),
            Progress::Bound(bindings) => {
                for (name, value) in &bindings {
                    let _ = console.line(format_args!("{}: {}", name, value));
                }
                console.line(format_args!("Triggering build with params: {:?}", bindings))
            }
            Progress::Triggered(outcome) => match outcome.location {
                Some(location) => console.line(format_args!("Build queued at {}", location)),
                None => console.line(format_args!("Build requested (status {})", outcome.status)),
            },
            Progress::Wait(WaitNotice::Appeared { build }) => {
                console.line(format_args!("Build #{} appeared", build.number))
            }
            Progress::Wait(WaitNotice::Started { build }) => {
                console.line(format_args!("Build #{} started", build.number))
            }
            Progress::Wait(WaitNotice::Finished { build, result }) => {
                console.line(format_args!("Build #{} finished: {}", build.number, result))
            }
            // Reported as the run's error
            Progress::Wait(WaitNotice::GaveUp { .. }) => Ok(()),
        };
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
