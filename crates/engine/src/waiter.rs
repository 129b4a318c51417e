// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives the build-wait state machine against a server

use crate::RunError;
use jt_adapters::CiServer;
use jt_core::{BuildHandle, Clock, Observation, WaitEffect};
use std::time::Duration;

/// Default pause between status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Polls one build until it finishes or the shared deadline passes
pub struct BuildWaiter<S, C> {
    server: S,
    clock: C,
    poll_interval: Duration,
}

impl<S, C> BuildWaiter<S, C>
where
    S: CiServer,
    C: Clock,
{
    pub fn new(server: S, clock: C, poll_interval: Duration) -> Self {
        Self {
            server,
            clock,
            poll_interval,
        }
    }

    /// Poll until `handle` reaches a terminal state.
    ///
    /// Effects are handed to `on_effect` in the order the state machine
    /// produced them. Returns the terminal handle; giving up is not an error
    /// here, the caller decides what it means.
    pub async fn wait<F>(&self, mut handle: BuildHandle, mut on_effect: F) -> Result<BuildHandle, RunError>
    where
        F: FnMut(WaitEffect),
    {
        loop {
            let observation = match self.server.build_status(&handle.build).await? {
                Some(status) => Observation::Found(status),
                None => Observation::Missing,
            };

            let (next, effects) = handle.transition(observation, &self.clock);
            if next.state != handle.state {
                tracing::info!(
                    build = %next.build,
                    from = ?handle.state,
                    to = ?next.state,
                    polls = next.polls,
                    "build state changed"
                );
            }
            handle = next;
            effects.into_iter().for_each(&mut on_effect);

            if handle.is_terminal() {
                return Ok(handle);
            }
            self.clock.sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
#[path = "waiter_tests.rs"]
mod tests;
