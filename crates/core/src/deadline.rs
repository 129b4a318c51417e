// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared wall-clock budget for a build wait

use crate::clock::Clock;
use std::time::{Duration, Instant};

/// A single expiry instant shared by every wait stage.
///
/// Computed once when the wait starts and never reset; time spent waiting
/// for the build to appear is no longer available for waiting on it to
/// finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    started_at: Instant,
    expires_at: Instant,
}

impl Deadline {
    /// Start a budget of `budget` from the clock's current time
    pub fn after(budget: Duration, clock: &impl Clock) -> Self {
        let started_at = clock.now();
        Deadline {
            started_at,
            expires_at: started_at + budget,
        }
    }

    pub fn is_expired(&self, clock: &impl Clock) -> bool {
        clock.now() >= self.expires_at
    }

    /// Time spent since the budget started
    pub fn elapsed(&self, clock: &impl Clock) -> Duration {
        clock.now().saturating_duration_since(self.started_at)
    }
}

#[cfg(test)]
#[path = "deadline_tests.rs"]
mod tests;
