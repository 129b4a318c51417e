// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build wait state machine
//!
//! Tracks a freshly triggered build through
//! `AwaitingExistence → AwaitingStart → Running → Finished`, giving up when
//! the shared [`Deadline`] passes in any waiting state. The machine is
//! pure: a driver polls the server, feeds each [`Observation`] to
//! [`BuildHandle::transition`], and performs the returned effects.

use crate::build::{BuildRef, BuildStatus};
use crate::clock::Clock;
use crate::deadline::Deadline;
use std::time::Duration;

/// Which wait stage ran out of budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Existence,
    Start,
    Finish,
}

impl Stage {
    /// Verb used in "gave up waiting for build to ..." messages
    pub fn verb(&self) -> &'static str {
        match self {
            Stage::Existence => "exist",
            Stage::Start => "start",
            Stage::Finish => "finish",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.verb())
    }
}

/// The state of a build wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildState {
    /// Triggered, but the numbered build is not visible yet (still queued)
    AwaitingExistence,
    /// Build exists but has not started executing
    AwaitingStart,
    /// Build is executing
    Running,
    /// Build has a result. Never empty.
    Finished { result: String },
    /// Deadline passed while waiting in `stage`
    GivenUp { stage: Stage },
}

impl BuildState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BuildState::Finished { .. } | BuildState::GivenUp { .. })
    }

    /// Stage being waited on, if still waiting
    pub fn stage(&self) -> Option<Stage> {
        match self {
            BuildState::AwaitingExistence => Some(Stage::Existence),
            BuildState::AwaitingStart => Some(Stage::Start),
            BuildState::Running => Some(Stage::Finish),
            BuildState::Finished { .. } | BuildState::GivenUp { .. } => None,
        }
    }

    /// Position in the lifecycle; never decreases across transitions
    pub fn rank(&self) -> u8 {
        match self {
            BuildState::AwaitingExistence => 0,
            BuildState::AwaitingStart => 1,
            BuildState::Running => 2,
            BuildState::Finished { .. } | BuildState::GivenUp { .. } => 3,
        }
    }
}

/// Result of one poll of the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// The build does not exist (yet)
    Missing,
    Found(BuildStatus),
}

/// Notable moments in a wait, for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitNotice {
    Appeared { build: BuildRef },
    Started { build: BuildRef },
    Finished { build: BuildRef, result: String },
    GaveUp {
        build: BuildRef,
        stage: Stage,
        elapsed: Duration,
    },
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitEffect {
    /// Begin streaming console output for the build (emitted once)
    StartLogStream(BuildRef),
    Emit(WaitNotice),
}

/// A triggered build being waited on
#[derive(Debug, Clone)]
pub struct BuildHandle {
    pub build: BuildRef,
    pub state: BuildState,
    pub deadline: Deadline,
    /// Most recent server snapshot, replaced wholesale on every refresh
    pub latest: Option<BuildStatus>,
    /// Number of observations consumed
    pub polls: u32,
}

impl BuildHandle {
    pub fn new(build: BuildRef, deadline: Deadline) -> Self {
        BuildHandle {
            build,
            state: BuildState::AwaitingExistence,
            deadline,
            latest: None,
            polls: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Final result, once finished
    pub fn result(&self) -> Option<&str> {
        match &self.state {
            BuildState::Finished { result } => Some(result),
            _ => None,
        }
    }

    /// Pure transition function - returns new state and effects
    pub fn transition(
        &self,
        observation: Observation,
        clock: &impl Clock,
    ) -> (BuildHandle, Vec<WaitEffect>) {
        if self.is_terminal() {
            return (self.clone(), vec![]);
        }

        let mut next = BuildHandle {
            polls: self.polls + 1,
            ..self.clone()
        };
        let mut effects = Vec::new();

        if let Observation::Found(status) = observation {
            if next.state == BuildState::AwaitingExistence {
                next.state = BuildState::AwaitingStart;
                effects.push(WaitEffect::Emit(WaitNotice::Appeared {
                    build: self.build.clone(),
                }));
                effects.push(WaitEffect::StartLogStream(self.build.clone()));
            }

            // A result short-circuits the remaining stages
            if let Some(result) = status.result() {
                let result = result.to_string();
                effects.push(WaitEffect::Emit(WaitNotice::Finished {
                    build: self.build.clone(),
                    result: result.clone(),
                }));
                next.state = BuildState::Finished { result };
            } else if status.building && next.state == BuildState::AwaitingStart {
                next.state = BuildState::Running;
                effects.push(WaitEffect::Emit(WaitNotice::Started {
                    build: self.build.clone(),
                }));
            }

            next.latest = Some(status);
        }

        // Only a poll that made no progress can give up
        if next.state == self.state && self.deadline.is_expired(clock) {
            if let Some(stage) = self.state.stage() {
                next.state = BuildState::GivenUp { stage };
                effects.push(WaitEffect::Emit(WaitNotice::GaveUp {
                    build: self.build.clone(),
                    stage,
                    elapsed: self.deadline.elapsed(clock),
                }));
            }
        }

        (next, effects)
    }
}

#[cfg(test)]
#[path = "wait_tests.rs"]
mod tests;
