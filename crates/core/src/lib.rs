// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jt-core: Core types for the jt job trigger
//!
//! This crate provides:
//! - Job selection and declared build parameters
//! - Build identity and server snapshots
//! - The pure build-wait state machine and its shared deadline
//! - Classification of finished builds
//! - A clock abstraction so waits can be tested without sleeping

pub mod build;
pub mod clock;
pub mod deadline;
pub mod job;
pub mod verdict;
pub mod wait;

// Re-exports
pub use build::{BuildRef, BuildStatus};
pub use clock::{Clock, FakeClock, SystemClock};
pub use deadline::Deadline;
pub use job::{
    JobDetail, JobIdentity, JobSelector, JobSummary, ParameterBindings, ParameterDefinition,
    ParameterSchema, SelectorError,
};
pub use verdict::{EmptyResult, Verdict};
pub use wait::{BuildHandle, BuildState, Observation, Stage, WaitEffect, WaitNotice};
