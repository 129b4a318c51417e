// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jt execution engine: resolve a job, bind its parameters, trigger it and
//! follow the build to a verdict

mod error;
mod params;
mod resolver;
mod runner;
pub mod stream;
mod trigger;
mod waiter;

pub use error::RunError;
pub use params::bind;
pub use resolver::resolve;
pub use runner::{
    Progress, Reporter, RunOutcome, RunRequest, Runner, RunnerConfig, DEFAULT_STREAM_GRACE,
    DEFAULT_WAIT_TIMEOUT,
};
pub use stream::{LogStream, StreamEnd, StreamError, DEFAULT_LOG_INTERVAL};
pub use trigger::{trigger, TriggerMode, TriggerOutcome};
pub use waiter::{BuildWaiter, DEFAULT_POLL_INTERVAL};
