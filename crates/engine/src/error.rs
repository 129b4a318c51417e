// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for a trigger run

use jt_adapters::CiError;
use jt_core::{BuildRef, SelectorError, Stage};
use thiserror::Error;

/// Errors that end a run. Each one maps to exit status 1.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("{0}")]
    Usage(String),
    #[error("cannot reach server: {0}")]
    Connection(String),
    #[error("{0}")]
    NotFound(String),
    #[error("more than one job name found: {}", .0.join(", "))]
    AmbiguousMatch(Vec<String>),
    #[error("invalid job pattern: {0}")]
    InvalidPattern(String),
    #[error("job is disabled: {0}")]
    Disabled(String),
    #[error("couldn't parse the build arguments: {0}")]
    ArgumentParse(String),
    #[error("build request rejected by server (status {status})")]
    TriggerRejected { status: u16 },
    #[error("gave up waiting for build to {stage} ({build})")]
    Timeout { stage: Stage, build: BuildRef },
    #[error("{0}")]
    Server(String),
    #[error("internal error: {0}")]
    Invariant(String),
}

impl From<SelectorError> for RunError {
    fn from(e: SelectorError) -> Self {
        match e {
            SelectorError::InvalidPattern(re) => RunError::InvalidPattern(re.to_string()),
            other => RunError::Usage(other.to_string()),
        }
    }
}

impl From<CiError> for RunError {
    fn from(e: CiError) -> Self {
        match e {
            CiError::Connection(msg) => RunError::Connection(msg),
            other => RunError::Server(other.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
