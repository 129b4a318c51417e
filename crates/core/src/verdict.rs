// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classification of a finished build's result

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only result that counts as a pass
pub const SUCCESS: &str = "SUCCESS";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("finished build has an empty result")]
pub struct EmptyResult;

/// Overall outcome of a finished build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Passed { description: Option<String> },
    Failed { result: String },
}

impl Verdict {
    /// Classify a result string. An empty result cannot come out of a
    /// finished wait, so it is reported rather than guessed at.
    pub fn classify(result: &str, description: Option<&str>) -> Result<Verdict, EmptyResult> {
        match result.trim() {
            "" => Err(EmptyResult),
            SUCCESS => Ok(Verdict::Passed {
                description: description
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(str::to_string),
            }),
            other => Ok(Verdict::Failed {
                result: other.to_string(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Passed { .. })
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Passed { .. } => write!(f, "OK"),
            Verdict::Failed { result } => write!(f, "build failed: {}", result),
        }
    }
}
