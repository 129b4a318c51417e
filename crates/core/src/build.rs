// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build identity and server-side build snapshots

use crate::job::JobIdentity;
use serde::{Deserialize, Serialize};

/// Identifies one numbered build of a job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildRef {
    pub job: JobIdentity,
    pub number: u64,
}

impl BuildRef {
    pub fn new(job: impl Into<JobIdentity>, number: u64) -> Self {
        BuildRef {
            job: job.into(),
            number,
        }
    }
}

impl std::fmt::Display for BuildRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} #{}", self.job, self.number)
    }
}

/// One snapshot of a build as reported by the server.
///
/// Snapshots are replaced wholesale on every refresh, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStatus {
    pub number: u64,
    /// Whether the build is executing right now
    pub building: bool,
    /// Final result (`SUCCESS`, `FAILURE`, ...); `None` until finished
    pub result: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}

impl BuildStatus {
    /// A queued-but-not-started snapshot
    pub fn pending(number: u64) -> Self {
        BuildStatus {
            number,
            building: false,
            result: None,
            description: None,
            url: None,
        }
    }

    pub fn running(number: u64) -> Self {
        BuildStatus {
            building: true,
            ..Self::pending(number)
        }
    }

    pub fn finished(number: u64, result: impl Into<String>) -> Self {
        BuildStatus {
            result: normalize_result(Some(result.into())),
            ..Self::pending(number)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The result, if the build has one
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref().filter(|r| !r.is_empty())
    }
}

/// Treat a blank result string the same as a missing one
pub fn normalize_result(result: Option<String>) -> Option<String> {
    result.filter(|r| !r.trim().is_empty())
}
