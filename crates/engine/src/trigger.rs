// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Submitting a build request

use crate::RunError;
use jt_adapters::CiServer;
use jt_core::{JobIdentity, ParameterBindings};

/// How much of the server's answer to a trigger we care about
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriggerMode {
    /// Require a 2xx answer, then wait for the build
    #[default]
    Confirmed,
    /// Submit and stop; any answer the server gives counts as accepted
    FireAndForget,
}

/// Server acceptance of a build request. Says nothing about the build's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerOutcome {
    pub accepted: bool,
    pub status: u16,
    /// Queue item URL, when the server hands one out
    pub location: Option<String>,
}

/// Submit one build request for `job`. Never retried.
pub async fn trigger<S: CiServer>(
    server: &S,
    job: &JobIdentity,
    bindings: &ParameterBindings,
    mode: TriggerMode,
) -> Result<TriggerOutcome, RunError> {
    let response = server.trigger_build(job, bindings).await?;

    match mode {
        TriggerMode::Confirmed if !response.is_success() => Err(RunError::TriggerRejected {
            status: response.status,
        }),
        TriggerMode::Confirmed => Ok(TriggerOutcome {
            accepted: true,
            status: response.status,
            location: response.location,
        }),
        TriggerMode::FireAndForget => {
            if !response.is_success() {
                tracing::warn!(status = response.status, "server did not confirm the build request");
            }
            Ok(TriggerOutcome {
                accepted: true,
                status: response.status,
                location: response.location,
            })
        }
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
