// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job resolution: exact name or pattern search over the job list

use crate::RunError;
use jt_adapters::CiServer;
use jt_core::{JobDetail, JobIdentity, JobSelector};

/// Resolve `selector` to exactly one job and fetch its detail.
///
/// A pattern that matches several jobs is an error listing every match;
/// nothing is picked on the caller's behalf.
pub async fn resolve<S: CiServer>(server: &S, selector: &JobSelector) -> Result<JobDetail, RunError> {
    let name = match selector {
        JobSelector::Name(name) => name.clone(),
        JobSelector::Pattern(_) => {
            let jobs = server.list_jobs().await?;
            let mut matches = selector.matches(jobs.iter().map(|j| j.name.as_str()));
            tracing::debug!(
                pattern = %selector,
                candidates = jobs.len(),
                matched = matches.len(),
                "searched job list"
            );
            match matches.len() {
                0 => return Err(RunError::NotFound("no matching job name found".to_string())),
                1 => JobIdentity(matches.remove(0)),
                _ => return Err(RunError::AmbiguousMatch(matches)),
            }
        }
    };

    server
        .job_detail(&name)
        .await?
        .ok_or_else(|| RunError::NotFound(format!("no job found: {}", name)))
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
