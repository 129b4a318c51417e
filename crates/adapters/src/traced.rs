// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::server::{CiError, CiServer, LogChunk, TriggerResponse};
use async_trait::async_trait;
use jt_core::{BuildRef, BuildStatus, JobDetail, JobIdentity, JobSummary, ParameterBindings};
use tracing::Instrument;

/// Wrapper that adds tracing to any CiServer
#[derive(Clone)]
pub struct TracedCiServer<S> {
    inner: S,
}

impl<S> TracedCiServer<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: CiServer> CiServer for TracedCiServer<S> {
    async fn list_jobs(&self) -> Result<Vec<JobSummary>, CiError> {
        let span = tracing::info_span!("ci.list_jobs");
        async {
            let start = std::time::Instant::now();
            let result = self.inner.list_jobs().await;
            let elapsed = start.elapsed();

            match &result {
                Ok(jobs) => tracing::info!(
                    count = jobs.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "listed jobs"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "list failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn job_detail(&self, job: &JobIdentity) -> Result<Option<JobDetail>, CiError> {
        let span = tracing::info_span!("ci.job_detail", job = %job);
        async {
            let start = std::time::Instant::now();
            let result = self.inner.job_detail(job).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(Some(detail)) => tracing::info!(
                    next_build = detail.next_build_number,
                    parameters = detail.parameters.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "fetched job"
                ),
                Ok(None) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "no such job"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "detail failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn trigger_build(
        &self,
        job: &JobIdentity,
        params: &ParameterBindings,
    ) -> Result<TriggerResponse, CiError> {
        let span = tracing::info_span!("ci.trigger", job = %job);
        async {
            tracing::info!(param_count = params.len(), "triggering");

            let start = std::time::Instant::now();
            let result = self.inner.trigger_build(job, params).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(response) if response.is_success() => tracing::info!(
                    status = response.status,
                    location = response.location.as_deref(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "build requested"
                ),
                Ok(response) => tracing::warn!(
                    status = response.status,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "trigger not accepted"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "trigger failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn build_status(&self, build: &BuildRef) -> Result<Option<BuildStatus>, CiError> {
        let result = self.inner.build_status(build).await;
        match &result {
            Ok(status) => tracing::debug!(
                build = %build,
                found = status.is_some(),
                building = status.as_ref().map(|s| s.building),
                result = status.as_ref().and_then(|s| s.result()),
                "polled"
            ),
            Err(e) => tracing::warn!(build = %build, error = %e, "poll failed"),
        }
        result
    }

    async fn log_chunk(&self, build: &BuildRef, offset: u64) -> Result<LogChunk, CiError> {
        let result = self.inner.log_chunk(build, offset).await;
        tracing::trace!(
            build = %build,
            offset,
            chunk_len = result.as_ref().map(|c| c.text.len()).ok(),
            more = result.as_ref().map(|c| c.more).ok(),
            "fetched console"
        );
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
