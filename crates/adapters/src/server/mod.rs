// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CI server adapters

mod jenkins;
mod wire;

pub use jenkins::{JenkinsAdapter, JenkinsConfig, DEFAULT_HTTP_TIMEOUT};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeCiServer, FakeJob, ServerCall};

use async_trait::async_trait;
use jt_core::{BuildRef, BuildStatus, JobDetail, JobIdentity, JobSummary, ParameterBindings};
use thiserror::Error;

/// Errors from CI server operations
#[derive(Debug, Error)]
pub enum CiError {
    /// The server could not be reached (DNS, refused, TLS, timeout)
    #[error("cannot reach server: {0}")]
    Connection(String),
    /// The server answered with an unexpected status
    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },
    /// The response body was not what we expected
    #[error("unexpected response from server: {0}")]
    Decode(String),
}

/// Raw answer to a build trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerResponse {
    pub status: u16,
    /// Queue item URL, when the server hands one out
    pub location: Option<String>,
}

impl TriggerResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A slice of a build's console output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogChunk {
    pub text: String,
    /// Offset to request next
    pub next_offset: u64,
    /// Whether the server expects to produce more output
    pub more: bool,
}

/// Adapter for the CI server a job lives on
#[async_trait]
pub trait CiServer: Clone + Send + Sync + 'static {
    /// List every job the server knows about
    async fn list_jobs(&self) -> Result<Vec<JobSummary>, CiError>;

    /// Fetch full detail for a job, or `None` if it does not exist
    async fn job_detail(&self, job: &JobIdentity) -> Result<Option<JobDetail>, CiError>;

    /// Submit a build request with string parameters
    async fn trigger_build(
        &self,
        job: &JobIdentity,
        params: &ParameterBindings,
    ) -> Result<TriggerResponse, CiError>;

    /// Fetch one numbered build, or `None` if it does not exist (yet)
    async fn build_status(&self, build: &BuildRef) -> Result<Option<BuildStatus>, CiError>;

    /// Fetch console output starting at byte `offset`
    async fn log_chunk(&self, build: &BuildRef, offset: u64) -> Result<LogChunk, CiError>;
}
