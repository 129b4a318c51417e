// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake CI server for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{CiError, CiServer, LogChunk, TriggerResponse};
use async_trait::async_trait;
use jt_core::{
    BuildRef, BuildStatus, JobDetail, JobIdentity, JobSummary, ParameterBindings, ParameterSchema,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// Recorded server call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerCall {
    ListJobs,
    JobDetail {
        job: String,
    },
    TriggerBuild {
        job: String,
        params: ParameterBindings,
    },
    BuildStatus {
        build: BuildRef,
    },
    LogChunk {
        build: BuildRef,
        offset: u64,
    },
}

/// Builder for a job the fake server knows about
#[derive(Debug, Clone)]
pub struct FakeJob {
    detail: JobDetail,
}

impl FakeJob {
    pub fn new(name: &str) -> Self {
        Self {
            detail: JobDetail {
                name: JobIdentity::from(name),
                url: None,
                description: None,
                buildable: true,
                next_build_number: 1,
                parameters: ParameterSchema::default(),
            },
        }
    }

    pub fn next_build(mut self, number: u64) -> Self {
        self.detail.next_build_number = number;
        self
    }

    /// Report the job as not buildable
    pub fn disabled(mut self) -> Self {
        self.detail.buildable = false;
        self
    }

    pub fn parameters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.detail.parameters = ParameterSchema::from_names(names);
        self
    }

    pub fn schema(mut self, schema: ParameterSchema) -> Self {
        self.detail.parameters = schema;
        self
    }

    pub fn into_detail(self) -> JobDetail {
        self.detail
    }
}

#[derive(Default)]
struct FakeState {
    jobs: Vec<JobDetail>,
    /// Snapshots handed out per poll; the last one repeats
    builds: HashMap<BuildRef, VecDeque<Option<BuildStatus>>>,
    logs: HashMap<BuildRef, Vec<String>>,
    /// Builds whose console keeps reporting more data
    open_logs: HashSet<BuildRef>,
    trigger_status: Option<u16>,
    unreachable: bool,
    failing_logs: bool,
}

/// Scripted CI server that records every call
#[derive(Clone, Default)]
pub struct FakeCiServer {
    state: Arc<Mutex<FakeState>>,
    calls: Arc<Mutex<Vec<ServerCall>>>,
}

impl FakeCiServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job; the job list keeps registration order
    pub fn add_job(&self, job: FakeJob) -> &Self {
        self.state().jobs.push(job.into_detail());
        self
    }

    /// Script the snapshots returned by successive polls of `build`.
    ///
    /// `None` entries mean the build does not exist yet. Once the script is
    /// down to its last entry, that entry is returned forever.
    pub fn script_build<I>(&self, build: BuildRef, snapshots: I) -> &Self
    where
        I: IntoIterator<Item = Option<BuildStatus>>,
    {
        self.state()
            .builds
            .insert(build, snapshots.into_iter().collect());
        self
    }

    /// Script console output for `build`, delivered one chunk per request
    pub fn script_log<I, S>(&self, build: BuildRef, chunks: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state()
            .logs
            .insert(build, chunks.into_iter().map(Into::into).collect());
        self
    }

    /// Keep reporting more console data for `build` after its script runs out
    pub fn keep_log_open(&self, build: BuildRef) -> &Self {
        self.state().open_logs.insert(build);
        self
    }

    /// HTTP status returned for triggers (default 201)
    pub fn set_trigger_status(&self, status: u16) -> &Self {
        self.state().trigger_status = Some(status);
        self
    }

    /// Make every call fail as if the server were down
    pub fn set_unreachable(&self) -> &Self {
        self.state().unreachable = true;
        self
    }

    /// Make console requests fail while everything else works
    pub fn set_failing_logs(&self) -> &Self {
        self.state().failing_logs = true;
        self
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ServerCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of status polls issued for `build`
    pub fn status_polls(&self, build: &BuildRef) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ServerCall::BuildStatus { build: b } if b == build))
            .count()
    }

    /// Parameters of every trigger request, in order
    pub fn triggered(&self) -> Vec<(String, ParameterBindings)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ServerCall::TriggerBuild { job, params } => Some((job, params)),
                _ => None,
            })
            .collect()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: ServerCall) -> Result<(), CiError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        if self.state().unreachable {
            return Err(CiError::Connection("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CiServer for FakeCiServer {
    async fn list_jobs(&self) -> Result<Vec<JobSummary>, CiError> {
        self.record(ServerCall::ListJobs)?;
        Ok(self
            .state()
            .jobs
            .iter()
            .map(|job| JobSummary {
                name: job.name.to_string(),
                url: job.url.clone(),
                color: Some("blue".to_string()),
            })
            .collect())
    }

    async fn job_detail(&self, job: &JobIdentity) -> Result<Option<JobDetail>, CiError> {
        self.record(ServerCall::JobDetail {
            job: job.to_string(),
        })?;
        Ok(self.state().jobs.iter().find(|j| &j.name == job).cloned())
    }

    async fn trigger_build(
        &self,
        job: &JobIdentity,
        params: &ParameterBindings,
    ) -> Result<TriggerResponse, CiError> {
        self.record(ServerCall::TriggerBuild {
            job: job.to_string(),
            params: params.clone(),
        })?;
        let status = self.state().trigger_status.unwrap_or(201);
        let location = (200..300)
            .contains(&status)
            .then(|| "http://fake/queue/item/1/".to_string());
        Ok(TriggerResponse { status, location })
    }

    async fn build_status(&self, build: &BuildRef) -> Result<Option<BuildStatus>, CiError> {
        self.record(ServerCall::BuildStatus {
            build: build.clone(),
        })?;
        let mut state = self.state();
        let Some(script) = state.builds.get_mut(build) else {
            return Ok(None);
        };
        let snapshot = if script.len() > 1 {
            script.pop_front().flatten()
        } else {
            script.front().cloned().flatten()
        };
        Ok(snapshot)
    }

    async fn log_chunk(&self, build: &BuildRef, offset: u64) -> Result<LogChunk, CiError> {
        self.record(ServerCall::LogChunk {
            build: build.clone(),
            offset,
        })?;
        let state = self.state();
        if state.failing_logs {
            return Err(CiError::Status {
                status: 500,
                url: format!("http://fake/job/{}/{}/logText", build.job, build.number),
            });
        }
        let open = state.open_logs.contains(build);
        let Some(chunks) = state.logs.get(build) else {
            return Ok(LogChunk {
                text: String::new(),
                next_offset: offset,
                more: open,
            });
        };

        // Chunk boundaries are byte offsets into the concatenated log
        let mut start = 0u64;
        for (i, chunk) in chunks.iter().enumerate() {
            let end = start + chunk.len() as u64;
            if offset < end {
                let skip = usize::try_from(offset - start).unwrap_or(0);
                return Ok(LogChunk {
                    text: chunk.get(skip..).unwrap_or_default().to_string(),
                    next_offset: end,
                    more: open || i + 1 < chunks.len(),
                });
            }
            start = end;
        }
        Ok(LogChunk {
            text: String::new(),
            next_offset: offset.max(start),
            more: open,
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
