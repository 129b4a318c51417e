// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jenkins HTTP adapter

use super::wire::{console_chunk, BuildPayload, CrumbPayload, JobList, JobPayload};
use super::{CiError, CiServer, LogChunk, TriggerResponse};
use async_trait::async_trait;
use jt_core::{BuildRef, BuildStatus, JobDetail, JobIdentity, JobSummary, ParameterBindings};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::time::Duration;
use ureq::Agent;

/// Default per-request timeout
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Most console bytes read from one progressiveText response
pub(crate) const MAX_LOG_CHUNK: u64 = 8 * 1024 * 1024;

/// RFC 3986 unreserved characters pass through; everything else is escaped
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Connection settings for a Jenkins server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JenkinsConfig {
    /// Server root, e.g. `https://ci.example.com/`
    pub base_url: String,
    pub http_timeout: Duration,
}

impl JenkinsConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }
}

/// Talks to a Jenkins server over its JSON API.
///
/// `ureq` is blocking, so every call runs on tokio's blocking pool. The agent
/// keeps a cookie jar because Jenkins binds CSRF crumbs to the session.
#[derive(Clone)]
pub struct JenkinsAdapter {
    agent: Agent,
    base_url: String,
}

impl JenkinsAdapter {
    pub fn new(config: JenkinsConfig) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(config.http_timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: Agent::new_with_config(agent_config),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn job_url(&self, job: &JobIdentity) -> String {
        job_url(&self.base_url, job)
    }

    /// GET a JSON document; 404 is `None`
    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, CiError> {
        let mut request = self.agent.get(url);
        for (key, value) in query {
            request = request.query(*key, *value);
        }
        let mut response = request.call().map_err(connection_error)?;
        let status = response.status().as_u16();
        if status == 404 {
            return Ok(None);
        }
        if !(200..300).contains(&status) {
            return Err(CiError::Status {
                status,
                url: url.to_string(),
            });
        }
        response
            .body_mut()
            .read_json::<T>()
            .map(Some)
            .map_err(|e| CiError::Decode(format!("{}: {}", url, e)))
    }

    fn fetch_crumb(&self) -> Result<Option<CrumbPayload>, CiError> {
        let url = format!("{}/crumbIssuer/api/json", self.base_url);
        match self.get_json::<CrumbPayload>(&url, &[]) {
            Ok(crumb) => Ok(crumb),
            Err(CiError::Status { status, .. }) => {
                tracing::debug!(status, "crumb issuer unavailable, posting without crumb");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn list_jobs_blocking(&self) -> Result<Vec<JobSummary>, CiError> {
        let url = format!("{}/api/json", self.base_url);
        match self.get_json::<JobList>(&url, &[("tree", "jobs[name,url,color]")])? {
            Some(list) => Ok(list.jobs),
            None => Err(CiError::Status { status: 404, url }),
        }
    }

    fn job_detail_blocking(&self, job: &JobIdentity) -> Result<Option<JobDetail>, CiError> {
        let url = format!("{}/api/json", self.job_url(job));
        Ok(self
            .get_json::<JobPayload>(&url, &[])?
            .map(|payload| payload.into_detail(job)))
    }

    fn trigger_blocking(
        &self,
        job: &JobIdentity,
        params: &ParameterBindings,
    ) -> Result<TriggerResponse, CiError> {
        let crumb = self.fetch_crumb()?;

        let endpoint = if params.is_empty() {
            "build"
        } else {
            "buildWithParameters"
        };
        let url = format!("{}/{}", self.job_url(job), endpoint);

        let mut request = self.agent.post(&url);
        if let Some(crumb) = &crumb {
            request = request.header(crumb.crumb_request_field.as_str(), crumb.crumb.as_str());
        }

        let response = if params.is_empty() {
            request.send_empty()
        } else {
            request.send_form(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        }
        .map_err(connection_error)?;

        let location = response
            .headers()
            .get("Location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(TriggerResponse {
            status: response.status().as_u16(),
            location,
        })
    }

    fn build_status_blocking(&self, build: &BuildRef) -> Result<Option<BuildStatus>, CiError> {
        let url = format!("{}/{}/api/json", self.job_url(&build.job), build.number);
        Ok(self
            .get_json::<BuildPayload>(&url, &[])?
            .map(BuildStatus::from))
    }

    fn log_chunk_blocking(&self, build: &BuildRef, offset: u64) -> Result<LogChunk, CiError> {
        let url = format!(
            "{}/{}/logText/progressiveText",
            self.job_url(&build.job),
            build.number
        );
        let mut response = self
            .agent
            .get(&url)
            .query("start", offset.to_string())
            .call()
            .map_err(connection_error)?;

        let status = response.status().as_u16();
        // Console not created yet; try again from the same place
        if status == 404 {
            return Ok(LogChunk {
                text: String::new(),
                next_offset: offset,
                more: true,
            });
        }
        if !(200..300).contains(&status) {
            return Err(CiError::Status { status, url });
        }

        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let text_size = header("X-Text-Size").and_then(|v| v.trim().parse::<u64>().ok());
        let more = header("X-More-Data").is_some_and(|v| v.eq_ignore_ascii_case("true"));

        // The body is everything from `start` on; take at most one cap's worth
        let mut body = Vec::new();
        response
            .body_mut()
            .as_reader()
            .take(MAX_LOG_CHUNK)
            .read_to_end(&mut body)
            .map_err(|e| CiError::Decode(format!("{}: {}", url, e)))?;
        let truncated = body.len() as u64 >= MAX_LOG_CHUNK;

        Ok(console_chunk(&body, offset, text_size, more, truncated))
    }
}

#[async_trait]
impl CiServer for JenkinsAdapter {
    async fn list_jobs(&self) -> Result<Vec<JobSummary>, CiError> {
        let this = self.clone();
        blocking(move || this.list_jobs_blocking()).await
    }

    async fn job_detail(&self, job: &JobIdentity) -> Result<Option<JobDetail>, CiError> {
        let this = self.clone();
        let job = job.clone();
        blocking(move || this.job_detail_blocking(&job)).await
    }

    async fn trigger_build(
        &self,
        job: &JobIdentity,
        params: &ParameterBindings,
    ) -> Result<TriggerResponse, CiError> {
        let this = self.clone();
        let job = job.clone();
        let params = params.clone();
        blocking(move || this.trigger_blocking(&job, &params)).await
    }

    async fn build_status(&self, build: &BuildRef) -> Result<Option<BuildStatus>, CiError> {
        let this = self.clone();
        let build = build.clone();
        blocking(move || this.build_status_blocking(&build)).await
    }

    async fn log_chunk(&self, build: &BuildRef, offset: u64) -> Result<LogChunk, CiError> {
        let this = self.clone();
        let build = build.clone();
        blocking(move || this.log_chunk_blocking(&build, offset)).await
    }
}

async fn blocking<T, F>(f: F) -> Result<T, CiError>
where
    F: FnOnce() -> Result<T, CiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CiError::Connection(format!("request task failed: {}", e)))?
}

fn connection_error(e: ureq::Error) -> CiError {
    CiError::Connection(e.to_string())
}

/// `<base>/job/<a>/job/<b>` for a job named `a/b`
pub(crate) fn job_url(base_url: &str, job: &JobIdentity) -> String {
    let mut url = base_url.trim_end_matches('/').to_string();
    for segment in job.segments() {
        url.push_str("/job/");
        url.push_str(&encode_segment(segment));
    }
    url
}

pub(crate) fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

#[cfg(test)]
#[path = "jenkins_tests.rs"]
mod tests;
