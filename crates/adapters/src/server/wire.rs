// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jenkins JSON API payloads and their conversion into core types

use jt_core::build::normalize_result;
use jt_core::{BuildStatus, JobDetail, JobIdentity, JobSummary, ParameterDefinition, ParameterSchema};
use serde::Deserialize;

use super::LogChunk;

/// `GET /api/json?tree=jobs[name,url,color]`
#[derive(Debug, Deserialize)]
pub(crate) struct JobList {
    #[serde(default)]
    pub jobs: Vec<JobSummary>,
}

/// `GET /job/<name>/api/json`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JobPayload {
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_buildable")]
    pub buildable: bool,
    #[serde(default)]
    pub next_build_number: u64,
    #[serde(default)]
    pub property: Vec<PropertyPayload>,
}

fn default_buildable() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PropertyPayload {
    #[serde(default)]
    pub parameter_definitions: Vec<ParameterPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ParameterPayload {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_parameter_value: Option<DefaultValuePayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DefaultValuePayload {
    #[serde(default)]
    pub value: serde_json::Value,
}

/// `GET /job/<name>/<number>/api/json`
#[derive(Debug, Deserialize)]
pub(crate) struct BuildPayload {
    pub number: u64,
    #[serde(default)]
    pub building: bool,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// `GET /crumbIssuer/api/json`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CrumbPayload {
    pub crumb: String,
    pub crumb_request_field: String,
}

impl JobPayload {
    /// Convert into a [`JobDetail`], keeping the name the job was asked for
    /// when the server omits `fullName`.
    pub fn into_detail(self, requested: &JobIdentity) -> JobDetail {
        let parameters = self
            .property
            .into_iter()
            .flat_map(|p| p.parameter_definitions)
            .map(|p| ParameterDefinition {
                name: p.name,
                description: p.description.filter(|d| !d.is_empty()),
                default_value: p.default_parameter_value.and_then(|d| value_to_string(d.value)),
            })
            .collect();

        let name = match self.full_name {
            Some(full) if !full.is_empty() => JobIdentity(full),
            _ if requested.as_str().is_empty() => JobIdentity(self.name),
            _ => requested.clone(),
        };

        JobDetail {
            name,
            url: self.url,
            description: self.description.filter(|d| !d.is_empty()),
            buildable: self.buildable,
            next_build_number: self.next_build_number,
            parameters: ParameterSchema(parameters),
        }
    }
}

impl From<BuildPayload> for BuildStatus {
    fn from(p: BuildPayload) -> Self {
        BuildStatus {
            number: p.number,
            building: p.building,
            result: normalize_result(p.result),
            description: p.description.filter(|d| !d.is_empty()),
            url: p.url,
        }
    }
}

/// One `logText/progressiveText` response.
///
/// Console text is not guaranteed to be UTF-8, so invalid bytes are replaced.
/// Offsets stay in bytes: the server's `X-Text-Size` when present, otherwise
/// the raw body length. A body cut short at the read cap resumes where it
/// stopped and is always followed by another request.
pub(crate) fn console_chunk(
    body: &[u8],
    offset: u64,
    text_size: Option<u64>,
    more_data: bool,
    truncated: bool,
) -> LogChunk {
    let read_to = offset + body.len() as u64;
    LogChunk {
        text: String::from_utf8_lossy(body).into_owned(),
        next_offset: if truncated {
            read_to
        } else {
            text_size.unwrap_or(read_to)
        },
        more: more_data || truncated,
    }
}

/// Parameter defaults can be booleans or numbers; everything is a string here
fn value_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
