// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identity, selection, and declared parameters

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Name of a job on the CI server.
///
/// Jobs inside folders are named with `/` separators, e.g. `team/deploy`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobIdentity(pub String);

impl JobIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Folder path segments, outermost first (empty segments dropped)
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl std::fmt::Display for JobIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobIdentity {
    fn from(s: String) -> Self {
        JobIdentity(s)
    }
}

impl From<&str> for JobIdentity {
    fn from(s: &str) -> Self {
        JobIdentity(s.to_string())
    }
}

/// Errors building a [`JobSelector`] from user input
#[derive(Debug, Error)]
pub enum SelectorError {
    #[error("either --job or --regex is required")]
    Missing,
    #[error("--job and --regex cannot be used together")]
    Conflicting,
    #[error("invalid job pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// How the target job is identified
#[derive(Debug, Clone)]
pub enum JobSelector {
    /// Exact job name
    Name(JobIdentity),
    /// Regular expression searched (not anchored) in every job name
    Pattern(Regex),
}

impl JobSelector {
    /// Build a selector from the `--job` / `--regex` flag values.
    ///
    /// Empty strings count as absent. The pattern is compiled here so a
    /// malformed regex fails before any request is made.
    pub fn from_flags(name: Option<&str>, pattern: Option<&str>) -> Result<Self, SelectorError> {
        let name = name.filter(|s| !s.is_empty());
        let pattern = pattern.filter(|s| !s.is_empty());

        match (name, pattern) {
            (Some(_), Some(_)) => Err(SelectorError::Conflicting),
            (Some(name), None) => Ok(JobSelector::Name(JobIdentity::from(name))),
            (None, Some(pattern)) => Ok(JobSelector::Pattern(Regex::new(pattern)?)),
            (None, None) => Err(SelectorError::Missing),
        }
    }

    /// Names among `candidates` this selector accepts, in input order
    pub fn matches<'a>(&self, candidates: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        candidates
            .into_iter()
            .filter(|name| match self {
                JobSelector::Name(id) => id.as_str() == *name,
                JobSelector::Pattern(re) => re.is_match(name),
            })
            .map(str::to_string)
            .collect()
    }
}

impl std::fmt::Display for JobSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobSelector::Name(id) => write!(f, "{}", id),
            JobSelector::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// Entry in the server's job list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Jenkins status ball colour (`blue`, `red`, `disabled`, ...)
    #[serde(default)]
    pub color: Option<String>,
}

/// One declared build parameter. Every parameter is treated as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ParameterDefinition {
    pub fn named(name: impl Into<String>) -> Self {
        ParameterDefinition {
            name: name.into(),
            default_value: None,
            description: None,
        }
    }
}

/// Ordered parameter declarations of a job (may be empty)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSchema(pub Vec<ParameterDefinition>);

impl ParameterSchema {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParameterSchema(names.into_iter().map(ParameterDefinition::named).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Declared names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|p| p.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterDefinition> {
        self.0.iter()
    }
}

/// Parameter name → value, one entry per declared parameter
pub type ParameterBindings = BTreeMap<String, String>;

/// Full detail for one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDetail {
    pub name: JobIdentity,
    pub url: Option<String>,
    pub description: Option<String>,
    pub buildable: bool,
    /// Number the next triggered build will receive
    pub next_build_number: u64,
    pub parameters: ParameterSchema,
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
