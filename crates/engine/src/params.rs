// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binding command-line tokens to a job's declared parameters

use crate::RunError;
use clap::{Arg, ArgAction, Command};
use jt_core::{ParameterBindings, ParameterSchema};

/// Bind raw `key value` / `key=value` tokens to `schema`.
///
/// A flag parser is built at runtime with one `--<name>` option per declared
/// parameter, so undeclared or repeated keys are rejected the same way a
/// static CLI would reject them. Every declared parameter gets an entry;
/// the ones not supplied bind to the empty string.
///
/// A job without parameters is triggered as is; any tokens are ignored.
pub fn bind(schema: &ParameterSchema, raw: &[String]) -> Result<ParameterBindings, RunError> {
    if schema.is_empty() {
        if !raw.is_empty() {
            tracing::warn!(ignored = raw.len(), "job declares no parameters, ignoring arguments");
        }
        return Ok(ParameterBindings::new());
    }

    let flags = to_flags(raw)?;
    let matches = parser(schema)
        .try_get_matches_from(flags)
        .map_err(|e| RunError::ArgumentParse(summarize(&e)))?;

    Ok(schema
        .names()
        .map(|name| {
            let value = matches.get_one::<String>(name).cloned().unwrap_or_default();
            (name.to_string(), value)
        })
        .collect())
}

fn parser(schema: &ParameterSchema) -> Command {
    schema.names().fold(
        Command::new("parameters")
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true),
        |cmd, name| {
            cmd.arg(
                Arg::new(name.to_string())
                    .long(name.to_string())
                    .action(ArgAction::Set)
                    .num_args(1)
                    .allow_hyphen_values(true),
            )
        },
    )
}

/// Rewrite `key value` pairs and `key=value` tokens as `--key=value`
fn to_flags(raw: &[String]) -> Result<Vec<String>, RunError> {
    let mut flags = Vec::with_capacity(raw.len());
    let mut tokens = raw.iter();

    while let Some(token) = tokens.next() {
        let token = token.trim_start_matches('-');
        let (key, value) = match token.split_once('=') {
            Some((key, value)) => (key, value.to_string()),
            None => match tokens.next() {
                Some(value) => (token, value.clone()),
                None => {
                    return Err(RunError::ArgumentParse(format!(
                        "parameter '{}' has no value",
                        token
                    )))
                }
            },
        };
        if key.is_empty() {
            return Err(RunError::ArgumentParse(
                "parameter name cannot be empty".to_string(),
            ));
        }
        flags.push(format!("--{}={}", key, value));
    }

    Ok(flags)
}

/// First line of a clap error, without its `error: ` prefix
fn summarize(e: &clap::Error) -> String {
    let rendered = e.to_string();
    let line = rendered.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
