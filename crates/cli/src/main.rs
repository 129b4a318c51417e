// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jt - trigger a parameterized Jenkins job and follow the build

mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use jt_adapters::{JenkinsAdapter, JenkinsConfig, TracedCiServer};
use jt_core::{JobSelector, SystemClock, Verdict};
use jt_engine::{RunError, RunOutcome, RunRequest, Runner, TriggerMode};
use output::{Console, ConsoleReporter};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "jt",
    version,
    about = "Trigger a parameterized Jenkins job and wait for its result"
)]
struct Cli {
    /// Jenkins server URL
    #[arg(long, env = "JENKINS_URL")]
    jenkins: String,

    /// Exact job name (use '/' for jobs inside folders)
    #[arg(long)]
    job: Option<String>,

    /// Regular expression searched in job names; must match exactly one job
    #[arg(long)]
    regex: Option<String>,

    /// How long to wait for the build, from trigger to finish (e.g. 90s, 10m)
    #[arg(
        long,
        env = "JT_WAIT_TIMEOUT",
        default_value = "10m",
        value_parser = humantime::parse_duration
    )]
    timeout: Duration,

    /// Submit the build request and exit without waiting
    #[arg(long)]
    no_wait: bool,

    /// Build parameter as KEY=VALUE (repeatable)
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    named_params: Vec<(String, String)>,

    /// Build parameters as KEY VALUE pairs or KEY=VALUE tokens
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "PARAMS")]
    params: Vec<String>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{s}`"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

impl Cli {
    /// Every parameter token, `--param` values first
    fn raw_params(&self) -> Vec<String> {
        self.named_params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .chain(self.params.iter().cloned())
            .collect()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Help and version go to stdout and are not failures
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    setup_logging();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = ?e, "run failed");
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    // Selector problems are usage errors and must not touch the network
    let selector =
        JobSelector::from_flags(cli.job.as_deref(), cli.regex.as_deref()).map_err(RunError::from)?;

    println!("Using jenkins URL {}", cli.jenkins);

    let server = TracedCiServer::new(JenkinsAdapter::new(
        JenkinsConfig::new(cli.jenkins.as_str()).with_http_timeout(config::http_timeout()),
    ));
    let runner = Runner::new(server, SystemClock, config::runner_config());

    let request = RunRequest {
        selector,
        raw_params: cli.raw_params(),
        mode: if cli.no_wait {
            TriggerMode::FireAndForget
        } else {
            TriggerMode::Confirmed
        },
        timeout: cli.timeout,
    };
    tracing::info!(
        selector = %request.selector,
        timeout = ?request.timeout,
        mode = ?request.mode,
        "starting run"
    );

    // Progress lines and build console share stdout
    let console = Console::new(std::io::stdout());
    let mut reporter = ConsoleReporter::new(console.clone());
    let outcome = runner.run(request, &mut reporter, console).await?;
    reporter.outcome(&outcome);

    match outcome {
        RunOutcome::Completed {
            verdict: verdict @ Verdict::Failed { .. },
            build,
        } => {
            eprintln!("error: {} ({})", verdict, build);
            Ok(ExitCode::FAILURE)
        }
        _ => Ok(ExitCode::SUCCESS),
    }
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // JT_LOG wins over RUST_LOG; stdout is reserved for build output
    let filter = EnvFilter::try_from_env("JT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
