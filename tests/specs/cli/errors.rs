//! Command-line usage errors that stop before any build is requested

use crate::prelude::*;

#[test]
fn missing_server_url_is_a_usage_error() {
    jt().args(&["--job", "deploy"]).fails().stderr_has("--jenkins");
}

#[test]
fn a_job_selector_is_required() {
    jt().args(&["--jenkins", "http://127.0.0.1:1"])
        .fails()
        .stderr_has("either --job or --regex is required")
        .stdout_lacks("Using jenkins URL");
}

#[test]
fn job_and_regex_are_exclusive() {
    jt().args(&["--jenkins", "http://127.0.0.1:1", "--job", "a", "--regex", "b"])
        .fails()
        .stderr_has("cannot be used together");
}

#[test]
fn malformed_pattern_is_reported_before_contacting_the_server() {
    jt().args(&["--jenkins", "http://127.0.0.1:1", "--regex", "deploy("])
        .fails()
        .stderr_has("invalid job pattern")
        .stdout_lacks("Using jenkins URL");
}

#[test]
fn malformed_timeout_is_a_usage_error() {
    jt().args(&["--jenkins", "http://127.0.0.1:1", "--job", "a", "--timeout", "soon"])
        .fails();
}

#[test]
fn unreachable_server_fails_with_connection_error() {
    jt().args(&["--jenkins", "http://127.0.0.1:1", "--job", "deploy"])
        .fails()
        .stdout_has("Using jenkins URL http://127.0.0.1:1")
        .stderr_has("cannot reach server");
}

#[test]
fn server_url_can_come_from_the_environment() {
    jt().env("JENKINS_URL", "http://127.0.0.1:1")
        .args(&["--job", "deploy"])
        .fails()
        .stdout_has("Using jenkins URL http://127.0.0.1:1");
}
