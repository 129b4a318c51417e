//! Following a build to its verdict

use crate::prelude::*;

#[test]
fn failed_build_exits_nonzero_with_its_result() {
    let server = FakeJenkins::new()
        .job("deploy", 12, &[])
        .build("deploy", 12, Some("FAILURE"))
        .console("deploy", 12, "boom\nFinished: FAILURE\n", false)
        .start();

    jt().args(&["--jenkins", &server.url, "--job", "deploy"])
        .fails()
        .stdout_has("Build #12 finished: FAILURE")
        .stdout_lacks("OK")
        .stderr_has("build failed: FAILURE");
}

#[test]
fn unstable_build_counts_as_failure() {
    let server = FakeJenkins::new()
        .job("deploy", 5, &[])
        .build("deploy", 5, Some("UNSTABLE"))
        .console("deploy", 5, "flaky\n", false)
        .start();

    jt().args(&["--jenkins", &server.url, "--job", "deploy"])
        .fails()
        .stderr_has("UNSTABLE");
}

#[test]
fn build_that_never_appears_times_out() {
    let server = FakeJenkins::new().job("deploy", 12, &[]).start();

    jt().args(&["--jenkins", &server.url, "--job", "deploy", "--timeout", "200ms"])
        .fails()
        .stderr_has("gave up waiting for build to exist");
}

#[test]
fn build_that_never_finishes_times_out() {
    let server = FakeJenkins::new()
        .job("deploy", 12, &[])
        .build("deploy", 12, None)
        .console("deploy", 12, "still going\n", true)
        .start();

    jt().args(&["--jenkins", &server.url, "--job", "deploy", "--timeout", "300ms"])
        .fails()
        .stdout_has("Build #12 started")
        .stderr_has("gave up waiting for build to finish");
}
