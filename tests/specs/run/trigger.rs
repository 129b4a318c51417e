//! Resolving a job, binding parameters and requesting the build

use crate::prelude::*;

#[test]
fn unparameterized_job_is_triggered_and_followed() {
    let server = FakeJenkins::new()
        .job("deploy", 12, &[])
        .build("deploy", 12, Some("SUCCESS"))
        .console("deploy", 12, "Started by user\nFinished: SUCCESS\n", false)
        .start();

    jt().args(&["--jenkins", &server.url, "--job", "deploy"])
        .passes()
        .stdout_has("Found job deploy")
        .stdout_has("Next build number: 12")
        .stdout_has("Build queued at")
        .stdout_has("Finished: SUCCESS")
        .stdout_has("OK");

    assert_eq!(server.count("POST", "/job/deploy/build"), 1);
}

#[test]
fn pairs_bind_to_declared_parameters() {
    let server = FakeJenkins::new()
        .job("release", 3, &["branch", "tag"])
        .build("release", 3, Some("SUCCESS"))
        .console("release", 3, "done\n", false)
        .start();

    jt().args(&["--jenkins", &server.url, "--job", "release", "branch", "main"])
        .passes()
        .stdout_has("branch: main")
        .stdout_has("tag: ");

    let posts = server.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].path, "/job/release/buildWithParameters");
    assert!(posts[0].body.contains("branch=main"), "body: {}", posts[0].body);
    assert!(posts[0].body.contains("tag="), "body: {}", posts[0].body);
}

#[test]
fn named_param_flag_binds_like_a_pair() {
    let server = FakeJenkins::new()
        .job("release", 3, &["branch"])
        .start();

    jt().args(&["--jenkins", &server.url, "--job", "release", "-p", "branch=dev", "--no-wait"])
        .passes()
        .stdout_has("branch: dev");

    assert!(server.posts()[0].body.contains("branch=dev"));
}

#[test]
fn regex_selects_the_single_matching_job() {
    let server = FakeJenkins::new()
        .job("deploy-prod", 8, &[])
        .job("build-docs", 2, &[])
        .start();

    jt().args(&["--jenkins", &server.url, "--regex", "^deploy", "--no-wait"])
        .passes()
        .stdout_has("Found job deploy-prod");

    assert_eq!(server.count("POST", "/job/deploy-prod/build"), 1);
}

#[test]
fn ambiguous_regex_lists_candidates_and_requests_nothing() {
    let server = FakeJenkins::new()
        .job("deploy-prod", 8, &[])
        .job("deploy-staging", 4, &[])
        .start();

    jt().args(&["--jenkins", &server.url, "--regex", "deploy"])
        .fails()
        .stderr_has("more than one job name found")
        .stderr_has("deploy-prod")
        .stderr_has("deploy-staging");

    assert!(server.posts().is_empty());
}

#[test]
fn unknown_job_fails_without_triggering() {
    let server = FakeJenkins::new().job("deploy", 1, &[]).start();

    jt().args(&["--jenkins", &server.url, "--job", "missing"])
        .fails()
        .stderr_has("no job found: missing");

    assert!(server.posts().is_empty());
}

#[test]
fn undeclared_parameter_is_rejected_before_triggering() {
    let server = FakeJenkins::new().job("release", 3, &["branch"]).start();

    jt().args(&["--jenkins", &server.url, "--job", "release", "colour", "red"])
        .fails()
        .stderr_has("couldn't parse the build arguments");

    assert!(server.posts().is_empty());
}

#[test]
fn no_wait_exits_after_the_request() {
    let server = FakeJenkins::new().job("deploy", 12, &[]).start();

    jt().args(&["--jenkins", &server.url, "--job", "deploy", "--no-wait"])
        .passes()
        .stdout_has("Not waiting for the build");

    assert_eq!(server.count("GET", "/job/deploy/12/api/json"), 0);
}

#[test]
fn rejected_trigger_fails() {
    let server = FakeJenkins::new()
        .job("deploy", 12, &[])
        .route("POST", "/job/deploy/build", Reply::status(403))
        .start();

    jt().args(&["--jenkins", &server.url, "--job", "deploy"])
        .fails()
        .stderr_has("build request rejected by server (status 403)");
}

#[test]
fn unparameterized_job_ignores_trailing_arguments() {
    let server = FakeJenkins::new().job("deploy", 12, &[]).start();

    jt().args(&["--jenkins", &server.url, "--job", "deploy", "--no-wait", "branch", "main"])
        .passes()
        .stdout_has("Build queued at");

    assert_eq!(server.count("POST", "/job/deploy/build"), 1);
}

#[test]
fn disabled_job_is_not_triggered() {
    let server = FakeJenkins::new().job("deploy", 12, &[]).disabled("deploy").start();

    jt().args(&["--jenkins", &server.url, "--job", "deploy"])
        .fails()
        .stderr_has("job is disabled: deploy");

    assert!(server.posts().is_empty());
}
