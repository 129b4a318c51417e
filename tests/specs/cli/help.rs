//! Help and version output

use crate::prelude::*;

#[test]
fn help_lists_the_flags() {
    jt().args(&["--help"])
        .passes()
        .stdout_has("--jenkins")
        .stdout_has("--job")
        .stdout_has("--regex")
        .stdout_has("--timeout")
        .stdout_has("--no-wait")
        .stdout_has("--param");
}

#[test]
fn version_prints_the_binary_name() {
    jt().args(&["--version"]).passes().stdout_has("jt");
}
