//! CLI error specs
//!
//! Verify configuration and startup errors exit non-zero before any work.

use crate::prelude::*;

#[test]
fn missing_config_fails() {
    let temp = Project::empty();
    temp.fv()
        .args(&["checkpoint", "show"])
        .fails()
        .stderr_has("could not load feedvault.toml");
}

#[test]
fn unknown_subcommand_fails() {
    let temp = Project::configured();
    temp.fv().args(&["replicate"]).fails();
}

#[test]
fn run_without_credential_fails_before_starting() {
    // stdin is not a terminal under test, so no prompt is possible
    let temp = Project::configured();
    temp.fv()
        .args(&["run"])
        .fails()
        .stderr_has("no feed API key available");
    assert!(!temp.path().join("state/after.marker").exists());
}

#[test]
fn run_with_invalid_config_fails() {
    let temp = Project::empty();
    temp.file(
        "feedvault.toml",
        &MINIMAL_CONFIG.replace("bucket = \"events\"", "bucket = \"\""),
    );
    temp.fv()
        .args(&["run"])
        .fails()
        .stderr_has("archive.bucket must not be empty");
}
