//! Config check specs
//!
//! Verify config validation and the printed summary.

use crate::prelude::*;

#[test]
fn check_prints_summary() {
    let temp = Project::configured();
    temp.fv()
        .args(&["config", "check"])
        .passes()
        .stdout_has("Config OK")
        .stdout_has("https://portal.example.com/graphql")
        .stdout_has("feeds/events/")
        .stdout_has("site-a")
        .stdout_has("prompt");
}

#[test]
fn check_reports_env_credential_without_printing_it() {
    let temp = Project::configured();
    temp.fv()
        .env("FV_SPECS_API_KEY", "very-secret-key")
        .args(&["config", "check"])
        .passes()
        .stdout_has("environment (FV_SPECS_API_KEY)")
        .stdout_lacks("very-secret-key");
}

#[test]
fn check_json_output() {
    let temp = Project::configured();
    let output = temp
        .fv()
        .args(&["config", "check", "--output", "json"])
        .passes();
    let value: serde_json::Value = serde_json::from_str(&output.stdout()).unwrap();
    assert_eq!(value["bucket"], "events");
    assert_eq!(value["mode"], "flat");
    assert_eq!(value["retry_delay_ms"], 2000);
    assert_eq!(value["retry_jitter_ms"], 500);
    assert_eq!(value["poll_interval_ms"], 30000);
}

#[test]
fn check_rejects_oversized_page() {
    let temp = Project::empty();
    temp.file(
        "feedvault.toml",
        &MINIMAL_CONFIG.replace(
            "api_key_env = \"FV_SPECS_API_KEY\"",
            "api_key_env = \"FV_SPECS_API_KEY\"\npage_size = 5000",
        ),
    );
    temp.fv()
        .args(&["config", "check"])
        .fails()
        .stderr_has("page_size");
}

#[test]
fn check_rejects_unknown_keys() {
    let temp = Project::empty();
    temp.file(
        "feedvault.toml",
        &format!("{}\n[extra]\nvalue = 1\n", MINIMAL_CONFIG),
    );
    temp.fv().args(&["config", "check"]).fails();
}
