//! Checkpoint command specs
//!
//! Verify the stored continuation token can be inspected and changed.

use crate::prelude::*;

#[test]
fn show_without_checkpoint() {
    let temp = Project::configured();
    temp.fv()
        .args(&["checkpoint", "show"])
        .passes()
        .stdout_has("No checkpoint");
}

#[test]
fn set_then_show() {
    let temp = Project::configured();
    temp.fv()
        .args(&["checkpoint", "set", "cursor-42"])
        .passes()
        .stdout_has("Checkpoint set");

    assert_eq!(temp.read("state/after.marker"), "cursor-42");
    temp.fv()
        .args(&["checkpoint", "show"])
        .passes()
        .stdout_has("cursor-42")
        .stdout_lacks("No checkpoint");
}

#[test]
fn set_replaces_previous_token() {
    let temp = Project::configured();
    temp.file("state/after.marker", "cursor-1");

    temp.fv().args(&["checkpoint", "set", "cursor-2"]).passes();

    assert_eq!(temp.read("state/after.marker"), "cursor-2");
    assert!(!temp.path().join("state/.after.marker.tmp").exists());
}

#[test]
fn set_stores_token_verbatim() {
    let temp = Project::configured();

    temp.fv()
        .args(&["checkpoint", "set", " cursor-5 "])
        .passes();

    assert_eq!(temp.read("state/after.marker"), " cursor-5 ");
    temp.fv()
        .args(&["checkpoint", "show"])
        .passes()
        .stdout_has(" cursor-5 ");
}

#[test]
fn set_rejects_blank_token() {
    let temp = Project::configured();
    temp.fv()
        .args(&["checkpoint", "set", "  "])
        .fails()
        .stderr_has("must not be empty");
}

#[test]
fn clear_removes_checkpoint() {
    let temp = Project::configured();
    temp.file("state/after.marker", "cursor-9");

    temp.fv()
        .args(&["checkpoint", "clear"])
        .passes()
        .stdout_has("Checkpoint cleared");

    assert!(!temp.path().join("state/after.marker").exists());
    temp.fv()
        .args(&["checkpoint", "show"])
        .passes()
        .stdout_has("No checkpoint");
}

#[test]
fn clear_without_checkpoint_passes() {
    let temp = Project::configured();
    temp.fv().args(&["checkpoint", "clear"]).passes();
}

#[test]
fn show_as_json() {
    let temp = Project::configured();
    temp.file("state/after.marker", "cursor-7");

    let output = temp
        .fv()
        .args(&["checkpoint", "show", "--output", "json"])
        .passes();
    let value: serde_json::Value = serde_json::from_str(&output.stdout()).unwrap();
    assert_eq!(value["checkpoint"], "cursor-7");
}

#[test]
fn config_flag_selects_file() {
    let temp = Project::empty();
    temp.file("conf/other.toml", MINIMAL_CONFIG);
    temp.file("state/after.marker", "from-other");

    temp.fv()
        .args(&["--config", "conf/other.toml", "checkpoint", "show"])
        .passes()
        .stdout_has("from-other");
}
