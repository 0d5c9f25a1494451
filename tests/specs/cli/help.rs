//! CLI help specs
//!
//! Verify help output lists the commands.

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    let temp = Project::empty();
    temp.fv()
        .args(&["--help"])
        .passes()
        .stdout_has("run")
        .stdout_has("checkpoint")
        .stdout_has("config");
}

#[test]
fn run_help_mentions_log_file() {
    let temp = Project::empty();
    temp.fv()
        .args(&["run", "--help"])
        .passes()
        .stdout_has("--log-file");
}

#[test]
fn checkpoint_help_lists_subcommands() {
    let temp = Project::empty();
    temp.fv()
        .args(&["checkpoint", "--help"])
        .passes()
        .stdout_has("show")
        .stdout_has("set")
        .stdout_has("clear");
}
