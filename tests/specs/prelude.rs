//! Shared helpers for CLI specs

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A config whose checkpoint lives inside the project directory
pub const MINIMAL_CONFIG: &str = r#"
[feed]
endpoint = "https://portal.example.com/graphql"
api_key_env = "FV_SPECS_API_KEY"

[archive]
bucket = "events"
base_path = "/feeds/events/"
prefix = "site-a"

[checkpoint]
path = "state/after.marker"

[retry]
delay = "2s"
jitter = "500ms"
"#;

/// A temporary directory holding a config file and checkpoint state
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// A project with [`MINIMAL_CONFIG`] written to `feedvault.toml`
    pub fn configured() -> Self {
        let project = Self::empty();
        project.file("feedvault.toml", MINIMAL_CONFIG);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).unwrap()
    }

    /// The CLI, run from inside the project directory
    pub fn fv(&self) -> Cli {
        let mut cmd = Command::cargo_bin("feedvault").unwrap();
        cmd.current_dir(self.dir.path())
            .env_remove("FV_SPECS_API_KEY")
            .env("RUST_LOG", "warn");
        Cli { cmd }
    }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> Output {
        Output {
            assert: self.cmd.assert().success(),
        }
    }

    pub fn fails(mut self) -> Output {
        Output {
            assert: self.cmd.assert().failure(),
        }
    }
}

pub struct Output {
    assert: assert_cmd::assert::Assert,
}

impl Output {
    pub fn stdout_has(self, needle: &str) -> Self {
        Self {
            assert: self.assert.stdout(predicates::str::contains(needle)),
        }
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        Self {
            assert: self
                .assert
                .stdout(predicates::str::contains(needle).not()),
        }
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        Self {
            assert: self.assert.stderr(predicates::str::contains(needle)),
        }
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.assert.get_output().stdout).to_string()
    }
}
