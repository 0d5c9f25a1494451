//! Run interrupt specs
//!
//! Verify `feedvault run` exits 0 promptly on SIGINT or SIGTERM, even while
//! a feed request is still waiting on the server.

use crate::prelude::*;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::io::Read;
use std::net::TcpListener;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// A feed endpoint that accepts connections and never answers
fn stalled_endpoint() -> (String, mpsc::Receiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/graphql", listener.local_addr().unwrap());
    let (connected, requests) = mpsc::channel();
    std::thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
            let _ = connected.send(());
        }
    });
    (endpoint, requests)
}

fn stalled_project(endpoint: &str) -> Project {
    let project = Project::empty();
    let config = MINIMAL_CONFIG
        .replace("https://portal.example.com/graphql", endpoint)
        .replace(
            "bucket = \"events\"",
            "bucket = \"events\"\nregion = \"us-east-1\"",
        );
    project.file("feedvault.toml", &config);
    project
}

fn spawn_run(project: &Project) -> Child {
    Command::new(assert_cmd::cargo::cargo_bin("feedvault"))
        .arg("run")
        .current_dir(project.path())
        .env("FV_SPECS_API_KEY", "specs-key")
        .env("AWS_ACCESS_KEY_ID", "specs")
        .env("AWS_SECRET_ACCESS_KEY", "specs")
        .env("AWS_EC2_METADATA_DISABLED", "true")
        .env("RUST_LOG", "info")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap()
}

/// Wait for exit, killing the child if it outlives `limit`
fn exit_within(child: &mut Child, limit: Duration) -> Option<ExitStatus> {
    let start = Instant::now();
    while start.elapsed() < limit {
        if let Some(status) = child.try_wait().unwrap() {
            return Some(status);
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    let _ = child.kill();
    let _ = child.wait();
    None
}

fn signal_mid_request(signal: Signal) -> String {
    let (endpoint, requests) = stalled_endpoint();
    let project = stalled_project(&endpoint);
    let mut child = spawn_run(&project);

    if requests.recv_timeout(Duration::from_secs(30)).is_err() {
        let _ = child.kill();
        panic!("feedvault never reached the feed endpoint");
    }
    kill(Pid::from_raw(child.id() as i32), signal).unwrap();

    let status = exit_within(&mut child, Duration::from_secs(5))
        .expect("feedvault did not exit after the signal");
    let mut stderr = String::new();
    child
        .stderr
        .take()
        .unwrap()
        .read_to_string(&mut stderr)
        .unwrap();
    assert_eq!(status.code(), Some(0), "stderr:\n{}", stderr);
    stderr
}

#[test]
fn sigint_during_stalled_fetch_exits_zero() {
    let stderr = signal_mid_request(Signal::SIGINT);
    assert!(stderr.contains("interrupted, shutting down"), "{}", stderr);
}

#[test]
fn sigterm_during_stalled_fetch_exits_zero() {
    let stderr = signal_mid_request(Signal::SIGTERM);
    assert!(stderr.contains("terminated, shutting down"), "{}", stderr);
}
