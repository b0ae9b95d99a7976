//! Integration tests for the `pausecache` binary.
//!
//! Each test runs the binary against a recording in a temporary directory,
//! with `HOME` pointed at that directory so config and log files never touch
//! the real user profile.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const RECORDING: &str = r#"{
  "pauses": {
    "p1": {
      "objects": [
        {
          "objectId": "o1",
          "className": "Array",
          "preview": {
            "properties": [
              { "name": "0", "value": 1 },
              { "name": "1", "value": 2 },
              { "name": "length", "value": 2 }
            ]
          }
        },
        {
          "objectId": "o2",
          "className": "Object",
          "preview": { "properties": [{ "name": "inner", "object": "o1" }] }
        }
      ],
      "properties": {
        "o2": {
          "inner": {
            "objects": [{ "objectId": "o1", "className": "Array" }],
            "returned": { "name": "inner", "object": "o1" }
          }
        }
      }
    },
    "p2": { "objects": [] }
  }
}"#;

/// Temporary home directory with a recording in it.
struct Sandbox {
    home: TempDir,
    recording: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let home = TempDir::new().unwrap();
        let recording = home.path().join("session.json");
        fs::write(&recording, RECORDING).unwrap();
        Self { home, recording }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_pausecache"))
            .args(args)
            .env("HOME", self.home.path())
            .env("RUST_LOG", "warn")
            .output()
            .expect("failed to run pausecache")
    }

    fn recording(&self) -> &str {
        self.recording.to_str().unwrap()
    }

    fn config_path(&self) -> PathBuf {
        self.home.path().join(".pausecache").join("config.ini")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_concurrent_object_readers_share_one_call() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&[
        "object",
        sandbox.recording(),
        "--pause",
        "p1",
        "--object",
        "o1",
        "--tier",
        "full",
        "--readers",
        "4",
    ]);

    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("full preview of o1 in pause p1"));
    assert!(out.contains("\"className\": \"Array\""));
    assert!(out.contains("Protocol calls:  1"));
    assert!(out.contains("Reads:           4"));
}

#[test]
fn test_property_read_caches_referenced_object() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&[
        "property",
        sandbox.recording(),
        "--pause",
        "p1",
        "--object",
        "o2",
        "--name",
        "inner",
    ]);

    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("Referenced object"));
    assert!(out.contains("Protocol calls:  1"));
}

#[test]
fn test_unknown_object_fails() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&[
        "object",
        sandbox.recording(),
        "--pause",
        "p1",
        "--object",
        "missing",
    ]);

    assert!(!output.status.success());
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("Read failed"));
}

#[test]
fn test_precache_reports_every_pause() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["precache", sandbox.recording()]);

    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("Pause p1:"));
    assert!(out.contains("Pause p2:"));
    assert!(out.contains("o1 Array (full)"));
    assert!(out.contains("Protocol calls:  0"));
}

#[test]
fn test_missing_recording_fails() {
    let sandbox = Sandbox::new();
    let missing = sandbox.home.path().join("nope.json");
    let output = sandbox.run(&["precache", missing.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load recording"));
}

#[test]
fn test_config_set_and_get() {
    let sandbox = Sandbox::new();

    assert_success(&sandbox.run(&["config", "set", "cache.default_tier", "full"]));
    assert!(file_contains(&sandbox.config_path(), "default_tier = full"));

    let output = sandbox.run(&["config", "get", "cache.default_tier"]);
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "full");

    let output = sandbox.run(&["config", "set", "cache.default_tier", "bare"]);
    assert!(!output.status.success());
}

fn file_contains(path: &Path, needle: &str) -> bool {
    fs::read_to_string(path)
        .map(|s| s.contains(needle))
        .unwrap_or(false)
}
