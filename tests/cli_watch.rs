//! E2E tests for the `microsync` binary
//!
//! Each test runs with its own config home and no MICROSYNC_* variables so
//! the developer's environment cannot leak in.

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

fn microsync(config_home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_microsync"));
    cmd.env("HOME", config_home)
        .env("XDG_CONFIG_HOME", config_home.join(".config"))
        .env("RUST_LOG", "info");
    for key in [
        "MICROSYNC_DEBOUNCE_SECS",
        "MICROSYNC_EXTENSIONS",
        "MICROSYNC_BASE_IMAGE",
        "MICROSYNC_DESTINATION_PREFIX",
        "MICROSYNC_DOCKER",
        "MICROSYNC_ON_BUILD_FAILURE",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn help_lists_arguments() {
    let home = tempdir().unwrap();
    let output = microsync(home.path()).arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("PREFIX_PATH"), "help: {}", stdout);
    assert!(stdout.contains("--file-extensions"));
    assert!(stdout.contains("--timeout"));
}

#[test]
fn zero_timeout_is_rejected() {
    let home = tempdir().unwrap();
    let root = tempdir().unwrap();
    let output = microsync(home.path())
        .arg(root.path())
        .args(["/prefix", "base:latest", "--timeout", "0", "--dry-run"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid debounce timeout"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn missing_base_image_is_reported() {
    let home = tempdir().unwrap();
    let root = tempdir().unwrap();
    let output = microsync(home.path())
        .arg(root.path())
        .args(["/prefix", "--dry-run"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("image.base"), "stderr: {}", stderr);
}

#[test]
fn missing_root_is_reported() {
    let home = tempdir().unwrap();
    let output = microsync(home.path())
        .arg(home.path().join("not-here"))
        .args(["/prefix", "base:latest", "--dry-run"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("watch root not found"), "stderr: {}", stderr);
}

#[test]
fn unavailable_docker_program_fails_fast() {
    let home = tempdir().unwrap();
    let root = tempdir().unwrap();
    let output = microsync(home.path())
        .arg(root.path())
        .args(["/prefix", "base:latest", "--docker", "/nonexistent/microsync-docker"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not be run"), "stderr: {}", stderr);
}

#[test]
fn project_config_supplies_missing_arguments() {
    let home = tempdir().unwrap();
    let root = tempdir().unwrap();
    fs::write(
        root.path().join("microsync.toml"),
        concat!(
            "[image]\nbase = \"from-config:latest\"\ndestination_prefix = \"/app\"\n",
            "\n[watch]\ndebounce_secs = 0.0\n",
        ),
    )
    .unwrap();

    // The file is read (its bad timeout is what fails), proving the layer applies
    let output = microsync(home.path())
        .arg(root.path())
        .arg("--dry-run")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid debounce timeout"),
        "stderr: {}",
        stderr
    );
}

/// Dry run end to end: a real file change produces a build event
#[test]
fn dry_run_builds_after_change() {
    let home = tempdir().unwrap();
    let root = tempdir().unwrap();

    let mut child = microsync(home.path())
        .arg(root.path())
        .args(["/prefix", "base:latest", "--timeout", "0.2", "--dry-run", "--json"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start microsync");

    // Give the watcher a moment to attach
    thread::sleep(Duration::from_millis(700));
    fs::write(root.path().join("app.py"), "print('hi')").unwrap();
    thread::sleep(Duration::from_millis(1500));

    let _ = child.kill();
    let output = child.wait_with_output().expect("Failed to get output");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("\"event\":\"watch_started\""), "stdout: {}", stdout);
    assert!(stdout.contains("\"path\":\"app.py\""), "stdout: {}", stdout);
    assert!(
        stdout.contains("\"event\":\"build_complete\""),
        "stdout: {}",
        stdout
    );
    assert!(stdout.contains("dry-run-1"), "stdout: {}", stdout);
}
