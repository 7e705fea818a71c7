// SPDX-License-Identifier: Apache-2.0

//! CLI integration tests.
//!
//! Every command runs with `CORDON_CONFIG_DIR` pointed at a throwaway
//! directory so a developer's real config cannot leak into assertions.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn cordon(config_dir: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("cordon");
    cmd.env("CORDON_CONFIG_DIR", config_dir);
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("CORDON_DEBUG");
    cmd
}

#[test]
fn test_version() {
    let dir = tempfile::tempdir().unwrap();
    cordon(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cordon"));
}

#[test]
fn test_help_contains_all_commands() {
    let dir = tempfile::tempdir().unwrap();
    cordon(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("line"))
        .stdout(predicate::str::contains("repl"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("completion"));
}

#[test]
fn test_line_echoes_plain_text() {
    let dir = tempfile::tempdir().unwrap();
    cordon(dir.path())
        .args(["line", "hello world"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello world"));
}

#[test]
fn test_line_exec_keeps_payload_literal() {
    let dir = tempfile::tempdir().unwrap();
    cordon(dir.path())
        .args(["line", "exec:hello; rm -rf /"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello; rm -rf /"));
}

#[test]
fn test_line_alloc_giant_number_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    cordon(dir.path())
        .args(["line", "alloc:99999999999999999999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed number"));
}

#[test]
fn test_line_alloc_in_range() {
    let dir = tempfile::tempdir().unwrap();
    cordon(dir.path())
        .args(["line", "alloc:1024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1024"));
}

#[test]
fn test_line_file_traversal_is_rejected() {
    let config_dir = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    cordon(config_dir.path())
        .args(["--root"])
        .arg(root.path())
        .args(["line", "file:../../etc/passwd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("path"));
}

#[test]
fn test_line_file_inside_root_is_read() {
    let config_dir = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("greeting.txt"), "hi from inside").unwrap();

    cordon(config_dir.path())
        .args(["--root"])
        .arg(root.path())
        .args(["line", "file:greeting.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hi from inside"));
}

#[test]
fn test_line_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = cordon(dir.path())
        .args(["--output", "json", "line", "alloc:512"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("line --output json should produce valid JSON");
    assert_eq!(parsed["allocated"]["bytes"], 512);
}

#[test]
fn test_auth_from_config_file() {
    let config_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        config_dir.path().join("config.toml"),
        "[auth.users]\nadmin = \"s3cret\"\n",
    )
    .unwrap();

    cordon(config_dir.path())
        .args(["line", "auth:admin:s3cret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("admin"));

    cordon(config_dir.path())
        .args(["line", "auth:admin:wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("authentication failed"))
        .stderr(predicate::str::contains("wrong").not());
}

#[test]
fn test_completion_generate_bash() {
    let dir = tempfile::tempdir().unwrap();
    cordon(dir.path())
        .args(["completion", "generate", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cordon"));
}
