//! End-to-end tests of the selfrunner binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn selfrunner(cwd: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("selfrunner").unwrap();
    cmd.current_dir(cwd);
    cmd
}

#[test]
fn test_help_lists_flags() {
    let dir = TempDir::new().unwrap();
    selfrunner(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--explore"))
        .stdout(predicate::str::contains("--testlist"))
        .stdout(predicate::str::contains("--teamcity"))
        .stdout(predicate::str::contains("--redis"))
        .stdout(predicate::str::contains("test-logs"));
}

#[test]
fn test_unknown_flag_fails_with_usage() {
    let dir = TempDir::new().unwrap();
    selfrunner(dir.path())
        .arg("--bogus")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_missing_test_list_fails_before_running() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("results.xml");

    selfrunner(dir.path())
        .args(["-l", "missing.txt", "-o"])
        .arg(&output)
        .arg("/no/such/test-binary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("File: missing.txt not found"));

    assert!(!output.exists());
}

#[test]
fn test_missing_target_is_an_engine_error() {
    let dir = TempDir::new().unwrap();
    selfrunner(dir.path())
        .arg("/no/such/test-binary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Test binary /no/such/test-binary not found"));
}

#[test]
fn test_explore_without_target_runs_itself() {
    let dir = TempDir::new().unwrap();
    let assert = selfrunner(dir.path()).arg("--explore").assert().success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.starts_with("<test-run "), "{stdout}");
    assert!(stdout.contains(r#"testcasecount="0""#), "{stdout}");
    assert!(stdout.contains(r#"name="selfrunner"#), "{stdout}");
}

#[test]
fn test_run_without_target_reports_empty_suite() {
    let dir = TempDir::new().unwrap();
    selfrunner(dir.path())
        .arg("--console")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Tests run: 0, Passed: 0, Failed: 0, Skipped: 0",
        ));
}

#[test]
fn test_malformed_config_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".selfrunner.json"), "{ not json").unwrap();

    selfrunner(dir.path())
        .arg("/no/such/test-binary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[cfg(unix)]
#[test]
fn test_explore_writes_output_file() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let harness = dir.path().join("suite-abc");
    fs::write(
        &harness,
        "#!/bin/sh\nif [ \"$1\" = \"--list\" ]; then\n  [ \"$4\" = \"--ignored\" ] || echo \"tests::works: test\"\n  exit 0\nfi\nexit 2\n",
    )
    .unwrap();
    let mut permissions = fs::metadata(&harness).unwrap().permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&harness, permissions).unwrap();
    let output = dir.path().join("explore.xml");

    let assert = selfrunner(dir.path())
        .args(["--explore", "--console", "--outputfile"])
        .arg(&output)
        .arg(&harness)
        .assert()
        .success();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("<test-run "));
    assert!(written.contains(r#"fullname="tests::works""#));
    // explore always prints the raw XML, even with --console
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout, format!("{written}\n"));
}
