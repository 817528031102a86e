//! End-to-end CLI tests that do not need network access

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("cg")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("prefs"));
}

#[test]
fn test_plan_requires_subcommand() {
    Command::cargo_bin("cg").unwrap().arg("plan").assert().failure();
}

#[test]
fn test_prefs_with_fresh_data_dir() {
    let temp = tempfile::TempDir::new().unwrap();
    let config_path = temp.path().join("cityguide.yml");
    std::fs::write(
        &config_path,
        format!("storage:\n  data-dir: {}\n", temp.path().join("data").display()),
    )
    .unwrap();

    Command::cargo_bin("cg")
        .unwrap()
        .args(["--config", config_path.to_str().unwrap(), "prefs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cuisine: (not set)"));
}
