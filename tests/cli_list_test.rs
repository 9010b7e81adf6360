//! Integration tests for list operations via the CLI.
//!
//! These verify `td list create/delete/ls` and the `td lists` shortcut:
//! - name validation and uniqueness
//! - confirmation handling for deletion
//! - per-kind exit codes on the error paths

use predicates::prelude::*;

mod common;
use common::TestEnv;

#[test]
fn test_list_create_json() {
    let env = TestEnv::init();

    env.td()
        .args(["list", "create", "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\":\"work\""));

    assert!(env.data_path().join("work.json").exists());
}

#[test]
fn test_list_create_human() {
    let env = TestEnv::init();

    env.td()
        .args(["list", "create", "work", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created list 'work'"));
}

#[test]
fn test_list_create_without_explicit_init() {
    let env = TestEnv::new();

    env.td().args(["list", "create", "work"]).assert().success();
    assert!(env.data_path().join("lists.json").exists());
}

#[test]
fn test_list_create_duplicate_fails() {
    let env = TestEnv::init();
    env.td().args(["list", "create", "work"]).assert().success();

    env.td()
        .args(["list", "create", "work"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_list_create_invalid_name_fails() {
    let env = TestEnv::init();

    for bad in ["../escape", "a/b", "lists"] {
        env.td()
            .args(["list", "create", bad])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("invalid list name"));
    }
}

#[test]
fn test_lists_empty() {
    let env = TestEnv::init();

    env.td()
        .arg("lists")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"lists\":[]"));
}

#[test]
fn test_lists_sorted_with_counts() {
    let env = TestEnv::init();
    env.td().args(["list", "create", "zeta"]).assert().success();
    env.td().args(["list", "create", "alpha"]).assert().success();
    env.td()
        .args(["item", "add", "zeta", "Water plants"])
        .assert()
        .success();

    let assert = env.td().arg("lists").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let alpha = stdout.find("\"name\":\"alpha\"").unwrap();
    let zeta = stdout.find("\"name\":\"zeta\"").unwrap();
    assert!(alpha < zeta, "{stdout}");
    assert!(stdout.contains("\"total\":1"), "{stdout}");
}

#[test]
fn test_list_ls_matches_lists_shortcut() {
    let env = TestEnv::init();
    env.td().args(["list", "create", "work"]).assert().success();

    let shortcut = env.td().arg("lists").assert().success();
    let long_form = env.td().args(["list", "ls"]).assert().success();
    assert_eq!(
        shortcut.get_output().stdout,
        long_form.get_output().stdout
    );
}

#[test]
fn test_list_delete_requires_confirmation() {
    let env = TestEnv::init();
    env.td().args(["list", "create", "work"]).assert().success();

    env.td()
        .args(["list", "delete", "work"])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("requires confirmation"));

    // Still there.
    env.td()
        .arg("lists")
        .assert()
        .success()
        .stdout(predicate::str::contains("work"));
}

#[test]
fn test_list_delete_with_yes() {
    let env = TestEnv::init();
    env.td().args(["list", "create", "work"]).assert().success();

    env.td()
        .args(["list", "delete", "work", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\":\"work\""));

    env.td()
        .arg("lists")
        .assert()
        .success()
        .stdout(predicate::str::contains("work").not());
    assert!(!env.data_path().join("work.json").exists());
}

#[test]
fn test_list_delete_unknown_fails() {
    let env = TestEnv::init();

    env.td()
        .args(["list", "delete", "work", "--yes"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("no list named 'work'"));
}
