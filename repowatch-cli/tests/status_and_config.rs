use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

use repowatch_core::state;
use repowatch_core::types::{audit_now, RepositoryRecord};

fn repowatch_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repowatch"));
    // Point all state at the temp home and keep any ambient .env out of
    // reach by running from inside it.
    cmd.env("REPOWATCH_HOME", home).current_dir(home);
    cmd
}

fn seed_record(home: &Path, slug: &str, branch: &str, commit: &str) {
    state::init_at(home).expect("init state dir");
    state::save_record_at(
        home,
        &RepositoryRecord {
            slug: slug.into(),
            display_name: slug.into(),
            branch: branch.into(),
            last_commit: commit.into(),
            observed_at: audit_now(),
        },
    )
    .expect("seed record");
}

#[test]
fn status_on_an_empty_home_reports_nothing_tracked() {
    let home = TempDir::new().expect("home");

    repowatch_cmd(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains("0 repositories tracked"))
        .stdout(contains("No repositories tracked"));
}

#[test]
fn status_json_lists_seeded_records_sorted_by_slug() {
    let home = TempDir::new().expect("home");
    seed_record(home.path(), "zeta", "master", "f00dfeedf00dfeedf00d");
    seed_record(home.path(), "api", "main", "abc123abc123abc123ab");

    let assert = repowatch_cmd(home.path())
        .args(["status", "--json"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout utf8");
    let payload: serde_json::Value = serde_json::from_str(&stdout).expect("status JSON");

    assert_eq!(payload["summary"]["tracked"], 2);
    let repos = payload["repositories"].as_array().expect("repositories");
    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0]["slug"], "api");
    assert_eq!(repos[0]["branch"], "main");
    assert_eq!(repos[1]["slug"], "zeta");
    assert_eq!(repos[1]["last_commit"], "f00dfeedf00dfeedf00d");
    assert!(repos[0]["observed_at"].as_str().is_some());
}

#[test]
fn status_table_shows_abbreviated_commits() {
    let home = TempDir::new().expect("home");
    seed_record(
        home.path(),
        "api",
        "master",
        "0123456789abcdef0123456789abcdef01234567",
    );

    repowatch_cmd(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains("0123456789ab"))
        .stdout(contains("0123456789abcdef0123").not());
}

#[test]
fn run_without_credentials_names_the_missing_variable() {
    let home = TempDir::new().expect("home");

    repowatch_cmd(home.path())
        .arg("run")
        .env_remove("BITBUCKET_USERNAME")
        .assert()
        .failure()
        .stderr(contains("BITBUCKET_USERNAME"));
}
