use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

const CONSISTENT: &str = "\
metadata:
  story: cli-check
tasks:
- kind: builtin/start
  config:
    output:
      link: 1
- kind: builtin/log
  config:
    start:
      link: 1
    end: {}
    message: done
";

/// The log task's input points at link 9, which no start owns.
const DANGLING: &str = "\
tasks:
- kind: builtin/start
  config:
    output:
      link: 9
- kind: builtin/log
  config:
    start:
      link: 1
    end: {}
";

fn write_graph(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("graph.yml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_kinds_lists_builtin_and_demo_kinds() {
    Command::cargo_bin("storytool")
        .unwrap()
        .arg("kinds")
        .assert()
        .success()
        .stdout(predicate::str::contains("builtin/start"))
        .stdout(predicate::str::contains("builtin/when_all"))
        .stdout(predicate::str::contains("vn/dialogue"));
}

#[test]
fn test_check_reports_consistent_graph() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_graph(dir.path(), CONSISTENT);

    Command::cargo_bin("storytool")
        .unwrap()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("consistent"));
}

#[test]
fn test_check_reports_repairs_without_writing() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_graph(dir.path(), DANGLING);

    Command::cargo_bin("storytool")
        .unwrap()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("repaired"));

    // Without --write the file is untouched.
    assert_eq!(std::fs::read_to_string(&path).unwrap(), DANGLING);
}

#[test]
fn test_check_write_persists_repairs() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_graph(dir.path(), DANGLING);

    Command::cargo_bin("storytool")
        .unwrap()
        .args(["check", "--write"])
        .arg(&path)
        .assert()
        .success();

    let healed = std::fs::read_to_string(&path).unwrap();
    assert_ne!(healed, DANGLING);

    // A second check finds nothing left to repair.
    Command::cargo_bin("storytool")
        .unwrap()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("consistent"));
}

#[test]
fn test_check_fails_on_missing_file() {
    Command::cargo_bin("storytool")
        .unwrap()
        .args(["check", "does-not-exist.yml"])
        .assert()
        .failure();
}

#[test]
fn test_run_executes_non_interactive_story() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_graph(dir.path(), CONSISTENT);

    Command::cargo_bin("storytool")
        .unwrap()
        .arg("run")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("== cli-check =="))
        .stdout(predicate::str::contains("Final task states:"))
        .stdout(predicate::str::contains("builtin/log"));
}

#[test]
fn test_run_services_dialogue_from_stdin() {
    let story = "\
tasks:
- kind: builtin/start
  config:
    output:
      link: 1
- kind: vn/dialogue
  config:
    start:
      link: 1
    end: {}
    speaker: Narrator
    text: Once upon a time.
";
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_graph(dir.path(), story);

    Command::cargo_bin("storytool")
        .unwrap()
        .arg("run")
        .arg(&path)
        .write_stdin("\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Narrator: Once upon a time."));
}
