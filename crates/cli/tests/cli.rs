// ABOUTME: Integration tests for the coursegrab binary: exit codes, prompts, and outputs.
// ABOUTME: Drives the interactive flow by piping answers through stdin against temp dirs.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const LISTING_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Assignments: Chinese 1 | Canvas</title></head>
<body>
<div id="not_right_side">
    <div class="ig-row">
        <a href="https://school.instructure.com/courses/77/assignments/101">Essay One</a>
        <div class="ig-details">Due Oct 5 by 11:59pm - 10 pts</div>
    </div>
</div>
</body>
</html>"#;

const ITEM_PAGE: &str = r#"<html><body>
<h1 class="title">Essay One</h1>
<div class="description"><p>Write a short essay.</p></div>
<div class="points_possible">10</div>
</body></html>"#;

fn coursegrab(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("coursegrab").unwrap();
    cmd.arg("--dir").arg(dir.path());
    cmd
}

#[test]
fn empty_directory_exits_with_failure() {
    let dir = TempDir::new().unwrap();

    coursegrab(&dir)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no HTML files found"));
}

#[test]
fn listing_is_parsed_and_csv_written_when_download_declined() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Assignments.html"), LISTING_PAGE).unwrap();

    coursegrab(&dir)
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Course: Chinese 1"))
        .stdout(predicate::str::contains("Found 1 assignments"))
        .stdout(predicate::str::contains("Skipping download"));

    // Source page moved into the sanitized course directory.
    assert!(!dir.path().join("Assignments.html").exists());
    assert!(dir.path().join("Chinese_1/Assignments.html").exists());

    let csv = fs::read_to_string(dir.path().join("Chinese_1/assignments.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("id,title,url,due_date,points,type"));
    assert_eq!(
        lines.next(),
        Some(
            "101,Essay One,https://school.instructure.com/courses/77/assignments/101,\
             Oct 5 by 11:59pm,10,assignment"
        )
    );
}

#[test]
fn existing_item_pages_are_parsed_into_course_content_json() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Assignments.html"), LISTING_PAGE).unwrap();
    fs::create_dir(dir.path().join("Chinese_1")).unwrap();
    fs::write(dir.path().join("Chinese_1/assignment_101.html"), ITEM_PAGE).unwrap();

    coursegrab(&dir)
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Parsing 1 existing assignment files"))
        .stdout(predicate::str::contains("Done! Processed 1 assignments."));

    let json = fs::read_to_string(dir.path().join("Chinese_1/course_content.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["course_name"], "Chinese 1");
    assert_eq!(value["assignments"][0]["id"], "101");
    assert_eq!(value["assignments"][0]["title"], "Essay One");
    assert_eq!(value["assignments"][0]["points_possible"], "10");
    // Listing due date backfills the page's missing one.
    assert_eq!(value["assignments"][0]["due_date"], "Oct 5 by 11:59pm");
}

#[test]
fn only_dir_and_clear_flags_are_accepted() {
    let dir = TempDir::new().unwrap();

    coursegrab(&dir)
        .arg("--cookie")
        .arg("secret")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unexpected argument"));
}

#[test]
fn clear_declined_leaves_files_alone() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Assignments.html"), LISTING_PAGE).unwrap();

    coursegrab(&dir)
        .arg("--clear")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aborted."));

    assert!(dir.path().join("Assignments.html").exists());
}

#[test]
fn clear_confirmed_removes_course_data() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Assignments.html"), LISTING_PAGE).unwrap();
    fs::create_dir(dir.path().join("Chinese_1")).unwrap();
    fs::write(dir.path().join("Chinese_1/assignments.csv"), "id").unwrap();

    coursegrab(&dir)
        .arg("--clear")
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 entries."));

    assert!(!dir.path().join("Assignments.html").exists());
    assert!(!dir.path().join("Chinese_1").exists());
}
