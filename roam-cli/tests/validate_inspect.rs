use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const DUMP: &str = r#"[
  {"uid": "p", "vertex-type": "roam/page", "media-type": "text/plain",
   "text": "Inventory", "children": ["h"]},
  {"uid": "h", "vertex-type": "roam/block-heading", "media-type": "text/plain",
   "heading": "Assets", "level": 1, "children": ["c"]},
  {"uid": "c", "vertex-type": "roam/block-content", "media-type": "text/plain",
   "text": "See ((f)).", "refs": ["f"]},
  {"uid": "f", "vertex-type": "roam/file", "media-type": "image/jpeg",
   "file-name": "logo.jpeg", "source": "https://example.com/logo.jpeg"}
]"#;

#[test]
fn validate_reports_ok() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("dump.json");
    fs::write(&input, DUMP).unwrap();

    let mut cmd = cargo_bin_cmd!("roampub");
    cmd.arg("validate").arg(input.as_os_str());

    cmd.assert().success().stdout("ok\n");
}

#[test]
fn validate_lists_every_failure() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("dump.json");
    fs::write(
        &input,
        r#"[
      {"uid": "c", "vertex-type": "roam/block-content", "media-type": "text/plain",
       "text": "No mention.", "refs": ["ghost"]}
    ]"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("roampub");
    cmd.arg("validate").arg(input.as_os_str());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("RootPageRule"))
        .stderr(predicate::str::contains("ReferencesExistRule"))
        .stderr(predicate::str::contains("ReferencesAppearInContentRule"));
}

#[test]
fn inspect_counts_vertex_types() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("dump.json");
    fs::write(&input, DUMP).unwrap();

    let mut cmd = cargo_bin_cmd!("roampub");
    cmd.arg("inspect").arg(input.as_os_str());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("title: Inventory"))
        .stdout(predicate::str::contains("vertices: 4"))
        .stdout(predicate::str::contains("roam/file: 1"));
}

#[test]
fn unreadable_dump_is_reported() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("dump.json");
    fs::write(&input, "{ not json").unwrap();

    let mut cmd = cargo_bin_cmd!("roampub");
    cmd.arg("inspect").arg(input.as_os_str());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"));
}

#[test]
fn lists_formats() {
    let mut cmd = cargo_bin_cmd!("roampub");
    cmd.arg("--list-formats");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pagedump"))
        .stdout(predicate::str::contains("tokens"))
        .stdout(predicate::str::contains("markdown"));
}
