use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

const BRIEF: &str = r#"[
  {"uid": "p", "vertex-type": "roam/page", "media-type": "text/plain",
   "text": "Brief", "children": ["h", "c"]},
  {"uid": "h", "vertex-type": "roam/block-heading", "media-type": "text/plain",
   "heading": "Goals", "level": 2},
  {"uid": "c", "vertex-type": "roam/block-content", "media-type": "text/plain",
   "text": "Ship it.\nSoon."}
]"#;

fn write_dump(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dump.json");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn converts_to_markdown_by_default() {
    let (_dir, input) = write_dump(BRIEF);

    let mut cmd = cargo_bin_cmd!("roampub");
    cmd.arg(input.as_os_str());

    cmd.assert()
        .success()
        .stdout("# Brief\n\n## Goals\n\nShip it.\nSoon.\n");
}

#[test]
fn explicit_convert_writes_output_file() {
    let (dir, input) = write_dump(BRIEF);
    let output = dir.path().join("brief.md");

    let mut cmd = cargo_bin_cmd!("roampub");
    cmd.arg("convert")
        .arg(input.as_os_str())
        .arg("--to")
        .arg("markdown")
        .arg("-o")
        .arg(output.as_os_str());

    cmd.assert().success().stdout("");
    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("# Brief\n"));
}

#[test]
fn tokens_follow_breaks_override() {
    let (_dir, input) = write_dump(BRIEF);

    let mut cmd = cargo_bin_cmd!("roampub");
    cmd.arg(input.as_os_str()).arg("--to").arg("tokens");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"hardbreak\""))
        .stdout(predicate::str::contains("\"heading_open\""));

    let mut cmd = cargo_bin_cmd!("roampub");
    cmd.arg(input.as_os_str())
        .arg("--to")
        .arg("tokens")
        .arg("--extra-breaks")
        .arg("false");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"softbreak\""))
        .stdout(predicate::str::contains("\"hardbreak\"").not());
}

#[test]
fn config_file_selects_target_format() {
    let (dir, input) = write_dump(BRIEF);
    let config_path = dir.path().join("roampub.toml");
    fs::write(
        &config_path,
        r#"[convert]
format = "commonmark"
"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("roampub");
    cmd.arg(input.as_os_str())
        .arg("--config")
        .arg(config_path.as_os_str());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("## Goals"));
}

#[test]
fn invalid_graph_is_refused() {
    let (_dir, input) = write_dump(
        r#"[
      {"uid": "p", "vertex-type": "roam/page", "media-type": "text/plain",
       "text": "Brief", "children": ["missing"]}
    ]"#,
    );

    let mut cmd = cargo_bin_cmd!("roampub");
    cmd.arg(input.as_os_str());

    cmd.assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("ChildrenExistRule"));
}

#[test]
fn validation_can_be_disabled() {
    let (_dir, input) = write_dump(
        r#"[
      {"uid": "p", "vertex-type": "roam/page", "media-type": "text/plain",
       "text": "Orphans"},
      {"uid": "c", "vertex-type": "roam/block-content", "media-type": "text/plain",
       "text": "Nobody's child."}
    ]"#,
    );

    let mut cmd = cargo_bin_cmd!("roampub");
    cmd.arg(input.as_os_str());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("BlockParentsExistRule"));

    let mut cmd = cargo_bin_cmd!("roampub");
    cmd.arg(input.as_os_str()).arg("--extra-validate").arg("false");
    cmd.assert().success().stdout("# Orphans\n");
}

#[test]
fn unknown_target_format_fails() {
    let (_dir, input) = write_dump(BRIEF);

    let mut cmd = cargo_bin_cmd!("roampub");
    cmd.arg(input.as_os_str()).arg("--to").arg("docx");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("docx"));
}
