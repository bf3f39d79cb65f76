use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;

const FEED: &str = r#"{
  "items": [
    {"title": "A", "year": 2020, "cited_by_count": 10, "authors": "Me, Alice, Bob", "is_published": true},
    {"title": "B", "year": 2021, "cited_by_count": 8, "authors": "Me, Alice", "is_published": true},
    {"title": "C", "year": 2022, "cited_by_count": 5, "authors": "Me, Carol"},
    {"title": "D", "year": 2023, "cited_by_count": 4, "authors": "Me", "is_citable": false},
    {"title": "E", "year": 2024, "cited_by_count": 3, "authors": "Me"}
  ]
}"#;

fn write_feed(dir: &Path) -> String {
    let path = dir.join("publications.json");
    fs::write(&path, FEED).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("pubcharts").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pubcharts"))
        .stdout(predicate::str::contains("render"));
}

#[test]
fn stats_prints_headline_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let feed = write_feed(dir.path());
    let mut cmd = Command::cargo_bin("pubcharts").unwrap();
    cmd.args(["stats", "--input", &feed, "--latest", "2"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("works=5"))
        .stdout(predicate::str::contains("citations=30"))
        .stdout(predicate::str::contains("collaborators=3"))
        .stdout(predicate::str::contains("h-index=4"))
        .stdout(predicate::str::contains("- E (2024)"));
}

#[test]
fn render_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let feed = write_feed(dir.path());
    let out = dir.path().join("years.png");
    let mut cmd = Command::cargo_bin("pubcharts").unwrap();
    cmd.args([
        "render",
        "--input",
        &feed,
        "--chart",
        "papers-per-year",
        "--width",
        "400",
        "--dpr",
        "2",
        "--out",
    ])
    .arg(&out);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("800x430"));
    assert!(fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn missing_feed_still_renders_empty_chart() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("empty.svg");
    let mut cmd = Command::cargo_bin("pubcharts").unwrap();
    cmd.args(["render", "--input"])
        .arg(dir.path().join("nope.json"))
        .args(["--chart", "citations", "--out"])
        .arg(&out);
    cmd.assert().success();
    assert!(fs::read_to_string(&out).unwrap().contains("<svg"));
}

#[test]
fn export_histogram_csv() {
    let dir = tempfile::tempdir().unwrap();
    let feed = write_feed(dir.path());
    let out = dir.path().join("hist.csv");
    let mut cmd = Command::cargo_bin("pubcharts").unwrap();
    cmd.args(["export", "--input", &feed, "--chart", "citations", "--out"])
        .arg(&out);
    cmd.assert().success();

    let text = fs::read_to_string(&out).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("label,citable,published"));
    // 1-9 holds B (8), C (5), D (4, not citable) and E (3); only B is published
    assert!(text.lines().any(|l| l == "1-9,3,1"));
    assert!(text.lines().any(|l| l == "10-49,1,1"));
    assert!(text.lines().any(|l| l == "500+,0,0"));
}
