//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ENGINE: &str = r#"class MusicTheoryEngine {
    constructor() {
        this.scales = {
            major: [0, 2, 4, 5, 7, 9, 11],
            dorian: [0, 2, 3, 5, 7, 9, 10],
            samba: [0, 2, 4, 7, 9]
        };
        this.scaleCategories = {
            'Church Modes': ['major', 'dorian'],
            'Genres': ['samba']
        };
        this.scaleCitations = {
            // hand-written entry
            major: {
                description: 'The Ionian mode',
                culturalContext: { region: 'Western' },
                validationStatus: 'verified'
            }
        };
    }
}
"#;

const RESULTS: &str = r#"{
  "validation_date": "2025-07-01",
  "summary": {"total": 3, "keep": 1, "review": 1, "remove": 1},
  "results": [
    {"scale_name": "major", "display_name": "Major", "intervals": [0, 2, 4, 5, 7, 9, 11],
     "quality_score": 0.85, "recommendation": "KEEP", "reason": "Found 3 sources with scale documentation",
     "sources": [
       {"title": "Major scale", "url": "https://en.wikipedia.org/wiki/Major_scale", "snippet": "scale", "quality": 0.9},
       {"title": "Major scale notes", "url": "https://example.com/major", "snippet": "notes", "quality": 0.5}
     ]},
    {"scale_name": "dorian", "display_name": "Dorian", "intervals": [0, 2, 3, 5, 7, 9, 10],
     "quality_score": 0.45, "recommendation": "REVIEW", "reason": "Only one source with scale info", "sources": []},
    {"scale_name": "samba", "display_name": "Samba", "intervals": [0, 2, 4, 7, 9],
     "quality_score": 0.0, "recommendation": "REMOVE", "reason": "No music theory content found", "sources": []}
  ]
}"#;

fn curator(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("scale-curator"));
    cmd.current_dir(dir);
    cmd
}

fn workspace() -> TempDir {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("engine.js"), ENGINE).expect("engine");
    fs::write(tmp.path().join("results.json"), RESULTS).expect("results");
    tmp
}

#[test]
fn test_cli_version() {
    let tmp = TempDir::new().expect("tmp");
    curator(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("scale-curator"));
}

#[test]
fn test_cli_help() {
    let tmp = TempDir::new().expect("tmp");
    curator(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("review"))
        .stdout(predicate::str::contains("import"))
        .stdout(predicate::str::contains("cleanup"))
        .stdout(predicate::str::contains("prune"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_missing_input_exits_with_error() {
    let tmp = TempDir::new().expect("tmp");
    curator(tmp.path())
        .args(["list", "nope.js"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("JavaScript file not found"));

    curator(tmp.path())
        .args(["status", "missing.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Validation JSON file not found"));
}

#[test]
fn test_list_prints_extracted_scales() {
    let tmp = workspace();
    curator(tmp.path())
        .args(["list", "engine.js"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dorian"))
        .stdout(predicate::str::contains("[0, 2, 3, 5, 7, 9, 10]"))
        .stdout(predicate::str::contains("Total scales: 3"));
}

#[test]
fn test_list_without_scales_assignment_fails() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("empty.js"), "const chords = { major: [0, 4, 7] };\n").expect("write");
    curator(tmp.path())
        .args(["list", "empty.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("scales"));
}

#[test]
fn test_status_reports_counts_and_progress() {
    let tmp = workspace();
    fs::write(
        tmp.path().join("review_progress.json"),
        r#"{"reviewedScales": ["dorian"], "rejectedScales": ["dorian"], "approvedSources": {}}"#,
    )
    .expect("progress");

    curator(tmp.path())
        .args(["status", "results.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total scales: 3"))
        .stdout(predicate::str::contains("Dorian (dorian): 0.45"))
        .stdout(predicate::str::contains("Reviewed: 1/1"))
        .stdout(predicate::str::contains("Rejected: 1"));
}

#[test]
fn test_status_without_progress_file_does_not_create_it() {
    let tmp = workspace();
    curator(tmp.path())
        .args(["status", "results.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not started"));
    assert!(!tmp.path().join("review_progress.json").exists());
}

#[test]
fn test_import_updates_citations_and_keeps_backup() {
    let tmp = workspace();
    curator(tmp.path())
        .args(["import", "results.json", "engine.js"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SCALE CITATION INTEGRATION SUMMARY"))
        .stdout(predicate::str::contains("1 scales set to 'verified' status"))
        .stdout(predicate::str::contains("1 scales set to 'needs-review' status"));

    let backup = fs::read_to_string(tmp.path().join("engine.js.backup")).expect("backup");
    assert_eq!(backup, ENGINE);

    let updated = fs::read_to_string(tmp.path().join("engine.js")).expect("engine");
    assert!(updated.contains("description: \"The Ionian mode\""));
    assert!(updated.contains("region: \"Western\""));
    assert!(updated.contains("source: \"Web Validation\""));
    assert!(updated.contains("VERIFIED via Web Search - Score: 0.90"));
    assert!(updated.contains("validationStatus: \"needs-review\""));
    // Text outside the citations section is untouched.
    assert!(updated.contains("            'Church Modes': ['major', 'dorian'],"));
    let wiki = updated.find("en.wikipedia.org").expect("wiki ref");
    let example = updated.find("example.com/major").expect("example ref");
    assert!(wiki < example);
}

#[test]
fn test_import_without_citations_section_fails_without_writing() {
    let tmp = workspace();
    fs::write(tmp.path().join("engine.js"), "this.scales = { major: [0] };\n").expect("write");
    curator(tmp.path())
        .args(["import", "results.json", "engine.js"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("scaleCitations"));
    assert!(!tmp.path().join("engine.js.backup").exists());
}

#[test]
fn test_prune_keeps_only_keep_scales() {
    let tmp = workspace();
    curator(tmp.path())
        .args(["prune", "results.json", "engine.js"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kept 1 scales, removed 2"));

    let pruned = fs::read_to_string(tmp.path().join("engine.js")).expect("engine");
    assert!(!pruned.contains("dorian"));
    assert!(!pruned.contains("samba"));
    assert!(pruned.contains("major: [0, 2, 4, 5, 7, 9, 11]"));
    assert!(tmp.path().join("engine.js.backup").exists());
}

#[test]
fn test_cleanup_applies_plan() {
    let tmp = workspace();
    fs::write(
        tmp.path().join("plan.toml"),
        r#"remove = ["samba"]

[promote.dorian]
reason = "Church mode"
quality_score = 0.9

[[promote.dorian.sources]]
title = "Dorian mode"
url = "https://en.wikipedia.org/wiki/Dorian_mode"
quality = 0.9
"#,
    )
    .expect("plan");

    curator(tmp.path())
        .args(["cleanup", "results.json", "--plan", "plan.toml", "--output", "cleaned.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Promoted: dorian"))
        .stdout(predicate::str::contains("Final total: 2"));

    let cleaned: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(tmp.path().join("cleaned.json")).expect("read"))
            .expect("json");
    assert_eq!(cleaned["summary"]["keep"], 2);
    assert_eq!(cleaned["summary"]["remove"], 0);
    assert_eq!(cleaned["validation_date"], "2025-07-01");
    // The input is left alone when --output is given.
    assert_eq!(fs::read_to_string(tmp.path().join("results.json")).expect("read"), RESULTS);
}

#[test]
fn test_report_writes_markdown() {
    let tmp = workspace();
    curator(tmp.path())
        .args(["report", "results.json", "--output", "report.md", "--no-timestamp"])
        .assert()
        .success();
    let report = fs::read_to_string(tmp.path().join("report.md")).expect("report");
    assert!(report.starts_with("# Scale Validation Report"));
    assert!(report.contains("| Major | 0.85 | 2 |"));
    assert!(report.contains("| Samba | No music theory content found |"));
}

#[test]
fn test_explicit_missing_config_fails() {
    let tmp = workspace();
    curator(tmp.path())
        .args(["--config", "nope.toml", "status", "results.json"])
        .assert()
        .failure();
}
