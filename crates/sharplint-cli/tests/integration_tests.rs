//! Integration tests for the sharplint CLI
//!
//! These tests verify the CLI behavior end-to-end

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const BLANK_BEFORE_BRACE: &str = "public bool Enabled\n{\n    get { return this.enabled; }\n\n}\n";
const CLEAN: &str = "public class A\n{\n    int x;\n}\n";

#[allow(deprecated)]
fn cli() -> Command {
    Command::cargo_bin("sharplint").unwrap()
}

fn create_test_project(source: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("Test.cs"), source).unwrap();
    temp_dir
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sharplint checks C# source files"))
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_version_command() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_lint_clean_project() {
    let temp_dir = create_test_project(CLEAN);
    cli()
        .arg("lint")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Files checked: 1"))
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_lint_reports_violation() {
    let temp_dir = create_test_project(BLANK_BEFORE_BRACE);
    cli()
        .arg("lint")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("warning[SA1508]"))
        .stdout(predicate::str::contains("Test.cs:4:1"))
        .stdout(predicate::str::contains("Warnings: 1"));
}

#[test]
fn test_error_on_warnings() {
    let temp_dir = create_test_project(BLANK_BEFORE_BRACE);
    cli()
        .args(["lint", "--error-on-warnings"])
        .arg(temp_dir.path())
        .assert()
        .code(1);
}

#[test]
fn test_configured_error_severity_fails() {
    let temp_dir = create_test_project(BLANK_BEFORE_BRACE);
    fs::write(
        temp_dir.path().join(".sharplintrc.json"),
        r#"{ "linter": { "rules": { "SA1508": "error" } } }"#,
    )
    .unwrap();
    cli()
        .arg("lint")
        .arg(temp_dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("error[SA1508]"));
}

#[test]
fn test_explicit_config_disables_rule() {
    let temp_dir = create_test_project(BLANK_BEFORE_BRACE);
    let config = temp_dir.path().join("custom.json");
    fs::write(&config, r#"{ "linter": { "rules": { "SA1508": "off" } } }"#).unwrap();
    cli()
        .arg("lint")
        .arg("--config")
        .arg(&config)
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_fix_writes_file() {
    let temp_dir = create_test_project(BLANK_BEFORE_BRACE);
    cli()
        .args(["lint", "--fix"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Fixes applied: 1 in 1 file"));

    let fixed = fs::read_to_string(temp_dir.path().join("Test.cs")).unwrap();
    assert_eq!(fixed, "public bool Enabled\n{\n    get { return this.enabled; }\n}\n");
}

#[test]
fn test_fix_dry_run_leaves_file() {
    let temp_dir = create_test_project(BLANK_BEFORE_BRACE);
    cli()
        .args(["lint", "--fix", "--dry-run"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(fixed)"))
        .stdout(predicate::str::contains("@@ -"))
        .stdout(predicate::str::contains("Fixes available: 1"));

    let content = fs::read_to_string(temp_dir.path().join("Test.cs")).unwrap();
    assert_eq!(content, BLANK_BEFORE_BRACE);
}

#[test]
fn test_dry_run_requires_fix() {
    let temp_dir = create_test_project(CLEAN);
    cli()
        .args(["lint", "--dry-run"])
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--fix"));
}

#[test]
fn test_json_output() {
    let temp_dir = create_test_project("\n\nclass A { }\n");
    let output = cli()
        .args(["lint", "--format", "json"])
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["filesChecked"], 1);
    assert_eq!(json["summary"]["warnings"], 1);
    let diagnostic = &json["diagnostics"][0];
    assert_eq!(diagnostic["ruleId"], "SA1517");
    assert_eq!(diagnostic["severity"], "warning");
    assert_eq!(diagnostic["location"]["offset"], 0);
    assert_eq!(diagnostic["location"]["length"], 1);
    assert_eq!(diagnostic["fixable"], true);
}

#[test]
fn test_compact_output() {
    let temp_dir = create_test_project("class A{ }\n");
    cli()
        .args(["lint", "--format", "compact"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Test.cs:1:8: warning [SA1012] Opening curly bracket must be preceded by a space.",
        ))
        .stdout(predicate::str::contains("sharplint: 1 files, 1 issues"));
}

#[test]
fn test_exclude_override() {
    let temp_dir = create_test_project(BLANK_BEFORE_BRACE);
    cli()
        .args(["lint", "--exclude", "*.cs"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No C# files found"));
}

#[test]
fn test_missing_path_fails() {
    let temp_dir = TempDir::new().unwrap();
    cli()
        .arg("lint")
        .arg(temp_dir.path().join("does-not-exist"))
        .assert()
        .code(2);
}

#[test]
fn test_rules_list() {
    let assert = cli().arg("rules").assert().success();
    let output = assert.get_output();
    let stdout = String::from_utf8_lossy(&output.stdout);
    for id in ["SA1012", "SA1407", "SA1408", "SA1506", "SA1508", "SA1517"] {
        assert!(stdout.contains(id), "missing {id}");
    }
    assert!(stdout.contains("Total: 6 rules"));
}

#[test]
fn test_rules_category_filter() {
    cli()
        .args(["rules", "--category", "spacing", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SA1012"))
        .stdout(predicate::str::contains("SA1508").not())
        .stdout(predicate::str::contains("Autofix: available"));

    cli()
        .args(["rules", "--category", "naming"])
        .assert()
        .code(2);
}

#[test]
fn test_config_init_creates_file() {
    let temp_dir = TempDir::new().unwrap();
    cli()
        .current_dir(temp_dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".sharplintrc.json"));

    let content = fs::read_to_string(temp_dir.path().join(".sharplintrc.json")).unwrap();
    let config = sharplint_core::SharplintConfig::from_json_str(&content).unwrap();
    assert_eq!(config.max_passes(), 10);

    // Refuses to overwrite without --force
    cli()
        .current_dir(temp_dir.path())
        .args(["config", "init"])
        .assert()
        .code(2);
    cli()
        .current_dir(temp_dir.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_schema() {
    let output = cli().args(["config", "schema"]).output().unwrap();
    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(schema["properties"]["linter"].is_object());
}

#[test]
fn test_config_validate() {
    let temp_dir = TempDir::new().unwrap();
    let valid = temp_dir.path().join("valid.json");
    fs::write(&valid, r#"{ "fix": { "maxPasses": 3 } }"#).unwrap();
    cli()
        .args(["config", "validate"])
        .arg(&valid)
        .assert()
        .success()
        .stdout(predicate::str::contains("Fix passes: 3"));

    let invalid = temp_dir.path().join("invalid.json");
    fs::write(&invalid, r#"{ "fix": { "maxPasses": 0 } }"#).unwrap();
    cli()
        .args(["config", "validate"])
        .arg(&invalid)
        .assert()
        .code(2);
}
