use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn create_bundle(root: &Path) {
    let policies = json!({
        "orders": {
            "policy": { "phases": {
                "hot": { "min_age": "0ms", "actions": { "rollover": { "max_age": "7d" } } },
                "delete": { "min_age": "14d", "actions": { "delete": {} } }
            } }
        }
    });
    let explain = json!({ "indices": {
        "orders-000001": { "managed": true, "policy": "orders", "phase": "delete", "age": "15d" },
        "orders-000002": { "managed": true, "policy": "orders", "phase": "hot", "age": "2d" },
        "billing-000001": { "managed": true, "policy": "billing", "phase": "hot", "age": "1d" }
    } });
    fs::write(root.join("ilm_policies.json"), policies.to_string()).unwrap();
    fs::write(root.join("ilm_explain.json"), explain.to_string()).unwrap();
}

fn ilm_health() -> Command {
    Command::cargo_bin("ilm-health").unwrap()
}

#[test]
fn test_analyze_table_output() {
    let temp_dir = TempDir::new().unwrap();
    create_bundle(temp_dir.path());

    ilm_health()
        .arg("analyze")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("ILM POLICY HEALTH REPORT"))
        .stdout(predicate::str::contains("orders"))
        .stdout(predicate::str::contains("HEALTH:"));
}

#[test]
fn test_analyze_json_output() {
    let temp_dir = TempDir::new().unwrap();
    create_bundle(temp_dir.path());

    let output = ilm_health()
        .args(["analyze", "--format", "json"])
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["reports"].as_array().unwrap().len(), 3);
    assert_eq!(report["reports"][0]["index_name"], "billing-000001");
    assert_eq!(report["reports"][0]["issues"][0]["kind"], "DANGLING_POLICY");
    assert_eq!(report["reports"][1]["retention_days"], 14.0);
}

#[test]
fn test_analyze_errors_view_json() {
    let temp_dir = TempDir::new().unwrap();
    create_bundle(temp_dir.path());

    let output = ilm_health()
        .args(["analyze", "--format", "json", "--view", "errors"])
        .arg(temp_dir.path())
        .output()
        .unwrap();

    let errors: Value = serde_json::from_slice(&output.stdout).unwrap();
    let errors = errors["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["policy_name"], "billing");
}

#[test]
fn test_analyze_summary_policies_only() {
    let temp_dir = TempDir::new().unwrap();
    create_bundle(temp_dir.path());

    ilm_health()
        .args(["analyze", "--format", "summary", "--policies-only"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("ILM HEALTH SUMMARY"))
        .stdout(predicate::str::contains("Indices: 1"));
}

#[test]
fn test_analyze_exports() {
    let temp_dir = TempDir::new().unwrap();
    create_bundle(temp_dir.path());
    let export = temp_dir.path().join("report.json");
    let issues = temp_dir.path().join("issues.json");

    ilm_health()
        .args(["-q", "analyze", "--format", "summary"])
        .arg(temp_dir.path())
        .arg("--export")
        .arg(&export)
        .arg("--export-issues")
        .arg(&issues)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report exported to:"))
        .stdout(predicate::str::contains("Exported 1 indices with issues"));

    let report: Value = serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
    assert!(report["generated_at"].is_string());
    let issues: Value = serde_json::from_str(&fs::read_to_string(&issues).unwrap()).unwrap();
    assert_eq!(issues["indices"][0]["index"], "billing-000001");
}

#[test]
fn test_config_file_sets_default_format() {
    let temp_dir = TempDir::new().unwrap();
    create_bundle(temp_dir.path());
    fs::write(
        temp_dir.path().join(".ilm-health.toml"),
        "[output]\nformat = \"summary\"\n",
    )
    .unwrap();

    ilm_health()
        .arg("analyze")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("ILM HEALTH SUMMARY"));
}

#[test]
fn test_missing_bundle_files_fail() {
    let temp_dir = TempDir::new().unwrap();

    ilm_health()
        .arg("analyze")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: File not found"));
}

#[test]
fn test_invalid_json_fails() {
    let temp_dir = TempDir::new().unwrap();
    create_bundle(temp_dir.path());
    fs::write(temp_dir.path().join("ilm_explain.json"), "{ nope").unwrap();

    ilm_health()
        .arg("analyze")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON"));
}

#[test]
fn test_hide_system_flag() {
    let temp_dir = TempDir::new().unwrap();
    create_bundle(temp_dir.path());
    let explain = json!({ "indices": {
        "orders-000001": { "managed": true, "policy": "orders", "phase": "delete", "age": "15d" },
        "app-metrics-000001": { "managed": true, "policy": "app-metrics-90d", "phase": "delete", "age": "1d" }
    } });
    fs::write(temp_dir.path().join("ilm_explain.json"), explain.to_string()).unwrap();

    let output = ilm_health()
        .args(["analyze", "--format", "json"])
        .arg(temp_dir.path())
        .output()
        .unwrap();
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["reports"].as_array().unwrap().len(), 2);

    let output = ilm_health()
        .args(["analyze", "--format", "json", "--hide-system"])
        .arg(temp_dir.path())
        .output()
        .unwrap();
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["reports"].as_array().unwrap().len(), 1);
    assert_eq!(report["reports"][0]["index_name"], "orders-000001");
}

#[test]
fn test_rejects_non_positive_staleness_multiplier() {
    let temp_dir = TempDir::new().unwrap();
    create_bundle(temp_dir.path());

    ilm_health()
        .arg("analyze")
        .arg(temp_dir.path())
        .arg("--staleness-multiplier=-1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be a positive number"));
}

#[test]
fn test_rejects_invalid_thresholds_in_config_file() {
    let temp_dir = TempDir::new().unwrap();
    create_bundle(temp_dir.path());
    let config = temp_dir.path().join("custom.toml");
    fs::write(&config, "[analysis]\nstaleness_multiplier = 0.0\n").unwrap();

    ilm_health()
        .arg("--config")
        .arg(&config)
        .arg("analyze")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("staleness_multiplier must be a positive number"));
}
