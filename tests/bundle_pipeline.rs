use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use ilm_health::analyzer::{
    HealthRating, IlmHealthConfig, IssueKind, Retention, Severity, run,
};
use ilm_health::bundle::{DiagnosticBundle, EXPLAIN_ERRORS_FILE, EXPLAIN_FILE, POLICIES_FILE};

/// End-to-end tests: bundle on disk -> loader -> reconciliation report

fn write_json(dir: &Path, name: &str, value: &Value) {
    fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn create_bundle(root: &Path) {
    write_json(
        root,
        POLICIES_FILE,
        &json!({
            "logs-app": {
                "version": 4,
                "modified_date": "2024-09-01T10:00:00.000Z",
                "policy": { "phases": {
                    "hot": { "min_age": "0ms", "actions": { "rollover": { "max_age": "1d" } } },
                    "delete": { "min_age": "30d", "actions": { "delete": {} } }
                } },
                "in_use_by": { "indices": [
                    "logs-app-2024.09.27-000001",
                    "logs-app-2024.09.20-000002"
                ] }
            },
            "audit-forever": {
                "policy": { "phases": { "hot": { "actions": {} } } }
            },
            "metrics": {
                "policy": { "phases": { "hot": {}, "delete": { "min_age": "90d" } } }
            }
        }),
    );

    write_json(
        root,
        EXPLAIN_FILE,
        &json!({ "indices": {
            "logs-app-2024.09.27-000001": {
                "index": "logs-app-2024.09.27-000001", "managed": true,
                "policy": "logs-app", "phase": "hot", "action": "rollover",
                "step": "check-rollover-ready", "age": "2d"
            },
            "logs-app-2024.09.20-000002": {
                "managed": true, "policy": "logs-app", "phase": "delete", "age": "31d"
            },
            "audit-000001": {
                "managed": true, "policy": "audit-forever", "phase": "hot", "age": "3d"
            },
            "orders-000001": {
                "managed": true, "policy": "orders-retention", "phase": "warm", "age": "12d"
            },
            "metrics-000001": { "managed": true, "policy": "metrics", "phase": "hot" },
            ".internal.alerts-000001": {
                "managed": true, "policy": "logs-app", "phase": "hot", "age": "1d"
            },
            "scratch": { "index": "scratch", "managed": false }
        } }),
    );

    write_json(
        root,
        EXPLAIN_ERRORS_FILE,
        &json!({ "indices": {
            "logs-app-2024.09.27-000001": {
                "managed": true, "policy": "logs-app", "phase": "hot",
                "action": "rollover", "step": "ERROR",
                "failed_step": "check-rollover-ready", "age": "2d",
                "step_info": {
                    "type": "illegal_argument_exception",
                    "reason": "rollover_alias setting is empty"
                }
            }
        } }),
    );
}

fn load(bundle: &DiagnosticBundle, config: &IlmHealthConfig) -> ilm_health::Report {
    let policies = bundle.load_policies().unwrap();
    let explain = bundle.load_explain().unwrap();
    run(&policies, &explain, config)
}

#[test]
fn test_commercial_bundle_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let commercial = temp_dir.path().join("commercial");
    fs::create_dir(&commercial).unwrap();
    create_bundle(&commercial);

    let bundle = DiagnosticBundle::from_dir(temp_dir.path()).unwrap();
    let report = load(&bundle, &IlmHealthConfig::default().hide_system());

    // System policy and internal index are hidden; ordering is by policy then index
    let names: Vec<&str> = report.reports.iter().map(|r| r.index_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "audit-000001",
            "logs-app-2024.09.20-000002",
            "logs-app-2024.09.27-000001",
            "orders-000001",
            "scratch",
        ]
    );

    let stuck = report.report("logs-app-2024.09.27-000001").unwrap();
    assert_eq!(stuck.display_name, "logs-app");
    assert_eq!(stuck.retention_days, Some(30.0));
    assert!(stuck.has_issue(IssueKind::StuckStep));
    assert!(stuck.issues[0].message.contains("rollover_alias setting is empty"));

    let audit = report.report("audit-000001").unwrap();
    assert_eq!(audit.retention_days, None);
    assert_eq!(audit.issues.len(), 1);
    assert_eq!(audit.issues[0].kind, IssueKind::UnboundedRetention);
    assert_eq!(audit.issues[0].severity, Severity::Warning);

    let orders = report.report("orders-000001").unwrap();
    assert!(orders.has_issue(IssueKind::DanglingPolicy));

    assert!(report.report("logs-app-2024.09.20-000002").unwrap().is_healthy());
    assert!(report.report("scratch").unwrap().is_healthy());

    // The unmanaged index is listed but not scored
    assert_eq!(report.health.total_indices, 4);
    assert_eq!(report.health.errored_indices, 2);
    assert_eq!(report.health.score, 50.0);
    assert_eq!(report.health.rating, HealthRating::Poor);
}

#[test]
fn test_policy_summaries() {
    let temp_dir = TempDir::new().unwrap();
    create_bundle(temp_dir.path());

    let bundle = DiagnosticBundle::from_dir(temp_dir.path()).unwrap();
    let report = load(&bundle, &IlmHealthConfig::default().hide_system());

    let names: Vec<&str> = report
        .summaries
        .iter()
        .map(|s| s.policy_name.as_str())
        .collect();
    assert_eq!(names, vec!["audit-forever", "logs-app", "orders-retention"]);

    let logs = report.summary("logs-app").unwrap();
    assert_eq!(logs.retention, Retention::Days(30.0));
    assert_eq!(logs.index_count, 2);
    assert_eq!(logs.phase_count("hot"), 1);
    assert_eq!(logs.phase_count("delete"), 1);
    assert!(logs.last_modified.is_some());
    assert!(logs.policy_issues.is_empty());

    assert_eq!(
        report.summary("audit-forever").unwrap().retention,
        Retention::Unbounded
    );
    assert!(!report.summary("orders-retention").unwrap().resolved);
}

#[test]
fn test_policies_only_and_system_default() {
    let temp_dir = TempDir::new().unwrap();
    create_bundle(temp_dir.path());
    let bundle = DiagnosticBundle::from_dir(temp_dir.path()).unwrap();

    let report = load(
        &bundle,
        &IlmHealthConfig::default().with_exclude_noisy_phases(true),
    );
    let names: Vec<&str> = report.reports.iter().map(|r| r.index_name.as_str()).collect();
    assert_eq!(names, vec!["logs-app-2024.09.20-000002"]);

    // Nothing is hidden unless asked for
    let report = load(&bundle, &IlmHealthConfig::default());
    assert_eq!(report.reports.len(), 7);
    assert!(report.report("metrics-000001").is_some());
    assert!(report.report(".internal.alerts-000001").is_some());
    assert!(report.summary("metrics").is_some());
}

#[test]
fn test_explicit_files_without_errors_overlay() {
    let temp_dir = TempDir::new().unwrap();
    create_bundle(temp_dir.path());

    let bundle = DiagnosticBundle::from_files(
        temp_dir.path().join("ilm_policies"),
        temp_dir.path().join("ilm_explain"),
    );
    let report = load(&bundle, &IlmHealthConfig::default());

    // Without the errors-only file the hot index is not stuck
    assert!(report.report("logs-app-2024.09.27-000001").unwrap().is_healthy());
    assert_eq!(report.health.errored_indices, 1);
}

#[test]
fn test_missing_explain_recommendation() {
    let temp_dir = TempDir::new().unwrap();
    create_bundle(temp_dir.path());
    write_json(
        temp_dir.path(),
        EXPLAIN_FILE,
        &json!({ "indices": {
            "logs-app-2024.09.20-000002": {
                "managed": true, "policy": "logs-app", "phase": "delete", "age": "31d"
            }
        } }),
    );
    fs::remove_file(temp_dir.path().join(EXPLAIN_ERRORS_FILE)).unwrap();

    let bundle = DiagnosticBundle::from_dir(temp_dir.path()).unwrap();
    let report = load(&bundle, &IlmHealthConfig::default());

    let logs = report.summary("logs-app").unwrap();
    assert!(
        logs.policy_issues
            .iter()
            .any(|i| i.kind == IssueKind::MissingExplain
                && i.message.contains("logs-app-2024.09.27-000001"))
    );
    assert!(
        report
            .recommendations()
            .iter()
            .any(|r| r.subject == "logs-app" && r.kind == IssueKind::MissingExplain)
    );
}
