// Integration tests driving the driftcheck binary end to end.
//
// The --json contract: stdout from a --json command is exactly one valid
// JSON value (no banners, no extra lines); progress notes go to stderr.
//
// Run with: cargo test -p driftcheck-cli --test json_contract

use std::path::PathBuf;
use std::process::Command;

use httpmock::prelude::*;

fn driftcheck() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_driftcheck"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd
}

fn fixture_trail() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/trail.csv")
}

/// Assert stdout is a single, parseable JSON value with no extra lines.
fn assert_single_json(stdout: &str) -> serde_json::Value {
    let trimmed = stdout.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty");
    serde_json::from_str(trimmed).unwrap_or_else(|e| {
        panic!("stdout must be valid JSON.\nParse error: {e}\nstdout:\n{trimmed}")
    })
}

/// Register the probe answer plus one findOne answer per known id.
fn mock_store(server: &MockServer, answers: &[(&str, Option<serde_json::Value>)]) {
    server.mock(|when, then| {
        when.method(POST)
            .path("/action/findOne")
            .json_body_partial(r#"{"database": "_driftcheck"}"#);
        then.status(200).body(r#"{"document":null}"#);
    });
    for (id, doc) in answers {
        let body = serde_json::json!({ "document": doc });
        server.mock(move |when, then| {
            when.method(POST).path("/action/findOne").json_body_partial(
                format!(r#"{{"filter": {{"_id": {{"$oid": "{id}"}}}}}}"#),
            );
            then.status(200).json_body(body.clone());
        });
    }
}

const ID_33: &str = "693885e2f227ce8067db8d33";
const ID_34: &str = "693885e2f227ce8067db8d34";

#[test]
fn run_json_reports_missing_in_dest_and_exits_1() {
    let source = MockServer::start();
    let dest = MockServer::start();

    mock_store(
        &source,
        &[
            (ID_33, Some(serde_json::json!({"v": 1}))),
            (ID_34, Some(serde_json::json!({"v": 2}))),
        ],
    );
    mock_store(
        &dest,
        &[(ID_33, Some(serde_json::json!({"v": 1}))), (ID_34, None)],
    );

    let output = driftcheck()
        .args([
            "run",
            "--trail",
            fixture_trail().to_str().unwrap(),
            "--source",
            &source.base_url(),
            "--dest",
            &dest.base_url(),
            "--json",
        ])
        .output()
        .expect("driftcheck run --json");

    // One discrepancy -> exit 1.
    assert_eq!(output.status.code(), Some(1), "stderr: {}",
        String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let val = assert_single_json(&stdout);

    let stats = &val["stats"]["testshard.col2"];
    assert_eq!(stats["total_checks"], 2);
    assert_eq!(stats["matches"], 1);
    assert_eq!(stats["missing_in_dest"], 1);

    let discrepancies = val["discrepancies"].as_array().unwrap();
    assert_eq!(discrepancies.len(), 1);
    assert_eq!(discrepancies[0]["id"], ID_34);
    assert_eq!(discrepancies[0]["status"], "missing_in_dest");

    // The malformed line (col9) never became a check.
    assert!(val["stats"].get("testshard.col9").is_none());
}

#[test]
fn run_clean_audit_exits_0() {
    let source = MockServer::start();
    let dest = MockServer::start();

    let answers = [
        (ID_33, Some(serde_json::json!({"v": 1}))),
        (ID_34, Some(serde_json::json!({"v": 2}))),
    ];
    mock_store(&source, &answers);
    mock_store(&dest, &answers);

    let output = driftcheck()
        .args([
            "run",
            "--trail",
            fixture_trail().to_str().unwrap(),
            "--source",
            &source.base_url(),
            "--dest",
            &dest.base_url(),
        ])
        .output()
        .expect("driftcheck run");

    assert!(output.status.success(), "stderr: {}",
        String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Namespace: testshard.col2"));
    assert!(stdout.contains("Matches: 2"));
    assert!(!stdout.contains("Discrepancies"));
}

#[test]
fn run_aborts_when_a_store_is_unreachable() {
    let source = MockServer::start();
    mock_store(&source, &[]);

    let output = driftcheck()
        .args([
            "run",
            "--trail",
            fixture_trail().to_str().unwrap(),
            "--source",
            &source.base_url(),
            "--dest",
            "http://127.0.0.1:1",
            "--timeout",
            "1",
        ])
        .output()
        .expect("driftcheck run");

    assert_eq!(output.status.code(), Some(11)); // EXIT_STORE_UNREACHABLE
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("dest store is unreachable"));
}

#[test]
fn scan_json_counts_extraction_coverage() {
    let output = driftcheck()
        .args(["scan", fixture_trail().to_str().unwrap(), "--json"])
        .output()
        .expect("driftcheck scan --json");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let val = assert_single_json(&stdout);

    assert_eq!(val["lines"], 4);
    assert_eq!(val["facts"], 2);
    assert_eq!(val["irrelevant"], 1);
    assert_eq!(val["malformed_id"], 1);
}

#[test]
fn validate_accepts_good_config_and_rejects_bad() {
    let dir = tempfile::tempdir().unwrap();

    let good = dir.path().join("good.toml");
    std::fs::write(
        &good,
        r#"
[trail]
file = "failures.csv"

[stores.source]
url = "https://src/api"

[stores.dest]
url = "https://dst/api"
"#,
    )
    .unwrap();

    let output = driftcheck()
        .args(["validate", good.to_str().unwrap()])
        .output()
        .expect("driftcheck validate");
    assert!(output.status.success());

    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, "[trail]\nfile = \"x.csv\"\n").unwrap();

    let output = driftcheck()
        .args(["validate", bad.to_str().unwrap()])
        .output()
        .expect("driftcheck validate");
    assert_eq!(output.status.code(), Some(20)); // EXIT_CONFIG_INVALID
}
