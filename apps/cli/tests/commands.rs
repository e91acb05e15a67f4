use std::path::PathBuf;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(name)
}

#[allow(deprecated)]
fn docdesk(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("docdesk").expect("binary");
    cmd.env("HOME", home.path())
        .env_remove("DOCDESK_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--catalog")
        .arg(fixture("json/components.json"))
        .arg("--api-spec")
        .arg(fixture("json/openapi.json"))
        .arg("--customers")
        .arg(fixture("docs/customers.md"));
    cmd
}

fn run(home: &TempDir, args: &[&str]) -> (bool, Value) {
    let output = docdesk(home).args(args).output().expect("command run");
    let body: Value = serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}): {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    });
    (output.status.success(), body)
}

#[test]
fn component_lookup_prints_json() {
    let home = TempDir::new().unwrap();
    let (ok, body) = run(&home, &["component", "button"]);
    assert!(ok);
    assert_eq!(body["component"]["name"], "Button");
}

#[test]
fn customer_lookup_filters_by_name() {
    let home = TempDir::new().unwrap();
    let (ok, body) = run(&home, &["customer", "lan"]);
    assert!(ok);
    assert_eq!(body["customers"][0]["name"], "Nguyễn Thị Lan");
    assert_eq!(body["customers"].as_array().unwrap().len(), 1);
}

#[test]
fn missing_tag_reports_message() {
    let home = TempDir::new().unwrap();
    let (ok, body) = run(&home, &["api", "--tag", "Job"]);
    assert!(ok);
    assert_eq!(body["message"], "No endpoints found for tag 'Job'");
}

#[test]
fn endpoint_lookup_by_path_and_method() {
    let home = TempDir::new().unwrap();
    let (ok, body) = run(&home, &["api", "--path", "/candidates/{candidateId}", "--method", "delete"]);
    assert!(ok);
    assert_eq!(body["endpoint"]["operationId"], "deleteCandidate");
}

#[test]
fn tool_errors_exit_non_zero() {
    let home = TempDir::new().unwrap();
    let (ok, body) = run(&home, &["summarize", "   "]);
    assert!(!ok);
    assert_eq!(body["error"]["code"], "invalid_params");
    assert_eq!(body["error"]["message"], "Text cannot be empty");
}

#[test]
fn summarize_keeps_requested_sentences() {
    let home = TempDir::new().unwrap();
    let (ok, body) = run(
        &home,
        &["summarize", "Cats are great. Dogs are loyal. Cats and dogs are pets.", "-n", "1"],
    );
    assert!(ok);
    assert_eq!(body, "Cats are great.");
}

#[test]
fn rules_with_sections() {
    let home = TempDir::new().unwrap();
    let path = fixture("rules/frontend.md");
    let (ok, body) = run(&home, &["rules", path.to_str().unwrap(), "--sections"]);
    assert!(ok);
    assert_eq!(body["rules"].as_array().unwrap().len(), 5);
    assert_eq!(body["sections"][0]["title"], "Components");
}

#[test]
fn tools_lists_every_operation() {
    let home = TempDir::new().unwrap();
    let (ok, body) = run(&home, &["tools"]);
    assert!(ok);
    assert_eq!(body.as_array().unwrap().len(), 8);
}

#[test]
fn config_file_supplies_sources() {
    let home = TempDir::new().unwrap();
    let config_path = home.path().join("docdesk.toml");
    std::fs::write(
        &config_path,
        format!(
            "[sources]\ncatalog_path = {:?}\n",
            fixture("json/absent.json").display().to_string()
        ),
    )
    .unwrap();

    #[allow(deprecated)]
    let output = Command::cargo_bin("docdesk")
        .expect("binary")
        .env("HOME", home.path())
        .arg("--config")
        .arg(&config_path)
        .args(["category", "forms"])
        .output()
        .expect("command run");

    assert!(!output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body["error"]["code"], "internal_error");
}

#[test]
fn call_dispatches_by_name() {
    let home = TempDir::new().unwrap();
    let (ok, body) = run(&home, &["call", "lookup_components_by_category", r#"{"category": "Actions"}"#]);
    assert!(ok);
    assert_eq!(body["components"][1]["name"], "IconButton");

    let (ok, body) = run(&home, &["call", "no_such_tool"]);
    assert!(!ok);
    assert_eq!(body["error"]["message"], "Unknown tool: no_such_tool");
}
