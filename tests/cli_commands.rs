//! Integration tests for the model-free CLI commands.

#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::process::Command;
use tempfile::TempDir;

/// Command isolated from the user's config file and environment.
fn binwise(config_dir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("binwise"));
    cmd.env("BINWISE_CONFIG", config_dir.path().join("config.toml"))
        .env_remove("BINWISE_CITY")
        .env_remove("BINWISE_RULES")
        .env_remove("BINWISE_OUTPUT_MODE")
        .env_remove("RUST_LOG");
    cmd
}

fn json_lines(output: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(output)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_resolve_livermore_plastic_bag() {
    let dir = TempDir::new().unwrap();
    binwise(&dir)
        .args([
            "resolve",
            "--city",
            "livermore",
            "--class",
            "plastic",
            "--subtype",
            "plastic_bag",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trash / Garbage"))
        .stdout(predicate::str::contains("black"));
}

#[test]
fn test_resolve_json_envelope() {
    let dir = TempDir::new().unwrap();
    let output = binwise(&dir)
        .args([
            "resolve",
            "--city",
            "oakland",
            "--class",
            "paper",
            "--subtype",
            "pizza_box",
            "--output-mode",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let events = json_lines(&output.stdout);
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event["event"], "result");
    assert_eq!(event["spec_version"], "1.0");
    assert_eq!(event["payload"]["result_type"], "resolution");
    assert_eq!(event["payload"]["result"]["bin"], "Organic / Compost");
    assert_eq!(event["payload"]["result"]["color"], "green");
}

#[test]
fn test_resolve_direct_class_with_default_subtype() {
    let dir = TempDir::new().unwrap();
    binwise(&dir)
        .args(["resolve", "--city", "oakland", "--class", "glass"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recyclable"));
}

#[test]
fn test_resolve_invalid_city_fails() {
    let dir = TempDir::new().unwrap();
    binwise(&dir)
        .args(["resolve", "--city", "atlantis", "--class", "glass"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid city 'atlantis'"))
        .stdout(predicate::str::contains("Recyclable").not());
}

#[test]
fn test_resolve_invalid_city_json_error_event() {
    let dir = TempDir::new().unwrap();
    let output = binwise(&dir)
        .args([
            "--output-mode",
            "json",
            "resolve",
            "--city",
            "atlantis",
            "--class",
            "glass",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let events = json_lines(&output.stdout);
    assert_eq!(events[0]["event"], "error");
    assert_eq!(events[0]["payload"]["code"], "invalid_city");
}

#[test]
fn test_resolve_uses_configured_default_city() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[defaults]\ncity = \"livermore\"\n",
    )
    .unwrap();

    binwise(&dir)
        .args(["resolve", "--class", "paper", "--subtype", "pizza_box"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recyclable"));
}

#[test]
fn test_resolve_without_city_fails() {
    let dir = TempDir::new().unwrap();
    binwise(&dir)
        .args(["resolve", "--class", "glass"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid city"));
}

#[test]
fn test_triage_json() {
    let dir = TempDir::new().unwrap();
    let detections = dir.path().join("detections.json");
    std::fs::write(
        &detections,
        r#"[
            {"label": "paper", "confidence": 0.55, "bbox": [0.1, 0.1, 0.3, 0.3]},
            {"label": "glass", "confidence": 0.8, "bbox": [0.4, 0.4, 0.6, 0.7]},
            {"label": "cloth", "confidence": 0.9, "bbox": [0.0, 0.0, 0.95, 0.95]}
        ]"#,
    )
    .unwrap();

    let output = binwise(&dir)
        .args(["--output-mode", "json", "triage", "--city", "oakland"])
        .arg(&detections)
        .output()
        .unwrap();
    assert!(output.status.success());

    let events = json_lines(&output.stdout);
    let payload = &events[0]["payload"];
    assert_eq!(payload["result_type"], "triage");
    assert_eq!(payload["city"], "oakland");

    let items = payload["detections"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["label"], "glass");
    assert_eq!(items[0]["result"]["bin"], "Recyclable");
    assert_eq!(items[1]["label"], "paper");
    assert_eq!(items[1]["needs_followup"], true);
}

#[test]
fn test_triage_human_shows_followup_question() {
    let dir = TempDir::new().unwrap();
    let detections = dir.path().join("detections.json");
    std::fs::write(
        &detections,
        r#"[{"label": "plastic", "confidence": 0.7, "bbox": [0.2, 0.2, 0.5, 0.6]}]"#,
    )
    .unwrap();

    binwise(&dir)
        .args(["triage", "--city", "livermore"])
        .arg(&detections)
        .assert()
        .success()
        .stdout(predicate::str::contains("binwise resolve --city livermore --class plastic"));
}

#[test]
fn test_triage_malformed_file() {
    let dir = TempDir::new().unwrap();
    let detections = dir.path().join("detections.json");
    std::fs::write(&detections, "not json").unwrap();

    binwise(&dir)
        .args(["triage", "--city", "oakland"])
        .arg(&detections)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse detection file"));
}

#[test]
fn test_rules_list() {
    let dir = TempDir::new().unwrap();
    binwise(&dir)
        .args(["rules", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("livermore"))
        .stdout(predicate::str::contains("oakland"))
        .stdout(predicate::str::contains("[follow-up]"));
}

#[test]
fn test_rules_show_json() {
    let dir = TempDir::new().unwrap();
    let output = binwise(&dir)
        .args([
            "rules",
            "show",
            "--city",
            "oakland",
            "--class",
            "glass",
            "--output-mode",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let payload = &json_lines(&output.stdout)[0]["payload"];
    assert_eq!(payload["result_type"], "rules_show");
    assert!(payload["followup"].is_null());
    assert_eq!(payload["rules"]["default"]["bin"], "Recyclable");
}

#[test]
fn test_rules_check_embedded() {
    let dir = TempDir::new().unwrap();
    binwise(&dir)
        .args(["rules", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("embedded table: OK"));
}

#[test]
fn test_rules_check_rejects_invalid_file() {
    let dir = TempDir::new().unwrap();
    let rules = dir.path().join("rules.toml");
    std::fs::write(
        &rules,
        r#"
[cities.oakland]
contact = "Oakland Recycles"

[cities.oakland.rules.paper]
pizza_box = { bin = "Organic / Compost", color = "green", emoji = "x", tip = "Compost." }
"#,
    )
    .unwrap();

    binwise(&dir)
        .args(["rules", "check"])
        .arg(&rules)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no follow-up question"));
}

#[test]
fn test_rules_override_changes_resolution() {
    let dir = TempDir::new().unwrap();
    let rules = dir.path().join("rules.toml");
    std::fs::write(
        &rules,
        r#"
[cities.oakland]
contact = "Oakland Public Works"

[cities.oakland.rules.glass]
default = { bin = "Glass Drop-off", color = "purple", emoji = "x", tip = "Use the depot." }
"#,
    )
    .unwrap();

    binwise(&dir)
        .arg("--rules")
        .arg(&rules)
        .args(["resolve", "--city", "oakland", "--class", "glass"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Glass Drop-off"))
        .stdout(predicate::str::contains("Oakland Public Works"));

    // Livermore is not in the override table.
    binwise(&dir)
        .arg("--rules")
        .arg(&rules)
        .args(["resolve", "--city", "livermore", "--class", "glass"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid city"));
}

#[test]
fn test_classify_without_model_fails() {
    let dir = TempDir::new().unwrap();
    let image = dir.path().join("bin.jpg");
    std::fs::write(&image, b"not really a jpeg").unwrap();

    binwise(&dir)
        .env_remove("BINWISE_MODEL")
        .arg(&image)
        .args(["--city", "oakland"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no detector model configured"));
}

#[test]
fn test_no_inputs_prints_setup_guide() {
    let dir = TempDir::new().unwrap();
    binwise(&dir)
        .env_remove("BINWISE_MODEL")
        .assert()
        .success()
        .stdout(predicate::str::contains("binwise config init"));
}

#[test]
fn test_config_init_and_show() {
    let dir = TempDir::new().unwrap();
    binwise(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(dir.path().join("config.toml").exists());

    let output = binwise(&dir)
        .args(["config", "show", "--output-mode", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let payload = &json_lines(&output.stdout)[0]["payload"];
    assert_eq!(payload["result_type"], "config");
    assert_eq!(payload["config"]["server"]["port"], 5000);
}

#[test]
fn test_invalid_config_rejected() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[detector]\ninference_resolution = 1000\n",
    )
    .unwrap();

    binwise(&dir)
        .args(["rules", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("multiple of 32"));
}
