use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const TRACE: &str = r#"{"events": [
    {"event": "call", "defined_class": "Foo", "method_id": "bar", "lineno": 10, "parameters": [{"name": "a", "value": "x"}]},
    {"event": "call", "defined_class": "Foo", "method_id": "bar", "lineno": 10, "parameters": [{"name": "a", "value": "x"}]}
]}"#;

fn appland(config_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("appland").unwrap();
    cmd.env("APPLAND_CONFIG", config_dir.join(".appland.toml"))
        .env_remove("RUST_LOG")
        .env_remove("APPLAND_URL")
        .env_remove("APPLAND_API_KEY");
    cmd
}

#[test]
fn test_stats_text() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.appmap.json"), TRACE).unwrap();

    appland(dir.path())
        .arg("stats")
        .arg(dir.path())
        .assert()
        .success()
        .stdout("2 calls, top 1 methods\n  Foo#bar:10: 2 (1 distinct)\n");
}

#[test]
fn test_stats_json_is_parseable_despite_bad_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.appmap.json"), TRACE).unwrap();
    fs::write(dir.path().join("b.appmap.json"), "nope").unwrap();

    let output = appland(dir.path())
        .args(["stats", "--json", "--params"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["totals"][0]["param_counts"]["x"], 2);
    assert!(String::from_utf8_lossy(&output.stderr).contains("b.appmap.json"));
}

#[test]
fn test_stats_missing_path_fails() {
    let dir = tempfile::tempdir().unwrap();

    appland(dir.path())
        .args(["stats", "does/not/exist"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed finding AppMaps"));
}

#[test]
fn test_context_commands_persist() {
    let dir = tempfile::tempdir().unwrap();

    appland(dir.path())
        .args(["context", "add", "local", "http://localhost:3000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("successfully added new context 'local'"));

    appland(dir.path())
        .args(["context", "use", "local"])
        .assert()
        .success();

    appland(dir.path())
        .args(["context", "current"])
        .assert()
        .success()
        .stdout("local: http://localhost:3000\n");

    assert!(dir.path().join(".appland.toml").exists());
}

#[test]
fn test_version_command() {
    let dir = tempfile::tempdir().unwrap();

    appland(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("AppLand CLI v"));
}

#[test]
fn test_stats_verbose_logs_progress_only() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.appmap.json"), TRACE).unwrap();

    appland(dir.path())
        .args(["stats", "-v"])
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Processing"))
        .stderr(predicate::str::contains("Aggregated").not());
}

#[test]
fn test_debug_flag_raises_log_level() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.appmap.json"), TRACE).unwrap();

    appland(dir.path())
        .args(["--debug", "stats"])
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Aggregated"));
}
