// Regression tests for the lltrace binary: exit codes, status lines, derivation files and
// miette diagnostics.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

// Each test writes into its own scratch directory so tests can run in parallel.
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lltrace-cli-{}-{name}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_tokens(dir: &PathBuf, tokens: &[&str]) -> PathBuf {
    let path = dir.join("tokens.txt");
    fs::write(&path, tokens.join("\n") + "\n").unwrap();
    path
}

fn lltrace() -> Command {
    Command::cargo_bin("lltrace").unwrap()
}

#[test]
fn cli_writes_derivation_on_success() {
    let dir = scratch("success");
    let tokens = write_tokens(&dir, &["begin", "id", "=", "num", ",", "end."]);
    let output = dir.join("derivation.txt");

    lltrace()
        .arg("parse")
        .arg(&tokens)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(contains("Derivation written to"));

    let log = fs::read_to_string(&output).unwrap();
    assert!(log.starts_with("Left most derivation:\nprogram -> begin statements end.\n"));
    assert_eq!(log.lines().last(), Some("-> begin id = num , end."));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_reports_parse_failure_and_keeps_log() {
    let dir = scratch("failure");
    let tokens = write_tokens(&dir, &["begin", "id", "end."]);
    let output = dir.join("derivation.txt");

    lltrace()
        .arg("parse")
        .arg(&tokens)
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .stderr(contains("Parsing failed. Check").and(contains("for details.")));

    let log = fs::read_to_string(&output).unwrap();
    assert_eq!(
        log.lines().last(),
        Some("Error at line 2: Expected '=', found 'end.'")
    );
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_reports_miette_diagnostics_for_missing_input() {
    let dir = scratch("missing");
    lltrace()
        .arg("parse")
        .arg(dir.join("no-such-file.txt"))
        .arg("-o")
        .arg(dir.join("derivation.txt"))
        .assert()
        .failure()
        .stderr(contains("lltrace::io::open").or(contains("Could not open file")));
    assert!(!dir.join("derivation.txt").exists());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_prompts_for_input_when_no_file_given() {
    let dir = scratch("prompt");
    let tokens = write_tokens(&dir, &["begin", "nothing", ",", "end."]);
    let output = dir.join("derivation.txt");

    lltrace()
        .arg("parse")
        .arg("-o")
        .arg(&output)
        .write_stdin(format!("{}\n", tokens.display()))
        .assert()
        .success()
        .stdout(contains("Enter input file name: ").and(contains("Derivation written to")));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_streams_to_stdout_with_dash() {
    let dir = scratch("stdout");
    let tokens = write_tokens(&dir, &["begin", "nothing", ",", "end."]);

    lltrace()
        .args(["parse", "-o", "-"])
        .arg(&tokens)
        .assert()
        .success()
        .stdout(contains("-> begin nothing , end."));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_writes_json_report() {
    let dir = scratch("json");
    let tokens = write_tokens(&dir, &["begin", "get", "(", "id", ")", ",", "end."]);
    let output = dir.join("derivation.json");

    lltrace()
        .arg("parse")
        .arg(&tokens)
        .arg("-o")
        .arg(&output)
        .args(["--format", "json"])
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report["accepted"], true);
    assert_eq!(report["error"], serde_json::Value::Null);
    assert_eq!(report["consumed"], 7);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_config_sets_line_base() {
    let dir = scratch("config");
    let tokens = write_tokens(&dir, &["begin", "id", "end."]);
    let output = dir.join("derivation.txt");
    let config = dir.join("lltrace.yaml");
    fs::write(&config, "first_line: 1\n").unwrap();

    lltrace()
        .arg("--config")
        .arg(&config)
        .arg("parse")
        .arg(&tokens)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure();

    let log = fs::read_to_string(&output).unwrap();
    assert!(log.contains("Error at line 3: Expected '=', found 'end.'"));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_rejects_unknown_config_keys() {
    let dir = scratch("bad-config");
    let config = dir.join("lltrace.yaml");
    fs::write(&config, "line_base: 1\n").unwrap();

    lltrace()
        .arg("--config")
        .arg(&config)
        .arg("grammar")
        .assert()
        .failure()
        .stderr(contains("lltrace::config::invalid").or(contains("Invalid configuration")));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_prints_grammar() {
    lltrace()
        .arg("grammar")
        .assert()
        .success()
        .stdout(contains("moreFactors").and(contains("Expected relational operator")));
}

#[test]
fn cli_checks_builtin_grammar() {
    lltrace()
        .arg("check-grammar")
        .assert()
        .success()
        .stdout(contains("Grammar validation passed"));
}

#[test]
fn cli_runs_scenario_corpus() {
    lltrace()
        .args(["test", "tests/scenarios"])
        .assert()
        .success()
        .stdout(contains("Scenario summary"));
}
