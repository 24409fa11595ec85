//! lltrace Scenario Harness Library Module
//!
//! Provides reusable discovery, execution, and reporting for YAML-based parse scenarios.
//! Each scenario is a token sequence plus the outcome the parser must produce for it.
//!
//! # Scenario Format
//!
//! Scenarios are defined in YAML files with the following structure:
//! ```yaml
//! - name: "single assignment"
//!   tokens: [begin, id, "=", num, ",", end.]
//!   accepted: true
//!   final_form: "begin id = num , end."   # optional, last sentential form
//!   expect_error: "Expected '='"           # optional, substring of the diagnostic line
//!   expected_log:                          # optional, the complete derivation log
//!     - "Left most derivation:"
//!     - "program -> begin statements end."
//!   skip: false                            # optional, defaults to false
//!   only: false                            # optional, defaults to false
//! ```
//!
//! # Public API
//!
//! - [`run_test_case`] - Execute a single scenario
//! - [`discover_yaml_files`] - Find all YAML scenario files in a directory tree
//! - [`load_test_cases`] - Load and parse scenarios from a YAML file
//! - [`run_all_tests`] - Complete suite execution with filtering and reporting
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use lltrace::test_harness::{run_all_tests, TestConfig};
//!
//! let config = TestConfig::default();
//! let (passed, failed, skipped) = run_all_tests(None, &config);
//! if failed > 0 {
//!     std::process::exit(1);
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use difference::{Changeset, Difference};
use serde::Deserialize;
use walkdir::WalkDir;

use crate::config::ParserConfig;
use crate::errors::TraceError;
use crate::syntax::{derive, TokenStream};

// =============================================================================
// CORE TYPES
// =============================================================================

/// Represents the result of executing a single scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    /// Scenario produced the expected outcome
    Pass { file: String, name: String },
    /// Scenario diverged from its expectations
    Fail {
        file: String,
        name: String,
        error: String,
        /// Expected and actual log, when the log itself mismatched.
        log_diff: Option<(String, String)>,
    },
    /// Scenario was skipped
    Skipped {
        file: String,
        name: String,
        reason: String,
    },
}

/// Represents a single YAML scenario.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TestCase {
    pub name: String,
    pub tokens: Vec<String>,
    pub accepted: bool,
    pub final_form: Option<String>,
    pub expect_error: Option<String>,
    pub expected_log: Option<Vec<String>>,
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub only: bool,
}

/// Configuration for scenario execution and reporting.
pub struct TestConfig {
    pub test_root: PathBuf,
    pub parser: ParserConfig,
    pub use_colors: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            test_root: PathBuf::from("tests/scenarios"),
            parser: ParserConfig::default(),
            use_colors: atty::is(atty::Stream::Stderr),
        }
    }
}

// Color constants for terminal output
const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";

impl TestConfig {
    /// Apply color formatting to text if colors are enabled.
    pub fn colorize(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

// =============================================================================
// DISCOVERY AND LOADING
// =============================================================================

/// Discovers all YAML files recursively under the given root directory, in a stable order.
pub fn discover_yaml_files<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// Load and parse scenarios from a YAML file.
pub fn load_test_cases(path: &Path) -> Result<Vec<TestCase>, TraceError> {
    let content = fs::read_to_string(path).map_err(|source| TraceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|e| TraceError::Scenario {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Helper for scenario skipping logic.
pub fn skip_reason(case: &TestCase, has_only: bool, filter: Option<&str>) -> Option<String> {
    if has_only && !case.only {
        return Some("Not marked 'only' in 'only' mode".to_string());
    }
    if case.skip {
        return Some("Marked 'skip'".to_string());
    }
    if let Some(f) = filter {
        if !case.name.to_lowercase().contains(&f.to_lowercase()) {
            return Some(format!("Filtered out by substring: {f}"));
        }
    }
    None
}

// =============================================================================
// EXECUTION
// =============================================================================

/// Parse a single scenario's tokens and compare the derivation against its expectations.
pub fn run_test_case(file: String, case: TestCase, config: &ParserConfig) -> TestResult {
    let derivation = derive(TokenStream::new(case.tokens.iter().cloned()), config);
    let fail = |error: String, log_diff: Option<(String, String)>| TestResult::Fail {
        file: file.clone(),
        name: case.name.clone(),
        error,
        log_diff,
    };

    if derivation.accepted != case.accepted {
        let detail = derivation.error.as_deref().unwrap_or("no error");
        return fail(
            format!(
                "Expected accepted={}, got accepted={} ({detail})",
                case.accepted, derivation.accepted
            ),
            None,
        );
    }

    if let Some(expected) = case.expect_error.as_deref() {
        match derivation.error.as_deref() {
            Some(actual) if actual.contains(expected) => {}
            Some(actual) => {
                return fail(
                    format!("Expected error containing '{expected}', got '{actual}'"),
                    None,
                )
            }
            None => {
                return fail(
                    format!("Expected error containing '{expected}' but the parse succeeded"),
                    None,
                )
            }
        }
    }

    if let Some(expected) = case.final_form.as_deref() {
        let actual = derivation.final_form().unwrap_or("");
        if actual != expected {
            return fail(
                format!("Final form did not match\n  Expected: {expected}\n  Actual:   {actual}"),
                None,
            );
        }
    }

    if let Some(expected) = &case.expected_log {
        if *expected != derivation.log {
            return fail(
                "Log did not match expected".to_string(),
                Some((expected.join("\n"), derivation.log.join("\n"))),
            );
        }
    }

    TestResult::Pass {
        file,
        name: case.name,
    }
}

// =============================================================================
// REPORTING AND OUTPUT
// =============================================================================

/// Partition results by outcome type.
pub fn partition_results(results: &[TestResult]) -> (usize, usize, usize) {
    let passed = results
        .iter()
        .filter(|r| matches!(r, TestResult::Pass { .. }))
        .count();
    let failed = results
        .iter()
        .filter(|r| matches!(r, TestResult::Fail { .. }))
        .count();
    let skipped = results
        .iter()
        .filter(|r| matches!(r, TestResult::Skipped { .. }))
        .count();
    (passed, failed, skipped)
}

/// Print scenario results with colored output.
pub fn report_results(results: &[TestResult], config: &TestConfig) {
    let (passed, failed, skipped) = partition_results(results);

    for r in results {
        match r {
            TestResult::Pass { file, name } => {
                println!("{}: {} [{}]", config.colorize("PASS", GREEN), name, file)
            }
            TestResult::Fail { .. } => print_failure(r, config),
            TestResult::Skipped { file, name, reason } => println!(
                "{}: {} [{}] ({})",
                config.colorize("SKIP", YELLOW),
                name,
                file,
                reason
            ),
        }
    }

    println!(
        "\nScenario summary: total {}, {} {}, {} {}, {} {}",
        results.len(),
        config.colorize("passed", GREEN),
        passed,
        config.colorize("failed", RED),
        failed,
        config.colorize("skipped", YELLOW),
        skipped,
    );

    if failed > 0 {
        eprintln!("\nFailed scenarios:");
        for r in results {
            if let TestResult::Fail { name, .. } = r {
                eprintln!("  - {name}");
            }
        }
    }
}

/// Print detailed failure information.
pub fn print_failure(r: &TestResult, config: &TestConfig) {
    let TestResult::Fail {
        file,
        name,
        error,
        log_diff,
    } = r
    else {
        return;
    };
    eprintln!("{}: {} [{}]", config.colorize("FAIL", RED), name, file);
    eprintln!("  Error: {error}");
    if let Some((expected, actual)) = log_diff {
        eprintln!("  Diff:");
        print_diff(expected, actual, config);
    }
}

/// Print a line diff between the expected and actual log.
pub fn print_diff(expected: &str, actual: &str, config: &TestConfig) {
    let changeset = Changeset::new(expected, actual, "\n");
    for diff in &changeset.diffs {
        match diff {
            Difference::Same(x) => {
                for line in x.lines() {
                    eprintln!("    {line}");
                }
            }
            Difference::Rem(x) => {
                for line in x.lines() {
                    eprintln!("  - {}", config.colorize(line, GREEN));
                }
            }
            Difference::Add(x) => {
                for line in x.lines() {
                    eprintln!("  + {}", config.colorize(line, RED));
                }
            }
        }
    }
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Run every scenario under the configured root with optional filtering and return
/// summary counts. A file that fails to load counts as one failure.
pub fn run_all_tests(filter: Option<&str>, config: &TestConfig) -> (usize, usize, usize) {
    let yaml_files = discover_yaml_files(&config.test_root);
    log::info!(
        "found {} scenario files under {}",
        yaml_files.len(),
        config.test_root.display()
    );

    let mut all_cases = Vec::new();
    let mut results = Vec::new();
    let mut has_only_tests = false;

    for file_path in &yaml_files {
        let file_name = file_path.display().to_string();
        match load_test_cases(file_path) {
            Ok(cases) => {
                has_only_tests |= cases.iter().any(|case| case.only);
                all_cases.extend(cases.into_iter().map(|case| (file_name.clone(), case)));
            }
            Err(e) => results.push(TestResult::Fail {
                file: file_name,
                name: "<load>".to_string(),
                error: e.to_string(),
                log_diff: None,
            }),
        }
    }

    results.extend(all_cases.into_iter().map(|(file, case)| {
        match skip_reason(&case, has_only_tests, filter) {
            Some(reason) => TestResult::Skipped {
                file,
                name: case.name,
                reason,
            },
            None => run_test_case(file, case, &config.parser),
        }
    }));

    report_results(&results, config);
    partition_results(&results)
}

/// Default runner using standard configuration.
pub fn run_default_tests(filter: Option<&str>) -> (usize, usize, usize) {
    let config = TestConfig::default();
    run_all_tests(filter, &config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(name: &str, tokens: &[&str], accepted: bool) -> TestCase {
        TestCase {
            name: name.to_string(),
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            accepted,
            final_form: None,
            expect_error: None,
            expected_log: None,
            skip: false,
            only: false,
        }
    }

    #[test]
    fn passing_case() {
        let mut c = case("assign", &["begin", "id", "=", "num", ",", "end."], true);
        c.final_form = Some("begin id = num , end.".into());
        let result = run_test_case("mem".into(), c, &ParserConfig::default());
        assert!(matches!(result, TestResult::Pass { .. }), "{result:?}");
    }

    #[test]
    fn wrong_acceptance_fails() {
        let c = case("short", &["begin", "id", "end."], true);
        let result = run_test_case("mem".into(), c, &ParserConfig::default());
        let TestResult::Fail { error, .. } = result else {
            panic!("expected failure");
        };
        assert!(error.contains("Expected '='"));
    }

    #[test]
    fn log_mismatch_carries_diff() {
        let mut c = case("empty", &[], false);
        c.expected_log = Some(vec!["Left most derivation:".into()]);
        let result = run_test_case("mem".into(), c, &ParserConfig::default());
        assert!(matches!(result, TestResult::Fail { log_diff: Some(_), .. }));
    }

    #[test]
    fn skip_rules() {
        let mut c = case("Nested Loop", &[], false);
        assert_eq!(skip_reason(&c, false, Some("loop")), None);
        assert!(skip_reason(&c, true, None).is_some());
        assert!(skip_reason(&c, false, Some("if")).is_some());
        c.skip = true;
        assert_eq!(skip_reason(&c, false, None).as_deref(), Some("Marked 'skip'"));
    }

    #[test]
    fn malformed_yaml_is_a_scenario_error() {
        let path = std::env::temp_dir().join(format!("lltrace-bad-{}.yaml", std::process::id()));
        fs::write(&path, "- name: x\n  tokens: 3\n").unwrap();
        let err = load_test_cases(&path).unwrap_err();
        assert!(matches!(err, TraceError::Scenario { .. }));
        let _ = fs::remove_file(&path);
    }
}
