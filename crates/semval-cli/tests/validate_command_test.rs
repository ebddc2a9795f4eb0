use serde_json::Value;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn cargo_bin() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_semval") {
        return PathBuf::from(path);
    }

    let target_dir = env::var("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| repo_root().join("target"));
    let executable_name = format!("semval{}", std::env::consts::EXE_SUFFIX);
    let fallback = target_dir.join("debug").join(executable_name);

    if fallback.exists() {
        return fallback;
    }

    panic!(
        "CARGO_BIN_EXE_semval is not set and fallback binary was not found at {}",
        fallback.display()
    );
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn testdata_path(path: &str) -> PathBuf {
    repo_root().join("testdata").join(path)
}

fn run(args: &[&str]) -> Output {
    Command::new(cargo_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("semval should execute")
}

fn run_validate(input: &Path, schema: &Path, extra: &[&str]) -> Output {
    let input = input.to_string_lossy();
    let schema = schema.to_string_lossy();
    let mut args = vec!["validate", "-s", schema.as_ref(), "-i", input.as_ref()];
    args.extend_from_slice(extra);
    run(&args)
}

fn assert_exit_code(output: &Output, expected: i32) {
    let actual = output.status.code().unwrap_or(-1);
    assert_eq!(
        actual,
        expected,
        "unexpected exit code; stdout: {}; stderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn submission_schema() -> PathBuf {
    testdata_path("schemas/submission.yaml")
}

#[test]
fn validate_returns_success_for_valid_document() {
    let input = testdata_path("documents/valid_submission.json");
    let output = run_validate(&input, &submission_schema(), &[]);

    assert_exit_code(&output, 0);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("as Submission"));
    assert!(stdout.contains("RefValidationPlugin: passed"));
    assert!(stdout.contains("UniqueValidationPlugin: passed"));
    assert!(stdout.contains("Errors: 0"));
    assert!(stdout.contains("Validation passed."));
}

#[test]
fn validate_reports_dangling_reference_and_writes_report() {
    let input = testdata_path("documents/dangling_reference.json");
    let dir = tempfile::tempdir().expect("temporary directory should be created");
    let report = dir.path().join("report.json");
    let report_arg = report.to_string_lossy();

    let output = run_validate(&input, &submission_schema(), &["-r", report_arg.as_ref()]);

    assert_exit_code(&output, 1);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("RefValidationPlugin: failed"));
    assert!(stdout.contains("primary_sample_ref"));
    assert!(stdout.contains("'S9'"));
    assert!(stdout.contains("Errors: 1"));

    let written: Value =
        serde_json::from_str(&fs::read_to_string(&report).expect("report should exist"))
            .expect("report should be JSON");
    assert_eq!(written["type"], "Submission");
    assert_eq!(written["valid"], false);
    assert!(written.get("object").is_none());

    let message = &written["validation_results"][0]["validation_messages"][0];
    assert_eq!(message["severity"], "Error");
    assert_eq!(message["field"], "primary_sample_ref");
    assert_eq!(message["value"], "S9");
}

#[test]
fn validate_reports_duplicates_in_yaml_input() {
    let input = testdata_path("documents/duplicate_sample.yaml");
    let output = run_validate(&input, &submission_schema(), &["--concurrent"]);

    assert_exit_code(&output, 1);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("UniqueValidationPlugin: failed"));
    assert!(stdout.contains("Duplicate value for unique attribute Sample(sample_id): S1"));
    assert!(stdout.contains("samples.1"));
}

#[test]
fn validate_writes_report_for_valid_document_with_object() {
    let input = testdata_path("documents/valid_submission.json");
    let dir = tempfile::tempdir().expect("temporary directory should be created");
    let report = dir.path().join("report.json");
    let report_arg = report.to_string_lossy();

    let output = run_validate(
        &input,
        &submission_schema(),
        &["-r", report_arg.as_ref(), "--include-object"],
    );

    assert_exit_code(&output, 0);

    let written: Value =
        serde_json::from_str(&fs::read_to_string(&report).expect("report should exist"))
            .expect("report should be JSON");
    assert_eq!(written["valid"], true);
    assert_eq!(written["object"]["primary_sample_ref"], "S1");
}

#[test]
fn validate_uses_config_file_plugins() {
    let input = testdata_path("documents/valid_submission.json");
    let config = testdata_path("config/backref.yaml");
    let output = run_validate(
        &input,
        &submission_schema(),
        &["-c", config.to_string_lossy().as_ref()],
    );

    // S2 is never referenced
    assert_exit_code(&output, 1);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("BackRefValidationPlugin: failed"));
    assert!(stdout.contains("Unused object identifier S2"));
    assert!(!stdout.contains("UniqueValidationPlugin"));
}

#[test]
fn validate_plugin_flag_overrides_defaults() {
    let input = testdata_path("documents/dangling_reference.json");
    let output = run_validate(&input, &submission_schema(), &["-p", "UniqueValidationPlugin"]);

    assert_exit_code(&output, 0);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("RefValidationPlugin"));
}

#[test]
fn validate_runs_json_schema_check() {
    let input = testdata_path("documents/valid_submission.json");
    let json_schema = testdata_path("schemas/submission.schema.json");
    let output = run_validate(
        &input,
        &submission_schema(),
        &["--json-schema", json_schema.to_string_lossy().as_ref()],
    );
    assert_exit_code(&output, 0);
    assert!(String::from_utf8_lossy(&output.stdout).contains("JsonSchemaValidationPlugin: passed"));

    let dir = tempfile::tempdir().expect("temporary directory should be created");
    let bad_input = dir.path().join("bad.json");
    fs::write(&bad_input, r#"{"samples": [{"sample_id": 1}]}"#).expect("input should be written");

    let output = run_validate(
        &bad_input,
        &submission_schema(),
        &["--json-schema", json_schema.to_string_lossy().as_ref()],
    );
    assert_exit_code(&output, 1);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("JsonSchemaValidationPlugin: failed"));
    assert!(stdout.contains("samples.0.sample_id"));
}

#[test]
fn validate_turns_depth_limit_into_fatal_result() {
    let input = testdata_path("documents/valid_submission.json");
    let output = run_validate(&input, &submission_schema(), &["--max-depth", "0"]);

    assert_exit_code(&output, 1);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[Fatal]"));
    assert!(stdout.contains("Fatal: 2"));
}

#[test]
fn validate_returns_error_for_unknown_plugin() {
    let input = testdata_path("documents/valid_submission.json");
    let output = run_validate(&input, &submission_schema(), &["-p", "NoSuchPlugin"]);

    assert_exit_code(&output, 2);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown plugin: NoSuchPlugin"));
}

#[test]
fn validate_returns_error_for_unknown_target_class() {
    let input = testdata_path("documents/valid_submission.json");
    let output = run_validate(&input, &submission_schema(), &["-t", "Nothing"]);

    assert_exit_code(&output, 2);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown class: Nothing"));
}

#[test]
fn validate_requires_target_class_when_root_is_ambiguous() {
    let input = testdata_path("documents/valid_submission.json");
    let schema = testdata_path("schemas/no_root.yaml");
    let output = run_validate(&input, &schema, &[]);

    assert_exit_code(&output, 2);
    assert!(String::from_utf8_lossy(&output.stderr).contains("--target-class"));

    let output = run_validate(&input, &schema, &["-t", "Left"]);
    assert_exit_code(&output, 0);
}

#[test]
fn validate_returns_error_when_schema_path_is_invalid() {
    let input = testdata_path("documents/valid_submission.json");
    let missing_schema = testdata_path("schemas/does-not-exist.yaml");
    let output = run_validate(&input, &missing_schema, &[]);

    assert_exit_code(&output, 2);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load schema"));
}

#[test]
fn validate_returns_error_for_malformed_input() {
    let input = testdata_path("documents/malformed.json");
    let output = run_validate(&input, &submission_schema(), &[]);

    assert_exit_code(&output, 2);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to parse JSON input"));
}
