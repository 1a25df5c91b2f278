use anyhow::Result;
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(args: &[&str]) -> Output {
    run_with_env(args, &[])
}

fn run_with_env(args: &[&str], vars: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_s3-lambda-stack"));
    cmd.args(args)
        .env_remove("S3_LAMBDA_STACK_LOG_LEVEL")
        .env_remove("S3_LAMBDA_STACK_LOG_FORMAT");
    for (key, value) in vars {
        cmd.env(key, value);
    }
    cmd.output().expect("Failed to run binary")
}

#[test]
fn test_cli_help() {
    let output = run(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("CloudFormation"));
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--format"));
    assert!(stdout.contains("--output"));
    assert!(stdout.contains("--log-level"));
}

#[test]
fn test_cli_version() {
    let output = run(&["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("s3-lambda-stack"));
}

#[test]
fn test_zero_args_prints_json_template() {
    let output = run(&[]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.ends_with("}\n"));
    let doc: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is not JSON");
    assert_eq!(doc["AWSTemplateFormatVersion"], "2010-09-09");
    assert!(doc["Resources"]["S3Bucket"].is_object());
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let first = run(&[]);
    let second = run(&[]);

    assert!(first.status.success() && second.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_logs_never_reach_stdout() {
    let quiet = run(&[]);
    let verbose = run(&["--log-level", "debug"]);

    assert!(verbose.status.success());
    assert_eq!(quiet.stdout, verbose.stdout);
    assert!(String::from_utf8_lossy(&verbose.stderr).contains("Generated template"));
}

#[test]
fn test_cli_log_level_beats_environment() {
    let env_only = run_with_env(&[], &[("S3_LAMBDA_STACK_LOG_LEVEL", "debug")]);
    assert!(env_only.status.success());
    assert!(String::from_utf8_lossy(&env_only.stderr).contains("Generated template"));

    let overridden = run_with_env(
        &["--log-level", "warn"],
        &[("S3_LAMBDA_STACK_LOG_LEVEL", "debug")],
    );
    assert!(overridden.status.success());
    assert!(!String::from_utf8_lossy(&overridden.stderr).contains("Generated template"));
    assert_eq!(env_only.stdout, overridden.stdout);
}

#[test]
fn test_unknown_log_format_still_prints_template() {
    let output = run_with_env(&[], &[("S3_LAMBDA_STACK_LOG_FORMAT", "xml")]);

    assert!(output.status.success());
    assert_eq!(output.stdout, run(&[]).stdout);
}

#[test]
fn test_invalid_log_level_rejected() {
    let output = run(&["--log-level", "s3_lambda_stack=loud"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("logging.level"));
}

#[test]
fn test_yaml_format_flag() {
    let output = run(&["--format", "yaml"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let doc: serde_json::Value = serde_yaml::from_str(&stdout).expect("stdout is not YAML");
    assert_eq!(doc["Parameters"]["FunctionName"]["Default"], "gziptosnappy");
}

#[test]
fn test_invalid_format_fails() {
    let output = run(&["--format", "xml"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_config_file_changes_defaults() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("stack.toml");
    fs::write(
        &config_path,
        "[parameters]\nfunction_name = \"logs-to-snappy\"\ntimeout = 300\n",
    )?;

    let output = run(&["--config", config_path.to_str().unwrap()]);

    assert!(output.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(doc["Parameters"]["FunctionName"]["Default"], "logs-to-snappy");
    assert_eq!(doc["Parameters"]["LambdaTimeout"]["Default"], "300");
    Ok(())
}

#[test]
fn test_invalid_config_aborts_without_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("stack.toml");
    fs::write(&config_path, "[parameters]\nmemory_size = 100\n")?;

    let output = run(&["--config", config_path.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("memory_size"));
    Ok(())
}

#[test]
fn test_output_file_requires_force_to_overwrite() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("template.json");
    let path = output_path.to_str().unwrap();

    let first = run(&["--output", path]);
    assert!(first.status.success());
    assert!(first.stdout.is_empty());
    let written = fs::read_to_string(&output_path)?;
    serde_json::from_str::<serde_json::Value>(&written)?;

    let refused = run(&["--output", path]);
    assert!(!refused.status.success());
    assert!(String::from_utf8_lossy(&refused.stderr).contains("--force"));

    let forced = run(&["--output", path, "--force"]);
    assert!(forced.status.success());
    assert_eq!(fs::read_to_string(&output_path)?, written);
    Ok(())
}
