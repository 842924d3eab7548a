#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the math-server binary

use std::process::{Command, Stdio};
use std::time::Duration;

use naming_sdk::testing::{HostedRegistry, closed_port};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::timeout;

/// Helper to run the math-server binary with given arguments
fn run_math_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_math-server"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute math-server")
}

#[test]
fn test_cli_help_command() {
    let output = run_math_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("math-server"), "Should contain binary name");
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--rebind"), "Should mention rebind option");
}

#[test]
fn test_print_config_shows_defaults() {
    let output = run_math_server(&["--print-config"]);

    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["binding_name"], "Compute");
    assert_eq!(config["registry_uri"], "http://127.0.0.1:1099");
    assert_eq!(config["bind_policy"], "reject");
}

#[test]
fn test_print_config_applies_overrides() {
    let output = run_math_server(&["--print-config", "--name", "Calc", "--rebind", "-vv"]);

    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["binding_name"], "Calc");
    assert_eq!(config["bind_policy"], "replace");
    assert_eq!(config["logging"]["level"], "debug");
}

#[test]
fn test_missing_config_file_exit_code() {
    let output = run_math_server(&["--config", "/nonexistent/math-server.yaml"]);

    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"), "stderr: {stderr}");
}

#[test]
fn test_unreachable_registry_exit_code() {
    let registry = format!("http://127.0.0.1:{}", closed_port().unwrap());
    let output = run_math_server(&["--registry", &registry]);

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Math server ready"), "stdout: {stdout}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unreachable"), "stderr: {stderr}");
}

/// Spawn math-server against `registry_uri` and wait for its ready line.
async fn spawn_ready_server(registry_uri: &str) -> tokio::process::Child {
    let mut child = tokio::process::Command::new(env!("CARGO_BIN_EXE_math-server"))
        .args(["--registry", registry_uri])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn math-server");

    let stdout = child.stdout.take().unwrap();
    let mut lines = BufReader::new(stdout).lines();
    let first = timeout(Duration::from_secs(10), lines.next_line())
        .await
        .expect("server did not become ready in time")
        .unwrap();
    assert_eq!(first.as_deref(), Some("Math server ready"));
    child
}

/// Run math-client against `registry_uri` to completion.
async fn run_math_client(registry_uri: &str, args: &[&str]) -> std::process::Output {
    let output = tokio::process::Command::new(env!("CARGO_BIN_EXE_math-client"))
        .args(["--registry", registry_uri])
        .args(args)
        .env_remove("RUST_LOG")
        .output();
    timeout(Duration::from_secs(10), output)
        .await
        .expect("math-client did not finish in time")
        .expect("Failed to execute math-client")
}

#[tokio::test]
async fn test_server_announces_ready_and_binds() {
    let hosted = HostedRegistry::start().await.unwrap();
    let mut child = spawn_ready_server(&hosted.uri()).await;

    let bound = hosted.backing.get("Compute").expect("Compute should be bound");
    assert_eq!(bound.service, remote_math_sdk::SERVICE_NAME);

    // Still serving after the ready line
    assert!(child.try_wait().unwrap().is_none());

    child.kill().await.unwrap();
    hosted.stop().await.unwrap();
}

#[tokio::test]
async fn test_client_calls_running_server() {
    let hosted = HostedRegistry::start().await.unwrap();
    let uri = hosted.uri();
    let mut server = spawn_ready_server(&uri).await;

    let output = run_math_client(&uri, &["add", "2", "3.5"]).await;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "5.5");

    let output = run_math_client(&uri, &["subtract", "-1", "2"]).await;
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "-3");

    let output = run_math_client(&uri, &["divide", "1", "0"]).await;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("division by zero"), "stderr: {stderr}");

    let output = run_math_client(&uri, &["computations"]).await;
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "2");

    server.kill().await.unwrap();
    hosted.stop().await.unwrap();
}

#[tokio::test]
async fn test_client_reports_unbound_name() {
    let hosted = HostedRegistry::start().await.unwrap();

    let output = run_math_client(&hosted.uri(), &["computations"]).await;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not bound"), "stderr: {stderr}");

    hosted.stop().await.unwrap();
}
