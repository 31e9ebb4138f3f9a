use agentos::core::config::Config;
use agentos::core::error::AgentOsError;
use agentos::core::external_action::{self, ExternalCapability, events_path};
use agentos::plugins::runner::{project_invocation, test_invocation};
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

fn strings(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_forwards_configured_test_command() {
    let tmp = tempdir().unwrap();
    let mut cfg = Config::default();
    cfg.commands.test = strings(&["pytest", "-q"]);

    let inv = test_invocation(&cfg, tmp.path(), &strings(&["tests/unit", "-k", "login"])).unwrap();
    assert_eq!(inv.capability, ExternalCapability::TestExec);
    assert_eq!(inv.argv(), strings(&["pytest", "-q", "tests/unit", "-k", "login"]));
    assert_eq!(inv.cwd, tmp.path());
}

#[test]
fn test_forwards_named_project_command() {
    let tmp = tempdir().unwrap();
    let mut cfg = Config::default();
    cfg.commands
        .project
        .insert("lint".to_string(), strings(&["cargo", "clippy", "--all-targets"]));

    let inv = project_invocation(&cfg, tmp.path(), "lint", &[]).unwrap();
    assert_eq!(inv.scope, "project.lint");
    assert_eq!(inv.argv(), strings(&["cargo", "clippy", "--all-targets"]));

    let err = project_invocation(&cfg, tmp.path(), "deploy", &[]).unwrap_err();
    match err {
        AgentOsError::NotFound(msg) => assert!(msg.contains("lint")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_empty_command_is_config_error() {
    let tmp = tempdir().unwrap();
    let mut cfg = Config::default();
    cfg.commands.test.clear();
    assert!(matches!(
        test_invocation(&cfg, tmp.path(), &[]),
        Err(AgentOsError::ConfigError(_))
    ));
}

#[cfg(unix)]
#[test]
fn test_execute_records_event_and_exit_code() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join(".agent-os/data");
    let mut cfg = Config::default();
    cfg.commands
        .project
        .insert("fail".to_string(), strings(&["sh", "-c", "exit 3"]));

    let inv = project_invocation(&cfg, tmp.path(), "fail", &[]).unwrap();
    let outcome = external_action::execute(&data, &cfg.external, &inv).unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.exit_code, Some(3));

    let log = fs::read_to_string(events_path(&data)).unwrap();
    let event: Value = serde_json::from_str(log.lines().last().unwrap()).unwrap();
    assert_eq!(event["scope"], "project.fail");
    assert_eq!(event["capability"], "script_exec");
    assert_eq!(event["status"], "error");
    assert_eq!(event["exit_code"], 3);
}

#[test]
fn test_execute_rejects_unlisted_binary() {
    let tmp = tempdir().unwrap();
    let mut cfg = Config::default();
    cfg.commands.test = strings(&["rm", "-rf", "/"]);
    let inv = test_invocation(&cfg, tmp.path(), &[]).unwrap();
    let err = external_action::execute(tmp.path(), &cfg.external, &inv).unwrap_err();
    assert!(matches!(err, AgentOsError::ExternalError(_)));
    assert!(!events_path(tmp.path()).exists());
}
