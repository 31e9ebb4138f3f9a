use agentos::core::error::AgentOsError;
use agentos::core::workspace::init_workspace;
use agentos::plugins::specs::{
    create_spec, list_specs, resolve_spec, spec_overview, specs_dir, sub_specs,
};
use agentos::plugins::tasks::{load_tasks, tasks_path};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_create_spec_layout() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    init_workspace(root, false, false).unwrap();

    let dir = create_spec(root, "Password Reset", "2026-03-09", false).unwrap();
    assert_eq!(dir, specs_dir(root).join("2026-03-09-password-reset"));
    assert!(dir.join("spec.md").is_file());
    assert!(dir.join("tasks.md").is_file());
    assert!(dir.join("sub-specs/technical-spec.md").is_file());
    assert!(dir.join("sub-specs/tests.md").is_file());

    let spec_md = fs::read_to_string(dir.join("spec.md")).unwrap();
    assert!(spec_md.contains("> Spec: Password Reset"));
    assert!(spec_md.contains("> Created: 2026-03-09"));

    let tasks = load_tasks(&tasks_path(&dir)).unwrap();
    assert_eq!(tasks.summary().total, 3);
    assert_eq!(tasks.items()[0].number, "1");
    assert!(
        fs::read_to_string(dir.join("tasks.md"))
            .unwrap()
            .contains("@.agent-os/specs/2026-03-09-password-reset/spec.md")
    );

    assert_eq!(
        sub_specs(&dir).unwrap(),
        vec!["technical-spec.md".to_string(), "tests.md".to_string()]
    );
    assert!(spec_overview(&dir).unwrap().starts_with("Describe the goal"));
}

#[test]
fn test_create_spec_refuses_existing() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    create_spec(root, "Search", "2026-01-01", false).unwrap();
    let err = create_spec(root, "search", "2026-01-01", false).unwrap_err();
    assert!(matches!(err, AgentOsError::ValidationError(_)));
}

#[test]
fn test_create_spec_validates_inputs() {
    let tmp = tempdir().unwrap();
    assert!(matches!(
        create_spec(tmp.path(), "!!!", "2026-01-01", false),
        Err(AgentOsError::ValidationError(_))
    ));
    assert!(matches!(
        create_spec(tmp.path(), "ok", "Jan 1", false),
        Err(AgentOsError::ValidationError(_))
    ));
}

#[test]
fn test_dry_run_writes_nothing() {
    let tmp = tempdir().unwrap();
    let dir = create_spec(tmp.path(), "Preview", "2026-02-02", true).unwrap();
    assert!(!dir.exists());
    assert!(list_specs(tmp.path()).unwrap().is_empty());
}

#[test]
fn test_list_and_resolve() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    create_spec(root, "Login", "2026-01-01", false).unwrap();
    create_spec(root, "Login Audit", "2026-01-05", false).unwrap();
    create_spec(root, "Billing", "2026-02-01", false).unwrap();

    let specs = list_specs(root).unwrap();
    let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["2026-01-01-login", "2026-01-05-login-audit", "2026-02-01-billing"]
    );
    assert_eq!(specs[0].summary.unwrap().total, 3);

    // Latest by default.
    assert_eq!(resolve_spec(root, None).unwrap().name, "2026-02-01-billing");
    // Exact directory name.
    assert_eq!(
        resolve_spec(root, Some("2026-01-01-login")).unwrap().name,
        "2026-01-01-login"
    );
    // Slug suffix wins over substring.
    assert_eq!(resolve_spec(root, Some("login")).unwrap().name, "2026-01-01-login");
    assert_eq!(
        resolve_spec(root, Some("Login Audit")).unwrap().name,
        "2026-01-05-login-audit"
    );
    // Substring fallback.
    assert_eq!(resolve_spec(root, Some("bill")).unwrap().name, "2026-02-01-billing");

    assert!(matches!(
        resolve_spec(root, Some("payments")),
        Err(AgentOsError::NotFound(_))
    ));
}

#[test]
fn test_resolve_ambiguous_substring() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    create_spec(root, "User Export", "2026-01-01", false).unwrap();
    create_spec(root, "User Import", "2026-01-02", false).unwrap();
    assert!(matches!(
        resolve_spec(root, Some("user")),
        Err(AgentOsError::ValidationError(_))
    ));
}

#[test]
fn test_resolve_without_specs_is_not_found() {
    let tmp = tempdir().unwrap();
    assert!(matches!(
        resolve_spec(tmp.path(), None),
        Err(AgentOsError::NotFound(_))
    ));
}
