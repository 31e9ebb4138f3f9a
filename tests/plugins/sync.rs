use agentos::core::config::Config;
use agentos::core::error::AgentOsError;
use agentos::plugins::sync::{SyncStatus, plan_sync, run_sync, sha256_file};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn make_repo(root: &Path, name: &str) {
    fs::create_dir_all(root.join(name).join(".git")).unwrap();
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Workspace with a source repo holding two command files and three targets.
fn workspace() -> (tempfile::TempDir, Config) {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join(".agent-os")).unwrap();
    make_repo(root, "agent-os");
    make_repo(root, "api");
    make_repo(root, "web");
    make_repo(root, "worker");
    fs::create_dir_all(root.join("not-a-repo")).unwrap();

    write(&root.join("agent-os/.claude/commands/plan.md"), "# plan\n");
    write(&root.join("agent-os/.claude/commands/nested/review.md"), "# review\n");

    let mut cfg = Config::default();
    cfg.parallel.max_workers = 3;
    (tmp, cfg)
}

#[test]
fn test_plan_covers_every_target_and_file() {
    let (tmp, cfg) = workspace();
    let jobs = plan_sync(tmp.path(), &cfg).unwrap();
    assert_eq!(jobs.len(), 6);

    let repos: std::collections::BTreeSet<&str> = jobs.iter().map(|j| j.repo.as_str()).collect();
    assert_eq!(repos.into_iter().collect::<Vec<_>>(), vec!["api", "web", "worker"]);
    assert!(jobs.iter().all(|j| j.source.starts_with(tmp.path().join("agent-os"))));
    assert!(
        jobs.iter()
            .any(|j| j.rel_path == Path::new(".claude/commands/nested/review.md"))
    );
}

#[test]
fn test_exclude_skips_targets() {
    let (tmp, mut cfg) = workspace();
    cfg.sync.exclude = vec!["web".to_string()];
    let jobs = plan_sync(tmp.path(), &cfg).unwrap();
    assert_eq!(jobs.len(), 4);
    assert!(jobs.iter().all(|j| j.repo != "web"));
}

#[test]
fn test_sync_creates_then_reports_unchanged() {
    let (tmp, cfg) = workspace();
    let root = tmp.path();

    let first = run_sync(root, &cfg, false).unwrap();
    assert_eq!(first.count(SyncStatus::Created), 6);
    assert!(!first.has_failures());
    assert_eq!(
        fs::read_to_string(root.join("web/.claude/commands/nested/review.md")).unwrap(),
        "# review\n"
    );

    let second = run_sync(root, &cfg, false).unwrap();
    assert_eq!(second.count(SyncStatus::Unchanged), 6);
}

#[test]
fn test_sync_updates_changed_files() {
    let (tmp, cfg) = workspace();
    let root = tmp.path();
    write(&root.join("api/.claude/commands/plan.md"), "# stale\n");

    let report = run_sync(root, &cfg, false).unwrap();
    let api_plan = report
        .results
        .iter()
        .find(|r| r.repo == "api" && r.path.ends_with("plan.md"))
        .unwrap();
    assert_eq!(api_plan.status, SyncStatus::Updated);
    assert_eq!(
        sha256_file(&root.join("api/.claude/commands/plan.md")).unwrap(),
        sha256_file(&root.join("agent-os/.claude/commands/plan.md")).unwrap()
    );
}

#[test]
fn test_dry_run_copies_nothing() {
    let (tmp, cfg) = workspace();
    let root = tmp.path();
    let report = run_sync(root, &cfg, true).unwrap();
    assert!(report.dry_run);
    assert_eq!(report.count(SyncStatus::Created), 6);
    assert!(!root.join("api/.claude").exists());
}

#[test]
fn test_one_failure_does_not_stop_other_jobs() {
    let (tmp, cfg) = workspace();
    let root = tmp.path();
    // A directory where a file should go makes that single job fail.
    fs::create_dir_all(root.join("worker/.claude/commands/plan.md")).unwrap();

    let report = run_sync(root, &cfg, false).unwrap();
    assert_eq!(report.count(SyncStatus::Failed), 1);
    assert_eq!(report.count(SyncStatus::Created), 5);
    assert!(report.failures()[0].starts_with("worker/"));
    assert!(root.join("worker/.claude/commands/nested/review.md").is_file());
}

#[test]
fn test_parallelism_is_mandatory() {
    let (tmp, mut cfg) = workspace();
    cfg.parallel.enabled = false;
    let err = run_sync(tmp.path(), &cfg, false).unwrap_err();
    assert!(matches!(err, AgentOsError::ValidationError(_)));
}

#[test]
fn test_missing_source_is_not_found() {
    let (tmp, mut cfg) = workspace();
    cfg.sync.source = "does-not-exist".to_string();
    assert!(matches!(
        plan_sync(tmp.path(), &cfg),
        Err(AgentOsError::NotFound(_))
    ));
}

#[cfg(unix)]
#[test]
fn test_symlinked_directories_are_not_followed() {
    let (tmp, mut cfg) = workspace();
    let root = tmp.path();
    fs::remove_dir_all(root.join("agent-os/.claude/commands/nested")).unwrap();
    std::os::unix::fs::symlink("..", root.join("agent-os/.claude/commands/loop")).unwrap();
    std::os::unix::fs::symlink("plan.md", root.join("agent-os/.claude/commands/alias.md"))
        .unwrap();
    cfg.sync.exclude = vec!["web".to_string(), "worker".to_string()];

    let jobs = plan_sync(root, &cfg).unwrap();
    let paths: Vec<&Path> = jobs.iter().map(|j| j.rel_path.as_path()).collect();
    assert_eq!(
        paths,
        vec![
            Path::new(".claude/commands/alias.md"),
            Path::new(".claude/commands/plan.md"),
        ]
    );
}

#[test]
fn test_sync_dirs_outside_the_repo_are_rejected() {
    let (tmp, mut cfg) = workspace();
    for bad in ["../escape", "/abs/commands"] {
        cfg.sync.dirs = vec![bad.to_string()];
        assert!(
            matches!(plan_sync(tmp.path(), &cfg), Err(AgentOsError::ConfigError(_))),
            "{}",
            bad
        );
    }
}
