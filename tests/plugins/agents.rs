use agentos::core::config::Config;
use agentos::core::error::AgentOsError;
use agentos::core::workspace::init_workspace;
use agentos::plugins::agents::{create_agent, list_agents};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_create_agent_scaffolds_and_registers() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    init_workspace(root, false, false).unwrap();
    let mut cfg = Config::load(root).unwrap();

    let entry = create_agent(root, &mut cfg, "Billing Core", false).unwrap();
    assert_eq!(entry.module, "billing-core");
    assert_eq!(entry.path, ".agent-os/agents/billing-core");

    let agent_md = fs::read_to_string(root.join(".agent-os/agents/billing-core/agent.md")).unwrap();
    assert!(agent_md.contains("# Module Agent: billing-core"));

    let reloaded = Config::load(root).unwrap();
    assert_eq!(reloaded.agents.len(), 1);
    assert_eq!(reloaded.agents[0].module, "billing-core");
}

#[test]
fn test_duplicate_module_is_rejected() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    let mut cfg = Config::default();
    create_agent(root, &mut cfg, "search", false).unwrap();

    let err = create_agent(root, &mut cfg, "Search", false).unwrap_err();
    assert!(matches!(err, AgentOsError::ValidationError(_)));
    assert_eq!(Config::load(root).unwrap().agents.len(), 1);
}

#[test]
fn test_dry_run_leaves_disk_untouched() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    let mut cfg = Config::default();
    create_agent(root, &mut cfg, "payments", true).unwrap();
    assert!(!root.join(".agent-os/agents/payments").exists());
    assert!(!root.join(".agent-os/config.toml").exists());
}

#[test]
fn test_list_agents_sorted() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    let mut cfg = Config::default();
    create_agent(root, &mut cfg, "zeta", false).unwrap();
    create_agent(root, &mut cfg, "alpha", false).unwrap();
    let names: Vec<String> = list_agents(&cfg).into_iter().map(|a| a.module).collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
}
