//! Module agents: per-module context directories registered in config.
//!
//! An agent is only a scaffold (`.agent-os/agents/<module>/agent.md`) plus a
//! `[[agents]]` entry; nothing executes.

use crate::core::assets;
use crate::core::config::{AgentEntry, Config};
use crate::core::error::AgentOsError;
use crate::core::output::{self, OutputFormat};
use crate::core::scaffold::{self, ScaffoldOptions};
use crate::core::time;
use crate::core::workspace::AGENTS_DIR;
use crate::plugins::specs::slugify;
use clap::{Parser, Subcommand};
use std::path::Path;

pub const AGENT_FILE: &str = "agent.md";

/// Scaffold and register a module agent. The config is saved unless `dry_run`.
pub fn create_agent(
    root: &Path,
    cfg: &mut Config,
    module: &str,
    dry_run: bool,
) -> Result<AgentEntry, AgentOsError> {
    let slug = slugify(module);
    if slug.is_empty() {
        return Err(AgentOsError::ValidationError(format!(
            "module name '{}' has no usable characters",
            module
        )));
    }
    let rel_dir = format!("{}/{}", AGENTS_DIR, slug);
    cfg.register_agent(&slug, &rel_dir)?;

    let opts = ScaffoldOptions {
        target_dir: root.to_path_buf(),
        force: false,
        dry_run,
    };
    let date = time::today_ymd();
    let content = assets::render_template(
        "agent.md",
        &[("module", slug.as_str()), ("date", date.as_str()), ("path", rel_dir.as_str())],
    )?;
    scaffold::write_file(&opts, &format!("{}/{}", rel_dir, AGENT_FILE), &content)?;

    if !dry_run {
        cfg.save(root)?;
    }
    tracing::info!(module = %slug, dry_run, "module agent created");
    Ok(AgentEntry {
        module: slug,
        path: rel_dir,
    })
}

pub fn list_agents(cfg: &Config) -> Vec<AgentEntry> {
    let mut agents = cfg.agents.clone();
    agents.sort_by(|a, b| a.module.cmp(&b.module));
    agents
}

#[derive(Parser, Debug)]
#[clap(name = "agent", about = "Scaffold and list module agents.")]
pub struct AgentCli {
    /// Output format for this command group.
    #[clap(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
    #[clap(subcommand)]
    pub command: AgentCommand,
}

#[derive(Subcommand, Debug)]
pub enum AgentCommand {
    /// Create `.agent-os/agents/<module>/agent.md` and register it.
    Create {
        #[clap(value_name = "MODULE")]
        module: String,
        #[clap(long)]
        dry_run: bool,
    },
    /// List registered module agents.
    List,
}

pub fn run_agent_cli(root: &Path, cfg: &mut Config, cli: AgentCli) -> Result<(), AgentOsError> {
    match cli.command {
        AgentCommand::Create { module, dry_run } => {
            let entry = create_agent(root, cfg, &module, dry_run)?;
            match cli.format {
                OutputFormat::Json => output::print_json(&time::command_envelope(
                    "agent.create",
                    "ok",
                    serde_json::json!({ "agent": { "module": entry.module, "path": entry.path }, "dry_run": dry_run }),
                )),
                OutputFormat::Text => {
                    println!("Module agent '{}' at {}", entry.module, entry.path)
                }
            }
        }
        AgentCommand::List => {
            let agents = list_agents(cfg);
            match cli.format {
                OutputFormat::Json => output::print_json(&time::command_envelope(
                    "agent.list",
                    "ok",
                    serde_json::json!({ "count": agents.len(), "agents": agents }),
                )),
                OutputFormat::Text => {
                    if agents.is_empty() {
                        println!("No module agents registered.");
                    }
                    for a in &agents {
                        let present = root.join(&a.path).join(AGENT_FILE).exists();
                        println!(
                            "{:<24} {}{}",
                            a.module,
                            a.path,
                            if present { "" } else { "  (missing agent.md)" }
                        );
                    }
                }
            }
        }
    }
    Ok(())
}
