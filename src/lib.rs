//! Agent OS: developer automation for a workspace of many git repositories.
//!
//! The workspace root is the directory holding `.agent-os/`. Under it live
//! specs (`.agent-os/specs/<date>-<slug>/` with `spec.md`, `tasks.md` and
//! `sub-specs/`), module agent scaffolds, the optional `config.toml`, and
//! the external-action event log.
//!
//! # Commands
//!
//! - `spec`: create, list and show spec directories
//! - `task`: check, uncheck, add and list `tasks.md` checkboxes
//! - `sync`: copy command files from the source repo into every other repo
//! - `agent`: scaffold and register module agents
//! - `test` / `project`: forward to configured commands
//!
//! # Examples
//!
//! ```bash
//! agent-os init
//! agent-os spec create "Password reset"
//! agent-os task done 1.1
//! agent-os sync --dry-run
//! agent-os test -- --nocapture
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: configuration, workspace discovery, subprocess broker, parallel map
//! - [`plugins`]: command group implementations

pub mod core;
pub mod plugins;

mod cli;

use cli::{Cli, Command};
use crate::core::config::Config;
use crate::core::error::AgentOsError;
use crate::core::{logging, workspace};
use crate::plugins::{agents, runner, specs, sync, tasks};

use clap::Parser;
use std::path::{Path, PathBuf};

/// Locate the enclosing workspace and load its configuration.
fn open_workspace(cwd: &Path) -> Result<(PathBuf, Config), AgentOsError> {
    let root = workspace::find_workspace_root(cwd)?;
    tracing::debug!(root = %root.display(), "workspace root");
    let config = Config::load(&root)?;
    Ok((root, config))
}

fn dispatch(cwd: &Path, command: Command) -> Result<i32, AgentOsError> {
    match command {
        Command::Version => println!("v{}", env!("CARGO_PKG_VERSION")),
        Command::Init(init) => {
            let dir = init.dir.unwrap_or_else(|| cwd.to_path_buf());
            workspace::init_workspace(&dir, init.force, init.dry_run)?;
        }
        Command::Spec(cli) => {
            let (root, _) = open_workspace(cwd)?;
            specs::run_spec_cli(&root, cli)?;
        }
        Command::Task(cli) => {
            let (root, _) = open_workspace(cwd)?;
            tasks::run_task_cli(&root, cli)?;
        }
        Command::Sync(cli) => {
            let (root, config) = open_workspace(cwd)?;
            sync::run_sync_cli(&root, &config, cli)?;
        }
        Command::Agent(cli) => {
            let (root, mut config) = open_workspace(cwd)?;
            agents::run_agent_cli(&root, &mut config, cli)?;
        }
        Command::Test(cli) => {
            let (root, config) = open_workspace(cwd)?;
            return runner::run_test_cli(&root, cwd, &config, cli);
        }
        Command::Project(cli) => {
            let (root, config) = open_workspace(cwd)?;
            return runner::run_project_cli(&root, cwd, &config, cli);
        }
    }
    Ok(0)
}

/// Parse the command line and run it. Returns the process exit code.
pub fn run() -> Result<i32, AgentOsError> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let current_dir = std::env::current_dir()?;
    dispatch(&current_dir, cli.command)
}
