//! CLI struct definitions for the `agent-os` command line.
//!
//! Each command group's own clap types live beside its implementation in
//! `plugins/`; this file only assembles the top-level tree.

use crate::plugins::{agents, runner, specs, sync, tasks};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "agent-os",
    version = env!("CARGO_PKG_VERSION"),
    about = "Agent OS: specs, tasks, command sync and module agents across a multi-repo workspace."
)]
pub(crate) struct Cli {
    /// Verbose diagnostics on stderr (overridden by AGENT_OS_LOG).
    #[clap(short, long, global = true)]
    pub verbose: bool,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug)]
pub(crate) struct InitCli {
    /// Workspace directory (defaults to current working directory).
    #[clap(short, long)]
    pub dir: Option<PathBuf>,
    /// Overwrite an existing config.toml.
    #[clap(long)]
    pub force: bool,
    /// Show what would change without writing files.
    #[clap(long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Create `.agent-os/` in a workspace
    #[clap(name = "init")]
    Init(InitCli),

    /// Create and inspect specs
    #[clap(name = "spec", visible_alias = "s")]
    Spec(specs::SpecCli),

    /// Track checkbox tasks in tasks.md
    #[clap(name = "task", visible_alias = "t")]
    Task(tasks::TaskCli),

    /// Copy command files across workspace repositories
    #[clap(name = "sync")]
    Sync(sync::SyncCli),

    /// Scaffold module agents
    #[clap(name = "agent")]
    Agent(agents::AgentCli),

    /// Run the configured test command
    #[clap(name = "test")]
    Test(runner::TestCli),

    /// Run a named project command
    #[clap(name = "project", visible_alias = "p")]
    Project(runner::ProjectCli),

    /// Show version information
    #[clap(name = "version")]
    Version,
}
