//! `test` and `project` wrappers: resolve a configured command line, append
//! the caller's trailing arguments, and forward through the external broker.

use crate::core::config::Config;
use crate::core::error::AgentOsError;
use crate::core::external_action::{self, ExternalCapability, Invocation};
use crate::core::workspace;
use clap::Parser;
use std::path::Path;

pub fn test_invocation(
    cfg: &Config,
    cwd: &Path,
    extra_args: &[String],
) -> Result<Invocation, AgentOsError> {
    Invocation::from_argv(
        ExternalCapability::TestExec,
        "test",
        &cfg.commands.test,
        extra_args,
        cwd,
    )
}

pub fn project_invocation(
    cfg: &Config,
    cwd: &Path,
    name: &str,
    extra_args: &[String],
) -> Result<Invocation, AgentOsError> {
    let argv = cfg.commands.project.get(name).ok_or_else(|| {
        let known: Vec<&str> = cfg.commands.project.keys().map(String::as_str).collect();
        AgentOsError::NotFound(format!(
            "project command '{}' (configured: {})",
            name,
            if known.is_empty() {
                "none".to_string()
            } else {
                known.join(", ")
            }
        ))
    })?;
    Invocation::from_argv(
        ExternalCapability::ScriptExec,
        &format!("project.{}", name),
        argv,
        extra_args,
        cwd,
    )
}

#[derive(Parser, Debug)]
#[clap(name = "test", about = "Run the configured test command.")]
pub struct TestCli {
    /// Print the forwarded command line instead of running it.
    #[clap(long)]
    pub print: bool,
    /// Arguments appended to the configured command.
    #[clap(last = true)]
    pub args: Vec<String>,
}

#[derive(Parser, Debug)]
#[clap(name = "project", about = "Run a named project command from config.")]
pub struct ProjectCli {
    #[clap(value_name = "NAME")]
    pub name: Option<String>,
    /// Print the forwarded command line instead of running it.
    #[clap(long)]
    pub print: bool,
    #[clap(last = true)]
    pub args: Vec<String>,
}

/// Run or print `invocation`; returns the exit code to propagate.
fn forward(root: &Path, cfg: &Config, invocation: &Invocation, print: bool) -> Result<i32, AgentOsError> {
    if print {
        println!("{}", invocation.argv().join(" "));
        return Ok(0);
    }
    let outcome = external_action::execute(&workspace::data_dir(root), &cfg.external, invocation)?;
    if !outcome.success {
        tracing::warn!(scope = %invocation.scope, exit_code = ?outcome.exit_code, "forwarded command failed");
    }
    Ok(outcome.exit_code.unwrap_or(1))
}

pub fn run_test_cli(root: &Path, cwd: &Path, cfg: &Config, cli: TestCli) -> Result<i32, AgentOsError> {
    let invocation = test_invocation(cfg, cwd, &cli.args)?;
    forward(root, cfg, &invocation, cli.print)
}

pub fn run_project_cli(
    root: &Path,
    cwd: &Path,
    cfg: &Config,
    cli: ProjectCli,
) -> Result<i32, AgentOsError> {
    let Some(name) = cli.name else {
        if cfg.commands.project.is_empty() {
            println!("No project commands configured in [commands.project].");
        }
        for (name, argv) in &cfg.commands.project {
            println!("{:<16} {}", name, argv.join(" "));
        }
        return Ok(0);
    };
    let invocation = project_invocation(cfg, cwd, &name, &cli.args)?;
    forward(root, cfg, &invocation, cli.print)
}
