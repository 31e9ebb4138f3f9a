//! Capability-scoped broker for the commands Agent OS forwards to.
//!
//! Every forwarded program must appear in `[external] allowed_bins`; each
//! run is appended to `.agent-os/data/external_actions.events.jsonl`.

use crate::core::config::ExternalConfig;
use crate::core::error::AgentOsError;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExternalCapability {
    TestExec,
    ScriptExec,
}

impl ExternalCapability {
    pub fn as_str(self) -> &'static str {
        match self {
            ExternalCapability::TestExec => "test_exec",
            ExternalCapability::ScriptExec => "script_exec",
        }
    }
}

/// A fully resolved command line, built before anything is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub capability: ExternalCapability,
    pub scope: String,
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    /// Build from a configured argv (`["cargo", "test"]`) plus trailing args.
    pub fn from_argv(
        capability: ExternalCapability,
        scope: &str,
        argv: &[String],
        extra_args: &[String],
        cwd: &Path,
    ) -> Result<Self, AgentOsError> {
        let (program, rest) = argv.split_first().ok_or_else(|| {
            AgentOsError::ConfigError(format!("command for '{}' is empty", scope))
        })?;
        let mut args = rest.to_vec();
        args.extend(extra_args.iter().cloned());
        Ok(Self {
            capability,
            scope: scope.to_string(),
            program: program.clone(),
            args,
            cwd: cwd.to_path_buf(),
        })
    }

    pub fn argv(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.args.len() + 1);
        out.push(self.program.clone());
        out.extend(self.args.iter().cloned());
        out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ExternalActionEvent {
    ts: String,
    event_id: String,
    capability: String,
    scope: String,
    command: String,
    args: Vec<String>,
    cwd: String,
    status: String,
    exit_code: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
}

fn command_bin(command: &str) -> String {
    Path::new(command)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| command.to_string())
}

pub fn check_allowed(config: &ExternalConfig, invocation: &Invocation) -> Result<(), AgentOsError> {
    let bin = command_bin(&invocation.program);
    if config.allowed_bins.iter().any(|b| b == &bin) {
        return Ok(());
    }
    Err(AgentOsError::ExternalError(format!(
        "capability '{}' does not allow binary '{}'; add it to [external] allowed_bins",
        invocation.capability.as_str(),
        bin
    )))
}

pub fn events_path(data_dir: &Path) -> PathBuf {
    data_dir.join("external_actions.events.jsonl")
}

fn log_event(data_dir: &Path, event: &ExternalActionEvent) -> Result<(), AgentOsError> {
    fs::create_dir_all(data_dir)?;
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(events_path(data_dir))?;
    writeln!(f, "{}", serde_json::to_string(event)?)?;
    Ok(())
}

/// Run `invocation` with inherited stdio and record the outcome.
pub fn execute(
    data_dir: &Path,
    config: &ExternalConfig,
    invocation: &Invocation,
) -> Result<ActionOutcome, AgentOsError> {
    check_allowed(config, invocation)?;
    tracing::info!(
        scope = %invocation.scope,
        argv = ?invocation.argv(),
        cwd = %invocation.cwd.display(),
        "forwarding"
    );

    let status = Command::new(&invocation.program)
        .args(&invocation.args)
        .current_dir(&invocation.cwd)
        .status()
        .map_err(|e| {
            AgentOsError::ExternalError(format!("failed to spawn '{}': {}", invocation.program, e))
        })?;

    let event = ExternalActionEvent {
        ts: crate::core::time::now_epoch_z(),
        event_id: crate::core::time::new_event_id(),
        capability: invocation.capability.as_str().to_string(),
        scope: invocation.scope.clone(),
        command: invocation.program.clone(),
        args: invocation.args.clone(),
        cwd: invocation.cwd.to_string_lossy().to_string(),
        status: if status.success() {
            "success".to_string()
        } else {
            "error".to_string()
        },
        exit_code: status.code(),
    };
    if let Err(e) = log_event(data_dir, &event) {
        tracing::warn!(error = %e, "could not record external action");
    }

    Ok(ActionOutcome {
        success: status.success(),
        exit_code: status.code(),
    })
}
