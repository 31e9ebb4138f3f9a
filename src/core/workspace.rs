//! Workspace discovery: the `.agent-os` root and the repositories beside it.

use crate::core::assets;
use crate::core::config::{self, AGENT_OS_DIR};
use crate::core::error::AgentOsError;
use crate::core::scaffold::{self, ScaffoldOptions};
use std::fs;
use std::path::{Path, PathBuf};

pub const SPECS_DIR: &str = ".agent-os/specs";
pub const AGENTS_DIR: &str = ".agent-os/agents";
pub const DATA_DIR: &str = ".agent-os/data";

/// Nearest ancestor of `start_dir` (inclusive) that contains `.agent-os/`.
pub fn find_workspace_root(start_dir: &Path) -> Result<PathBuf, AgentOsError> {
    let mut current_dir = PathBuf::from(start_dir);
    loop {
        if current_dir.join(AGENT_OS_DIR).is_dir() {
            return Ok(current_dir);
        }
        if !current_dir.pop() {
            return Err(AgentOsError::NotFound(
                "'.agent-os' directory not found in current or parent directories. Run `agent-os init` first.".to_string(),
            ));
        }
    }
}

pub fn data_dir(root: &Path) -> PathBuf {
    root.join(DATA_DIR)
}

/// Immediate children of `root` that are git repositories, sorted by name.
pub fn discover_repos(root: &Path, exclude: &[String]) -> Result<Vec<PathBuf>, AgentOsError> {
    let mut repos = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() || !path.join(".git").exists() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if exclude.iter().any(|e| e == &name) {
            tracing::debug!(repo = %name, "excluded from discovery");
            continue;
        }
        repos.push(path);
    }
    repos.sort();
    Ok(repos)
}

/// Create `.agent-os/{specs,agents,data}` and a default `config.toml`.
pub fn init_workspace(root: &Path, force: bool, dry_run: bool) -> Result<(), AgentOsError> {
    let opts = ScaffoldOptions {
        target_dir: root.to_path_buf(),
        force,
        dry_run,
    };
    println!("Initializing Agent OS workspace in {}", root.display());
    for dir in [SPECS_DIR, AGENTS_DIR, DATA_DIR] {
        scaffold::create_dir(&opts, dir)?;
    }

    let rel_config = format!("{}/{}", AGENT_OS_DIR, config::CONFIG_FILE);
    let template = assets::render_template("config.toml", &[])?;
    if config::config_path(root).exists() && !force {
        println!("  exists: {}", rel_config);
        return Ok(());
    }
    scaffold::write_file(&opts, &rel_config, &template)?;
    Ok(())
}
