//! Workspace configuration stored at `.agent-os/config.toml`.
//!
//! Every section is optional; a missing file yields [`Config::default`].
//! Unknown keys are rejected so typos fail loudly instead of being ignored.

use crate::core::error::AgentOsError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const AGENT_OS_DIR: &str = ".agent-os";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParallelConfig {
    /// Map-style fan-out refuses to run when this is false.
    pub enabled: bool,
    /// Worker count for the bounded pool; 0 means one per CPU.
    pub max_workers: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_workers: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Repository directory (relative to the workspace root) holding canonical files.
    pub source: String,
    /// Directories, relative to each repository, that are mirrored.
    pub dirs: Vec<String>,
    /// Repository directory names never used as sync targets.
    pub exclude: Vec<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source: "agent-os".to_string(),
            dirs: vec![".claude/commands".to_string()],
            exclude: Vec::new(),
        }
    }
}

impl SyncConfig {
    /// Each `dirs` entry must be a non-empty relative path that stays inside the repository.
    pub fn validate(&self) -> Result<(), AgentOsError> {
        for dir in &self.dirs {
            let escapes = Path::new(dir)
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
            if dir.trim().is_empty() || escapes {
                return Err(AgentOsError::ConfigError(format!(
                    "sync.dirs entry '{}' must be a relative path inside the repository",
                    dir
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommandsConfig {
    pub test: Vec<String>,
    pub project: BTreeMap<String, Vec<String>>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            test: vec!["cargo".to_string(), "test".to_string()],
            project: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExternalConfig {
    pub allowed_bins: Vec<String>,
}

impl Default for ExternalConfig {
    fn default() -> Self {
        Self {
            allowed_bins: ["cargo", "git", "sh", "bash", "npm", "pytest", "python3", "make"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentEntry {
    pub module: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub parallel: ParallelConfig,
    pub sync: SyncConfig,
    pub commands: CommandsConfig,
    pub external: ExternalConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<AgentEntry>,
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(AGENT_OS_DIR).join(CONFIG_FILE)
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, AgentOsError> {
        let cfg: Self = toml::from_str(content)?;
        cfg.sync.validate()?;
        Ok(cfg)
    }

    pub fn to_toml(&self) -> Result<String, AgentOsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load `<root>/.agent-os/config.toml`, defaulting when absent.
    pub fn load(root: &Path) -> Result<Self, AgentOsError> {
        let path = config_path(root);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content).map_err(|e| {
            AgentOsError::ConfigError(format!("{}: {}", path.display(), e))
        })
    }

    pub fn save(&self, root: &Path) -> Result<(), AgentOsError> {
        let path = config_path(root);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, self.to_toml()?)?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
    }

    pub fn find_agent(&self, module: &str) -> Option<&AgentEntry> {
        self.agents.iter().find(|a| a.module == module)
    }

    /// Register a module agent; names are unique within a workspace.
    pub fn register_agent(&mut self, module: &str, path: &str) -> Result<(), AgentOsError> {
        if self.find_agent(module).is_some() {
            return Err(AgentOsError::ValidationError(format!(
                "module agent '{}' is already registered",
                module
            )));
        }
        self.agents.push(AgentEntry {
            module: module.to_string(),
            path: path.to_string(),
        });
        Ok(())
    }
}
