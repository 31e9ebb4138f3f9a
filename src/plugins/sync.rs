//! Mirror command files from the source repository into every sibling repo.
//!
//! Each (target repo, file) pair is an independent job run on the bounded
//! worker pool. A failed job is reported and the rest keep going.

use crate::core::config::Config;
use crate::core::error::AgentOsError;
use crate::core::output::{self, OutputFormat};
use crate::core::parallel;
use crate::core::time;
use crate::core::tui::{self, ItemStatus};
use crate::core::workspace;
use clap::Parser;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncJob {
    pub repo: String,
    /// Path relative to the repository root.
    pub rel_path: PathBuf,
    pub source: PathBuf,
    pub dest: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Created,
    Updated,
    Unchanged,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncResult {
    pub repo: String,
    pub path: String,
    pub status: SyncStatus,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub dry_run: bool,
    pub results: Vec<SyncResult>,
}

impl SyncReport {
    pub fn count(&self, status: SyncStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn failures(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| r.status == SyncStatus::Failed)
            .map(|r| {
                format!(
                    "{}/{}: {}",
                    r.repo,
                    r.path,
                    r.error.as_deref().unwrap_or("unknown error")
                )
            })
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.count(SyncStatus::Failed) > 0
    }
}

pub fn source_repo(root: &Path, cfg: &Config) -> Result<PathBuf, AgentOsError> {
    let source = root.join(&cfg.sync.source);
    if !source.is_dir() {
        return Err(AgentOsError::NotFound(format!(
            "sync source repository {}",
            source.display()
        )));
    }
    Ok(source)
}

/// Files under `dir`, relative to `base`. Symlinked directories are not descended.
fn collect_files(base: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), AgentOsError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(base, &path, out)?;
        } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            let rel = path
                .strip_prefix(base)
                .map_err(|e| AgentOsError::PathError(format!("{}: {}", path.display(), e)))?;
            out.push(rel.to_path_buf());
        } else if file_type.is_symlink() {
            tracing::warn!(path = %path.display(), "skipping symlink that is not a file");
        }
    }
    Ok(())
}

pub fn plan_sync(root: &Path, cfg: &Config) -> Result<Vec<SyncJob>, AgentOsError> {
    cfg.sync.validate()?;
    let source = source_repo(root, cfg)?;
    let mut exclude = cfg.sync.exclude.clone();
    if let Some(name) = source.file_name() {
        exclude.push(name.to_string_lossy().to_string());
    }
    let targets: Vec<PathBuf> = workspace::discover_repos(root, &exclude)?
        .into_iter()
        .filter(|t| t != &source)
        .collect();

    let mut files = Vec::new();
    for dir in &cfg.sync.dirs {
        let abs = source.join(dir);
        if !abs.is_dir() {
            tracing::warn!(dir = %abs.display(), "sync directory missing in source, skipping");
            continue;
        }
        collect_files(&source, &abs, &mut files)?;
    }
    files.sort();
    files.dedup();

    let mut jobs = Vec::with_capacity(targets.len() * files.len());
    for target in &targets {
        let repo = target
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| target.display().to_string());
        for rel in &files {
            jobs.push(SyncJob {
                repo: repo.clone(),
                rel_path: rel.clone(),
                source: source.join(rel),
                dest: target.join(rel),
            });
        }
    }
    Ok(jobs)
}

pub fn sha256_file(path: &Path) -> Result<String, AgentOsError> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

fn apply_job(job: &SyncJob, dry_run: bool) -> Result<SyncStatus, AgentOsError> {
    let status = if job.dest.exists() {
        if sha256_file(&job.source)? == sha256_file(&job.dest)? {
            return Ok(SyncStatus::Unchanged);
        }
        SyncStatus::Updated
    } else {
        SyncStatus::Created
    };
    if !dry_run {
        if let Some(parent) = job.dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&job.source, &job.dest)?;
    }
    Ok(status)
}

pub fn sync_one(job: &SyncJob, dry_run: bool) -> SyncResult {
    let path = job.rel_path.to_string_lossy().to_string();
    match apply_job(job, dry_run) {
        Ok(status) => {
            tracing::debug!(repo = %job.repo, path = %path, ?status, "synced");
            SyncResult {
                repo: job.repo.clone(),
                path,
                status,
                error: None,
            }
        }
        Err(e) => {
            tracing::warn!(repo = %job.repo, path = %path, error = %e, "sync failed, continuing");
            SyncResult {
                repo: job.repo.clone(),
                path,
                status: SyncStatus::Failed,
                error: Some(e.to_string()),
            }
        }
    }
}

pub fn run_sync(root: &Path, cfg: &Config, dry_run: bool) -> Result<SyncReport, AgentOsError> {
    parallel::ensure_parallel(&cfg.parallel)?;
    let jobs = plan_sync(root, cfg)?;
    tracing::info!(jobs = jobs.len(), dry_run, "sync planned");
    let results = parallel::par_map(&cfg.parallel, jobs, |job| sync_one(&job, dry_run))?;
    Ok(SyncReport { dry_run, results })
}

#[derive(Parser, Debug)]
#[clap(name = "sync", about = "Copy command files from the source repo into every workspace repo.")]
pub struct SyncCli {
    #[clap(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
    /// Report what would change without copying.
    #[clap(long)]
    pub dry_run: bool,
}

fn status_icon(status: SyncStatus) -> ItemStatus {
    match status {
        SyncStatus::Created => ItemStatus::Created,
        SyncStatus::Updated => ItemStatus::Updated,
        SyncStatus::Unchanged => ItemStatus::Unchanged,
        SyncStatus::Failed => ItemStatus::Failed,
    }
}

pub fn run_sync_cli(root: &Path, cfg: &Config, cli: SyncCli) -> Result<(), AgentOsError> {
    let report = run_sync(root, cfg, cli.dry_run)?;
    match cli.format {
        OutputFormat::Json => output::print_json(&time::command_envelope(
            "sync",
            if report.has_failures() { "error" } else { "ok" },
            serde_json::json!({
                "dry_run": report.dry_run,
                "created": report.count(SyncStatus::Created),
                "updated": report.count(SyncStatus::Updated),
                "unchanged": report.count(SyncStatus::Unchanged),
                "failed": report.count(SyncStatus::Failed),
                "results": report.results,
            }),
        )),
        OutputFormat::Text => {
            let mut current_repo = "";
            for r in &report.results {
                if r.status == SyncStatus::Unchanged {
                    continue;
                }
                if r.repo != current_repo {
                    tui::print_section(&r.repo);
                    current_repo = r.repo.as_str();
                }
                tui::print_status_line(&r.path, status_icon(r.status), 0);
            }
            let failed = report.count(SyncStatus::Failed);
            tui::print_summary(
                if report.dry_run { "sync (dry run)" } else { "sync" },
                report.results.len() - failed,
                failed,
            );
        }
    }
    if report.has_failures() {
        return Err(AgentOsError::ValidationError(format!(
            "{} sync job(s) failed: {}",
            report.count(SyncStatus::Failed),
            output::preview_messages(&report.failures(), 3, 120)
        )));
    }
    Ok(())
}
