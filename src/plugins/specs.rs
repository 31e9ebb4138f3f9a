//! Spec directories under `.agent-os/specs/<YYYY-MM-DD>-<slug>/`.
//!
//! A spec is `spec.md`, `tasks.md` and a `sub-specs/` folder of supporting
//! documents. Directory names sort chronologically, so the last one is the
//! most recent spec.

use crate::core::assets;
use crate::core::error::AgentOsError;
use crate::core::output::{self, OutputFormat};
use crate::core::scaffold::{self, ScaffoldOptions};
use crate::core::time;
use crate::core::workspace::SPECS_DIR;
use crate::plugins::tasks::{self, TaskSummary};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const SPEC_FILE: &str = "spec.md";
pub const SUB_SPECS_DIR: &str = "sub-specs";

#[derive(Debug, Clone, Serialize)]
pub struct SpecEntry {
    pub name: String,
    pub path: PathBuf,
    pub summary: Option<TaskSummary>,
}

pub fn specs_dir(root: &Path) -> PathBuf {
    root.join(SPECS_DIR)
}

/// Lowercase ASCII alphanumerics joined by single dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn is_date_prefix(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit())
}

/// Scaffold a new spec directory and return its path.
pub fn create_spec(
    root: &Path,
    name: &str,
    date: &str,
    dry_run: bool,
) -> Result<PathBuf, AgentOsError> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(AgentOsError::ValidationError(format!(
            "spec name '{}' has no usable characters",
            name
        )));
    }
    if !is_date_prefix(date) {
        return Err(AgentOsError::ValidationError(format!(
            "date '{}' is not YYYY-MM-DD",
            date
        )));
    }
    let dir_name = format!("{}-{}", date, slug);
    let rel_dir = format!("{}/{}", SPECS_DIR, dir_name);
    let spec_dir = root.join(&rel_dir);
    if spec_dir.exists() {
        return Err(AgentOsError::ValidationError(format!(
            "spec already exists: {}",
            spec_dir.display()
        )));
    }

    let opts = ScaffoldOptions {
        target_dir: root.to_path_buf(),
        force: false,
        dry_run,
    };
    let vars = [("name", name), ("date", date), ("dir", dir_name.as_str())];
    for (template, rel) in [
        ("spec.md", SPEC_FILE.to_string()),
        ("tasks.md", tasks::TASKS_FILE.to_string()),
        ("technical-spec.md", format!("{}/technical-spec.md", SUB_SPECS_DIR)),
        ("tests.md", format!("{}/tests.md", SUB_SPECS_DIR)),
    ] {
        let content = assets::render_template(template, &vars)?;
        scaffold::write_file(&opts, &format!("{}/{}", rel_dir, rel), &content)?;
    }
    tracing::info!(spec = %dir_name, dry_run, "spec created");
    Ok(spec_dir)
}

pub fn list_specs(root: &Path) -> Result<Vec<SpecEntry>, AgentOsError> {
    let dir = specs_dir(root);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut specs = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        specs.push(SpecEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            summary: tasks::summarize_spec_dir(&path),
            path,
        });
    }
    specs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(specs)
}

/// Resolve a spec by exact directory name, then by slug suffix, then by
/// substring. `None` selects the most recent spec.
pub fn resolve_spec(root: &Path, query: Option<&str>) -> Result<SpecEntry, AgentOsError> {
    let mut specs = list_specs(root)?;
    if specs.is_empty() {
        return Err(AgentOsError::NotFound(format!(
            "no specs under {}",
            specs_dir(root).display()
        )));
    }
    let Some(query) = query else {
        return specs
            .pop()
            .ok_or_else(|| AgentOsError::NotFound("no specs".to_string()));
    };

    if let Some(pos) = specs.iter().position(|s| s.name == query) {
        return Ok(specs.swap_remove(pos));
    }
    let slug = slugify(query);
    let suffix = format!("-{}", slug);
    let mut matches: Vec<usize> = (0..specs.len())
        .filter(|&i| specs[i].name.ends_with(&suffix))
        .collect();
    if matches.is_empty() && !slug.is_empty() {
        matches = (0..specs.len())
            .filter(|&i| specs[i].name.contains(&slug))
            .collect();
    }
    match matches.as_slice() {
        [] => Err(AgentOsError::NotFound(format!("spec '{}'", query))),
        [only] => Ok(specs.swap_remove(*only)),
        many => Err(AgentOsError::ValidationError(format!(
            "spec '{}' is ambiguous: {}",
            query,
            many.iter()
                .map(|&i| specs[i].name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

pub fn sub_specs(spec_dir: &Path) -> Result<Vec<String>, AgentOsError> {
    let dir = spec_dir.join(SUB_SPECS_DIR);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("md") {
            if let Some(name) = path.file_name() {
                names.push(name.to_string_lossy().to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

fn first_meaningful_line(markdown: &str) -> Option<String> {
    markdown
        .lines()
        .map(str::trim)
        .find(|line| {
            !line.is_empty()
                && !line.starts_with('#')
                && !line.starts_with('>')
                && !line.starts_with('-')
        })
        .map(|s| s.to_string())
}

/// First prose line of `spec.md`, skipping headings, quotes and lists.
pub fn spec_overview(spec_dir: &Path) -> Option<String> {
    fs::read_to_string(spec_dir.join(SPEC_FILE))
        .ok()
        .and_then(|s| first_meaningful_line(&s))
}

#[derive(Parser, Debug)]
#[clap(name = "spec", about = "Create and inspect spec directories.")]
pub struct SpecCli {
    /// Output format for this command group.
    #[clap(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
    #[clap(subcommand)]
    pub command: SpecCommand,
}

#[derive(Subcommand, Debug)]
pub enum SpecCommand {
    /// Scaffold spec.md, tasks.md and sub-specs/ for a new spec.
    Create {
        #[clap(value_name = "NAME")]
        name: String,
        /// Date prefix (YYYY-MM-DD); defaults to today.
        #[clap(long)]
        date: Option<String>,
        /// Show what would be written without touching disk.
        #[clap(long)]
        dry_run: bool,
    },
    /// List specs with task progress.
    List,
    /// Show one spec (defaults to the most recent).
    Show {
        #[clap(value_name = "SPEC")]
        spec: Option<String>,
    },
}

fn summary_text(summary: Option<TaskSummary>) -> String {
    match summary {
        Some(s) => format!(
            "{}/{} {}",
            s.done,
            s.total,
            output::progress_bar(s.percent, 10)
        ),
        None => "no tasks.md".to_string(),
    }
}

pub fn run_spec_cli(root: &Path, cli: SpecCli) -> Result<(), AgentOsError> {
    match cli.command {
        SpecCommand::Create {
            name,
            date,
            dry_run,
        } => {
            let date = date.unwrap_or_else(time::today_ymd);
            let path = create_spec(root, &name, &date, dry_run)?;
            match cli.format {
                OutputFormat::Json => output::print_json(&time::command_envelope(
                    "spec.create",
                    "ok",
                    serde_json::json!({ "path": path, "dry_run": dry_run }),
                )),
                OutputFormat::Text => println!("Spec ready: {}", path.display()),
            }
        }
        SpecCommand::List => {
            let specs = list_specs(root)?;
            match cli.format {
                OutputFormat::Json => output::print_json(&time::command_envelope(
                    "spec.list",
                    "ok",
                    serde_json::json!({ "count": specs.len(), "specs": specs }),
                )),
                OutputFormat::Text => {
                    if specs.is_empty() {
                        println!("No specs yet. Run `agent-os spec create <name>`.");
                    }
                    for spec in &specs {
                        println!("{:<48} {}", spec.name, summary_text(spec.summary));
                    }
                }
            }
        }
        SpecCommand::Show { spec } => {
            let entry = resolve_spec(root, spec.as_deref())?;
            let overview = spec_overview(&entry.path);
            let subs = sub_specs(&entry.path)?;
            match cli.format {
                OutputFormat::Json => output::print_json(&time::command_envelope(
                    "spec.show",
                    "ok",
                    serde_json::json!({
                        "spec": entry,
                        "overview": overview,
                        "sub_specs": subs,
                    }),
                )),
                OutputFormat::Text => {
                    println!("{}", entry.name);
                    println!("  path:     {}", entry.path.display());
                    if let Some(line) = overview {
                        println!("  overview: {}", output::compact_line(&line, 72));
                    }
                    println!("  tasks:    {}", summary_text(entry.summary));
                    if !subs.is_empty() {
                        println!("  sub-specs: {}", subs.join(", "));
                    }
                }
            }
        }
    }
    Ok(())
}
