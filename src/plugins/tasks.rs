//! Checkbox task lists (`tasks.md`) inside spec directories.
//!
//! A task is a list item carrying a checkbox, `- [ ] text` or `- [x] text`.
//! Nesting follows indentation; every task gets a positional number
//! (`1`, `1.1`, `1.2`, `2`, ...) independent of any number written in its text.
//! Everything that is not a checkbox is kept byte-for-byte on rewrite.

use crate::core::error::AgentOsError;
use crate::core::output::{self, OutputFormat};
use crate::core::time;
use crate::core::tui::{self, ItemStatus};
use crate::plugins::specs;
use clap::{Parser, Subcommand};
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const TASKS_FILE: &str = "tasks.md";

fn task_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<indent>[ \t]*)[-*+][ \t]+\[(?P<mark>[ xX])\](?:[ \t]+(?P<text>.*))?$")
            .expect("valid task line regex")
    })
}

/// ATX heading: up to three spaces, one to six `#`, then a space or end of line.
fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^ {0,3}#{1,6}(?:[ \t]|$)").expect("valid heading regex"))
}

fn label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<label>\d+(?:\.\d+)*)\.?(?:\s|$)").expect("valid task label regex")
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskItem {
    /// Zero-based line index in the document.
    pub line: usize,
    #[serde(skip)]
    pub indent: usize,
    pub depth: usize,
    #[serde(skip)]
    pub parent: Option<usize>,
    pub number: String,
    /// Number written at the start of the text (`1.2 Do thing`), if any.
    pub label: Option<String>,
    pub text: String,
    pub done: bool,
    #[serde(skip)]
    mark_offset: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub total: usize,
    pub done: usize,
    pub percent: u8,
}

#[derive(Debug, Clone, Default)]
pub struct TaskList {
    lines: Vec<String>,
    items: Vec<TaskItem>,
}

fn indent_width(indent: &str) -> usize {
    indent.chars().map(|c| if c == '\t' { 4 } else { 1 }).sum()
}

fn leading_ws(line: &str) -> String {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').collect()
}

pub fn parse_tasks(markdown: &str) -> TaskList {
    let lines: Vec<String> = markdown.split('\n').map(str::to_string).collect();
    let mut items: Vec<TaskItem> = Vec::new();
    let mut child_counts: Vec<usize> = Vec::new();
    let mut stack: Vec<usize> = Vec::new();
    let mut root_count = 0usize;
    let mut in_fence = false;

    for (line_no, raw) in lines.iter().enumerate() {
        let line = raw.trim_end_matches('\r');
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if heading_re().is_match(line) {
            // A heading closes any open nesting.
            stack.clear();
            continue;
        }
        let Some(caps) = task_line_re().captures(line) else {
            continue;
        };

        let Some(mark) = caps.name("mark") else {
            continue;
        };
        let indent = indent_width(caps.name("indent").map_or("", |m| m.as_str()));
        while let Some(&top) = stack.last() {
            if items[top].indent >= indent {
                stack.pop();
            } else {
                break;
            }
        }
        let parent = stack.last().copied();
        let number = match parent {
            Some(p) => {
                child_counts[p] += 1;
                format!("{}.{}", items[p].number, child_counts[p])
            }
            None => {
                root_count += 1;
                root_count.to_string()
            }
        };
        let text = caps
            .name("text")
            .map(|m| m.as_str().trim_end().to_string())
            .unwrap_or_default();
        let label = label_re()
            .captures(&text)
            .and_then(|c| c.name("label"))
            .map(|m| m.as_str().to_string());

        items.push(TaskItem {
            line: line_no,
            indent,
            depth: stack.len(),
            parent,
            number,
            label,
            text,
            done: mark.as_str() != " ",
            mark_offset: mark.start(),
        });
        child_counts.push(0);
        stack.push(items.len() - 1);
    }

    TaskList { lines, items }
}

impl TaskList {
    pub fn items(&self) -> &[TaskItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    pub fn summary(&self) -> TaskSummary {
        let total = self.items.len();
        let done = self.items.iter().filter(|i| i.done).count();
        let percent = if total == 0 {
            0
        } else {
            ((done * 100) / total) as u8
        };
        TaskSummary {
            total,
            done,
            percent,
        }
    }

    /// Lookup by positional number first, then by the number written in the text.
    fn position(&self, number: &str) -> Option<usize> {
        let q = number.trim().trim_end_matches('.');
        self.items
            .iter()
            .position(|i| i.number == q)
            .or_else(|| {
                self.items
                    .iter()
                    .position(|i| i.label.as_deref() == Some(q))
            })
    }

    pub fn find(&self, number: &str) -> Option<&TaskItem> {
        self.position(number).map(|i| &self.items[i])
    }

    /// First open task in document order.
    pub fn next_open(&self) -> Option<&TaskItem> {
        self.items.iter().find(|i| !i.done)
    }

    fn children(&self, idx: usize) -> Vec<usize> {
        (idx + 1..self.items.len())
            .filter(|&i| self.items[i].parent == Some(idx))
            .collect()
    }

    fn descendants(&self, idx: usize) -> Vec<usize> {
        let mut out = Vec::new();
        for i in idx + 1..self.items.len() {
            let mut cur = self.items[i].parent;
            let mut inside = false;
            while let Some(p) = cur {
                if p == idx {
                    inside = true;
                    break;
                }
                cur = self.items[p].parent;
            }
            if !inside {
                break;
            }
            out.push(i);
        }
        out
    }

    fn write_mark(&mut self, idx: usize, done: bool) {
        let item = &mut self.items[idx];
        let line = &mut self.lines[item.line];
        let mark = if done { "x" } else { " " };
        line.replace_range(item.mark_offset..item.mark_offset + 1, mark);
        item.done = done;
    }

    /// Check or uncheck a task. Checking cascades to every descendant;
    /// unchecking re-opens every ancestor. Returns the numbers that changed.
    pub fn set_done(&mut self, number: &str, done: bool) -> Result<Vec<String>, AgentOsError> {
        let idx = self
            .position(number)
            .ok_or_else(|| AgentOsError::NotFound(format!("task '{}'", number)))?;

        let mut affected = vec![idx];
        if done {
            affected.extend(self.descendants(idx));
        } else {
            let mut cur = self.items[idx].parent;
            while let Some(p) = cur {
                affected.push(p);
                cur = self.items[p].parent;
            }
        }

        let mut changed = Vec::new();
        for i in affected {
            if self.items[i].done != done {
                self.write_mark(i, done);
                changed.push(self.items[i].number.clone());
            }
        }
        Ok(changed)
    }

    /// Append an open task at the end of `parent`'s block, or at the end of
    /// the list when `parent` is `None`. Returns the new task's number.
    pub fn add_task(&mut self, parent: Option<&str>, text: &str) -> Result<String, AgentOsError> {
        let text = text.trim();
        if text.is_empty() || text.contains('\n') {
            return Err(AgentOsError::ValidationError(
                "task text must be a single non-empty line".to_string(),
            ));
        }
        let labelled = self.items.is_empty() || self.items.iter().any(|i| i.label.is_some());

        let (insert_at, indent, number) = match parent {
            Some(q) => {
                let p = self
                    .position(q)
                    .ok_or_else(|| AgentOsError::NotFound(format!("task '{}'", q)))?;
                let children = self.children(p);
                let block_end = self.descendants(p).last().copied().unwrap_or(p);
                let indent = match children.first() {
                    Some(&c) => leading_ws(&self.lines[self.items[c].line]),
                    None => format!("{}  ", leading_ws(&self.lines[self.items[p].line])),
                };
                let parent_number = self.items[p]
                    .label
                    .as_deref()
                    .unwrap_or(&self.items[p].number);
                let number = format!("{}.{}", parent_number, children.len() + 1);
                (self.items[block_end].line + 1, indent, number)
            }
            None => {
                let roots = self.items.iter().filter(|i| i.parent.is_none()).count();
                match (self.items.iter().find(|i| i.parent.is_none()), self.items.last()) {
                    (Some(first_root), Some(last)) => (
                        last.line + 1,
                        leading_ws(&self.lines[first_root.line]),
                        (roots + 1).to_string(),
                    ),
                    _ => {
                        let at = match self.lines.last() {
                            Some(l) if l.is_empty() => self.lines.len() - 1,
                            _ => self.lines.len(),
                        };
                        (at, String::new(), "1".to_string())
                    }
                }
            }
        };

        let body = match (labelled, parent) {
            (false, _) => text.to_string(),
            (true, None) => format!("{}. {}", number, text),
            (true, Some(_)) => format!("{} {}", number, text),
        };
        let crlf = insert_at
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .or_else(|| self.lines.get(insert_at))
            .is_some_and(|l| l.ends_with('\r'));
        let eol = if crlf { "\r" } else { "" };
        self.lines
            .insert(insert_at, format!("{}- [ ] {}{}", indent, body, eol));
        *self = parse_tasks(&self.render());

        self.items
            .iter()
            .find(|i| i.line == insert_at)
            .map(|i| i.number.clone())
            .ok_or_else(|| AgentOsError::ValidationError("inserted task did not parse".to_string()))
    }
}

pub fn tasks_path(spec_dir: &Path) -> PathBuf {
    spec_dir.join(TASKS_FILE)
}

pub fn load_tasks(path: &Path) -> Result<TaskList, AgentOsError> {
    if !path.exists() {
        return Err(AgentOsError::NotFound(format!("{}", path.display())));
    }
    Ok(parse_tasks(&fs::read_to_string(path)?))
}

pub fn save_tasks(path: &Path, list: &TaskList) -> Result<(), AgentOsError> {
    fs::write(path, list.render())?;
    Ok(())
}

/// Summary for a spec directory, `None` when it has no tasks.md.
pub fn summarize_spec_dir(spec_dir: &Path) -> Option<TaskSummary> {
    let path = tasks_path(spec_dir);
    fs::read_to_string(path)
        .ok()
        .map(|content| parse_tasks(&content).summary())
}

#[derive(Parser, Debug)]
#[clap(name = "task", about = "Track checkbox tasks in a spec's tasks.md.")]
pub struct TaskCli {
    /// Output format for this command group.
    #[clap(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
    #[clap(subcommand)]
    pub command: TaskCommand,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// List tasks with completion status.
    List {
        /// Spec directory name or slug (defaults to the most recent spec).
        #[clap(long)]
        spec: Option<String>,
    },
    /// Show the next open task.
    Next {
        #[clap(long)]
        spec: Option<String>,
    },
    /// Check a task and all of its subtasks.
    Done {
        #[clap(value_name = "NUMBER")]
        number: String,
        #[clap(long)]
        spec: Option<String>,
    },
    /// Uncheck a task and re-open its parents.
    Undo {
        #[clap(value_name = "NUMBER")]
        number: String,
        #[clap(long)]
        spec: Option<String>,
    },
    /// Append a new open task.
    Add {
        #[clap(value_name = "TEXT")]
        text: String,
        /// Number of the parent task; omit for a top-level task.
        #[clap(long)]
        parent: Option<String>,
        #[clap(long)]
        spec: Option<String>,
    },
}

fn print_list(spec_name: &str, list: &TaskList) {
    let summary = list.summary();
    println!(
        "{}  {}/{} ({}%) {}",
        spec_name,
        summary.done,
        summary.total,
        summary.percent,
        output::progress_bar(summary.percent, 20)
    );
    let width = tui::terminal_width().saturating_sub(8);
    for item in list.items() {
        let status = if item.done {
            ItemStatus::Done
        } else {
            ItemStatus::Open
        };
        let text = if item.label.is_some() {
            item.text.clone()
        } else {
            format!("{} {}", item.number, item.text)
        };
        tui::print_status_line(&output::compact_line(&text, width), status, item.depth);
    }
}

fn toggle_task(
    root: &Path,
    format: OutputFormat,
    spec: Option<&str>,
    number: &str,
    done: bool,
) -> Result<(), AgentOsError> {
    let entry = specs::resolve_spec(root, spec)?;
    let path = tasks_path(&entry.path);
    let mut list = load_tasks(&path)?;
    let changed = list.set_done(number, done)?;
    if !changed.is_empty() {
        save_tasks(&path, &list)?;
    }
    tracing::info!(spec = %entry.name, task = %number, done, changed = changed.len(), "task updated");
    let summary = list.summary();
    match format {
        OutputFormat::Json => output::print_json(&time::command_envelope(
            if done { "task.done" } else { "task.undo" },
            "ok",
            serde_json::json!({
                "spec": entry.name,
                "changed": changed,
                "summary": summary,
            }),
        )),
        OutputFormat::Text => println!(
            "{} task(s) updated in {} ({}/{} done)",
            changed.len(),
            entry.name,
            summary.done,
            summary.total
        ),
    }
    Ok(())
}

pub fn run_task_cli(root: &Path, cli: TaskCli) -> Result<(), AgentOsError> {
    let format = cli.format;
    match cli.command {
        TaskCommand::List { spec } => {
            let entry = specs::resolve_spec(root, spec.as_deref())?;
            let list = load_tasks(&tasks_path(&entry.path))?;
            match format {
                OutputFormat::Json => output::print_json(&time::command_envelope(
                    "task.list",
                    "ok",
                    serde_json::json!({
                        "spec": entry.name,
                        "summary": list.summary(),
                        "tasks": list.items(),
                    }),
                )),
                OutputFormat::Text => print_list(&entry.name, &list),
            }
        }
        TaskCommand::Next { spec } => {
            let entry = specs::resolve_spec(root, spec.as_deref())?;
            let list = load_tasks(&tasks_path(&entry.path))?;
            let next = list.next_open();
            match format {
                OutputFormat::Json => output::print_json(&time::command_envelope(
                    "task.next",
                    "ok",
                    serde_json::json!({ "spec": entry.name, "task": next }),
                )),
                OutputFormat::Text => match next {
                    Some(item) => println!("{} {}", item.number, item.text),
                    None => println!("All tasks in {} are complete.", entry.name),
                },
            }
        }
        TaskCommand::Done { number, spec } => {
            toggle_task(root, format, spec.as_deref(), &number, true)?;
        }
        TaskCommand::Undo { number, spec } => {
            toggle_task(root, format, spec.as_deref(), &number, false)?;
        }
        TaskCommand::Add { text, parent, spec } => {
            let entry = specs::resolve_spec(root, spec.as_deref())?;
            let path = tasks_path(&entry.path);
            let mut list = load_tasks(&path)?;
            let number = list.add_task(parent.as_deref(), &text)?;
            save_tasks(&path, &list)?;
            match format {
                OutputFormat::Json => output::print_json(&time::command_envelope(
                    "task.add",
                    "ok",
                    serde_json::json!({ "spec": entry.name, "number": number }),
                )),
                OutputFormat::Text => println!("Added task {} to {}", number, entry.name),
            }
        }
    }
    Ok(())
}
