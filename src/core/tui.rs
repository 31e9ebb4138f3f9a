//! Terminal status rendering: icons and coloured one-line results.

use colored::{ColoredString, Colorize};
use std::env;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemStatus {
    Created,
    Updated,
    Unchanged,
    Failed,
    Done,
    Open,
}

impl ItemStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            ItemStatus::Created => "✨",
            ItemStatus::Updated => "🔄",
            ItemStatus::Unchanged => "➖",
            ItemStatus::Failed => "💥",
            ItemStatus::Done => "✅",
            ItemStatus::Open => "⬜",
        }
    }

    fn paint(&self, text: &str) -> ColoredString {
        match self {
            ItemStatus::Created | ItemStatus::Done => text.bright_green(),
            ItemStatus::Updated => text.bright_yellow(),
            ItemStatus::Unchanged | ItemStatus::Open => text.bright_black(),
            ItemStatus::Failed => text.bright_red(),
        }
    }
}

pub fn terminal_width() -> usize {
    env::var("TERM_WIDTH")
        .ok()
        .and_then(|w| w.parse().ok())
        .or_else(|| env::var("COLUMNS").ok().and_then(|c| c.parse().ok()))
        .unwrap_or(80)
}

pub fn print_section(title: &str) {
    println!();
    println!("{}", title.bold());
}

/// Single status line, `depth` levels of two-space indentation.
pub fn print_status_line(message: &str, status: ItemStatus, depth: usize) {
    let indent_s = " ".repeat(2 + depth * 2);
    println!(
        "{}{} {}",
        indent_s,
        status.paint(status.icon()),
        message.bright_white()
    );
}

pub fn print_summary(label: &str, ok: usize, failed: usize) {
    let total = ok + failed;
    if failed == 0 {
        println!(
            "\n{} {} {}/{}",
            "✅".bright_green(),
            label.bold(),
            ok,
            total
        );
    } else {
        println!(
            "\n{} {} {}/{} ({} failed)",
            "❌".bright_red(),
            label.bold(),
            ok,
            total,
            failed.to_string().bright_red()
        );
    }
}
