//! File scaffolding shared by `init`, `spec create` and `agent create`.
//!
//! Writes refuse to clobber existing files unless `force` is set, and
//! `dry_run` only reports what would happen.

use crate::core::error::AgentOsError;
use std::fs;
use std::path::{Path, PathBuf};

pub struct ScaffoldOptions {
    /// Directory every relative path is resolved against.
    pub target_dir: PathBuf,
    pub force: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    WouldWrite,
    WouldSkip,
}

fn ensure_parent(path: &Path) -> Result<(), AgentOsError> {
    if let Some(p) = path.parent() {
        fs::create_dir_all(p)?;
    }
    Ok(())
}

pub fn write_file(
    opts: &ScaffoldOptions,
    rel_path: &str,
    content: &str,
) -> Result<WriteOutcome, AgentOsError> {
    let dest = opts.target_dir.join(rel_path);

    if dest.exists() && !opts.force {
        if opts.dry_run {
            println!(
                "  would-skip: {} (exists; pass --force to overwrite)",
                dest.display()
            );
            return Ok(WriteOutcome::WouldSkip);
        }
        return Err(AgentOsError::ValidationError(format!(
            "Refusing to overwrite existing path without --force: {}",
            dest.display()
        )));
    }

    if opts.dry_run {
        println!("  would-write: {}", dest.display());
        return Ok(WriteOutcome::WouldWrite);
    }

    ensure_parent(&dest)?;
    fs::write(&dest, content)?;
    println!("  wrote: {}", dest.display());
    Ok(WriteOutcome::Written)
}

pub fn create_dir(opts: &ScaffoldOptions, rel_path: &str) -> Result<(), AgentOsError> {
    let dest = opts.target_dir.join(rel_path);
    if opts.dry_run {
        if !dest.exists() {
            println!("  would-create: {}/", dest.display());
        }
        return Ok(());
    }
    fs::create_dir_all(&dest)?;
    Ok(())
}
