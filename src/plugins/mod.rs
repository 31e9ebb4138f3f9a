//! Command groups. Each module owns its clap types and a `run_*_cli` entry.

pub mod agents;
pub mod runner;
pub mod specs;
pub mod sync;
pub mod tasks;
