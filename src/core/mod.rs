//! Shared primitives: workspace discovery, configuration, the subprocess
//! broker, bounded parallelism and terminal output.

pub mod assets;
pub mod config;
pub mod error;
pub mod external_action;
pub mod logging;
pub mod output;
pub mod parallel;
pub mod scaffold;
pub mod time;
pub mod tui;
pub mod workspace;
