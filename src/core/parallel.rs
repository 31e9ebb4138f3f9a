//! Bounded fan-out over a rayon pool, gated by the mandatory-parallelism flag.
//!
//! Workers share no mutable state; results come back in input order even
//! though execution order is unspecified.

use crate::core::config::ParallelConfig;
use crate::core::error::AgentOsError;
use rayon::prelude::*;

/// Fails unless `parallel.enabled` is set in the workspace config.
pub fn ensure_parallel(cfg: &ParallelConfig) -> Result<(), AgentOsError> {
    if !cfg.enabled {
        return Err(AgentOsError::ValidationError(
            "parallel execution is mandatory: set [parallel] enabled = true in .agent-os/config.toml"
                .to_string(),
        ));
    }
    Ok(())
}

fn build_pool(cfg: &ParallelConfig) -> Result<rayon::ThreadPool, AgentOsError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.max_workers)
        .thread_name(|i| format!("agent-os-worker-{}", i))
        .build()
        .map_err(|e| AgentOsError::ValidationError(format!("worker pool: {}", e)))
}

pub fn par_map<T, R, F>(cfg: &ParallelConfig, items: Vec<T>, f: F) -> Result<Vec<R>, AgentOsError>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Send + Sync,
{
    ensure_parallel(cfg)?;
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let pool = build_pool(cfg)?;
    tracing::debug!(
        jobs = items.len(),
        workers = pool.current_num_threads(),
        "fan-out"
    );
    Ok(pool.install(|| items.into_par_iter().map(f).collect()))
}
