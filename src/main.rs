use anyhow::Context;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let code = agentos::run().context("agent-os failed")?;
    Ok(ExitCode::from(code.clamp(0, 255) as u8))
}
