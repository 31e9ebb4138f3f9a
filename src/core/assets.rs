//! Scaffold templates compiled into the binary.
//!
//! Files live under `templates/` in the crate root. Placeholders use the
//! `{{key}}` form and are substituted verbatim; there is no other syntax.

use crate::core::error::AgentOsError;
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "templates/"]
#[include = "*.md"]
#[include = "*.toml"]
struct Templates;

pub fn get_template(name: &str) -> Option<String> {
    Templates::get(name).map(|f| String::from_utf8_lossy(&f.data).into_owned())
}

pub fn list_templates() -> Vec<String> {
    let mut names: Vec<String> = Templates::iter().map(|n| n.into_owned()).collect();
    names.sort();
    names
}

/// Look up `name` and substitute each `{{key}}` with its value.
pub fn render_template(name: &str, vars: &[(&str, &str)]) -> Result<String, AgentOsError> {
    let mut out = get_template(name)
        .ok_or_else(|| AgentOsError::NotFound(format!("embedded template '{}'", name)))?;
    for (key, value) in vars {
        out = out.replace(&format!("{{{{{}}}}}", key), value);
    }
    Ok(out)
}
