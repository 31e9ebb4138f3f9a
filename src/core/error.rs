use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentOsError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Config error: {0}")]
    ConfigError(String),
    #[error("Path error: {0}")]
    PathError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("External command error: {0}")]
    ExternalError(String),
}

impl From<toml::de::Error> for AgentOsError {
    fn from(err: toml::de::Error) -> Self {
        AgentOsError::ConfigError(err.to_string())
    }
}

impl From<toml::ser::Error> for AgentOsError {
    fn from(err: toml::ser::Error) -> Self {
        AgentOsError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for AgentOsError {
    fn from(err: serde_json::Error) -> Self {
        AgentOsError::ValidationError(format!("JSON error: {}", err))
    }
}
