use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No meta.json found in '{}'", dir.display())]
    MetaNotFound { dir: PathBuf },

    #[error("Invalid meta.json in '{}': {message}", dir.display())]
    InvalidMeta { dir: PathBuf, message: String },

    #[error("meta.json in '{}' is missing required field '{field}'", dir.display())]
    MissingMetaField { dir: PathBuf, field: &'static str },

    #[error("Failed to start '{program}': {source}. Is it installed?")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' failed in '{}': {stderr}", dir.display())]
    CommandFailed {
        program: String,
        dir: PathBuf,
        stderr: String,
    },

    #[error("Failed to read env file '{}': {message}", path.display())]
    EnvFile { path: PathBuf, message: String },

    #[error("Environment variable '{0}' is not set")]
    MissingEnv(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RunError {
    fn from(e: serde_json::Error) -> Self {
        RunError::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for RunError {
    fn from(e: serde_yaml::Error) -> Self {
        RunError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for RunError {
    fn from(e: toml::de::Error) -> Self {
        RunError::Config(e.to_string())
    }
}
