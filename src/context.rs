use std::path::PathBuf;

use crate::config::meta::Scope;
use crate::config::{paths, GlobalConfig, Meta};
use crate::discovery::{load_secret_chain, SecretEnv};
use crate::error::RunError;

/// Resolved invocation context shared by every command: the target
/// environment, the starting directory (project-root resolved) and the
/// global tool configuration.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub env: String,
    pub dir: PathBuf,
    pub env_filename: String,
    pub config: GlobalConfig,
}

impl RunContext {
    pub fn new(
        cible: String,
        path: Option<PathBuf>,
        env_filename: Option<String>,
    ) -> Result<Self, RunError> {
        let start = match path {
            Some(p) => p,
            None => std::env::current_dir()?,
        };
        let dir = paths::resolve_project_root(&start);
        let env_filename = env_filename.unwrap_or_else(|| format!(".env.{}", cible));
        let config = GlobalConfig::load()?;
        Ok(Self {
            env: cible,
            dir,
            env_filename,
            config,
        })
    }

    /// Root used for discovery; configurable, defaults to the current dir.
    pub fn source_root(&self) -> PathBuf {
        self.config
            .source_root
            .clone()
            .unwrap_or_else(|| self.dir.clone())
    }

    /// Descriptor of the current directory; absence is an error here.
    pub fn meta(&self) -> Result<Meta, RunError> {
        Meta::require(&self.dir)
    }

    /// Environment collected by the secret-scope climber, starting at the
    /// current directory.
    pub fn secret_env(&self) -> Result<SecretEnv, RunError> {
        load_secret_chain(&self.dir, &self.env_filename)
    }

    /// Path/namespace segment for a descriptor's scope: the literal
    /// "global" or the target environment.
    pub fn scope_segment<'a>(&'a self, scope: Scope) -> &'a str {
        match scope {
            Scope::Global => "global",
            Scope::Environment => &self.env,
        }
    }
}
