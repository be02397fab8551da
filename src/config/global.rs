use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::paths;
use crate::error::RunError;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GlobalConfig {
    #[serde(default)]
    pub source_root: Option<PathBuf>,
    #[serde(default)]
    pub docker: DockerConfig,
    #[serde(default)]
    pub terraform: TerraformConfig,
    #[serde(default)]
    pub hasura: HasuraConfig,
    #[serde(default)]
    pub vault: VaultConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DockerConfig {
    #[serde(default = "default_registry")]
    pub registry: String,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            registry: default_registry(),
        }
    }
}

fn default_registry() -> String {
    "ghcr.io".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TerraformConfig {
    pub bucket: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HasuraConfig {
    #[serde(default = "default_hasura_endpoint_env")]
    pub endpoint_env: String,
}

impl Default for HasuraConfig {
    fn default() -> Self {
        Self {
            endpoint_env: default_hasura_endpoint_env(),
        }
    }
}

fn default_hasura_endpoint_env() -> String {
    "HASURA_GRAPHQL_ENDPOINT".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct VaultConfig {
    pub address: Option<String>,
}

impl GlobalConfig {
    pub fn load() -> Result<Self, RunError> {
        let path = paths::global_config_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: GlobalConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(GlobalConfig::default())
        }
    }

    pub fn save(&self) -> Result<(), RunError> {
        let path = paths::global_config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| RunError::Config(e.to_string()))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Terraform backend bucket: config value, overridable by TERRAFORM_BUCKET.
    pub fn terraform_bucket(&self) -> Result<String, RunError> {
        if let Ok(bucket) = std::env::var("TERRAFORM_BUCKET") {
            return Ok(bucket);
        }
        self.terraform
            .bucket
            .clone()
            .ok_or_else(|| RunError::Config("terraform.bucket is not set (run config set terraform.bucket <name>)".into()))
    }
}
