use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::RunError;

pub const META_FILENAME: &str = "meta.json";

/// Per-directory project descriptor, parsed from `meta.json`.
///
/// The typed fields carry validated configuration; the raw JSON document is
/// kept alongside so discovery can address arbitrary dot-nested properties.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Meta {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<MetaType>,
    #[serde(default)]
    pub scope: Scope,
    pub docker: Option<DockerMeta>,
    pub terraform: Option<TerraformMeta>,
    pub cluster: Option<ClusterMeta>,
    pub hasura: Option<HasuraMeta>,
    pub vault: Option<VaultMeta>,
    pub compose: Option<ComposeMeta>,
    pub tunnel: Option<TunnelMeta>,
    pub secrets: Option<SecretsMeta>,
    pub custom_script: Option<CustomScriptMeta>,
    #[serde(skip)]
    pub raw: Value,
}

/// Closed set of descriptor types. The tag itself is optional — plenty of
/// descriptors only carry subsystem blocks — but when present an unknown
/// tag is rejected at load time instead of falling through string
/// comparisons.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetaType {
    Project,
    App,
    Container,
    Cluster,
    ClusterApp,
    Component,
    Db,
    Pod,
    Config,
    Script,
}

impl std::fmt::Display for MetaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MetaType::Project => "project",
            MetaType::App => "app",
            MetaType::Container => "container",
            MetaType::Cluster => "cluster",
            MetaType::ClusterApp => "cluster_app",
            MetaType::Component => "component",
            MetaType::Db => "db",
            MetaType::Pod => "pod",
            MetaType::Config => "config",
            MetaType::Script => "script",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    #[default]
    Environment,
    Global,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DockerMeta {
    pub root: Option<String>,
    pub image: Option<String>,
    pub tag: Option<String>,
    pub context_dockerfile: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TerraformMeta {
    pub root: Option<String>,
    pub path: Option<String>,
    #[serde(default)]
    pub global: bool,
    pub priority: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClusterMeta {
    pub app: Option<String>,
    pub namespace: Option<String>,
    #[serde(default)]
    pub tls: bool,
    pub priority: Option<i64>,
    #[serde(default)]
    pub ignore_env: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HasuraMeta {
    pub state: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VaultMeta {
    #[serde(default)]
    pub ignore_env: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ComposeMeta {
    pub root: Option<String>,
    #[serde(default = "default_compose_filename")]
    pub filename: String,
}

fn default_compose_filename() -> String {
    "docker-compose.yaml".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TunnelMeta {
    pub hostname: String,
    pub service: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SecretsMeta {
    pub base: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CustomScriptMeta {
    #[serde(default = "default_script_root")]
    pub root: String,
}

fn default_script_root() -> String {
    "scripts".to_string()
}

impl Meta {
    /// Load the descriptor for a directory.
    ///
    /// A missing or unreadable file is an expected state and yields
    /// `Ok(None)`; a file that exists but does not parse, or carries an
    /// unknown `type`, is a hard error naming the directory.
    pub fn load(dir: &Path) -> Result<Option<Self>, RunError> {
        let path = dir.join(META_FILENAME);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Ok(None),
        };
        let raw: Value = serde_json::from_str(&content).map_err(|e| RunError::InvalidMeta {
            dir: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut meta: Meta =
            serde_json::from_value(raw.clone()).map_err(|e| RunError::InvalidMeta {
                dir: dir.to_path_buf(),
                message: e.to_string(),
            })?;
        meta.raw = raw;
        Ok(Some(meta))
    }

    /// Load the descriptor, treating absence as an error.
    pub fn require(dir: &Path) -> Result<Self, RunError> {
        Self::load(dir)?.ok_or_else(|| RunError::MetaNotFound {
            dir: dir.to_path_buf(),
        })
    }

    pub fn save(&self, dir: &Path) -> Result<(), RunError> {
        let path = dir.join(META_FILENAME);
        let content = serde_json::to_string_pretty(&self.raw)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Resolve a dot-delimited property against the raw document.
    ///
    /// Short-circuits to `None` the moment an intermediate segment is
    /// missing or null.
    pub fn lookup(&self, property: &str) -> Option<&Value> {
        let mut current = &self.raw;
        for segment in property.split('.') {
            match current.get(segment) {
                Some(v) if !v.is_null() => current = v,
                _ => return None,
            }
        }
        Some(current)
    }

    pub fn id(&self, dir: &Path) -> Result<&str, RunError> {
        self.id.as_deref().ok_or_else(|| RunError::MissingMetaField {
            dir: dir.to_path_buf(),
            field: "id",
        })
    }

    pub fn docker(&self, dir: &Path) -> Result<&DockerMeta, RunError> {
        self.docker.as_ref().ok_or_else(|| RunError::MissingMetaField {
            dir: dir.to_path_buf(),
            field: "docker",
        })
    }

    pub fn terraform(&self, dir: &Path) -> Result<&TerraformMeta, RunError> {
        self.terraform
            .as_ref()
            .ok_or_else(|| RunError::MissingMetaField {
                dir: dir.to_path_buf(),
                field: "terraform",
            })
    }

    pub fn cluster(&self, dir: &Path) -> Result<&ClusterMeta, RunError> {
        self.cluster
            .as_ref()
            .ok_or_else(|| RunError::MissingMetaField {
                dir: dir.to_path_buf(),
                field: "cluster",
            })
    }

    pub fn compose(&self, dir: &Path) -> Result<&ComposeMeta, RunError> {
        self.compose
            .as_ref()
            .ok_or_else(|| RunError::MissingMetaField {
                dir: dir.to_path_buf(),
                field: "compose",
            })
    }

    pub fn tunnel(&self, dir: &Path) -> Result<&TunnelMeta, RunError> {
        self.tunnel.as_ref().ok_or_else(|| RunError::MissingMetaField {
            dir: dir.to_path_buf(),
            field: "tunnel",
        })
    }

    /// Hasura project directory relative to the descriptor, defaulting by
    /// variant: `container/state` for containers, `app/state` otherwise.
    pub fn hasura_state(&self) -> String {
        if let Some(state) = self.hasura.as_ref().and_then(|h| h.state.clone()) {
            return state;
        }
        match self.kind {
            Some(MetaType::Container) => "container/state".to_string(),
            _ => "app/state".to_string(),
        }
    }

    /// Script root, defaulting to the `scripts` convention when the
    /// descriptor carries no `custom_script` block at all.
    pub fn script_root(&self) -> String {
        self.custom_script
            .as_ref()
            .map(|c| c.root.clone())
            .unwrap_or_else(default_script_root)
    }
}

/// JSON truthiness as discovery understands it: null, false, 0 and ""
/// are falsy, everything else truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Walk upward from `start` to the nearest ancestor whose descriptor has
/// `type == "project"`. Returns that directory and its descriptor.
pub fn find_project_root(start: &Path) -> Result<Option<(PathBuf, Meta)>, RunError> {
    for ancestor in start.ancestors() {
        match Meta::load(ancestor) {
            Ok(Some(meta)) if meta.kind == Some(MetaType::Project) => {
                return Ok(Some((ancestor.to_path_buf(), meta)));
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("{}", e),
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_meta(dir: &Path, json: &str) {
        std::fs::write(dir.join(META_FILENAME), json).unwrap();
    }

    #[test]
    fn absent_descriptor_is_none_not_error() {
        let tmp = tempdir().unwrap();
        assert!(Meta::load(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn unknown_type_tag_is_rejected() {
        let tmp = tempdir().unwrap();
        write_meta(tmp.path(), r#"{"type": "warehouse"}"#);
        let err = Meta::load(tmp.path()).unwrap_err();
        assert!(matches!(err, RunError::InvalidMeta { .. }));
    }

    #[test]
    fn defaults_are_applied() {
        let tmp = tempdir().unwrap();
        write_meta(
            tmp.path(),
            r#"{"type": "app", "hasura": {}, "compose": {}, "custom_script": {}}"#,
        );
        let meta = Meta::load(tmp.path()).unwrap().unwrap();
        assert_eq!(meta.scope, Scope::Environment);
        assert_eq!(meta.hasura.as_ref().unwrap().state, None);
        assert_eq!(meta.compose.as_ref().unwrap().filename, "docker-compose.yaml");
        assert_eq!(meta.script_root(), "scripts");
    }

    #[test]
    fn type_tag_is_optional() {
        let tmp = tempdir().unwrap();
        write_meta(tmp.path(), r#"{"cluster": {"tls": true}}"#);
        let meta = Meta::load(tmp.path()).unwrap().unwrap();
        assert_eq!(meta.kind, None);
        assert!(meta.cluster.unwrap().tls);
    }

    #[test]
    fn hasura_state_defaults_by_variant() {
        let tmp = tempdir().unwrap();

        write_meta(tmp.path(), r#"{"type": "app", "hasura": {}}"#);
        let meta = Meta::require(tmp.path()).unwrap();
        assert_eq!(meta.hasura_state(), "app/state");

        write_meta(tmp.path(), r#"{"type": "container", "hasura": {}}"#);
        let meta = Meta::require(tmp.path()).unwrap();
        assert_eq!(meta.hasura_state(), "container/state");

        write_meta(tmp.path(), r#"{"hasura": {"state": "db/state"}}"#);
        let meta = Meta::require(tmp.path()).unwrap();
        assert_eq!(meta.hasura_state(), "db/state");
    }

    #[test]
    fn lookup_resolves_nested_properties() {
        let tmp = tempdir().unwrap();
        write_meta(
            tmp.path(),
            r#"{"type": "cluster_app", "cluster": {"tls": true, "priority": 2}}"#,
        );
        let meta = Meta::load(tmp.path()).unwrap().unwrap();
        assert_eq!(meta.lookup("cluster.tls"), Some(&Value::Bool(true)));
        assert_eq!(meta.lookup("cluster.priority").and_then(Value::as_i64), Some(2));
        assert!(meta.lookup("cluster.missing").is_none());
        assert!(meta.lookup("docker.image").is_none());
    }

    #[test]
    fn missing_field_accessor_names_directory_and_field() {
        let tmp = tempdir().unwrap();
        write_meta(tmp.path(), r#"{"type": "app"}"#);
        let meta = Meta::load(tmp.path()).unwrap().unwrap();
        let err = meta.docker(tmp.path()).unwrap_err();
        assert!(matches!(err, RunError::MissingMetaField { field: "docker", .. }));
    }

    #[test]
    fn truthiness_follows_json_semantics() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&Value::Bool(false)));
        assert!(!is_truthy(&serde_json::json!(0)));
        assert!(!is_truthy(&serde_json::json!("")));
        assert!(is_truthy(&serde_json::json!("x")));
        assert!(is_truthy(&serde_json::json!(1)));
        assert!(is_truthy(&serde_json::json!({})));
    }
}
