use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::meta::{Meta, MetaType};
use crate::error::RunError;

/// Merged environment collected by the secret-scope climber.
pub type SecretEnv = BTreeMap<String, String>;

fn env_file_path(dir: &Path, meta: &Meta, env_filename: &str) -> PathBuf {
    match meta.secrets.as_ref().and_then(|s| s.base.as_deref()) {
        Some(base) => dir.join(base).join(env_filename),
        None => dir.join(env_filename),
    }
}

/// Climb from `start` toward the filesystem root, loading the env file of
/// every ancestor that opts in via a `secrets` block.
///
/// Ancestors are visited deepest first and merging is first-writer-wins,
/// so values closer to the starting directory take precedence. The climb
/// stops at the nearest ancestor of `type == "project"` (its own secrets
/// are still loaded); nothing above that boundary is ever read.
pub fn load_secret_chain(start: &Path, env_filename: &str) -> Result<SecretEnv, RunError> {
    let mut env = SecretEnv::new();
    for ancestor in start.ancestors() {
        let meta = match Meta::load(ancestor) {
            Ok(Some(meta)) => meta,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("Skipping '{}': {}", ancestor.display(), e);
                continue;
            }
        };
        if meta.secrets.is_some() {
            let path = env_file_path(ancestor, &meta, env_filename);
            if path.exists() {
                merge_env_file(&mut env, &path)?;
            } else {
                tracing::debug!("No env file at '{}'", path.display());
            }
        }
        if meta.kind == Some(MetaType::Project) {
            break;
        }
    }
    Ok(env)
}

fn merge_env_file(env: &mut SecretEnv, path: &Path) -> Result<(), RunError> {
    let iter = dotenvy::from_path_iter(path).map_err(|e| RunError::EnvFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    for item in iter {
        let (key, value) = item.map_err(|e| RunError::EnvFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        env.entry(key).or_insert(value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn seed(dir: &Path, meta: Option<&str>, env: Option<&str>) {
        std::fs::create_dir_all(dir).unwrap();
        if let Some(m) = meta {
            std::fs::write(dir.join("meta.json"), m).unwrap();
        }
        if let Some(e) = env {
            std::fs::write(dir.join(".env.local"), e).unwrap();
        }
    }

    #[test]
    fn deeper_values_win_on_collision() {
        let tmp = tempdir().unwrap();
        let project = tmp.path().join("proj");
        let app = project.join("app");
        seed(
            &project,
            Some(r#"{"type": "project", "secrets": {}}"#),
            Some("SHARED=project\nROOT_ONLY=1\n"),
        );
        seed(
            &app,
            Some(r#"{"type": "app", "secrets": {}}"#),
            Some("SHARED=app\n"),
        );

        let env = load_secret_chain(&app, ".env.local").unwrap();
        assert_eq!(env.get("SHARED").map(String::as_str), Some("app"));
        assert_eq!(env.get("ROOT_ONLY").map(String::as_str), Some("1"));
    }

    #[test]
    fn never_climbs_past_the_project_boundary() {
        let tmp = tempdir().unwrap();
        let outer = tmp.path().join("outer");
        let project = outer.join("proj");
        let app = project.join("app");
        seed(
            &outer,
            Some(r#"{"type": "project", "secrets": {}}"#),
            Some("LEAKED=yes\n"),
        );
        seed(&project, Some(r#"{"type": "project"}"#), None);
        seed(
            &app,
            Some(r#"{"type": "app", "secrets": {}}"#),
            Some("APP=1\n"),
        );

        let env = load_secret_chain(&app, ".env.local").unwrap();
        assert_eq!(env.get("APP").map(String::as_str), Some("1"));
        assert!(env.get("LEAKED").is_none());
    }

    #[test]
    fn ancestors_without_secrets_block_are_skipped() {
        let tmp = tempdir().unwrap();
        let project = tmp.path().join("proj");
        let mid = project.join("mid");
        let app = mid.join("app");
        seed(&project, Some(r#"{"type": "project", "secrets": {}}"#), Some("P=1\n"));
        seed(&mid, Some(r#"{"type": "component"}"#), Some("M=1\n"));
        seed(&app, Some(r#"{"type": "app"}"#), Some("A=1\n"));

        let env = load_secret_chain(&app, ".env.local").unwrap();
        // mid and app have env files but no secrets block: not loaded
        assert!(env.get("M").is_none());
        assert!(env.get("A").is_none());
        assert_eq!(env.get("P").map(String::as_str), Some("1"));
    }

    #[test]
    fn secrets_base_points_at_a_subdirectory() {
        let tmp = tempdir().unwrap();
        let project = tmp.path().join("proj");
        seed(&project, Some(r#"{"type": "project", "secrets": {"base": "env"}}"#), None);
        std::fs::create_dir_all(project.join("env")).unwrap();
        std::fs::write(project.join("env/.env.local"), "BASED=1\n").unwrap();

        let env = load_secret_chain(&project, ".env.local").unwrap();
        assert_eq!(env.get("BASED").map(String::as_str), Some("1"));
    }
}
