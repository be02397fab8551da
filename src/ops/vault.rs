use dialoguer::{theme::ColorfulTheme, Confirm};
use serde_json::Value;

use crate::cli::display;
use crate::config::Meta;
use crate::context::RunContext;
use crate::discovery::SecretEnv;
use crate::error::RunError;
use crate::exec::CommandSpec;
use crate::ops;
use crate::utils;

/// Secret path: `<project>/<env-or-global>[/<unit-id>]/secrets`.
fn secret_path(ctx: &RunContext, meta: &Meta, project: &str) -> String {
    let scope = if meta.vault.as_ref().map(|v| v.ignore_env).unwrap_or(false) {
        "global"
    } else {
        ctx.scope_segment(meta.scope)
    };
    match meta.id.as_deref() {
        Some(id) if id != project => format!("{}/{}/{}/secrets", project, scope, id),
        _ => format!("{}/{}/secrets", project, scope),
    }
}

fn vault_cmd(ctx: &RunContext) -> CommandSpec {
    let mut cmd = CommandSpec::new("vault", &ctx.dir);
    if let Some(addr) = &ctx.config.vault.address {
        cmd = cmd.env("VAULT_ADDR", addr);
    }
    cmd
}

/// Push the local env file chain into vault.
pub async fn export(ctx: &RunContext) -> Result<(), RunError> {
    let meta = ctx.meta()?;
    let project = ops::project_id(ctx)?;
    let path = secret_path(ctx, &meta, &project);
    let env = ctx.secret_env()?;
    if env.is_empty() {
        display::print_error("Nothing to export: secret chain is empty");
        return Ok(());
    }

    let mut cmd = vault_cmd(ctx).args(["kv", "put", path.as_str()]);
    for (k, v) in &env {
        cmd = cmd.arg(format!("{}={}", k, v));
    }
    cmd.capture().await?;
    display::print_success(&format!("Exported {} key(s) to {}", env.len(), path));
    Ok(())
}

/// Pull secrets from vault into the local env file.
pub async fn import(ctx: &RunContext) -> Result<(), RunError> {
    let meta = ctx.meta()?;
    let project = ops::project_id(ctx)?;
    let path = secret_path(ctx, &meta, &project);

    let raw = vault_cmd(ctx)
        .args(["kv", "get", "-format=json", path.as_str()])
        .capture()
        .await?;
    let parsed: Value = serde_json::from_str(&raw)?;
    let data = parsed["data"]["data"].as_object().ok_or_else(|| {
        RunError::Config(format!("vault path '{}' returned no secret data", path))
    })?;

    let mut env = SecretEnv::new();
    for (key, value) in data {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        env.insert(key.clone(), value);
    }

    let target = ctx.dir.join(&ctx.env_filename);
    if target.exists() {
        let overwrite = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Overwrite '{}'?", target.display()))
            .default(false)
            .interact()
            .map_err(|e| RunError::Config(e.to_string()))?;
        if !overwrite {
            println!("  Cancelled.");
            return Ok(());
        }
        let stamp = chrono::Utc::now().format("%Y%m%d%H%M%S");
        let backup = ctx.dir.join(format!("{}.{}.bak", ctx.env_filename, stamp));
        std::fs::copy(&target, &backup)?;
        tracing::info!("Backed up previous env file to '{}'", backup.display());
    }
    utils::write_env_file(&target, &env)?;
    display::print_success(&format!(
        "Imported {} key(s) into {}",
        env.len(),
        target.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GlobalConfig;
    use std::path::Path;
    use tempfile::tempdir;

    fn ctx_at(dir: &Path, env: &str) -> RunContext {
        RunContext {
            env: env.to_string(),
            dir: dir.to_path_buf(),
            env_filename: format!(".env.{}", env),
            config: GlobalConfig::default(),
        }
    }

    fn meta_from(json: &str, dir: &Path) -> Meta {
        std::fs::write(dir.join("meta.json"), json).unwrap();
        Meta::require(dir).unwrap()
    }

    #[test]
    fn path_is_env_scoped_by_default() {
        let tmp = tempdir().unwrap();
        let meta = meta_from(r#"{"type": "app", "id": "api"}"#, tmp.path());
        let ctx = ctx_at(tmp.path(), "staging");
        assert_eq!(secret_path(&ctx, &meta, "acme"), "acme/staging/api/secrets");
    }

    #[test]
    fn global_scope_replaces_env_segment() {
        let tmp = tempdir().unwrap();
        let meta = meta_from(
            r#"{"type": "app", "id": "api", "scope": "global"}"#,
            tmp.path(),
        );
        let ctx = ctx_at(tmp.path(), "staging");
        assert_eq!(secret_path(&ctx, &meta, "acme"), "acme/global/api/secrets");
    }

    #[test]
    fn project_level_descriptor_omits_unit_segment() {
        let tmp = tempdir().unwrap();
        let meta = meta_from(r#"{"type": "project", "id": "acme"}"#, tmp.path());
        let ctx = ctx_at(tmp.path(), "staging");
        assert_eq!(secret_path(&ctx, &meta, "acme"), "acme/staging/secrets");
    }
}
