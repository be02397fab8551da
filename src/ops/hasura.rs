use std::path::PathBuf;

use crate::cli::display;
use crate::context::RunContext;
use crate::error::RunError;
use crate::exec::CommandSpec;

/// Directory holding the hasura project state (migrations + metadata).
fn state_dir(ctx: &RunContext) -> Result<PathBuf, RunError> {
    let meta = ctx.meta()?;
    Ok(ctx.dir.join(meta.hasura_state()))
}

/// Endpoint comes from the secret chain (or the ambient environment),
/// under the variable named in the global config.
fn endpoint(ctx: &RunContext) -> Result<String, RunError> {
    let var = &ctx.config.hasura.endpoint_env;
    if let Some(v) = ctx.secret_env()?.get(var) {
        return Ok(v.clone());
    }
    std::env::var(var).map_err(|_| RunError::MissingEnv(var.clone()))
}

/// Base invocation: subcommand args first, then the endpoint flag, with
/// the secret chain in the environment.
fn hasura(ctx: &RunContext, args: &[&str]) -> Result<CommandSpec, RunError> {
    let dir = state_dir(ctx)?;
    let endpoint = endpoint(ctx)?;
    let env = ctx.secret_env()?;
    Ok(CommandSpec::new("hasura", dir)
        .args(args.iter().copied())
        .args(["--endpoint", endpoint.as_str()])
        .envs(&env))
}

pub async fn console(ctx: &RunContext) -> Result<(), RunError> {
    hasura(ctx, &["console"])?.streamed().await
}

pub async fn migrate_create(ctx: &RunContext, name: &str) -> Result<(), RunError> {
    hasura(ctx, &["migrate", "create", name, "--from-server"])?
        .streamed()
        .await?;
    display::print_success(&format!("Migration '{}' created", name));
    Ok(())
}

pub async fn migrate_apply(ctx: &RunContext) -> Result<(), RunError> {
    hasura(ctx, &["migrate", "apply"])?.streamed().await?;
    hasura(ctx, &["metadata", "apply"])?.streamed().await?;
    display::print_success("Migrations and metadata applied");
    Ok(())
}

pub async fn migrate_squash(ctx: &RunContext, from: &str, name: &str) -> Result<(), RunError> {
    hasura(ctx, &["migrate", "squash", "--from", from, "--name", name])?
        .streamed()
        .await?;
    display::print_success(&format!("Squashed migrations from {} into '{}'", from, name));
    Ok(())
}

pub async fn metadata_apply(ctx: &RunContext) -> Result<(), RunError> {
    hasura(ctx, &["metadata", "apply"])?.streamed().await?;
    display::print_success("Metadata applied");
    Ok(())
}
