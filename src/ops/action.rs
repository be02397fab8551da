use std::path::Path;

use crate::cli::display;
use crate::context::RunContext;
use crate::error::RunError;
use crate::exec::CommandSpec;
use crate::utils;

/// Simulate a workflow locally with `act`, feeding it the secret chain
/// and an optional event payload.
pub async fn local(
    ctx: &RunContext,
    job: Option<&str>,
    event: Option<&Path>,
) -> Result<(), RunError> {
    let env = ctx.secret_env()?;
    let secret_file = std::env::temp_dir().join(format!(".act-secrets-{}", std::process::id()));
    utils::write_env_file(&secret_file, &env)?;

    let mut cmd = CommandSpec::new("act", &ctx.dir);
    if let Some(job) = job {
        cmd = cmd.args(["-j", job]);
    }
    cmd = cmd.arg("--secret-file").arg(secret_file.to_string_lossy());
    if let Some(event) = event {
        cmd = cmd.arg("-e").arg(event.to_string_lossy());
    }
    let outcome = cmd.streamed().await;

    let _ = std::fs::remove_file(&secret_file);
    outcome
}

/// Dispatch a workflow on GitHub and watch the run.
pub async fn remote(ctx: &RunContext, workflow: &str, git_ref: Option<&str>) -> Result<(), RunError> {
    let mut cmd = CommandSpec::new("gh", &ctx.dir).args(["workflow", "run", workflow]);
    if let Some(git_ref) = git_ref {
        cmd = cmd.args(["--ref", git_ref]);
    }
    cmd.capture().await?;
    display::print_success(&format!("Dispatched '{}'", workflow));

    CommandSpec::new("gh", &ctx.dir)
        .args(["run", "watch"])
        .streamed()
        .await
}

/// Push every variable of the secret chain as a repository secret.
pub async fn secrets(ctx: &RunContext) -> Result<(), RunError> {
    let env = ctx.secret_env()?;
    if env.is_empty() {
        display::print_error("Secret chain resolved to an empty environment");
        return Ok(());
    }
    for (key, value) in &env {
        CommandSpec::new("gh", &ctx.dir)
            .args(["secret", "set", key.as_str(), "--body", value.as_str()])
            .capture()
            .await?;
        tracing::info!("Set repository secret {}", key);
    }
    display::print_success(&format!("{} repository secret(s) set", env.len()));
    Ok(())
}

/// Print the environment the secret chain resolves to, values masked.
pub async fn env(ctx: &RunContext) -> Result<(), RunError> {
    let env = ctx.secret_env()?;
    println!();
    display::print_env(&env);
    println!();
    Ok(())
}
