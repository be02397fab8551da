use crate::context::RunContext;
use crate::error::RunError;
use crate::exec::CommandSpec;

/// Thin pass-throughs to tools that only need the right directory and
/// the secret chain in their environment.

pub async fn skaffold(ctx: &RunContext, dev: bool) -> Result<(), RunError> {
    let env = ctx.secret_env()?;
    CommandSpec::new("skaffold", &ctx.dir)
        .arg(if dev { "dev" } else { "run" })
        .envs(&env)
        .streamed()
        .await
}

pub async fn vercel_list(ctx: &RunContext) -> Result<(), RunError> {
    CommandSpec::new("vercel", &ctx.dir).arg("list").streamed().await
}

pub async fn vercel_logs(ctx: &RunContext, deployment: &str) -> Result<(), RunError> {
    CommandSpec::new("vercel", &ctx.dir)
        .args(["logs", deployment])
        .streamed()
        .await
}

pub async fn npm(ctx: &RunContext, script: &str, args: &[String]) -> Result<(), RunError> {
    let env = ctx.secret_env()?;
    let mut cmd = CommandSpec::new("npm", &ctx.dir)
        .args(["run", script])
        .envs(&env);
    if !args.is_empty() {
        cmd = cmd.arg("--").args(args.to_vec());
    }
    cmd.streamed().await
}
