use crate::context::RunContext;
use crate::error::RunError;
use crate::exec::CommandSpec;

/// Run a custom script from the descriptor's script root with the secret
/// chain in its environment.
pub async fn run(
    ctx: &RunContext,
    name: &str,
    args: &[String],
    dev: bool,
    test: bool,
) -> Result<(), RunError> {
    let meta = ctx.meta()?;
    let script_dir = ctx.dir.join(meta.script_root());
    let script_path = script_dir.join(name);
    if !script_path.exists() {
        return Err(RunError::Config(format!(
            "script '{}' does not exist",
            script_path.display()
        )));
    }

    let mut env = ctx.secret_env()?;
    if dev {
        env.insert("RUN_ENV".to_string(), "development".to_string());
    } else if test {
        env.insert("RUN_ENV".to_string(), "test".to_string());
    }

    CommandSpec::new(script_path.to_string_lossy(), &script_dir)
        .args(args.to_vec())
        .envs(&env)
        .streamed()
        .await
}
