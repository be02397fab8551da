use std::path::{Path, PathBuf};

use crate::cli::display;
use crate::config::Meta;
use crate::context::RunContext;
use crate::discovery::{find_directories_matching, load_secret_chain};
use crate::error::RunError;
use crate::exec::{run_batch, BatchPolicy, BatchUnit, CommandSpec};
use crate::ops;
use crate::utils;

/// Backend state prefix: `<project>/<scope-or-env>/terraform[/<component>]`.
fn backend_prefix(project: &str, env: &str, meta: &Meta, dir: &Path) -> Result<String, RunError> {
    let tf = meta.terraform(dir)?;
    let scope = if tf.global { "global" } else { env };
    let mut prefix = format!("{}/{}/terraform", project, scope);
    if let Some(component) = &tf.path {
        prefix.push('/');
        prefix.push_str(component);
    }
    Ok(prefix)
}

fn component_dir(dir: &Path, meta: &Meta) -> Result<PathBuf, RunError> {
    let tf = meta.terraform(dir)?;
    Ok(match tf.root.as_deref() {
        Some(root) => dir.join(root),
        None => dir.to_path_buf(),
    })
}

async fn init(ctx: &RunContext, dir: &Path, meta: &Meta) -> Result<(), RunError> {
    let bucket = ctx.config.terraform_bucket()?;
    let project = ops::project_id(ctx)?;
    let prefix = backend_prefix(&project, &ctx.env, meta, dir)?;
    let workdir = component_dir(dir, meta)?;

    CommandSpec::new("terraform", &workdir)
        .arg("init")
        .arg(format!("-backend-config=bucket={}", bucket))
        .arg(format!("-backend-config=prefix={}", prefix))
        .arg("-reconfigure")
        .streamed()
        .await
}

async fn apply_one(ctx: &RunContext, dir: &Path, meta: &Meta, destroy: bool) -> Result<(), RunError> {
    init(ctx, dir, meta).await?;
    let workdir = component_dir(dir, meta)?;
    let env = load_secret_chain(dir, &ctx.env_filename)?;

    if destroy {
        CommandSpec::new("terraform", &workdir)
            .args(["destroy", "-auto-approve"])
            .envs(&env)
            .streamed()
            .await
    } else {
        CommandSpec::new("terraform", &workdir)
            .arg("plan")
            .envs(&env)
            .streamed()
            .await?;
        CommandSpec::new("terraform", &workdir)
            .args(["apply", "-auto-approve"])
            .envs(&env)
            .streamed()
            .await
    }
}

pub async fn apply(ctx: &RunContext, all: bool, fail_fast: bool, destroy: bool) -> Result<(), RunError> {
    if !all {
        let meta = ctx.meta()?;
        apply_one(ctx, &ctx.dir, &meta, destroy).await?;
        display::print_success(if destroy { "Destroyed" } else { "Applied" });
        return Ok(());
    }

    let matches = find_directories_matching(&ctx.source_root(), "terraform", None)?;
    let mut units = Vec::new();
    for m in matches {
        let priority = m.meta.terraform.as_ref().and_then(|t| t.priority);
        units.push(BatchUnit {
            name: utils::dir_name(&m.directory),
            priority,
            payload: (m.directory, m.meta),
        });
    }
    if units.is_empty() {
        display::print_error("No terraform components found");
        return Ok(());
    }

    let policy = if fail_fast {
        BatchPolicy::FailFast
    } else {
        BatchPolicy::BestEffort
    };
    let report = run_batch(units, policy, |unit| {
        let (dir, meta) = unit.payload;
        async move { apply_one(ctx, &dir, &meta, destroy).await }
    })
    .await;
    display::print_batch_report(&report);
    if !report.ok() {
        return Err(RunError::Config("terraform batch had failures".into()));
    }
    Ok(())
}

/// Pass-through to `terraform state` (pull, push, mv, import targets).
/// State push runs unlocked, matching the original workflows; concurrent
/// invocations against the same backend can corrupt remote state.
pub async fn state(ctx: &RunContext, args: &[String]) -> Result<(), RunError> {
    let meta = ctx.meta()?;
    init(ctx, &ctx.dir, &meta).await?;
    let workdir = component_dir(&ctx.dir, &meta)?;

    let mut cmd = CommandSpec::new("terraform", &workdir).arg("state").args(args.to_vec());
    if args.first().map(String::as_str) == Some("push") {
        cmd = cmd.arg("-lock=false");
    }
    cmd.streamed().await
}

/// Print the computed backend configuration without touching anything.
pub async fn env(ctx: &RunContext) -> Result<(), RunError> {
    let meta = ctx.meta()?;
    let bucket = ctx.config.terraform_bucket()?;
    let project = ops::project_id(ctx)?;
    let prefix = backend_prefix(&project, &ctx.env, &meta, &ctx.dir)?;
    println!("  bucket = {}", bucket);
    println!("  prefix = {}", prefix);
    Ok(())
}

/// Remove a stale backend lock object from the state bucket.
pub async fn unlock(ctx: &RunContext) -> Result<(), RunError> {
    let meta = ctx.meta()?;
    let bucket = ctx.config.terraform_bucket()?;
    let project = ops::project_id(ctx)?;
    let prefix = backend_prefix(&project, &ctx.env, &meta, &ctx.dir)?;
    let lock_object = format!("gs://{}/{}/default.tflock", bucket, prefix);

    let result = CommandSpec::new("gcloud", &ctx.dir)
        .args(["storage", "rm", lock_object.as_str()])
        .capture_result()
        .await?;
    if result.success {
        display::print_success(&format!("Removed lock {}", lock_object));
    } else if crate::exec::is_not_found(&result.stderr) {
        display::print_success("No lock present");
    } else {
        return Err(RunError::CommandFailed {
            program: "gcloud".into(),
            dir: ctx.dir.clone(),
            stderr: result.stderr.trim().to_string(),
        });
    }
    Ok(())
}
