use std::path::{Path, PathBuf};

use crate::cli::display;
use crate::config::Meta;
use crate::context::RunContext;
use crate::error::RunError;
use crate::exec::{is_not_found, CommandSpec};
use crate::ops;
use crate::utils;

/// Resolved build inputs for the current descriptor.
struct BuildPlan {
    context_dir: PathBuf,
    dockerfile: Option<String>,
    reference: String,
}

fn plan(ctx: &RunContext, meta: &Meta) -> Result<BuildPlan, RunError> {
    let docker = meta.docker(&ctx.dir)?;
    // No root means the descriptor's own directory is the build context.
    let context_dir = match docker.root.as_deref() {
        Some(root) => ctx.dir.join(root),
        None => ctx.dir.clone(),
    };
    let image = docker
        .image
        .clone()
        .or_else(|| meta.name.clone())
        .unwrap_or_else(|| utils::dir_name(&ctx.dir));
    let tag = docker.tag.clone().unwrap_or_else(|| ctx.env.clone());
    let project = ops::project_id(ctx)?;
    Ok(BuildPlan {
        context_dir,
        dockerfile: docker.context_dockerfile.clone(),
        reference: ops::image_tag(&ctx.config.docker.registry, &project, &image, &tag),
    })
}

pub async fn build(ctx: &RunContext) -> Result<(), RunError> {
    let meta = ctx.meta()?;
    let plan = plan(ctx, &meta)?;
    let env = ctx.secret_env()?;

    tracing::info!("Building {}", plan.reference);
    let mut cmd = CommandSpec::new("docker", &plan.context_dir)
        .args(["build", "-t", plan.reference.as_str()])
        .envs(&env);
    if let Some(file) = &plan.dockerfile {
        cmd = cmd.args(["-f", file]);
    }
    cmd.arg(".").streamed().await?;
    display::print_success(&format!("Built {}", plan.reference));
    Ok(())
}

pub async fn push(ctx: &RunContext) -> Result<(), RunError> {
    let meta = ctx.meta()?;
    let plan = plan(ctx, &meta)?;

    CommandSpec::new("docker", &plan.context_dir)
        .args(["push", plan.reference.as_str()])
        .streamed()
        .await?;
    display::print_success(&format!("Pushed {}", plan.reference));
    Ok(())
}

/// Multi-arch build: one buildx build per platform, then a manifest list
/// stitched together. Whether the manifest is created or amended depends
/// on whether it already exists in the registry.
pub async fn buildx(ctx: &RunContext, platforms: &[String]) -> Result<(), RunError> {
    let meta = ctx.meta()?;
    let plan = plan(ctx, &meta)?;
    let env = ctx.secret_env()?;

    let mut arch_refs = Vec::new();
    for platform in platforms {
        let arch = platform.rsplit('/').next().unwrap_or(platform);
        let arch_ref = format!("{}-{}", plan.reference, arch);
        tracing::info!("Building {} for {}", arch_ref, platform);
        let mut cmd = CommandSpec::new("docker", &plan.context_dir)
            .args([
                "buildx",
                "build",
                "--platform",
                platform.as_str(),
                "-t",
                arch_ref.as_str(),
                "--push",
            ])
            .envs(&env);
        if let Some(file) = &plan.dockerfile {
            cmd = cmd.args(["-f", file]);
        }
        cmd.arg(".").streamed().await?;
        arch_refs.push(arch_ref);
    }

    create_or_amend_manifest(&plan.context_dir, &plan.reference, &arch_refs).await?;
    CommandSpec::new("docker", &plan.context_dir)
        .args(["manifest", "push", plan.reference.as_str()])
        .capture()
        .await?;
    display::print_success(&format!("Published manifest {}", plan.reference));
    Ok(())
}

async fn create_or_amend_manifest(
    dir: &Path,
    reference: &str,
    arch_refs: &[String],
) -> Result<(), RunError> {
    let inspect = CommandSpec::new("docker", dir)
        .args(["manifest", "inspect", reference])
        .capture_result()
        .await?;

    let mut args = vec!["manifest".to_string(), "create".to_string()];
    if inspect.success {
        args.push("--amend".to_string());
    } else if !is_not_found(&inspect.stderr) {
        return Err(RunError::CommandFailed {
            program: "docker".to_string(),
            dir: dir.to_path_buf(),
            stderr: inspect.stderr.trim().to_string(),
        });
    }
    args.push(reference.to_string());
    args.extend(arch_refs.iter().cloned());

    CommandSpec::new("docker", dir).args(args).capture().await?;
    Ok(())
}

pub async fn compose(ctx: &RunContext, down: bool) -> Result<(), RunError> {
    let meta = ctx.meta()?;
    let compose = meta.compose(&ctx.dir)?;
    let dir = match compose.root.as_deref() {
        Some(root) => ctx.dir.join(root),
        None => ctx.dir.clone(),
    };
    let file = dir.join(&compose.filename);
    if !file.exists() {
        return Err(RunError::Config(format!(
            "compose file '{}' does not exist",
            file.display()
        )));
    }
    let env = ctx.secret_env()?;

    let mut cmd = CommandSpec::new("docker", &dir)
        .args(["compose", "-f"])
        .arg(file.to_string_lossy())
        .envs(&env);
    if down {
        cmd = cmd.arg("down");
    } else {
        cmd = cmd.args(["up", "-d"]);
    }
    cmd.streamed().await?;
    display::print_success(if down { "Compose stack down" } else { "Compose stack up" });
    Ok(())
}
