pub mod commands;
pub mod display;
pub mod settings;

use crate::cli::commands::{
    ActionAction, ClusterAction, Commands, DockerAction, HasuraAction, HasuraMigrateAction,
    MachineAction, MetaAction, SkaffoldAction, TerraformAction, TunnelAction, UtilsAction,
    VaultAction, VaultKvAction, VercelAction,
};
use crate::context::RunContext;
use crate::ops;

/// Dispatch a parsed subcommand against the resolved context.
pub async fn handle_command(ctx: &RunContext, cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Docker { action } => match action {
            DockerAction::Build => ops::docker::build(ctx).await?,
            DockerAction::Push => ops::docker::push(ctx).await?,
            DockerAction::Buildx { platform } => ops::docker::buildx(ctx, &platform).await?,
            DockerAction::Compose { down } => ops::docker::compose(ctx, down).await?,
        },
        Commands::Terraform { action } => match action {
            TerraformAction::Apply { all, fail_fast } => {
                ops::terraform::apply(ctx, all, fail_fast, false).await?
            }
            TerraformAction::Destroy { all, fail_fast } => {
                ops::terraform::apply(ctx, all, fail_fast, true).await?
            }
            TerraformAction::State { args } => ops::terraform::state(ctx, &args).await?,
            TerraformAction::Env => ops::terraform::env(ctx).await?,
            TerraformAction::Unlock => ops::terraform::unlock(ctx).await?,
        },
        Commands::Cluster { action } => match action {
            ClusterAction::Connect { zone } => ops::cluster::connect(ctx, zone.as_deref()).await?,
            ClusterAction::Deploy { fail_fast } => ops::cluster::deploy(ctx, false, fail_fast).await?,
            ClusterAction::Remove { fail_fast } => ops::cluster::deploy(ctx, true, fail_fast).await?,
            ClusterAction::Certs => ops::cluster::certs(ctx).await?,
            ClusterAction::Secrets => ops::cluster::secrets(ctx).await?,
            ClusterAction::Pod { name } => ops::cluster::pod(ctx, name.as_deref()).await?,
            ClusterAction::Namespace { name } => ops::cluster::namespace(ctx, name.as_deref()).await?,
        },
        Commands::Hasura { action } => match action {
            HasuraAction::Console => ops::hasura::console(ctx).await?,
            HasuraAction::Migrate { action } => match action {
                HasuraMigrateAction::Create { name } => ops::hasura::migrate_create(ctx, &name).await?,
                HasuraMigrateAction::Apply => ops::hasura::migrate_apply(ctx).await?,
                HasuraMigrateAction::Squash { from, name } => {
                    ops::hasura::migrate_squash(ctx, &from, &name).await?
                }
            },
            HasuraAction::Metadata => ops::hasura::metadata_apply(ctx).await?,
        },
        Commands::Vault { action } => match action {
            VaultAction::Kv { action } => match action {
                VaultKvAction::Import => ops::vault::import(ctx).await?,
                VaultKvAction::Export => ops::vault::export(ctx).await?,
            },
        },
        Commands::Action { action } => match action {
            ActionAction::Local { job, event } => {
                ops::action::local(ctx, job.as_deref(), event.as_deref()).await?
            }
            ActionAction::Remote { workflow, r#ref } => {
                ops::action::remote(ctx, &workflow, r#ref.as_deref()).await?
            }
            ActionAction::Secrets => ops::action::secrets(ctx).await?,
            ActionAction::Env => ops::action::env(ctx).await?,
        },
        Commands::Script { name, args, dev, test } => {
            ops::script::run(ctx, &name, &args, dev, test).await?
        }
        Commands::Tunnel { action } => match action {
            TunnelAction::Run => ops::tunnel::run(ctx).await?,
        },
        Commands::Skaffold { action } => match action {
            SkaffoldAction::Dev => ops::passthrough::skaffold(ctx, true).await?,
            SkaffoldAction::Run => ops::passthrough::skaffold(ctx, false).await?,
        },
        Commands::Vercel { action } => match action {
            VercelAction::List => ops::passthrough::vercel_list(ctx).await?,
            VercelAction::Logs { deployment } => {
                ops::passthrough::vercel_logs(ctx, &deployment).await?
            }
        },
        Commands::Npm { script, args } => ops::passthrough::npm(ctx, &script, &args).await?,
        Commands::Machine { action } => match action {
            MachineAction::Init => ops::machine::init(ctx).await?,
        },
        Commands::Utils { action } => match action {
            UtilsAction::Git => ops::utils_cmd::git_info(ctx).await?,
            UtilsAction::Dev => ops::utils_cmd::dev(ctx).await?,
            UtilsAction::Nanoid => ops::utils_cmd::nanoid(),
            UtilsAction::Meta { action } => match action {
                MetaAction::Create => ops::utils_cmd::meta_create(ctx).await?,
                MetaAction::Change { property, value } | MetaAction::Add { property, value } => {
                    ops::utils_cmd::meta_set(ctx, &property, &value).await?
                }
                MetaAction::Ids => ops::utils_cmd::meta_ids(ctx).await?,
            },
            UtilsAction::Commit => ops::utils_cmd::commit(ctx).await?,
            UtilsAction::Dependencies => ops::utils_cmd::dependencies(ctx).await?,
            UtilsAction::Repo => ops::utils_cmd::repo(ctx).await?,
        },
        Commands::Config { action } => settings::handle_config_action(action).await?,
    }
    Ok(())
}
