use console::style;
use std::path::PathBuf;

use crate::cli::commands::ConfigAction;
use crate::cli::display;
use crate::config::GlobalConfig;

pub async fn handle_config_action(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let config = GlobalConfig::load()?;
            println!();
            println!("  {}", style("Current configuration").bold().cyan());
            println!("  {}", "-".repeat(40));
            println!(
                "  {} {}",
                style("source_root:").bold(),
                config
                    .source_root
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(current directory)".to_string())
            );
            println!(
                "  {} {}",
                style("docker.registry:").bold(),
                config.docker.registry
            );
            println!(
                "  {} {}",
                style("terraform.bucket:").bold(),
                config
                    .terraform
                    .bucket
                    .as_deref()
                    .unwrap_or("(not configured)")
            );
            println!(
                "  {} {}",
                style("hasura.endpoint_env:").bold(),
                config.hasura.endpoint_env
            );
            println!(
                "  {} {}",
                style("vault.address:").bold(),
                config.vault.address.as_deref().unwrap_or("(not configured)")
            );
            println!();
        }
        ConfigAction::Set { key, value } => {
            let mut config = GlobalConfig::load()?;
            match key.as_str() {
                "source_root" => config.source_root = Some(PathBuf::from(&value)),
                "docker.registry" => config.docker.registry = value.clone(),
                "terraform.bucket" => config.terraform.bucket = Some(value.clone()),
                "hasura.endpoint_env" => config.hasura.endpoint_env = value.clone(),
                "vault.address" => config.vault.address = Some(value.clone()),
                _ => {
                    display::print_error(&format!("Unknown key: {}", key));
                    println!("  Valid keys: source_root, docker.registry, terraform.bucket, hasura.endpoint_env, vault.address");
                    return Ok(());
                }
            }
            config.save()?;
            display::print_success(&format!("'{}' updated", key));
        }
    }
    Ok(())
}
