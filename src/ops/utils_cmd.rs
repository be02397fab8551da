use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use serde_json::{json, Value};

use crate::cli::display;
use crate::config::meta::{find_project_root, Meta, META_FILENAME};
use crate::context::RunContext;
use crate::discovery::{find_directories_matching, walker};
use crate::error::RunError;
use crate::exec::CommandSpec;
use crate::utils;

/// Current branch and short status of the repository.
pub async fn git_info(ctx: &RunContext) -> Result<(), RunError> {
    let branch = CommandSpec::new("git", &ctx.dir)
        .args(["branch", "--show-current"])
        .capture()
        .await?;
    let status = CommandSpec::new("git", &ctx.dir)
        .args(["status", "--short"])
        .capture()
        .await?;
    println!();
    println!("  branch: {}", branch.trim());
    if status.trim().is_empty() {
        println!("  working tree clean");
    } else {
        for line in status.lines() {
            println!("  {}", line);
        }
    }
    println!();
    Ok(())
}

/// Run the conventional `dev` script of the current descriptor.
pub async fn dev(ctx: &RunContext) -> Result<(), RunError> {
    crate::ops::script::run(ctx, "dev", &[], true, false).await
}

pub fn nanoid() {
    println!("{}", utils::short_id());
}

const META_TYPES: &[&str] = &[
    "project",
    "app",
    "container",
    "cluster",
    "cluster_app",
    "component",
    "db",
    "pod",
    "config",
    "script",
];

/// Interactively scaffold a meta.json in the current directory.
pub async fn meta_create(ctx: &RunContext) -> Result<(), RunError> {
    let path = ctx.dir.join(META_FILENAME);
    if path.exists() {
        let overwrite = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("'{}' exists. Overwrite?", path.display()))
            .default(false)
            .interact()
            .map_err(|e| RunError::Config(e.to_string()))?;
        if !overwrite {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let kind_idx = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Descriptor type")
        .items(META_TYPES)
        .default(1)
        .interact()
        .map_err(|e| RunError::Config(e.to_string()))?;
    let name: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Name")
        .default(utils::dir_name(&ctx.dir))
        .interact_text()
        .map_err(|e| RunError::Config(e.to_string()))?;
    let id: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Id")
        .default(utils::short_id())
        .interact_text()
        .map_err(|e| RunError::Config(e.to_string()))?;

    let doc = json!({
        "id": id,
        "name": name,
        "type": META_TYPES[kind_idx],
    });
    std::fs::write(&path, serde_json::to_string_pretty(&doc)?)?;
    display::print_success(&format!("Wrote {}", path.display()));
    Ok(())
}

/// Set a (possibly dot-nested) field in the raw descriptor document,
/// creating intermediate objects as needed.
pub fn set_dotted(doc: &mut Value, property: &str, value: Value) {
    let mut current = doc;
    let segments: Vec<&str> = property.split('.').collect();
    for (i, segment) in segments.iter().enumerate() {
        if i == segments.len() - 1 {
            current[*segment] = value;
            return;
        }
        if !current[*segment].is_object() {
            current[*segment] = json!({});
        }
        current = &mut current[*segment];
    }
}

/// Parse a CLI value string as JSON when possible, keeping it a string
/// otherwise, so `true`, `3` and `api` all do the expected thing.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// `meta change`/`meta add`: set a field of the current descriptor.
pub async fn meta_set(ctx: &RunContext, property: &str, value: &str) -> Result<(), RunError> {
    let mut meta = ctx.meta()?;
    set_dotted(&mut meta.raw, property, parse_value(value));
    meta.save(&ctx.dir)?;
    display::print_success(&format!("Set {} = {}", property, value));
    Ok(())
}

/// Assign a fresh id to every descriptor under the root missing one.
pub async fn meta_ids(ctx: &RunContext) -> Result<(), RunError> {
    let root = ctx.source_root();
    let mut dirs: Vec<_> = vec![root.clone()];
    dirs.extend(walker::walk_all_subdirectories(&root, &[]));

    let mut assigned = 0;
    for dir in dirs {
        let mut meta = match Meta::load(&dir) {
            Ok(Some(meta)) => meta,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("{}", e);
                continue;
            }
        };
        if meta.id.is_none() {
            let id = utils::short_id();
            set_dotted(&mut meta.raw, "id", Value::String(id.clone()));
            meta.save(&dir)?;
            tracing::info!("Assigned id {} to '{}'", id, dir.display());
            assigned += 1;
        }
    }
    display::print_success(&format!("{} id(s) assigned", assigned));
    Ok(())
}

const COMMIT_TYPES: &[&str] = &["feat", "fix", "chore", "docs", "refactor", "test"];

/// Interactive conventional commit.
pub async fn commit(ctx: &RunContext) -> Result<(), RunError> {
    let type_idx = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Commit type")
        .items(COMMIT_TYPES)
        .default(0)
        .interact()
        .map_err(|e| RunError::Config(e.to_string()))?;
    let message: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Message")
        .interact_text()
        .map_err(|e| RunError::Config(e.to_string()))?;

    let full = format!("{}: {}", COMMIT_TYPES[type_idx], message);
    CommandSpec::new("git", &ctx.dir)
        .args(["add", "-A"])
        .capture()
        .await?;
    CommandSpec::new("git", &ctx.dir)
        .args(["commit", "-m", full.as_str()])
        .streamed()
        .await?;
    display::print_success(&full);
    Ok(())
}

/// Report every descriptor under the root with its type: the discovery
/// view of the repository.
pub async fn dependencies(ctx: &RunContext) -> Result<(), RunError> {
    let matches = find_directories_matching(&ctx.source_root(), "type", None)?;
    println!();
    display::print_matches(&matches);
    println!();
    Ok(())
}

/// Print the enclosing project root and its descriptor summary.
pub async fn repo(ctx: &RunContext) -> Result<(), RunError> {
    match find_project_root(&ctx.dir)? {
        Some((dir, meta)) => {
            println!();
            println!("  project root: {}", dir.display());
            if let Some(id) = &meta.id {
                println!("  id: {}", id);
            }
            if let Some(name) = &meta.name {
                println!("  name: {}", name);
            }
            println!();
        }
        None => display::print_error("No enclosing project descriptor found"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_dotted_creates_intermediate_objects() {
        let mut doc = json!({"type": "app"});
        set_dotted(&mut doc, "cluster.tls", json!(true));
        assert_eq!(doc["cluster"]["tls"], json!(true));
        assert_eq!(doc["type"], json!("app"));
    }

    #[test]
    fn set_dotted_overwrites_existing_leaf() {
        let mut doc = json!({"docker": {"image": "old"}});
        set_dotted(&mut doc, "docker.image", json!("new"));
        assert_eq!(doc["docker"]["image"], json!("new"));
    }

    #[test]
    fn cli_values_parse_as_json_when_possible() {
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value("3"), json!(3));
        assert_eq!(parse_value("api"), json!("api"));
    }
}
