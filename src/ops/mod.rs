pub mod action;
pub mod cluster;
pub mod docker;
pub mod hasura;
pub mod machine;
pub mod passthrough;
pub mod script;
pub mod terraform;
pub mod tunnel;
pub mod utils_cmd;
pub mod vault;

use crate::config::meta::find_project_root;
use crate::context::RunContext;
use crate::error::RunError;

/// Identifier of the nearest enclosing project, used to namespace remote
/// state: image repositories, backend prefixes, secret paths.
pub fn project_id(ctx: &RunContext) -> Result<String, RunError> {
    if let Some((dir, meta)) = find_project_root(&ctx.dir)? {
        return meta.id(&dir).map(str::to_string);
    }
    Err(RunError::Config(format!(
        "no enclosing project descriptor with an id above '{}'",
        ctx.dir.display()
    )))
}

/// Image reference of the form `<registry>/<project>/<name>:<tag>`.
pub fn image_tag(registry: &str, project: &str, image: &str, tag: &str) -> String {
    format!("{}/{}/{}:{}", registry, project, image, tag)
}
