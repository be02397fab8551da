use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::cli::display;
use crate::context::RunContext;
use crate::error::RunError;
use crate::exec::CommandSpec;

/// Every external CLI the tool shells out to, with its version probe.
const TOOLS: &[(&str, &[&str])] = &[
    ("docker", &["--version"]),
    ("terraform", &["version"]),
    ("kubectl", &["version", "--client", "--output=yaml"]),
    ("kustomize", &["version"]),
    ("hasura", &["version", "--skip-update-check"]),
    ("vault", &["version"]),
    ("gh", &["--version"]),
    ("act", &["--version"]),
    ("cloudflared", &["--version"]),
    ("gcloud", &["--version"]),
    ("skaffold", &["version"]),
    ("vercel", &["--version"]),
    ("npm", &["--version"]),
    ("git", &["--version"]),
];

/// Probe every wrapped CLI and print a readiness table.
pub async fn init(ctx: &RunContext) -> Result<(), RunError> {
    println!();
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));

    let mut missing = 0;
    let mut rows = Vec::new();
    for (tool, args) in TOOLS {
        spinner.set_message(format!("Probing {}...", tool));
        let probe = CommandSpec::new(*tool, &ctx.dir)
            .args(args.iter().copied())
            .capture_result()
            .await;
        match probe {
            Ok(result) if result.success => {
                let version = result
                    .stdout
                    .lines()
                    .next()
                    .unwrap_or("")
                    .trim()
                    .to_string();
                rows.push((*tool, true, version));
            }
            _ => {
                rows.push((*tool, false, "not installed or not on PATH".to_string()));
                missing += 1;
            }
        }
    }
    spinner.finish_and_clear();

    for (tool, available, detail) in &rows {
        display::print_tool_row(tool, *available, detail);
    }
    println!();
    if missing > 0 {
        display::print_error(&format!("{} tool(s) missing", missing));
    } else {
        display::print_success("All wrapped tools are available");
    }
    Ok(())
}
