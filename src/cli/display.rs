use console::style;

use crate::discovery::{MetaMatch, SecretEnv};
use crate::exec::BatchReport;

pub fn print_success(msg: &str) {
    println!("  {} {}", style("OK").green().bold(), msg);
}

pub fn print_error(msg: &str) {
    println!("  {} {}", style("ERROR").red().bold(), msg);
}

pub fn print_batch_report(report: &BatchReport) {
    println!();
    for name in &report.succeeded {
        println!("  {} {}", style("OK").green().bold(), name);
    }
    for (name, reason) in &report.failed {
        println!("  {} {} - {}", style("FAIL").red().bold(), name, reason);
    }
    println!(
        "  {} succeeded, {} failed",
        report.succeeded.len(),
        report.failed.len()
    );
    println!();
}

pub fn print_matches(matches: &[MetaMatch]) {
    if matches.is_empty() {
        println!("  {}", style("No matching directories.").dim());
        return;
    }
    println!(
        "  {:<20} {:<14} {}",
        style("NAME").bold(),
        style("TYPE").bold(),
        style("DIRECTORY").bold(),
    );
    println!("  {}", "-".repeat(70));
    for m in matches {
        let name = m
            .meta
            .name
            .as_deref()
            .or(m.meta.id.as_deref())
            .unwrap_or("--");
        let kind = m
            .meta
            .kind
            .map(|k| k.to_string())
            .unwrap_or_else(|| "--".to_string());
        println!("  {:<20} {:<14} {}", name, kind, m.directory.display());
    }
}

/// Print a resolved environment, values masked beyond a short prefix.
pub fn print_env(env: &SecretEnv) {
    if env.is_empty() {
        println!("  {}", style("Empty environment.").dim());
        return;
    }
    for (key, value) in env {
        let shown = if value.chars().count() > 4 {
            let prefix: String = value.chars().take(2).collect();
            format!("{}{}", prefix, "*".repeat(value.chars().count().min(12) - 2))
        } else {
            "****".to_string()
        };
        println!("  {}={}", style(key).bold(), shown);
    }
}

pub fn print_tool_row(tool: &str, available: bool, detail: &str) {
    let mark = if available {
        style("OK").green().bold().to_string()
    } else {
        style("MISSING").red().bold().to_string()
    };
    println!("  {:<14} {:<8} {}", tool, mark, style(detail).dim());
}
