mod cli;
mod config;
mod context;
mod discovery;
mod error;
mod exec;
mod ops;
mod utils;

use clap::Parser;
use cli::commands::Cli;
use context::RunContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let ctx = RunContext::new(cli.cible, cli.path, cli.env_filename)?;
    cli::handle_command(&ctx, cli.command).await?;

    Ok(())
}
