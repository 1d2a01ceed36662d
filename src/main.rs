// ABOUTME: Main entry point for comparedb: serves the compare page and API, or runs a comparison
// ABOUTME: Sets up logging, reads configuration and dispatches the chosen subcommand

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use comparedb::{
    AppState, build_router,
    client::CompareClient,
    config::{Cli, Command, CompareArgs, ServeArgs},
    provider::Provider,
    types::{ModelConfig, Pane},
    workbench::Workbench,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Compare(args) => compare(args).await,
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let provider = Provider::new(args.provider_url.as_str(), args.provider_timeout())
        .context("failed to build provider client")?;
    let default_model = args.default_model();

    tracing::info!(
        provider = provider.base_url(),
        default_model = default_model.as_deref().unwrap_or("<none>"),
        "provider configured"
    );

    let app = build_router(AppState {
        provider,
        default_model,
    });

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    tracing::info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn compare(args: CompareArgs) -> anyhow::Result<()> {
    let source = tokio::fs::read_to_string(&args.source)
        .await
        .with_context(|| format!("failed to read {}", args.source.display()))?;
    let target = tokio::fs::read_to_string(&args.target)
        .await
        .with_context(|| format!("failed to read {}", args.target.display()))?;

    let config = ModelConfig::new(args.api_key, args.model)?;
    let client = CompareClient::new(&args.server);

    let mut bench = Workbench::new();
    bench.set_schema(Pane::Source, source);
    bench.set_schema(Pane::Target, target);

    let result = bench.compare(&client, &config).await?;

    println!("-- Changes ({})", result.changes.len());
    for change in &result.changes {
        println!("--   * {}", change);
    }
    println!();
    println!("{}", result.sql_script);
    Ok(())
}
