//! Storefront server binary.
//!
//! Commands:
//! - `storefront serve` - Run the HTTP API (default)
//! - `storefront config` - Print the effective configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;

use storefront_server::config::{LogFormat, ServerConfig};
use storefront_server::{logging, router, AppState};

/// Storefront - fashion e-commerce API server
#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file path (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),

    /// Print the effective configuration with secrets masked
    Config,
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Address to listen on, overrides the config file
    #[arg(short, long)]
    bind: Option<String>,

    /// Product seed file (JSON array), overrides the config file
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ServerConfig::resolve(cli.config.as_deref())?;
    config.apply_env();

    match cli.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => serve(config, args).await,
        Commands::Config => {
            let rendered = toml::to_string_pretty(&config.redacted())
                .context("Failed to render configuration")?;
            println!("{}", rendered);
            Ok(())
        }
    }
}

async fn serve(mut config: ServerConfig, args: ServeArgs) -> Result<()> {
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(seed) = args.seed {
        config.seed.products = Some(seed);
    }
    if args.log_json {
        config.server.log_format = LogFormat::Json;
    }

    logging::init_tracing(config.server.log_format == LogFormat::Json);

    let state = AppState::from_config(&config)?;
    if let Some(path) = &config.seed.products {
        state.catalog.seed_from_file(path).await?;
    }

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    info!(addr = %config.server.bind, currency = %config.pricing.currency, "storefront listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("storefront stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
