//! Workbench Server: local workspace browser and editor backend.
//!
//! Main entry point that loads configuration, applies command-line
//! overrides and starts the HTTP server.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use workbench_core::config::AppConfig;
use workbench_core::error::AppError;

/// Command-line overrides applied on top of the loaded configuration.
#[derive(Debug, Parser)]
#[command(name = "workbench-server", version, about = "Serve a local workspace over HTTP")]
struct Cli {
    /// Workspace root directory
    #[arg(long)]
    root: Option<String>,

    /// Base directory the root may be switched within
    #[arg(long)]
    base_root: Option<String>,

    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// Bind port
    #[arg(short, long)]
    port: Option<u16>,

    /// Configuration overlay name (`config/{env}.toml`)
    #[arg(long, env = "WORKBENCH_ENV", default_value = "development")]
    env: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    tracing::info!(
        env = %cli.env,
        root = %config.workspace.root,
        "Starting Workbench v{}",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = workbench_api::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment, then apply CLI flags.
fn load_configuration(cli: &Cli) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load(&cli.env)?;

    if let Some(ref root) = cli.root {
        config.workspace.root = root.clone();
    }
    if let Some(ref base_root) = cli.base_root {
        config.workspace.base_root = base_root.clone();
    }
    if let Some(ref host) = cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    Ok(config)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
