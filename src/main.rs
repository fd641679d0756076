//! GymHub Server: gym scheduling and messaging backend.
//!
//! Main entry point that loads configuration, initializes logging and
//! dispatches to the server or the migration runner.

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use gymhub_core::config::{AppConfig, StoreBackend};
use gymhub_core::error::AppError;
use gymhub_database::DatabasePool;
use gymhub_database::migration::run_migrations;

/// GymHub server.
#[derive(Debug, Parser)]
#[command(name = "gymhub-server", version, about)]
struct Cli {
    /// Configuration environment overlay (`config/{env}.toml`).
    #[arg(long, env = "GYMHUB_ENV", default_value = "development")]
    env: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Start the HTTP server (default).
    Serve,
    /// Apply document store migrations and exit.
    Migrate,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %cli.env, "Starting GymHub v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => gymhub_api::run_server(config).await,
        Command::Migrate => migrate(&config).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "GymHub exited with an error");
        std::process::exit(1);
    }
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

async fn migrate(config: &AppConfig) -> Result<(), AppError> {
    if config.database.backend == StoreBackend::Memory {
        tracing::info!("Memory store configured; nothing to migrate");
        return Ok(());
    }

    let db = DatabasePool::connect(&config.database).await?;
    run_migrations(&db).await?;
    db.close().await;
    Ok(())
}
