//! Task tracking server.
//!
//! Usage:
//!
//! ```text
//! tasktrack init [--output config.toml]
//! tasktrack run [--config config.toml] [--listen 0.0.0.0:8080]
//! ```
//!
//! `run` loads configuration from defaults, the TOML file, `TASKTRACK_`
//! environment variables, and finally command-line flags. Failing to reach
//! the task store at startup aborts the process.

use std::{fs, net::SocketAddr, path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use diesel::r2d2::{ConnectionManager, Pool};
use figment::providers::Serialized;
use mockable::DefaultClock;
use serde::Serialize;
use tasktrack::{
    config::Config,
    http::router,
    task::{
        adapters::postgres::{PostgresTaskRepository, TaskPgPool},
        services::{TaskRunner, TaskTrackingService},
    },
    telemetry::init_tracing,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Parser)]
#[command(
    name = "tasktrack",
    version,
    about = "Asynchronous task tracking server",
    long_about = "Accepts anonymous tasks over HTTP, runs them in the background, \
                  and reports their status."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write a default configuration file.
    Init {
        /// Path where the configuration file will be written.
        #[clap(short, long, default_value = "config.toml")]
        output: PathBuf,
    },
    /// Serve the task API.
    Run {
        /// Path to the configuration file.
        #[clap(short, long("config"), default_value = "config.toml")]
        config_file: PathBuf,

        /// Address to listen on, overriding the configuration file.
        #[clap(long("listen"))]
        listen_address: Option<SocketAddr>,
    },
}

/// Command-line values merged over file and environment configuration.
#[derive(Debug, Serialize)]
struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    listen_address: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    init_tracing();

    match Cli::parse().command {
        Commands::Init { output } => {
            fs::write(&output, Config::default().to_toml()?)?;
            info!(path = %output.display(), "configuration written");
            Ok(())
        }
        Commands::Run {
            config_file,
            listen_address,
        } => {
            let overrides = Overrides { listen_address };
            let figment = Config::figment(&config_file).merge(Serialized::defaults(overrides));
            let config = Config::from_figment(&figment)?;
            run(config).await
        }
    }
}

async fn run(config: Config) -> Result<(), BoxError> {
    let pool = connect(&config).await?;
    let repository = Arc::new(PostgresTaskRepository::new(pool, config.store.table.clone()));
    repository.ensure_schema().await?;
    info!(
        host = %config.store.host,
        database = %config.store.database,
        table = %config.store.table,
        "task store ready"
    );

    let clock = Arc::new(DefaultClock);
    let runner = TaskRunner::new(
        Arc::clone(&repository),
        Arc::clone(&clock),
        config.work_duration(),
    );
    let service = TaskTrackingService::new(repository, clock, runner.clone());

    let listener = TcpListener::bind(config.listen_address).await?;
    info!(address = %listener.local_addr()?, "serving");
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let in_flight = runner.in_flight();
    if in_flight > 0 {
        info!(in_flight, "waiting for task runs to finish");
    }
    if !runner.shutdown_within(config.shutdown_grace()).await {
        warn!(
            remaining = runner.in_flight(),
            "shutdown grace period elapsed, unfinished tasks stay in their last status"
        );
    }
    Ok(())
}

/// Builds the connection pool, failing when the store is unreachable.
async fn connect(config: &Config) -> Result<TaskPgPool, BoxError> {
    let manager = ConnectionManager::new(config.store.database_url());
    let max_size = config.store.max_connections;
    let timeout = config.store.connect_timeout();
    let pool = tokio::task::spawn_blocking(move || {
        Pool::builder()
            .max_size(max_size)
            .connection_timeout(timeout)
            .build(manager)
    })
    .await??;
    Ok(pool)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
