//! HomeNest HTTP Server Binary
//!
//! This is the main entry point for the HomeNest REST API server.
//! It connects the repository once, sets up the HTTP router, and serves requests
//! until Ctrl-C or SIGTERM.
//!
//! # Usage
//!
//! ```bash
//! # Run with local (in-memory) repository (default)
//! cargo run --bin homenest-server
//!
//! # Run against MongoDB
//! DB_USERNAME=app DB_PASSWORD=secret DB_CLUSTER=cluster0.abcde \
//!   cargo run --bin homenest-server --features mongo-repo
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 3000)
//! - `REPOSITORY_TYPE`: `mongo` or `local` (inferred when unset)
//! - `MONGODB_URI`, or `DB_USERNAME` / `DB_PASSWORD` / `DB_CLUSTER`: store credentials
//! - `RUST_LOG`: Log filter (default: info)
//!
//! When none of `REPOSITORY_TYPE`, `MONGODB_URI` or `DB_CLUSTER` is set, a
//! `repository.toml` in the working directory, `backend/` or the parent
//! directory is used instead.
//!
//! A `.env` file in the working directory is loaded first when present.

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use homenest::config::ServerConfig;
use homenest::db::RepositoryFactory;
use homenest::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => error!("Ignoring unreadable .env file: {}", e),
    }

    info!("Starting HomeNest HTTP Server");

    let server_config = ServerConfig::from_env().map_err(anyhow::Error::msg)?;

    // Connect once; the store handle is shared by every request
    let repository = match RepositoryFactory::from_env_or_default_config().await {
        Ok(repo) => repo,
        Err(e) => {
            error!("Failed to initialize repository: {}", e);
            return Err(e).context("repository initialization failed");
        }
    };
    info!("Repository initialized successfully");

    let state = AppState::new(repository.clone());
    let app = create_router(state);

    let addr = server_config.socket_addr().with_context(|| {
        format!(
            "invalid bind address {}:{}",
            server_config.host, server_config.port
        )
    })?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped, closing repository");
    if let Err(e) = repository.shutdown().await {
        error!("Repository shutdown failed: {}", e);
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
