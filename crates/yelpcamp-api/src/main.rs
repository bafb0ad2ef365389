//! # yelpcamp-api: Binary Entry Point
//!
//! Starts the Axum HTTP server. Binds to `PORT` (default 3000) and uses
//! PostgreSQL when `DATABASE_URL` is set.

use axum::extract::Request;
use axum::ServiceExt;
use tracing_subscriber::EnvFilter;
use yelpcamp_api::state::{AppConfig, AppState};
use yelpcamp_store::Repository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::from_env();
    tracing::info!(?config, "configuration loaded");

    // Absent DATABASE_URL means in-memory only.
    let repository = Repository::connect(config.database_url.as_deref(), config.repository_options())
        .await
        .map_err(|e| {
            tracing::error!("Database initialization failed: {e}");
            e
        })?;

    let port = config.port;
    let state = AppState::new(config, repository.clone());
    let app = yelpcamp_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("YelpCamp listening on {}", addr);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    repository.close().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Structured logging. `RUST_LOG` filters (default `info`); `LOG_FORMAT=json`
/// switches to one JSON object per line.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
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
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down gracefully"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down gracefully"),
    }
}
