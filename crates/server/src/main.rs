use std::future::IntoFuture;
use std::time::Duration;

use config::{ConfigError, ServerConfig};
use db::DbErr;
use server::{Deployment, http};
use thiserror::Error;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, prelude::*};

const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TaskBoardError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid log filter: {0}")]
    LogFilter(String),
}

#[tokio::main]
async fn main() -> Result<(), TaskBoardError> {
    init_tracing()?;

    let config = ServerConfig::from_env()?;
    let deployment = match Deployment::new(&config).await {
        Ok(deployment) => deployment,
        Err(err) => {
            tracing::error!(error = %err, "Failed to connect to database");
            return Err(err.into());
        }
    };

    let app_router = http::router(deployment, &config.cors_allowed_origins);
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!("Server running on http://{local_addr}");

    let shutdown_rx = spawn_shutdown_watcher();
    let server = axum::serve(listener, app_router)
        .with_graceful_shutdown(wait_for_watch_true(shutdown_rx.clone()))
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        res = &mut server => res?,
        _ = shutdown_deadline(shutdown_rx, GRACEFUL_SHUTDOWN_TIMEOUT) => {
            tracing::warn!(
                "Graceful shutdown timed out after {:?}, exiting immediately",
                GRACEFUL_SHUTDOWN_TIMEOUT
            );
            std::process::exit(130);
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing() -> Result<(), TaskBoardError> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_string = format!(
        "warn,server={level},db={level},config={level},tower_http={level}",
        level = log_level
    );
    let env_filter = EnvFilter::try_new(filter_string)
        .map_err(|err| TaskBoardError::LogFilter(err.to_string()))?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();
    Ok(())
}

/// Flips the returned watch to `true` on the first SIGINT or SIGTERM.
fn spawn_shutdown_watcher() -> watch::Receiver<bool> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(sig) => Some(sig),
                Err(e) => {
                    tracing::error!("Failed to install SIGTERM handler: {e}");
                    None
                }
            };

            tokio::select! {
                res = tokio::signal::ctrl_c() => {
                    if let Err(e) = res {
                        tracing::error!("Failed to install Ctrl+C handler: {e}");
                        return;
                    }
                },
                _ = async {
                    match sigterm.as_mut() {
                        Some(sigterm) => { sigterm.recv().await; }
                        None => std::future::pending::<()>().await,
                    }
                } => {},
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to install Ctrl+C handler: {e}");
                return;
            }
        }

        tracing::info!("Shutdown signal received, starting graceful shutdown");
        let _ = shutdown_tx.send(true);
    });

    shutdown_rx
}

async fn wait_for_watch_true(mut rx: watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }

        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

async fn shutdown_deadline(rx: watch::Receiver<bool>, timeout: Duration) {
    wait_for_watch_true(rx).await;
    tokio::time::sleep(timeout).await;
}
