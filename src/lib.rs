use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};

pub mod api;
pub mod config;
pub mod error;
pub mod ingest;
pub mod storage;

use config::Config;

pub struct AppState {
    pub config: Config,
    pub store: storage::DatasetStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            store: storage::DatasetStore::new(),
        }
    }
}

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let addr = config.bind_addr;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "couldn't listen");
            return Err(e).with_context(|| format!("couldn't listen on {addr}"));
        }
    };
    let state = Arc::new(AppState::new(config));

    // broadcast channel for shutdown signaling
    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);

    let http_shutdown = shutdown_tx.clone();
    let mut server = tokio::spawn(async move {
        api::http::run(listener, state, http_shutdown).await
    });
    info!(%addr, "listening");

    tokio::select! {
        signal = shutdown_signal() => {
            let signal = signal?;
            info!(signal, "caught signal, shutting down");
        }
        served = &mut server => {
            // the server only returns on its own when it fails
            return served.context("http server task panicked")?;
        }
    }

    let _ = shutdown_tx.send(());
    match tokio::time::timeout(SHUTDOWN_GRACE, server).await {
        Ok(served) => served.context("http server task panicked")?,
        Err(_) => {
            warn!("in-flight requests still open after grace period, exiting anyway");
            Ok(())
        }
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> anyhow::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res?;
            Ok("SIGINT")
        }
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> anyhow::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}
