//! portsync daemon - keeps qBittorrent's listening port on the VPN's
//! forwarded port
//!
//! Runs as a sidecar next to the VPN gateway and qBittorrent containers:
//! - Logs in to the qBittorrent WebUI, retrying while it starts up
//! - Reads the forwarded port from the gateway API or its port file
//! - Updates qBittorrent's listening port when it differs
//! - Stops gracefully on SIGTERM/SIGINT
//!
//! # Exit status
//!
//! `0` after a graceful shutdown or a successful single update, `1` when
//! the login gives up or the single update fails, `2` for invalid
//! configuration.

use anyhow::{Context, Result};
use portsync_core::config::LoggingConfig;
use portsync_gateway::GatewayPortSource;
use portsync_qbit::QbitSession;
use portsync_sync::Scheduler;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod cli;

// ============================================================================
// Tracing
// ============================================================================

/// Installs the global subscriber; `RUST_LOG` overrides the configured level
fn init_tracing(logging: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

// ============================================================================
// Graceful shutdown signal handler
// ============================================================================

/// Waits for SIGTERM or SIGINT and triggers the cancellation token
///
/// A handler that cannot be installed is logged and never fires.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}

// ============================================================================
// Main entry point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let config = cli::Args::load();
    init_tracing(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        qbittorrent = %config.qbit_url(),
        gateway = config.gateway_url().as_deref().unwrap_or("disabled"),
        port_file = ?config.gateway.port_file,
        interval_secs = config.sync.poll_interval,
        "portsync daemon starting (portsyncd)"
    );

    let shutdown_token = CancellationToken::new();

    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        shutdown_signal(signal_token).await;
    });

    let source = GatewayPortSource::from_config(&config);
    let session =
        QbitSession::from_config(&config.qbit).context("Invalid qBittorrent WebUI address")?;
    let mut scheduler = Scheduler::from_config(source, session, &config);

    let result = scheduler.run(&shutdown_token).await;

    match &result {
        Ok(()) => info!("portsync daemon shut down gracefully"),
        Err(e) => error!(error = %e, "portsync daemon exiting with error"),
    }

    result.context("Port sync failed")
}
