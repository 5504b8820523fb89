pub mod bootstrap;
pub mod health;
pub mod webhook;

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use reliefline_core::config::{AppConfig, LoadOptions};
use reliefline_db::repositories::{SqlAidRequestRepository, SqlInsuranceClaimRepository};

use crate::webhook::WebhookState;

pub fn init_logging(config: &AppConfig) {
    use reliefline_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;

    let state = WebhookState {
        aid_requests: Arc::new(SqlAidRequestRepository::new(app.db_pool.clone())),
        insurance_claims: Arc::new(SqlInsuranceClaimRepository::new(app.db_pool.clone())),
        session_project_id: app.session_project_id.clone(),
    };
    let router = Router::new()
        .merge(webhook::router(state))
        .merge(health::router(app.db_pool.clone()));

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = TcpListener::bind(&address).await?;
    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "reliefline webhook listening"
    );

    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    serve_with_grace(listener, router, wait_for_shutdown(), grace).await?;

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "reliefline webhook stopping"
    );
    app.db_pool.close().await;

    Ok(())
}

/// Serve until `shutdown` resolves, then give in-flight requests up to
/// `grace` to drain before abandoning them.
pub async fn serve_with_grace(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
    grace: Duration,
) -> Result<()> {
    let (drain_tx, drain_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server = tokio::spawn(
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = drain_rx.await;
            })
            .into_future(),
    );

    tokio::select! {
        joined = &mut server => {
            // The listener failed before any shutdown was requested.
            joined??;
            return Ok(());
        }
        _ = shutdown => {}
    }

    let _ = drain_tx.send(());
    match tokio::time::timeout(grace, &mut server).await {
        Ok(joined) => joined??,
        Err(_) => {
            server.abort();
            tracing::warn!(
                event_name = "system.server.drain_timeout",
                correlation_id = "shutdown",
                grace_secs = grace.as_secs(),
                "open requests did not drain within the shutdown grace period"
            );
        }
    }

    Ok(())
}

async fn wait_for_shutdown() {
    let _ = tokio::signal::ctrl_c().await;
}
