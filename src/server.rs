//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, background workers, and the Axum server lifecycle.

use crate::application::services::rate_limiter::spawn_sweeper;
use crate::application::services::{AuthService, RateLimits};
use crate::config::Config;
use crate::domain::click_worker::{ClickPipeline, ClickRecorder, run_click_worker, wait_for_drain};
use crate::domain::repositories::{ClickLogRepository, LinkRepository};
use crate::infrastructure::geo;
use crate::infrastructure::persistence::{PgClickLogRepository, PgLinkRepository};
use crate::infrastructure::probe::HttpTargetProbe;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Background click worker and rate-limit sweeper
/// - Axum HTTP server with graceful shutdown, then a bounded click queue drain
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    let pool = Arc::new(pool);
    let links: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(Arc::clone(&pool)));
    let click_logs: Arc<dyn ClickLogRepository> =
        Arc::new(PgClickLogRepository::new(Arc::clone(&pool)));

    let mut pipeline = ClickPipeline::new(
        Arc::clone(&click_logs),
        geo::from_config(config.geo_lookup_url.as_deref()),
    );
    if config.click_probe_target {
        pipeline = pipeline.with_probe(Arc::new(HttpTargetProbe::new()));
        tracing::info!("Target probing enabled for recorded clicks");
    }

    let (click_recorder, click_rx) = ClickRecorder::channel(config.click_queue_capacity);
    let click_worker = tokio::spawn(run_click_worker(
        click_rx,
        pipeline,
        config.click_worker_concurrency,
    ));

    let rate_limits = RateLimits::new(config.general_rate_limit, config.otp_rate_limit)
        .context("Invalid rate limit configuration")?;
    spawn_sweeper(
        rate_limits.clone(),
        Duration::from_secs(config.rate_limit_sweep_secs),
    );

    let state = AppState::new(
        links,
        click_logs,
        AuthService::new(&config.jwt_secret),
        rate_limits,
        click_recorder,
        config.code_max_attempts,
        config.behind_proxy,
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address: {}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped, draining click queue");
    if wait_for_drain(
        click_worker,
        Duration::from_secs(config.click_drain_timeout_secs),
    )
    .await
    {
        tracing::info!("Click queue drained");
    }
    Ok(())
}

/// Resolves on SIGINT or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received, draining connections");
}
