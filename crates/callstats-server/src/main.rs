//! callstats server
//!
//! Runs the reference signaling hub (`/v1/ws`) and the metrics endpoint on two
//! listeners. Config comes from `$CALLSTATS_CONFIG` (default
//! `callstats.yaml`, optional), with `SIGNALING_PORT` / `METRICS_PORT`
//! overriding the listen ports.

use tracing_subscriber::{fmt, EnvFilter};

use callstats_core::error::{Result, StatsError};
use callstats_server::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "callstats-server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::var("CALLSTATS_CONFIG").unwrap_or_else(|_| "callstats.yaml".to_string());
    let mut cfg = config::load_or_default(&path)?;
    cfg.apply_env_overrides()?;
    cfg.validate()?;

    let signaling_addr = cfg.signaling.listen_addr()?;
    let metrics_addr = cfg.metrics.listen_addr()?;
    let metrics_path = cfg.metrics.path.clone();

    let state = app_state::AppState::new(cfg)?;
    let signaling_app = router::build_signaling_router(state.clone());
    let ops_app = router::build_ops_router(state);

    let bind_err = |e: std::io::Error| StatsError::Internal(format!("bind failed: {e}"));
    let signaling_listener = tokio::net::TcpListener::bind(signaling_addr).await.map_err(bind_err)?;
    let ops_listener = tokio::net::TcpListener::bind(metrics_addr).await.map_err(bind_err)?;

    tracing::info!(%signaling_addr, %metrics_addr, path = %metrics_path, "callstats-server started");

    let serve_err = |e: std::io::Error| StatsError::Internal(format!("server failed: {e}"));
    tokio::try_join!(
        async { axum::serve(signaling_listener, signaling_app).await.map_err(serve_err) },
        async { axum::serve(ops_listener, ops_app).await.map_err(serve_err) },
    )?;

    Ok(())
}
