//! Axum router wiring.
//!
//! Two routers, served on separate listeners: the signaling router
//! (`/v1/ws` upgrade) and the ops router (`/healthz` and the metrics path).

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops, transport};

pub fn build_signaling_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/ws", get(transport::ws::ws_upgrade))
        .with_state(state)
}

pub fn build_ops_router(state: AppState) -> Router {
    let path = state.cfg().metrics.path.clone();
    Router::new()
        .route("/healthz", get(ops::healthz))
        .route(&path, get(ops::metrics))
        .with_state(state)
}
