//! Operational HTTP endpoints.
//!
//! - `/healthz`         : liveness
//! - `<metrics.path>`   : Prometheus text format (default `/metrics`)

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use callstats_core::error::Result;

use crate::app_state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Serialize the registry. An encoding failure fails this scrape only; the
/// next scrape retries.
pub async fn metrics(State(state): State<AppState>) -> Response {
    let registry = state.metrics();
    exposition(registry.render(), registry.content_type())
}

/// Turn a render result into the scrape response.
pub fn exposition(rendered: Result<String>, content_type: &'static str) -> Response {
    match rendered {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "metrics render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
