//! Liveness probe.
//!
//! Reports that the process is up and able to answer HTTP, together with
//! uptime, memory usage and deployment identity. Used by Kubernetes, ECS,
//! systemd and load balancers.

use axum::{extract::State, http::Method, Json};
use chrono::Utc;
use tracing::instrument;

use crate::error::ApiError;
use crate::report::{health_report, ProbeError};
use crate::state::AppState;

/// `/api/health` handler. Only GET is accepted.
#[instrument(name = "health::health", skip(state))]
pub async fn health(
    method: Method,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if method != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }

    let report = health_report(
        state.probe.as_ref(),
        &state.config.app,
        state.uptime(),
        Utc::now(),
    )
    .map_err(ApiError::Unhealthy)?;

    let body = serde_json::to_value(&report)
        .map_err(|e| ApiError::Unhealthy(ProbeError::from(e)))?;

    Ok(Json(body))
}
