//! Readiness probe.
//!
//! Reports whether the dependencies needed to serve traffic are available.
//! The dependency statuses come from the configured probe.

use axum::{extract::State, http::Method, Json};
use chrono::Utc;
use tracing::instrument;

use crate::error::ApiError;
use crate::report::{readiness_report, ProbeError};
use crate::state::AppState;

/// `/api/ready` handler. Only GET is accepted.
#[instrument(name = "ready::ready", skip(state))]
pub async fn ready(
    method: Method,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if method != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }

    let report = readiness_report(state.probe.as_ref(), Utc::now()).map_err(ApiError::NotReady)?;

    let body =
        serde_json::to_value(&report).map_err(|e| ApiError::NotReady(ProbeError::from(e)))?;

    Ok(Json(body))
}
