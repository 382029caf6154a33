//! Error types and their HTTP representations.
//!
//! `ApiError` covers the JSON probe endpoints. `AppError` covers HTML pages and
//! is rendered as an error page carrying the request id for log correlation.

use axum::{
    http::{
        header::{ALLOW, CACHE_CONTROL},
        HeaderValue, StatusCode,
    },
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::config::{
    CACHE_CONTROL_NO_STORE, HEALTH_FAILED_LABEL, METHOD_NOT_ALLOWED_MESSAGE, READINESS_FAILED_LABEL,
};
use crate::middleware::RequestId;
use crate::report::{iso_timestamp, HealthStatus, ProbeError, ReadinessStatus};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Health check failed: {0}")]
    Unhealthy(#[source] ProbeError),

    #[error("Readiness check failed: {0}")]
    NotReady(#[source] ProbeError),
}

#[derive(Serialize)]
struct Rejection {
    message: &'static str,
}

#[derive(Serialize)]
struct FailureReport<S> {
    status: S,
    error: &'static str,
    timestamp: String,
}

impl<S: Serialize> FailureReport<S> {
    fn now(status: S, error: &'static str) -> Self {
        Self {
            status,
            error,
            timestamp: iso_timestamp(Utc::now()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MethodNotAllowed => {
                let mut response = (
                    StatusCode::METHOD_NOT_ALLOWED,
                    Json(Rejection {
                        message: METHOD_NOT_ALLOWED_MESSAGE,
                    }),
                )
                    .into_response();
                response
                    .headers_mut()
                    .insert(ALLOW, HeaderValue::from_static("GET"));
                response
            }
            ApiError::Unhealthy(source) => {
                tracing::error!(error = %source, "Health check failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(FailureReport::now(HealthStatus::Unhealthy, HEALTH_FAILED_LABEL)),
                )
                    .into_response()
            }
            ApiError::NotReady(source) => {
                tracing::error!(error = %source, "Readiness check failed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(FailureReport::now(ReadinessStatus::NotReady, READINESS_FAILED_LABEL)),
                )
                    .into_response()
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Template rendering error: {0}")]
    Template(#[from] tera::Error),
}

/// An `AppError` tagged with the id of the request that produced it.
#[derive(Debug)]
pub struct AppErrorResponse {
    pub error: AppError,
    pub request_id: Option<RequestId>,
}

impl From<AppError> for AppErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error,
            request_id: None,
        }
    }
}

/// Attach a request id to the error side of a `Result`.
pub trait ResultExt<T> {
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse>;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse> {
        self.map_err(|error| AppErrorResponse {
            error,
            request_id: Some(request_id.clone()),
        })
    }
}

impl IntoResponse for AppErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let request_id = self
            .request_id
            .as_ref()
            .map(|id| id.0.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        tracing::error!(request_id = %request_id, "Internal error: {:?}", self.error);

        let body = format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <title>Error {}</title>
    <link rel="stylesheet" href="/static/css/style.css">
</head>
<body>
    <div class="container">
        <div class="error-page">
            <h1>Error {}</h1>
            <p>Internal server error</p>
            <p class="request-id">Request ID: {}</p>
            <a href="/">Return to homepage</a>
        </div>
    </div>
</body>
</html>"#,
            status.as_u16(),
            status.as_u16(),
            request_id
        );

        // Error pages must not be cached by the per-route Cache-Control layers
        let mut response = (status, Html(body)).into_response();
        response
            .headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_NO_STORE));
        response
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        AppErrorResponse::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use uuid::Uuid;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_method_not_allowed_response() {
        let response = ApiError::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(ALLOW).unwrap(), "GET");
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "Method not allowed" })
        );
    }

    #[tokio::test]
    async fn test_unhealthy_response() {
        let response =
            ApiError::Unhealthy(ProbeError::ProcessNotFound("7".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["error"], "Health check failed");
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
        // The underlying cause stays in the logs.
        assert!(!json.to_string().contains("process table"));
    }

    #[tokio::test]
    async fn test_not_ready_response() {
        let response =
            ApiError::NotReady(ProbeError::Dependency("redis".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let json = body_json(response).await;
        assert_eq!(json["status"], "not_ready");
        assert_eq!(json["error"], "Readiness check failed");
    }

    #[tokio::test]
    async fn test_app_error_page_includes_request_id() {
        let id = Uuid::new_v4();
        let result: Result<(), AppError> = Err(AppError::Template(tera::Error::msg("boom")));
        let response = result
            .with_request_id(&RequestId(id))
            .unwrap_err()
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains(&id.to_string()));
        assert!(!html.contains("boom"));
    }
}
