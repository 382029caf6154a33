//! Landing page handler.

use axum::{extract::State, response::Html, Extension};
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, AppErrorResponse, ResultExt};
use crate::middleware::RequestId;
use crate::report::iso_timestamp;
use crate::state::AppState;

/// A card in the landing page feature grid
#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    /// HTML entity rendered as the card icon
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const FEATURES: [Feature; 3] = [
    Feature {
        icon: "&#128640;",
        title: "Multi-LLM Integration",
        description: "Seamlessly integrate ChatGPT, Claude, and Gemini with a unified interface.",
    },
    Feature {
        icon: "&#127917;",
        title: "Custom AI Personalities",
        description: "Create and customize AI personalities for different contexts and use cases.",
    },
    Feature {
        icon: "&#129302;",
        title: "Intelligent Agents",
        description: "AI-powered agents that monitor and optimize your workspace automatically.",
    },
];

/// Landing page handler.
#[instrument(name = "home::index", skip(state, request_id))]
pub async fn index(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Html<String>, AppErrorResponse> {
    let mut context = tera::Context::new();
    context.insert("config", &state.config.ui);
    context.insert("app", &state.config.app);
    context.insert("rendered_at", &iso_timestamp(Utc::now()));
    context.insert("features", &FEATURES);

    let html = state
        .tera
        .render("index.html", &context)
        .map_err(AppError::from)
        .with_request_id(&request_id)?;
    Ok(Html(html))
}
