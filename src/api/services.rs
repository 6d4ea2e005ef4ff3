use std::collections::BTreeMap;

use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{Instrument, error, info_span, warn};
use uuid::Uuid;

use super::{
    auth::token_matches,
    error::ApiError,
    models::{HealthResponse, SlashCommandForm},
    state::AppState,
};
use crate::commands::CommandReply;
use crate::ledger::{TopicField, TopicView};

/// Slash-command endpoint (POST /commands)
///
/// Verifies the shared token, then hands the text to the command registry.
/// User mistakes come back as 200 replies; only store faults become errors.
pub async fn handle_command(
    State(state): State<AppState>,
    Form(form): Form<SlashCommandForm>,
) -> Result<Json<CommandReply>, ApiError> {
    let authorized = state
        .config
        .commands
        .token
        .as_deref()
        .is_some_and(|expected| token_matches(&form.token, expected));

    if !authorized {
        state.metrics.request_rejected();
        warn!(user = %form.user_name, channel = %form.channel_name, "Rejected command with bad token");
        return Err(ApiError::NotAllowed);
    }

    let request_id = Uuid::now_v7();
    let span = info_span!(
        "command",
        %request_id,
        user = %form.user_name,
        channel = %form.channel_name
    );

    async move {
        let ctx = form.context();
        match state.registry.dispatch(&state.ledger, &form.text, &ctx).await {
            Ok(reply) => {
                state.metrics.command_handled();
                Ok(Json(reply))
            }
            Err(err) => {
                state.metrics.command_failed();
                error!(error = %err, text = %form.text, "Command failed");
                Err(ApiError::from(err))
            }
        }
    }
    .instrument(span)
    .await
}

/// Operator view of a topic (GET /operators/topics/{name})
///
/// Returns every field including the full activity log.
pub async fn get_topic(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<TopicView>, ApiError> {
    let view = state
        .ledger
        .get_topic(&name, &TopicField::ALL)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("topic {name}")))?;

    Ok(Json(view))
}

/// Health check endpoint (GET /health)
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let mut components = BTreeMap::new();
    components.insert("api".to_string(), "healthy".to_string());

    let ledger_status = match state.ledger.list_visible_topics().await {
        Ok(_) => "healthy",
        Err(err) => {
            error!(error = %err, "Ledger health probe failed");
            "unhealthy"
        }
    };
    components.insert("ledger".to_string(), ledger_status.to_string());

    let all_healthy = components.values().all(|status| status == "healthy");
    let (status, status_code) = if all_healthy {
        ("healthy", StatusCode::OK)
    } else {
        ("unhealthy", StatusCode::SERVICE_UNAVAILABLE)
    };

    let response = HealthResponse {
        status: status.to_string(),
        components,
        version: env!("CARGO_PKG_VERSION").to_string(),
        metrics: state.metrics.snapshot(),
    };

    (status_code, Json(response))
}
