// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Public HTTP handlers: health, metrics and the chat widget routes.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use helpline_agent::{PollResponse, UserReply};
use helpline_core::types::HealthStatus;
use helpline_core::{Feedback, Message, Pattern};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::{ValidJson, ValidQuery};
use crate::server::GatewayState;

/// Request body for POST /conversations/{clientId}/messages.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

/// Query for the poll routes. `after` defaults to 0, i.e. everything.
#[derive(Debug, Default, Deserialize)]
pub struct PollQuery {
    #[serde(default)]
    pub after: i64,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub feedback: Feedback,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub success: bool,
    /// The updated pattern; absent for neutral feedback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,
}

#[derive(Debug, Serialize)]
pub struct AdapterHealth {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub adapters: Vec<AdapterHealth>,
}

/// GET /health
///
/// 503 only when an adapter reports itself unhealthy.
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let mut adapters = Vec::with_capacity(state.health.adapters.len());
    let mut unhealthy = false;
    let mut degraded = false;
    for adapter in &state.health.adapters {
        let (status, detail) = match adapter.health_check().await {
            Ok(HealthStatus::Healthy) => ("healthy", None),
            Ok(HealthStatus::Degraded(why)) => {
                degraded = true;
                ("degraded", Some(why))
            }
            Ok(HealthStatus::Unhealthy(why)) => {
                unhealthy = true;
                ("unhealthy", Some(why))
            }
            Err(e) => {
                unhealthy = true;
                ("unhealthy", Some(e.to_string()))
            }
        };
        adapters.push(AdapterHealth {
            name: adapter.name().to_string(),
            status: status.to_string(),
            detail,
        });
    }

    let body = HealthResponse {
        status: if unhealthy || degraded { "degraded" } else { "ok" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        adapters,
    };
    let code = if unhealthy {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (code, Json(body)).into_response()
}

/// GET /metrics
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            (render.as_ref())(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// POST /conversations/{clientId}/messages
pub async fn post_message(
    State(state): State<GatewayState>,
    Path(client_id): Path<String>,
    ValidJson(body): ValidJson<MessageRequest>,
) -> Result<Json<UserReply>, ApiError> {
    let reply = state.agent.handle_user_message(&client_id, &body.text).await?;
    Ok(Json(reply))
}

/// GET /conversations/{clientId}/messages
pub async fn get_history(
    State(state): State<GatewayState>,
    Path(client_id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let messages = state.agent.history(&client_id).await?;
    Ok(Json(HistoryResponse { messages }))
}

/// GET /conversations/{clientId}/poll?after=
pub async fn get_poll(
    State(state): State<GatewayState>,
    Path(client_id): Path<String>,
    ValidQuery(query): ValidQuery<PollQuery>,
) -> Result<Json<PollResponse>, ApiError> {
    Ok(Json(state.agent.poll(&client_id, query.after).await?))
}

/// POST /patterns/{id}/feedback
pub async fn post_feedback(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    ValidJson(body): ValidJson<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let pattern = state.agent.pattern_feedback(id, body.feedback).await?;
    Ok(Json(FeedbackResponse {
        success: true,
        pattern,
    }))
}
