// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin HTTP handlers: code login and the session-guarded console routes.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use helpline_agent::PollResponse;
use helpline_analytics::{Period, PerformanceReport, PeriodStats};
use helpline_core::types::{AdminSession, ConversationSummary};
use helpline_core::{Message, Pattern};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::{ValidJson, ValidQuery};
use crate::handlers::PollQuery;
use crate::server::GatewayState;

#[derive(Debug, Deserialize)]
pub struct RequestCodeRequest {
    pub identity: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub identity: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub expires: i64,
}

#[derive(Debug, Serialize)]
pub struct ConversationsResponse {
    pub conversations: Vec<ConversationSummary>,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub text: String,
}

/// Result of takeover, respond and release: the message that was appended.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: Message,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default)]
    pub period: Period,
}

#[derive(Debug, Serialize)]
pub struct PatternsResponse {
    pub patterns: Vec<Pattern>,
}

#[derive(Debug, Deserialize)]
pub struct TrainPatternRequest {
    pub keywords: Vec<String>,
    pub response: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// POST /admin/auth/request-code
///
/// `success` is false when the code could not be pushed to the admin chat.
pub async fn post_request_code(
    State(state): State<GatewayState>,
    ValidJson(body): ValidJson<RequestCodeRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let success = state.agent.auth().request_code(body.identity.trim()).await?;
    Ok(Json(SuccessResponse { success }))
}

/// POST /admin/auth/verify-code
pub async fn post_verify_code(
    State(state): State<GatewayState>,
    ValidJson(body): ValidJson<VerifyCodeRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let session = state
        .agent
        .auth()
        .verify_code(body.identity.trim(), &body.code)
        .await?;
    Ok(Json(TokenResponse {
        token: session.token,
        expires: session.expires,
    }))
}

/// GET /admin/poll?after=
pub async fn get_poll(
    State(state): State<GatewayState>,
    Extension(session): Extension<AdminSession>,
    ValidQuery(query): ValidQuery<PollQuery>,
) -> Result<Json<PollResponse>, ApiError> {
    Ok(Json(state.agent.poll_admin(&session, query.after).await?))
}

/// GET /admin/conversations
pub async fn get_conversations(
    State(state): State<GatewayState>,
    Extension(session): Extension<AdminSession>,
) -> Result<Json<ConversationsResponse>, ApiError> {
    let conversations = state.agent.conversations(&session).await?;
    Ok(Json(ConversationsResponse { conversations }))
}

/// POST /admin/conversations/{id}/takeover
pub async fn post_takeover(
    State(state): State<GatewayState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
) -> Result<Json<ActionResponse>, ApiError> {
    let message = state.agent.takeover(&session, &id).await?;
    Ok(Json(ActionResponse {
        success: true,
        message,
    }))
}

/// POST /admin/conversations/{id}/respond
pub async fn post_respond(
    State(state): State<GatewayState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<RespondRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    let message = state.agent.respond(&session, &id, &body.text).await?;
    Ok(Json(ActionResponse {
        success: true,
        message,
    }))
}

/// POST /admin/conversations/{id}/release
pub async fn post_release(
    State(state): State<GatewayState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
) -> Result<Json<ActionResponse>, ApiError> {
    let message = state.agent.release(&session, &id).await?;
    Ok(Json(ActionResponse {
        success: true,
        message,
    }))
}

/// GET /admin/analytics?period=daily|weekly|monthly
pub async fn get_analytics(
    State(state): State<GatewayState>,
    Extension(session): Extension<AdminSession>,
    ValidQuery(query): ValidQuery<AnalyticsQuery>,
) -> Result<Json<PeriodStats>, ApiError> {
    Ok(Json(state.agent.stats(&session, query.period).await?))
}

/// GET /admin/performance
pub async fn get_performance(
    State(state): State<GatewayState>,
    Extension(session): Extension<AdminSession>,
) -> Result<Json<PerformanceReport>, ApiError> {
    Ok(Json(state.agent.performance(&session).await?))
}

/// GET /admin/patterns
pub async fn get_patterns(
    State(state): State<GatewayState>,
    Extension(session): Extension<AdminSession>,
) -> Result<Json<PatternsResponse>, ApiError> {
    let patterns = state.agent.list_patterns(&session).await?;
    Ok(Json(PatternsResponse { patterns }))
}

/// POST /admin/patterns
pub async fn post_pattern(
    State(state): State<GatewayState>,
    Extension(session): Extension<AdminSession>,
    ValidJson(body): ValidJson<TrainPatternRequest>,
) -> Result<(StatusCode, Json<Pattern>), ApiError> {
    let pattern = state
        .agent
        .train_pattern(&session, &body.keywords, &body.response, body.confidence)
        .await?;
    Ok((StatusCode::CREATED, Json(pattern)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analytics_period_defaults_to_daily() {
        let q: AnalyticsQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.period, Period::Daily);
        let q: AnalyticsQuery = serde_json::from_str(r#"{"period":"monthly"}"#).unwrap();
        assert_eq!(q.period, Period::Monthly);
    }

    #[test]
    fn train_request_confidence_is_optional() {
        let req: TrainPatternRequest =
            serde_json::from_str(r#"{"keywords":["kargo"],"response":"Yolda."}"#).unwrap();
        assert!(req.confidence.is_none());
    }
}
